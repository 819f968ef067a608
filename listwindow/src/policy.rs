use alloc::sync::Arc;

/// Decides what a row's height is before a real measurement arrives.
///
/// Dispatch is an explicit `match`; there is no runtime type inspection.
#[derive(Clone)]
pub enum HeightPolicy {
    /// Every row has the same known height.
    Fixed(u32),
    /// Heights are derivable per index (e.g. from a precomputed layout pass).
    PerItem(Arc<dyn Fn(usize) -> u32 + Send + Sync>),
    /// Rows start at a default height and converge on the running average of
    /// observed measurements as the list is painted.
    Estimated(u32),
}

impl HeightPolicy {
    /// The policy's own answer for `index`, ignoring measurements and the
    /// running average. See `MeasurementCache::estimate` for the full
    /// fallback chain.
    pub(crate) fn base_height(&self, index: usize) -> u32 {
        match self {
            Self::Fixed(h) => *h,
            Self::PerItem(f) => f(index),
            Self::Estimated(default) => *default,
        }
    }

    /// A zero fixed or default height cannot produce a usable layout.
    pub(crate) fn is_valid(&self) -> bool {
        match self {
            Self::Fixed(h) | Self::Estimated(h) => *h > 0,
            Self::PerItem(_) => true,
        }
    }
}

impl core::fmt::Debug for HeightPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(h) => f.debug_tuple("Fixed").field(h).finish(),
            Self::PerItem(_) => f.write_str("PerItem(..)"),
            Self::Estimated(h) => f.debug_tuple("Estimated").field(h).finish(),
        }
    }
}
