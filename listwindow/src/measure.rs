use alloc::vec::Vec;

use crate::policy::HeightPolicy;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
type KeyHeightMap<K> = HashMap<K, u32>;
#[cfg(not(feature = "std"))]
type KeyHeightMap<K> = BTreeMap<K, u32>;

#[cfg(feature = "std")]
#[doc(hidden)]
pub trait CacheKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> CacheKey for K {}

#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub trait CacheKey: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> CacheKey for K {}

/// Best-known height per row.
///
/// Per-index heights are latched: an unmeasured row's height is resolved
/// from the [`HeightPolicy`] (and, for `Estimated`, the running average of
/// real measurements) when the cache is rebuilt or invalidated, and then
/// stays put until a measurement lands on that row. This keeps
/// `total_height` deltas exactly equal to the measurement deltas that caused
/// them.
///
/// Measured heights are additionally cached per stable key so that a host
/// with stable item identities can reorder data without losing measurements
/// (`Engine::sync_keys`). With the default index identity this is a plain
/// per-index cache.
#[derive(Clone, Debug, Default)]
pub struct MeasurementCache<K> {
    heights: Vec<u32>,
    measured: Vec<bool>,
    by_key: KeyHeightMap<K>,
    measured_total: u64,
    measured_count: usize,
}

impl<K: CacheKey> MeasurementCache<K> {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            measured: Vec::new(),
            by_key: KeyHeightMap::new(),
            measured_total: 0,
            measured_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    pub fn height_of(&self, index: usize) -> u32 {
        self.heights.get(index).copied().unwrap_or(0)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Number of distinct keys with a cached measurement.
    pub fn cached_keys(&self) -> usize {
        self.by_key.len()
    }

    /// Running average of measured heights, if any row has been measured.
    pub fn average(&self) -> Option<u32> {
        if self.measured_count == 0 {
            None
        } else {
            Some((self.measured_total / self.measured_count as u64) as u32)
        }
    }

    /// Height for a row with no measurement: the policy's answer, with
    /// `Estimated` refined by the running average once one exists.
    pub fn estimate(&self, policy: &HeightPolicy, index: usize) -> u32 {
        match policy {
            HeightPolicy::Estimated(_) => self.average().unwrap_or(policy.base_height(index)),
            _ => policy.base_height(index),
        }
    }

    /// Re-seeds per-index heights for `count` rows: measured heights come
    /// from the keyed cache, everything else from the estimate chain.
    pub fn rebuild(&mut self, count: usize, policy: &HeightPolicy, key_for: impl Fn(usize) -> K) {
        lw_debug!(count, cached = self.by_key.len(), "measurement cache rebuild");
        self.heights.clear();
        self.measured.clear();
        self.heights.reserve_exact(count);
        self.measured.reserve_exact(count);
        self.measured_total = 0;
        self.measured_count = 0;

        for i in 0..count {
            if let Some(&h) = self.by_key.get(&key_for(i)) {
                self.heights.push(h);
                self.measured.push(true);
                self.measured_total = self.measured_total.saturating_add(h as u64);
                self.measured_count += 1;
            } else {
                self.heights.push(0);
                self.measured.push(false);
            }
        }
        // Second pass so the estimate sees the full set of seeded measurements.
        for i in 0..count {
            if !self.measured[i] {
                self.heights[i] = self.estimate(policy, i);
            }
        }
    }

    /// Records an observed height. Returns the height delta against the
    /// previous value (zero when nothing changed). Idempotent for repeated
    /// identical measurements. The caller bounds-checks `index`.
    pub fn record(&mut self, index: usize, key: K, height: u32) -> i64 {
        let cur = self.heights[index];
        if self.measured[index] {
            if cur == height {
                self.by_key.insert(key, height);
                return 0;
            }
            self.measured_total = self
                .measured_total
                .saturating_sub(cur as u64)
                .saturating_add(height as u64);
        } else {
            self.measured[index] = true;
            self.measured_count += 1;
            self.measured_total = self.measured_total.saturating_add(height as u64);
        }
        self.heights[index] = height;
        self.by_key.insert(key, height);
        height as i64 - cur as i64
    }

    /// Drops measurements for all indexes `>= from` and re-estimates them.
    /// Measurements below `from` (and their contribution to the running
    /// average) are untouched.
    pub fn invalidate_from(
        &mut self,
        from: usize,
        policy: &HeightPolicy,
        key_for: impl Fn(usize) -> K,
    ) {
        let n = self.heights.len();
        let from = from.min(n);
        for i in from..n {
            if self.measured[i] {
                self.measured[i] = false;
                self.measured_count -= 1;
                self.measured_total = self.measured_total.saturating_sub(self.heights[i] as u64);
                self.by_key.remove(&key_for(i));
            }
        }
        for i in from..n {
            self.heights[i] = self.estimate(policy, i);
        }
    }

    /// Drops every measurement, including keyed entries for rows that are no
    /// longer in range, and re-estimates from the bare policy.
    pub fn invalidate_all(&mut self, policy: &HeightPolicy) {
        self.by_key.clear();
        self.measured_total = 0;
        self.measured_count = 0;
        for flag in self.measured.iter_mut() {
            *flag = false;
        }
        for i in 0..self.heights.len() {
            self.heights[i] = policy.base_height(i);
        }
    }

    /// Releases all retained storage. Used by engine teardown.
    pub fn release(&mut self) {
        self.heights = Vec::new();
        self.measured = Vec::new();
        self.by_key = KeyHeightMap::new();
        self.measured_total = 0;
        self.measured_count = 0;
    }
}
