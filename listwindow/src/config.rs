use alloc::sync::Arc;

use crate::error::DiagnosticsSink;
use crate::policy::HeightPolicy;

/// Maps an index to the stable identity its measurement is cached under.
pub type ItemKeyFn<K> = Arc<dyn Fn(usize) -> K + Send + Sync>;

/// A diagnostics sink shared with the engine.
pub type SharedSink = Arc<dyn DiagnosticsSink + Send + Sync>;

/// Configuration for [`crate::Engine`].
///
/// Cheap to clone: closures and the sink are stored in `Arc`s, so hosts can
/// tweak a field and reconfigure without reallocating callbacks.
pub struct EngineConfig<K = u64> {
    pub count: usize,
    pub height_policy: HeightPolicy,
    /// Extra rows materialized beyond each edge of the visible span.
    pub overscan: usize,
    /// Stable identity for measurement caching. The default (`|i| i as u64`)
    /// makes the index itself the identity.
    pub item_key: ItemKeyFn<K>,
    /// Quiet period after the last offset-changing sample before
    /// `Engine::tick` flips the state machine back to idle.
    pub idle_delay_ms: u64,
    /// Receives recoverable anomalies (out-of-range indexes, stale
    /// measurements, rejected configurations). `None` drops them after
    /// counting.
    pub sink: Option<SharedSink>,
}

pub(crate) const DEFAULT_IDLE_DELAY_MS: u64 = 150;
pub(crate) const DEFAULT_OVERSCAN: usize = 4;

impl EngineConfig<u64> {
    /// Options for a list keyed by index.
    pub fn new(count: usize, height_policy: HeightPolicy) -> Self {
        Self {
            count,
            height_policy,
            overscan: DEFAULT_OVERSCAN,
            item_key: Arc::new(|i| i as u64),
            idle_delay_ms: DEFAULT_IDLE_DELAY_MS,
            sink: None,
        }
    }
}

impl<K> EngineConfig<K> {
    /// Options with a custom identity mapping, for hosts whose measurements
    /// should follow items across reordering/replacement.
    pub fn new_with_key(
        count: usize,
        height_policy: HeightPolicy,
        item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            count,
            height_policy,
            overscan: DEFAULT_OVERSCAN,
            item_key: Arc::new(item_key),
            idle_delay_ms: DEFAULT_IDLE_DELAY_MS,
            sink: None,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_height_policy(mut self, height_policy: HeightPolicy) -> Self {
        self.height_policy = height_policy;
        self
    }

    pub fn with_idle_delay_ms(mut self, idle_delay_ms: u64) -> Self {
        self.idle_delay_ms = idle_delay_ms;
        self
    }

    pub fn with_sink(mut self, sink: impl DiagnosticsSink + Send + Sync + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn with_shared_sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_item_key(mut self, item_key: impl Fn(usize) -> K + Send + Sync + 'static) -> Self {
        self.item_key = Arc::new(item_key);
        self
    }
}

impl<K> Clone for EngineConfig<K> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            height_policy: self.height_policy.clone(),
            overscan: self.overscan,
            item_key: Arc::clone(&self.item_key),
            idle_delay_ms: self.idle_delay_ms,
            sink: self.sink.clone(),
        }
    }
}

impl<K> core::fmt::Debug for EngineConfig<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("count", &self.count)
            .field("height_policy", &self.height_policy)
            .field("overscan", &self.overscan)
            .field("idle_delay_ms", &self.idle_delay_ms)
            .field("sink", &self.sink.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}
