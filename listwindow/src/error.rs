use thiserror::Error;

/// Recoverable anomalies the engine reports but never fails on.
///
/// The engine clamps or drops the offending input and keeps producing a
/// valid (if momentarily approximate) view; there is no crash path at this
/// layer. Errors are counted in the metrics and forwarded to the
/// [`DiagnosticsSink`] injected at construction.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// An index outside `[0, count)` was passed to a scroll or measurement
    /// operation. Scroll requests clamp to the last row; measurements are
    /// dropped.
    #[error("index {index} out of range for {count} items")]
    InvalidIndex { index: usize, count: usize },

    /// A configuration input the engine cannot honor. The last-known-good
    /// configuration is retained.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: &'static str },

    /// A measurement arrived for an index that was valid before the list
    /// shrank. Dropped silently; the renderer's feedback loop self-corrects
    /// on the next frame.
    #[error("stale measurement for index {index}, list now has {count} items")]
    StaleMeasurement { index: usize, count: usize },
}

/// Injectable observer for engine anomalies.
///
/// There is deliberately no ambient/global hook: hosts that want dev-tools
/// style introspection pass a sink through `EngineConfig::with_sink`.
pub trait DiagnosticsSink {
    fn report(&self, error: &EngineError);
}

/// Discards everything. The default when no sink is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn report(&self, _error: &EngineError) {}
}
