//! A headless windowing engine for very large variable-height lists.
//!
//! `listwindow` keeps the memory and per-event cost of a long list (tasks,
//! notebooks, search results) independent of its length: out of tens of
//! thousands of rows, only a visible-plus-overscan window is ever
//! materialized. The engine tracks measured and estimated row heights, maps
//! scroll offsets to index ranges in `O(log n)` via a Fenwick tree, resolves
//! scroll-to-index requests into clamped offsets, and exposes pull-based
//! [`ViewState`] snapshots to the host UI.
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - viewport samples (scroll offset + viewport size) on scroll and resize
//! - a millisecond clock for the scrolling-state debounce
//! - row rendering, reporting observed heights back via
//!   [`Engine::on_item_measured`]
//!
//! For host-side helpers (smooth-scroll tweens, anchoring, the row render
//! contract), see the `listwindow-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod config;
mod engine;
mod error;
mod measure;
mod metrics;
mod offset_index;
mod policy;
mod range;
mod scroll;
mod types;

#[cfg(test)]
mod tests;

pub use config::{EngineConfig, ItemKeyFn, SharedSink};
pub use engine::Engine;
pub use error::{DiagnosticsSink, EngineError, NullSink};
pub use measure::MeasurementCache;
pub use metrics::MetricsSnapshot;
pub use offset_index::OffsetIndex;
pub use policy::HeightPolicy;
pub use range::compute_range;
pub use scroll::{ScrollRequest, resolve_target};
pub use types::{
    Alignment, Behavior, ScrollDirection, ScrollState, ScrollTarget, ViewItem, ViewState,
    VirtualRange,
};

#[doc(hidden)]
pub use measure::CacheKey;
