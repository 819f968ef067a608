//! Host-integration helpers for the `listwindow` engine.
//!
//! The engine crate is headless and never touches a clock or an animation.
//! This crate provides the small, framework-neutral pieces a host UI
//! typically needs on top of it:
//!
//! - [`Controller`]: owns an engine, maps `Behavior::Smooth` scroll requests
//!   onto tweens, and drives the idle debounce from the host's frame ticks
//! - [`Tween`]/[`Easing`]: the animated-scroll primitive fed back to the
//!   engine as synthetic viewport samples
//! - [`ScrollAnchor`]: keep the viewport visually pinned to an item across
//!   prepends and reorders
//! - [`RowSlot`]/[`MeasureQueue`]: the per-row render contract, batching
//!   observed heights back into the engine
//!
//! No ratatui/egui/DOM bindings live here; adapters for concrete UI stacks
//! build on these types.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod anchor;
mod controller;
mod key;
mod slot;
mod tween;


pub use anchor::{ScrollAnchor, apply_anchor, capture_first_visible_anchor};
pub use controller::Controller;
pub use key::ListKey;
pub use slot::{MeasureQueue, RowSlot};
pub use tween::{Easing, Tween};
