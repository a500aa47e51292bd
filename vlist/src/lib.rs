//! A headless list-windowing engine for large dashboard lists.
//!
//! Given an item count, a height source, a viewport height, and a scroll
//! offset, the engine computes the half-open index range of items that must
//! exist in the rendered output, with per-item absolute positions. Rendering
//! cost stays bounded by the viewport, not by the list length, so feeds with
//! thousands of rows (transactions, wallets, compliance queues) stay cheap.
//!
//! It is UI-agnostic. A rendering layer is expected to provide:
//! - the viewport height
//! - scroll offsets as events arrive (the engine clamps them)
//! - per-item measured heights after paint (dynamic-height lists only)
//!
//! The offset table is a value owned by the engine, patched only on explicit
//! measurement/config calls — never implicitly on a render pass. UI layers
//! subscribe to changes via `on_change` instead of re-deriving state.
//!
//! For driving workflows (scroll controllers, infinite loading), see the
//! `vlist-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod height;
mod list;
mod measure;
mod options;
mod render;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use height::{HeightModel, HeightSource};
pub use list::VirtualList;
pub use measure::{MeasureOutcome, Measurer};
pub use options::{DEFAULT_OVERSCAN, OnChangeCallback, VirtualListOptions};
pub use render::PositionedItem;
pub use types::WindowRange;
pub use window::{clamp_scroll_top, expand_window, visible_window};
