//! Driving workflows for the `vlist` engine.
//!
//! The `vlist` crate is UI-agnostic and owns the windowing math. This crate
//! provides the framework-neutral drivers a UI adapter typically needs:
//!
//! - [`ScrollController`]: scroll/resize ingestion, programmatic
//!   scroll-to-index against an external scroll surface, and raw
//!   pixel-measurement sanitization
//! - [`InfiniteLoader`]: threshold-watched "load more" with guard-based
//!   dedupe and epoch-fenced completion
//!
//! This crate is intentionally framework-agnostic (no DOM/TUI bindings) and
//! runtime-agnostic: the asynchronous load operation lives with the caller,
//! the loader only hands out one-shot tickets and takes them back.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod loader;


pub use controller::{ScrollController, ScrollSurfaceFn};
pub use loader::{InfiniteLoader, LoadOutcome, LoadTicket};
