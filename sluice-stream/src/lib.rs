// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Gated switching between two reactive sources.
//!
//! The [`gated_switch`](gated_switch()) operator stays silent until a *gate*
//! source produces its first item, then streams a *payload* source until the
//! payload terminates:
//!
//! ```text
//! payload: --1-------3-------5--|
//! gate:    -----a-------b-------
//! output:  ----------3-------5--|
//! ```
//!
//! It is available at two levels:
//!
//! - **Streams**: [`GatedSwitchExt::gated_switch`] on any stream of
//!   [`StreamItem`](sluice_core::StreamItem)s, returning a single-use [`GatedSwitch`].
//! - **Sources**: the free function [`gated_switch`](gated_switch()) combines two
//!   [`EventSource`](sluice_core::EventSource)s into a cold
//!   [`GatedSwitchSource`]; every subscription gets its own gate state.
//!
//! # Ordering
//!
//! Items are processed in the order they become ready at the operator. When an
//! item from each upstream is ready in the same poll, the one with the smaller
//! [`HasTimestamp`](sluice_core::HasTimestamp) value goes first; on a tie the
//! gate item wins. The `_unordered` variants accept items without timestamps
//! and always let the gate item go first.

#[macro_use]
mod logging;

pub mod gated_switch;
pub mod prelude;

pub use gated_switch::{
    gated_switch, gated_switch_unordered, GateState, GatedSwitch, GatedSwitchExt, GatedSwitchSource,
};
