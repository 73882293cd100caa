// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Drivers that consume sluice streams.
//!
//! - [`SubscribeExt::subscribe`] processes a stream in place with an async handler.
//! - [`SinkExt::sink`] spawns a driver and hands back a [`Subscription`] that
//!   can be cancelled at any time.

#[macro_use]
mod logging;

pub mod subscribe;
#[cfg(feature = "runtime-tokio")]
pub mod subscription;

pub use subscribe::SubscribeExt;
#[cfg(feature = "runtime-tokio")]
pub use subscription::{Completion, SinkExt, Subscription};
