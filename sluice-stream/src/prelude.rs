// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Convenient re-exports for building gated pipelines.
//!
//! ```
//! use sluice_stream::prelude::*;
//! ```

pub use crate::gated_switch::{
    gated_switch, gated_switch_unordered, GateState, GatedSwitch, GatedSwitchExt, GatedSwitchSource,
};
pub use sluice_core::{
    CancellationToken, EventSource, HasTimestamp, SluiceError, SluiceSubject, StreamItem,
};
