// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types for the sluice reactive stream library.
//!
//! - [`StreamItem`] carries either a value or a terminal [`SluiceError`]
//! - [`HasTimestamp`] gives items a causal order
//! - [`SluiceSubject`] is a hot, broadcasting [`EventSource`]
//! - [`CancellationToken`] is the shared cancellation primitive

#[macro_use]
mod logging;

pub mod cancellation_token;
pub mod event_source;
pub mod has_timestamp;
pub mod sluice_error;
pub mod sluice_subject;
pub mod stream_item;
pub mod subject_error;

pub use self::cancellation_token::{CancellationToken, CancellationWatch, Cancelled};
pub use self::event_source::EventSource;
pub use self::has_timestamp::HasTimestamp;
pub use self::sluice_error::{IntoSluiceError, Result, ResultExt, SluiceError};
pub use self::sluice_subject::{SluiceSubject, SubjectStream};
pub use self::stream_item::StreamItem;
pub use self::subject_error::SubjectError;
