// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `gated_switch` operator.
//!
//! Emits nothing until the gate produces its first value, then forwards the
//! payload until the payload terminates.
//!
//! # Behavior
//!
//! - Payload values processed while the gate is closed are discarded, not buffered
//! - The first gate value opens the gate; its value is discarded
//! - Once open, the gate upstream is released and later gate items are never seen
//! - Payload completion completes the output at any time
//! - Gate completion before opening completes the output empty
//! - Gate errors before opening and payload errors at any time are emitted
//!   (tagged as [`SluiceError::Gate`] / [`SluiceError::Payload`]) and end the output
//! - Dropping the output or cancelling its token releases both upstreams
//!
//! # Example
//!
//! ```rust
//! use sluice_stream::GatedSwitchExt;
//! use sluice_test_utils::{test_channel, unwrap_stream, unwrap_value, Sequenced};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx_gate, gate) = test_channel::<Sequenced<&str>>();
//! let (tx_payload, payload) = test_channel::<Sequenced<i32>>();
//!
//! let mut switched = gate.gated_switch(payload);
//!
//! tx_payload.send(Sequenced::new(1)).unwrap();
//! tx_gate.send(Sequenced::new("open")).unwrap();
//! tx_payload.send(Sequenced::new(3)).unwrap();
//!
//! assert_eq!(unwrap_value(Some(unwrap_stream(&mut switched, 500).await)).value, 3);
//! # }
//! ```
//!
//! [`SluiceError::Gate`]: sluice_core::SluiceError::Gate
//! [`SluiceError::Payload`]: sluice_core::SluiceError::Payload

mod implementation;
mod source;

pub use implementation::{GateState, GatedSwitch};
pub use source::{gated_switch, gated_switch_unordered, GatedSwitchSource};

use futures::Stream;
use implementation::{by_arrival, by_timestamp};
use sluice_core::{HasTimestamp, StreamItem};

/// Extension trait providing the `gated_switch` operator on gate streams.
pub trait GatedSwitchExt<G>: Stream<Item = StreamItem<G>> + Sized {
    /// Streams `payload` once this stream has produced its first value.
    ///
    /// `self` is the gate: only the occurrence of its first value matters.
    /// When a gate and a payload item are ready in the same poll, the smaller
    /// timestamp is processed first and the gate wins a tie.
    ///
    /// # Arguments
    ///
    /// * `payload` - The stream whose values are emitted after the gate opens.
    ///
    /// # Errors
    ///
    /// Emits `StreamItem::Error(SluiceError::Gate(..))` if the gate fails
    /// before opening and `StreamItem::Error(SluiceError::Payload(..))` if the
    /// payload fails. Either error is the last item of the stream.
    ///
    /// # See Also
    ///
    /// - [`gated_switch_unordered`](Self::gated_switch_unordered) - For items
    ///   without timestamps
    /// - [`gated_switch`](crate::gated_switch()) - The same operator over
    ///   [`EventSource`](sluice_core::EventSource)s, with per-subscription state
    fn gated_switch<PS, P>(self, payload: PS) -> GatedSwitch<Self, PS, G, P>
    where
        PS: Stream<Item = StreamItem<P>>,
        G: HasTimestamp,
        P: HasTimestamp<Timestamp = G::Timestamp>;

    /// Like [`gated_switch`](Self::gated_switch), for items that carry no
    /// timestamp.
    ///
    /// Items are processed purely in arrival order. When a gate and a
    /// payload item are ready in the same poll the gate goes first, so that
    /// payload item is forwarded.
    ///
    /// ```rust
    /// use sluice_core::SluiceSubject;
    /// use sluice_stream::GatedSwitchExt;
    /// use sluice_test_utils::{unwrap_stream, unwrap_value};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let gate = SluiceSubject::<&str>::new();
    /// let payload = SluiceSubject::<i32>::new();
    ///
    /// let mut switched = gate
    ///     .subscribe()
    ///     .unwrap()
    ///     .gated_switch_unordered(payload.subscribe().unwrap());
    ///
    /// gate.next("open").unwrap();
    /// payload.next(3).unwrap();
    ///
    /// assert_eq!(unwrap_value(Some(unwrap_stream(&mut switched, 500).await)), 3);
    /// # }
    /// ```
    fn gated_switch_unordered<PS, P>(self, payload: PS) -> GatedSwitch<Self, PS, G, P>
    where
        PS: Stream<Item = StreamItem<P>>;
}

impl<S, G> GatedSwitchExt<G> for S
where
    S: Stream<Item = StreamItem<G>>,
{
    fn gated_switch<PS, P>(self, payload: PS) -> GatedSwitch<Self, PS, G, P>
    where
        PS: Stream<Item = StreamItem<P>>,
        G: HasTimestamp,
        P: HasTimestamp<Timestamp = G::Timestamp>,
    {
        GatedSwitch::new(self, payload, by_timestamp::<G, P>)
    }

    fn gated_switch_unordered<PS, P>(self, payload: PS) -> GatedSwitch<Self, PS, G, P>
    where
        PS: Stream<Item = StreamItem<P>>,
    {
        GatedSwitch::new(self, payload, by_arrival::<G, P>)
    }
}
