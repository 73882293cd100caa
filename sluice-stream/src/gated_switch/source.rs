// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::implementation::{by_arrival, by_timestamp, GateFirst};
use super::GatedSwitch;
use sluice_core::{CancellationToken, EventSource, HasTimestamp, SubjectError};

/// Combines a gate and a payload source into a cold source of payload values.
///
/// Nothing is subscribed until the returned source is. Every
/// [`subscribe`](EventSource::subscribe) attaches to both upstreams afresh and
/// starts its own gate in [`GateState::Waiting`](super::GateState::Waiting), so
/// re-subscribing restarts the gate logic.
///
/// Gate and payload items ready in the same poll are processed in timestamp
/// order, the gate winning a tie. Use [`gated_switch_unordered`] for sources
/// whose items carry no timestamp.
///
/// # Example
///
/// ```rust
/// use sluice_core::{EventSource, SluiceSubject};
/// use sluice_stream::gated_switch;
/// use sluice_test_utils::{unwrap_stream, unwrap_value, Sequenced};
///
/// # #[tokio::main]
/// # async fn main() {
/// let bananas = SluiceSubject::<Sequenced<&str>>::new();
/// let apples = SluiceSubject::<Sequenced<i32>>::new();
///
/// let apples_after_first_banana = gated_switch(bananas.clone(), apples.clone());
/// let mut output = apples_after_first_banana.subscribe().unwrap();
///
/// apples.next(Sequenced::new(1)).unwrap();
/// bananas.next(Sequenced::new("banana")).unwrap();
/// apples.next(Sequenced::new(3)).unwrap();
///
/// assert_eq!(unwrap_value(Some(unwrap_stream(&mut output, 500).await)).value, 3);
/// # }
/// ```
pub fn gated_switch<GSrc, PSrc, G, P>(gate: GSrc, payload: PSrc) -> GatedSwitchSource<GSrc, PSrc, G, P>
where
    GSrc: EventSource<G>,
    PSrc: EventSource<P>,
    G: HasTimestamp,
    P: HasTimestamp<Timestamp = G::Timestamp>,
{
    GatedSwitchSource {
        gate,
        payload,
        gate_first: by_timestamp::<G, P>,
    }
}

/// Arrival-order variant of [`gated_switch`] for any pair of sources.
///
/// A gate and a payload item ready in the same poll are processed gate
/// first.
///
/// ```rust
/// use sluice_core::{EventSource, SluiceSubject};
/// use sluice_stream::gated_switch_unordered;
/// use sluice_test_utils::collect_values;
///
/// # #[tokio::main]
/// # async fn main() {
/// let gate = SluiceSubject::<()>::new();
/// let payload = SluiceSubject::<i32>::new();
///
/// let mut output = gated_switch_unordered(gate.clone(), payload.clone())
///     .subscribe()
///     .unwrap();
///
/// gate.next(()).unwrap();
/// payload.next(1).unwrap();
/// payload.next(2).unwrap();
/// payload.close();
///
/// assert_eq!(collect_values(&mut output, 500).await, vec![1, 2]);
/// # }
/// ```
pub fn gated_switch_unordered<GSrc, PSrc, G, P>(
    gate: GSrc,
    payload: PSrc,
) -> GatedSwitchSource<GSrc, PSrc, G, P>
where
    GSrc: EventSource<G>,
    PSrc: EventSource<P>,
{
    GatedSwitchSource {
        gate,
        payload,
        gate_first: by_arrival::<G, P>,
    }
}

/// Cold [`EventSource`] produced by [`gated_switch`] and
/// [`gated_switch_unordered`].
pub struct GatedSwitchSource<GSrc, PSrc, G, P> {
    gate: GSrc,
    payload: PSrc,
    gate_first: GateFirst<G, P>,
}

impl<GSrc, PSrc, G, P> GatedSwitchSource<GSrc, PSrc, G, P>
where
    GSrc: EventSource<G>,
    PSrc: EventSource<P>,
{
    /// Subscribes with an external cancellation token.
    ///
    /// Cancelling `token` ends the returned stream and detaches it from both
    /// upstreams. Cancelling again has no effect.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if either upstream refuses the
    /// subscription. Nothing stays attached in that case.
    pub fn subscribe_with_cancellation(
        &self,
        token: &CancellationToken,
    ) -> Result<GatedSwitch<GSrc::Stream, PSrc::Stream, G, P>, SubjectError> {
        Ok(self.subscribe()?.with_cancellation(token))
    }

    /// The gate source.
    pub const fn gate(&self) -> &GSrc {
        &self.gate
    }

    /// The payload source.
    pub const fn payload(&self) -> &PSrc {
        &self.payload
    }
}

impl<GSrc, PSrc, G, P> EventSource<P> for GatedSwitchSource<GSrc, PSrc, G, P>
where
    GSrc: EventSource<G>,
    PSrc: EventSource<P>,
{
    type Stream = GatedSwitch<GSrc::Stream, PSrc::Stream, G, P>;

    fn subscribe(&self) -> Result<Self::Stream, SubjectError> {
        // A failed payload subscription drops the gate stream, detaching it.
        let gate = self.gate.subscribe()?;
        let payload = self.payload.subscribe()?;
        trace!("gated switch subscribed to gate and payload");
        Ok(GatedSwitch::new(gate, payload, self.gate_first))
    }
}

impl<GSrc: Clone, PSrc: Clone, G, P> Clone for GatedSwitchSource<GSrc, PSrc, G, P> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            payload: self.payload.clone(),
            gate_first: self.gate_first,
        }
    }
}

impl<GSrc, PSrc, G, P> core::fmt::Debug for GatedSwitchSource<GSrc, PSrc, G, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GatedSwitchSource").finish_non_exhaustive()
    }
}
