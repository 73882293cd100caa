// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::stream::{FusedStream, Stream};
use pin_project::pin_project;
use sluice_core::{CancellationToken, CancellationWatch, HasTimestamp, StreamItem};

/// Per-subscription state of a [`GatedSwitch`].
///
/// Starts `Waiting` and moves to `Opened` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// No gate value has been processed; payload values are discarded.
    #[default]
    Waiting,
    /// The gate produced a value; payload values pass through.
    Opened,
}

/// Stream returned by [`GatedSwitchExt::gated_switch`](super::GatedSwitchExt::gated_switch),
/// [`GatedSwitchExt::gated_switch_unordered`](super::GatedSwitchExt::gated_switch_unordered)
/// and by subscribing to a [`GatedSwitchSource`](super::GatedSwitchSource).
///
/// Owns both upstream subscriptions. Each is dropped exactly once: the gate
/// when it opens or the output terminates, the payload when the output
/// terminates.
#[pin_project(project = GatedSwitchProj)]
#[must_use = "streams do nothing unless polled"]
pub struct GatedSwitch<GS, PS, G, P> {
    #[pin]
    gate: Option<GS>,
    #[pin]
    payload: Option<PS>,
    ready_gate: Option<G>,
    ready_payload: Option<P>,
    state: GateState,
    terminated: bool,
    cancellation: Option<CancellationWatch>,
    gate_first: GateFirst<G, P>,
}

/// Decides which of two simultaneously ready items is processed first.
///
/// Returns `true` when the gate item goes before the payload item.
pub(crate) type GateFirst<G, P> = fn(&G, &P) -> bool;

/// Smaller timestamp first, gate on a tie.
pub(crate) fn by_timestamp<G, P>(gate: &G, payload: &P) -> bool
where
    G: HasTimestamp,
    P: HasTimestamp<Timestamp = G::Timestamp>,
{
    gate.timestamp() <= payload.timestamp()
}

/// No causal information: the gate, polled first, goes first.
pub(crate) const fn by_arrival<G, P>(_gate: &G, _payload: &P) -> bool {
    true
}

impl<GS, PS, G, P> GatedSwitch<GS, PS, G, P>
where
    GS: Stream<Item = StreamItem<G>>,
    PS: Stream<Item = StreamItem<P>>,
{
    pub(crate) fn new(gate: GS, payload: PS, gate_first: GateFirst<G, P>) -> Self {
        Self {
            gate: Some(gate),
            payload: Some(payload),
            ready_gate: None,
            ready_payload: None,
            state: GateState::Waiting,
            terminated: false,
            cancellation: None,
            gate_first,
        }
    }

    /// Ends the stream and releases both upstreams when `token` is cancelled.
    pub fn with_cancellation(mut self, token: &CancellationToken) -> Self {
        self.cancellation = Some(token.watch());
        self
    }

    /// Current gate state of this subscription.
    #[must_use]
    pub const fn gate_state(&self) -> GateState {
        self.state
    }

    /// Returns `true` while the gate upstream is still attached.
    #[must_use]
    pub const fn is_gate_attached(&self) -> bool {
        self.gate.is_some()
    }

    /// Returns `true` while the payload upstream is still attached.
    #[must_use]
    pub const fn is_payload_attached(&self) -> bool {
        self.payload.is_some()
    }
}

impl<GS, PS, G, P> GatedSwitchProj<'_, GS, PS, G, P> {
    fn open(&mut self) {
        *self.state = GateState::Opened;
        self.ready_gate.take();
        self.gate.set(None);
        trace!("gate opened, gate upstream released");
    }

    fn terminate(&mut self) {
        *self.terminated = true;
        self.gate.set(None);
        self.payload.set(None);
        self.ready_gate.take();
        self.ready_payload.take();
        self.cancellation.take();
    }
}

impl<GS, PS, G, P> Stream for GatedSwitch<GS, PS, G, P>
where
    GS: Stream<Item = StreamItem<G>>,
    PS: Stream<Item = StreamItem<P>>,
{
    type Item = StreamItem<P>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.terminated {
                return Poll::Ready(None);
            }

            if let Some(watch) = this.cancellation.as_mut() {
                if Pin::new(watch).poll(cx).is_ready() {
                    debug!(state = ?this.state, "gated switch cancelled");
                    this.terminate();
                    return Poll::Ready(None);
                }
            }

            // The gate only matters until it opens; after that it is detached.
            if this.ready_gate.is_none() {
                if let Some(gate) = this.gate.as_mut().as_pin_mut() {
                    match gate.poll_next(cx) {
                        Poll::Ready(Some(StreamItem::Value(value))) => {
                            *this.ready_gate = Some(value);
                        }
                        Poll::Ready(Some(StreamItem::Error(error))) => {
                            debug!(%error, "gate failed before opening");
                            this.terminate();
                            return Poll::Ready(Some(StreamItem::Error(error.gate())));
                        }
                        Poll::Ready(None) => {
                            debug!("gate completed without opening");
                            this.terminate();
                            return Poll::Ready(None);
                        }
                        Poll::Pending => {}
                    }
                }
            }

            if this.ready_payload.is_none() {
                if let Some(payload) = this.payload.as_mut().as_pin_mut() {
                    match payload.poll_next(cx) {
                        Poll::Ready(Some(StreamItem::Value(value))) => {
                            *this.ready_payload = Some(value);
                        }
                        Poll::Ready(Some(StreamItem::Error(error))) => {
                            debug!(%error, state = ?this.state, "payload failed");
                            this.terminate();
                            return Poll::Ready(Some(StreamItem::Error(error.payload())));
                        }
                        Poll::Ready(None) => {
                            debug!(state = ?this.state, "payload completed");
                            this.terminate();
                            return Poll::Ready(None);
                        }
                        Poll::Pending => {}
                    }
                }
            }

            let gate_first = match (this.ready_gate.as_ref(), this.ready_payload.as_ref()) {
                (Some(gate), Some(payload)) => (*this.gate_first)(gate, payload),
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => return Poll::Pending,
            };

            if gate_first {
                this.open();
                continue;
            }

            if let Some(value) = this.ready_payload.take() {
                match *this.state {
                    GateState::Opened => return Poll::Ready(Some(StreamItem::Value(value))),
                    GateState::Waiting => {
                        trace!("payload value discarded, gate still closed");
                    }
                }
            }
        }
    }
}

impl<GS, PS, G, P> FusedStream for GatedSwitch<GS, PS, G, P>
where
    GS: Stream<Item = StreamItem<G>>,
    PS: Stream<Item = StreamItem<P>>,
{
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl<GS, PS, G, P> core::fmt::Debug for GatedSwitch<GS, PS, G, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GatedSwitch")
            .field("state", &self.state)
            .field("gate_attached", &self.gate.is_some())
            .field("payload_attached", &self.payload.is_some())
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}
