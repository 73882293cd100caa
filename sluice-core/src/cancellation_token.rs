// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic cancellation token.
//!
//! One token is shared by a subscription handle, the task driving it and any
//! operator handed the token, so a single `cancel()` releases all of them.

use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::{Context, Poll};
use event_listener::{Event, EventListener};
use std::sync::Arc;

/// Runtime-agnostic cancellation token.
///
/// Clones share the same cancellation state. When `cancel()` is called on any
/// clone, all waiters on `cancelled()` are notified.
///
/// # Example
///
/// ```
/// use sluice_core::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let token_clone = token.clone();
///
/// let waiter = tokio::spawn(async move {
///     token_clone.cancelled().await;
/// });
///
/// token.cancel();
/// waiter.await.unwrap();
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    event: Event,
}

impl CancellationToken {
    /// Create a new, not yet cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                event: Event::new(),
            }),
        }
    }

    /// Cancel the token, waking all listeners.
    ///
    /// Idempotent. Returns `true` only for the call that actually flipped the
    /// token, so callers can run release logic exactly once.
    pub fn cancel(&self) -> bool {
        let first = !self.inner.cancelled.swap(true, Ordering::AcqRel);
        if first {
            trace!("cancellation token triggered");
            self.inner.event.notify(usize::MAX);
        }
        first
    }

    /// Check if the token has been cancelled (non-blocking).
    ///
    /// ```
    /// use sluice_core::CancellationToken;
    ///
    /// let token = CancellationToken::new();
    /// assert!(!token.is_cancelled());
    ///
    /// token.cancel();
    /// assert!(token.is_cancelled());
    /// ```
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Wait asynchronously until the token is cancelled.
    ///
    /// Resolves immediately if the token is already cancelled.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            listener: None,
        }
    }

    /// Owned variant of [`cancelled()`](Self::cancelled) for embedding in
    /// hand-written `Stream`s and `Future`s.
    #[must_use]
    pub fn watch(&self) -> CancellationWatch {
        CancellationWatch {
            token: self.clone(),
            listener: None,
        }
    }

    fn poll_cancelled(&self, listener: &mut Option<EventListener>, cx: &mut Context<'_>) -> bool {
        if self.is_cancelled() {
            return true;
        }

        if listener.is_none() {
            *listener = Some(self.inner.event.listen());
            // cancel() may have run between the check above and listen()
            if self.is_cancelled() {
                return true;
            }
        }

        match listener.as_mut() {
            Some(active) => match Pin::new(active).poll(cx) {
                Poll::Ready(()) => {
                    *listener = None;
                    true
                }
                Poll::Pending => false,
            },
            None => false,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`CancellationToken::cancelled()`].
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    listener: Option<EventListener>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = &mut *self;
        if this.token.poll_cancelled(&mut this.listener, cx) {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

/// Owned future returned by [`CancellationToken::watch()`].
///
/// Resolves once the token is cancelled. Polling it again after that keeps
/// returning `Ready`.
#[derive(Debug)]
pub struct CancellationWatch {
    token: CancellationToken,
    listener: Option<EventListener>,
}

impl CancellationWatch {
    /// The token being watched.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Future for CancellationWatch {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = &mut *self;
        if this.token.poll_cancelled(&mut this.listener, cx) {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}
