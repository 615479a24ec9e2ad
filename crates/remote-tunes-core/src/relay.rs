//! Fire-and-forget delivery of relay messages to a destination.
//!
//! Posting never waits on the destination. A bounded single-consumer
//! channel sits behind each destination so that a backlogged or vanished
//! listener turns into a dropped message instead of a stalled caller.

use crate::RelayMessage;

use std::num::NonZeroUsize;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::trace;

/// Pointer-sized handle identifying where relay messages are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelayDestination(NonZeroUsize);

impl RelayDestination {
    /// Wrap a raw handle value. Zero means "no destination".
    pub fn new(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(Self)
    }

    /// Raw handle value.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// What happened to a posted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// Accepted for delivery.
    Queued,
    /// The destination does not exist (or is not the one this poster serves).
    DroppedNoDestination,
    /// The destination's queue is full.
    DroppedBacklogged,
    /// The destination stopped listening.
    DroppedClosed,
}

impl PostOutcome {
    /// Whether the message was accepted.
    pub fn is_queued(self) -> bool {
        self == PostOutcome::Queued
    }
}

/// Non-blocking delivery of relay messages.
///
/// Implementations run inside the shell hook of arbitrary processes and
/// must return without waiting for the destination.
pub trait CommandPoster {
    /// Post `message` to `destination`.
    fn post(&self, destination: RelayDestination, message: RelayMessage) -> PostOutcome;
}

impl<P: CommandPoster + ?Sized> CommandPoster for &P {
    fn post(&self, destination: RelayDestination, message: RelayMessage) -> PostOutcome {
        (**self).post(destination, message)
    }
}

/// Create the bounded queue behind `destination`.
///
/// A capacity of zero is raised to one.
pub fn relay_channel(
    destination: RelayDestination,
    capacity: usize,
) -> (RelaySender, RelayReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (RelaySender { destination, tx }, RelayReceiver { rx })
}

/// Producer half of a relay channel.
#[derive(Debug, Clone)]
pub struct RelaySender {
    destination: RelayDestination,
    tx: mpsc::Sender<RelayMessage>,
}

impl RelaySender {
    /// Destination this sender delivers to.
    pub fn destination(&self) -> RelayDestination {
        self.destination
    }

    /// Queue `message` without waiting.
    pub fn try_post(&self, message: RelayMessage) -> PostOutcome {
        match self.tx.try_send(message) {
            Ok(()) => PostOutcome::Queued,
            Err(TrySendError::Full(message)) => {
                trace!(kind = message.kind(), "Relay queue full, message dropped");
                PostOutcome::DroppedBacklogged
            }
            Err(TrySendError::Closed(message)) => {
                trace!(kind = message.kind(), "Relay queue closed, message dropped");
                PostOutcome::DroppedClosed
            }
        }
    }
}

impl CommandPoster for RelaySender {
    fn post(&self, destination: RelayDestination, message: RelayMessage) -> PostOutcome {
        if destination != self.destination {
            return PostOutcome::DroppedNoDestination;
        }
        self.try_post(message)
    }
}

/// Consumer half of a relay channel.
#[derive(Debug)]
pub struct RelayReceiver {
    rx: mpsc::Receiver<RelayMessage>,
}

impl RelayReceiver {
    /// Wait for the next message. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<RelayMessage> {
        self.rx.recv().await
    }

    /// Take the next message if one is already queued.
    pub fn try_recv(&mut self) -> Option<RelayMessage> {
        self.rx.try_recv().ok()
    }
}
