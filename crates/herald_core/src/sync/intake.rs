//! Bounded, capacity-reserving intake channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Result of a non-blocking send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The item is in the channel.
    Sent,
    /// No capacity left; the item was dropped.
    Full,
    /// The consumer is gone; the item was dropped.
    Disconnected,
}

impl SendOutcome {
    /// Returns true if the item was accepted.
    #[must_use]
    pub const fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// A multi-producer, single-consumer queue with a hard capacity.
///
/// Capacity is reserved when a producer sends and released by the consumer
/// when it is done with the item (see [`IntakeReceiver::release`]), so items
/// the consumer has pulled out of the channel but still holds in its own
/// pending list keep counting against the limit.
pub struct BoundedIntake<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    reserved: Arc<AtomicUsize>,
    capacity: usize,
}

impl<T> BoundedIntake<T> {
    /// Creates an intake holding at most `capacity` items.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            reserved: Arc::new(AtomicUsize::new(0)),
            capacity,
        }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> IntakeSender<T> {
        IntakeSender {
            sender: self.sender.clone(),
            reserved: Arc::clone(&self.reserved),
            capacity: self.capacity,
        }
    }

    /// Creates the receiver handle.
    #[must_use]
    pub fn receiver(&self) -> IntakeReceiver<T> {
        IntakeReceiver {
            receiver: self.receiver.clone(),
            reserved: Arc::clone(&self.reserved),
        }
    }

    /// Creates a paired sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (IntakeSender<T>, IntakeReceiver<T>) {
        let intake = Self::new(capacity);
        (intake.sender(), intake.receiver())
    }
}

/// Producer handle.
pub struct IntakeSender<T> {
    sender: Sender<T>,
    reserved: Arc<AtomicUsize>,
    capacity: usize,
}

impl<T> Clone for IntakeSender<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            reserved: Arc::clone(&self.reserved),
            capacity: self.capacity,
        }
    }
}

impl<T> IntakeSender<T> {
    /// Sends an item without blocking.
    ///
    /// Returns [`SendOutcome::Full`] when every unit of capacity is reserved.
    pub fn try_send(&self, item: T) -> SendOutcome {
        let reserved = self
            .reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            });
        if reserved.is_err() {
            return SendOutcome::Full;
        }

        match self.sender.try_send(item) {
            Ok(()) => SendOutcome::Sent,
            Err(TrySendError::Full(_)) => {
                self.reserved.fetch_sub(1, Ordering::AcqRel);
                SendOutcome::Full
            }
            Err(TrySendError::Disconnected(_)) => {
                self.reserved.fetch_sub(1, Ordering::AcqRel);
                SendOutcome::Disconnected
            }
        }
    }

    /// Capacity this sender was created with.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Consumer handle.
pub struct IntakeReceiver<T> {
    receiver: Receiver<T>,
    reserved: Arc<AtomicUsize>,
}

impl<T> IntakeReceiver<T> {
    /// Receives one item (non-blocking).
    ///
    /// The item keeps its reservation until [`release`](Self::release).
    #[inline]
    pub fn try_recv(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Returns `count` units of capacity to the producers.
    pub fn release(&self, count: usize) {
        if count == 0 {
            return;
        }
        let _ = self
            .reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(count))
            });
    }

    /// Drops everything still in the channel and clears every reservation.
    pub fn purge(&self) -> usize {
        let mut purged = 0;
        while self.receiver.try_recv().is_ok() {
            purged += 1;
        }
        self.reserved.store(0, Ordering::Release);
        purged
    }

    /// Units of capacity currently reserved.
    #[must_use]
    pub fn reserved(&self) -> usize {
        self.reserved.load(Ordering::Acquire)
    }

    /// Items waiting in the channel.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}
