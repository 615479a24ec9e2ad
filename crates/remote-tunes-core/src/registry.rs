//! Versioned relay destination registry.
//!
//! One registry is shared by every loaded copy of the hook agent in the
//! desktop session, so it holds nothing but two plain atomics and can be
//! placed in a shared data section. Readers never wait: the hook procedure
//! only loads the destination.
//!
//! Writers (register and release) serialise on the sequence word: an odd
//! value means a write is in progress. The generation of a registration is
//! half the sequence value it left behind. A controller that exits releases
//! only the registration it created; if a newer controller registered in
//! the meantime (possibly reusing the same handle value), the release is a
//! no-op.

use crate::RelayDestination;

use std::{
    hint,
    sync::atomic::{AtomicU64, AtomicUsize, Ordering},
};

/// Snapshot of a published destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    destination: RelayDestination,
    generation: u64,
}

impl Registration {
    /// The registered destination.
    pub fn destination(&self) -> RelayDestination {
        self.destination
    }

    /// Generation number assigned at registration.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Cross-instance destination record.
#[repr(C)]
#[derive(Debug)]
pub struct RelayRegistry {
    destination: AtomicUsize,
    sequence: AtomicU64,
}

impl RelayRegistry {
    /// Create an empty registry. Usable in `static` initialisers.
    pub const fn new() -> Self {
        Self {
            destination: AtomicUsize::new(0),
            sequence: AtomicU64::new(0),
        }
    }

    /// Publish `destination`, superseding any previous registration.
    ///
    /// Concurrent registrants are serialised; the last one wins.
    pub fn register(&self, destination: RelayDestination) -> Registration {
        let sequence = self.lock() + 2;
        self.destination.store(destination.get(), Ordering::SeqCst);
        self.sequence.store(sequence, Ordering::SeqCst);
        Registration {
            destination,
            generation: sequence / 2,
        }
    }

    /// The currently published destination, if any.
    pub fn destination(&self) -> Option<RelayDestination> {
        RelayDestination::new(self.destination.load(Ordering::Acquire))
    }

    /// The current registration, if a destination is published.
    pub fn current(&self) -> Option<Registration> {
        loop {
            let before = self.sequence.load(Ordering::SeqCst);
            if before % 2 == 1 {
                hint::spin_loop();
                continue;
            }
            let destination = self.destination.load(Ordering::SeqCst);
            if self.sequence.load(Ordering::SeqCst) == before {
                return RelayDestination::new(destination).map(|destination| Registration {
                    destination,
                    generation: before / 2,
                });
            }
        }
    }

    /// Whether `registration` has not been superseded or released.
    pub fn is_current(&self, registration: &Registration) -> bool {
        self.current() == Some(*registration)
    }

    /// Clear the destination if `registration` is still the current one.
    ///
    /// Returns `true` when the registry was cleared.
    pub fn release(&self, registration: &Registration) -> bool {
        let expected = registration.generation * 2;
        if !self.lock_at(expected) {
            return false;
        }
        self.destination.store(0, Ordering::SeqCst);
        self.sequence.store(expected + 2, Ordering::SeqCst);
        true
    }

    /// Take the writer slot by moving the sequence from even to odd.
    /// Returns the even value taken over.
    fn lock(&self) -> u64 {
        loop {
            let sequence = self.sequence.load(Ordering::SeqCst);
            if sequence % 2 == 0 && self.try_lock(sequence) {
                return sequence;
            }
            hint::spin_loop();
        }
    }

    /// Take the writer slot only while the sequence is still `expected`.
    fn lock_at(&self, expected: u64) -> bool {
        loop {
            let sequence = self.sequence.load(Ordering::SeqCst);
            if sequence % 2 == 1 {
                hint::spin_loop();
                continue;
            }
            if sequence != expected {
                return false;
            }
            if self.try_lock(sequence) {
                return true;
            }
        }
    }

    fn try_lock(&self, sequence: u64) -> bool {
        self.sequence
            .compare_exchange_weak(sequence, sequence + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl Default for RelayRegistry {
    fn default() -> Self {
        Self::new()
    }
}
