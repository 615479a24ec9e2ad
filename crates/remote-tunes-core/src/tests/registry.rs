use crate::{RelayRegistry, tests::fakes::destination};

use std::{sync::Barrier, thread};

/// WHAT: A fresh registry has no destination
/// WHY: The hook must never post to an unset destination
#[test]
fn given_new_registry_when_reading_then_no_destination() {
    // Given: A new registry
    let registry = RelayRegistry::new();

    // When/Then: Nothing is published
    assert_eq!(registry.destination(), None);
    assert_eq!(registry.current(), None);
}

/// WHAT: Registering publishes the destination with a new generation
/// WHY: Every agent copy reads the destination from here
#[test]
fn given_registration_when_reading_then_destination_published() {
    // Given: A registry
    let registry = RelayRegistry::new();

    // When: Registering a destination
    let registration = registry.register(destination(0x10));

    // Then: It is current and visible
    assert_eq!(registry.destination(), Some(destination(0x10)));
    assert!(registry.is_current(&registration));
    assert_eq!(registration.generation(), 1);
}

/// WHAT: The last registrant wins
/// WHY: Two controllers racing at startup must not corrupt the record
#[test]
fn given_two_registrations_when_reading_then_last_writer_wins() {
    // Given: Two controllers registering in turn
    let registry = RelayRegistry::new();
    let first = registry.register(destination(0x10));
    let second = registry.register(destination(0x20));

    // When/Then: The second is current, the first is stale
    assert_eq!(registry.destination(), Some(destination(0x20)));
    assert!(!registry.is_current(&first));
    assert!(registry.is_current(&second));
    assert!(second.generation() > first.generation());
}

/// WHAT: A superseded registrant cannot clear the newer registration
/// WHY: A controller exiting late must not unregister its successor
#[test]
fn given_superseded_registration_when_releasing_then_newer_kept() {
    // Given: A registration superseded by another controller
    let registry = RelayRegistry::new();
    let stale = registry.register(destination(0x10));
    registry.register(destination(0x20));

    // When: The stale registrant releases
    let released = registry.release(&stale);

    // Then: Nothing changes
    assert!(!released);
    assert_eq!(registry.destination(), Some(destination(0x20)));
}

/// WHAT: A reused handle value from an older generation cannot clear the record
/// WHY: Window handles are recycled by the OS
#[test]
fn given_reused_handle_value_when_stale_release_then_newer_kept() {
    // Given: Two registrations with the same handle value
    let registry = RelayRegistry::new();
    let stale = registry.register(destination(0x10));
    let current = registry.register(destination(0x10));

    // When: The older one releases
    let released = registry.release(&stale);

    // Then: The newer one is still current
    assert!(!released);
    assert!(registry.is_current(&current));
}

/// WHAT: The current registrant clears the record on release
/// WHY: Stale destinations become detectable after a clean shutdown
#[test]
fn given_current_registration_when_releasing_then_cleared() {
    // Given: A current registration
    let registry = RelayRegistry::new();
    let registration = registry.register(destination(0x10));

    // When: Releasing it twice
    let first = registry.release(&registration);
    let second = registry.release(&registration);

    // Then: The first clears, the second is a no-op
    assert!(first);
    assert!(!second);
    assert_eq!(registry.destination(), None);
    assert!(!registry.is_current(&registration));
}

/// WHAT: A stale release racing a re-registration of the same handle never clears the newer one
/// WHY: Controllers starting and exiting at once must not unregister each other
#[test]
#[allow(clippy::unwrap_used)]
fn given_stale_release_racing_same_handle_registration_when_both_finish_then_newer_current() {
    for _ in 0..2_000 {
        // Given: An earlier registration and a controller about to reuse its handle
        let registry = RelayRegistry::new();
        let earlier = registry.register(destination(0x10));
        let barrier = Barrier::new(2);

        // When: Release and re-register run concurrently
        let newer = thread::scope(|scope| {
            let registering = scope.spawn(|| {
                barrier.wait();
                registry.register(destination(0x10))
            });
            scope.spawn(|| {
                barrier.wait();
                registry.release(&earlier)
            });
            registering.join().unwrap()
        });

        // Then: Whatever the interleaving, the newer registration survives
        assert!(registry.is_current(&newer));
        assert_eq!(registry.destination(), Some(destination(0x10)));
    }
}
