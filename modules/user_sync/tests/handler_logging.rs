//! Handlers report every outcome through tracing, since callers get nothing back.

mod common;

use tracing_test::traced_test;

use common::{FakeBackend, Faults};
use user_sync::contract::model::ProviderIdentity;

#[tokio::test]
#[traced_test]
async fn create_success_is_logged_with_backend_id() {
    let fake = FakeBackend::new();

    fake.create_handler()
        .handle(&ProviderIdentity::new("abc").with_display_name("Jane"))
        .await;

    assert!(logs_contain("user_sync.create.handle"));
    assert!(logs_contain("Provider user created"));
    assert!(logs_contain("Backend user mirrored and claims assigned"));
    assert!(logs_contain("user_id=u1"));
    assert!(!logs_contain("User create sync failed"));
}

#[tokio::test]
#[traced_test]
async fn create_failure_is_logged_not_raised() {
    let fake = FakeBackend::with_faults(Faults {
        insert_returns_no_row: true,
        ..Faults::default()
    });

    fake.create_handler()
        .handle(&ProviderIdentity::new("abc"))
        .await;

    assert!(logs_contain("User create sync failed"));
    assert!(logs_contain("abc"));
}

#[tokio::test]
#[traced_test]
async fn delete_of_unknown_user_is_logged_as_failure() {
    let fake = FakeBackend::new();

    fake.delete_handler()
        .handle(&ProviderIdentity::new("ghost"))
        .await;

    assert!(logs_contain("user_sync.delete.handle"));
    assert!(logs_contain("Provider user deleted"));
    assert!(logs_contain("User delete sync failed"));
    assert!(logs_contain("ghost"));
}

#[tokio::test]
#[traced_test]
async fn vanished_row_is_a_warning_not_a_failure() {
    let fake = FakeBackend::with_faults(Faults {
        user_row_vanished: true,
        ..Faults::default()
    });
    fake.seed_user("u1", "abc", 0);

    fake.delete_handler()
        .handle(&ProviderIdentity::new("abc"))
        .await;

    assert!(logs_contain("Backend user row was already gone"));
    assert!(logs_contain("Backend user removed"));
    assert!(!logs_contain("User delete sync failed"));
}
