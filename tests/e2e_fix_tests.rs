//! End-to-end tests for fix operations
//!
//! These run real simulated operations; the shortest template is used to
//! keep the suite reasonably fast. The composite re-projection math is
//! covered by unit tests with a paused clock.

mod common;

use common::TestServer;
use tunedeck_admin_server::backend::{AdminBackend, BackendError, HttpBackend};
use tunedeck_admin_server::fixes::OperationKind;

#[tokio::test]
async fn test_fix_operation_resolves_with_a_report() {
    let server = TestServer::spawn().await;
    let backend = HttpBackend::new(server.base_url.clone());

    let report = backend.run_fix("duplicate_relations").await.unwrap();
    assert_eq!(report.operation, OperationKind::DuplicateRelations);
    assert_eq!(report.counters.fixed, 29);
    assert_eq!(report.counters.errors, 0);
    assert!(!report.message.is_empty());
}

#[tokio::test]
async fn test_unknown_operation_rejects_immediately() {
    let server = TestServer::spawn().await;
    let backend = HttpBackend::new(server.base_url.clone());

    let start = std::time::Instant::now();
    let err = backend.run_fix("defragment_vibes").await.unwrap_err();
    assert!(matches!(err, BackendError::UnknownOperation(_)));
    // rejected before any timer started
    assert!(start.elapsed() < std::time::Duration::from_secs(1));
}

#[tokio::test]
async fn test_certain_fault_maps_to_connection_failure() {
    let server = TestServer::spawn_with_fault_probability(1.0).await;
    let backend = HttpBackend::new(server.base_url.clone());

    let start = std::time::Instant::now();
    let err = backend.run_fix("duplicate_relations").await.unwrap_err();
    assert!(matches!(err, BackendError::ConnectionFailed));
    // the fault is rolled before the timer starts
    assert!(start.elapsed() < std::time::Duration::from_secs(1));
}
