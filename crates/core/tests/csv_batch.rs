//! CSV-to-GLPI integration tests.
//!
//! These tests drive the whole flow through the background worker:
//! template export -> load -> session -> batch -> teardown

mod common;

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use common::FakeGlpi;
use glpi_batch_core::{
    export_template, glpi, load, load_file, spawn_batch, testing::fixtures, GlpiHttpClient,
    TicketingApi,
};

fn api() -> Arc<dyn TicketingApi> {
    Arc::new(
        GlpiHttpClient::with_timeouts(Duration::from_millis(500), Duration::from_millis(500))
            .expect("Failed to build client"),
    )
}

#[tokio::test]
async fn test_template_file_creates_two_tickets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("modelo.csv");
    export_template(&path).unwrap();

    let report = load_file(&path).unwrap();
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rejected_count(), 0);

    let server = FakeGlpi::start().await;
    let api = api();
    let mut session = server.session();
    glpi::begin(api.as_ref(), &mut session).await.unwrap();

    let mut handle = spawn_batch(Arc::clone(&api), session.clone(), report.rows);
    let mut cursors = Vec::new();
    while let Some(progress) = handle.next_progress().await {
        cursors.push(progress.cursor);
    }
    let result = handle.join().await.unwrap();
    glpi::end(api.as_ref(), &mut session).await;

    assert_eq!(cursors, vec![1, 2]);
    assert_eq!(result.success_count, 2);
    assert_eq!(result.created_ticket_ids, vec![1, 2]);

    let tickets = server.tickets();
    assert_eq!(tickets[0].body["input"]["name"], "Problema com impressora");
    assert_eq!(tickets[1].body["input"]["urgency"], 2);
    assert_eq!(server.kills().len(), 1);
}

#[tokio::test]
async fn test_rejected_rows_never_reach_the_server() {
    let text = fixtures::csv(&[
        "12;Valid one;Printer broken;15;3;1",
        "13;Missing description;;15;3;1",
        "abc;Bad requester;Something;15;3;1",
        "14;Valid two;Monitor flickers;16;;",
    ]);
    let report = load(&text).unwrap();
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rejected_count(), 2);

    let server = FakeGlpi::start().await;
    let api = api();
    let mut session = server.session();
    glpi::begin(api.as_ref(), &mut session).await.unwrap();

    let handle = spawn_batch(Arc::clone(&api), session, report.rows);
    let result = handle.join().await.unwrap();

    assert_eq!(result.success_count, 2);
    let tickets = server.tickets();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[1].body["input"]["name"], "Valid two");
    assert_eq!(tickets[1].body["input"]["urgency"], 3);
    assert_eq!(tickets[1].body["input"]["type"], 1);
}

#[tokio::test]
async fn test_cancel_waits_for_in_flight_request() {
    let server = FakeGlpi::start().await;
    // Long client timeout so the slow row completes instead of timing out
    let api: Arc<dyn TicketingApi> = Arc::new(
        GlpiHttpClient::with_timeouts(Duration::from_secs(10), Duration::from_secs(1)).unwrap(),
    );
    let mut session = server.session();
    glpi::begin(api.as_ref(), &mut session).await.unwrap();

    let rows = vec![
        fixtures::row(1, "One [slow]"),
        fixtures::row(2, "Two"),
        fixtures::row(3, "Three"),
    ];
    let handle = spawn_batch(Arc::clone(&api), session, rows);

    // Cancel while the first request is still in flight
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.cancel();
    let result = handle.join().await.unwrap();

    assert!(result.cancelled);
    assert_eq!(result.processed, 1);
    assert_eq!(result.success_count, 1);
    assert_eq!(server.tickets().len(), 1);
}
