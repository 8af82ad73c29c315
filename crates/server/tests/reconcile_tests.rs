//! Integration tests for orphaned record reconciliation.

mod common;

use bytes::Bytes;
use common::TestServer;
use filedrop_core::FileId;
use filedrop_server::{ReconcileStats, reconcile_orphans};
use std::path::PathBuf;

/// Store a file and record it, the way the upload handler does.
async fn add_file(server: &TestServer, filename: &str) -> (FileId, PathBuf) {
    let path = server
        .storage()
        .save(filename, Bytes::from(filename.to_string()))
        .await
        .unwrap();
    let id = server
        .metadata()
        .insert_file(filename, &path.to_string_lossy())
        .await
        .unwrap();
    (id, path)
}

async fn run(server: &TestServer) -> ReconcileStats {
    reconcile_orphans(server.metadata().as_ref(), server.storage().as_ref())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_reconcile_empty_store() {
    let server = TestServer::new().await;

    let stats = run(&server).await;
    assert_eq!(stats, ReconcileStats::default());
}

#[tokio::test]
async fn test_reconcile_removes_exactly_the_orphans() {
    let server = TestServer::new().await;

    let mut files = Vec::new();
    for i in 0..6 {
        files.push(add_file(&server, &format!("file-{i}.txt")).await);
    }
    for (_, path) in files.iter().filter(|(id, _)| id.get() % 2 == 0) {
        std::fs::remove_file(path).unwrap();
    }

    let before = server.metadata().list_file_records().await.unwrap();
    let stats = run(&server).await;

    assert_eq!(stats.records_scanned, 6);
    assert_eq!(stats.records_removed, 3);
    assert_eq!(stats.errors, 0);

    let after = server.metadata().list_file_records().await.unwrap();
    let expected: Vec<_> = before
        .into_iter()
        .filter(|record| record.id.get() % 2 != 0)
        .collect();
    assert_eq!(after, expected);
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let server = TestServer::new().await;

    let (_, path) = add_file(&server, "a.txt").await;
    add_file(&server, "b.txt").await;
    std::fs::remove_file(&path).unwrap();

    let first = run(&server).await;
    assert_eq!(first.records_removed, 1);

    let second = run(&server).await;
    assert_eq!(second.records_scanned, 1);
    assert_eq!(second.records_removed, 0);
}

#[tokio::test]
async fn test_reconcile_leaves_files_alone() {
    let server = TestServer::new().await;

    add_file(&server, "recorded.txt").await;
    let stray = server.upload_dir().join("stray.txt");
    std::fs::write(&stray, b"no record").unwrap();

    let stats = run(&server).await;
    assert_eq!(stats.records_removed, 0);
    assert!(stray.exists());
    assert_eq!(server.upload_dir_len(), 2);
}

#[tokio::test]
async fn test_reconcile_skips_records_that_fail_to_check() {
    let (server, faulty) = TestServer::with_faulty_storage().await;

    let (unchecked_id, unchecked_path) = add_file(&server, "unchecked.txt").await;
    let (_, orphan_path) = add_file(&server, "orphan.txt").await;
    std::fs::remove_file(&unchecked_path).unwrap();
    std::fs::remove_file(&orphan_path).unwrap();
    faulty.fail_exists_for(&unchecked_path);

    let stats = run(&server).await;
    assert_eq!(stats.records_scanned, 2);
    assert_eq!(stats.records_removed, 1);
    assert_eq!(stats.errors, 1);

    let remaining = server.metadata().list_file_records().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, unchecked_id);
}
