//! Prometheus metrics for the filedrop server.
//!
//! The `/metrics` endpoint is unauthenticated. It only exposes aggregate
//! counters (no filenames or ids), but should still be kept off public networks.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static FILES_UPLOADED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("filedrop_files_uploaded_total", "Total number of files uploaded")
        .expect("metric creation failed")
});

pub static BYTES_UPLOADED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("filedrop_bytes_uploaded_total", "Total bytes uploaded")
        .expect("metric creation failed")
});

pub static FILES_DOWNLOADED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "filedrop_files_downloaded_total",
        "Total number of downloads started",
    )
    .expect("metric creation failed")
});

pub static FILES_DELETED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("filedrop_files_deleted_total", "Total number of files deleted")
        .expect("metric creation failed")
});

pub static ORPHANED_RECORDS_REMOVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "filedrop_orphaned_records_removed_total",
        "Total number of records removed by reconciliation because their file was missing",
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        let counters: [&IntCounter; 5] = [
            &FILES_UPLOADED,
            &BYTES_UPLOADED,
            &FILES_DOWNLOADED,
            &FILES_DELETED,
            &ORPHANED_RECORDS_REMOVED,
        ];
        for counter in counters {
            REGISTRY
                .register(Box::new(counter.clone()))
                .expect("metric registration failed");
        }
    });
}

/// GET /metrics - Prometheus text exposition.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}
