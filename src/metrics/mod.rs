//! Prometheus metrics for lenta.
//!
//! Exposes content and cache collectors and an HTTP handler for the
//! `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

lazy_static! {
    /// Page cache events (hit/miss).
    pub static ref PAGE_CACHE_EVENTS: IntCounterVec = register_int_counter_vec!(
        "page_cache_events_total",
        "Page cache events segmented by outcome",
        &["event"]
    )
    .expect("failed to register page_cache_events_total");

    /// Posts persisted through the new-post and edit flows.
    pub static ref POSTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "posts_created_total",
        "Total posts created"
    )
    .expect("failed to register posts_created_total");

    /// Comments persisted.
    pub static ref COMMENTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "comments_created_total",
        "Total comments created"
    )
    .expect("failed to register comments_created_total");

    /// Follow relation changes (follow/unfollow).
    pub static ref FOLLOW_CHANGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "follow_changes_total",
        "Follow relation changes segmented by action",
        &["action"]
    )
    .expect("failed to register follow_changes_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
