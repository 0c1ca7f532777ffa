use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Json,
    Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::info;

use crate::{cache::ReportFeed, error::Result, render::Listing};

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

/// `Cache-Control` for responses derived from a listing valid for
/// `revalidate`.
pub fn cache_control(revalidate: Duration) -> String {
    format!(
        "public, s-maxage={}, stale-while-revalidate",
        revalidate.as_secs()
    )
}

pub fn router(feed: Arc<ReportFeed>) -> Router {
    Router::new()
        .route("/api/reports", get(list_reports))
        .route("/api/revalidate", post(revalidate))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(feed)
}

async fn list_reports(
    State(feed): State<Arc<ReportFeed>>,
    Query(params): Query<ListParams>,
) -> Response {
    let reports = feed.reports().await;
    let listing = Listing::new(&reports, &params.q).limit(params.limit);

    (
        [(header::CACHE_CONTROL, cache_control(feed.revalidate()))],
        Json(listing.body()),
    )
        .into_response()
}

async fn revalidate(State(feed): State<Arc<ReportFeed>>) -> Response {
    let regeneration = feed.regenerate().await;
    info!(
        reports = regeneration.reports.len(),
        "listing revalidated on request"
    );

    (
        [(header::CACHE_CONTROL, "no-store".to_string())],
        Json(regeneration),
    )
        .into_response()
}

/// Serve the HTTP API on `addr` until the process is stopped.
pub async fn serve(addr: SocketAddr, feed: ReportFeed) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving reports");
    axum::serve(listener, router(Arc::new(feed))).await?;
    Ok(())
}
