use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use tracing::{debug, debug_span, error, info};

use crate::{
    front_matter,
    report::Report,
    source::{ContentSource, SourceFile},
};

/// How long an ingested listing is served before it is rebuilt.
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(3600);

/// Output of one regeneration cycle: the reports plus how long they stay
/// valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Regeneration {
    pub reports: Vec<Report>,
    /// Serialized as whole seconds.
    #[serde(serialize_with = "as_secs")]
    pub revalidate: Duration,
}

fn as_secs<S: Serializer>(
    value: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

/// Retrieve every report from `source`.
///
/// Never fails. When the listing cannot be retrieved the error is logged
/// and an empty list is returned, so callers render "no reports" instead
/// of an error.
pub async fn ingest<S: ContentSource>(source: &S) -> Vec<Report> {
    ingest_at(source, Utc::now()).await
}

/// Like [`ingest`], with an explicit timestamp for reports lacking a date.
pub async fn ingest_at<S: ContentSource>(
    source: &S,
    now: DateTime<Utc>,
) -> Vec<Report> {
    match source.list_files().await {
        Ok(files) => normalize_files(&files, now),
        Err(e) => {
            error!(error = %e, "error fetching reports");
            Vec::new()
        }
    }
}

/// Turn retrieved files into reports, in listing order.
///
/// Files without content are skipped; every other file yields exactly one
/// report.
pub fn normalize_files(files: &[SourceFile], now: DateTime<Utc>) -> Vec<Report> {
    let ingested_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);

    let reports: Vec<Report> = files
        .iter()
        .filter_map(|file| {
            let Some(content) = file.content.as_deref() else {
                debug!(file = %file.name, "no content retrieved, skipping");
                return None;
            };
            let _span = debug_span!("report", file = %file.name).entered();
            let front_matter = front_matter::parse(content);
            Some(Report::from_front_matter(
                &file.name,
                &front_matter.data,
                &ingested_at,
            ))
        })
        .collect();

    info!(
        files = files.len(),
        reports = reports.len(),
        "ingested reports"
    );
    reports
}

/// Run one regeneration cycle.
pub async fn rebuild<S: ContentSource>(
    source: &S,
    revalidate: Duration,
) -> Regeneration {
    Regeneration {
        reports: ingest(source).await,
        revalidate,
    }
}
