use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    ingestion::{self, Regeneration},
    report::Report,
    source::{ContentSource, Source},
};

/// One ingested listing and when it was built.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub reports: Arc<[Report]>,
    pub generated_at: Instant,
}

impl Snapshot {
    pub fn age(&self) -> Duration {
        self.generated_at.elapsed()
    }

    pub fn is_stale(&self, window: Duration) -> bool {
        self.age() >= window
    }
}

/// Holds the current report listing and rebuilds it once it is older than
/// the revalidation window.
///
/// The listing is only ever replaced as a whole. Refreshes are serialized,
/// so concurrent readers hitting a stale cache trigger a single ingestion.
#[derive(Debug)]
pub struct ReportCache {
    revalidate: Duration,
    snapshot: Mutex<Option<Snapshot>>,
}

impl ReportCache {
    pub fn new(revalidate: Duration) -> Self {
        Self {
            revalidate,
            snapshot: Mutex::new(None),
        }
    }

    pub fn revalidate(&self) -> Duration {
        self.revalidate
    }

    /// Current listing, ingesting first if there is none or it is stale.
    pub async fn get<S: ContentSource>(&self, source: &S) -> Arc<[Report]> {
        let mut snapshot = self.snapshot.lock().await;

        if let Some(current) = snapshot.as_ref()
            && !current.is_stale(self.revalidate)
        {
            return Arc::clone(&current.reports);
        }

        debug!(
            window_secs = self.revalidate.as_secs(),
            "listing missing or stale, ingesting"
        );
        let reports: Arc<[Report]> = ingestion::ingest(source).await.into();
        *snapshot = Some(Snapshot {
            reports: Arc::clone(&reports),
            generated_at: Instant::now(),
        });
        reports
    }

    /// Ingest now regardless of the snapshot age.
    pub async fn refresh<S: ContentSource>(&self, source: &S) -> Arc<[Report]> {
        let mut snapshot = self.snapshot.lock().await;
        let reports: Arc<[Report]> = ingestion::ingest(source).await.into();
        *snapshot = Some(Snapshot {
            reports: Arc::clone(&reports),
            generated_at: Instant::now(),
        });
        reports
    }

    /// Drop the snapshot so the next [`ReportCache::get`] ingests.
    pub async fn invalidate(&self) {
        *self.snapshot.lock().await = None;
    }

    /// Age of the current snapshot, if any.
    pub async fn age(&self) -> Option<Duration> {
        self.snapshot.lock().await.as_ref().map(Snapshot::age)
    }
}

/// A content source paired with its cached listing. This is what the
/// long-running servers hold.
#[derive(Debug)]
pub struct ReportFeed<S = Source> {
    source: S,
    cache: ReportCache,
}

impl<S: ContentSource> ReportFeed<S> {
    pub fn new(source: S, revalidate: Duration) -> Self {
        Self {
            source,
            cache: ReportCache::new(revalidate),
        }
    }

    pub fn revalidate(&self) -> Duration {
        self.cache.revalidate()
    }

    pub async fn reports(&self) -> Arc<[Report]> {
        self.cache.get(&self.source).await
    }

    /// Force a regeneration cycle and return its output.
    pub async fn regenerate(&self) -> Regeneration {
        let reports = self.cache.refresh(&self.source).await;
        Regeneration {
            reports: reports.to_vec(),
            revalidate: self.revalidate(),
        }
    }
}
