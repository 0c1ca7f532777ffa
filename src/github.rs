use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url, header::ACCEPT};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    settings::GitHubSettings,
    source::{ContentSource, SourceFile, is_report_file},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// An entry returned by the repository contents API.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

/// Reads report files from one directory of a GitHub repository.
///
/// The directory is listed through the contents API and every Markdown file
/// in it is then fetched from its raw download URL.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    client: Client,
    settings: GitHubSettings,
}

impl GitHubSource {
    pub fn new(settings: GitHubSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("reportdeck/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, settings })
    }

    /// The contents API URL for the configured directory.
    pub fn listing_url(&self) -> Result<Url> {
        let s = &self.settings;
        let raw = format!(
            "{}/repos/{}/{}/contents/{}",
            s.api_base.trim_end_matches('/'),
            s.owner,
            s.repo,
            s.path.trim_matches('/'),
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| Error::Config(format!("invalid GitHub URL {raw}: {e}")))?;
        if let Some(branch) = &s.branch {
            url.query_pairs_mut().append_pair("ref", branch);
        }
        Ok(url)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url).header(ACCEPT, GITHUB_MEDIA_TYPE);
        match &self.settings.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn list_entries(&self) -> Result<Vec<ContentEntry>> {
        let url = self.listing_url()?;
        let response = self.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }

    /// Fetch one file. Failures are logged and reported as `None` so a
    /// single bad file never sinks the whole listing.
    async fn read_entry(&self, entry: &ContentEntry) -> Option<String> {
        let Some(url) = entry.download_url.as_deref() else {
            debug!(file = %entry.name, "entry has no download URL");
            return None;
        };

        let response = match self.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(file = %entry.name, error = %e, "failed to fetch report file");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                file = %entry.name,
                status = response.status().as_u16(),
                "failed to fetch report file"
            );
            return None;
        }

        match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(file = %entry.name, error = %e, "failed to read report body");
                None
            }
        }
    }
}

impl ContentSource for GitHubSource {
    async fn list_files(&self) -> Result<Vec<SourceFile>> {
        let entries = self.list_entries().await?;
        let mut files = Vec::new();

        for entry in entries
            .iter()
            .filter(|e| e.kind == "file" && is_report_file(&e.name))
        {
            let content = self.read_entry(entry).await;
            files.push(SourceFile {
                name: entry.name.clone(),
                content,
            });
        }

        debug!(
            listed = entries.len(),
            reports = files.len(),
            "listed repository reports"
        );
        Ok(files)
    }
}
