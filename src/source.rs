use std::{
    future::Future,
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use crate::{
    error::{Error, Result},
    github::GitHubSource,
};

/// One entry of a report directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name, e.g. `2024-report.md`.
    pub name: String,
    /// Raw file text. `None` when the file was listed but could not be read.
    pub content: Option<String>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Some(content.into()),
        }
    }

    pub fn unreadable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: None,
        }
    }
}

/// Somewhere report files can be listed and read from.
///
/// An `Err` means the listing itself could not be retrieved. Individual
/// files that fail to read are returned with `content: None`.
pub trait ContentSource: Send + Sync {
    fn list_files(&self) -> impl Future<Output = Result<Vec<SourceFile>>> + Send;
}

/// Reads the Markdown files of a single local directory.
#[derive(Debug, Clone)]
pub struct LocalDirSource {
    root: PathBuf,
}

impl LocalDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for LocalDirSource {
    async fn list_files(&self) -> Result<Vec<SourceFile>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || read_markdown_dir(&root))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }
}

/// The configured source, picked at startup from [`crate::settings::Settings`].
#[derive(Debug)]
pub enum Source {
    GitHub(GitHubSource),
    Local(LocalDirSource),
}

impl ContentSource for Source {
    async fn list_files(&self) -> Result<Vec<SourceFile>> {
        match self {
            Source::GitHub(source) => source.list_files().await,
            Source::Local(source) => source.list_files().await,
        }
    }
}

pub(crate) fn is_report_file(name: &str) -> bool {
    !name.starts_with('.') && name.ends_with(".md")
}

/// List `*.md` files directly under `root` in name order and read them.
///
/// Hidden files and subdirectories are skipped. A missing or unreadable
/// directory is an error; an unreadable file is not.
fn read_markdown_dir(root: &Path) -> Result<Vec<SourceFile>> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let path = entry.path();

        if is_report_file(&name) && path.is_file() {
            entries.push((name, path));
        }
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));

    // Read in parallel; collect() keeps the sorted order.
    Ok(entries
        .into_par_iter()
        .map(|(name, path)| match std::fs::read_to_string(&path) {
            Ok(content) => SourceFile::new(name, content),
            Err(e) => {
                tracing::debug!(file = %name, error = %e, "could not read report file");
                SourceFile::unreadable(name)
            }
        })
        .collect())
}
