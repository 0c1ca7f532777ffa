use std::{path::PathBuf, time::Duration};

use crate::{
    error::{Error, Result},
    github::GitHubSource,
    source::{LocalDirSource, Source},
};

pub const DEFAULT_REPORTS_PATH: &str = "reports";
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_REVALIDATE_SECS: u64 = 3600;

pub const REPO_ENV_VAR: &str = "REPORTDECK_REPO";
pub const PATH_ENV_VAR: &str = "REPORTDECK_PATH";
pub const BRANCH_ENV_VAR: &str = "REPORTDECK_BRANCH";
pub const SOURCE_DIR_ENV_VAR: &str = "REPORTDECK_SOURCE_DIR";
pub const REVALIDATE_ENV_VAR: &str = "REPORTDECK_REVALIDATE";
pub const API_ENV_VAR: &str = "REPORTDECK_GITHUB_API";
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Values given explicitly on the command line. They win over the
/// environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repo: Option<String>,
    pub path: Option<String>,
    pub branch: Option<String>,
    pub source_dir: Option<PathBuf>,
    pub revalidate: Option<u64>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    pub owner: String,
    pub repo: String,
    /// Directory inside the repository holding the report files.
    pub path: String,
    /// Branch, tag or commit. `None` uses the repository default.
    pub branch: Option<String>,
    pub token: Option<String>,
    pub api_base: String,
}

impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("branch", &self.branch)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSettings {
    GitHub(GitHubSettings),
    Local(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: SourceSettings,
    /// How long an ingested listing stays valid before the next access
    /// re-ingests it.
    pub revalidate: Duration,
}

impl Settings {
    /// Resolve settings from, in order of priority:
    /// 1. Explicit overrides (command-line flags)
    /// 2. `REPORTDECK_*` environment variables (`GITHUB_TOKEN` for auth)
    /// 3. Built-in defaults
    ///
    /// A source directory, when present, takes precedence over a repository.
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let revalidate = match overrides.revalidate {
            Some(secs) => secs,
            None => match env(REVALIDATE_ENV_VAR) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    Error::Config(format!(
                        "{REVALIDATE_ENV_VAR} must be a number of seconds, got '{raw}'"
                    ))
                })?,
                None => DEFAULT_REVALIDATE_SECS,
            },
        };

        let source_dir = overrides
            .source_dir
            .clone()
            .or_else(|| env(SOURCE_DIR_ENV_VAR).map(PathBuf::from));

        let source = if let Some(dir) = source_dir {
            SourceSettings::Local(dir)
        } else {
            let repo_ref = overrides
                .repo
                .clone()
                .or_else(|| env(REPO_ENV_VAR))
                .ok_or_else(|| {
                    Error::Config(format!(
                        "no report source configured: pass --repo owner/name \
                         or --source-dir, or set {REPO_ENV_VAR}"
                    ))
                })?;
            let (owner, repo) = parse_repo(&repo_ref)?;

            SourceSettings::GitHub(GitHubSettings {
                owner,
                repo,
                path: overrides
                    .path
                    .clone()
                    .or_else(|| env(PATH_ENV_VAR))
                    .unwrap_or_else(|| DEFAULT_REPORTS_PATH.to_string()),
                branch: overrides.branch.clone().or_else(|| env(BRANCH_ENV_VAR)),
                token: env(TOKEN_ENV_VAR).filter(|t| !t.is_empty()),
                api_base: env(API_ENV_VAR)
                    .unwrap_or_else(|| DEFAULT_GITHUB_API.to_string()),
            })
        };

        Ok(Self {
            source,
            revalidate: Duration::from_secs(revalidate),
        })
    }

    /// Build the content source these settings point at.
    pub fn open_source(&self) -> Result<Source> {
        Ok(match &self.source {
            SourceSettings::GitHub(gh) => {
                Source::GitHub(GitHubSource::new(gh.clone())?)
            }
            SourceSettings::Local(dir) => {
                Source::Local(LocalDirSource::new(dir.clone()))
            }
        })
    }
}

fn parse_repo(repo_ref: &str) -> Result<(String, String)> {
    match repo_ref.trim().split_once('/') {
        Some((owner, repo))
            if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
        {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(Error::Config(format!(
            "repository must look like owner/name, got '{repo_ref}'"
        ))),
    }
}
