//! reportdeck - a searchable listing of Markdown reports.
//!
//! Reports are Markdown files with YAML front-matter kept in one directory
//! of a GitHub repository (or a local directory). Each regeneration cycle
//! reads every file, normalizes its metadata into a [`Report`], and caches
//! the listing for a revalidation window. Searching is a case-insensitive
//! substring match over title, description, author and tags.
//!
//! # Quick start
//!
//! ```no_run
//! use reportdeck::{LocalDirSource, ingestion, render::Listing};
//!
//! # async fn run() {
//! let source = LocalDirSource::new("reports");
//! let reports = ingestion::ingest(&source).await;
//!
//! let listing = Listing::new(&reports, "outage");
//! for report in &listing.results {
//!     println!("{} by {}", report.title, report.author);
//! }
//! if let Some(message) = listing.empty_state() {
//!     println!("{message}");
//! }
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod error;
pub mod filter;
pub mod front_matter;
pub mod github;
pub mod ingestion;
pub mod mcp;
pub mod render;
pub mod report;
pub mod server;
pub mod settings;
pub mod source;

pub use cache::{ReportCache, ReportFeed};
pub use error::{Error, Result};
pub use github::GitHubSource;
pub use report::Report;
pub use settings::Settings;
pub use source::{ContentSource, LocalDirSource, Source, SourceFile};
