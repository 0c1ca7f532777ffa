use serde::Serialize;

use crate::{filter, report::Report};

pub const NO_MATCHES: &str = "No reports found matching your search.";
pub const NO_REPORTS: &str = "No reports available.";

/// The filtered view handed to a presentation layer.
#[derive(Debug, Clone)]
pub struct Listing<'a> {
    pub query: String,
    pub results: Vec<&'a Report>,
    /// Number of matching reports before any limit was applied.
    pub total: usize,
}

/// JSON shape of a [`Listing`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingBody<'a> {
    pub query: &'a str,
    pub result_count: usize,
    pub total_count: usize,
    pub results: &'a [&'a Report],
    pub empty_state: Option<&'static str>,
}

impl<'a> Listing<'a> {
    pub fn new(reports: &'a [Report], query: &str) -> Self {
        let results = filter::filter(reports, query);
        Self {
            query: query.to_string(),
            total: results.len(),
            results,
        }
    }

    /// Keep at most `limit` results.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            self.results.truncate(limit);
        }
        self
    }

    pub fn is_searching(&self) -> bool {
        !self.query.is_empty()
    }

    /// Message to show instead of cards when nothing matched. A limit
    /// that hides every match does not count as empty.
    pub fn empty_state(&self) -> Option<&'static str> {
        if self.total > 0 {
            None
        } else if self.is_searching() {
            Some(NO_MATCHES)
        } else {
            Some(NO_REPORTS)
        }
    }

    pub fn body(&self) -> ListingBody<'_> {
        ListingBody {
            query: &self.query,
            result_count: self.results.len(),
            total_count: self.total,
            results: &self.results,
            empty_state: self.empty_state(),
        }
    }
}

/// Render one report as a terminal card.
pub fn format_card(report: &Report) -> String {
    let mut lines = vec![
        report.title.clone(),
        format!("  {} · {}", report.author, report.date),
    ];
    if !report.description.is_empty() {
        lines.push(format!("  {}", report.description));
    }
    if !report.tags.is_empty() {
        lines.push(format!("  tags: {}", report.tags.join(", ")));
    }
    lines.push(format!("  slug: {}", report.slug));
    lines.join("\n")
}

/// Format a listing for human-readable terminal output.
pub fn format_human(listing: &Listing<'_>) -> String {
    if let Some(message) = listing.empty_state() {
        return message.to_string();
    }

    let count = if listing.results.len() < listing.total {
        format!("{} of {} report(s)", listing.results.len(), listing.total)
    } else {
        format!("{} report(s)", listing.total)
    };
    if listing.results.is_empty() {
        return count;
    }

    let cards: Vec<String> =
        listing.results.iter().map(|r| format_card(r)).collect();
    format!("{}\n\n{count}", cards.join("\n\n"))
}

/// One-line-per-report summary used by tool responses.
pub fn format_summary(listing: &Listing<'_>) -> String {
    if let Some(message) = listing.empty_state() {
        return message.to_string();
    }

    let suffix = if listing.total == 1 { "" } else { "s" };
    let mut lines = Vec::with_capacity(listing.results.len() + 1);
    if listing.is_searching() {
        lines.push(format!(
            "Found {} report{suffix} for \"{}\":",
            listing.total,
            listing.query
        ));
    } else {
        lines.push(format!("{} report{suffix}:", listing.total));
    }
    for r in &listing.results {
        lines.push(format!("{} ({}, {})", r.title, r.author, r.slug));
    }
    lines.join("\n")
}
