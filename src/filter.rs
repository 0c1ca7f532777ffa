//! Case-insensitive substring search over report fields.
//!
//! A report matches when the lower-cased query occurs in its title,
//! description, author or any one of its tags. There is no tokenization
//! and no ranking: results keep the order of the input.

use crate::report::Report;

/// A search query, lower-cased once so it can be tested against many
/// reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    needle: String,
}

impl Query {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    /// An empty query matches every report.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, report: &Report) -> bool {
        if self.is_empty() {
            return true;
        }

        self.occurs_in(&report.title)
            || self.occurs_in(&report.description)
            || self.occurs_in(&report.author)
            || report.tags.iter().any(|tag| self.occurs_in(tag))
    }

    fn occurs_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }
}

/// Keep the reports matching `query`, preserving their order.
///
/// Accepts anything yielding `&Report`, so a filtered result can be
/// filtered again.
pub fn filter<'a, I>(reports: I, query: &str) -> Vec<&'a Report>
where
    I: IntoIterator<Item = &'a Report>,
{
    let query = Query::new(query);
    reports.into_iter().filter(|r| query.matches(r)).collect()
}
