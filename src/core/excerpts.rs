//! Keyword search and sentiment filter over the user's excerpts.

use std::fmt;

use tracing::{info, warn};

use crate::api::{self, DocumentBackend, FilteredExcerpts, Sentiment};

pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search by keyword. Please try again later.";
pub const FILTER_FAILED_MESSAGE: &str = "Failed to fetch filtered data. Please try again later.";
pub const EMPTY_KEYWORD_MESSAGE: &str = "Enter a keyword to search for.";

/// What produced the excerpts on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcerptQuery {
    Keyword(String),
    Sentiment(Sentiment),
}

impl ExcerptQuery {
    /// Build a keyword query, rejecting blank input.
    pub fn keyword(raw: &str) -> Result<Self, String> {
        let keyword = raw.trim();
        if keyword.is_empty() {
            return Err(EMPTY_KEYWORD_MESSAGE.to_string());
        }
        Ok(ExcerptQuery::Keyword(keyword.to_string()))
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            ExcerptQuery::Keyword(_) => SEARCH_FAILED_MESSAGE,
            ExcerptQuery::Sentiment(_) => FILTER_FAILED_MESSAGE,
        }
    }

    pub async fn run(&self, backend: &dyn DocumentBackend) -> api::Result<FilteredExcerpts> {
        match self {
            ExcerptQuery::Keyword(keyword) => backend.search_by_keyword(keyword).await,
            ExcerptQuery::Sentiment(sentiment) => backend.filter_by_sentiment(*sentiment).await,
        }
    }
}

impl fmt::Display for ExcerptQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcerptQuery::Keyword(k) => write!(f, "keyword \"{k}\""),
            ExcerptQuery::Sentiment(s) => write!(f, "{} sentiment", s.label()),
        }
    }
}

/// Sentences and paragraphs matching the latest query.
///
/// A successful result replaces the previous one wholesale. A failure keeps
/// the previous result and records an error.
#[derive(Debug, Default)]
pub struct ExcerptPanel {
    query: Option<ExcerptQuery>,
    results: FilteredExcerpts,
    loading: bool,
    error: Option<String>,
}

impl ExcerptPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> Option<&ExcerptQuery> {
        self.query.as_ref()
    }

    pub fn results(&self) -> &FilteredExcerpts {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show_sentences(&self) -> bool {
        !self.results.sentences.is_empty()
    }

    pub fn show_paragraphs(&self) -> bool {
        !self.results.paragraphs.is_empty()
    }

    pub fn begin(&mut self, query: ExcerptQuery) {
        self.query = Some(query);
        self.loading = true;
    }

    /// Fold in a result. Results for anything but the latest query are ignored.
    pub fn apply(
        &mut self,
        query: &ExcerptQuery,
        result: api::Result<FilteredExcerpts>,
    ) -> Result<usize, String> {
        if self.query.as_ref() != Some(query) {
            return Ok(0);
        }
        self.loading = false;
        match result {
            Ok(results) => {
                let count = results.sentences.len() + results.paragraphs.len();
                info!(%query, count, "excerpts loaded");
                self.results = results;
                self.error = None;
                Ok(count)
            }
            Err(e) => {
                warn!(%query, error = %e, "excerpt query failed");
                let message = query.failure_message().to_string();
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }

    pub async fn run(
        &mut self,
        backend: &dyn DocumentBackend,
        query: ExcerptQuery,
    ) -> Result<usize, String> {
        self.begin(query.clone());
        let result = query.run(backend).await;
        self.apply(&query, result)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
