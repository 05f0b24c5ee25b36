//! Per-document detail panel: summary, keywords, definitions, related articles.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::scope::FetchScope;
use crate::api::{self, DocumentBackend};

/// Displayed in place of a summary the backend could not produce.
pub const SUMMARY_FALLBACK: &str = "Failed to fetch summary. Summarization quota reached.";
pub const NO_KEYWORDS_MESSAGE: &str = "No keywords found for this document.";
pub const KEYWORDS_FAILED_MESSAGE: &str = "Failed to fetch keywords.";
pub const NO_ARTICLES_MESSAGE: &str = "No articles found.";
pub const ARTICLES_FAILED_MESSAGE: &str = "Failed to fetch articles. Please try again later.";

pub fn definition_failed_message(keyword: &str) -> String {
    format!("Failed to fetch definition for {keyword}.")
}

pub fn definition_pending_message(keyword: &str) -> String {
    format!("Still looking up {keyword}.")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryView {
    #[default]
    NotLoaded,
    Loading,
    Ready(String),
    /// The fetch failed; the fallback text is shown instead.
    Unavailable,
}

impl SummaryView {
    /// Text to display, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            SummaryView::Ready(text) => Some(text),
            SummaryView::Unavailable => Some(SUMMARY_FALLBACK),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeywordsView {
    #[default]
    NotLoaded,
    Loading,
    Loaded(Vec<String>),
    /// The backend returned no keywords (or no list at all).
    Empty,
    Failed,
}

impl KeywordsView {
    pub fn keywords(&self) -> &[String] {
        match self {
            KeywordsView::Loaded(list) => list,
            _ => &[],
        }
    }

    /// Status line shown instead of a list.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            KeywordsView::Empty => Some(NO_KEYWORDS_MESSAGE),
            KeywordsView::Failed => Some(KEYWORDS_FAILED_MESSAGE),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArticlesView {
    #[default]
    Idle,
    Loading { keyword: String },
    Loaded { keyword: String, links: Vec<String> },
    Failed { keyword: String },
}

impl ArticlesView {
    pub fn keyword(&self) -> Option<&str> {
        match self {
            ArticlesView::Idle => None,
            ArticlesView::Loading { keyword }
            | ArticlesView::Loaded { keyword, .. }
            | ArticlesView::Failed { keyword } => Some(keyword),
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            ArticlesView::Loaded { links, .. } if links.is_empty() => Some(NO_ARTICLES_MESSAGE),
            ArticlesView::Failed { .. } => Some(ARTICLES_FAILED_MESSAGE),
            _ => None,
        }
    }
}

/// What to do when the user asks for a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionLookup {
    /// Already known; no request needed.
    Cached(String),
    /// A request for this keyword is already running.
    Pending,
    /// Caller should fetch it and report back via [`DetailPanel::apply_definition`].
    Fetch,
}

/// State of the panel opened for one document.
///
/// Each operation is split into a `begin_*` step (mark loading) and an
/// `apply_*` step (fold in the backend result) so the TUI can run the request
/// on a background task. The async helpers chain both for direct callers.
#[derive(Debug)]
pub struct DetailPanel {
    filename: String,
    summary: SummaryView,
    keywords: KeywordsView,
    keyword_cursor: usize,
    definitions: HashMap<String, String>,
    pending_definitions: HashSet<String>,
    articles: ArticlesView,
    error: Option<String>,
    scope: FetchScope,
}

impl DetailPanel {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            summary: SummaryView::default(),
            keywords: KeywordsView::default(),
            keyword_cursor: 0,
            definitions: HashMap::new(),
            pending_definitions: HashSet::new(),
            articles: ArticlesView::default(),
            error: None,
            scope: FetchScope::new(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn summary(&self) -> &SummaryView {
        &self.summary
    }

    pub fn keywords(&self) -> &KeywordsView {
        &self.keywords
    }

    pub fn articles(&self) -> &ArticlesView {
        &self.articles
    }

    /// Most recent error for this panel.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn scope(&self) -> &FetchScope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut FetchScope {
        &mut self.scope
    }

    pub fn generation(&self) -> u64 {
        self.scope.generation()
    }

    /// Drop the summary and keyword views (another view took over).
    pub fn clear_views(&mut self) {
        self.summary = SummaryView::NotLoaded;
        self.keywords = KeywordsView::NotLoaded;
        self.keyword_cursor = 0;
    }

    // ── Summary ─────────────────────────────────────────────────────────

    pub fn begin_summary(&mut self) {
        self.summary = SummaryView::Loading;
        self.keywords = KeywordsView::NotLoaded;
        self.keyword_cursor = 0;
        self.error = None;
    }

    /// Fold in a summary result. A failure shows the fallback text and no keywords.
    pub fn apply_summary(&mut self, result: api::Result<String>) -> Result<(), String> {
        self.keywords = KeywordsView::NotLoaded;
        self.keyword_cursor = 0;
        match result {
            Ok(text) => {
                self.summary = SummaryView::Ready(text);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(filename = %self.filename, error = %e, "summary unavailable");
                self.summary = SummaryView::Unavailable;
                self.error = Some(SUMMARY_FALLBACK.to_string());
                Err(SUMMARY_FALLBACK.to_string())
            }
        }
    }

    pub async fn fetch_summary(&mut self, backend: &dyn DocumentBackend) -> Result<(), String> {
        self.begin_summary();
        let result = backend.summary(&self.filename).await;
        self.apply_summary(result)
    }

    // ── Keywords ────────────────────────────────────────────────────────

    pub fn begin_keywords(&mut self) {
        self.keywords = KeywordsView::Loading;
        self.error = None;
    }

    pub fn apply_keywords(&mut self, result: api::Result<Vec<String>>) -> Result<(), String> {
        self.keyword_cursor = 0;
        match result {
            Ok(list) if list.is_empty() => {
                self.keywords = KeywordsView::Empty;
                Ok(())
            }
            Ok(list) => {
                self.keywords = KeywordsView::Loaded(list);
                Ok(())
            }
            Err(e) => {
                warn!(filename = %self.filename, error = %e, "keyword extraction failed");
                self.keywords = KeywordsView::Failed;
                self.error = Some(KEYWORDS_FAILED_MESSAGE.to_string());
                Err(KEYWORDS_FAILED_MESSAGE.to_string())
            }
        }
    }

    pub async fn fetch_keywords(&mut self, backend: &dyn DocumentBackend) -> Result<(), String> {
        self.begin_keywords();
        let result = backend.keywords(&self.filename).await;
        self.apply_keywords(result)
    }

    pub fn selected_keyword(&self) -> Option<&str> {
        self.keywords
            .keywords()
            .get(self.keyword_cursor)
            .map(String::as_str)
    }

    pub fn keyword_cursor(&self) -> usize {
        self.keyword_cursor
    }

    pub fn next_keyword(&mut self) {
        let len = self.keywords.keywords().len();
        if len > 0 {
            self.keyword_cursor = (self.keyword_cursor + 1).min(len - 1);
        }
    }

    pub fn prev_keyword(&mut self) {
        self.keyword_cursor = self.keyword_cursor.saturating_sub(1);
    }

    // ── Definitions ─────────────────────────────────────────────────────

    pub fn definition(&self, keyword: &str) -> Option<&str> {
        self.definitions.get(keyword).map(String::as_str)
    }

    /// Decide whether `keyword` needs a request. Marks it pending when it does.
    pub fn lookup_definition(&mut self, keyword: &str) -> DefinitionLookup {
        if let Some(def) = self.definitions.get(keyword) {
            debug!(keyword, "definition cache hit");
            return DefinitionLookup::Cached(def.clone());
        }
        if !self.pending_definitions.insert(keyword.to_string()) {
            return DefinitionLookup::Pending;
        }
        DefinitionLookup::Fetch
    }

    pub fn apply_definition(
        &mut self,
        keyword: &str,
        result: api::Result<String>,
    ) -> Result<String, String> {
        self.pending_definitions.remove(keyword);
        match result {
            Ok(def) => {
                self.definitions.insert(keyword.to_string(), def.clone());
                Ok(def)
            }
            Err(e) => {
                warn!(keyword, error = %e, "definition lookup failed");
                let message = definition_failed_message(keyword);
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }

    /// Return the cached definition or fetch it once.
    pub async fn fetch_definition(
        &mut self,
        backend: &dyn DocumentBackend,
        keyword: &str,
    ) -> Result<String, String> {
        match self.lookup_definition(keyword) {
            DefinitionLookup::Cached(def) => Ok(def),
            DefinitionLookup::Pending => Err(definition_pending_message(keyword)),
            DefinitionLookup::Fetch => {
                let result = backend.definition(keyword).await;
                self.apply_definition(keyword, result)
            }
        }
    }

    // ── Related articles ────────────────────────────────────────────────

    pub fn begin_articles(&mut self, keyword: &str) {
        self.articles = ArticlesView::Loading {
            keyword: keyword.to_string(),
        };
    }

    pub fn apply_articles(
        &mut self,
        keyword: &str,
        result: api::Result<Vec<String>>,
    ) -> Result<usize, String> {
        if self.articles.keyword() != Some(keyword) {
            debug!(keyword, "dropping articles for a keyword no longer shown");
            return Ok(0);
        }
        match result {
            Ok(links) => {
                let count = links.len();
                self.articles = ArticlesView::Loaded {
                    keyword: keyword.to_string(),
                    links,
                };
                Ok(count)
            }
            Err(e) => {
                warn!(keyword, error = %e, "related articles lookup failed");
                self.articles = ArticlesView::Failed {
                    keyword: keyword.to_string(),
                };
                self.error = Some(ARTICLES_FAILED_MESSAGE.to_string());
                Err(ARTICLES_FAILED_MESSAGE.to_string())
            }
        }
    }

    pub async fn fetch_articles(
        &mut self,
        backend: &dyn DocumentBackend,
        keyword: &str,
    ) -> Result<usize, String> {
        self.begin_articles(keyword);
        let result = backend.related_articles(keyword).await;
        self.apply_articles(keyword, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    fn loaded_panel() -> DetailPanel {
        let mut panel = DetailPanel::new("report.pdf");
        panel
            .apply_keywords(Ok(vec!["alpha".into(), "beta".into()]))
            .unwrap();
        panel
    }

    #[test]
    fn test_summary_failure_shows_fallback_and_hides_keywords() {
        let mut panel = loaded_panel();
        let err = panel.apply_summary(Err(ApiError::server(429, "quota"))).unwrap_err();
        assert_eq!(err, SUMMARY_FALLBACK);
        assert_eq!(panel.summary().text(), Some(SUMMARY_FALLBACK));
        assert_eq!(panel.keywords(), &KeywordsView::NotLoaded);
    }

    #[test]
    fn test_summary_success() {
        let mut panel = DetailPanel::new("a.pdf");
        panel.begin_summary();
        assert_eq!(panel.summary(), &SummaryView::Loading);
        panel.apply_summary(Ok("Short.".into())).unwrap();
        assert_eq!(panel.summary().text(), Some("Short."));
        assert!(panel.error().is_none());
    }

    #[test]
    fn test_empty_keywords() {
        let mut panel = DetailPanel::new("a.pdf");
        panel.apply_keywords(Ok(vec![])).unwrap();
        assert_eq!(panel.keywords().message(), Some(NO_KEYWORDS_MESSAGE));
        assert!(panel.selected_keyword().is_none());
    }

    #[test]
    fn test_keywords_failure() {
        let mut panel = DetailPanel::new("a.pdf");
        let err = panel.apply_keywords(Err(ApiError::server(500, ""))).unwrap_err();
        assert_eq!(err, KEYWORDS_FAILED_MESSAGE);
        assert_eq!(panel.keywords(), &KeywordsView::Failed);
    }

    #[test]
    fn test_keyword_cursor() {
        let mut panel = loaded_panel();
        assert_eq!(panel.selected_keyword(), Some("alpha"));
        panel.next_keyword();
        panel.next_keyword();
        assert_eq!(panel.selected_keyword(), Some("beta"));
        panel.prev_keyword();
        assert_eq!(panel.selected_keyword(), Some("alpha"));
    }

    #[test]
    fn test_definition_lookup_states() {
        let mut panel = loaded_panel();
        assert_eq!(panel.lookup_definition("alpha"), DefinitionLookup::Fetch);
        assert_eq!(panel.lookup_definition("alpha"), DefinitionLookup::Pending);

        panel.apply_definition("alpha", Ok("first letter".into())).unwrap();
        assert_eq!(
            panel.lookup_definition("alpha"),
            DefinitionLookup::Cached("first letter".into())
        );
    }

    #[test]
    fn test_definition_failure_is_not_cached() {
        let mut panel = loaded_panel();
        assert_eq!(panel.lookup_definition("beta"), DefinitionLookup::Fetch);
        let err = panel
            .apply_definition("beta", Err(ApiError::server(500, "")))
            .unwrap_err();
        assert_eq!(err, "Failed to fetch definition for beta.");
        assert!(panel.definition("beta").is_none());
        assert_eq!(panel.lookup_definition("beta"), DefinitionLookup::Fetch);
    }

    #[test]
    fn test_articles_states() {
        let mut panel = loaded_panel();
        panel.begin_articles("alpha");
        assert_eq!(panel.articles().keyword(), Some("alpha"));

        assert_eq!(panel.apply_articles("alpha", Ok(vec![])), Ok(0));
        assert_eq!(panel.articles().message(), Some(NO_ARTICLES_MESSAGE));

        panel.begin_articles("beta");
        let err = panel
            .apply_articles("beta", Err(ApiError::server(502, "")))
            .unwrap_err();
        assert_eq!(err, ARTICLES_FAILED_MESSAGE);
    }

    #[test]
    fn test_articles_for_old_keyword_are_dropped() {
        let mut panel = loaded_panel();
        panel.begin_articles("alpha");
        panel.begin_articles("beta");
        assert_eq!(
            panel.apply_articles("alpha", Ok(vec!["https://a".into()])),
            Ok(0)
        );
        assert!(matches!(panel.articles(), ArticlesView::Loading { .. }));
    }

    #[test]
    fn test_clear_views() {
        let mut panel = loaded_panel();
        panel.apply_summary(Ok("s".into())).unwrap();
        panel.clear_views();
        assert_eq!(panel.summary(), &SummaryView::NotLoaded);
        assert_eq!(panel.keywords(), &KeywordsView::NotLoaded);
    }
}
