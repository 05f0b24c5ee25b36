//! Summary, keywords, definitions and related articles for one document.

use crate::core::detail::{definition_pending_message, NO_KEYWORDS_MESSAGE, SUMMARY_FALLBACK};
use crate::core::{ArticlesView, Dashboard, DefinitionLookup, KeywordsView, SummaryView};
use crate::tests::mocks::{server_error, MockBackend};

#[tokio::test]
async fn test_summary_failure_shows_fallback_and_no_keywords() {
    let mut backend = MockBackend::new();
    backend
        .expect_summary()
        .times(1)
        .returning(|_| Err(server_error("quota exceeded")));
    backend
        .expect_keywords()
        .times(1)
        .returning(|_| Ok(vec!["climate".into()]));

    let mut dashboard = Dashboard::new();
    let panel = dashboard.open_detail("report.pdf");
    panel.fetch_keywords(&backend).await.unwrap();
    assert_eq!(panel.keywords().keywords(), ["climate"]);

    let err = panel.fetch_summary(&backend).await.unwrap_err();

    assert_eq!(err, SUMMARY_FALLBACK);
    assert_eq!(panel.summary(), &SummaryView::Unavailable);
    assert_eq!(panel.summary().text(), Some(SUMMARY_FALLBACK));
    assert!(panel.keywords().keywords().is_empty());
}

#[tokio::test]
async fn test_summary_and_keywords_use_selected_filename() {
    let mut backend = MockBackend::new();
    backend.expect_summary().times(1).returning(|filename| {
        assert_eq!(filename, "report.pdf");
        Ok("A short report.".into())
    });
    backend.expect_keywords().times(1).returning(|filename| {
        assert_eq!(filename, "report.pdf");
        Ok(Vec::new())
    });

    let mut dashboard = Dashboard::new();
    let panel = dashboard.open_detail("report.pdf");
    panel.fetch_summary(&backend).await.unwrap();
    panel.fetch_keywords(&backend).await.unwrap();

    assert_eq!(panel.summary().text(), Some("A short report."));
    assert_eq!(panel.keywords(), &KeywordsView::Empty);
    assert_eq!(panel.keywords().message(), Some(NO_KEYWORDS_MESSAGE));
}

#[tokio::test]
async fn test_cached_definition_makes_no_second_request() {
    let mut backend = MockBackend::new();
    backend.expect_definition().times(1).returning(|keyword| {
        assert_eq!(keyword, "entropy");
        Ok("A measure of disorder.".into())
    });

    let mut dashboard = Dashboard::new();
    let panel = dashboard.open_detail("physics.pdf");
    let first = panel.fetch_definition(&backend, "entropy").await.unwrap();
    let second = panel.fetch_definition(&backend, "entropy").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(panel.definition("entropy"), Some("A measure of disorder."));
}

#[tokio::test]
async fn test_pending_definition_is_not_requested_again() {
    let mut backend = MockBackend::new();
    backend.expect_definition().times(0);

    let mut dashboard = Dashboard::new();
    let panel = dashboard.open_detail("physics.pdf");
    assert_eq!(panel.lookup_definition("entropy"), DefinitionLookup::Fetch);

    let err = panel.fetch_definition(&backend, "entropy").await.unwrap_err();
    assert_eq!(err, definition_pending_message("entropy"));
    assert_eq!(panel.definition("entropy"), None);
}

#[tokio::test]
async fn test_failed_definition_is_retried() {
    let mut backend = MockBackend::new();
    let mut calls = 0;
    backend.expect_definition().times(2).returning(move |_| {
        calls += 1;
        if calls == 1 {
            Err(server_error("dictionary offline"))
        } else {
            Ok("Back online.".into())
        }
    });

    let mut dashboard = Dashboard::new();
    let panel = dashboard.open_detail("a.pdf");
    let err = panel.fetch_definition(&backend, "uptime").await.unwrap_err();
    assert!(err.contains("uptime"));
    assert_eq!(panel.definition("uptime"), None);

    assert_eq!(
        panel.fetch_definition(&backend, "uptime").await.unwrap(),
        "Back online."
    );
}

#[tokio::test]
async fn test_articles_for_keyword() {
    let mut backend = MockBackend::new();
    backend
        .expect_related_articles()
        .times(1)
        .returning(|_| Ok(vec!["https://example.org/entropy".into()]));

    let mut dashboard = Dashboard::new();
    let panel = dashboard.open_detail("physics.pdf");
    assert_eq!(panel.fetch_articles(&backend, "entropy").await.unwrap(), 1);
    assert!(matches!(
        panel.articles(),
        ArticlesView::Loaded { keyword, links } if keyword == "entropy" && links.len() == 1
    ));
}

#[tokio::test]
async fn test_switching_document_discards_stale_results() {
    let mut dashboard = Dashboard::new();
    let stale = dashboard.open_detail("old.pdf").generation();
    let current = dashboard.open_detail("new.pdf").generation();

    assert_ne!(stale, current);
    assert!(dashboard.detail_for(stale).is_none());
    let panel = dashboard.detail_for(current).unwrap();
    assert_eq!(panel.filename(), "new.pdf");
}
