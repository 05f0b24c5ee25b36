//! Keyword search and sentiment filters.

use crate::api::{Excerpt, FilteredExcerpts, Sentiment};
use crate::core::excerpts::{EMPTY_KEYWORD_MESSAGE, FILTER_FAILED_MESSAGE};
use crate::core::{ActiveView, Dashboard, ExcerptQuery};
use crate::tests::mocks::{server_error, MockBackend};

fn excerpt(content: &str) -> Excerpt {
    Excerpt {
        id: None,
        content: content.to_string(),
        sentiment: Some(Sentiment::Positive),
    }
}

#[tokio::test]
async fn test_empty_positive_filter_shows_no_sections() {
    let mut backend = MockBackend::new();
    backend
        .expect_filter_by_sentiment()
        .times(1)
        .returning(|sentiment| {
            assert_eq!(sentiment, Sentiment::Positive);
            Ok(FilteredExcerpts::default())
        });

    let mut dashboard = Dashboard::new();
    let count = dashboard
        .run_excerpts(&backend, ExcerptQuery::Sentiment(Sentiment::Positive))
        .await
        .unwrap();

    assert_eq!(count, 0);
    assert_eq!(dashboard.active(), &ActiveView::Excerpts);
    assert!(!dashboard.excerpts.show_sentences());
    assert!(!dashboard.excerpts.show_paragraphs());
}

#[tokio::test]
async fn test_keyword_search_trims_and_shows_results() {
    let mut backend = MockBackend::new();
    backend.expect_search_by_keyword().times(1).returning(|keyword| {
        assert_eq!(keyword, "growth");
        Ok(FilteredExcerpts {
            sentences: vec![excerpt("Growth was strong.")],
            paragraphs: Vec::new(),
        })
    });

    let mut dashboard = Dashboard::new();
    dashboard.open_detail("report.pdf");
    let query = ExcerptQuery::keyword("  growth ").unwrap();
    assert_eq!(dashboard.run_excerpts(&backend, query).await.unwrap(), 1);

    assert!(dashboard.excerpts.show_sentences());
    assert!(!dashboard.excerpts.show_paragraphs());
    assert_eq!(dashboard.active(), &ActiveView::Excerpts);
}

#[test]
fn test_blank_keyword_is_rejected_locally() {
    assert_eq!(
        ExcerptQuery::keyword("   ").unwrap_err(),
        EMPTY_KEYWORD_MESSAGE
    );
}

#[tokio::test]
async fn test_failed_filter_keeps_previous_excerpts() {
    let mut backend = MockBackend::new();
    backend
        .expect_filter_by_sentiment()
        .times(1)
        .returning(|_| {
            Ok(FilteredExcerpts {
                sentences: Vec::new(),
                paragraphs: vec![excerpt("A cheerful paragraph.")],
            })
        });
    backend
        .expect_search_by_keyword()
        .times(1)
        .returning(|_| Err(server_error("index rebuilding")));

    let mut dashboard = Dashboard::new();
    dashboard
        .run_excerpts(&backend, ExcerptQuery::Sentiment(Sentiment::Positive))
        .await
        .unwrap();
    let err = dashboard
        .run_excerpts(&backend, ExcerptQuery::keyword("x").unwrap())
        .await
        .unwrap_err();

    assert_ne!(err, FILTER_FAILED_MESSAGE, "keyword failures say so");
    assert!(dashboard.excerpts.show_paragraphs());
    assert_eq!(dashboard.excerpts.error(), Some(err.as_str()));
}
