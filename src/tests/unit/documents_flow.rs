//! Sign-in, document list fetch, and refresh failure handling.

use crate::api::Sentiment;
use crate::auth::AuthError;
use crate::core::Dashboard;
use crate::tests::mocks::{entry, server_error, signed_out_gate, test_token, MockBackend, TEST_SUBJECT};

#[tokio::test]
async fn test_sign_in_fetches_documents_for_subject_id() {
    let mut backend = MockBackend::new();
    backend
        .expect_list_documents()
        .times(1)
        .returning(|user_id| {
            assert_eq!(user_id, TEST_SUBJECT);
            Ok(vec![
                entry("a.pdf", Some(Sentiment::Positive)),
                entry("b.pdf", None),
            ])
        });

    let gate = signed_out_gate();
    let mut dashboard = Dashboard::new();
    let (user, refreshed) = dashboard
        .sign_in(&gate, &backend, &test_token())
        .await
        .unwrap();

    assert_eq!(user.subject_id, TEST_SUBJECT);
    assert_eq!(user.display_name(), "Ada Lovelace");
    assert_eq!(refreshed.unwrap(), 2);
    assert_eq!(dashboard.documents.len(), 2);
    assert_eq!(
        dashboard.documents.documents()[0].sentiment,
        Some(Sentiment::Positive)
    );
    assert_eq!(gate.session().user_id().as_deref(), Some(TEST_SUBJECT));
}

#[tokio::test]
async fn test_malformed_token_never_reaches_backend() {
    let mut backend = MockBackend::new();
    backend.expect_list_documents().never();

    let gate = signed_out_gate();
    let mut dashboard = Dashboard::new();
    let err = dashboard
        .sign_in(&gate, &backend, "not-a-token")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::MalformedToken(_)));
    assert!(!gate.session().is_authenticated());
}

#[tokio::test]
async fn test_refresh_failure_keeps_previous_list() {
    let mut backend = MockBackend::new();
    let mut calls = 0;
    backend.expect_list_documents().times(2).returning(move |_| {
        calls += 1;
        if calls == 1 {
            Ok(vec![entry("a.pdf", None), entry("b.pdf", None)])
        } else {
            Err(server_error("database unavailable"))
        }
    });

    let mut dashboard = Dashboard::new();
    dashboard
        .documents
        .refresh(&backend, TEST_SUBJECT)
        .await
        .unwrap();
    let err = dashboard
        .documents
        .refresh(&backend, TEST_SUBJECT)
        .await
        .unwrap_err();

    assert_eq!(err.server_message(), Some("database unavailable"));
    let names: Vec<_> = dashboard
        .documents
        .documents()
        .iter()
        .map(|d| d.filename.as_str())
        .collect();
    assert_eq!(names, ["a.pdf", "b.pdf"]);
}

#[tokio::test]
async fn test_sign_out_forgets_documents() {
    let backend = MockBackend::with_empty_documents();
    let gate = signed_out_gate();
    let mut dashboard = Dashboard::new();
    dashboard.sign_in(&gate, &backend, &test_token()).await.unwrap();
    dashboard.apply_upload(&crate::api::UploadReceipt {
        queued: vec!["notes.txt".into()],
        message: None,
    });

    let user = dashboard.sign_out(&gate);

    assert_eq!(user.map(|u| u.subject_id).as_deref(), Some(TEST_SUBJECT));
    assert!(dashboard.documents.is_empty());
    assert!(gate.session().current().is_none());
}
