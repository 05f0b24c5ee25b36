//! Staging and submitting uploads.

use std::path::PathBuf;

use crate::api::{UploadFile, UploadReceipt};
use crate::auth::SessionStore;
use crate::core::uploader::{NOT_SIGNED_IN_MESSAGE, NO_FILES_MESSAGE};
use crate::core::{Dashboard, UploadError, Uploader};
use crate::tests::mocks::{entry, server_error, signed_in_session, MockBackend, TEST_SUBJECT};

fn staged(name: &str) -> Uploader {
    let mut uploader = Uploader::new();
    uploader.stage(
        PathBuf::from(format!("/tmp/{name}")),
        UploadFile::new(name, b"%PDF-1.7".to_vec()),
    );
    uploader
}

#[tokio::test]
async fn test_submit_without_files_makes_no_request() {
    let mut backend = MockBackend::new();
    backend.expect_upload().never();

    let mut uploader = Uploader::new();
    let err = uploader
        .submit(&backend, &signed_in_session())
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::NoFiles));
    assert_eq!(err.to_string(), NO_FILES_MESSAGE);
}

#[tokio::test]
async fn test_submit_without_user_makes_no_request() {
    let mut backend = MockBackend::new();
    backend.expect_upload().never();

    let mut uploader = staged("report.pdf");
    let err = uploader
        .submit(&backend, &SessionStore::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), NOT_SIGNED_IN_MESSAGE);
    assert_eq!(uploader.staged().len(), 1, "selection survives the refusal");
}

#[tokio::test]
async fn test_upload_appends_pending_row() {
    let mut backend = MockBackend::new();
    backend.expect_upload().times(1).returning(|user_id, files| {
        assert_eq!(user_id, TEST_SUBJECT);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "report.pdf");
        assert_eq!(files[0].mime_type, "application/pdf");
        Ok(UploadReceipt {
            queued: vec!["report.pdf".into()],
            message: Some("File(s) uploaded: report.pdf".into()),
        })
    });

    let mut dashboard = Dashboard::new();
    dashboard.documents.replace(vec![entry("old.txt", None)]);
    let mut uploader = staged("report.pdf");

    let receipt = uploader
        .submit(&backend, &signed_in_session())
        .await
        .unwrap();
    assert_eq!(dashboard.apply_upload(&receipt), 1);

    let docs = dashboard.documents.documents();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1].filename, "report.pdf");
    assert_eq!(docs[1].sentiment, None);
    assert!(uploader.is_empty());
    assert!(!uploader.is_uploading());
}

#[tokio::test]
async fn test_rejected_upload_keeps_selection_and_reports_server_message() {
    let mut backend = MockBackend::new();
    backend
        .expect_upload()
        .times(1)
        .returning(|_, _| Err(server_error("Unsupported file type")));

    let mut uploader = staged("movie.mkv");
    let err = uploader
        .submit(&backend, &signed_in_session())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Unsupported file type");
    assert_eq!(uploader.staged().len(), 1);
    assert!(!uploader.is_uploading());
}

#[tokio::test]
async fn test_staging_reads_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let mut uploader = Uploader::new();
    let file = uploader.add_path(&path).await.unwrap();
    assert_eq!(file.file.file_name, "notes.txt");
    assert_eq!(file.file.mime_type, "text/plain");
    assert_eq!(uploader.total_bytes(), 5);

    let missing = uploader.add_path(dir.path().join("gone.pdf")).await;
    assert!(matches!(missing, Err(UploadError::Read { .. })));
}
