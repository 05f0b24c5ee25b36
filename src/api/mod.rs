//! Backend access: the REST client and the [`DocumentBackend`] seam it implements.

pub mod client;
pub mod error;
pub mod models;

use async_trait::async_trait;

pub use client::{BackendClient, DEFAULT_TIMEOUT};
pub use error::{ApiError, Result};
pub use models::{
    Credentials, DocumentEntry, Excerpt, FilteredExcerpts, LoginResponse, MessageResponse,
    Sentiment, UploadFile, UploadReceipt,
};

/// Operations the analyzer backend offers.
///
/// The TUI and the orchestration layer only talk to this trait, so tests can
/// swap in an in-memory fake.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// `GET /api/documents/user/{user_id}`
    async fn list_documents(&self, user_id: &str) -> Result<Vec<DocumentEntry>>;

    /// `POST /upload` (multipart)
    async fn upload(&self, user_id: &str, files: Vec<UploadFile>) -> Result<UploadReceipt>;

    /// `POST /document/summary`
    async fn summary(&self, filename: &str) -> Result<String>;

    /// `POST /document/keywords`. A missing list decodes as empty.
    async fn keywords(&self, filename: &str) -> Result<Vec<String>>;

    /// `POST /keyword/definition`
    async fn definition(&self, keyword: &str) -> Result<String>;

    /// `POST /search`
    async fn related_articles(&self, keyword: &str) -> Result<Vec<String>>;

    /// `GET /api/filter/sentiment/{label}`
    async fn filter_by_sentiment(&self, sentiment: Sentiment) -> Result<FilteredExcerpts>;

    /// `POST /api/search/keyword`
    async fn search_by_keyword(&self, keyword: &str) -> Result<FilteredExcerpts>;

    /// `POST /register`
    async fn register(&self, credentials: &Credentials) -> Result<MessageResponse>;

    /// `POST /login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    /// `POST /logout`
    async fn logout(&self) -> Result<MessageResponse>;
}
