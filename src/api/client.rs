//! HTTP client for the analyzer backend's REST surface.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::{extract_error_message, ApiError, Result};
use super::models::{
    ArticlesResponse, Credentials, DefinitionResponse, DocumentEntry, FilenameRequest,
    FilteredExcerpts, KeywordRequest, KeywordsResponse, LoginResponse, MessageResponse, Sentiment,
    SummaryResponse, UploadFile, UploadReceipt,
};
use super::DocumentBackend;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the analyzer backend.
///
/// Cheap to clone; the underlying connection pool and cookie jar are shared.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a client for the given backend origin, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::invalid(format!("invalid backend URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::invalid(format!(
                "backend URL '{base_url}' cannot carry a path"
            )));
        }

        // Cookie store keeps the session set by `/login` for `/logout`.
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Backend origin this client talks to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build an endpoint URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "GET");
        let resp = self.http.get(url).send().await?;
        decode(resp).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(url = %url, "POST");
        let resp = self.http.post(url).json(body).send().await?;
        decode(resp).await
    }
}

/// Map a response onto `T`, turning non-2xx statuses into [`ApiError::Server`].
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = extract_error_message(&body);
        warn!(status = status.as_u16(), message = %message, "backend rejected request");
        return Err(ApiError::server(status.as_u16(), message));
    }

    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl DocumentBackend for BackendClient {
    #[instrument(skip(self))]
    async fn list_documents(&self, user_id: &str) -> Result<Vec<DocumentEntry>> {
        let url = self.endpoint(&["api", "documents", "user", user_id]);
        let docs: Vec<DocumentEntry> = self.get_json(url).await?;
        info!(count = docs.len(), "fetched document list");
        Ok(docs)
    }

    #[instrument(skip(self, files), fields(files = files.len()))]
    async fn upload(&self, user_id: &str, files: Vec<UploadFile>) -> Result<UploadReceipt> {
        let url = self.endpoint(&["upload"]);

        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime_type)?;
            form = form.part("file", part);
        }
        form = form.text("userId", user_id.to_string());

        debug!(url = %url, "POST multipart");
        let resp = self.http.post(url).multipart(form).send().await?;
        let body: serde_json::Value = decode(resp).await?;
        let receipt = UploadReceipt::from_json(body);
        info!(queued = receipt.queued.len(), "upload accepted");
        Ok(receipt)
    }

    #[instrument(skip(self))]
    async fn summary(&self, filename: &str) -> Result<String> {
        let url = self.endpoint(&["document", "summary"]);
        let resp: SummaryResponse = self.post_json(url, &FilenameRequest { filename }).await?;
        Ok(resp.summary)
    }

    #[instrument(skip(self))]
    async fn keywords(&self, filename: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["document", "keywords"]);
        let resp: KeywordsResponse = self.post_json(url, &FilenameRequest { filename }).await?;
        Ok(resp.keywords.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn definition(&self, keyword: &str) -> Result<String> {
        let url = self.endpoint(&["keyword", "definition"]);
        let resp: DefinitionResponse = self.post_json(url, &KeywordRequest { keyword }).await?;
        Ok(resp.definition)
    }

    #[instrument(skip(self))]
    async fn related_articles(&self, keyword: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["search"]);
        let resp: ArticlesResponse = self.post_json(url, &KeywordRequest { keyword }).await?;
        Ok(resp.links)
    }

    #[instrument(skip(self))]
    async fn filter_by_sentiment(&self, sentiment: Sentiment) -> Result<FilteredExcerpts> {
        let url = self.endpoint(&["api", "filter", "sentiment", sentiment.as_str()]);
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn search_by_keyword(&self, keyword: &str) -> Result<FilteredExcerpts> {
        let url = self.endpoint(&["api", "search", "keyword"]);
        self.post_json(url, &KeywordRequest { keyword }).await
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn register(&self, credentials: &Credentials) -> Result<MessageResponse> {
        let url = self.endpoint(&["register"]);
        self.post_json(url, credentials).await
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let url = self.endpoint(&["login"]);
        self.post_json(url, credentials).await
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<MessageResponse> {
        let url = self.endpoint(&["logout"]);
        debug!(url = %url, "POST");
        let resp = self.http.post(url).send().await?;
        decode(resp).await
    }
}
