//! Wire types for the analyzer backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Prefix of the legacy human-readable upload confirmation.
pub const QUEUED_PREFIX: &str = "Files queued for processing: ";

// ── Sentiment ───────────────────────────────────────────────────────────────

/// Document/excerpt sentiment as classified by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Path segment / wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(format!("unknown sentiment label: {other}")),
        }
    }
}

/// Accept `null`, missing, or unknown labels as "not classified yet".
fn lenient_sentiment<'de, D>(deserializer: D) -> Result<Option<Sentiment>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

// ── Documents ───────────────────────────────────────────────────────────────

/// One row of the user's document collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub filename: String,
    #[serde(default, deserialize_with = "lenient_sentiment")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, rename = "documentId", alias = "id")]
    pub document_id: Option<i64>,
}

impl DocumentEntry {
    /// A freshly queued document that has not been classified yet.
    pub fn pending(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            sentiment: None,
            document_id: None,
        }
    }
}

// ── Upload ──────────────────────────────────────────────────────────────────

/// A local file staged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Structured confirmation of an upload.
///
/// Newer backends send `{"queued": [...]}`. Older ones only send the
/// `"Files queued for processing: a, b"` message, which is parsed as a
/// fallback. Anything else yields an empty `queued` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReceipt {
    pub queued: Vec<String>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct RawUploadResponse {
    #[serde(default)]
    queued: Option<Vec<String>>,
    #[serde(default)]
    message: Option<String>,
}

impl UploadReceipt {
    /// Interpret an upload response body.
    pub fn from_json(value: serde_json::Value) -> Self {
        let raw: RawUploadResponse = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        let queued = match raw.queued {
            Some(list) => list.into_iter().filter(|f| !f.trim().is_empty()).collect(),
            None => raw
                .message
                .as_deref()
                .map(parse_queued_message)
                .unwrap_or_default(),
        };

        Self {
            queued,
            message: raw.message,
        }
    }
}

/// Parse `"Files queued for processing: a.pdf, b.txt"` into filenames.
pub fn parse_queued_message(message: &str) -> Vec<String> {
    match message.strip_prefix(QUEUED_PREFIX) {
        Some(rest) => rest
            .split(", ")
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    }
}

// ── Detail panels ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct FilenameRequest<'a> {
    pub filename: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct KeywordRequest<'a> {
    pub keyword: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KeywordsResponse {
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DefinitionResponse {
    pub definition: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArticlesResponse {
    #[serde(default)]
    pub links: Vec<String>,
}

// ── Excerpts ────────────────────────────────────────────────────────────────

/// A sentence or paragraph fragment matched by a filter/search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excerpt {
    #[serde(default)]
    pub id: Option<i64>,
    pub content: String,
    #[serde(default, deserialize_with = "lenient_sentiment")]
    pub sentiment: Option<Sentiment>,
}

/// Result of a keyword search or sentiment filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredExcerpts {
    #[serde(default)]
    pub sentences: Vec<Excerpt>,
    #[serde(default)]
    pub paragraphs: Vec<Excerpt>,
}

impl FilteredExcerpts {
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty() && self.paragraphs.is_empty()
    }
}

// ── Accounts ────────────────────────────────────────────────────────────────

/// Username/password pair for the secondary account endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Document reference returned by `/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginDocument {
    pub filename: String,
    #[serde(default)]
    pub id: Option<i64>,
}

/// Response of a successful password login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub documents: Vec<LoginDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sentiment_parse() {
        assert_eq!("positive".parse::<Sentiment>(), Ok(Sentiment::Positive));
        assert_eq!(" Neutral ".parse::<Sentiment>(), Ok(Sentiment::Neutral));
        assert!("mixed".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_document_list_decodes_backend_shape() {
        let body = json!([
            {"filename": "report.pdf", "documentId": 7, "sentiment": "positive"},
            {"filename": "notes.txt", "documentId": 8, "sentiment": null},
            {"filename": "scan.png"}
        ]);
        let docs: Vec<DocumentEntry> = serde_json::from_value(body).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].sentiment, Some(Sentiment::Positive));
        assert_eq!(docs[0].document_id, Some(7));
        assert_eq!(docs[1].sentiment, None);
        assert_eq!(docs[2].document_id, None);
    }

    #[test]
    fn test_unknown_sentiment_is_unclassified() {
        let doc: DocumentEntry =
            serde_json::from_value(json!({"filename": "a.pdf", "sentiment": "mixed"})).unwrap();
        assert_eq!(doc.sentiment, None);
    }

    #[test]
    fn test_receipt_from_legacy_message() {
        let receipt = UploadReceipt::from_json(json!({
            "message": "Files queued for processing: report.pdf"
        }));
        assert_eq!(receipt.queued, vec!["report.pdf".to_string()]);
    }

    #[test]
    fn test_receipt_from_legacy_message_with_many_files() {
        let receipt = UploadReceipt::from_json(json!({
            "message": "Files queued for processing: a.pdf, b.docx"
        }));
        assert_eq!(receipt.queued, vec!["a.pdf", "b.docx"]);
    }

    #[test]
    fn test_receipt_prefers_structured_list() {
        let receipt = UploadReceipt::from_json(json!({
            "queued": ["x.txt", ""],
            "message": "Files queued for processing: ignored.pdf"
        }));
        assert_eq!(receipt.queued, vec!["x.txt"]);
    }

    #[test]
    fn test_receipt_ignores_other_shapes() {
        assert!(UploadReceipt::from_json(json!({"message": "report.pdf uploaded successfully"}))
            .queued
            .is_empty());
        assert!(UploadReceipt::from_json(json!(["report.pdf"])).queued.is_empty());
        assert!(UploadReceipt::from_json(json!({"message": 42})).queued.is_empty());
    }

    #[test]
    fn test_upload_file_guesses_mime() {
        assert_eq!(UploadFile::new("report.pdf", vec![1]).mime_type, "application/pdf");
        assert_eq!(UploadFile::new("notes.txt", vec![]).mime_type, "text/plain");
        assert_eq!(
            UploadFile::new("blob", vec![]).mime_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_excerpts_default_to_empty_lists() {
        let excerpts: FilteredExcerpts = serde_json::from_value(json!({})).unwrap();
        assert!(excerpts.is_empty());

        let excerpts: FilteredExcerpts = serde_json::from_value(json!({
            "sentences": [{"id": 1, "content": "Great results."}],
            "paragraphs": []
        }))
        .unwrap();
        assert!(!excerpts.is_empty());
        assert_eq!(excerpts.sentences[0].content, "Great results.");
    }
}
