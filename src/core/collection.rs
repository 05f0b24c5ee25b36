//! The signed-in user's document list.

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::api::{self, DocumentBackend, DocumentEntry, UploadReceipt};

/// Ordered list of the user's documents plus a selection cursor.
///
/// Filenames are unique: appending one that is already present is a no-op.
#[derive(Debug, Default)]
pub struct DocumentCollection {
    documents: Vec<DocumentEntry>,
    selected: usize,
    last_refreshed: Option<DateTime<Local>>,
}

impl DocumentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[DocumentEntry] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.documents.iter().any(|d| d.filename == filename)
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&DocumentEntry> {
        self.documents.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.documents.is_empty() {
            self.selected = (self.selected + 1).min(self.documents.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Replace the whole list, keeping the cursor on the same filename if it survived.
    pub fn replace(&mut self, documents: Vec<DocumentEntry>) {
        let previous = self.selected().map(|d| d.filename.clone());
        self.documents = documents;
        self.selected = previous
            .and_then(|name| self.documents.iter().position(|d| d.filename == name))
            .unwrap_or(0);
    }

    /// Append a freshly uploaded file. Returns false if it was already listed.
    pub fn append(&mut self, filename: &str) -> bool {
        if filename.is_empty() || self.contains(filename) {
            return false;
        }
        self.documents.push(DocumentEntry::pending(filename));
        true
    }

    /// Add every queued filename from an upload receipt. Returns how many were new.
    pub fn apply_receipt(&mut self, receipt: &UploadReceipt) -> usize {
        receipt
            .queued
            .iter()
            .filter(|name| self.append(name))
            .count()
    }

    /// Apply the outcome of a list fetch.
    ///
    /// On failure the previous list stays in place and the error is handed back
    /// for the caller to surface.
    pub fn apply_refresh(
        &mut self,
        result: api::Result<Vec<DocumentEntry>>,
    ) -> api::Result<usize> {
        match result {
            Ok(documents) => {
                let count = documents.len();
                self.replace(documents);
                self.last_refreshed = Some(Local::now());
                info!(count, "document list refreshed");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, kept = self.documents.len(), "document list refresh failed");
                Err(e)
            }
        }
    }

    /// Fetch the list for `user_id` and apply it.
    pub async fn refresh(
        &mut self,
        backend: &dyn DocumentBackend,
        user_id: &str,
    ) -> api::Result<usize> {
        let result = backend.list_documents(user_id).await;
        self.apply_refresh(result)
    }

    /// Forget everything (sign-out).
    pub fn clear(&mut self) {
        self.documents.clear();
        self.selected = 0;
        self.last_refreshed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    fn entry(name: &str) -> DocumentEntry {
        DocumentEntry::pending(name)
    }

    #[test]
    fn test_append_is_unique() {
        let mut docs = DocumentCollection::new();
        assert!(docs.append("a.pdf"));
        assert!(!docs.append("a.pdf"));
        assert!(!docs.append(""));
        assert_eq!(docs.len(), 1);
        assert!(docs.documents()[0].sentiment.is_none());
    }

    #[test]
    fn test_apply_receipt_counts_new_names() {
        let mut docs = DocumentCollection::new();
        docs.append("a.pdf");
        let receipt = UploadReceipt {
            queued: vec!["a.pdf".into(), "b.pdf".into(), "c.pdf".into()],
            message: None,
        };
        assert_eq!(docs.apply_receipt(&receipt), 2);
        let names: Vec<_> = docs.documents().iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_list() {
        let mut docs = DocumentCollection::new();
        docs.apply_refresh(Ok(vec![entry("a.pdf"), entry("b.pdf")])).unwrap();

        let err = docs
            .apply_refresh(Err(ApiError::server(500, "boom")))
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_replace_keeps_selection_by_name() {
        let mut docs = DocumentCollection::new();
        docs.replace(vec![entry("a"), entry("b"), entry("c")]);
        docs.select_next();
        docs.select_next();
        assert_eq!(docs.selected().unwrap().filename, "c");

        docs.replace(vec![entry("c"), entry("a")]);
        assert_eq!(docs.selected().unwrap().filename, "c");

        docs.replace(vec![entry("x")]);
        assert_eq!(docs.selected_index(), 0);
    }

    #[test]
    fn test_selection_bounds() {
        let mut docs = DocumentCollection::new();
        docs.select_next();
        docs.select_prev();
        assert!(docs.selected().is_none());

        docs.replace(vec![entry("a"), entry("b")]);
        for _ in 0..5 {
            docs.select_next();
        }
        assert_eq!(docs.selected_index(), 1);
    }

    #[test]
    fn test_clear() {
        let mut docs = DocumentCollection::new();
        docs.apply_refresh(Ok(vec![entry("a")])).unwrap();
        assert!(docs.last_refreshed().is_some());
        docs.clear();
        assert!(docs.is_empty());
        assert!(docs.last_refreshed().is_none());
    }
}
