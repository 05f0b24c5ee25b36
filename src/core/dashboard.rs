//! Everything the signed-in user sees, and which part of it is active.

use tracing::{debug, info};

use super::collection::DocumentCollection;
use super::detail::DetailPanel;
use super::excerpts::{ExcerptPanel, ExcerptQuery};
use crate::api::{self, DocumentBackend, FilteredExcerpts, UploadReceipt};
use crate::auth::{AuthError, AuthGate, User};

/// Which results area currently owns the lower half of the screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    None,
    /// Summary/keyword panel for a document.
    Detail(String),
    /// Search or sentiment-filter results.
    Excerpts,
}

/// Document list, detail panel and excerpt panel for one session.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub documents: DocumentCollection,
    pub excerpts: ExcerptPanel,
    detail: Option<DetailPanel>,
    active: ActiveView,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &ActiveView {
        &self.active
    }

    pub fn detail(&self) -> Option<&DetailPanel> {
        self.detail.as_ref()
    }

    pub fn detail_mut(&mut self) -> Option<&mut DetailPanel> {
        self.detail.as_mut()
    }

    /// Open (or reuse) the detail panel for `filename` and make it active.
    ///
    /// Switching documents drops the old panel, which cancels its fetches.
    pub fn open_detail(&mut self, filename: &str) -> &mut DetailPanel {
        let reuse = self
            .detail
            .as_ref()
            .is_some_and(|panel| panel.filename() == filename);
        if !reuse {
            debug!(filename, "opening detail panel");
            self.detail = Some(DetailPanel::new(filename));
        }
        self.active = ActiveView::Detail(filename.to_string());
        self.detail.get_or_insert_with(|| DetailPanel::new(filename))
    }

    /// The panel for `generation`, if it is still the one on screen.
    pub fn detail_for(&mut self, generation: u64) -> Option<&mut DetailPanel> {
        match self.detail {
            Some(ref mut panel) if panel.scope().is_current(generation) => Some(panel),
            _ => {
                debug!(generation, "discarding result for a closed detail panel");
                None
            }
        }
    }

    /// Start an excerpt query. The document panel's summary and keywords are cleared.
    pub fn begin_excerpts(&mut self, query: ExcerptQuery) {
        if let Some(panel) = self.detail.as_mut() {
            panel.clear_views();
        }
        self.active = ActiveView::Excerpts;
        self.excerpts.begin(query);
    }

    pub fn apply_excerpts(
        &mut self,
        query: &ExcerptQuery,
        result: api::Result<FilteredExcerpts>,
    ) -> Result<usize, String> {
        self.excerpts.apply(query, result)
    }

    pub async fn run_excerpts(
        &mut self,
        backend: &dyn DocumentBackend,
        query: ExcerptQuery,
    ) -> Result<usize, String> {
        self.begin_excerpts(query.clone());
        let result = query.run(backend).await;
        self.apply_excerpts(&query, result)
    }

    /// Fold an accepted upload into the document list.
    pub fn apply_upload(&mut self, receipt: &UploadReceipt) -> usize {
        let added = self.documents.apply_receipt(receipt);
        info!(added, "documents appended from upload");
        added
    }

    /// Sign in with an identity token and load that user's documents.
    pub async fn sign_in(
        &mut self,
        gate: &AuthGate,
        backend: &dyn DocumentBackend,
        credential: &str,
    ) -> Result<(User, api::Result<usize>), AuthError> {
        self.reset();
        let user = gate.sign_in(credential)?;
        let refreshed = self.documents.refresh(backend, &user.subject_id).await;
        Ok((user, refreshed))
    }

    /// Sign out and forget all per-user state.
    pub fn sign_out(&mut self, gate: &AuthGate) -> Option<User> {
        self.reset();
        gate.sign_out()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
