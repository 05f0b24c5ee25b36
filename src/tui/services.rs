use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{self, BackendClient, DocumentBackend};
use crate::auth::{AuthGate, IdentityProvider, SessionStore};
use crate::config::AppConfig;

use super::events::{AppEvent, BackendEvent, Notification, NotificationLevel};

/// Centralized handle to the backend, the session, and the event channel.
///
/// Created once at startup, then passed by reference to views that need
/// backend access.
pub struct Services {
    pub backend: Arc<dyn DocumentBackend>,
    pub gate: AuthGate,
    /// `None` when no OAuth client id is configured.
    pub identity: Option<IdentityProvider>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Build services from config. Only an unusable backend URL is fatal.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> api::Result<Self> {
        let backend = BackendClient::new(&config.backend.base_url, config.backend.timeout())?;
        log::info!("Backend client targeting {}", backend.base_url());

        let identity = match IdentityProvider::from_config(&config.auth) {
            Ok(provider) => Some(provider),
            Err(e) => {
                log::warn!("Sign-in URL unavailable: {e}");
                None
            }
        };

        Ok(Self::new(
            Arc::new(backend),
            AuthGate::new(SessionStore::new()),
            identity,
            event_tx,
        ))
    }

    pub fn new(
        backend: Arc<dyn DocumentBackend>,
        gate: AuthGate,
        identity: Option<IdentityProvider>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            backend,
            gate,
            identity,
            event_tx,
        }
    }

    pub fn session(&self) -> &SessionStore {
        self.gate.session()
    }

    /// Queue a notification for the overlay.
    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        let _ = self
            .event_tx
            .send(AppEvent::Notification(Notification::new(message, level)));
    }

    /// Run a backend call on its own task and deliver the result as an event.
    pub fn spawn<F, Fut>(&self, call: F) -> JoinHandle<()>
    where
        F: FnOnce(Arc<dyn DocumentBackend>) -> Fut,
        Fut: Future<Output = BackendEvent> + Send + 'static,
    {
        let fut = call(Arc::clone(&self.backend));
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = fut.await;
            if tx.send(AppEvent::Backend(event)).is_err() {
                log::debug!("Event loop gone; dropping backend result");
            }
        })
    }

    /// Fetch the document list for `user_id`.
    pub fn request_documents(&self, user_id: String) -> JoinHandle<()> {
        self.spawn(move |backend| async move {
            let result = backend.list_documents(&user_id).await;
            BackendEvent::DocumentsLoaded { user_id, result }
        })
    }
}
