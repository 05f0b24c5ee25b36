use crate::api::{self, DocumentEntry, FilteredExcerpts, UploadReceipt};
use crate::core::uploader::{StagedFile, UploadError};
use crate::core::ExcerptQuery;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs and spinners.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A background request finished.
    Backend(BackendEvent),
    /// A resolved action to execute.
    Action(Action),
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// Results of spawned backend calls.
///
/// Detail-panel results carry the generation of the panel that asked for
/// them so late answers for a closed panel can be dropped. Per-user results
/// carry the subject id of the session that started them.
#[derive(Debug)]
pub enum BackendEvent {
    DocumentsLoaded {
        user_id: String,
        result: api::Result<Vec<DocumentEntry>>,
    },
    FileRead {
        user_id: String,
        result: Result<StagedFile, UploadError>,
    },
    UploadFinished {
        user_id: String,
        result: api::Result<UploadReceipt>,
    },
    Summary {
        generation: u64,
        result: api::Result<String>,
    },
    Keywords {
        generation: u64,
        result: api::Result<Vec<String>>,
    },
    Definition {
        generation: u64,
        keyword: String,
        result: api::Result<String>,
    },
    Articles {
        generation: u64,
        keyword: String,
        result: api::Result<Vec<String>>,
    },
    Excerpts {
        query: ExcerptQuery,
        result: api::Result<FilteredExcerpts>,
    },
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusDocuments,
    FocusUpload,
    FocusSearch,
    TabNext,
    TabPrev,

    // Modals
    ShowHelp,
    CloseHelp,

    // Session
    RefreshDocuments,
    Logout,

    // Application
    Quit,
}

/// Which top-level tab has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Documents,
    Upload,
    Search,
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::Documents, Focus::Upload, Focus::Search];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Documents => "Documents",
            Focus::Upload => "Upload",
            Focus::Search => "Search",
        }
    }

    pub fn index(self) -> usize {
        Focus::ALL.iter().position(|&f| f == self).unwrap_or(0)
    }

    pub fn next(self) -> Focus {
        Focus::ALL[(self.index() + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        Focus::ALL[(self.index() + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }

    pub fn to_action(self) -> Action {
        match self {
            Focus::Documents => Action::FocusDocuments,
            Focus::Upload => Action::FocusUpload,
            Focus::Search => Action::FocusSearch,
        }
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl Notification {
    /// Default lifetime: about five seconds at the default tick rate.
    pub const DEFAULT_TTL: u32 = 100;

    /// A notification whose id is assigned by `AppState` when it is shown.
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: Self::DEFAULT_TTL,
        }
    }
}
