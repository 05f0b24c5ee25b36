
pub mod logging;

// Per-session state machines driven by the TUI
pub mod collection;
pub mod dashboard;
pub mod detail;
pub mod excerpts;
pub mod scope;
pub mod uploader;

pub use collection::DocumentCollection;
pub use dashboard::{ActiveView, Dashboard};
pub use detail::{ArticlesView, DefinitionLookup, DetailPanel, KeywordsView, SummaryView};
pub use excerpts::{ExcerptPanel, ExcerptQuery};
pub use scope::FetchScope;
pub use uploader::{StagedFile, UploadError, Uploader};
