//! Terminal UI: Elm-style event loop over ratatui + crossterm.

pub mod app;
pub mod events;
pub mod layout;
pub mod services;
pub mod theme;
pub mod views;
pub mod widgets;

pub use app::AppState;
pub use events::AppEvent;
pub use services::Services;
