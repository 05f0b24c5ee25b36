/// Smart Document Analyzer - terminal client
///
/// Signs in with a Google identity token, uploads documents to the analyzer
/// backend, and browses summaries, keywords, definitions, related articles
/// and sentiment-filtered excerpts.

pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
