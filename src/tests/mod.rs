//! In-crate test tree.
//!
//! - `mocks`: a mockall double of [`crate::api::DocumentBackend`] plus helpers
//! - `unit`: scenario tests that drive the state machines end to end
//! - `property`: proptest invariants for the pure helpers

mod property;
mod unit;
