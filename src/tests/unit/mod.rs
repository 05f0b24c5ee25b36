//! Scenario tests: each drives a state machine against `MockBackend` and
//! checks what reached the backend as well as what the user would see.

mod detail_flow;
mod documents_flow;
mod search_flow;
mod upload_flow;
