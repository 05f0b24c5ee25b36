//! Property-based tests for upload receipts
//!
//! Tests invariants:
//! - A legacy "queued" message yields exactly the listed filenames
//! - An explicit `queued` list wins over the message

use proptest::prelude::*;
use serde_json::json;

use crate::api::models::parse_queued_message;
use crate::api::UploadReceipt;

/// Filenames without the `", "` separator or surrounding whitespace.
fn arb_filename() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,20}\\.(pdf|txt|docx)"
}

proptest! {
    #[test]
    fn prop_legacy_message_lists_filenames(names in prop::collection::vec(arb_filename(), 1..8)) {
        let message = format!("Files queued for processing: {}", names.join(", "));
        prop_assert_eq!(parse_queued_message(&message), names);
    }

    #[test]
    fn prop_other_messages_queue_nothing(message in "[a-z ]{0,40}") {
        prop_assume!(!message.starts_with("Files queued for processing: "));
        prop_assert!(parse_queued_message(&message).is_empty());
    }

    #[test]
    fn prop_explicit_queue_wins(names in prop::collection::vec(arb_filename(), 0..5)) {
        let receipt = UploadReceipt::from_json(json!({
            "queued": &names,
            "message": "Files queued for processing: ignored.pdf",
        }));
        prop_assert_eq!(receipt.queued, names);
    }
}
