//! Property-based tests for the text input buffer
//!
//! Tests invariants:
//! - Cursor stays within the text for any key sequence
//! - Masked display has one bullet per character
//! - `take` always leaves an empty buffer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;

use crate::tui::widgets::input_buffer::InputBuffer;

fn arb_key() -> impl Strategy<Value = KeyEvent> {
    prop_oneof![
        any::<char>().prop_map(|c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)),
        Just(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)),
        Just(KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE)),
        Just(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)),
        Just(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)),
        Just(KeyEvent::new(KeyCode::Home, KeyModifiers::NONE)),
        Just(KeyEvent::new(KeyCode::End, KeyModifiers::NONE)),
    ]
}

proptest! {
    #[test]
    fn prop_cursor_within_text(keys in prop::collection::vec(arb_key(), 0..64)) {
        let mut buffer = InputBuffer::new();
        for key in &keys {
            buffer.handle_key(key);
        }
        prop_assert!(buffer.cursor_column() <= buffer.text().chars().count());
    }

    #[test]
    fn prop_masked_display_hides_every_char(text in "\\PC{0,40}") {
        let mut buffer = InputBuffer::masked();
        buffer.insert_str(&text);
        let shown = buffer.display();
        prop_assert_eq!(shown.chars().count(), buffer.text().chars().count());
        prop_assert!(shown.chars().all(|c| c == '•'));
    }

    #[test]
    fn prop_take_empties_buffer(text in "[a-zA-Z0-9 ./~-]{0,60}") {
        let mut buffer = InputBuffer::new();
        buffer.insert_str(&text);
        let taken = buffer.take();
        prop_assert_eq!(taken, text);
        prop_assert_eq!(buffer.text(), "");
        prop_assert_eq!(buffer.cursor_column(), 0);
    }
}
