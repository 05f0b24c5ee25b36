//! Property-based tests for the document collection
//!
//! Tests invariants:
//! - Appending never produces duplicate filenames
//! - The selection always points at an existing row

use std::collections::HashSet;

use proptest::prelude::*;

use crate::core::DocumentCollection;

proptest! {
    #[test]
    fn prop_append_is_unique(names in prop::collection::vec("[a-c]{1,2}\\.pdf", 0..30)) {
        let mut collection = DocumentCollection::new();
        let added = names.iter().filter(|n| collection.append(n)).count();

        let distinct: HashSet<_> = names.iter().collect();
        prop_assert_eq!(added, distinct.len());
        prop_assert_eq!(collection.len(), distinct.len());
    }

    #[test]
    fn prop_selection_stays_in_bounds(
        names in prop::collection::vec("[a-z]{1,6}\\.pdf", 0..10),
        moves in prop::collection::vec(any::<bool>(), 0..20),
    ) {
        let mut collection = DocumentCollection::new();
        for name in &names {
            collection.append(name);
        }
        for down in moves {
            if down {
                collection.select_next();
            } else {
                collection.select_prev();
            }
        }
        if collection.is_empty() {
            prop_assert!(collection.selected().is_none());
        } else {
            prop_assert!(collection.selected_index() < collection.len());
        }
    }
}
