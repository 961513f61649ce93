//! Incremental duplicate-id tracking.

use serde_json::Value;
use std::collections::HashSet;

use crate::models::Contact;

/// Identity tracking for one export run.
///
/// Owned by the exporter, never global. An id moves into the duplicate set
/// on its second occurrence; later occurrences only bump the repeat counter,
/// so insertion is idempotent once an id is known to repeat.
#[derive(Debug, Default)]
pub struct DedupState {
    seen: HashSet<String>,
    duplicate_keys: HashSet<String>,
    duplicate_order: Vec<Value>,
    repeated_occurrences: usize,
}

impl DedupState {
    /// Create empty tracking state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one contact's id. Returns true when this occurrence is a repeat.
    ///
    /// A record without a string id is a data-quality signal, not a fatal
    /// condition: it is logged and still tracked by its raw value.
    pub fn observe(&mut self, contact: &Contact) -> bool {
        if !contact.has_string_id() {
            tracing::warn!(id = %contact.id_value(), "contact id missing or not a string");
        }

        let key = contact.id_key();
        if self.seen.contains(&key) {
            self.repeated_occurrences += 1;
            if self.duplicate_keys.insert(key) {
                self.duplicate_order.push(contact.id_value());
            }
            true
        } else {
            self.seen.insert(key);
            false
        }
    }

    /// Number of distinct ids observed
    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }

    /// Number of ids observed more than once
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_order.len()
    }

    /// Raw occurrences beyond the first for each id
    pub fn repeated_occurrences(&self) -> usize {
        self.repeated_occurrences
    }

    /// Duplicated raw ids, each exactly once, in first-detected order
    pub fn into_duplicates(self) -> Vec<Value> {
        self.duplicate_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{make_contact, make_contact_without_id};
    use serde_json::json;

    #[test]
    fn test_duplicates_in_first_detected_order() {
        let mut state = DedupState::new();
        for id in ["x", "y", "x", "z", "y", "y"] {
            state.observe(&make_contact(id));
        }

        assert_eq!(state.unique_count(), 3);
        assert_eq!(state.duplicate_count(), 2);
        assert_eq!(state.repeated_occurrences(), 3);
        assert_eq!(state.into_duplicates(), vec![json!("x"), json!("y")]);
    }

    #[test]
    fn test_insertion_idempotent_after_second_occurrence() {
        let mut state = DedupState::new();
        let contact = make_contact("a");

        assert!(!state.observe(&contact));
        assert!(state.observe(&contact));
        let after_second = state.duplicate_count();

        assert!(state.observe(&contact));
        assert!(state.observe(&contact));
        assert_eq!(state.duplicate_count(), after_second);
        assert_eq!(state.repeated_occurrences(), 3);
    }

    #[test]
    fn test_non_string_ids_tracked_by_raw_value() {
        let mut state = DedupState::new();
        assert!(!state.observe(&make_contact(42)));
        assert!(state.observe(&make_contact(42)));
        // The string "42" is a different identity than the number 42.
        assert!(!state.observe(&make_contact("42")));

        assert_eq!(state.into_duplicates(), vec![json!(42)]);
    }

    #[test]
    fn test_missing_ids_collide_with_each_other() {
        let mut state = DedupState::new();
        assert!(!state.observe(&make_contact_without_id()));
        assert!(state.observe(&make_contact_without_id()));
        assert!(state.observe(&make_contact(json!(null))));

        assert_eq!(state.unique_count(), 1);
        assert_eq!(state.into_duplicates(), vec![json!(null)]);
    }
}
