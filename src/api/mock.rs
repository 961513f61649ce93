//! Mock contacts API for testing purposes.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::api::{ApiError, ContactsApi};
use crate::models::{Contact, ContactsPage, PageRequest};

/// A mock API that replays scripted per-call results.
///
/// Each call to [`ContactsApi::fetch_page`] pops the next scripted result;
/// once the script is exhausted, empty pages are returned. Requests are
/// recorded in call order for assertions.
#[derive(Debug, Default)]
pub struct MockApi {
    script: Mutex<VecDeque<Result<ContactsPage, ApiError>>>,
    calls: Mutex<Vec<PageRequest>>,
}

impl MockApi {
    /// Create a mock with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next result to return
    pub fn push(&self, result: Result<ContactsPage, ApiError>) {
        self.script.lock().unwrap().push_back(result);
    }

    /// Queue a successful page holding contacts with the given string ids
    pub fn push_page(&self, ids: &[&str]) {
        let records = ids.iter().map(|id| make_contact(*id)).collect();
        self.push(Ok(ContactsPage {
            records,
            total: None,
        }));
    }

    /// Requests seen so far, in call order
    pub fn calls(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContactsApi for MockApi {
    async fn fetch_page(&self, request: &PageRequest) -> Result<ContactsPage, ApiError> {
        self.calls.lock().unwrap().push(*request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ContactsPage::default()))
    }
}

/// Helper to build a contact with the given raw id value for tests.
pub fn make_contact(id: impl Into<Value>) -> Contact {
    let mut fields = Map::new();
    fields.insert("id".to_string(), id.into());
    Contact::new(fields)
}

/// Helper to build a contact with no id field at all.
pub fn make_contact_without_id() -> Contact {
    Contact::new(Map::new())
}
