//! Core data models for contact records and export runs.

mod contact;
mod page;

pub use contact::{Contact, ID_FIELD, SEQUENCE_FIELD};
pub use page::{ContactsPage, ExportOutcome, ExportStats, PageRequest};
