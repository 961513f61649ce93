//! # Contact Audit
//!
//! Export contacts from a CRM-style API with pagination, bounded retry and
//! duplicate-id auditing.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Contact, PageRequest, ExportOutcome)
//! - [`api`]: Contacts API trait, reqwest client and test mock
//! - [`export`]: Pagination driver, duplicate tracking and output files
//! - [`utils`]: Retry policy and shared HTTP client
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal summary output

pub mod api;
pub mod config;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use export::Exporter;
pub use models::{Contact, ExportOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
