//! Page requests, API pages and export run results.

use serde::Serialize;
use serde_json::Value;

use crate::models::Contact;

/// Parameters for one contacts page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of records to return
    pub limit: usize,
    /// Zero-based record offset, present in paginated mode
    pub offset: Option<usize>,
    /// One-based page number, present in paginated mode
    pub page: Option<usize>,
}

impl PageRequest {
    /// Request for page `page` (1-based) of a run with a fixed page size
    pub fn paged(page: usize, page_size: usize) -> Self {
        Self {
            limit: page_size,
            offset: Some((page - 1) * page_size),
            page: Some(page),
        }
    }

    /// Single-shot request: one large page, no offset
    pub fn single(limit: usize) -> Self {
        Self {
            limit,
            offset: None,
            page: None,
        }
    }

    /// Minimal request used as a connectivity probe
    pub fn probe() -> Self {
        Self {
            limit: 1,
            offset: None,
            page: Some(1),
        }
    }
}

/// One page of contacts as returned by the API
#[derive(Debug, Clone, Default)]
pub struct ContactsPage {
    /// Records in the order the remote returned them
    pub records: Vec<Contact>,
    /// Total record count advertised by the remote, when present
    pub total: Option<u64>,
}

/// Counters summarizing one export run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    /// Records accumulated across all successful pages
    pub total_records: usize,
    /// Distinct ids observed
    pub unique_ids: usize,
    /// Ids observed more than once
    pub duplicate_ids: usize,
    /// Raw occurrences beyond the first for each id
    pub repeated_occurrences: usize,
    /// Pages that failed after exhausting retries
    pub failed_pages: usize,
}

/// Result of an export run
#[derive(Debug, Clone, Default)]
pub struct ExportOutcome {
    /// All accumulated records, sequence numbers assigned
    pub records: Vec<Contact>,
    /// Each duplicated raw id exactly once, in first-detected order
    pub duplicate_ids: Vec<Value>,
    /// Run counters
    pub stats: ExportStats,
}

impl ExportOutcome {
    /// Whether the run accumulated any records at all
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_request_offsets() {
        let first = PageRequest::paged(1, 100);
        assert_eq!(first.limit, 100);
        assert_eq!(first.offset, Some(0));
        assert_eq!(first.page, Some(1));

        let third = PageRequest::paged(3, 100);
        assert_eq!(third.offset, Some(200));
        assert_eq!(third.page, Some(3));
    }

    #[test]
    fn test_single_request_has_no_pagination() {
        let single = PageRequest::single(1000);
        assert_eq!(single.limit, 1000);
        assert_eq!(single.offset, None);
        assert_eq!(single.page, None);
    }

    #[test]
    fn test_probe_request_is_minimal() {
        let probe = PageRequest::probe();
        assert_eq!(probe.limit, 1);
        assert_eq!(probe.page, Some(1));
        assert_eq!(probe.offset, None);
    }
}
