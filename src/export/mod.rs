//! Pagination and dedup driver.
//!
//! [`Exporter`] walks the remote contact list page by page (or in one shot),
//! funnels every fetch through the retry policy, accumulates records in
//! strict page order, assigns sequence numbers and tracks duplicate ids.
//! Pages are fetched sequentially on purpose: failures stay attributable to
//! a page number and the remote never sees a burst of parallel retries.

mod dedup;
mod output;

pub use dedup::DedupState;
pub use output::{write_outputs, OutputFiles, CONTACTS_FILE, DUPLICATES_FILE};

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::api::{ApiError, ContactsApi};
use crate::models::{Contact, ExportOutcome, ExportStats, PageRequest};
use crate::utils::{with_retry, with_retry_detailed, RetryOutcome, RetryPolicy};

/// Default pause between page fetches
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// Pagination and dedup driver for one export run
#[derive(Debug, Clone)]
pub struct Exporter {
    api: Arc<dyn ContactsApi>,
    retry: RetryPolicy,
    page_delay: Duration,
    probe: bool,
}

impl Exporter {
    /// Create an exporter with the default retry policy, inter-page delay
    /// and connectivity probe enabled
    pub fn new(api: Arc<dyn ContactsApi>) -> Self {
        Self {
            api,
            retry: RetryPolicy::default(),
            page_delay: DEFAULT_PAGE_DELAY,
            probe: true,
        }
    }

    /// Set the per-page retry policy
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Set the pause between page fetches (zero disables throttling)
    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Enable or disable the connectivity probe before pagination
    pub fn probe(mut self, enabled: bool) -> Self {
        self.probe = enabled;
        self
    }

    /// Check that the API answers at all: one minimal fetch, no retry
    pub async fn check_connectivity(&self) -> Result<(), ApiError> {
        let api = self.api.as_ref();
        let request = PageRequest::probe();
        let policy = RetryPolicy {
            max_attempts: 1,
            ..self.retry
        };
        with_retry(policy, || api.fetch_page(&request))
            .await
            .map(|_| ())
    }

    /// Paginated export: fetch `total_pages` pages of `page_size` records.
    ///
    /// Every page is attempted regardless of earlier failures; a page that
    /// still fails after retries is logged and skipped. A failed
    /// connectivity probe aborts the whole run before any page is fetched.
    pub async fn run(&self, total_pages: usize, page_size: usize) -> ExportOutcome {
        if self.probe {
            tracing::info!("checking API connectivity");
            if let Err(error) = self.check_connectivity().await {
                tracing::error!(%error, "API connectivity check failed, aborting run");
                return ExportOutcome::default();
            }
            tracing::info!("API connectivity established");
        }

        let api = self.api.as_ref();
        let mut records: Vec<Contact> = Vec::new();
        let mut failed_pages = 0usize;

        for page in 1..=total_pages {
            tracing::info!(page, total_pages, "fetching page");
            let request = PageRequest::paged(page, page_size);

            match with_retry_detailed(self.retry, || api.fetch_page(&request)).await {
                RetryOutcome::Success(fetched, attempts) => {
                    tracing::info!(page, count = fetched.records.len(), attempts, "page fetched");
                    records.extend(fetched.records);
                }
                RetryOutcome::TransientFailure(error, class, attempts) => {
                    failed_pages += 1;
                    tracing::error!(
                        page, %error, ?class, attempts,
                        "page failed after retries, continuing with the next page"
                    );
                }
                RetryOutcome::PermanentFailure(error) => {
                    failed_pages += 1;
                    tracing::error!(
                        page, %error,
                        "page failed, continuing with the next page"
                    );
                }
            }

            if page < total_pages && !self.page_delay.is_zero() {
                sleep(self.page_delay).await;
            }
        }

        self.finish(records, failed_pages)
    }

    /// Single-shot export: one large page, no pagination
    pub async fn run_once(&self, limit: usize) -> ExportOutcome {
        let api = self.api.as_ref();
        let request = PageRequest::single(limit);

        let records = match with_retry(self.retry, || api.fetch_page(&request)).await {
            Ok(page) => {
                tracing::info!(count = page.records.len(), "fetched single page");
                page.records
            }
            Err(error) => {
                tracing::error!(%error, "single-page fetch failed");
                return ExportOutcome {
                    stats: ExportStats {
                        failed_pages: 1,
                        ..ExportStats::default()
                    },
                    ..ExportOutcome::default()
                };
            }
        };

        self.finish(records, 0)
    }

    /// Assign sequence numbers and track duplicates, both in append order
    fn finish(&self, mut records: Vec<Contact>, failed_pages: usize) -> ExportOutcome {
        let mut dedup = DedupState::new();
        for (index, record) in records.iter_mut().enumerate() {
            record.set_sequence(index as u64 + 1);
            dedup.observe(record);
        }

        let stats = ExportStats {
            total_records: records.len(),
            unique_ids: dedup.unique_count(),
            duplicate_ids: dedup.duplicate_count(),
            repeated_occurrences: dedup.repeated_occurrences(),
            failed_pages,
        };

        tracing::info!(
            total = stats.total_records,
            unique = stats.unique_ids,
            duplicates = stats.duplicate_ids,
            failed_pages,
            "export run finished"
        );

        ExportOutcome {
            records,
            duplicate_ids: dedup.into_duplicates(),
            stats,
        }
    }
}
