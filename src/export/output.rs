//! Output file writing for export runs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ExportOutcome;

/// File name for the full contact list
pub const CONTACTS_FILE: &str = "contacts_full.json";

/// File name for the duplicate-id list
pub const DUPLICATES_FILE: &str = "duplicate_ids.json";

/// Paths of the files written by [`write_outputs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub contacts: PathBuf,
    pub duplicates: PathBuf,
}

/// Write the two output files under `dir` as pretty-printed JSON.
///
/// Returns `Ok(None)` without touching the filesystem when the outcome holds
/// no records. Write failures surface to the caller for logging; the
/// in-memory outcome is never affected by them.
pub fn write_outputs(dir: &Path, outcome: &ExportOutcome) -> std::io::Result<Option<OutputFiles>> {
    if outcome.is_empty() {
        tracing::warn!("no contacts accumulated, nothing to export");
        return Ok(None);
    }

    fs::create_dir_all(dir)?;

    let files = OutputFiles {
        contacts: dir.join(CONTACTS_FILE),
        duplicates: dir.join(DUPLICATES_FILE),
    };

    let contacts = serde_json::to_string_pretty(&outcome.records)?;
    fs::write(&files.contacts, contacts)?;
    tracing::info!(path = %files.contacts.display(), "contact list exported");

    let duplicates = serde_json::to_string_pretty(&outcome.duplicate_ids)?;
    fs::write(&files.duplicates, duplicates)?;
    tracing::info!(path = %files.duplicates.display(), "duplicate id list exported");

    Ok(Some(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::make_contact;
    use crate::models::ExportStats;
    use serde_json::{json, Value};

    fn outcome_with_ids(ids: &[&str], duplicates: &[&str]) -> ExportOutcome {
        let mut records: Vec<_> = ids.iter().map(|id| make_contact(*id)).collect();
        for (index, record) in records.iter_mut().enumerate() {
            record.set_sequence(index as u64 + 1);
        }
        ExportOutcome {
            records,
            duplicate_ids: duplicates.iter().map(|id| json!(id)).collect(),
            stats: ExportStats::default(),
        }
    }

    #[test]
    fn test_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = outcome_with_ids(&["a", "b", "b"], &["b"]);

        let files = write_outputs(dir.path(), &outcome).unwrap().unwrap();

        let contacts: Value =
            serde_json::from_str(&fs::read_to_string(&files.contacts).unwrap()).unwrap();
        assert_eq!(contacts.as_array().unwrap().len(), 3);
        assert_eq!(contacts[0]["sequence"], json!(1));
        assert_eq!(contacts[2]["sequence"], json!(3));

        let duplicates: Value =
            serde_json::from_str(&fs::read_to_string(&files.duplicates).unwrap()).unwrap();
        assert_eq!(duplicates, json!(["b"]));
    }

    #[test]
    fn test_write_failure_leaves_outcome_intact() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the output directory should go makes every
        // write fail.
        let blocker = dir.path().join("occupied");
        fs::write(&blocker, b"not a directory").unwrap();

        let outcome = outcome_with_ids(&["a", "b", "b"], &["b"]);
        let result = write_outputs(&blocker, &outcome);
        assert!(result.is_err());

        // Accumulation and export are independent failure domains: the
        // failed write discards nothing.
        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.records[0].sequence(), Some(1));
        assert_eq!(outcome.duplicate_ids, vec![json!("b")]);

        // The summary still renders from the intact outcome.
        crate::ui::print_summary(&outcome, None);
    }

    #[test]
    fn test_empty_outcome_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let files = write_outputs(dir.path(), &ExportOutcome::default()).unwrap();

        assert!(files.is_none());
        assert!(!dir.path().join(CONTACTS_FILE).exists());
        assert!(!dir.path().join(DUPLICATES_FILE).exists());
    }
}
