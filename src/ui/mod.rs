//! Terminal output for run reports.
//!
//! Colored status lines and the end-of-run summary block. Colors are only
//! used when stdout is a terminal.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::export::OutputFiles;
use crate::models::ExportOutcome;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Print a status line, colored when stdout is a terminal.
pub fn status_line(status: Status, message: &str) {
    let icon = status_icon(status);
    if is_terminal() {
        match status {
            Status::Success => println!("{} {}", icon.green(), message),
            Status::Error => println!("{} {}", icon.red(), message),
            Status::Warning => println!("{} {}", icon.yellow(), message),
            Status::Info => println!("{} {}", icon.blue(), message),
        }
    } else {
        println!("{} {}", icon, message);
    }
}

/// Print the end-of-run summary block.
pub fn print_summary(outcome: &ExportOutcome, files: Option<&OutputFiles>) {
    let stats = &outcome.stats;

    println!();
    println!("=== Export summary ===");
    println!("Contacts accumulated: {}", stats.total_records);
    println!("Unique ids:           {}", stats.unique_ids);
    println!("Duplicated ids:       {}", stats.duplicate_ids);
    println!("Repeat occurrences:   {}", stats.repeated_occurrences);
    if stats.failed_pages > 0 {
        status_line(
            Status::Warning,
            &format!("{} page(s) failed and were skipped", stats.failed_pages),
        );
    }

    if !outcome.duplicate_ids.is_empty() {
        let rendered: Vec<String> = outcome
            .duplicate_ids
            .iter()
            .map(|id| id.to_string())
            .collect();
        println!("Duplicate ids: {}", rendered.join(", "));
    }

    match files {
        Some(files) => {
            status_line(
                Status::Success,
                &format!("Contact list written to {}", files.contacts.display()),
            );
            status_line(
                Status::Success,
                &format!("Duplicate ids written to {}", files.duplicates.display()),
            );
        }
        None => {
            status_line(Status::Warning, "No contacts accumulated, no files written");
        }
    }
}
