use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contact_audit::api::ContactsClient;
use contact_audit::config::{find_config_file, get_config, load_config, Config};
use contact_audit::export::{write_outputs, Exporter};
use contact_audit::models::ExportOutcome;
use contact_audit::ui::{self, Status};
use contact_audit::utils::{HttpClient, RetryPolicy};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Contact Audit - export CRM contacts and audit duplicate ids
#[derive(Parser, Debug)]
#[command(name = "contact-audit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export CRM contacts with pagination, retry and duplicate-id auditing", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export contacts page by page with retry and throttling
    #[command(alias = "e")]
    Export {
        /// Number of pages to fetch
        #[arg(long, short)]
        pages: Option<usize>,

        /// Records per page
        #[arg(long)]
        page_size: Option<usize>,

        /// Skip the connectivity probe before paginating
        #[arg(long)]
        no_probe: bool,

        /// Delay between pages in milliseconds (0 disables throttling)
        #[arg(long)]
        page_delay_ms: Option<u64>,

        /// Directory receiving the output files
        #[arg(long, short)]
        output_dir: Option<PathBuf>,
    },

    /// Export contacts in one large page, without pagination
    #[command(alias = "once")]
    Snapshot {
        /// Maximum number of records to request
        #[arg(long, short)]
        limit: Option<usize>,

        /// Directory receiving the output files
        #[arg(long, short)]
        output_dir: Option<PathBuf>,
    },

    /// Check connectivity to the contacts API
    Check,
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Contact Audit - Environment Variables");
    println!();
    println!("Credentials:");
    println!("  API_TOKEN                     API token for the CRM contacts endpoint");
    println!("  CONTACT_AUDIT_API_TOKEN       Alternative name for the same token");
    println!();
    println!("Overrides (also settable in the config file; note the double underscore):");
    println!("  CONTACT_AUDIT_API__BASE_URL             Base URL of the CRM API");
    println!("  CONTACT_AUDIT_API__TIMEOUT_SECS         Per-request timeout (default: 60)");
    println!("  CONTACT_AUDIT_EXPORT__TOTAL_PAGES       Pages to fetch (default: 10)");
    println!("  CONTACT_AUDIT_EXPORT__PAGE_SIZE         Records per page (default: 100)");
    println!("  CONTACT_AUDIT_EXPORT__SINGLE_LIMIT      Single-shot record limit (default: 1000)");
    println!("  CONTACT_AUDIT_PACING__MAX_ATTEMPTS      Attempts per page (default: 3)");
    println!("  CONTACT_AUDIT_PACING__RETRY_BASE_DELAY_MS  Base retry delay (default: 2000)");
    println!("  CONTACT_AUDIT_PACING__PAGE_DELAY_MS     Pause between pages (default: 500)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                      Rust logging level (e.g. debug, info, warn)");
    println!();
    println!("Example:");
    println!("  export API_TOKEN=\"your-token-here\"");
    println!("  contact-audit export --pages 10 --page-size 100");
    std::process::exit(0);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("contact_audit={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()?
    };

    // The credential is the one fatal precondition: abort before any
    // network activity when it is missing.
    let token = config
        .api
        .token
        .clone()
        .context("API_TOKEN is not set; add it to the environment or the config file")?;

    let http = HttpClient::with_timeout(Duration::from_secs(config.api.timeout_secs));
    let client = ContactsClient::with_http(&config.api.base_url, token, http)?;
    let exporter = exporter_from_config(Arc::new(client), &config);

    // No subcommand behaves like `export` with configured defaults.
    let command = cli.command.unwrap_or(Commands::Export {
        pages: None,
        page_size: None,
        no_probe: false,
        page_delay_ms: None,
        output_dir: None,
    });

    match command {
        Commands::Export {
            pages,
            page_size,
            no_probe,
            page_delay_ms,
            output_dir,
        } => {
            let pages = pages.unwrap_or(config.export.total_pages);
            let page_size = page_size.unwrap_or(config.export.page_size);
            let delay = page_delay_ms.unwrap_or(config.pacing.page_delay_ms);
            let out_dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());

            let exporter = exporter
                .page_delay(Duration::from_millis(delay))
                .probe(!no_probe);

            let outcome = exporter.run(pages, page_size).await;
            finish(&outcome, &out_dir);
        }

        Commands::Snapshot { limit, output_dir } => {
            let limit = limit.unwrap_or(config.export.single_limit);
            let out_dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());

            let outcome = exporter.run_once(limit).await;
            finish(&outcome, &out_dir);
        }

        Commands::Check => match exporter.check_connectivity().await {
            Ok(()) => {
                ui::status_line(Status::Success, "Contacts API is reachable");
            }
            Err(error) => {
                ui::status_line(
                    Status::Error,
                    &format!("Contacts API is not reachable: {}", error),
                );
                anyhow::bail!("connectivity check failed");
            }
        },
    }

    Ok(())
}

fn exporter_from_config(client: Arc<ContactsClient>, config: &Config) -> Exporter {
    Exporter::new(client).retry_policy(RetryPolicy {
        max_attempts: config.pacing.max_attempts,
        base_delay: Duration::from_millis(config.pacing.retry_base_delay_ms),
    })
}

/// Write output files and print the summary.
///
/// Write failures are logged but never discard the in-memory outcome or
/// fail the run.
fn finish(outcome: &ExportOutcome, out_dir: &Path) {
    let files = match write_outputs(out_dir, outcome) {
        Ok(files) => files,
        Err(error) => {
            tracing::error!(%error, "failed to write output files");
            ui::status_line(
                Status::Error,
                &format!("Failed to write output files: {}", error),
            );
            None
        }
    };

    ui::print_summary(outcome, files.as_ref());
}
