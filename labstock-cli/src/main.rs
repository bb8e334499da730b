//! Labstock CLI
//!
//! Command-line view of the laboratory inventory dashboard: items needing
//! attention, headline stats, searchable listings and the expiring-soon
//! window. `attention` and `expiring` also accept a local JSON file of
//! records and then run without network access.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use labstock::client::{HttpInventoryApi, InventoryApi, Resource};
use labstock::dashboard::{self, DashboardStats};
use labstock::listing::{self, Page, Searchable};
use labstock::model::{Chemical, Equipment, InventoryTransaction, Supplier};
use labstock::record::{parse_instant, InventoryRecord, RawRecord, RecordKind};
use labstock::{evaluate, AnnotatedRecord, BearerToken, DashboardService, LabstockConfig};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "labstock")]
#[command(about = "Laboratory inventory stock status dashboard")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (default: config/config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Inventory API base URL, overriding configuration
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token for the inventory API
    #[arg(long)]
    token: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Items that are low on stock or expired, expired first
    Attention {
        /// Evaluate a JSON array of records instead of querying the API
        #[arg(long)]
        file: Option<PathBuf>,

        /// Evaluation time as RFC 3339 (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Headline dashboard counters
    Stats {
        /// Compute from full listings instead of the backend's counters
        #[arg(long)]
        local: bool,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List a resource with optional search and paging
    List {
        /// chemicals, equipment, suppliers or transactions
        resource: Resource,

        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value = "1")]
        page: usize,

        /// Items per page (default: dashboard.page_size)
        #[arg(long)]
        per_page: Option<usize>,
    },

    /// Chemicals expiring within a window
    Expiring {
        /// Read chemicals from a JSON array instead of querying the API
        #[arg(long)]
        file: Option<PathBuf>,

        /// Window length in days (default: dashboard.expiring_soon_days)
        #[arg(long)]
        days: Option<i64>,

        /// Window start as RFC 3339 (default: now)
        #[arg(long)]
        now: Option<String>,
    },
}

/// Usage errors detected by the CLI itself
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Invalid --now value '{0}': expected an RFC 3339 timestamp or YYYY-MM-DD date")]
    InvalidTimestamp(String),

    #[error("--days must not be negative (got {0})")]
    NegativeWindow(i64),

    #[error("--per-page must be at least 1")]
    EmptyPage,
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    if cli.quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    } else if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => LabstockConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => LabstockConfig::load().context("Failed to load configuration")?,
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    config.api.token = resolve_token(cli.token, std::env::var("LABSTOCK_TOKEN").ok(), config.api.token);

    match cli.command {
        Commands::Attention { file, now, json } => {
            let now = resolve_now(now.as_deref())?;
            let items = match file {
                Some(path) => evaluate(&read_records(&path)?, now)
                    .with_context(|| format!("Failed to evaluate {}", path.display()))?,
                None => service(&config)
                    .attention_items(now)
                    .context("Failed to load attention items")?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                print!("{}", render_attention(&items));
            }
        }
        Commands::Stats { local, json } => {
            let service = service(&config);
            let stats = if local {
                service.local_stats(Utc::now())
            } else {
                service.stats()
            }
            .context("Failed to load dashboard stats")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render_stats(&stats));
            }
        }
        Commands::List {
            resource,
            search,
            page,
            per_page,
        } => {
            let per_page = per_page.unwrap_or(config.dashboard.page_size);
            if per_page == 0 {
                return Err(CliError::EmptyPage.into());
            }
            let api = HttpInventoryApi::new(&config.api);
            let term = search.unwrap_or_default();
            let rendered = match resource {
                Resource::Chemicals => {
                    list_page::<Chemical, _>(&api, resource, &term, page, per_page, chemical_row)?
                }
                Resource::Equipment => {
                    list_page::<Equipment, _>(&api, resource, &term, page, per_page, equipment_row)?
                }
                Resource::Suppliers => {
                    list_page::<Supplier, _>(&api, resource, &term, page, per_page, supplier_row)?
                }
                Resource::Transactions => list_page::<InventoryTransaction, _>(
                    &api,
                    resource,
                    &term,
                    page,
                    per_page,
                    transaction_row,
                )?,
            };
            print!("{}", rendered);
        }
        Commands::Expiring { file, days, now } => {
            let now = resolve_now(now.as_deref())?;
            let days = days.unwrap_or(config.dashboard.expiring_soon_days);
            if days < 0 {
                return Err(CliError::NegativeWindow(days).into());
            }
            let soon = match file {
                Some(path) => {
                    let records = read_records(&path)?
                        .iter()
                        .map(|raw| InventoryRecord::parse(raw, RecordKind::Chemical))
                        .collect::<Result<Vec<_>, _>>()
                        .with_context(|| format!("Failed to read chemicals from {}", path.display()))?;
                    let window = Duration::try_days(days).unwrap_or(Duration::MAX);
                    dashboard::expiring_within(records, now, window)
                }
                None => {
                    let mut settings = config.dashboard.clone();
                    settings.expiring_soon_days = days;
                    DashboardService::new(HttpInventoryApi::new(&config.api), settings)
                        .expiring_soon(now)
                        .context("Failed to load expiring chemicals")?
                }
            };
            print!("{}", render_expiring(&soon, days));
        }
    }

    Ok(())
}

fn service(config: &LabstockConfig) -> DashboardService<HttpInventoryApi> {
    DashboardService::new(HttpInventoryApi::new(&config.api), config.dashboard.clone())
}

/// `--token`, then `LABSTOCK_TOKEN`, then the configured token
fn resolve_token(
    flag: Option<String>,
    env: Option<String>,
    configured: Option<String>,
) -> Option<String> {
    [flag, env, configured]
        .into_iter()
        .flatten()
        .find_map(|candidate| BearerToken::new(candidate).map(|t| t.expose().to_string()))
}

fn resolve_now(value: Option<&str>) -> Result<DateTime<Utc>, CliError> {
    match value {
        None => Ok(Utc::now()),
        Some(text) => parse_instant(text).ok_or_else(|| CliError::InvalidTimestamp(text.to_string())),
    }
}

fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<RawRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of records", path.display()))?;
    log::debug!("Read {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

fn list_page<T, F>(
    api: &impl InventoryApi,
    resource: Resource,
    term: &str,
    page: usize,
    per_page: usize,
    row: F,
) -> Result<String>
where
    T: serde::de::DeserializeOwned + Searchable + Clone,
    F: Fn(&T) -> String,
{
    let items: Vec<T> = api
        .list(resource)
        .with_context(|| format!("Failed to list {}", resource))?;
    let matches: Vec<T> = listing::search(&items, term).into_iter().cloned().collect();
    Ok(render_page(resource, &listing::paginate(&matches, page, per_page), row))
}

fn render_page<T>(resource: Resource, page: &Page<T>, row: impl Fn(&T) -> String) -> String {
    let mut out = format!("\n{}\n\n", format!("📋 {}", resource).bold());
    if page.is_empty() {
        out.push_str("  (no items)\n");
    }
    for item in &page.items {
        out.push_str(&format!("  {}\n", row(item)));
    }
    out.push_str(&format!(
        "\nPage {} of {} ({} item(s))\n",
        page.page,
        page.total_pages.max(1),
        page.total_items
    ));
    out
}

fn chemical_row(chemical: &Chemical) -> String {
    let unit = chemical.unit.map(|u| format!(" {}", u)).unwrap_or_default();
    let expiry = chemical
        .expiry_date
        .map(|d| format!(", expires {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    format!("#{} {} ({}{}{})", chemical.id, chemical.name, chemical.quantity, unit, expiry)
}

fn equipment_row(equipment: &Equipment) -> String {
    let status = equipment
        .status
        .map(|s| format!(", {:?}", s))
        .unwrap_or_default();
    format!("#{} {} (x{}{})", equipment.id, equipment.name, equipment.quantity, status)
}

fn supplier_row(supplier: &Supplier) -> String {
    format!("#{} {} <{}>", supplier.id, supplier.name, supplier.email)
}

fn transaction_row(transaction: &InventoryTransaction) -> String {
    let date = transaction
        .transaction_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "undated".to_string());
    let subjects = transaction.search_fields().join(", ");
    format!(
        "#{} {} {:?} {} {}",
        transaction.id, date, transaction.transaction_type, transaction.quantity, subjects
    )
    .trim_end()
    .to_string()
}

fn render_attention(items: &[AnnotatedRecord]) -> String {
    let mut out = format!("\n{}\n\n", "⚠️  Items Requiring Attention".bold());
    if items.is_empty() {
        out.push_str("  Nothing requires attention\n");
        return out;
    }
    for item in items {
        let record = &item.record;
        let mut flags = Vec::new();
        if item.is_expired {
            flags.push("EXPIRED".red().bold().to_string());
        }
        if item.is_low_stock {
            flags.push("LOW".yellow().bold().to_string());
        }
        let threshold = record
            .min_quantity
            .map(|min| format!(" / min {}", min))
            .unwrap_or_default();
        out.push_str(&format!(
            "  #{} {} [{:?}] qty {}{} {}\n",
            record.id,
            record.name,
            record.kind,
            record.quantity,
            threshold,
            flags.join(" ")
        ));
    }
    let expired = items.iter().filter(|i| i.is_expired).count();
    let low = items.iter().filter(|i| i.is_low_stock).count();
    out.push_str(&format!(
        "\nSummary: {} item(s), {} expired, {} low on stock\n",
        items.len(),
        expired,
        low
    ));
    out
}

fn render_stats(stats: &DashboardStats) -> String {
    format!(
        "\n{}\n\n  Total chemicals:   {}\n  Equipment items:   {}\n  Low-stock alerts:  {} ({} chemical, {} equipment)\n  Expired items:     {}\n  Active suppliers:  {}\n",
        "📊 Dashboard".bold(),
        stats.total_chemicals,
        stats.equipment_items,
        stats.low_stock_alerts,
        stats.low_chemical_stock,
        stats.low_equipment_stock,
        stats.expired_items,
        stats.active_suppliers
    )
}

fn render_expiring(items: &[AnnotatedRecord], days: i64) -> String {
    let mut out = format!(
        "\n{}\n\n",
        format!("⏳ Expiring within {} day(s)", days).bold()
    );
    if items.is_empty() {
        out.push_str("  None\n");
    }
    for item in items {
        let expiry = item
            .record
            .expiry
            .map(|e| e.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        out.push_str(&format!("  #{} {} expires {}\n", item.record.id, item.record.name, expiry));
    }
    out
}
