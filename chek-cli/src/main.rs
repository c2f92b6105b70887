use anyhow::{Context, Result, bail};
use chek_core::{LineItem, Money};
use chek_ingest::{Source, detect_and_parse, fetch};
use chek_ledger::{LedgerStore, Period, SavedCheck, spending_by_category};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::time::Duration;

mod config;

#[derive(Parser, Debug)]
#[command(name = "chek", version, about = "Receipt ledger: ingest checks, track spending by category")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a receipt document from a file path, URL, or pasted XML
    Ingest {
        /// File path, http(s) URL, or the XML itself
        source: String,
    },

    /// Record a single purchase by hand
    Add {
        name: String,
        /// Decimal amount in major units, e.g. 23.50 or 23,50
        amount: String,
    },

    /// Spending totals by category for a fixed period
    Report {
        #[arg(value_enum)]
        period: ReportArg,
    },

    /// Spending totals by category for an arbitrary date range (inclusive)
    ReportAll {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },

    /// Delete a check and every item it owns
    DeleteCheck { id: i64 },

    /// Delete a single item; its check stays
    DeleteItem { id: i64 },

    /// Total check/item row counts
    Stats,

    /// Write a default config.toml under ~/.chek
    InitConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportArg {
    Day,
    Week,
    Month,
}

impl From<ReportArg> for Period {
    fn from(arg: ReportArg) -> Period {
        match arg {
            ReportArg::Day => Period::Today,
            ReportArg::Week => Period::TrailingWeek,
            ReportArg::Month => Period::CurrentMonth,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Command::InitConfig = cli.command {
        return init_config();
    }

    let cfg = config::load_config()?;
    let rules = config::load_rules(&cfg)?;
    let store = LedgerStore::open(config::database_path(&cfg)?)?;

    match cli.command {
        Command::Ingest { source } => {
            let source = Source::classify(&source);
            let bytes = match fetch(&source, Duration::from_secs(cfg.fetch_timeout_secs)).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    println!("Could not retrieve document: {err}");
                    return Ok(());
                }
            };

            let today = Local::now().date_naive();
            let items = match detect_and_parse(&bytes, today, &rules) {
                Ok(items) => items,
                Err(err) => {
                    tracing::debug!(%err, "receipt did not parse");
                    Vec::new()
                }
            };
            if items.is_empty() {
                println!("No items found in this document.");
                return Ok(());
            }

            let saved = store.insert_check(&items).await?;
            print_summary(&saved, &items);
        }

        Command::Add { name, amount } => {
            let amount = match Money::parse_decimal(&amount) {
                Ok(amount) => amount,
                Err(err) => bail!("{err} (use a decimal like 23.50)"),
            };
            let today = Local::now().date_naive();
            let item = LineItem::new(&name, amount, rules.classify(&name), today);

            let saved = store.insert_check(std::slice::from_ref(&item)).await?;
            print_summary(&saved, std::slice::from_ref(&item));
        }

        Command::Report { period } => {
            let today = Local::now().date_naive();
            let totals = spending_by_category(&store, period.into(), today).await?;
            print_report(&totals);
        }

        Command::ReportAll { from, to } => {
            let today = Local::now().date_naive();
            let totals = spending_by_category(&store, Period::Custom { from, to }, today).await?;
            print_report(&totals);
        }

        Command::DeleteCheck { id } => {
            if store.delete_check(id).await? {
                println!("Check {id} deleted.");
            } else {
                println!("No check with id {id}.");
            }
        }

        Command::DeleteItem { id } => {
            if store.delete_item(id).await? {
                println!("Item {id} deleted.");
            } else {
                println!("No item with id {id}.");
            }
        }

        Command::Stats => {
            let (checks, items) = store.debug_counts().await?;
            println!("Checks: {checks}, items: {items}");
        }

        Command::InitConfig => {}

    }

    Ok(())
}

fn init_config() -> Result<()> {
    let path = config::config_path()?;
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    config::ensure_chek_home()?;
    let s = toml::to_string_pretty(&config::Config::default()).context("serialize config")?;
    std::fs::write(&path, s).with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn print_summary(saved: &SavedCheck, items: &[LineItem]) {
    println!("Check #{}:", saved.check_id);
    let mut total = Money::ZERO;
    for (id, item) in saved.item_ids.iter().zip(items) {
        println!(
            "  [{id}] {} ({}) - {}",
            item.name, item.category, item.amount
        );
        total = total.add(item.amount);
    }
    println!("Total: {total}");
}

fn print_report(totals: &BTreeMap<String, Money>) {
    if totals.is_empty() {
        println!("No data for this period.");
        return;
    }
    println!("Spending by category:");
    let mut total = Money::ZERO;
    for (category, amount) in totals {
        println!("  {category}: {amount}");
        total = total.add(*amount);
    }
    println!("Total: {total}");
}
