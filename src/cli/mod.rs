use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{Read, Write};
use uuid::Uuid;

use crate::application::{EntryFilter, LedgerService};
use crate::domain::{
    audit_leader, compare, format_cents, format_cents_grouped, net_worth, parse_cents, EntryKind,
    LeaderRole, PeriodType, ReferenceTable, WealthComparison, WealthTier,
};
use crate::io::export::Exporter;
use crate::io::import::{ImportOptions, Importer};

/// SmartCalc - Personal Budget Ledger
#[derive(Parser)]
#[command(name = "smartcalc")]
#[command(about = "A local-first budget ledger with net worth and audit insights")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "smartcalc.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record an expense or income entry
    Add {
        /// Entry kind: expense, income
        kind: String,

        /// Category (e.g. "Food", "Salary")
        category: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Date of the entry (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List recorded entries
    List {
        /// Filter by kind: expense, income
        #[arg(long)]
        kind: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from_date: Option<String>,

        /// Filter to date (YYYY-MM-DD)
        #[arg(long)]
        to_date: Option<String>,

        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Remove an entry by ID
    Remove {
        /// Entry ID
        id: String,
    },

    /// Generate reports and analytics
    #[command(subcommand)]
    Report(ReportCommands),

    /// Calculate net worth and rank it on the wealth scale
    Networth {
        /// Total assets (e.g., "150000.00")
        assets: String,

        /// Total liabilities (e.g., "40000.00")
        liabilities: String,
    },

    /// Rank a net worth figure against the reference wealth table
    Compare {
        /// Net worth figure (e.g., "1000000")
        amount: String,
    },

    /// Audit a government leader's remaining funds
    Audit {
        /// Leader role: mca, mp, governor, senator, president
        role: String,

        /// Salary (e.g., "1000000.00")
        #[arg(long)]
        salary: String,

        /// Allowances
        #[arg(long)]
        allowances: String,

        /// Development spending
        #[arg(long)]
        development: String,
    },

    /// Show whole-ledger statistics
    Stats,

    /// Export data to CSV or JSON
    Export {
        /// What to export: entries, summary, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Restrict summary export to a kind: expense, income
        #[arg(long)]
        kind: Option<String>,
    },

    /// Import entries from CSV or JSON
    Import {
        /// What to import: entries, full
        import_type: String,

        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,

        /// Skip entries that already exist
        #[arg(long)]
        skip_duplicates: bool,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Per-category totals with percentage shares
    Category {
        /// Restrict to a kind: expense, income
        #[arg(long)]
        kind: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Totals per time bucket
    Period {
        /// Restrict to a kind: expense, income
        #[arg(long)]
        kind: Option<String>,

        /// Period: weekly, monthly, yearly
        #[arg(long, default_value = "monthly")]
        period: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Income vs expense overview
    Summary {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                kind,
                category,
                amount,
                date,
                note,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let kind = parse_kind(&kind)?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let date = parse_optional_date(date.as_deref())?;

                let entry = service
                    .add_entry(kind, category, amount_cents, date, note)
                    .await?;

                println!(
                    "Recorded {}: {} {} ({})",
                    entry.kind,
                    format_cents(entry.amount_cents),
                    entry.category,
                    entry.id
                );
            }

            Commands::List {
                kind,
                category,
                from_date,
                to_date,
                limit,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let filter = EntryFilter {
                    kind: kind.as_deref().map(parse_kind).transpose()?,
                    category,
                    from_date: from_date
                        .as_deref()
                        .map(parse_date)
                        .transpose()
                        .context("Invalid --from-date. Use YYYY-MM-DD")?,
                    to_date: to_date
                        .as_deref()
                        .map(parse_date)
                        .transpose()
                        .context("Invalid --to-date. Use YYYY-MM-DD")?,
                    limit,
                };

                let entries = service.list_entries_filtered(filter).await?;
                if entries.is_empty() {
                    println!("No entries found.");
                } else {
                    println!(
                        "{:<12} {:<9} {:<16} {:>14}  {}",
                        "DATE", "KIND", "CATEGORY", "AMOUNT", "ID"
                    );
                    println!("{}", "-".repeat(92));
                    for entry in entries {
                        println!(
                            "{:<12} {:<9} {:<16} {:>14}  {}",
                            entry.date.format("%Y-%m-%d"),
                            entry.kind,
                            entry.category,
                            format_cents(entry.amount_cents),
                            entry.id
                        );
                    }
                }
            }

            Commands::Remove { id } => {
                let service = LedgerService::connect(&self.database).await?;
                let entry_id =
                    Uuid::parse_str(&id).context("Invalid entry ID format (expected UUID)")?;

                if service.remove_entry(entry_id).await? {
                    println!("Removed entry: {}", entry_id);
                } else {
                    println!("No entry found with ID: {}", entry_id);
                }
            }

            Commands::Report(report_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_report_command(&service, report_cmd).await?;
            }

            Commands::Networth {
                assets,
                liabilities,
            } => {
                let reference = ReferenceTable::builtin();
                let assets_cents =
                    parse_cents(&assets).context("Invalid assets amount")?;
                let liabilities_cents =
                    parse_cents(&liabilities).context("Invalid liabilities amount")?;

                let summary = net_worth(assets_cents, liabilities_cents)?;

                println!("Net worth: {}", format_cents_grouped(summary.net_cents));
                println!("  Assets:      {}", format_cents_grouped(summary.assets_cents));
                println!(
                    "  Liabilities: {}",
                    format_cents_grouped(summary.liabilities_cents)
                );
                println!();
                print_tier_advice(summary.tier);

                // The reference scale only ranks non-negative figures
                if summary.net_cents >= 0 {
                    println!();
                    let comparison = compare(&reference, summary.net_cents)?;
                    print_comparison(&reference, comparison);
                }
            }

            Commands::Compare { amount } => {
                let reference = ReferenceTable::builtin();
                let amount_cents =
                    parse_cents(&amount).context("Invalid net worth amount")?;

                let comparison = compare(&reference, amount_cents)?;
                println!("Net worth: {}", format_cents_grouped(amount_cents));
                print_comparison(&reference, comparison);
            }

            Commands::Audit {
                role,
                salary,
                allowances,
                development,
            } => {
                let role = LeaderRole::from_str(&role).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Invalid role '{}'. Valid roles: mca, mp, governor, senator, president",
                        role
                    )
                })?;
                let salary_cents = parse_cents(&salary).context("Invalid salary amount")?;
                let allowances_cents =
                    parse_cents(&allowances).context("Invalid allowances amount")?;
                let development_cents =
                    parse_cents(&development).context("Invalid development amount")?;

                let report =
                    audit_leader(role, salary_cents, allowances_cents, development_cents)?;

                println!("Audit: {}", report.role);
                println!("  Salary:      {}", format_cents_grouped(report.salary_cents));
                println!(
                    "  Allowances:  {}",
                    format_cents_grouped(report.allowances_cents)
                );
                println!(
                    "  Income:      {}",
                    format_cents_grouped(report.total_income_cents)
                );
                println!(
                    "  Development: {}",
                    format_cents_grouped(report.development_cents)
                );
                println!(
                    "  Remaining:   {}",
                    format_cents_grouped(report.remaining_cents)
                );
                if report.is_overspent() {
                    println!("Reported spending exceeds income.");
                }
                println!("Citizens, compare this with real development on the ground!");
            }

            Commands::Stats => {
                let service = LedgerService::connect(&self.database).await?;
                let stats = service.stats().await?;

                println!("Entries:        {}", stats.entry_count);
                println!("Income total:   {}", format_cents(stats.income_total));
                println!("Expense total:  {}", format_cents(stats.expense_total));
                println!(
                    "Net:            {}",
                    format_cents(stats.income_total - stats.expense_total)
                );
                if let Some(first) = stats.first_entry {
                    println!("First entry:    {}", first.format("%Y-%m-%d"));
                }
                if let Some(last) = stats.last_entry {
                    println!("Last entry:     {}", last.format("%Y-%m-%d"));
                }
            }

            Commands::Export {
                export_type,
                output,
                kind,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref(), kind.as_deref())
                    .await?;
            }

            Commands::Import {
                import_type,
                input,
                dry_run,
                skip_duplicates,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_import_command(
                    &service,
                    &import_type,
                    input.as_deref(),
                    ImportOptions {
                        dry_run,
                        skip_duplicates,
                    },
                )
                .await?;
            }
        }

        Ok(())
    }
}

async fn run_report_command(service: &LedgerService, cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::Category {
            kind,
            from,
            to,
            format,
        } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let from = from.as_deref().map(parse_date).transpose()?;
            let to = to.as_deref().map(parse_date).transpose()?;

            let report = service.category_report(kind, from, to).await?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            if report.categories.is_empty() {
                println!("No entries in range.");
                return Ok(());
            }

            println!(
                "{:<16} {:>12} {:>6} {:>12} {:>7}",
                "CATEGORY", "TOTAL", "COUNT", "AVERAGE", "SHARE"
            );
            println!("{}", "-".repeat(58));
            for category in &report.categories {
                println!(
                    "{:<16} {:>12} {:>6} {:>12} {:>6.1}%",
                    category.category,
                    format_cents(category.total),
                    category.count,
                    format_cents(category.average),
                    category.percentage
                );
            }
            println!("{}", "-".repeat(58));
            println!("{:<16} {:>12}", "Total", format_cents(report.total));
        }

        ReportCommands::Period {
            kind,
            period,
            from,
            to,
            format,
        } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let period = PeriodType::from_str(&period).ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid period '{}'. Valid periods: weekly, monthly, yearly",
                    period
                )
            })?;
            let from = from.as_deref().map(parse_date).transpose()?;
            let to = to.as_deref().map(parse_date).transpose()?;

            let report = service.period_report(kind, period, from, to).await?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            if report.buckets.is_empty() {
                println!("No entries in range.");
                return Ok(());
            }

            println!(
                "{:<12} {:>12} {:>6} {:>12}",
                "PERIOD", "TOTAL", "COUNT", "AVERAGE"
            );
            println!("{}", "-".repeat(46));
            for bucket in &report.buckets {
                println!(
                    "{:<12} {:>12} {:>6} {:>12}",
                    bucket.bucket,
                    format_cents(bucket.total),
                    bucket.count,
                    format_cents(bucket.average)
                );
            }
            println!("{}", "-".repeat(46));
            println!("{:<12} {:>12}", "Total", format_cents(report.total));
        }

        ReportCommands::Summary { from, to, format } => {
            let from = from.as_deref().map(parse_date).transpose()?;
            let to = to.as_deref().map(parse_date).transpose()?;

            let report = service.income_expense_report(from, to).await?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("Income:  {}", format_cents(report.total_income));
            for category in &report.income_categories {
                println!(
                    "  {:<16} {:>12}",
                    category.category,
                    format_cents(category.total)
                );
            }
            println!("Expense: {}", format_cents(report.total_expense));
            for category in &report.expense_categories {
                println!(
                    "  {:<16} {:>12}",
                    category.category,
                    format_cents(category.total)
                );
            }
            println!("Net:     {}", format_cents(report.net));
        }
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
    kind: Option<&str>,
) -> Result<()> {
    let exporter = Exporter::new(service);
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path).context("Failed to create output file")?),
        None => Box::new(std::io::stdout()),
    };

    match export_type {
        "entries" => {
            let count = exporter.export_entries_csv(writer).await?;
            eprintln!("Exported {} entries", count);
        }
        "summary" => {
            let kind = kind.map(parse_kind).transpose()?;
            let count = exporter.export_summary_csv(writer, kind).await?;
            eprintln!("Exported {} category rows", count);
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            eprintln!("Exported snapshot with {} entries", snapshot.entries.len());
        }
        other => anyhow::bail!(
            "Invalid export type '{}'. Valid types: entries, summary, full",
            other
        ),
    }

    Ok(())
}

async fn run_import_command(
    service: &LedgerService,
    import_type: &str,
    input: Option<&str>,
    options: ImportOptions,
) -> Result<()> {
    let importer = Importer::new(service);
    let reader: Box<dyn Read> = match input {
        Some(path) => Box::new(File::open(path).context("Failed to open input file")?),
        None => Box::new(std::io::stdin()),
    };

    let result = match import_type {
        "entries" => importer.import_entries_csv(reader, options).await?,
        "full" => importer.import_full_json(reader, options).await?,
        other => anyhow::bail!("Invalid import type '{}'. Valid types: entries, full", other),
    };

    println!(
        "Imported: {}  Skipped: {}  Errors: {}",
        result.imported,
        result.skipped,
        result.errors.len()
    );
    for error in &result.errors {
        match &error.field {
            Some(field) => eprintln!("  line {} ({}): {}", error.line, field, error.error),
            None => eprintln!("  line {}: {}", error.line, error.error),
        }
    }

    Ok(())
}

fn print_comparison(reference: &ReferenceTable, comparison: WealthComparison) {
    println!(
        "Rank: #{} of {} reference points",
        comparison.rank,
        reference.len()
    );
    if let Some(above) = &comparison.nearest_above {
        println!(
            "Next milestone: {} ({})",
            above.label,
            format_cents_grouped(above.amount_cents)
        );
    }
    if let Some(below) = &comparison.nearest_below {
        println!(
            "Just ahead of: {} ({})",
            below.label,
            format_cents_grouped(below.amount_cents)
        );
    }
    println!(
        "Scale position: {:.1}% of the way to the richest",
        comparison.relative_position
    );
}

fn print_tier_advice(tier: WealthTier) {
    match tier {
        WealthTier::InTheRed => {
            println!("You're in the red. Time to cut back on liabilities.")
        }
        WealthTier::Building => {
            println!("Building wealth takes time. Keep saving and investing!")
        }
        WealthTier::FinancialFreedom => {
            println!("You're on your way to financial freedom!")
        }
    }
}

fn parse_kind(s: &str) -> Result<EntryKind> {
    EntryKind::from_str(s)
        .ok_or_else(|| anyhow::anyhow!("Invalid kind '{}'. Valid kinds: expense, income", s))
}

fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", s))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow::anyhow!("Invalid date '{}'", s))
}

fn parse_optional_date(s: Option<&str>) -> Result<DateTime<Utc>> {
    match s {
        Some(date_str) => parse_date(date_str),
        None => Ok(Utc::now()),
    }
}
