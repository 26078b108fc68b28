use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use provdash::{
    compliance,
    config::Config,
    export,
    filter::{self, FilterCriteria, Selection},
    load::Loader,
    session::Session,
    table::Table,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "provdash", about = "Reporting pipeline for the monthly submission sheets")]
struct Cli {
    /// YAML config overriding the built-in registry.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Username for the credential gate, when one is configured.
    #[arg(long, global = true)]
    user: Option<String>,

    /// Password for the credential gate.
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the registered tab names.
    Tabs,
    /// List the selectable municipality and year values of a tab.
    Options { tab: String },
    /// Load a tab, apply filters, print the view and optionally export it.
    Show {
        tab: String,
        #[arg(long)]
        municipality: Option<String>,
        #[arg(long)]
        year: Option<String>,
        /// Write the displayed view as CSV (conventionally `{tab}.csv`).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compliance report for one municipality.
    Report {
        tab: String,
        #[arg(long)]
        municipality: String,
    },
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::builtin(),
    };

    // Credential gate before anything touches the network. An empty
    // allow-list means the gate is open.
    if !config.users.is_empty() {
        let (user, password) = match (&cli.user, &cli.password) {
            (Some(u), Some(p)) => (u.as_str(), p.as_str()),
            _ => bail!("this registry requires credentials; pass --user and --password"),
        };
        let mut session = Session::new();
        if !session.authenticate(&config.users, user, password) {
            bail!("invalid credentials");
        }
    }

    let mut loader = Loader::new(config.registry(), config.ttl());
    match cli.command {
        Command::Tabs => {
            for name in loader.registry().tab_names() {
                println!("{name}");
            }
        }
        Command::Options { tab } => {
            let loaded = loader.load(&tab)?;
            let municipalities = loaded.table.distinct_values(filter::MUNICIPALITY_COLUMN);
            let years = loaded.table.distinct_values(filter::YEAR_COLUMN);
            println!("municipalities: {}", municipalities.join(", "));
            println!("years: {}", years.join(", "));
        }
        Command::Show {
            tab,
            municipality,
            year,
            out,
        } => {
            let loaded = loader.load(&tab)?;
            println!("source: {}", loaded.source);

            let filterable = loader
                .registry()
                .get(&tab)
                .is_some_and(|t| t.filterable);
            let view = if filterable {
                let criteria = FilterCriteria {
                    municipality: selection(municipality.as_deref()),
                    year: selection(year.as_deref()),
                };
                filter::filter(&loaded.table, &criteria)
            } else {
                loaded.table
            };

            print_table(&view);
            if let Some(path) = out {
                let bytes = export::to_csv_bytes(&view)?;
                std::fs::write(&path, bytes)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), rows = view.len(), "exported");
            }
        }
        Command::Report { tab, municipality } => {
            let loaded = loader.load(&tab)?;
            let report = compliance::analyze(&loaded.table, &municipality);

            println!("municipality:      {}", report.municipality);
            println!("total submissions: {}", report.total_submissions);
            println!("months pending:    {}", report.months_pending);
            println!(
                "months submitted:  {}",
                report
                    .months_submitted
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("submissions per month:");
            for (month, count) in &report.by_month_counts {
                println!("  {month:>2}: {count}");
            }
            if !report.duplicates.is_empty() {
                println!("duplicate (month, year) submissions:");
                print_table(&report.duplicates);
            }
        }
    }
    Ok(())
}

fn selection(label: Option<&str>) -> Selection {
    label.map(Selection::from_label).unwrap_or_default()
}

fn print_table(table: &Table) {
    println!("{}", table.headers.join(" | "));
    for row in &table.rows {
        println!("{}", row.join(" | "));
    }
}
