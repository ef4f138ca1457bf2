use anyhow::Result;
use clap::{Parser, Subcommand};
use payinsight_core::PeriodUnit;
use payinsight_finance::RuleTable;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod analyze;
mod classifier;
mod config;
mod state;

use analyze::{run_analyze, AnalyzeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "payinsight",
    version,
    about = "Categorize payment activity exports and report spending trends"
)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract (HTML) or load (CSV) transactions, categorize them and print insights
    Analyze {
        /// Activity page (.html) or transaction table (.csv)
        input: PathBuf,

        /// Insight period: week, month or year (default from config, else month)
        #[arg(long)]
        period: Option<PeriodUnit>,

        /// Only report on transactions dated in this year
        #[arg(long)]
        year: Option<i32>,

        /// Where to write the classified table
        /// (HTML input defaults to parsed_transactions.csv next to it)
        #[arg(long)]
        out: Option<PathBuf>,

        /// External classifier program: reads text on stdin, prints a label
        #[arg(long)]
        classifier_cmd: Option<String>,

        /// Argument for the classifier program (repeatable)
        #[arg(long = "classifier-arg", requires = "classifier_cmd")]
        classifier_args: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the built-in rule category for a piece of entry text
    Categorize {
        text: String,

        /// Merchant name, checked before the text
        #[arg(long)]
        merchant: Option<String>,
    },

    /// List the built-in category rules in match order
    Rules,

    /// Manage ~/.payinsight/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn init_logging(verbose: bool) {
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Analyze {
            input,
            period,
            year,
            out,
            classifier_cmd,
            classifier_args,
            json,
        } => {
            let cfg = config::load_config()?;
            run_analyze(
                AnalyzeArgs {
                    input,
                    period,
                    year,
                    out,
                    classifier_cmd,
                    classifier_args,
                    json,
                },
                &cfg,
            )?;
        }

        Command::Categorize { text, merchant } => {
            println!("{}", RuleTable::builtin().classify(merchant.as_deref(), &text));
        }

        Command::Rules => {
            for rule in RuleTable::builtin().rules() {
                if rule.keywords.is_empty() {
                    println!("{} (fallback)", rule.label);
                } else {
                    println!("{}: {}", rule.label, rule.keywords.join(", "));
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}
