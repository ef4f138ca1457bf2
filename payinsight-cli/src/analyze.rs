use anyhow::{bail, Context, Result};
use payinsight_core::{PeriodUnit, TransactionRecord};
use payinsight_finance::{
    available_years, filter_year, CategorizationMethod, ClassifierDelegate, Pipeline, Report,
};
use payinsight_ingest::{read_table_path, write_table_path, ActivityDocument};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::classifier::CommandClassifier;
use crate::config::Config;

#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    pub input: PathBuf,
    pub period: Option<PeriodUnit>,
    pub year: Option<i32>,
    pub out: Option<PathBuf>,
    pub classifier_cmd: Option<String>,
    pub classifier_args: Vec<String>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    method: CategorizationMethod,
    period: PeriodUnit,
    year: Option<i32>,
    table: Option<&'a Path>,
    #[serde(flatten)]
    report: &'a Report,
}

/// `.html`/`.htm` inputs are activity pages; anything else is a table
fn is_activity_page(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

fn default_table_path(input: &Path, cfg: &Config) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&cfg.output.table_name)
}

fn build_classifier(args: &AnalyzeArgs, cfg: &Config) -> Option<CommandClassifier> {
    if let Some(program) = &args.classifier_cmd {
        return Some(CommandClassifier::new(program, args.classifier_args.clone()));
    }
    cfg.classifier
        .command
        .as_ref()
        .map(|program| CommandClassifier::new(program, cfg.classifier.args.clone()))
}

pub fn run_analyze(args: AnalyzeArgs, cfg: &Config) -> Result<()> {
    if !args.input.exists() {
        bail!("File not found: {}", args.input.display());
    }

    let unit = args.period.unwrap_or(cfg.insights.period);
    let classifier = build_classifier(&args, cfg);
    if let Some(c) = &classifier {
        info!(program = c.program(), "using external classifier");
    }
    let delegate = classifier.as_ref().map(|c| c as &dyn ClassifierDelegate);
    let pipeline = Pipeline::select(unit, delegate);

    let (records, table) = if is_activity_page(&args.input) {
        info!(path = %args.input.display(), "parsing activity page");
        let bytes = fs::read(&args.input)
            .with_context(|| format!("reading {}", args.input.display()))?;
        let doc = ActivityDocument::from_bytes(&bytes)
            .with_context(|| format!("decoding {}", args.input.display()))?;
        let records = pipeline.extract(&doc).context("categorizing transactions")?;

        let out = args
            .out
            .clone()
            .unwrap_or_else(|| default_table_path(&args.input, cfg));
        write_table_path(&out, &records).with_context(|| format!("writing {}", out.display()))?;
        info!(count = records.len(), path = %out.display(), "wrote classified table");
        (records, Some(out))
    } else {
        info!(path = %args.input.display(), "loading transaction table");
        let records = read_table_path(&args.input)
            .with_context(|| format!("reading {}", args.input.display()))?;
        let records = pipeline
            .classify_missing(records)
            .context("categorizing transactions")?;

        if let Some(out) = &args.out {
            write_table_path(out, &records).with_context(|| format!("writing {}", out.display()))?;
        }
        (records, args.out.clone())
    };

    let method = pipeline.method_for(&records);

    let view: Vec<TransactionRecord> = match args.year {
        Some(year) => {
            let years = available_years(&records);
            if !years.contains(&year) {
                warn!(year, ?years, "no dated transactions in requested year");
            }
            filter_year(&records, year)
        }
        None => records,
    };
    let report = pipeline.report(&view);

    if args.json {
        let out = JsonReport {
            method,
            period: unit,
            year: args.year,
            table: table.as_deref(),
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        if let Some(path) = &table {
            println!("Classified table: {}", path.display());
        }
        print_report(method, &report);
    }

    Ok(())
}

fn print_report(method: CategorizationMethod, report: &Report) {
    let summary = &report.summary;

    println!("Categorization method used: {}", method.label());

    println!("\n--- Basic Insights ---");
    println!("Total transactions: {}", summary.total_transactions);
    println!("Total spent: {:.2}", summary.total_spent);
    println!("Total received: {:.2}", summary.total_received);

    println!("\nTop merchants/recipients:");
    for m in &summary.top_merchants {
        println!("  {:<32} {}", m.merchant, m.count);
    }

    println!("\nStatus breakdown:");
    for s in &summary.status_breakdown {
        println!("  {:<32} {}", s.status.as_str(), s.count);
    }

    println!("\n--- Smart Insights ---");
    for insight in &report.insights {
        println!("- {}", insight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_by_extension() {
        assert!(is_activity_page(Path::new("Takeout/My Activity.html")));
        assert!(is_activity_page(Path::new("export.HTM")));
        assert!(!is_activity_page(Path::new("parsed_transactions.csv")));
        assert!(!is_activity_page(Path::new("no_extension")));
    }

    #[test]
    fn test_default_table_sits_next_to_input() {
        let cfg = Config::default();
        assert_eq!(
            default_table_path(Path::new("data/My Activity.html"), &cfg),
            PathBuf::from("data/parsed_transactions.csv")
        );
    }

    #[test]
    fn test_flag_classifier_overrides_config() {
        let mut cfg = Config::default();
        cfg.classifier.command = Some("from-config".to_string());
        let mut args = AnalyzeArgs {
            input: PathBuf::from("x.csv"),
            period: None,
            year: None,
            out: None,
            classifier_cmd: None,
            classifier_args: Vec::new(),
            json: false,
        };
        assert_eq!(build_classifier(&args, &cfg).unwrap().program(), "from-config");

        args.classifier_cmd = Some("from-flag".to_string());
        assert_eq!(build_classifier(&args, &cfg).unwrap().program(), "from-flag");

        cfg.classifier.command = None;
        args.classifier_cmd = None;
        assert!(build_classifier(&args, &cfg).is_none());
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let args = AnalyzeArgs {
            input: PathBuf::from("definitely/not/here.html"),
            period: None,
            year: None,
            out: None,
            classifier_cmd: None,
            classifier_args: Vec::new(),
            json: false,
        };
        assert!(run_analyze(args, &Config::default()).is_err());
    }
}
