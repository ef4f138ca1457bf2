use anyhow::{Context, Result};
use payinsight_core::PeriodUnit;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{ensure_payinsight_home, payinsight_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub insights: InsightsSection,
    pub classifier: ClassifierSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsSection {
    /// "week", "month" or "year"
    pub period: PeriodUnit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSection {
    /// Program that reads entry text on stdin and prints a category label.
    /// Unset means the built-in keyword rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// File name of the classified table written next to an HTML input
    pub table_name: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            table_name: "parsed_transactions.csv".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(payinsight_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

/// Defaults when no config file exists
pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = ensure_payinsight_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = parse_config("[insights]\nperiod = \"week\"\n").unwrap();
        assert_eq!(cfg.insights.period, PeriodUnit::Week);
        assert!(cfg.classifier.command.is_none());
        assert_eq!(cfg.output.table_name, "parsed_transactions.csv");
    }

    #[test]
    fn test_classifier_section() {
        let cfg = parse_config(
            "[classifier]\ncommand = \"python3\"\nargs = [\"predict.py\", \"model.pkl\"]\n",
        )
        .unwrap();
        assert_eq!(cfg.classifier.command.as_deref(), Some("python3"));
        assert_eq!(cfg.classifier.args, ["predict.py", "model.pkl"]);
        assert_eq!(cfg.insights.period, PeriodUnit::Month);
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_bad_period_is_rejected() {
        assert!(parse_config("[insights]\nperiod = \"fortnight\"\n").is_err());
    }
}
