//! Typed view of the effective config for `hpd report`.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use hpd_ingest::{parse_date, resolve_day, DayBasis, LoaderOptions};
use hpd_lots::{Horizon, MatchPolicy};
use serde_json::Value;

/// Ledger file read when neither config nor CLI names one.
pub const DEFAULT_INPUT_PATH: &str = "dati.csv";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => bail!("invalid output format '{}'. expected one of: table | json", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub loader: LoaderOptions,
    /// Horizon on the year-relative axis when no valuation date is set.
    pub horizon_day: i64,
    pub valuation_date: Option<NaiveDate>,
    pub require_terminal_valuation: bool,
    pub color: bool,
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            loader: LoaderOptions::default(),
            horizon_day: Horizon::YEAR_END.day(),
            valuation_date: None,
            require_terminal_valuation: false,
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl ReportConfig {
    /// Extract settings from merged config JSON; absent keys keep defaults.
    pub fn from_json(v: &Value) -> Result<Self> {
        let mut cfg = ReportConfig::default();

        if let Some(p) = get_str(v, "/input/path")? {
            cfg.input_path = PathBuf::from(p);
        }
        if let Some(f) = get_str(v, "/input/date_format")? {
            cfg.loader.date_format = f.to_string();
        }
        if let Some(b) = get_str(v, "/input/day_basis")? {
            cfg.loader.day_basis = DayBasis::from_str(b)
                .map_err(anyhow::Error::msg)
                .context("CONFIG_INVALID pointer=/input/day_basis")?;
        }
        if let Some(d) = get_str(v, "/input/delimiter")? {
            cfg.loader.delimiter = parse_delimiter(d)?;
        }
        if let Some(h) = get_i64(v, "/matching/horizon_day")? {
            cfg.horizon_day = h;
        }
        if let Some(raw) = get_str(v, "/matching/valuation_date")? {
            let date = parse_date(raw, &cfg.loader.date_format).with_context(|| {
                format!(
                    "CONFIG_INVALID pointer=/matching/valuation_date: '{}' does not match date format '{}'",
                    raw, cfg.loader.date_format
                )
            })?;
            cfg.valuation_date = Some(date);
        }
        if let Some(b) = get_bool(v, "/matching/require_terminal_valuation")? {
            cfg.require_terminal_valuation = b;
        }
        if let Some(b) = get_bool(v, "/output/color")? {
            cfg.color = b;
        }
        if let Some(f) = get_str(v, "/output/format")? {
            cfg.format = f.parse().context("CONFIG_INVALID pointer=/output/format")?;
        }

        Ok(cfg)
    }

    /// Day used as `day_end` for open lots.
    ///
    /// A valuation date wins over `horizon_day`. With the absolute day basis
    /// the valuation date is mandatory: a year-relative horizon would not be
    /// on the same axis as the transaction days.
    pub fn horizon(&self) -> Result<Horizon> {
        match (self.valuation_date, self.loader.day_basis) {
            (Some(date), basis) => Ok(Horizon(resolve_day(date, basis))),
            (None, DayBasis::YearRelative) => Ok(Horizon(self.horizon_day)),
            (None, DayBasis::Absolute) => bail!(
                "CONFIG_MISSING pointer=/matching/valuation_date: required when /input/day_basis is absolute"
            ),
        }
    }

    pub fn match_policy(&self) -> Result<MatchPolicy> {
        Ok(MatchPolicy {
            horizon: self.horizon()?,
            require_terminal_valuation: self.require_terminal_valuation,
        })
    }
}

fn parse_delimiter(raw: &str) -> Result<u8> {
    let d = match raw {
        "\\t" | "tab" => "\t",
        other => other,
    };
    match d.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => bail!(
            "CONFIG_INVALID pointer=/input/delimiter: expected a single ASCII character, got '{}'",
            raw
        ),
    }
}

fn get_str<'a>(v: &'a Value, ptr: &str) -> Result<Option<&'a str>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => bail!("CONFIG_TYPE pointer={} expected string, got {}", ptr, other),
    }
}

fn get_bool(v: &Value, ptr: &str) -> Result<Option<bool>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => bail!("CONFIG_TYPE pointer={} expected bool, got {}", ptr, other),
    }
}

fn get_i64(v: &Value, ptr: &str) -> Result<Option<i64>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(n @ Value::Number(_)) => n
            .as_i64()
            .map(Some)
            .with_context(|| format!("CONFIG_TYPE pointer={} expected integer, got {}", ptr, n)),
        Some(other) => bail!("CONFIG_TYPE pointer={} expected integer, got {}", ptr, other),
    }
}
