//! `hpd report`: load ledger -> match per instrument -> print lots.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use hpd_config::{OutputFormat, ReportConfig, UnusedKeyPolicy};
use hpd_ingest::{load_ledger_file, DayBasis};
use hpd_lots::compute_all_with;
use tracing::{info, warn};

use crate::render;

/// Exit status when at least one instrument could not be matched.
pub const EXIT_INSTRUMENT_FAILURES: u8 = 2;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Ledger CSV (default: config /input/path, else dati.csv)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Layered YAML config paths in merge order
    #[arg(long = "config", short = 'c')]
    pub config_paths: Vec<String>,

    /// Output format (table | json)
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Disable ANSI colours
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Fail instruments whose open lots have no terminal valuation
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Day used to close open lots (year-relative basis)
    #[arg(long)]
    pub horizon_day: Option<i64>,

    /// Day axis for dates (year_relative | absolute)
    #[arg(long)]
    pub day_basis: Option<DayBasis>,

    /// Valuation date closing open lots, in the input date format
    #[arg(long)]
    pub valuation_date: Option<String>,

    /// Treat unused config keys as an error
    #[arg(long, default_value_t = false)]
    pub fail_on_unused_config: bool,
}

pub fn run(args: ReportArgs) -> Result<ExitCode> {
    let policy = if args.fail_on_unused_config {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let loaded_cfg = super::load_config(&args.config_paths, policy)?;
    let cfg = effective_config(&loaded_cfg.config_json, &args)?;
    let match_policy = cfg.match_policy()?;

    let loaded = load_ledger_file(&cfg.input_path, &cfg.loader)
        .with_context(|| format!("load ledger failed: {}", cfg.input_path.display()))?;
    info!(
        path = %cfg.input_path.display(),
        instruments = loaded.ledger.len(),
        transactions = loaded.ledger.transaction_count(),
        skipped = loaded.report.rows_skipped,
        config_hash = %loaded_cfg.config_hash,
        "ledger ready"
    );

    let report = compute_all_with(&loaded.ledger, &loaded.valuations, &match_policy);

    match cfg.format {
        OutputFormat::Table => {
            print!("{}", render::table(&report, cfg.color));
            eprint!("{}", render::diagnostics(&report, cfg.color));
        }
        OutputFormat::Json => {
            let doc = render::JsonReport::new(&loaded_cfg.config_hash, &loaded.report, &report);
            println!(
                "{}",
                serde_json::to_string_pretty(&doc).context("serialize report json failed")?
            );
        }
    }

    if report.failures.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(failed = report.failures.len(), "some instruments were not matched");
        Ok(ExitCode::from(EXIT_INSTRUMENT_FAILURES))
    }
}

/// Config file values with CLI flags layered on top.
fn effective_config(config_json: &serde_json::Value, args: &ReportArgs) -> Result<ReportConfig> {
    let mut cfg = ReportConfig::from_json(config_json)?;

    if let Some(p) = &args.input {
        cfg.input_path = p.clone();
    }
    if let Some(f) = args.format {
        cfg.format = f;
    }
    if args.no_color || super::no_color_env() {
        cfg.color = false;
    }
    if args.strict {
        cfg.require_terminal_valuation = true;
    }
    if let Some(h) = args.horizon_day {
        cfg.horizon_day = h;
    }
    if let Some(b) = args.day_basis {
        cfg.loader.day_basis = b;
    }
    if let Some(raw) = &args.valuation_date {
        let date = hpd_ingest::parse_date(raw, &cfg.loader.date_format).with_context(|| {
            format!(
                "invalid --valuation-date '{}' (expected format '{}')",
                raw, cfg.loader.date_format
            )
        })?;
        cfg.valuation_date = Some(date);
    }

    Ok(cfg)
}
