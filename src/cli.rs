//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    load_screen_config, read_gap_fill_limit, read_save_csv, validate_screen_config,
    DEFAULT_GAP_FILL_LIMIT,
};
use crate::domain::error::ScreenerError;
use crate::domain::gate::ReturnFormula;
use crate::domain::indicator::Parallelism;
use crate::domain::rank::RankedRecord;
use crate::domain::screen::{run_screen, ScreenConfig, ScreenReport};
use crate::domain::universe::{
    available_indices, index_universe, parse_codes, ticker_list, Universe,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

/// File label used when the universe is an explicit code list.
pub const CUSTOM_UNIVERSE_LABEL: &str = "custom";

#[derive(Parser, Debug)]
#[command(
    name = "momentum-screener",
    version,
    about = "Momentum stock screener: trend, proximity, consistency and performance gates"
)]
pub struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the screen over a universe
    Screen {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Named index universe, e.g. nifty_50
        #[arg(short, long, conflicts_with = "codes")]
        index: Option<String>,
        /// Comma-separated symbols
        #[arg(long)]
        codes: Option<String>,
        /// Directory of <SYMBOL>.csv price files
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
        /// Use (price / price_12m_ago - 1) * 100 for the performance gate
        #[arg(short = 's', long)]
        use_standard_return: bool,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Don't write result CSV files
        #[arg(long)]
        no_save: bool,
        /// Compute indicators on one thread
        #[arg(long)]
        sequential: bool,
    },
    /// List the named index universes
    ListIndices,
    /// Print the symbols of one index
    Tickers { index: String },
    /// Validate a screen configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        codes: Option<String>,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ScreenOverrides {
    pub index: Option<String>,
    pub codes: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub top_n: Option<usize>,
    pub use_standard_return: bool,
    pub output_dir: Option<PathBuf>,
    pub no_save: bool,
    pub sequential: bool,
}

pub fn init_logging(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_target(false)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Screen {
            config,
            index,
            codes,
            data_dir,
            top_n,
            use_standard_return,
            output_dir,
            no_save,
            sequential,
        } => {
            let overrides = ScreenOverrides {
                index,
                codes,
                data_dir,
                top_n,
                use_standard_return,
                output_dir,
                no_save,
                sequential,
            };
            run_screen_command(config.as_deref(), &overrides)
        }
        Command::ListIndices => run_list_indices(),
        Command::Tickers { index } => run_tickers(&index),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, codes } => run_info(&config, codes.as_deref()),
    }
}

fn fail(err: &ScreenerError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

/// Merge the config file (if any) with command-line overrides.
pub fn build_screen_config(
    config: Option<&dyn ConfigPort>,
    overrides: &ScreenOverrides,
) -> Result<ScreenConfig, ScreenerError> {
    let mut screen = match config {
        Some(c) => load_screen_config(c)?,
        None => ScreenConfig::default(),
    };

    if let Some(top_n) = overrides.top_n {
        if top_n < 1 {
            return Err(ScreenerError::InvalidTopN(top_n));
        }
        screen.top_n = top_n;
    }
    if overrides.use_standard_return {
        screen.formula = ReturnFormula::Standard;
    }
    if overrides.sequential {
        screen.parallelism = Parallelism::Sequential;
    }
    Ok(screen)
}

/// Universe from `--codes`, `--index`, then `[screen] codes`, then
/// `[screen] index`.
pub fn resolve_universe(
    config: Option<&dyn ConfigPort>,
    overrides: &ScreenOverrides,
) -> Result<Universe, ScreenerError> {
    let from_config = |key: &str| {
        config
            .and_then(|c| c.get_string("screen", key))
            .filter(|s| !s.trim().is_empty())
    };

    let codes = overrides.codes.clone().or_else(|| {
        if overrides.index.is_some() {
            None
        } else {
            from_config("codes")
        }
    });

    if let Some(codes) = codes {
        let codes = parse_codes(&codes).map_err(|e| ScreenerError::ConfigInvalid {
            section: "screen".to_string(),
            key: "codes".to_string(),
            reason: e.to_string(),
        })?;
        return Ok(Universe {
            name: CUSTOM_UNIVERSE_LABEL.to_string(),
            codes,
        });
    }

    match overrides.index.clone().or_else(|| from_config("index")) {
        Some(index) => index_universe(&index),
        None => Err(ScreenerError::ConfigMissing {
            section: "screen".to_string(),
            key: "index".to_string(),
        }),
    }
}

fn resolve_data_dir(
    config: Option<&dyn ConfigPort>,
    overrides: &ScreenOverrides,
) -> Result<PathBuf, ScreenerError> {
    overrides
        .data_dir
        .clone()
        .or_else(|| {
            config
                .and_then(|c| c.get_string("data", "directory"))
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
        })
        .ok_or_else(|| ScreenerError::ConfigMissing {
            section: "data".to_string(),
            key: "directory".to_string(),
        })
}

fn resolve_output(
    config: Option<&dyn ConfigPort>,
    overrides: &ScreenOverrides,
) -> Result<Option<PathBuf>, ScreenerError> {
    let save_csv = match config {
        Some(c) => read_save_csv(c)?,
        None => true,
    };
    if overrides.no_save || !save_csv {
        return Ok(None);
    }
    let dir = overrides.output_dir.clone().unwrap_or_else(|| {
        config
            .and_then(|c| c.get_string("output", "directory"))
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    Ok(Some(dir))
}

fn build_data_adapter(
    config: Option<&dyn ConfigPort>,
    overrides: &ScreenOverrides,
) -> Result<CsvAdapter, ScreenerError> {
    let data_dir = resolve_data_dir(config, overrides)?;
    let gap_fill_limit = match config {
        Some(c) => read_gap_fill_limit(c)?,
        None => DEFAULT_GAP_FILL_LIMIT,
    };
    debug!(
        "reading prices from {} (gap fill limit {})",
        data_dir.display(),
        gap_fill_limit
    );
    Ok(CsvAdapter::new(data_dir).with_gap_fill_limit(gap_fill_limit))
}

/// Load prices, screen, log the summary. Fails only when nothing could be
/// loaded or the configuration is invalid.
pub fn screen_universe(
    data: &dyn DataPort,
    universe: &Universe,
    config: &ScreenConfig,
) -> Result<ScreenReport, ScreenerError> {
    info!(
        "screening {} ({} symbols, top_n={}, formula={})",
        universe.name,
        universe.count(),
        config.top_n,
        config.formula
    );

    let (history, failures) = data.fetch_history(&universe.codes);
    for (symbol, err) in &failures {
        warn!("skipping {}: {}", symbol, err);
    }
    if history.is_empty() {
        return Err(ScreenerError::NoData {
            requested: universe.count(),
        });
    }
    info!("loaded {} of {} symbols", history.len(), universe.count());

    let report = run_screen(&history, config)?;
    log_summary(&report);
    Ok(report)
}

fn log_summary(report: &ScreenReport) {
    let s = &report.summary;
    info!(
        "{} evaluated, {} passed all gates, {} selected, {} rejected",
        s.evaluated, s.passed, s.selected, s.rejected
    );
    let b = &s.breakdown;
    info!(
        "rejections: insufficient data {}, trend {}, proximity {}, consistency {}, performance {}",
        b.insufficient_data,
        b.failed_trend,
        b.failed_proximity,
        b.failed_consistency,
        b.failed_performance
    );
}

fn fmt_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

/// Plain-text table of the ranked shortlist.
pub fn format_top_table(top: &[RankedRecord]) -> String {
    if top.is_empty() {
        return "No stocks passed the screening criteria.\n".to_string();
    }

    let mut out = format!("TOP {} MOMENTUM STOCKS\n", top.len());
    out.push_str(&format!(
        "{:<16} {:>12} {:>10} {:>10} {:>10}\n",
        "ticker", "price", "return_6m", "return_12m", "final_rank"
    ));
    for r in top {
        let price = r.result.metrics().map(|m| m.current_price);
        out.push_str(&format!(
            "{:<16} {:>12} {:>10} {:>10} {:>10}\n",
            r.symbol(),
            fmt_cell(price),
            fmt_cell(r.result.return_6m()),
            fmt_cell(r.result.return_12m()),
            r.final_rank
        ));
    }
    out
}

fn run_screen_command(config_path: Option<&Path>, overrides: &ScreenOverrides) -> ExitCode {
    let adapter = match config_path.map(load_config).transpose() {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config: Option<&dyn ConfigPort> = adapter.as_ref().map(|a| a as &dyn ConfigPort);

    let prepared = build_screen_config(config, overrides).and_then(|screen| {
        let universe = resolve_universe(config, overrides)?;
        let data = build_data_adapter(config, overrides)?;
        let output = resolve_output(config, overrides)?;
        Ok((screen, universe, data, output))
    });
    let (screen, universe, data, output) = match prepared {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let report = match screen_universe(&data, &universe, &screen) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    print!("{}", format_top_table(&report.top));

    if let Some(output_dir) = output {
        let writer = CsvReportAdapter::new(output_dir);
        let as_of = Local::now().date_naive();
        if let Err(e) = writer.write(&report, &universe.name, as_of) {
            return fail(&e);
        }
    }

    ExitCode::SUCCESS
}

fn run_list_indices() -> ExitCode {
    for name in available_indices() {
        match ticker_list(name) {
            Ok(tickers) => println!("{:<20} {:>4} symbols", name, tickers.len()),
            Err(e) => return fail(&e),
        }
    }
    ExitCode::SUCCESS
}

fn run_tickers(index: &str) -> ExitCode {
    match ticker_list(index) {
        Ok(tickers) => {
            for t in &tickers {
                println!("{}", t);
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_screen_config(&adapter) {
        return fail(&e);
    }

    let summary = load_screen_config(&adapter).and_then(|screen| {
        let universe = resolve_universe(Some(&adapter), &ScreenOverrides::default())?;
        Ok((screen, universe))
    });
    match summary {
        Ok((screen, universe)) => {
            eprintln!("Universe:       {} ({} symbols)", universe.name, universe.count());
            eprintln!("Top N:          {}", screen.top_n);
            eprintln!("Return formula: {}", screen.formula);
            eprintln!("\nScreen configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_info(config_path: &Path, codes: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let overrides = ScreenOverrides {
        codes: codes.map(str::to_string),
        ..ScreenOverrides::default()
    };

    let data = match build_data_adapter(Some(&adapter), &overrides) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    let symbols = match codes {
        Some(_) => resolve_universe(Some(&adapter), &overrides).map(|u| u.codes),
        None => data.list_symbols(),
    };
    let symbols = match symbols {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    for symbol in &symbols {
        match data.get_data_range(symbol) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} bars, {} to {}", symbol, count, first, last)
            }
            Ok(None) => eprintln!("{}: no data found", symbol),
            Err(e) => eprintln!("error querying {}: {}", symbol, e),
        }
    }
    ExitCode::SUCCESS
}
