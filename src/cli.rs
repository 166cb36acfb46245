//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvTradeAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::report_adapter_for;
use crate::adapters::tables::{format_fold_line, format_fold_summary, format_opt, format_text_table};
use crate::domain::config_validation::{
    validate_data_config, validate_fold_config, validate_selection_config,
    validate_walk_forward_config, validate_web_config,
};
use crate::domain::error::SlotwalkError;
use crate::domain::folds::{run_folds, FoldSummary, WindowType};
use crate::domain::params::{
    resolve_fold_plan, resolve_optimize_for, resolve_params, resolve_top_n, FoldOverrides,
    ParamOverrides,
};
use crate::domain::period::DataRange;
use crate::domain::slot_stats::OptimizeFor;
use crate::domain::trade::Trade;
use crate::domain::walk_forward::{self, WalkForwardResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportContext;
use crate::ports::trade_port::TradePort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8501";

#[derive(Parser, Debug)]
#[command(
    name = "slotwalk",
    about = "Walk-forward selection of trade entry time slots"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one lookback/forward analysis
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Trade CSV, overrides [data] path
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        lookback_start: Option<NaiveDate>,
        #[arg(long)]
        lookback_end: Option<NaiveDate>,
        #[arg(long)]
        forward_start: Option<NaiveDate>,
        #[arg(long)]
        forward_end: Option<NaiveDate>,
        /// pnl or pcr
        #[arg(long)]
        optimize_for: Option<OptimizeFor>,
        #[arg(long)]
        top_n: Option<usize>,
        /// Report file; .html/.htm writes HTML, anything else CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a rolling series of lookback/forward folds
    Folds {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        lookback_days: Option<i64>,
        #[arg(long)]
        forward_days: Option<i64>,
        #[arg(long)]
        step_days: Option<i64>,
        /// Grow the lookback from the first date instead of sliding it
        #[arg(long)]
        anchored: bool,
        #[arg(long)]
        optimize_for: Option<OptimizeFor>,
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Show the date range and trade count of the data
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        listen: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            data,
            lookback_start,
            lookback_end,
            forward_start,
            forward_end,
            optimize_for,
            top_n,
            output,
            dry_run,
        } => {
            let overrides = ParamOverrides {
                lookback_start,
                lookback_end,
                forward_start,
                forward_end,
                optimize_for,
                top_n,
            };
            run_walk_forward(&config, data.as_deref(), &overrides, output.as_deref(), dry_run)
        }
        Command::Folds {
            config,
            data,
            lookback_days,
            forward_days,
            step_days,
            anchored,
            optimize_for,
            top_n,
        } => {
            let overrides = FoldOverrides {
                lookback_days,
                forward_days,
                step_days,
                window: anchored.then_some(WindowType::Anchored),
            };
            run_fold_series(&config, data.as_deref(), &overrides, optimize_for, top_n)
        }
        Command::Info { config, data } => run_info(config.as_deref(), data.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Serve { config, listen } => run_serve(&config, listen),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SlotwalkError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// `--data` wins over `[data] path`.
pub fn resolve_data_path(
    data_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, SlotwalkError> {
    if let Some(p) = data_override {
        return Ok(p.to_path_buf());
    }
    config
        .get_string("data", "path")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| SlotwalkError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

/// Load every trade and its date range, failing on an empty source.
pub fn load_trades(port: &dyn TradePort) -> Result<(Vec<Trade>, DataRange), SlotwalkError> {
    let trades = port.load_trades()?;
    let range = DataRange::of(&trades).ok_or_else(|| SlotwalkError::NoData {
        source_name: port.source(),
    })?;
    log::info!("loaded {} trades from {}", trades.len(), port.source());
    Ok((trades, range))
}

fn fail(err: &SlotwalkError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn run_walk_forward(
    config_path: &Path,
    data_override: Option<&Path>,
    overrides: &ParamOverrides,
    output_path: Option<&Path>,
    dry_run: bool,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_walk_forward_config(&config) {
        return fail(&e);
    }
    let data_path = match resolve_data_path(data_override, &config) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let port = CsvTradeAdapter::new(data_path);
    let output = output_path
        .map(|p| p.display().to_string())
        .or_else(|| config.get_string("report", "output"));

    if dry_run {
        return run_dry_run(&port, &config, overrides, output.as_deref());
    }
    run_pipeline(&port, &config, overrides, output.as_deref())
}

/// Load, resolve parameters, analyse, print tables and write the report.
pub fn run_pipeline(
    port: &dyn TradePort,
    config: &dyn ConfigPort,
    overrides: &ParamOverrides,
    output_path: Option<&str>,
) -> ExitCode {
    eprintln!("Loading trades from {}", port.source());
    let (trades, range) = match load_trades(port) {
        Ok(t) => t,
        Err(e) => return fail(&e),
    };
    eprintln!(
        "  {} trades, {} to {}",
        range.trades, range.first, range.last
    );

    let params = match resolve_params(config, overrides, &range) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    eprintln!(
        "Running walk-forward: lookback {}, forward {}, top {} by {}",
        params.lookback, params.forward, params.top_n, params.optimize_for
    );
    let result = walk_forward::run(&trades, &params);
    print_result(&result);

    let Some(output) = output_path else {
        return ExitCode::SUCCESS;
    };
    let source = port.source();
    let ctx = ReportContext {
        source: &source,
        range: &range,
        result: &result,
    };
    match report_adapter_for(output).write(&ctx, output) {
        Ok(()) => {
            eprintln!("\nReport written to: {output}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn print_result(result: &WalkForwardResult) {
    println!("Lookback Period Analysis ({})", result.params.lookback);
    print!("{}", format_text_table(&result.lookback));
    println!();
    println!("Forward Testing Results ({})", result.params.forward);
    print!("{}", format_text_table(&result.forward));
    println!();
    println!("Overall Performance");
    println!("  Average PnL:  {}", format_opt(result.overall.avg_pnl));
    println!("  Average PCR:  {}", format_opt(result.overall.avg_pcr));
    println!("  Slots:        {}", result.overall.slots);
    println!("  Trades:       {}", result.overall.trades);
    println!("  Total PnL:    {:.2}", result.overall.total_pnl);
}

/// Resolve everything a real run would, without analysing.
pub fn run_dry_run(
    port: &dyn TradePort,
    config: &dyn ConfigPort,
    overrides: &ParamOverrides,
    output_path: Option<&str>,
) -> ExitCode {
    let (_, range) = match load_trades(port) {
        Ok(t) => t,
        Err(e) => return fail(&e),
    };
    let params = match resolve_params(config, overrides, &range) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    eprintln!("Config validated successfully");
    eprintln!("\nData:");
    eprintln!("  source: {}", port.source());
    eprintln!("  range:  {} to {} ({} trades)", range.first, range.last, range.trades);
    eprintln!("\nParameters:");
    eprintln!("  lookback:     {}", params.lookback);
    eprintln!("  forward:      {}", params.forward);
    eprintln!("  optimize for: {}", params.optimize_for);
    eprintln!("  top n:        {}", params.top_n);
    if let Some(output) = output_path {
        eprintln!("  report:       {output}");
    }
    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_fold_series(
    config_path: &Path,
    data_override: Option<&Path>,
    overrides: &FoldOverrides,
    optimize_for: Option<OptimizeFor>,
    top_n: Option<usize>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_fold_config(&config).and_then(|_| validate_selection_config(&config))
    {
        return fail(&e);
    }
    let data_path = match resolve_data_path(data_override, &config) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    run_fold_pipeline(
        &CsvTradeAdapter::new(data_path),
        &config,
        overrides,
        optimize_for,
        top_n,
    )
}

pub fn run_fold_pipeline(
    port: &dyn TradePort,
    config: &dyn ConfigPort,
    overrides: &FoldOverrides,
    optimize_for: Option<OptimizeFor>,
    top_n: Option<usize>,
) -> ExitCode {
    let (trades, range) = match load_trades(port) {
        Ok(t) => t,
        Err(e) => return fail(&e),
    };
    let plan = match resolve_fold_plan(config, overrides) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let metric = match resolve_optimize_for(config, optimize_for) {
        Ok(m) => m,
        Err(e) => return fail(&e),
    };
    let top_n = match resolve_top_n(config, top_n) {
        Ok(n) => n,
        Err(e) => return fail(&e),
    };

    eprintln!(
        "Running {} folds: lookback {} days, forward {} days, step {} days, top {} by {}",
        plan.window, plan.lookback_days, plan.forward_days, plan.step_days, top_n, metric
    );
    let folds = match run_folds(&trades, &range, &plan, metric, top_n) {
        Ok(f) => f,
        Err(e) => return fail(&e),
    };

    println!("Rolling Walk-Forward ({} to {})", range.first, range.last);
    for fold in &folds {
        println!("{}", format_fold_line(fold));
    }
    println!();
    println!("{}", format_fold_summary(&FoldSummary::from_folds(&folds)));
    ExitCode::SUCCESS
}

fn run_info(config_path: Option<&Path>, data_override: Option<&Path>) -> ExitCode {
    let config = match config_path {
        Some(p) => match load_config(p) {
            Ok(c) => c,
            Err(code) => return code,
        },
        None => FileConfigAdapter::empty(),
    };
    let data_path = match resolve_data_path(data_override, &config) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    print_info(&CsvTradeAdapter::new(data_path))
}

pub fn print_info(port: &dyn TradePort) -> ExitCode {
    match port.data_range() {
        Ok(Some(range)) => {
            println!(
                "{}: {} trades, {} to {}",
                port.source(),
                range.trades,
                range.first,
                range.last
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", port.source());
            ExitCode::from(5)
        }
        Err(e) => fail(&e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    match validate_all(&config) {
        Ok(()) => {
            eprintln!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Every section check `validate` runs, in file order.
pub fn validate_all(config: &dyn ConfigPort) -> Result<(), SlotwalkError> {
    validate_data_config(config)?;
    validate_walk_forward_config(config)?;
    validate_fold_config(config)?;
    validate_web_config(config)?;
    Ok(())
}

/// `--listen` wins over `[web] listen`.
pub fn resolve_listen(
    listen_override: Option<String>,
    config: &dyn ConfigPort,
) -> Result<std::net::SocketAddr, SlotwalkError> {
    let raw = listen_override
        .or_else(|| config.get_string("web", "listen"))
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    raw.parse()
        .map_err(|_| SlotwalkError::invalid_parameter("listen", format!("'{raw}' is not a socket address")))
}

fn run_serve(config_path: &Path, listen_override: Option<String>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use std::sync::Arc;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };
        if let Err(e) = validate_data_config(&config) {
            return fail(&e);
        }
        let data_path = match resolve_data_path(None, &config) {
            Ok(p) => p,
            Err(e) => return fail(&e),
        };
        let addr = match resolve_listen(listen_override, &config) {
            Ok(a) => a,
            Err(e) => return fail(&e),
        };

        let state = AppState {
            trade_port: Arc::new(CsvTradeAdapter::new(data_path)),
            config: Arc::new(config),
        };
        let router = build_router(state);

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(r) => r,
            Err(e) => return fail(&SlotwalkError::Io(e)),
        };

        eprintln!("Starting web server on http://{addr}");
        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        });
        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&SlotwalkError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (config_path, listen_override);
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
