//! SwingLab CLI — backtest and parameter-search commands.
//!
//! Commands:
//! - `run` — replay one parameter set over a CSV series and print the trades
//! - `optimize` — search the parameter grid and report the best configuration

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use swinglab_core::domain::StrategyParams;
use swinglab_core::engine::{run_simulation, EngineConfig, RunResult};
use swinglab_runner::{load_series, search, PerformanceMetrics, SearchConfig};

#[derive(Parser)]
#[command(
    name = "swinglab",
    about = "SwingLab CLI — swing-strategy backtesting and parameter search"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a single parameter set over a CSV bar series.
    Run {
        /// CSV file with Date and Close columns (Open/High/Low/Volume optional).
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        #[command(flatten)]
        account: AccountArgs,
    },
    /// Search the parameter grid for the configuration with the best return.
    Optimize {
        /// CSV file with Date and Close columns (Open/High/Low/Volume optional).
        #[arg(long)]
        input: PathBuf,

        /// TOML search config. Omitted fields fall back to the stock grid.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the config's try budget.
        #[arg(long)]
        max_tries: Option<usize>,

        /// Override the config's sampling seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Write the best run as JSON.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ParamArgs {
    /// Maximum bars to hold a position.
    #[arg(long, default_value_t = 16)]
    hold_period: usize,

    /// RSI entry threshold (signal arms below this).
    #[arg(long, default_value_t = 30.0)]
    rsi_thresh: f64,

    /// CCI entry threshold (signal arms below this).
    #[arg(long, default_value_t = -100.0, allow_hyphen_values = true)]
    cci_thresh: f64,

    /// MACD histogram exit threshold (exit below this).
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    macd_hist_thresh: f64,

    /// Take-profit distance as a fraction of entry price.
    #[arg(long, default_value_t = 0.30)]
    tp_percent: f64,

    /// Bars between the armed signal and the entry fill.
    #[arg(long, default_value_t = 5)]
    entry_delay: usize,
}

impl ParamArgs {
    fn to_params(&self) -> StrategyParams {
        StrategyParams {
            hold_period: self.hold_period,
            rsi_thresh: self.rsi_thresh,
            cci_thresh: self.cci_thresh,
            macd_hist_thresh: self.macd_hist_thresh,
            tp_percent: self.tp_percent,
            entry_delay: self.entry_delay,
        }
    }
}

#[derive(Args)]
struct AccountArgs {
    /// Starting cash balance.
    #[arg(long, default_value_t = 10_000.0)]
    cash: f64,

    /// Commission per leg on traded notional (0.002 = 20 bps).
    #[arg(long, default_value_t = 0.002)]
    commission: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            params,
            account,
        } => run_cmd(&input, &params.to_params(), &account),
        Commands::Optimize {
            input,
            config,
            max_tries,
            seed,
            output,
        } => optimize_cmd(&input, config.as_deref(), max_tries, seed, output.as_deref()),
    }
}

fn run_cmd(input: &Path, params: &StrategyParams, account: &AccountArgs) -> Result<()> {
    let series = load_series(input)
        .with_context(|| format!("failed to load series from {}", input.display()))?;
    let config = EngineConfig::new(account.cash, account.commission);

    let result = run_simulation(&series, params, &config).context("simulation failed")?;
    let metrics = PerformanceMetrics::compute(&result);

    println!("Loaded {} bars from {}", series.len(), input.display());
    println!();
    print_trades(&result);
    print_metrics(&metrics, &result);
    Ok(())
}

fn optimize_cmd(
    input: &Path,
    config_path: Option<&Path>,
    max_tries: Option<usize>,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str::<SearchConfig>(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SearchConfig::default(),
    };
    if let Some(tries) = max_tries {
        config.max_tries = tries;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    config.validate().context("invalid search config")?;

    let series = load_series(input)
        .with_context(|| format!("failed to load series from {}", input.display()))?;

    let grid = config.to_grid();
    println!(
        "Loaded {} bars; searching {} candidates (budget {}, seed {})",
        series.len(),
        grid.size(),
        config.max_tries,
        config.seed
    );

    let outcome = search(&series, &grid, &config.settings()).context("search failed")?;

    println!();
    println!(
        "Evaluated {} of {} candidates ({})",
        outcome.evaluated,
        outcome.total_candidates,
        if outcome.sampled {
            "seeded sample"
        } else {
            "exhaustive"
        }
    );
    println!("Run id: {}", config.run_id());
    println!();
    println!("Best parameters (trial {}):", outcome.best.trial);
    let params = &outcome.best.result.params;
    println!("  hold_period       {}", params.hold_period);
    println!("  rsi_thresh        {}", params.rsi_thresh);
    println!("  cci_thresh        {}", params.cci_thresh);
    println!("  macd_hist_thresh  {}", params.macd_hist_thresh);
    println!("  tp_percent        {}", params.tp_percent);
    println!("  entry_delay       {}", params.entry_delay);
    println!();
    print_metrics(&outcome.best.metrics, &outcome.best.result);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&outcome.best)
            .context("failed to serialize best run")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!();
        println!("Best run written to {}", path.display());
    }

    Ok(())
}

fn print_trades(result: &RunResult) {
    if result.trades.is_empty() {
        println!("No trades.");
        return;
    }
    println!("Trades:");
    for trade in &result.trades {
        println!(
            "  {} -> {}  {:>9.2} -> {:>9.2}  {:?}  net {:>10.2}",
            trade.entry_date,
            trade.exit_date,
            trade.entry_price,
            trade.exit_price,
            trade.exit_reason,
            trade.net_pnl
        );
    }
    println!();
}

fn print_metrics(metrics: &PerformanceMetrics, result: &RunResult) {
    println!("Performance:");
    println!("  total return   {:>8.2}%", metrics.total_return_pct);
    println!("  max drawdown   {:>8.2}%", metrics.max_drawdown * 100.0);
    println!("  win rate       {:>8.2}%", metrics.win_rate * 100.0);
    println!("  profit factor  {:>8.2}", metrics.profit_factor);
    println!("  trades         {:>8}", metrics.trade_count);
    println!("  final equity   {:>8.2}", result.final_equity);
}
