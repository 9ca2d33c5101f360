//! Dividend Planner CLI
//!
//! Command-line front end for DRIP projections, cost basis and hedge estimates

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use dividend_planner::cost_basis::{self, CostBasisLot};
use dividend_planner::export::{projection_csv_string, render_report, write_projection_csv_file};
use dividend_planner::hedge::{
    compare_expirations, estimate, lookup_chain, ChainLookup, ComparisonOutcome, CsvChainSource,
    Expiration, HedgeEstimate, HedgeRequest,
};
use dividend_planner::scenario::ScenarioRunner;
use dividend_planner::simulation::{
    SimulationParameters, SimulationResult, Simulator, ValidationMode,
};
use dividend_planner::DataUnavailableError;

#[derive(Debug, Parser)]
#[command(
    name = "dividend_planner",
    version,
    about = "DRIP projections, cost basis and hedge estimates"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project share growth month by month
    Simulate {
        #[command(flatten)]
        params: SimulationArgs,

        /// Fail if the share count ever drops below zero
        #[arg(long)]
        strict: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also write the projection CSV to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Title line for the text report
        #[arg(long, default_value = "MSTY Stock Report")]
        title: String,
    },

    /// Compare final positions across DRIP percentages
    Sweep {
        #[command(flatten)]
        params: SimulationArgs,

        /// DRIP percentages to try
        #[arg(long, value_delimiter = ',', default_values_t = vec![0.0, 25.0, 50.0, 75.0, 100.0])]
        drip_steps: Vec<f64>,
    },

    /// Weighted average cost across purchase lots
    CostBasis {
        /// CSV file with `Shares,Price Per Share` columns
        #[arg(long)]
        file: Option<PathBuf>,

        /// Inline lot as SHARES:PRICE (repeatable)
        #[arg(long = "lot", value_parser = parse_lot)]
        lots: Vec<CostBasisLot>,
    },

    /// Estimate a protective-put hedge
    Hedge {
        #[arg(long, default_value_t = 10_000.0)]
        shares: f64,

        /// Current price of the underlying
        #[arg(long, default_value_t = 25.0)]
        price: f64,

        /// Expected exit price
        #[arg(long, default_value_t = 10.0)]
        exit: f64,

        /// Options chain CSV (`symbol,expiration,strike,lastPrice`).
        /// Omit for the simplified estimate.
        #[arg(long)]
        chain: Option<PathBuf>,

        #[arg(long, default_value = "MSTY")]
        symbol: String,

        /// Expiration date (YYYY-MM-DD); defaults to the nearest listed
        #[arg(long)]
        expiration: Option<NaiveDate>,

        /// Price every listed expiration
        #[arg(long)]
        compare: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Debug, Args)]
struct SimulationArgs {
    /// Starting share count
    #[arg(long, default_value_t = 10_000.0)]
    shares: f64,

    /// Average monthly dividend per share ($)
    #[arg(long, default_value_t = 2.0)]
    dividend: f64,

    /// Average reinvestment price ($)
    #[arg(long, default_value_t = 25.0)]
    reinvest_price: f64,

    /// Simulation period in months
    #[arg(long, default_value_t = 48)]
    months: u32,

    /// Percentage of dividends reinvested (0-100)
    #[arg(long, default_value_t = 100.0)]
    drip: f64,

    /// Fixed monthly withdrawal ($)
    #[arg(long, default_value_t = 0.0)]
    withdrawal: f64,

    /// Tax rate on dividends (0-100)
    #[arg(long, default_value_t = 0.0)]
    tax: f64,
}

impl From<SimulationArgs> for SimulationParameters {
    fn from(args: SimulationArgs) -> Self {
        Self {
            initial_shares: args.shares,
            monthly_dividend_per_share: args.dividend,
            reinvestment_price: args.reinvest_price,
            periods: args.months,
            drip_percent: args.drip,
            monthly_withdrawal: args.withdrawal,
            tax_rate_percent: args.tax,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
    Report,
}

fn parse_lot(raw: &str) -> Result<CostBasisLot, String> {
    let (shares, price) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected SHARES:PRICE, got '{}'", raw))?;
    let shares: f64 = shares
        .trim()
        .parse()
        .map_err(|e| format!("bad share count '{}': {}", shares, e))?;
    let price: f64 = price.trim().parse().map_err(|e| format!("bad price '{}': {}", price, e))?;
    Ok(CostBasisLot::new(shares, price))
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Simulate { params, strict, format, output, title } => {
            run_simulate(params.into(), strict, format, output, &title)
        }
        Command::Sweep { params, drip_steps } => run_sweep(params.into(), &drip_steps),
        Command::CostBasis { file, lots } => run_cost_basis(file, lots),
        Command::Hedge { shares, price, exit, chain, symbol, expiration, compare, format } => {
            let request = HedgeRequest {
                shares_to_hedge: shares,
                current_price: price,
                expected_exit_price: exit,
            };
            run_hedge(request, chain, &symbol, expiration, compare, format)
        }
    }
}

fn run_simulate(
    params: SimulationParameters,
    strict: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
    title: &str,
) -> Result<()> {
    let simulator = Simulator::new(params).context("invalid simulation parameters")?;
    let mode = if strict { ValidationMode::Strict } else { ValidationMode::Lenient };
    let result = simulator.run_with_mode(mode)?;

    if let Some(path) = output {
        write_projection_csv_file(&result.snapshots, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Projection written to {}", path.display());
    }

    match format {
        OutputFormat::Table => print_projection_table(&result),
        OutputFormat::Csv => print!("{}", projection_csv_string(&result.snapshots)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Report => print!("{}", render_report(title, &result)),
    }

    Ok(())
}

fn print_projection_table(result: &SimulationResult) {
    println!(
        "{:>5} {:>16} {:>14} {:>14} {:>14}",
        "Month", "Total Shares", "Shares Bought", "Dividends", "Reinvested"
    );
    println!("{}", "-".repeat(67));

    for row in &result.snapshots {
        println!(
            "{:>5} {:>16.4} {:>14.4} {:>14.2} {:>14.2}",
            row.month,
            row.total_shares,
            row.shares_bought,
            row.gross_dividends,
            row.reinvested_cash,
        );
    }

    let summary = result.summary();
    println!();
    println!("Final Shares:     {:.4}", summary.final_shares);
    println!("Total Dividends:  ${:.2}", summary.total_gross_dividends);
    println!("Total Reinvested: ${:.2}", summary.total_reinvested);
}

fn run_sweep(params: SimulationParameters, drip_steps: &[f64]) -> Result<()> {
    let runner = ScenarioRunner::new(params);
    let points = runner.drip_sweep(drip_steps).context("invalid sweep parameters")?;

    println!(
        "{:>6} {:>16} {:>16} {:>16}",
        "DRIP%", "Final Shares", "Dividends", "Reinvested"
    );
    for point in &points {
        println!(
            "{:>6.1} {:>16.4} {:>16.2} {:>16.2}",
            point.drip_percent,
            point.summary.final_shares,
            point.summary.total_gross_dividends,
            point.summary.total_reinvested,
        );
    }
    Ok(())
}

fn run_cost_basis(file: Option<PathBuf>, mut lots: Vec<CostBasisLot>) -> Result<()> {
    if let Some(path) = file {
        let loaded = cost_basis::load_lots(&path)
            .with_context(|| format!("failed to load lots from {}", path.display()))?;
        lots.extend(loaded);
    }
    if lots.is_empty() {
        bail!("no lots given; pass --file or --lot SHARES:PRICE");
    }

    let summary = cost_basis::summarize(&lots);
    println!("Lots:              {}", lots.len());
    println!("Total Shares:      {:.4}", summary.total_shares);
    println!("Total Cost:        ${:.2}", summary.total_cost);
    println!("Weighted Avg Cost: ${:.2}", summary.weighted_average_cost);
    Ok(())
}

fn run_hedge(
    request: HedgeRequest,
    chain: Option<PathBuf>,
    symbol: &str,
    expiration: Option<NaiveDate>,
    compare: bool,
    format: OutputFormat,
) -> Result<()> {
    request.validate().context("invalid hedge request")?;

    if compare {
        let path = chain.ok_or_else(|| anyhow!("--compare needs --chain"))?;
        let source = CsvChainSource::new(path);
        let rows = compare_expirations(&source, symbol, &request)?;

        if format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }
        println!(
            "{:>12} {:>8} {:>10} {:>14} {:>14}",
            "Expiration", "Strike", "Premium", "Hedge Cost", "Net Benefit"
        );
        for row in &rows {
            match &row.outcome {
                ComparisonOutcome::Estimated(r) => println!(
                    "{:>12} {:>8.2} {:>10.2} {:>14.2} {:>14.2}",
                    row.expiration,
                    r.suggested_strike,
                    r.estimated_premium_per_share,
                    r.total_hedge_cost,
                    r.net_hedge_benefit
                ),
                ComparisonOutcome::Unavailable { reason } => {
                    println!("{:>12} {}", row.expiration, reason)
                }
            }
        }
        return Ok(());
    }

    let lookup = match chain {
        Some(path) => {
            let source = CsvChainSource::new(path);
            let wanted = expiration.map(Expiration::On).unwrap_or(Expiration::Nearest);
            lookup_chain(&source, symbol, wanted)
        }
        None => ChainLookup::Unavailable(DataUnavailableError::Source(
            "no options chain supplied".to_string(),
        )),
    };

    let result = estimate(&request, lookup);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match &result {
        HedgeEstimate::Live(r) => {
            if let Some(exp) = r.expiration {
                println!("Expiration:                 {}", exp);
            }
            println!("Suggested Strike:           ${:.2}", r.suggested_strike);
            println!("Premium per Share:          ${:.2}", r.estimated_premium_per_share);
            println!("Contracts:                  {:.2}", r.total_contracts);
            println!("Total Hedge Cost:           ${:.2}", r.total_hedge_cost);
            println!("Cash Out at Exit:           ${:.2}", r.exit_cashout);
            println!("Put Payout at Exit:         ${:.2}", r.payout);
            println!("Net Hedge Benefit:          ${:.2}", r.net_hedge_benefit);
        }
        HedgeEstimate::Simplified { estimate: fallback, reason } => {
            println!("Note: {} (simplified estimate)", reason);
            println!("Prefilled Strike Price:     ${:.2}", fallback.min_strike);
            println!("Premium per Share:          ${:.2}", fallback.estimated_premium_per_share);
            println!("Total Estimated Cash Out:   ${:.2}", fallback.exit_cashout);
        }
    }

    Ok(())
}
