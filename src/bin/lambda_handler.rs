//! AWS Lambda handler for the planner
//!
//! Accepts a JSON request tagged with an `action` (`simulate`, `costBasis`,
//! `hedge`) and returns the calculation result as JSON. Invalid input is
//! reported in the `error` field of the response rather than failing the
//! invocation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dividend_planner::{
    cost_basis::{self, CostBasisLot, CostBasisSummary},
    export::projection_csv_string,
    hedge::{
        compare_expirations, estimate, lookup_chain_with_timeout, ChainLookup, Expiration,
        ExpirationComparison, HedgeEstimate, HedgeRequest, OptionContract, OptionsChainSource,
        StaticChainSource,
    },
    simulation::{SimulationParameters, SimulationResult, SimulationSummary, Simulator, ValidationMode},
    DataUnavailableError,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Input payload, selected by `action`
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlannerRequest {
    Simulate {
        #[serde(flatten)]
        params: SimulationParameters,

        /// Fail instead of reporting negative share counts
        #[serde(default)]
        strict: bool,

        /// Include the projection as CSV text
        #[serde(default)]
        include_csv: bool,
    },
    CostBasis {
        lots: Vec<CostBasisLot>,
    },
    Hedge {
        #[serde(flatten)]
        request: HedgeRequest,

        #[serde(default = "default_symbol")]
        symbol: String,

        /// Expiration to price against (default: nearest listed)
        #[serde(default)]
        expiration: Option<NaiveDate>,

        /// Put rows supplied by the caller; omit for the simplified estimate
        #[serde(default)]
        chain: Option<Vec<ChainRow>>,

        /// Price every listed expiration
        #[serde(default)]
        compare: bool,

        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRow {
    pub expiration: NaiveDate,
    pub strike: f64,
    #[serde(alias = "last_price")]
    pub last_price: f64,
}

fn default_symbol() -> String { "MSTY".to_string() }
fn default_timeout_ms() -> u64 { 5_000 }

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlannerResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_basis: Option<CostBasisSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hedge: Option<HedgeEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Vec<ExpirationComparison>>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutput {
    pub summary: SimulationSummary,
    pub result: SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
}

async fn process(request: PlannerRequest) -> Result<PlannerResponse> {
    let mut response = PlannerResponse::default();

    match request {
        PlannerRequest::Simulate { params, strict, include_csv } => {
            let simulator = Simulator::new(params).context("invalid simulation parameters")?;
            let mode = if strict { ValidationMode::Strict } else { ValidationMode::Lenient };
            let result = simulator.run_with_mode(mode)?;
            let csv = if include_csv {
                Some(projection_csv_string(&result.snapshots)?)
            } else {
                None
            };
            response.simulation = Some(SimulationOutput {
                summary: result.summary(),
                result,
                csv,
            });
        }
        PlannerRequest::CostBasis { lots } => {
            response.cost_basis = Some(cost_basis::summarize(&lots));
        }
        PlannerRequest::Hedge { request, symbol, expiration, chain, compare, timeout_ms } => {
            request.validate().context("invalid hedge request")?;

            let source = chain.map(|rows| build_source(&symbol, rows));

            if compare {
                let source = source.context("comparison needs a chain")?;
                response.comparison = Some(compare_expirations(&source, &symbol, &request)?);
            } else {
                let lookup = match source {
                    Some(source) => {
                        let source: Arc<dyn OptionsChainSource> = Arc::new(source);
                        let wanted = expiration.map(Expiration::On).unwrap_or(Expiration::Nearest);
                        lookup_chain_with_timeout(source, symbol, wanted, Duration::from_millis(timeout_ms)).await
                    }
                    None => ChainLookup::Unavailable(DataUnavailableError::Source(
                        "no options chain supplied".to_string(),
                    )),
                };
                response.hedge = Some(estimate(&request, lookup));
            }
        }
    }

    Ok(response)
}

fn build_source(symbol: &str, rows: Vec<ChainRow>) -> StaticChainSource {
    let mut source = StaticChainSource::new();
    for row in rows {
        source.insert(symbol, row.expiration, vec![OptionContract::new(row.strike, row.last_price)]);
    }
    source
}

/// Lambda handler function
async fn handler(event: LambdaEvent<serde_json::Value>) -> Result<PlannerResponse, Error> {
    let start = Instant::now();

    let mut response = match serde_json::from_value::<PlannerRequest>(event.payload) {
        Ok(request) => process(request).await.unwrap_or_else(|e| PlannerResponse {
            error: Some(format!("{:#}", e)),
            ..Default::default()
        }),
        Err(e) => PlannerResponse {
            error: Some(format!("Invalid JSON: {}", e)),
            ..Default::default()
        },
    };

    response.execution_time_ms = start.elapsed().as_millis() as u64;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use dividend_planner::{hedge::ComparisonOutcome, ConfigurationError};
    use serde_json::json;

    fn parse(value: serde_json::Value) -> PlannerRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_simulate_with_defaults() {
        let request = parse(json!({"action": "simulate", "periods": 1, "includeCsv": true}));
        let response = process(request).await.unwrap();

        let output = response.simulation.unwrap();
        assert_eq!(output.result.snapshots.len(), 1);
        assert_eq!(output.summary.final_shares, 10_800.0);
        assert!(output.csv.unwrap().starts_with("Month,Total Shares"));
    }

    #[tokio::test]
    async fn test_invalid_simulation_is_an_error() {
        let request = parse(json!({"action": "simulate", "reinvestmentPrice": 0}));
        let err = process(request).await.unwrap_err();
        assert!(format!("{:#}", err).contains("reinvestment price"));
    }

    #[tokio::test]
    async fn test_cost_basis() {
        let request = parse(json!({
            "action": "costBasis",
            "lots": [{"shares": 10, "pricePerShare": 5}, {"shares": 10, "pricePerShare": 15}]
        }));
        let response = process(request).await.unwrap();
        assert_eq!(response.cost_basis.unwrap().weighted_average_cost, 10.0);
    }

    #[tokio::test]
    async fn test_hedge_with_chain() {
        let request = parse(json!({
            "action": "hedge",
            "sharesToHedge": 1000,
            "currentPrice": 24,
            "expectedExitPrice": 20,
            "chain": [
                {"expiration": "2025-01-17", "strike": 20, "lastPrice": 1.0},
                {"expiration": "2025-01-17", "strike": 25, "lastPrice": 2.0},
                {"expiration": "2025-01-17", "strike": 30, "lastPrice": 3.0}
            ]
        }));
        let response = process(request).await.unwrap();

        match response.hedge.unwrap() {
            HedgeEstimate::Live(result) => {
                assert_eq!(result.suggested_strike, 25.0);
                assert_eq!(result.net_hedge_benefit, 3_000.0);
            }
            other => panic!("expected live estimate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_hedge_without_chain_falls_back() {
        let response = process(parse(json!({"action": "hedge"}))).await.unwrap();
        let hedge = response.hedge.unwrap();
        assert!(!hedge.is_live());
        assert_eq!(hedge.exit_cashout(), 100_000.0);
    }

    #[tokio::test]
    async fn test_hedge_compare_prices_each_expiration() {
        let request = parse(json!({
            "action": "hedge",
            "sharesToHedge": 1000,
            "currentPrice": 24,
            "expectedExitPrice": 20,
            "compare": true,
            "chain": [
                {"expiration": "2025-02-21", "strike": 25, "lastPrice": 2.6},
                {"expiration": "2025-01-17", "strike": 20, "lastPrice": 1.0},
                {"expiration": "2025-01-17", "strike": 25, "lastPrice": 2.0}
            ]
        }));
        let response = process(request).await.unwrap();
        assert!(response.hedge.is_none());

        let rows = response.comparison.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].expiration, NaiveDate::from_ymd_opt(2025, 1, 17).unwrap());
        let premiums: Vec<f64> = rows
            .iter()
            .map(|row| match &row.outcome {
                ComparisonOutcome::Estimated(r) => r.estimated_premium_per_share,
                other => panic!("expected estimate, got {:?}", other),
            })
            .collect();
        assert_eq!(premiums, vec![2.0, 2.6]);
    }

    #[tokio::test]
    async fn test_hedge_compare_without_chain_is_an_error() {
        let request = parse(json!({"action": "hedge", "compare": true}));
        let err = process(request).await.unwrap_err();
        assert!(format!("{:#}", err).contains("comparison needs a chain"));
    }

    #[tokio::test]
    async fn test_strict_simulation_rejects_negative_shares() {
        let payload = json!({
            "action": "simulate",
            "initialShares": 100,
            "monthlyDividendPerShare": 1,
            "reinvestmentPrice": 10,
            "periods": 6,
            "monthlyWithdrawal": 500,
            "strict": true
        });
        let err = process(parse(payload.clone())).await.unwrap_err();
        assert!(format!("{:#}", err).contains("fell below zero in month 3"));
        assert!(matches!(
            err.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::NegativeShares { month: 3, .. })
        ));

        // The same inputs run to completion when not strict
        let mut lenient = payload;
        lenient["strict"] = json!(false);
        let output = process(parse(lenient)).await.unwrap().simulation.unwrap();
        assert_eq!(output.result.snapshots.len(), 6);
        assert!(output.summary.final_shares < 0.0);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result = serde_json::from_value::<PlannerRequest>(json!({"action": "backtest"}));
        assert!(result.is_err());
    }
}
