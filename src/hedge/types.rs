//! Hedge request, option chain rows and estimate outputs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

fn default_shares_to_hedge() -> f64 { 10_000.0 }
fn default_current_price() -> f64 { 25.0 }
fn default_expected_exit_price() -> f64 { 10.0 }

/// Position to protect and the price the holder expects to exit at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HedgeRequest {
    #[serde(default = "default_shares_to_hedge")]
    pub shares_to_hedge: f64,

    /// Current price of the underlying ($)
    #[serde(default = "default_current_price")]
    pub current_price: f64,

    /// Price the holder expects to sell at ($)
    #[serde(default = "default_expected_exit_price")]
    pub expected_exit_price: f64,
}

impl Default for HedgeRequest {
    fn default() -> Self {
        Self {
            shares_to_hedge: default_shares_to_hedge(),
            current_price: default_current_price(),
            expected_exit_price: default_expected_exit_price(),
        }
    }
}

impl HedgeRequest {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.shares_to_hedge >= 0.0) || !self.shares_to_hedge.is_finite() {
            return Err(ConfigurationError::NegativeValue {
                field: "shares_to_hedge",
                value: self.shares_to_hedge,
            });
        }
        for (field, value) in [
            ("current_price", self.current_price),
            ("expected_exit_price", self.expected_exit_price),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteValue { field, value });
            }
        }
        Ok(())
    }
}

/// One put row of an options chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    pub strike: f64,

    /// Last traded premium per share
    #[serde(alias = "last_price")]
    pub last_price: f64,
}

impl OptionContract {
    pub fn new(strike: f64, last_price: f64) -> Self {
        Self { strike, last_price }
    }
}

/// Puts for one symbol and expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsChain {
    pub symbol: String,
    pub expiration: NaiveDate,
    pub puts: Vec<OptionContract>,
}

/// Hedge economics priced from a live chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HedgeResult {
    /// Expiration the contracts were taken from, if known
    pub expiration: Option<NaiveDate>,
    pub suggested_strike: f64,
    pub estimated_premium_per_share: f64,
    /// `shares_to_hedge / 100`, not rounded to whole contracts
    pub total_contracts: f64,
    pub total_hedge_cost: f64,
    pub exit_cashout: f64,
    /// Put payout at the expected exit price
    pub payout: f64,
    pub net_hedge_benefit: f64,
}

/// Heuristic estimate used when no chain is available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedHedge {
    /// Expected exit price rounded to cents
    pub min_strike: f64,
    pub estimated_premium_per_share: f64,
    pub exit_cashout: f64,
}

/// Outcome of mode selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum HedgeEstimate {
    /// Priced from market data
    Live(HedgeResult),
    /// Chain was unavailable; `reason` says why
    Simplified { estimate: SimplifiedHedge, reason: String },
}

impl HedgeEstimate {
    pub fn is_live(&self) -> bool {
        matches!(self, HedgeEstimate::Live(_))
    }

    pub fn estimated_premium_per_share(&self) -> f64 {
        match self {
            HedgeEstimate::Live(result) => result.estimated_premium_per_share,
            HedgeEstimate::Simplified { estimate, .. } => estimate.estimated_premium_per_share,
        }
    }

    pub fn exit_cashout(&self) -> f64 {
        match self {
            HedgeEstimate::Live(result) => result.exit_cashout,
            HedgeEstimate::Simplified { estimate, .. } => estimate.exit_cashout,
        }
    }
}

/// Per-expiration row of a multi-expiration comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationComparison {
    pub expiration: NaiveDate,
    pub outcome: ComparisonOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ComparisonOutcome {
    Estimated(HedgeResult),
    Unavailable { reason: String },
}
