//! Purchase lots and their weighted average

use serde::{Deserialize, Serialize};

/// One block of shares bought at a single price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBasisLot {
    pub shares: f64,
    pub price_per_share: f64,
}

impl CostBasisLot {
    pub fn new(shares: f64, price_per_share: f64) -> Self {
        Self { shares, price_per_share }
    }

    /// Cash paid for the lot
    pub fn cost(&self) -> f64 {
        self.shares * self.price_per_share
    }
}

/// Aggregate position across all lots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBasisSummary {
    pub total_shares: f64,
    pub total_cost: f64,
    pub weighted_average_cost: f64,
}

/// Total cost over total shares; 0 when no shares are held
pub fn weighted_average_cost(lots: &[CostBasisLot]) -> f64 {
    summarize(lots).weighted_average_cost
}

pub fn summarize(lots: &[CostBasisLot]) -> CostBasisSummary {
    let total_cost: f64 = lots.iter().map(CostBasisLot::cost).sum();
    let total_shares: f64 = lots.iter().map(|lot| lot.shares).sum();

    let weighted_average_cost = if total_shares != 0.0 {
        total_cost / total_shares
    } else {
        0.0
    };

    CostBasisSummary {
        total_shares,
        total_cost,
        weighted_average_cost,
    }
}
