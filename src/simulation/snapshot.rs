//! Per-month output rows and the completed simulation result

use serde::{Deserialize, Serialize};

use super::params::SimulationParameters;

/// State of the position at the end of one simulated month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSnapshot {
    /// Month number (1-indexed)
    pub month: u32,

    /// Shares held after this month's reinvestment
    pub total_shares: f64,

    /// Shares acquired this month (negative when withdrawals exceed dividends)
    pub shares_bought: f64,

    /// Dividends earned this month before tax
    pub gross_dividends: f64,

    /// Cash redirected into new shares this month
    pub reinvested_cash: f64,
}

/// Complete simulation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Inputs that produced this run
    pub parameters: SimulationParameters,

    /// One snapshot per month, in month order
    pub snapshots: Vec<PeriodSnapshot>,
}

impl SimulationResult {
    pub fn new(parameters: SimulationParameters) -> Self {
        let capacity = parameters.periods as usize;
        Self {
            parameters,
            snapshots: Vec::with_capacity(capacity),
        }
    }

    /// Add a snapshot row
    pub fn add_snapshot(&mut self, snapshot: PeriodSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// Share count after the last month (initial shares for an empty run)
    pub fn final_shares(&self) -> f64 {
        self.snapshots
            .last()
            .map(|s| s.total_shares)
            .unwrap_or(self.parameters.initial_shares)
    }

    /// Get summary statistics
    pub fn summary(&self) -> SimulationSummary {
        let total_shares_bought: f64 = self.snapshots.iter().map(|s| s.shares_bought).sum();
        let total_gross_dividends: f64 = self.snapshots.iter().map(|s| s.gross_dividends).sum();
        let total_reinvested: f64 = self.snapshots.iter().map(|s| s.reinvested_cash).sum();
        let min_total_shares = self
            .snapshots
            .iter()
            .map(|s| s.total_shares)
            .fold(self.parameters.initial_shares, f64::min);

        SimulationSummary {
            total_months: self.snapshots.len() as u32,
            initial_shares: self.parameters.initial_shares,
            final_shares: self.final_shares(),
            total_shares_bought,
            total_gross_dividends,
            total_reinvested,
            min_total_shares,
        }
    }
}

/// Summary statistics for a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total_months: u32,
    pub initial_shares: f64,
    pub final_shares: f64,
    pub total_shares_bought: f64,
    pub total_gross_dividends: f64,
    pub total_reinvested: f64,
    /// Lowest share count seen, including the starting position
    pub min_total_shares: f64,
}
