//! Running share position threaded through the simulation

use super::params::SimulationParameters;
use super::snapshot::PeriodSnapshot;

/// Share position between months.
///
/// The simulator folds this value through each month: `step` consumes the
/// current state and returns the next one together with the month's snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShareState {
    /// Last completed month (0 before the first step)
    pub month: u32,

    /// Shares held after the last completed month's reinvestment
    pub current_shares: f64,
}

impl ShareState {
    /// Position before month 1
    pub fn initial(params: &SimulationParameters) -> Self {
        Self {
            month: 0,
            current_shares: params.initial_shares,
        }
    }

    /// Advance one month.
    ///
    /// Order: gross dividends, tax, withdrawal, DRIP percentage, purchase.
    /// The withdrawal comes out before the DRIP percentage is applied, and a
    /// negative reinvestment amount is kept as-is (it reduces the share count).
    pub fn step(self, params: &SimulationParameters) -> (ShareState, PeriodSnapshot) {
        let month = self.month + 1;

        let gross_dividends = self.current_shares * params.monthly_dividend_per_share;
        let after_tax = gross_dividends * params.after_tax_factor();
        let reinvested_cash = (after_tax - params.monthly_withdrawal) * params.drip_factor();

        // Unreachable after validation, but a zero price must not produce inf/NaN
        let shares_bought = if params.reinvestment_price != 0.0 {
            reinvested_cash / params.reinvestment_price
        } else {
            0.0
        };

        let current_shares = self.current_shares + shares_bought;

        let snapshot = PeriodSnapshot {
            month,
            total_shares: current_shares,
            shares_bought,
            gross_dividends,
            reinvested_cash,
        };

        (ShareState { month, current_shares }, snapshot)
    }
}
