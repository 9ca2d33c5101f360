//! Simulation engine: validates inputs and folds `ShareState` across months

use log::debug;

use crate::error::ConfigurationError;
use super::params::{SimulationParameters, ValidationMode};
use super::snapshot::{PeriodSnapshot, SimulationResult};
use super::state::ShareState;

/// Validated simulation ready to run.
///
/// Construction is the only fallible step; once built, running the
/// simulation cannot fail in lenient mode.
#[derive(Debug, Clone)]
pub struct Simulator {
    params: SimulationParameters,
}

impl Simulator {
    /// Validate parameters and build a simulator
    pub fn new(params: SimulationParameters) -> Result<Self, ConfigurationError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    /// Lazily yield one snapshot per month
    pub fn iter(&self) -> SnapshotIter<'_> {
        SnapshotIter {
            params: &self.params,
            state: ShareState::initial(&self.params),
        }
    }

    /// Run every month and keep all snapshots
    pub fn run(&self) -> SimulationResult {
        let mut result = SimulationResult::new(self.params.clone());
        for snapshot in self.iter() {
            result.add_snapshot(snapshot);
        }

        debug!(
            "simulated {} months: {:.4} -> {:.4} shares",
            result.snapshots.len(),
            self.params.initial_shares,
            result.final_shares()
        );

        result
    }

    /// Run and fail at the first month the share count goes negative
    pub fn run_strict(&self) -> Result<SimulationResult, ConfigurationError> {
        let mut result = SimulationResult::new(self.params.clone());
        for snapshot in self.iter() {
            if snapshot.total_shares < 0.0 {
                return Err(ConfigurationError::NegativeShares {
                    month: snapshot.month,
                    total_shares: snapshot.total_shares,
                });
            }
            result.add_snapshot(snapshot);
        }
        Ok(result)
    }

    /// Run with the given treatment of negative share counts
    pub fn run_with_mode(&self, mode: ValidationMode) -> Result<SimulationResult, ConfigurationError> {
        match mode {
            ValidationMode::Lenient => Ok(self.run()),
            ValidationMode::Strict => self.run_strict(),
        }
    }
}

/// Iterator over monthly snapshots; ends after `periods` months
#[derive(Debug, Clone)]
pub struct SnapshotIter<'a> {
    params: &'a SimulationParameters,
    state: ShareState,
}

impl Iterator for SnapshotIter<'_> {
    type Item = PeriodSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.month >= self.params.periods {
            return None;
        }
        let (next, snapshot) = self.state.step(self.params);
        self.state = next;
        Some(snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.params.periods.saturating_sub(self.state.month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SnapshotIter<'_> {}

/// Validate and run a lenient simulation
pub fn simulate(params: SimulationParameters) -> Result<SimulationResult, ConfigurationError> {
    Ok(Simulator::new(params)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base_params() -> SimulationParameters {
        SimulationParameters {
            initial_shares: 10_000.0,
            monthly_dividend_per_share: 2.0,
            reinvestment_price: 25.0,
            periods: 48,
            drip_percent: 100.0,
            monthly_withdrawal: 0.0,
            tax_rate_percent: 0.0,
        }
    }

    #[test]
    fn test_single_month_scenario() {
        let params = SimulationParameters { periods: 1, ..base_params() };
        let result = simulate(params).unwrap();

        assert_eq!(result.snapshots.len(), 1);
        let month1 = &result.snapshots[0];
        assert_eq!(month1.month, 1);
        assert_eq!(month1.gross_dividends, 20_000.0);
        assert_eq!(month1.reinvested_cash, 20_000.0);
        assert_eq!(month1.shares_bought, 800.0);
        assert_eq!(month1.total_shares, 10_800.0);
    }

    #[test]
    fn test_length_matches_periods() {
        let result = simulate(base_params()).unwrap();
        assert_eq!(result.snapshots.len(), 48);
        for (i, snap) in result.snapshots.iter().enumerate() {
            assert_eq!(snap.month, i as u32 + 1);
        }
    }

    #[test]
    fn test_full_drip_is_strictly_increasing() {
        let result = simulate(base_params()).unwrap();
        let mut prev = base_params().initial_shares;
        for snap in &result.snapshots {
            assert!(snap.total_shares > prev);
            prev = snap.total_shares;
        }
    }

    #[test]
    fn test_full_drip_compounds_monthly() {
        // Each month multiplies shares by 1 + dividend / price = 1.08
        let result = simulate(SimulationParameters { periods: 12, ..base_params() }).unwrap();
        let expected = 10_000.0 * 1.08_f64.powi(12);
        assert_relative_eq!(result.final_shares(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_shares_bought_is_exact_quotient() {
        let params = SimulationParameters {
            drip_percent: 37.5,
            monthly_withdrawal: 1_234.56,
            tax_rate_percent: 17.0,
            reinvestment_price: 23.17,
            ..base_params()
        };
        let result = simulate(params.clone()).unwrap();
        for snap in &result.snapshots {
            assert_eq!(snap.shares_bought, snap.reinvested_cash / params.reinvestment_price);
        }
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let params = SimulationParameters {
            drip_percent: 60.0,
            tax_rate_percent: 15.0,
            monthly_withdrawal: 500.0,
            ..base_params()
        };
        let first = simulate(params.clone()).unwrap();
        let second = simulate(params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_initial_shares_earns_nothing() {
        let params = SimulationParameters { initial_shares: 0.0, ..base_params() };
        let result = simulate(params).unwrap();
        assert!(result.snapshots.iter().all(|s| s.gross_dividends == 0.0));
        assert_eq!(result.final_shares(), 0.0);
    }

    #[test]
    fn test_zero_drip_holds_shares_constant() {
        let params = SimulationParameters {
            drip_percent: 0.0,
            monthly_withdrawal: 5_000.0,
            ..base_params()
        };
        let result = simulate(params).unwrap();
        for snap in &result.snapshots {
            assert_eq!(snap.reinvested_cash, 0.0);
            assert_eq!(snap.total_shares, 10_000.0);
        }
    }

    #[test]
    fn test_iter_matches_run() {
        let simulator = Simulator::new(base_params()).unwrap();
        assert_eq!(simulator.iter().len(), 48);
        let lazy: Vec<_> = simulator.iter().collect();
        assert_eq!(lazy, simulator.run().snapshots);
    }

    #[test]
    fn test_invalid_params_do_not_run() {
        let params = SimulationParameters { reinvestment_price: 0.0, ..base_params() };
        assert!(matches!(
            simulate(params),
            Err(ConfigurationError::NonPositiveReinvestmentPrice(_))
        ));

        let params = SimulationParameters { periods: 0, ..base_params() };
        assert_eq!(simulate(params), Err(ConfigurationError::ZeroPeriods));
    }

    #[test]
    fn test_heavy_withdrawal_goes_negative_in_lenient_mode() {
        let params = SimulationParameters {
            initial_shares: 100.0,
            monthly_dividend_per_share: 1.0,
            reinvestment_price: 10.0,
            periods: 6,
            monthly_withdrawal: 500.0,
            ..base_params()
        };
        let result = simulate(params).unwrap();
        // 100 -> 60 -> 16 -> -32.4 ...
        assert_relative_eq!(result.snapshots[0].total_shares, 60.0);
        assert_relative_eq!(result.snapshots[1].total_shares, 16.0);
        assert!(result.snapshots[2].total_shares < 0.0);
        assert_eq!(result.snapshots.len(), 6);
    }

    #[test]
    fn test_strict_mode_stops_at_first_negative_month() {
        let params = SimulationParameters {
            initial_shares: 100.0,
            monthly_dividend_per_share: 1.0,
            reinvestment_price: 10.0,
            periods: 6,
            monthly_withdrawal: 500.0,
            ..base_params()
        };
        let simulator = Simulator::new(params).unwrap();
        match simulator.run_with_mode(ValidationMode::Strict) {
            Err(ConfigurationError::NegativeShares { month, total_shares }) => {
                assert_eq!(month, 3);
                assert!(total_shares < 0.0);
            }
            other => panic!("expected NegativeShares, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_mode_passes_healthy_run() {
        let simulator = Simulator::new(base_params()).unwrap();
        let strict = simulator.run_strict().unwrap();
        assert_eq!(strict, simulator.run());
    }
}
