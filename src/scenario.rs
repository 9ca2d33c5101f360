//! Scenario runner for parameter sweeps
//!
//! Holds a base set of simulation parameters and runs many variations of it.
//! Runs share nothing, so sweeps are spread across threads with rayon.

use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::ConfigurationError;
use crate::simulation::{Simulator, SimulationParameters, SimulationResult, SimulationSummary};

/// Runner that applies variations to a base parameter set
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(SimulationParameters::default());
///
/// // Final shares at several reinvestment levels
/// for point in runner.drip_sweep(&[0.0, 50.0, 100.0])? {
///     println!("{}% -> {:.0}", point.drip_percent, point.summary.final_shares);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_params: SimulationParameters,
}

/// One point of a DRIP-percentage sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DripSweepPoint {
    pub drip_percent: f64,
    pub summary: SimulationSummary,
}

impl ScenarioRunner {
    pub fn new(base_params: SimulationParameters) -> Self {
        Self { base_params }
    }

    /// Run the base parameters as-is
    pub fn run_base(&self) -> Result<SimulationResult, ConfigurationError> {
        Ok(Simulator::new(self.base_params.clone())?.run())
    }

    /// Run every parameter set, in parallel, keeping input order.
    ///
    /// Each entry is validated on its own; an invalid set does not stop the others.
    pub fn run_sweep(
        &self,
        scenarios: &[SimulationParameters],
    ) -> Vec<Result<SimulationResult, ConfigurationError>> {
        info!("running {} scenarios", scenarios.len());
        scenarios
            .par_iter()
            .map(|params| Simulator::new(params.clone()).map(|sim| sim.run()))
            .collect()
    }

    /// Vary only the DRIP percentage of the base parameters
    pub fn drip_sweep(&self, drip_percents: &[f64]) -> Result<Vec<DripSweepPoint>, ConfigurationError> {
        let scenarios: Vec<SimulationParameters> = drip_percents
            .iter()
            .map(|&drip_percent| SimulationParameters {
                drip_percent,
                ..self.base_params.clone()
            })
            .collect();

        self.run_sweep(&scenarios)
            .into_iter()
            .zip(drip_percents)
            .map(|(result, &drip_percent)| {
                result.map(|r| DripSweepPoint {
                    drip_percent,
                    summary: r.summary(),
                })
            })
            .collect()
    }

    /// Get reference to base parameters for inspection
    pub fn parameters(&self) -> &SimulationParameters {
        &self.base_params
    }

    /// Get mutable reference to base parameters for customization
    pub fn parameters_mut(&mut self) -> &mut SimulationParameters {
        &mut self.base_params
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(SimulationParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::simulate;

    #[test]
    fn test_sweep_matches_serial_runs() {
        let runner = ScenarioRunner::default();
        let scenarios: Vec<_> = [0.0, 10.0, 25.0]
            .iter()
            .map(|&tax| SimulationParameters {
                tax_rate_percent: tax,
                ..SimulationParameters::default()
            })
            .collect();

        let results = runner.run_sweep(&scenarios);
        assert_eq!(results.len(), 3);
        for (result, params) in results.iter().zip(&scenarios) {
            assert_eq!(result.as_ref().unwrap(), &simulate(params.clone()).unwrap());
        }
    }

    #[test]
    fn test_invalid_scenario_reported_in_place() {
        let runner = ScenarioRunner::default();
        let scenarios = vec![
            SimulationParameters::default(),
            SimulationParameters { reinvestment_price: 0.0, ..Default::default() },
        ];

        let results = runner.run_sweep(&scenarios);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(ConfigurationError::NonPositiveReinvestmentPrice(_))
        ));
    }

    #[test]
    fn test_more_drip_means_more_shares() {
        let runner = ScenarioRunner::default();
        let points = runner.drip_sweep(&[0.0, 50.0, 100.0]).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].summary.final_shares, 10_000.0);
        assert!(points[1].summary.final_shares > points[0].summary.final_shares);
        assert!(points[2].summary.final_shares > points[1].summary.final_shares);
    }

    #[test]
    fn test_drip_sweep_rejects_out_of_range_percent() {
        let runner = ScenarioRunner::default();
        assert!(runner.drip_sweep(&[50.0, 150.0]).is_err());
    }
}
