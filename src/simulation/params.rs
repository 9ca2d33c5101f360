//! Simulation inputs and their validation

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

fn default_initial_shares() -> f64 { 10_000.0 }
fn default_monthly_dividend() -> f64 { 2.0 }
fn default_reinvestment_price() -> f64 { 25.0 }
fn default_periods() -> u32 { 48 }
fn default_drip_percent() -> f64 { 100.0 }

/// Starting position and reinvestment policy for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    /// Shares held before month 1
    #[serde(default = "default_initial_shares")]
    pub initial_shares: f64,

    /// Dividend paid per share each month ($)
    #[serde(default = "default_monthly_dividend")]
    pub monthly_dividend_per_share: f64,

    /// Price at which reinvested cash buys new shares ($, must be > 0)
    #[serde(default = "default_reinvestment_price")]
    pub reinvestment_price: f64,

    /// Number of months to simulate
    #[serde(default = "default_periods")]
    pub periods: u32,

    /// Percentage (0-100) of after-tax, after-withdrawal cash reinvested
    #[serde(default = "default_drip_percent")]
    pub drip_percent: f64,

    /// Fixed cash withdrawn each month ($)
    #[serde(default)]
    pub monthly_withdrawal: f64,

    /// Tax rate (0-100) applied to gross dividends
    #[serde(default)]
    pub tax_rate_percent: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_shares: default_initial_shares(),
            monthly_dividend_per_share: default_monthly_dividend(),
            reinvestment_price: default_reinvestment_price(),
            periods: default_periods(),
            drip_percent: default_drip_percent(),
            monthly_withdrawal: 0.0,
            tax_rate_percent: 0.0,
        }
    }
}

/// How the simulator treats share counts that go negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    /// Negative reinvestment is a computed outcome and is reported as-is
    #[default]
    Lenient,
    /// Fail the run the first month total shares drop below zero
    Strict,
}

impl SimulationParameters {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        // `!(x > 0.0)` also rejects NaN
        if !(self.reinvestment_price > 0.0) || !self.reinvestment_price.is_finite() {
            return Err(ConfigurationError::NonPositiveReinvestmentPrice(self.reinvestment_price));
        }
        if self.periods == 0 {
            return Err(ConfigurationError::ZeroPeriods);
        }

        check_non_negative("initial_shares", self.initial_shares)?;
        check_non_negative("monthly_dividend_per_share", self.monthly_dividend_per_share)?;
        check_non_negative("monthly_withdrawal", self.monthly_withdrawal)?;
        check_percent("drip_percent", self.drip_percent)?;
        check_percent("tax_rate_percent", self.tax_rate_percent)?;

        Ok(())
    }

    /// Fraction of gross dividends kept after tax
    pub fn after_tax_factor(&self) -> f64 {
        1.0 - self.tax_rate_percent / 100.0
    }

    /// Fraction of the post-withdrawal cash that is reinvested
    pub fn drip_factor(&self) -> f64 {
        self.drip_percent / 100.0
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::NegativeValue { field, value })
    }
}

fn check_percent(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::PercentOutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = SimulationParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.periods, 48);
        assert_eq!(params.reinvestment_price, 25.0);
    }

    #[test]
    fn test_rejects_non_positive_reinvestment_price() {
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let params = SimulationParameters { reinvestment_price: price, ..Default::default() };
            assert!(matches!(
                params.validate(),
                Err(ConfigurationError::NonPositiveReinvestmentPrice(_))
            ));
        }
    }

    #[test]
    fn test_rejects_zero_periods() {
        let params = SimulationParameters { periods: 0, ..Default::default() };
        assert_eq!(params.validate(), Err(ConfigurationError::ZeroPeriods));
    }

    #[test]
    fn test_rejects_percent_out_of_range() {
        let params = SimulationParameters { drip_percent: 100.5, ..Default::default() };
        assert!(matches!(
            params.validate(),
            Err(ConfigurationError::PercentOutOfRange { field: "drip_percent", .. })
        ));

        let params = SimulationParameters { tax_rate_percent: -1.0, ..Default::default() };
        assert!(matches!(
            params.validate(),
            Err(ConfigurationError::PercentOutOfRange { field: "tax_rate_percent", .. })
        ));

        let params = SimulationParameters { tax_rate_percent: f64::NAN, ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_percent_bounds_are_inclusive() {
        let params = SimulationParameters {
            drip_percent: 0.0,
            tax_rate_percent: 100.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_withdrawal() {
        let params = SimulationParameters { monthly_withdrawal: -50.0, ..Default::default() };
        assert!(matches!(
            params.validate(),
            Err(ConfigurationError::NegativeValue { field: "monthly_withdrawal", .. })
        ));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let params: SimulationParameters =
            serde_json::from_str(r#"{"initialShares": 500, "taxRatePercent": 15}"#).unwrap();
        assert_eq!(params.initial_shares, 500.0);
        assert_eq!(params.tax_rate_percent, 15.0);
        assert_eq!(params.periods, 48);
        assert_eq!(params.drip_percent, 100.0);
    }
}
