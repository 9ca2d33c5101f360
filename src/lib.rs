//! Dividend Planner - projections and hedge estimates for a monthly dividend payer
//!
//! This library provides:
//! - Month-by-month DRIP compounding with tax, partial reinvestment and withdrawals
//! - Weighted-average cost basis across purchase lots
//! - Protective-put hedge estimates from a live options chain, with a heuristic fallback
//! - Parallel parameter sweeps and CSV / text export

pub mod error;
pub mod simulation;
pub mod cost_basis;
pub mod hedge;
pub mod export;
pub mod scenario;

// Re-export commonly used types
pub use error::{ConfigurationError, DataUnavailableError, ExportError};
pub use simulation::{simulate, PeriodSnapshot, SimulationParameters, SimulationResult, Simulator};
pub use cost_basis::{weighted_average_cost, CostBasisLot};
pub use hedge::{HedgeEstimate, HedgeRequest, HedgeResult, OptionContract};
pub use scenario::ScenarioRunner;
