//! Weighted-average cost basis across purchase lots

mod lots;
pub mod loader;

pub use lots::{summarize, weighted_average_cost, CostBasisLot, CostBasisSummary};
pub use loader::{load_lots, load_lots_from_reader};
