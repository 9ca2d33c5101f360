//! DRIP compounding simulator: month-by-month share accumulation with tax,
//! partial reinvestment and a fixed withdrawal

mod params;
mod state;
mod engine;
mod snapshot;

pub use params::{SimulationParameters, ValidationMode};
pub use state::ShareState;
pub use engine::{simulate, Simulator, SnapshotIter};
pub use snapshot::{PeriodSnapshot, SimulationResult, SimulationSummary};
