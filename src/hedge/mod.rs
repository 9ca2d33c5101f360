//! Protective-put hedge estimator and the options-chain boundary

mod types;
mod estimator;
pub mod chain;

pub use types::{
    ComparisonOutcome, ExpirationComparison, HedgeEstimate, HedgeRequest, HedgeResult,
    OptionContract, OptionsChain, SimplifiedHedge,
};
pub use estimator::{
    estimate, estimate_from_chain, estimate_from_contracts, estimate_simplified,
    CONTRACT_MULTIPLIER, SIMPLIFIED_PREMIUM_RATE,
};
pub use chain::{
    compare_expirations, fetch_chain, lookup_chain, lookup_chain_with_timeout, ChainLookup,
    CsvChainSource, Expiration, OptionsChainSource, StaticChainSource,
};
