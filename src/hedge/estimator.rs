//! Protective-put hedge estimates: nearest-strike pricing from a chain, or a
//! flat heuristic when no chain is available

use log::{debug, warn};

use crate::error::DataUnavailableError;
use super::chain::ChainLookup;
use super::types::{HedgeEstimate, HedgeRequest, HedgeResult, OptionContract, OptionsChain, SimplifiedHedge};

/// Shares covered by one option contract
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Heuristic premium as a fraction of (current - exit) price spread
pub const SIMPLIFIED_PREMIUM_RATE: f64 = 0.1;

/// Estimate without market data.
///
/// The premium is 10% of the spread between current and expected exit
/// price. It is a placeholder, not a pricing model.
pub fn estimate_simplified(request: &HedgeRequest) -> SimplifiedHedge {
    SimplifiedHedge {
        min_strike: round_to_cents(request.expected_exit_price),
        estimated_premium_per_share: (request.current_price - request.expected_exit_price)
            * SIMPLIFIED_PREMIUM_RATE,
        exit_cashout: request.shares_to_hedge * request.expected_exit_price,
    }
}

/// Price the hedge with the put whose strike is nearest the current price
pub fn estimate_from_contracts(
    request: &HedgeRequest,
    contracts: &[OptionContract],
) -> Result<HedgeResult, DataUnavailableError> {
    let contract = nearest_strike(contracts, request.current_price).ok_or(
        DataUnavailableError::EmptyChain { symbol: None, expiration: None },
    )?;

    let suggested_strike = contract.strike;
    let estimated_premium_per_share = contract.last_price;

    // Fractional contracts are kept as-is
    let total_contracts = request.shares_to_hedge / CONTRACT_MULTIPLIER;
    let total_hedge_cost = estimated_premium_per_share * total_contracts * CONTRACT_MULTIPLIER;
    let exit_cashout = request.shares_to_hedge * request.expected_exit_price;
    let payout = (suggested_strike - request.expected_exit_price) * request.shares_to_hedge;
    let net_hedge_benefit = payout - total_hedge_cost;

    debug!(
        "nearest strike {} to price {} at premium {} ({} candidates)",
        suggested_strike,
        request.current_price,
        estimated_premium_per_share,
        contracts.len()
    );

    Ok(HedgeResult {
        expiration: None,
        suggested_strike,
        estimated_premium_per_share,
        total_contracts,
        total_hedge_cost,
        exit_cashout,
        payout,
        net_hedge_benefit,
    })
}

/// Price the hedge from one expiration's chain
pub fn estimate_from_chain(
    request: &HedgeRequest,
    chain: &OptionsChain,
) -> Result<HedgeResult, DataUnavailableError> {
    match estimate_from_contracts(request, &chain.puts) {
        Ok(result) => Ok(HedgeResult {
            expiration: Some(chain.expiration),
            ..result
        }),
        Err(DataUnavailableError::EmptyChain { .. }) => Err(DataUnavailableError::EmptyChain {
            symbol: Some(chain.symbol.clone()),
            expiration: Some(chain.expiration.to_string()),
        }),
        Err(e) => Err(e),
    }
}

/// Pick the live estimate when a chain is available, otherwise fall back
/// to the simplified estimate and carry the reason.
pub fn estimate(request: &HedgeRequest, lookup: ChainLookup) -> HedgeEstimate {
    let reason = match lookup {
        ChainLookup::Available(chain) => match estimate_from_chain(request, &chain) {
            Ok(result) => return HedgeEstimate::Live(result),
            Err(e) => e,
        },
        ChainLookup::Unavailable(e) => e,
    };

    warn!("options data unavailable, using simplified hedge estimate: {}", reason);
    HedgeEstimate::Simplified {
        estimate: estimate_simplified(request),
        reason: reason.to_string(),
    }
}

/// Contract with the smallest |strike - price|.
///
/// Contracts are ordered by strike first (stable), so among equal distances
/// the lower strike wins. Non-finite strikes are ignored.
fn nearest_strike(contracts: &[OptionContract], price: f64) -> Option<OptionContract> {
    let mut sorted: Vec<OptionContract> = contracts
        .iter()
        .copied()
        .filter(|c| c.strike.is_finite())
        .collect();
    sorted.sort_by(|a, b| a.strike.total_cmp(&b.strike));

    let mut best: Option<(f64, OptionContract)> = None;
    for contract in sorted {
        let distance = (contract.strike - price).abs();
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, contract)),
        }
    }
    best.map(|(_, contract)| contract)
}

/// Half-cent ties round to the even cent (10.125 -> 10.12)
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
