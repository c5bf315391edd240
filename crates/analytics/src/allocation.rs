//! Splitting a cost shared by several lots (energy, labour, ...) into per-lot shares.
//!
//! Every policy floors each share to the cent and then hands the leftover
//! cents, one at a time, to the lots in input order. The shares therefore
//! always sum to the input total exactly.

use crate::error::AnalyticsError;
use crate::report::CostShare;
use core_types::rounding::CURRENCY_SCALE;
use core_types::{AllocationPolicy, LotId};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;

const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, CURRENCY_SCALE);

/// What the allocation needs to know about one participating lot.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationTarget {
    pub lot_id: LotId,
    pub cultivation_days: i64,
    pub estimated_biomass_kg: Decimal,
}

/// Splits `total` across `targets` according to `policy`.
///
/// Fails on an empty or duplicated lot list, a negative total, or a total
/// with sub-cent digits.
pub fn allocate_shared_cost(
    total: Decimal,
    targets: &[AllocationTarget],
    policy: AllocationPolicy,
) -> Result<Vec<CostShare>, AnalyticsError> {
    validate(total, targets)?;

    let shares = match policy {
        AllocationPolicy::Equal => equal_split(total, targets),
        AllocationPolicy::ByCultivationDays => by_cultivation_days(total, targets),
        AllocationPolicy::ByBiomass => by_biomass(total, targets),
    }?;

    tracing::debug!(?policy, %total, lots = shares.len(), "Shared cost allocated.");
    Ok(shares)
}

fn validate(total: Decimal, targets: &[AllocationTarget]) -> Result<(), AnalyticsError> {
    if targets.is_empty() {
        return Err(AnalyticsError::InvalidAllocation(
            "at least one lot is required".to_string(),
        ));
    }
    if total < Decimal::ZERO {
        return Err(AnalyticsError::InvalidAllocation(format!(
            "total {total} cannot be negative"
        )));
    }
    if total.normalize().scale() > CURRENCY_SCALE {
        return Err(AnalyticsError::InvalidAllocation(format!(
            "total {total} has more than {CURRENCY_SCALE} decimal places"
        )));
    }

    let mut seen = HashSet::with_capacity(targets.len());
    for target in targets {
        if !seen.insert(target.lot_id) {
            return Err(AnalyticsError::InvalidAllocation(format!(
                "lot {} is listed more than once",
                target.lot_id
            )));
        }
    }
    Ok(())
}

type Shares = Result<Vec<CostShare>, AnalyticsError>;

fn equal_split(total: Decimal, targets: &[AllocationTarget]) -> Shares {
    let weights = vec![Decimal::ONE; targets.len()];
    distribute(total, targets, &weights)
}

fn by_cultivation_days(total: Decimal, targets: &[AllocationTarget]) -> Shares {
    let weights: Vec<Decimal> = targets
        .iter()
        .map(|t| Decimal::from(t.cultivation_days.max(0)))
        .collect();
    proportional(total, targets, &weights, "cultivation days")
}

fn by_biomass(total: Decimal, targets: &[AllocationTarget]) -> Shares {
    let weights: Vec<Decimal> = targets
        .iter()
        .map(|t| t.estimated_biomass_kg.max(Decimal::ZERO))
        .collect();
    proportional(total, targets, &weights, "estimated biomass")
}

fn proportional(
    total: Decimal,
    targets: &[AllocationTarget],
    weights: &[Decimal],
    basis: &str,
) -> Shares {
    if weights.iter().all(|w| w.is_zero()) {
        tracing::warn!(basis, "Allocation basis is zero for every lot, falling back to an equal split.");
        return equal_split(total, targets);
    }
    distribute(total, targets, weights)
}

/// Floors each weighted share to the cent, then assigns the remaining cents
/// in input order to the lots with a positive weight. `weights` are
/// non-negative and not all zero.
fn distribute(total: Decimal, targets: &[AllocationTarget], weights: &[Decimal]) -> Shares {
    let overflow = || AnalyticsError::OutOfRange("allocation basis");
    let weight_sum = weights
        .iter()
        .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(*w))
        .ok_or_else(overflow)?;

    let mut shares = Vec::with_capacity(targets.len());
    for (target, weight) in targets.iter().zip(weights) {
        let amount = total
            .checked_mul(*weight)
            .and_then(|scaled| scaled.checked_div(weight_sum))
            .ok_or_else(overflow)?
            .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::ToZero);
        shares.push(CostShare {
            lot_id: target.lot_id,
            amount,
        });
    }

    // Zero-weight shares are exact and every other floored share is short by
    // less than a cent, so fewer cents remain than there are weighted lots.
    let weighted: Vec<usize> = weights
        .iter()
        .enumerate()
        .filter(|(_, w)| **w > Decimal::ZERO)
        .map(|(i, _)| i)
        .collect();
    let allocated: Decimal = shares.iter().map(|s| s.amount).sum();
    let mut remainder = total - allocated;
    for slot in weighted.iter().cycle() {
        if remainder < CENT {
            break;
        }
        shares[*slot].amount += CENT;
        remainder -= CENT;
    }

    Ok(shares)
}
