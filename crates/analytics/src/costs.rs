use crate::report::{CostBreakdown, RoiSummary};
use core_types::rounding::{percentage_of, round_currency, round_half_up, RATIO_SCALE};
use core_types::{CostComponent, Lot};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Raw cost sums for one lot, as returned by the cost collaborators.
///
/// A `None` sum means no entry was ever recorded and counts as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostInputs {
    pub stocking: Decimal,
    pub feed: Option<Decimal>,
    pub nutrient: Option<Decimal>,
    pub fertilization: Option<Decimal>,
    pub variable: Option<Decimal>,
}

impl CostInputs {
    /// Stocking cost is an attribute of the lot, the rest come from collaborator sums.
    pub fn for_lot(
        lot: &Lot,
        feed: Option<Decimal>,
        nutrient: Option<Decimal>,
        fertilization: Option<Decimal>,
        variable: Option<Decimal>,
    ) -> Self {
        Self {
            stocking: lot.stocking_cost,
            feed,
            nutrient,
            fertilization,
            variable,
        }
    }
}

/// A stateless aggregator of a lot's cost components and the metrics derived from them.
///
/// Every per-unit metric returns zero when its denominator is not yet known;
/// callers treat zero as "not yet computable".
#[derive(Debug, Default, Clone)]
pub struct CostAggregator {}

impl CostAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The five named amounts and their exact total.
    pub fn breakdown(&self, inputs: &CostInputs) -> CostBreakdown {
        let stocking = inputs.stocking;
        let feed = inputs.feed.unwrap_or_default();
        let nutrient = inputs.nutrient.unwrap_or_default();
        let fertilization = inputs.fertilization.unwrap_or_default();
        let variable = inputs.variable.unwrap_or_default();

        CostBreakdown {
            stocking,
            feed,
            nutrient,
            fertilization,
            variable,
            total: stocking + feed + nutrient + fertilization + variable,
        }
    }

    /// Total cost per harvested kilogram. Zero without a harvest or harvested weight.
    pub fn cost_per_kg(&self, lot: &Lot, breakdown: &CostBreakdown) -> Decimal {
        match &lot.harvest {
            Some(harvest) if harvest.total_weight_kg > Decimal::ZERO => {
                round_currency(breakdown.total / harvest.total_weight_kg)
            }
            _ => Decimal::ZERO,
        }
    }

    /// Total cost per harvested shrimp, at four decimal places. Zero without a harvested count.
    pub fn cost_per_shrimp(&self, lot: &Lot, breakdown: &CostBreakdown) -> Decimal {
        match &lot.harvest {
            Some(harvest) if harvest.count_harvested > 0 => {
                round_half_up(breakdown.total / Decimal::from(harvest.count_harvested), RATIO_SCALE)
            }
            _ => Decimal::ZERO,
        }
    }

    /// Each component's share of the total, as a percentage. Empty when the total is zero.
    pub fn percentages(&self, breakdown: &CostBreakdown) -> BTreeMap<CostComponent, Decimal> {
        if breakdown.total.is_zero() {
            return BTreeMap::new();
        }
        breakdown
            .components()
            .filter_map(|(component, amount)| {
                percentage_of(amount, breakdown.total).map(|pct| (component, pct))
            })
            .collect()
    }

    /// Total cost per elapsed cultivation day. Zero while the day count is unknown.
    pub fn average_daily_cost(&self, lot: &Lot, breakdown: &CostBreakdown) -> Decimal {
        match lot.cultivation_days_elapsed {
            Some(days) if days > 0 => round_currency(breakdown.total / Decimal::from(days)),
            _ => Decimal::ZERO,
        }
    }

    /// Profit, ROI and margin of a harvested lot.
    ///
    /// `None` without a harvest, or when total cost or revenue is zero.
    pub fn roi(&self, lot: &Lot, breakdown: &CostBreakdown) -> Option<RoiSummary> {
        let harvest = lot.harvest.as_ref()?;
        let revenue = harvest.total_revenue;
        let profit = revenue - breakdown.total;

        let roi_pct = percentage_of(profit, breakdown.total)?;
        let margin_pct = percentage_of(profit, revenue)?;

        Some(RoiSummary {
            revenue,
            total_cost: breakdown.total,
            profit,
            roi_pct,
            margin_pct,
        })
    }
}
