use chrono::NaiveDate;
use core_types::{CostComponent, LotId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The five cost components of a lot and their exact total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub stocking: Decimal,
    pub feed: Decimal,
    pub nutrient: Decimal,
    pub fertilization: Decimal,
    pub variable: Decimal,
    /// Plain sum of the components, never rounded.
    pub total: Decimal,
}

impl CostBreakdown {
    pub fn amount(&self, component: CostComponent) -> Decimal {
        match component {
            CostComponent::Stocking => self.stocking,
            CostComponent::Feed => self.feed,
            CostComponent::Nutrient => self.nutrient,
            CostComponent::Fertilization => self.fertilization,
            CostComponent::Variable => self.variable,
        }
    }

    /// The components in reporting order.
    pub fn components(&self) -> impl Iterator<Item = (CostComponent, Decimal)> + '_ {
        CostComponent::ALL.into_iter().map(|c| (c, self.amount(c)))
    }
}

/// Return on investment of a harvested lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiSummary {
    pub revenue: Decimal,
    pub total_cost: Decimal,
    /// Always exactly `revenue - total_cost`.
    pub profit: Decimal,
    pub roi_pct: Decimal,
    pub margin_pct: Decimal,
}

/// One lot's share of a shared cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostShare {
    pub lot_id: LotId,
    pub amount: Decimal,
}

/// How a lot's growth relates to the harvest window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestReadiness {
    /// Already at or above the ideal weight.
    Ready,
    /// Would reach the ideal weight before the minimum cultivation day.
    TooEarly,
    /// Reaches the ideal weight inside the harvest window.
    Ideal,
    /// Would reach the ideal weight only after the maximum cultivation day.
    AttentionOverdue,
}

impl HarvestReadiness {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarvestReadiness::Ready => "ready",
            HarvestReadiness::TooEarly => "too_early",
            HarvestReadiness::Ideal => "ideal",
            HarvestReadiness::AttentionOverdue => "attention_overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestSuggestion {
    pub status: HarvestReadiness,
    pub suggested_date: NaiveDate,
    pub days_needed: i64,
    /// Cultivation day at which the ideal weight is reached, before any clamping.
    pub total_cultivation_days: i64,
    pub current_weight_g: Decimal,
    pub ideal_weight_g: Decimal,
    pub average_daily_gain: Decimal,
}

/// Projected economics of harvesting on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitProjection {
    pub target_date: NaiveDate,
    pub projected_weight_g: Decimal,
    pub projected_biomass_kg: Decimal,
    pub price_per_kg: Decimal,
    pub projected_revenue: Decimal,
    /// Costs recorded so far; future costs are not projected.
    pub cost_to_date: Decimal,
    pub projected_profit: Decimal,
    /// `None` while no cost has been recorded.
    pub roi_pct: Option<Decimal>,
}

/// Indicators of a finished cycle, computed from its harvest record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestPerformance {
    pub cultivation_days: i64,
    pub survival_pct: Option<Decimal>,
    pub final_fca: Option<Decimal>,
    pub average_weight_g: Option<Decimal>,
    pub productivity_kg_per_day: Decimal,
}

/// Observed growth between two consecutive biometries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthInterval {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: i64,
    pub weight_gain_g: Decimal,
    pub daily_gain: Decimal,
}
