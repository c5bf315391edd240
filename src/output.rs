use analytics::{
    CostBreakdown, CostShare, GrowthInterval, HarvestPerformance, HarvestSuggestion,
    ProfitProjection, RoiSummary,
};
use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use core_types::{Biometry, CostComponent};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the `costs` command reports for one lot.
#[derive(Debug, Serialize)]
pub struct CostReport {
    pub breakdown: CostBreakdown,
    pub percentages: BTreeMap<CostComponent, Decimal>,
    pub cost_per_kg: Decimal,
    pub cost_per_shrimp: Decimal,
    pub average_daily_cost: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ProjectionReport {
    pub target_date: NaiveDate,
    pub projected_weight_g: Decimal,
    pub projected_biomass_kg: Decimal,
    pub profit: Option<ProfitProjection>,
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn optional(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn cost_table(report: &CostReport) -> Table {
    let mut t = table(vec!["Component", "Amount", "Share %"]);
    for (component, amount) in report.breakdown.components() {
        let share = optional(report.percentages.get(&component).copied());
        t.add_row(vec![component.to_string(), amount.to_string(), share]);
    }
    t.add_row(vec!["total".to_string(), report.breakdown.total.to_string(), String::new()]);
    t.add_row(vec!["cost / kg".to_string(), report.cost_per_kg.to_string(), String::new()]);
    t.add_row(vec!["cost / shrimp".to_string(), report.cost_per_shrimp.to_string(), String::new()]);
    t.add_row(vec!["cost / day".to_string(), report.average_daily_cost.to_string(), String::new()]);
    t
}

pub fn roi_table(roi: &RoiSummary) -> Table {
    let mut t = table(vec!["Revenue", "Total Cost", "Profit", "ROI %", "Margin %"]);
    t.add_row(vec![
        roi.revenue.to_string(),
        roi.total_cost.to_string(),
        roi.profit.to_string(),
        roi.roi_pct.to_string(),
        roi.margin_pct.to_string(),
    ]);
    t
}

pub fn biometry_table(biometry: &Biometry) -> Table {
    let mut t = table(vec!["Indicator", "Value"]);
    t.add_row(vec!["date".to_string(), biometry.measurement_date.to_string()]);
    t.add_row(vec!["cultivation day".to_string(), biometry.cultivation_day.to_string()]);
    t.add_row(vec!["average weight (g)".to_string(), biometry.average_weight.to_string()]);
    t.add_row(vec!["daily gain (g/day)".to_string(), optional(biometry.daily_weight_gain)]);
    t.add_row(vec!["estimated biomass (kg)".to_string(), optional(biometry.estimated_biomass_kg)]);
    t.add_row(vec!["estimated survival %".to_string(), optional(biometry.estimated_survival_pct)]);
    t.add_row(vec!["FCA".to_string(), optional(biometry.feed_conversion_ratio)]);
    t
}

pub fn curve_table(curve: &[GrowthInterval]) -> Table {
    let mut t = table(vec!["From", "To", "Days", "Gain (g)", "g/day"]);
    for interval in curve {
        t.add_row(vec![
            interval.from.to_string(),
            interval.to.to_string(),
            interval.days.to_string(),
            interval.weight_gain_g.to_string(),
            interval.daily_gain.to_string(),
        ]);
    }
    t
}

pub fn projection_table(report: &ProjectionReport) -> Table {
    let mut t = table(vec!["Projection", "Value"]);
    t.add_row(vec!["target date".to_string(), report.target_date.to_string()]);
    t.add_row(vec!["average weight (g)".to_string(), report.projected_weight_g.to_string()]);
    t.add_row(vec!["biomass (kg)".to_string(), report.projected_biomass_kg.to_string()]);
    if let Some(profit) = &report.profit {
        t.add_row(vec!["price / kg".to_string(), profit.price_per_kg.to_string()]);
        t.add_row(vec!["revenue".to_string(), profit.projected_revenue.to_string()]);
        t.add_row(vec!["cost to date".to_string(), profit.cost_to_date.to_string()]);
        t.add_row(vec!["profit".to_string(), profit.projected_profit.to_string()]);
        t.add_row(vec!["ROI %".to_string(), optional(profit.roi_pct)]);
    }
    t
}

pub fn suggestion_table(suggestion: &HarvestSuggestion) -> Table {
    let mut t = table(vec!["Harvest", "Value"]);
    t.add_row(vec!["status".to_string(), suggestion.status.as_str().to_string()]);
    t.add_row(vec!["suggested date".to_string(), suggestion.suggested_date.to_string()]);
    t.add_row(vec!["days needed".to_string(), suggestion.days_needed.to_string()]);
    t.add_row(vec!["cultivation days".to_string(), suggestion.total_cultivation_days.to_string()]);
    t.add_row(vec!["current weight (g)".to_string(), suggestion.current_weight_g.to_string()]);
    t.add_row(vec!["ideal weight (g)".to_string(), suggestion.ideal_weight_g.to_string()]);
    t.add_row(vec!["average gain (g/day)".to_string(), suggestion.average_daily_gain.to_string()]);
    t
}

pub fn shares_table(shares: &[CostShare]) -> Table {
    let mut t = table(vec!["Lot", "Share"]);
    for share in shares {
        t.add_row(vec![share.lot_id.to_string(), share.amount.to_string()]);
    }
    let total: Decimal = shares.iter().map(|s| s.amount).sum();
    t.add_row(vec!["total".to_string(), total.to_string()]);
    t
}

pub fn performance_table(performance: &HarvestPerformance) -> Table {
    let mut t = table(vec!["Harvest Indicator", "Value"]);
    t.add_row(vec!["cultivation days".to_string(), performance.cultivation_days.to_string()]);
    t.add_row(vec!["survival %".to_string(), optional(performance.survival_pct)]);
    t.add_row(vec!["final FCA".to_string(), optional(performance.final_fca)]);
    t.add_row(vec!["average weight (g)".to_string(), optional(performance.average_weight_g)]);
    t.add_row(vec!["productivity (kg/day)".to_string(), performance.productivity_kg_per_day.to_string()]);
    t
}
