use crate::error::AnalyticsError;
use crate::growth::estimated_biomass_kg;
use crate::report::{CostBreakdown, HarvestReadiness, HarvestSuggestion, ProfitProjection};
use chrono::{Days, NaiveDate};
use configuration::AnalyticsSettings;
use core_types::rounding::{percentage_of, round_currency, round_gain};
use core_types::{Biometry, Lot};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Projections need at least this many biometries to have a growth trend.
pub const MIN_BIOMETRIES: usize = 2;

/// The most recent measurement and the growth rate extrapolated from it.
#[derive(Debug, Clone, Copy)]
struct GrowthBasis<'a> {
    last: &'a Biometry,
    average_daily_gain: Decimal,
}

/// Extrapolates a lot's growth to a future date and prices the result.
///
/// `biometries` is always the lot's full history, ascending by measurement date.
#[derive(Debug, Clone)]
pub struct HarvestProjector {
    settings: AnalyticsSettings,
}

impl HarvestProjector {
    pub fn new(settings: AnalyticsSettings) -> Self {
        Self { settings }
    }

    /// Average of the most recent recorded daily gains, up to `growth_window` of them.
    /// Zero if no biometry has a gain yet.
    pub fn average_daily_gain(&self, biometries: &[Biometry]) -> Decimal {
        let gains: Vec<Decimal> = biometries
            .iter()
            .rev()
            .filter_map(|b| b.daily_weight_gain)
            .take(self.settings.growth_window)
            .collect();

        if gains.is_empty() {
            return Decimal::ZERO;
        }
        let sum: Decimal = gains.iter().sum();
        round_gain(sum / Decimal::from(gains.len()))
    }

    fn growth_basis<'a>(&self, biometries: &'a [Biometry]) -> Result<GrowthBasis<'a>, AnalyticsError> {
        let last = match biometries.last() {
            Some(last) if biometries.len() >= MIN_BIOMETRIES => last,
            _ => {
                return Err(AnalyticsError::NotEnoughBiometries {
                    required: MIN_BIOMETRIES,
                    found: biometries.len(),
                });
            }
        };
        Ok(GrowthBasis {
            last,
            average_daily_gain: self.average_daily_gain(biometries),
        })
    }

    /// Projected average individual weight, in grams, on `target_date`.
    pub fn project_average_weight(
        &self,
        biometries: &[Biometry],
        target_date: NaiveDate,
    ) -> Result<Decimal, AnalyticsError> {
        let basis = self.growth_basis(biometries)?;
        let last_date = basis.last.measurement_date;
        if target_date < last_date {
            return Err(AnalyticsError::TargetBeforeLastBiometry {
                target: target_date,
                last: last_date,
            });
        }

        let days = Decimal::from((target_date - last_date).num_days());
        basis
            .average_daily_gain
            .checked_mul(days)
            .and_then(|gain| basis.last.average_weight.checked_add(gain))
            .map(round_currency)
            .ok_or(AnalyticsError::OutOfRange("projected weight"))
    }

    /// Suggests when to harvest so the lot reaches the ideal weight inside the
    /// configured cultivation window.
    ///
    /// `evaluation_date` is the date the question is asked on; a lot that is
    /// already heavy enough is suggested for harvest on that date.
    pub fn suggest_harvest_date(
        &self,
        lot: &Lot,
        biometries: &[Biometry],
        evaluation_date: NaiveDate,
    ) -> Result<HarvestSuggestion, AnalyticsError> {
        let basis = self.growth_basis(biometries)?;
        let current = basis.last.average_weight;
        let ideal = self.settings.ideal_harvest_weight_g;
        let gain = basis.average_daily_gain;

        if current >= ideal {
            return Ok(HarvestSuggestion {
                status: HarvestReadiness::Ready,
                suggested_date: evaluation_date,
                days_needed: 0,
                total_cultivation_days: lot.days_since_stocking(evaluation_date),
                current_weight_g: current,
                ideal_weight_g: ideal,
                average_daily_gain: gain,
            });
        }

        if gain <= Decimal::ZERO {
            return Err(AnalyticsError::NoGrowthRate);
        }

        let days_needed = ((ideal - current) / gain)
            .ceil()
            .to_i64()
            .ok_or(AnalyticsError::NoGrowthRate)?;
        let total_cultivation_days = lot
            .days_since_stocking(basis.last.measurement_date)
            .saturating_add(days_needed);

        let (status, day) = if total_cultivation_days < self.settings.min_cultivation_days {
            (HarvestReadiness::TooEarly, self.settings.min_cultivation_days)
        } else if total_cultivation_days > self.settings.max_cultivation_days {
            (HarvestReadiness::AttentionOverdue, self.settings.max_cultivation_days)
        } else {
            (HarvestReadiness::Ideal, total_cultivation_days)
        };

        Ok(HarvestSuggestion {
            status,
            suggested_date: cultivation_day_date(lot, day)?,
            days_needed,
            total_cultivation_days,
            current_weight_g: current,
            ideal_weight_g: ideal,
            average_daily_gain: gain,
        })
    }

    /// Projected biomass, in kilograms, under the same survival assumption used at sampling time.
    pub fn project_biomass_at_harvest(
        &self,
        lot: &Lot,
        biometries: &[Biometry],
        target_date: NaiveDate,
    ) -> Result<Decimal, AnalyticsError> {
        let weight = self.project_average_weight(biometries, target_date)?;
        estimated_biomass_kg(
            weight,
            lot.stocking_quantity_decimal(),
            self.settings.survival_assumption,
        )
    }

    pub fn project_revenue_at_harvest(
        &self,
        lot: &Lot,
        biometries: &[Biometry],
        target_date: NaiveDate,
        price_per_kg: Decimal,
    ) -> Result<Decimal, AnalyticsError> {
        let biomass = self.project_biomass_at_harvest(lot, biometries, target_date)?;
        revenue(biomass, price_per_kg)
    }

    /// Projected revenue less the costs recorded so far.
    pub fn project_profit_at_harvest(
        &self,
        lot: &Lot,
        biometries: &[Biometry],
        target_date: NaiveDate,
        price_per_kg: Decimal,
        costs: &CostBreakdown,
    ) -> Result<ProfitProjection, AnalyticsError> {
        let projected_weight_g = self.project_average_weight(biometries, target_date)?;
        let projected_biomass_kg = estimated_biomass_kg(
            projected_weight_g,
            lot.stocking_quantity_decimal(),
            self.settings.survival_assumption,
        )?;
        let projected_revenue = revenue(projected_biomass_kg, price_per_kg)?;
        let projected_profit = projected_revenue
            .checked_sub(costs.total)
            .ok_or(AnalyticsError::OutOfRange("projected profit"))?;

        Ok(ProfitProjection {
            target_date,
            projected_weight_g,
            projected_biomass_kg,
            price_per_kg,
            projected_revenue,
            cost_to_date: costs.total,
            projected_profit,
            roi_pct: percentage_of(projected_profit, costs.total),
        })
    }
}

fn revenue(biomass_kg: Decimal, price_per_kg: Decimal) -> Result<Decimal, AnalyticsError> {
    biomass_kg
        .checked_mul(price_per_kg)
        .map(round_currency)
        .ok_or(AnalyticsError::OutOfRange("projected revenue"))
}

/// Calendar date of a cultivation day.
fn cultivation_day_date(lot: &Lot, day: i64) -> Result<NaiveDate, AnalyticsError> {
    u64::try_from(day)
        .ok()
        .and_then(|day| lot.stocking_date.checked_add_days(Days::new(day)))
        .ok_or(AnalyticsError::OutOfRange("suggested harvest date"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::LotStatus;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lot() -> Lot {
        Lot {
            id: 1,
            code: "L-01".to_string(),
            pond_id: 1,
            stocking_date: date(2025, 1, 1),
            stocking_quantity: 100_000,
            stocking_cost: dec!(5000.00),
            status: LotStatus::Active,
            cultivation_days_elapsed: Some(60),
            harvest: None,
        }
    }

    fn biometry(on: NaiveDate, weight: Decimal, gain: Option<Decimal>) -> Biometry {
        Biometry {
            id: None,
            lot_id: 1,
            measurement_date: on,
            cultivation_day: (on - date(2025, 1, 1)).num_days(),
            average_weight: weight,
            sampled_count: 100,
            sampled_total_weight: None,
            daily_weight_gain: gain,
            estimated_biomass_kg: None,
            estimated_survival_pct: None,
            feed_conversion_ratio: None,
        }
    }

    /// Four samples; the last three gains average to 0.2000 g/day.
    fn history() -> Vec<Biometry> {
        vec![
            biometry(date(2025, 1, 21), dec!(1.0), Some(dec!(0.9))),
            biometry(date(2025, 2, 10), dec!(5.0), Some(dec!(0.1))),
            biometry(date(2025, 2, 20), dec!(7.0), Some(dec!(0.2))),
            biometry(date(2025, 3, 2), dec!(9.0), Some(dec!(0.3))),
        ]
    }

    fn projector() -> HarvestProjector {
        HarvestProjector::new(AnalyticsSettings::default())
    }

    #[test]
    fn averages_only_the_most_recent_gains() {
        assert_eq!(projector().average_daily_gain(&history()), dec!(0.2000));

        let mut sparse = history();
        sparse[3].daily_weight_gain = None;
        // 0.2, 0.1, 0.9
        assert_eq!(projector().average_daily_gain(&sparse), dec!(0.4000));
    }

    #[test]
    fn projects_weight_from_the_last_measurement() {
        // 2025-03-02 + 10 days at 0.2 g/day.
        let weight = projector()
            .project_average_weight(&history(), date(2025, 3, 12))
            .unwrap();
        assert_eq!(weight, dec!(11.00));
    }

    #[test]
    fn projection_is_idempotent() {
        let projector = projector();
        let history = history();
        let first = projector.project_average_weight(&history, date(2025, 4, 1)).unwrap();
        let second = projector.project_average_weight(&history, date(2025, 4, 1)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn projection_requires_two_biometries() {
        let single = vec![biometry(date(2025, 2, 1), dec!(3), Some(dec!(0.1)))];
        assert_eq!(
            projector().project_average_weight(&single, date(2025, 3, 1)),
            Err(AnalyticsError::NotEnoughBiometries { required: 2, found: 1 })
        );
        assert!(projector().suggest_harvest_date(&lot(), &[], date(2025, 3, 1)).is_err());
    }

    #[test]
    fn projection_rejects_a_target_before_the_last_biometry() {
        let result = projector().project_average_weight(&history(), date(2025, 3, 1));
        assert!(matches!(result, Err(AnalyticsError::TargetBeforeLastBiometry { .. })));
    }

    #[test]
    fn ready_when_current_weight_reaches_the_ideal() {
        let mut history = history();
        history[3].average_weight = dec!(15.0);

        let suggestion = projector()
            .suggest_harvest_date(&lot(), &history, date(2025, 3, 5))
            .unwrap();

        assert_eq!(suggestion.status, HarvestReadiness::Ready);
        assert_eq!(suggestion.suggested_date, date(2025, 3, 5));
        assert_eq!(suggestion.days_needed, 0);
    }

    #[test]
    fn ideal_when_the_target_day_falls_inside_the_window() {
        // Day 60 at 9 g; 6 g more at 0.2 g/day needs 30 days -> day 90.
        let suggestion = projector()
            .suggest_harvest_date(&lot(), &history(), date(2025, 3, 2))
            .unwrap();

        assert_eq!(suggestion.status, HarvestReadiness::Ideal);
        assert_eq!(suggestion.days_needed, 30);
        assert_eq!(suggestion.total_cultivation_days, 90);
        assert_eq!(suggestion.suggested_date, date(2025, 4, 1));
    }

    #[test]
    fn too_early_clamps_to_the_minimum_day() {
        let mut history = history();
        history[3].average_weight = dec!(14.0);
        // 1 g at 0.2 g/day: 5 days -> day 65.
        let suggestion = projector()
            .suggest_harvest_date(&lot(), &history, date(2025, 3, 2))
            .unwrap();

        assert_eq!(suggestion.status, HarvestReadiness::TooEarly);
        assert_eq!(suggestion.total_cultivation_days, 65);
        assert_eq!(suggestion.suggested_date, date(2025, 4, 1));
    }

    #[test]
    fn overdue_clamps_to_the_maximum_day() {
        let mut history = history();
        for b in history.iter_mut() {
            b.daily_weight_gain = Some(dec!(0.03));
        }
        // 6 g at 0.03 g/day: 200 days -> day 260.
        let suggestion = projector()
            .suggest_harvest_date(&lot(), &history, date(2025, 3, 2))
            .unwrap();

        assert_eq!(suggestion.status, HarvestReadiness::AttentionOverdue);
        assert_eq!(suggestion.days_needed, 200);
        assert_eq!(suggestion.suggested_date, date(2025, 5, 31));
    }

    #[test]
    fn days_needed_rounds_up() {
        let mut history = history();
        history[3].average_weight = dec!(8.9);
        // 6.1 / 0.2 = 30.5 -> 31 days.
        let suggestion = projector()
            .suggest_harvest_date(&lot(), &history, date(2025, 3, 2))
            .unwrap();
        assert_eq!(suggestion.days_needed, 31);
    }

    #[test]
    fn no_growth_rate_cannot_be_projected_to_the_ideal() {
        let mut history = history();
        for b in history.iter_mut() {
            b.daily_weight_gain = None;
        }
        assert_eq!(
            projector().suggest_harvest_date(&lot(), &history, date(2025, 3, 2)),
            Err(AnalyticsError::NoGrowthRate)
        );
    }

    #[test]
    fn prices_projected_biomass() {
        let projector = projector();
        let lot = lot();
        let target = date(2025, 3, 12);

        // 11 g * 80000 / 1000
        let biomass = projector.project_biomass_at_harvest(&lot, &history(), target).unwrap();
        assert_eq!(biomass, dec!(880.00));

        let revenue = projector
            .project_revenue_at_harvest(&lot, &history(), target, dec!(25.50))
            .unwrap();
        assert_eq!(revenue, dec!(22440.00));
    }

    #[test]
    fn profit_is_revenue_less_cost_to_date() {
        let costs = CostBreakdown {
            stocking: dec!(5000.00),
            feed: dec!(12000.00),
            nutrient: Decimal::ZERO,
            fertilization: Decimal::ZERO,
            variable: dec!(600.00),
            total: dec!(17600.00),
        };

        let projection = projector()
            .project_profit_at_harvest(&lot(), &history(), date(2025, 3, 12), dec!(25), &costs)
            .unwrap();

        assert_eq!(projection.projected_revenue, dec!(22000.00));
        assert_eq!(projection.projected_profit, dec!(4400.00));
        assert_eq!(projection.roi_pct, Some(dec!(25.00)));
    }

    #[test]
    fn extreme_prices_are_errors_not_panics() {
        let result = projector().project_revenue_at_harvest(
            &lot(),
            &history(),
            date(2025, 3, 12),
            Decimal::MAX,
        );
        assert_eq!(result, Err(AnalyticsError::OutOfRange("projected revenue")));
    }

    #[test]
    fn an_unrepresentable_harvest_date_is_an_error() {
        let settings = AnalyticsSettings {
            min_cultivation_days: i64::MAX - 1,
            max_cultivation_days: i64::MAX,
            ..Default::default()
        };
        let result = HarvestProjector::new(settings).suggest_harvest_date(
            &lot(),
            &history(),
            date(2025, 3, 2),
        );
        assert_eq!(result, Err(AnalyticsError::OutOfRange("suggested harvest date")));
    }
}
