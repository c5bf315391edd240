use crate::error::AnalyticsError;
use crate::report::{GrowthInterval, HarvestPerformance};
use configuration::AnalyticsSettings;
use core_types::rounding::{percentage_of, round_currency, round_fca, round_gain, round_ratio};
use core_types::{Biometry, BiometrySample, GrowthIndicators, Lot};
use rust_decimal::Decimal;

const GRAMS_PER_KG: Decimal = Decimal::ONE_THOUSAND;

/// Estimated live biomass in kilograms: `weight_g * (stocked * survival) / 1000`.
pub(crate) fn estimated_biomass_kg(
    average_weight_g: Decimal,
    stocking_quantity: Decimal,
    survival: Decimal,
) -> Result<Decimal, AnalyticsError> {
    stocking_quantity
        .checked_mul(survival)
        .and_then(|alive| average_weight_g.checked_mul(alive))
        .map(|grams| round_currency(grams / GRAMS_PER_KG))
        .ok_or(AnalyticsError::OutOfRange("estimated biomass"))
}

/// Derives the per-measurement indicators of a biometry sample.
#[derive(Debug, Clone)]
pub struct GrowthIndicatorCalculator {
    settings: AnalyticsSettings,
}

impl GrowthIndicatorCalculator {
    pub fn new(settings: AnalyticsSettings) -> Self {
        Self { settings }
    }

    /// Computes the derived fields for a new or updated biometry.
    ///
    /// # Arguments
    ///
    /// * `lot` - The lot the sample belongs to.
    /// * `sample` - The measured values.
    /// * `cumulative_feed_kg` - Feed applied to the lot up to now, if any was recorded.
    ///
    /// # Returns
    ///
    /// The indicators to store on the biometry. Nothing is written here.
    pub fn calculate(
        &self,
        lot: &Lot,
        sample: &BiometrySample,
        cumulative_feed_kg: Option<Decimal>,
    ) -> Result<GrowthIndicators, AnalyticsError> {
        // --- 1. Hard validation ---
        if !lot.status.accepts_biometry() {
            return Err(AnalyticsError::LotNotAccepting { status: lot.status });
        }
        if sample.measurement_date < lot.stocking_date {
            return Err(AnalyticsError::BiometryBeforeStocking {
                measured: sample.measurement_date,
                stocked: lot.stocking_date,
            });
        }

        // --- 2. Soft validation, never rejects ---
        self.check_sample_weight(lot, sample);

        // --- 3. Indicators ---
        let cultivation_day = lot.days_since_stocking(sample.measurement_date);

        let daily_weight_gain = if cultivation_day > 0 {
            Some(round_gain(sample.average_weight / Decimal::from(cultivation_day)))
        } else {
            None
        };

        let estimated_biomass_kg = estimated_biomass_kg(
            sample.average_weight,
            lot.stocking_quantity_decimal(),
            self.settings.survival_assumption,
        )?;

        let feed_conversion_ratio = match cumulative_feed_kg {
            Some(feed) if estimated_biomass_kg > Decimal::ZERO => {
                Some(round_fca(feed / estimated_biomass_kg))
            }
            _ => None,
        };

        tracing::debug!(
            lot_id = lot.id,
            cultivation_day,
            %estimated_biomass_kg,
            ?daily_weight_gain,
            ?feed_conversion_ratio,
            "Growth indicators calculated."
        );

        Ok(GrowthIndicators {
            cultivation_day,
            daily_weight_gain,
            estimated_biomass_kg,
            estimated_survival_pct: self.settings.survival_assumption_pct(),
            feed_conversion_ratio,
        })
    }

    /// Compares a batch-weighed sample against `average_weight * sampled_count`.
    ///
    /// Returns the relative deviation when it exceeds the configured tolerance.
    /// The caller still accepts the sample.
    pub fn check_sample_weight(&self, lot: &Lot, sample: &BiometrySample) -> Option<Decimal> {
        let measured = sample.sampled_total_weight?;
        let expected = sample
            .average_weight
            .checked_mul(Decimal::from(sample.sampled_count))?;
        if expected.is_zero() {
            return None;
        }

        let difference = measured.checked_sub(expected)?.abs();
        if difference > expected.checked_mul(self.settings.sample_weight_tolerance)? {
            let deviation = difference.checked_div(expected)?;
            tracing::warn!(
                lot_id = lot.id,
                %measured,
                %expected,
                deviation = %round_ratio(deviation),
                "Sampled total weight deviates from average weight x sampled count."
            );
            return Some(deviation);
        }
        None
    }

    /// Indicators of a harvested cycle. `None` while the lot has no harvest.
    pub fn harvest_performance(
        &self,
        lot: &Lot,
        cumulative_feed_kg: Option<Decimal>,
    ) -> Option<HarvestPerformance> {
        let harvest = lot.harvest.as_ref()?;
        let cultivation_days = lot.days_since_stocking(harvest.harvest_date);
        let count = Decimal::from(harvest.count_harvested);

        let survival_pct = if harvest.count_harvested > 0 {
            percentage_of(count, lot.stocking_quantity_decimal())
        } else {
            harvest.survival_rate
        };

        let final_fca = match cumulative_feed_kg {
            Some(feed) if harvest.total_weight_kg > Decimal::ZERO => {
                Some(round_fca(feed / harvest.total_weight_kg))
            }
            _ => None,
        };

        let average_weight_g = if harvest.count_harvested > 0 {
            harvest
                .total_weight_kg
                .checked_mul(GRAMS_PER_KG)
                .map(|grams| round_currency(grams / count))
        } else {
            None
        };

        let productivity_kg_per_day = if cultivation_days > 0 {
            round_currency(harvest.total_weight_kg / Decimal::from(cultivation_days))
        } else {
            Decimal::ZERO
        };

        Some(HarvestPerformance {
            cultivation_days,
            survival_pct,
            final_fca,
            average_weight_g,
            productivity_kg_per_day,
        })
    }
}

/// Observed daily gain between each pair of consecutive biometries.
///
/// `biometries` must be ascending by date. Pairs measured on the same day are skipped.
pub fn growth_curve(biometries: &[Biometry]) -> Vec<GrowthInterval> {
    biometries
        .windows(2)
        .filter_map(|pair| {
            let (previous, next) = (&pair[0], &pair[1]);
            let days = (next.measurement_date - previous.measurement_date).num_days();
            if days <= 0 {
                return None;
            }
            let weight_gain_g = next.average_weight - previous.average_weight;
            Some(GrowthInterval {
                from: previous.measurement_date,
                to: next.measurement_date,
                days,
                weight_gain_g,
                daily_gain: round_gain(weight_gain_g / Decimal::from(days)),
            })
        })
        .collect()
}
