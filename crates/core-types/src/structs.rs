use crate::enums::LotStatus;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a lot as assigned by the persistence layer.
pub type LotId = i64;

/// One stocking-to-harvest cultivation cycle in a single pond.
///
/// Owned by the CRUD layer; the analytics only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub id: LotId,
    pub code: String,
    pub pond_id: i64,
    pub stocking_date: NaiveDate,
    /// Number of post-larvae stocked.
    pub stocking_quantity: u64,
    pub stocking_cost: Decimal,
    pub status: LotStatus,
    /// Maintained by the CRUD layer. `None` until the lot has started.
    #[serde(default)]
    pub cultivation_days_elapsed: Option<i64>,
    #[serde(default)]
    pub harvest: Option<Harvest>,
}

impl Lot {
    /// Whole calendar days from stocking to `date`. Negative if `date` precedes stocking.
    pub fn days_since_stocking(&self, date: NaiveDate) -> i64 {
        (date - self.stocking_date).num_days()
    }

    pub fn stocking_quantity_decimal(&self) -> Decimal {
        Decimal::from(self.stocking_quantity)
    }
}

/// The terminal event of a lot. A lot has at most one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harvest {
    pub harvest_date: NaiveDate,
    pub total_weight_kg: Decimal,
    pub count_harvested: u64,
    /// Survival percentage as recorded at harvest time.
    #[serde(default)]
    pub survival_rate: Option<Decimal>,
    /// Price per kilogram.
    pub unit_price: Decimal,
    pub total_revenue: Decimal,
    #[serde(default)]
    pub harvest_cost: Decimal,
}

/// Raw values taken when a biometry sample is measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometrySample {
    pub measurement_date: NaiveDate,
    /// Average individual weight, grams.
    pub average_weight: Decimal,
    pub sampled_count: u32,
    /// Weight of the whole sample, grams, when it was weighed as a batch.
    #[serde(default)]
    pub sampled_total_weight: Option<Decimal>,
}

/// Indicators derived from one biometry sample plus its lot context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthIndicators {
    pub cultivation_day: i64,
    /// Grams per day. Unset on the stocking day itself.
    pub daily_weight_gain: Option<Decimal>,
    pub estimated_biomass_kg: Decimal,
    pub estimated_survival_pct: Decimal,
    pub feed_conversion_ratio: Option<Decimal>,
}

/// A persisted biometry measurement with its derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biometry {
    #[serde(default)]
    pub id: Option<i64>,
    pub lot_id: LotId,
    pub measurement_date: NaiveDate,
    pub cultivation_day: i64,
    pub average_weight: Decimal,
    pub sampled_count: u32,
    #[serde(default)]
    pub sampled_total_weight: Option<Decimal>,
    #[serde(default)]
    pub daily_weight_gain: Option<Decimal>,
    #[serde(default)]
    pub estimated_biomass_kg: Option<Decimal>,
    #[serde(default)]
    pub estimated_survival_pct: Option<Decimal>,
    #[serde(default)]
    pub feed_conversion_ratio: Option<Decimal>,
}

impl Biometry {
    /// Builds a new, not yet persisted, record from a sample and its derived indicators.
    pub fn from_sample(lot_id: LotId, sample: &BiometrySample, indicators: GrowthIndicators) -> Self {
        let mut biometry = Self {
            id: None,
            lot_id,
            measurement_date: sample.measurement_date,
            cultivation_day: indicators.cultivation_day,
            average_weight: sample.average_weight,
            sampled_count: sample.sampled_count,
            sampled_total_weight: sample.sampled_total_weight,
            daily_weight_gain: None,
            estimated_biomass_kg: None,
            estimated_survival_pct: None,
            feed_conversion_ratio: None,
        };
        biometry.apply_indicators(indicators);
        biometry
    }

    /// Overwrites the derived fields. Used when a biometry is explicitly updated.
    pub fn apply_indicators(&mut self, indicators: GrowthIndicators) {
        self.cultivation_day = indicators.cultivation_day;
        self.daily_weight_gain = indicators.daily_weight_gain;
        self.estimated_biomass_kg = Some(indicators.estimated_biomass_kg);
        self.estimated_survival_pct = Some(indicators.estimated_survival_pct);
        self.feed_conversion_ratio = indicators.feed_conversion_ratio;
    }

    /// The raw sample this record was measured from.
    pub fn sample(&self) -> BiometrySample {
        BiometrySample {
            measurement_date: self.measurement_date,
            average_weight: self.average_weight,
            sampled_count: self.sampled_count,
            sampled_total_weight: self.sampled_total_weight,
        }
    }
}
