use crate::error::ProviderError;
use crate::{
    BiometryHistoryProvider, FeedCostProvider, FertilizationCostProvider, LotProvider,
    NutrientCostProvider, VariableCostProvider,
};
use chrono::NaiveDate;
use core_types::{Biometry, Lot, LotId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One feed application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedApplication {
    pub lot_id: LotId,
    pub applied_on: NaiveDate,
    pub quantity_kg: Decimal,
    pub cost: Decimal,
}

/// A dated cost entry: a nutrient application, a fertilization or a variable cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    pub lot_id: LotId,
    pub date: NaiveDate,
    pub cost: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// A snapshot of farm records held in memory.
///
/// Loaded from JSON with the same field names as the structs above, e.g.
/// `{"lots": [...], "biometries": [...], "feed_applications": [...]}`.
/// Missing collections default to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryFarmStore {
    pub lots: Vec<Lot>,
    pub biometries: Vec<Biometry>,
    pub feed_applications: Vec<FeedApplication>,
    pub nutrient_applications: Vec<CostEntry>,
    pub fertilizations: Vec<CostEntry>,
    pub variable_costs: Vec<CostEntry>,
}

impl InMemoryFarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ProviderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON farm snapshot from disk.
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let raw = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            lots = store.lots.len(),
            biometries = store.biometries.len(),
            "Farm snapshot loaded."
        );
        Ok(store)
    }

    pub fn with_lot(mut self, lot: Lot) -> Self {
        self.lots.push(lot);
        self
    }

    pub fn with_biometry(mut self, biometry: Biometry) -> Self {
        self.biometries.push(biometry);
        self
    }

    pub fn with_feed(mut self, feed: FeedApplication) -> Self {
        self.feed_applications.push(feed);
        self
    }

    pub fn with_nutrient(mut self, entry: CostEntry) -> Self {
        self.nutrient_applications.push(entry);
        self
    }

    pub fn with_fertilization(mut self, entry: CostEntry) -> Self {
        self.fertilizations.push(entry);
        self
    }

    pub fn with_variable_cost(mut self, entry: CostEntry) -> Self {
        self.variable_costs.push(entry);
        self
    }
}

/// Sums the selected values of a lot's entries, `None` when the lot has none,
/// like an SQL `SUM` over an empty set.
fn sum_for_lot<T>(
    entries: &[T],
    lot_id: LotId,
    lot_of: impl Fn(&T) -> LotId,
    value_of: impl Fn(&T) -> Decimal,
) -> Option<Decimal> {
    entries
        .iter()
        .filter(|e| lot_of(e) == lot_id)
        .map(value_of)
        .reduce(|acc, v| acc + v)
}

impl LotProvider for InMemoryFarmStore {
    fn get_by_id(&self, id: LotId) -> Result<Option<Lot>, ProviderError> {
        Ok(self.lots.iter().find(|l| l.id == id).cloned())
    }
}

impl FeedCostProvider for InMemoryFarmStore {
    fn sum_cost(&self, lot_id: LotId) -> Result<Option<Decimal>, ProviderError> {
        Ok(sum_for_lot(&self.feed_applications, lot_id, |f| f.lot_id, |f| f.cost))
    }

    fn sum_quantity(&self, lot_id: LotId) -> Result<Option<Decimal>, ProviderError> {
        Ok(sum_for_lot(&self.feed_applications, lot_id, |f| f.lot_id, |f| f.quantity_kg))
    }
}

impl NutrientCostProvider for InMemoryFarmStore {
    fn sum_cost(&self, lot_id: LotId) -> Result<Option<Decimal>, ProviderError> {
        Ok(sum_for_lot(&self.nutrient_applications, lot_id, |e| e.lot_id, |e| e.cost))
    }
}

impl FertilizationCostProvider for InMemoryFarmStore {
    fn sum_cost(&self, lot_id: LotId) -> Result<Option<Decimal>, ProviderError> {
        Ok(sum_for_lot(&self.fertilizations, lot_id, |e| e.lot_id, |e| e.cost))
    }
}

impl VariableCostProvider for InMemoryFarmStore {
    fn sum_cost(&self, lot_id: LotId) -> Result<Option<Decimal>, ProviderError> {
        Ok(sum_for_lot(&self.variable_costs, lot_id, |e| e.lot_id, |e| e.cost))
    }
}

impl BiometryHistoryProvider for InMemoryFarmStore {
    fn list_by_lot(&self, lot_id: LotId) -> Result<Vec<Biometry>, ProviderError> {
        let mut history: Vec<Biometry> = self
            .biometries
            .iter()
            .filter(|b| b.lot_id == lot_id)
            .cloned()
            .collect();
        history.sort_by_key(|b| b.measurement_date);
        Ok(history)
    }
}
