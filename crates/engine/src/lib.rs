//! # Aquafarm Lot Analytics Engine
//!
//! The thin adapter between the collaborators that own farm records and the
//! pure calculators in `analytics`. Each operation loads what it needs for one
//! lot, hands the values to a calculator and returns the result. Nothing is
//! cached or written.
//!
//! Biometry indicators depend on a freshly read feed total, so callers that
//! persist the returned record must hold a per-lot transaction or lock.

use crate::error::EngineError;
use analytics::{
    allocate_shared_cost, growth_curve, AllocationTarget, CostAggregator, CostBreakdown,
    CostInputs, CostShare, GrowthIndicatorCalculator, GrowthInterval, HarvestPerformance,
    HarvestProjector, HarvestSuggestion, ProfitProjection, RoiSummary,
};
use chrono::NaiveDate;
use configuration::AnalyticsSettings;
use core_types::{AllocationPolicy, Biometry, BiometrySample, CostComponent, Lot, LotId};
use providers::{
    BiometryHistoryProvider, FeedCostProvider, FertilizationCostProvider, InMemoryFarmStore,
    LotProvider, NutrientCostProvider, VariableCostProvider,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod error;

/// The collaborators the engine reads from.
#[derive(Clone)]
pub struct Collaborators {
    pub lots: Arc<dyn LotProvider>,
    pub feed: Arc<dyn FeedCostProvider>,
    pub nutrients: Arc<dyn NutrientCostProvider>,
    pub fertilizations: Arc<dyn FertilizationCostProvider>,
    pub variable_costs: Arc<dyn VariableCostProvider>,
    pub biometries: Arc<dyn BiometryHistoryProvider>,
}

impl Collaborators {
    /// Serves every collaborator from one in-memory store.
    pub fn from_store(store: Arc<InMemoryFarmStore>) -> Self {
        Self {
            lots: store.clone(),
            feed: store.clone(),
            nutrients: store.clone(),
            fertilizations: store.clone(),
            variable_costs: store.clone(),
            biometries: store,
        }
    }
}

/// Loads a lot's records and runs the analytics over them.
pub struct LotAnalyticsEngine {
    collaborators: Collaborators,
    growth: GrowthIndicatorCalculator,
    costs: CostAggregator,
    projector: HarvestProjector,
}

impl LotAnalyticsEngine {
    pub fn new(settings: AnalyticsSettings, collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            growth: GrowthIndicatorCalculator::new(settings.clone()),
            costs: CostAggregator::new(),
            projector: HarvestProjector::new(settings),
        }
    }

    // ==========================================================================
    // Loading
    // ==========================================================================

    fn load_lot(&self, lot_id: LotId) -> Result<Lot, EngineError> {
        self.collaborators
            .lots
            .get_by_id(lot_id)?
            .ok_or(EngineError::NotFound { entity: "Lot", id: lot_id })
    }

    fn load_cost_inputs(&self, lot: &Lot) -> Result<CostInputs, EngineError> {
        Ok(CostInputs::for_lot(
            lot,
            self.collaborators.feed.sum_cost(lot.id)?,
            self.collaborators.nutrients.sum_cost(lot.id)?,
            self.collaborators.fertilizations.sum_cost(lot.id)?,
            self.collaborators.variable_costs.sum_cost(lot.id)?,
        ))
    }

    fn load_breakdown(&self, lot: &Lot) -> Result<CostBreakdown, EngineError> {
        Ok(self.costs.breakdown(&self.load_cost_inputs(lot)?))
    }

    fn load_lot_with_history(&self, lot_id: LotId) -> Result<(Lot, Vec<Biometry>), EngineError> {
        let lot = self.load_lot(lot_id)?;
        let history = self.collaborators.biometries.list_by_lot(lot_id)?;
        Ok((lot, history))
    }

    // ==========================================================================
    // Growth indicators
    // ==========================================================================

    /// Builds a new biometry with its derived fields, ready for the caller to persist.
    pub fn create_biometry(
        &self,
        lot_id: LotId,
        sample: &BiometrySample,
    ) -> Result<Biometry, EngineError> {
        let lot = self.load_lot(lot_id)?;
        let feed = self.collaborators.feed.sum_quantity(lot_id)?;
        let indicators = self.growth.calculate(&lot, sample, feed)?;
        Ok(Biometry::from_sample(lot_id, sample, indicators))
    }

    /// Re-derives the indicators of an explicitly updated biometry.
    pub fn update_biometry(&self, biometry: &Biometry) -> Result<Biometry, EngineError> {
        let lot = self.load_lot(biometry.lot_id)?;
        let feed = self.collaborators.feed.sum_quantity(lot.id)?;
        let indicators = self.growth.calculate(&lot, &biometry.sample(), feed)?;

        let mut updated = biometry.clone();
        updated.apply_indicators(indicators);
        Ok(updated)
    }

    /// Final survival, FCA and productivity of a harvested lot.
    pub fn harvest_performance(&self, lot_id: LotId) -> Result<Option<HarvestPerformance>, EngineError> {
        let lot = self.load_lot(lot_id)?;
        let feed = self.collaborators.feed.sum_quantity(lot_id)?;
        Ok(self.growth.harvest_performance(&lot, feed))
    }

    pub fn growth_curve(&self, lot_id: LotId) -> Result<Vec<GrowthInterval>, EngineError> {
        let (_, history) = self.load_lot_with_history(lot_id)?;
        Ok(growth_curve(&history))
    }

    // ==========================================================================
    // Costs
    // ==========================================================================

    pub fn cost_breakdown(&self, lot_id: LotId) -> Result<CostBreakdown, EngineError> {
        let lot = self.load_lot(lot_id)?;
        self.load_breakdown(&lot)
    }

    pub fn cost_per_kg(&self, lot_id: LotId) -> Result<Decimal, EngineError> {
        let lot = self.load_lot(lot_id)?;
        let breakdown = self.load_breakdown(&lot)?;
        Ok(self.costs.cost_per_kg(&lot, &breakdown))
    }

    pub fn cost_per_shrimp(&self, lot_id: LotId) -> Result<Decimal, EngineError> {
        let lot = self.load_lot(lot_id)?;
        let breakdown = self.load_breakdown(&lot)?;
        Ok(self.costs.cost_per_shrimp(&lot, &breakdown))
    }

    pub fn cost_percentages(
        &self,
        lot_id: LotId,
    ) -> Result<BTreeMap<CostComponent, Decimal>, EngineError> {
        let lot = self.load_lot(lot_id)?;
        let breakdown = self.load_breakdown(&lot)?;
        Ok(self.costs.percentages(&breakdown))
    }

    pub fn average_daily_cost(&self, lot_id: LotId) -> Result<Decimal, EngineError> {
        let lot = self.load_lot(lot_id)?;
        let breakdown = self.load_breakdown(&lot)?;
        Ok(self.costs.average_daily_cost(&lot, &breakdown))
    }

    /// `Ok(None)` while the lot has no harvest.
    pub fn roi(&self, lot_id: LotId) -> Result<Option<RoiSummary>, EngineError> {
        let lot = self.load_lot(lot_id)?;
        let breakdown = self.load_breakdown(&lot)?;
        Ok(self.costs.roi(&lot, &breakdown))
    }

    /// Splits a shared cost across lots. Each lot contributes its elapsed
    /// cultivation days and the estimated biomass of its latest biometry.
    pub fn allocate_shared_cost(
        &self,
        total: Decimal,
        lot_ids: &[LotId],
        policy: AllocationPolicy,
    ) -> Result<Vec<CostShare>, EngineError> {
        let targets = lot_ids
            .iter()
            .map(|&lot_id| {
                let (lot, history) = self.load_lot_with_history(lot_id)?;
                let estimated_biomass_kg = history
                    .iter()
                    .rev()
                    .find_map(|b| b.estimated_biomass_kg)
                    .unwrap_or_default();
                Ok(AllocationTarget {
                    lot_id,
                    cultivation_days: lot.cultivation_days_elapsed.unwrap_or_default(),
                    estimated_biomass_kg,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Ok(allocate_shared_cost(total, &targets, policy)?)
    }

    // ==========================================================================
    // Projections
    // ==========================================================================

    pub fn project_average_weight(
        &self,
        lot_id: LotId,
        target_date: NaiveDate,
    ) -> Result<Decimal, EngineError> {
        let (_, history) = self.load_lot_with_history(lot_id)?;
        Ok(self.projector.project_average_weight(&history, target_date)?)
    }

    pub fn suggest_harvest_date(
        &self,
        lot_id: LotId,
        evaluation_date: NaiveDate,
    ) -> Result<HarvestSuggestion, EngineError> {
        let (lot, history) = self.load_lot_with_history(lot_id)?;
        let suggestion = self
            .projector
            .suggest_harvest_date(&lot, &history, evaluation_date)?;
        tracing::debug!(
            lot_id,
            status = suggestion.status.as_str(),
            date = %suggestion.suggested_date,
            "Harvest date suggested."
        );
        Ok(suggestion)
    }

    pub fn project_biomass_at_harvest(
        &self,
        lot_id: LotId,
        target_date: NaiveDate,
    ) -> Result<Decimal, EngineError> {
        let (lot, history) = self.load_lot_with_history(lot_id)?;
        Ok(self
            .projector
            .project_biomass_at_harvest(&lot, &history, target_date)?)
    }

    pub fn project_revenue_at_harvest(
        &self,
        lot_id: LotId,
        target_date: NaiveDate,
        price_per_kg: Decimal,
    ) -> Result<Decimal, EngineError> {
        let (lot, history) = self.load_lot_with_history(lot_id)?;
        Ok(self
            .projector
            .project_revenue_at_harvest(&lot, &history, target_date, price_per_kg)?)
    }

    /// Projected revenue against the costs recorded so far.
    pub fn project_profit_at_harvest(
        &self,
        lot_id: LotId,
        target_date: NaiveDate,
        price_per_kg: Decimal,
    ) -> Result<ProfitProjection, EngineError> {
        let (lot, history) = self.load_lot_with_history(lot_id)?;
        let breakdown = self.load_breakdown(&lot)?;
        Ok(self.projector.project_profit_at_harvest(
            &lot,
            &history,
            target_date,
            price_per_kg,
            &breakdown,
        )?)
    }
}
