//! # Aquafarm Lot Analytics
//!
//! This crate turns raw measurement and cost records of a cultivation lot into
//! derived indicators, cost metrics and harvest projections.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` and `configuration` (Layer 0).
//! - **Stateless Calculation:** Every calculator takes already-fetched values and returns
//!   a result. Nothing is cached or written, so calls for different lots never interact.
//! - **Fixed-Point Parity:** All figures are `Decimal`s rounded half-up at the scale they
//!   are stored and displayed with (see `core_types::rounding`).
//!
//! ## Public API
//!
//! - `GrowthIndicatorCalculator`: per-biometry indicators (GPD, biomass, survival, FCA).
//! - `CostAggregator`: cost breakdown, per-unit costs, percentages and ROI.
//! - `allocate_shared_cost`: exact-sum split of a shared cost across lots.
//! - `HarvestProjector`: projected weight, biomass, revenue, profit and harvest date.
//! - `AnalyticsError`: the business-rule failures returned from this crate.

// Declare the modules that constitute this crate.
pub mod allocation;
pub mod costs;
pub mod error;
pub mod growth;
pub mod projection;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use allocation::{allocate_shared_cost, AllocationTarget};
pub use costs::{CostAggregator, CostInputs};
pub use error::AnalyticsError;
pub use growth::{growth_curve, GrowthIndicatorCalculator};
pub use projection::HarvestProjector;
pub use report::{
    CostBreakdown, CostShare, GrowthInterval, HarvestPerformance, HarvestReadiness,
    HarvestSuggestion, ProfitProjection, RoiSummary,
};
