//! # Aquafarm Providers
//!
//! The collaborators the lot analytics read from. Persistence lives behind these
//! traits; the analytics never see how records are stored.
//!
//! ## Public API
//!
//! - The provider traits: `LotProvider`, `FeedCostProvider`, `NutrientCostProvider`,
//!   `FertilizationCostProvider`, `VariableCostProvider`, `BiometryHistoryProvider`.
//! - `InMemoryFarmStore`: a serde-loadable implementation of all of them, used by
//!   the command-line tool and the tests.
//! - `ProviderError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod memory;

pub use error::ProviderError;
pub use memory::{CostEntry, FeedApplication, InMemoryFarmStore};

use core_types::{Biometry, Lot, LotId};
use rust_decimal::Decimal;

/// Reads lots owned by the CRUD layer.
pub trait LotProvider: Send + Sync {
    /// Returns `Ok(None)` when no lot has this id.
    fn get_by_id(&self, id: LotId) -> Result<Option<Lot>, ProviderError>;
}

/// Sums over the feed applications of a lot.
///
/// Sums return `Ok(None)` when nothing was ever recorded for the lot.
pub trait FeedCostProvider: Send + Sync {
    fn sum_cost(&self, lot_id: LotId) -> Result<Option<Decimal>, ProviderError>;

    /// Cumulative feed quantity in kilograms.
    fn sum_quantity(&self, lot_id: LotId) -> Result<Option<Decimal>, ProviderError>;
}

pub trait NutrientCostProvider: Send + Sync {
    fn sum_cost(&self, lot_id: LotId) -> Result<Option<Decimal>, ProviderError>;
}

pub trait FertilizationCostProvider: Send + Sync {
    fn sum_cost(&self, lot_id: LotId) -> Result<Option<Decimal>, ProviderError>;
}

pub trait VariableCostProvider: Send + Sync {
    fn sum_cost(&self, lot_id: LotId) -> Result<Option<Decimal>, ProviderError>;
}

pub trait BiometryHistoryProvider: Send + Sync {
    /// The lot's biometries, ascending by measurement date.
    fn list_by_lot(&self, lot_id: LotId) -> Result<Vec<Biometry>, ProviderError>;
}
