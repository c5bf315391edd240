//! # Aquafarm Core Types
//!
//! Layer 0 data structures shared by every other crate: lots, harvests,
//! biometries, the cost vocabulary, and the fixed-point rounding rules that
//! keep computed figures identical to the ones stored and displayed.

pub mod enums;
pub mod error;
pub mod rounding;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AllocationPolicy, CostComponent, LotStatus};
pub use error::CoreError;
pub use structs::{Biometry, BiometrySample, GrowthIndicators, Harvest, Lot, LotId};
