use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a cultivation lot.
///
/// `Planned -> Active -> Finalized`, and `Planned | Active -> Cancelled`.
/// The analytics never move a lot between states; they only read the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    Planned,
    Active,
    Finalized,
    Cancelled,
}

impl LotStatus {
    /// Returns true if the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: LotStatus) -> bool {
        matches!(
            (self, next),
            (LotStatus::Planned, LotStatus::Active)
                | (LotStatus::Active, LotStatus::Finalized)
                | (LotStatus::Planned, LotStatus::Cancelled)
                | (LotStatus::Active, LotStatus::Cancelled)
        )
    }

    /// Biometries and cost entries are accepted while the lot is planned or active.
    pub fn accepts_biometry(&self) -> bool {
        matches!(self, LotStatus::Planned | LotStatus::Active)
    }

    /// Feed and nutrient applications require an active lot.
    pub fn accepts_inputs(&self) -> bool {
        matches!(self, LotStatus::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LotStatus::Finalized | LotStatus::Cancelled)
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LotStatus::Planned => "planned",
            LotStatus::Active => "active",
            LotStatus::Finalized => "finalized",
            LotStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// The named cost components that make up a lot's total cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostComponent {
    Stocking,
    Feed,
    Nutrient,
    Fertilization,
    Variable,
}

impl CostComponent {
    /// Every component, in reporting order.
    pub const ALL: [CostComponent; 5] = [
        CostComponent::Stocking,
        CostComponent::Feed,
        CostComponent::Nutrient,
        CostComponent::Fertilization,
        CostComponent::Variable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostComponent::Stocking => "stocking",
            CostComponent::Feed => "feed",
            CostComponent::Nutrient => "nutrient",
            CostComponent::Fertilization => "fertilization",
            CostComponent::Variable => "variable",
        }
    }
}

impl fmt::Display for CostComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a cost shared between lots (energy, labour, ...) is split among them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Every lot receives the same share.
    Equal,
    /// Shares proportional to each lot's elapsed cultivation days.
    ByCultivationDays,
    /// Shares proportional to each lot's latest estimated biomass.
    ByBiomass,
}

impl FromStr for AllocationPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(AllocationPolicy::Equal),
            "days" | "by_cultivation_days" | "cultivation_days" => {
                Ok(AllocationPolicy::ByCultivationDays)
            }
            "biomass" | "by_biomass" => Ok(AllocationPolicy::ByBiomass),
            _ => Err(CoreError::UnknownVariant {
                kind: "allocation policy",
                value: s.to_string(),
            }),
        }
    }
}
