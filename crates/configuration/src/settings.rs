use crate::error::ConfigError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The policy values behind the lot analytics.
///
/// Every value has a default, so an absent `aquafarm.toml` is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Fraction of the stocked population assumed alive (0.80 means 80%).
    /// Used for estimated biomass both at sampling time and in projections.
    pub survival_assumption: Decimal,
    /// Relative tolerance for the sampled total weight check (0.05 means 5%).
    pub sample_weight_tolerance: Decimal,
    /// Average individual weight, in grams, at which a lot is ready for harvest.
    pub ideal_harvest_weight_g: Decimal,
    /// A suggested harvest date never falls before this cultivation day.
    pub min_cultivation_days: i64,
    /// A suggested harvest date never falls after this cultivation day.
    pub max_cultivation_days: i64,
    /// How many of the most recent daily gain values are averaged for projections.
    pub growth_window: usize,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            survival_assumption: dec!(0.80),
            sample_weight_tolerance: dec!(0.05),
            ideal_harvest_weight_g: dec!(15),
            min_cultivation_days: 90,
            max_cultivation_days: 150,
            growth_window: 3,
        }
    }
}

impl AnalyticsSettings {
    /// The survival assumption expressed as a percentage, e.g. `80.00`, rounded half-up.
    pub fn survival_assumption_pct(&self) -> Decimal {
        (self.survival_assumption * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Checks that the values are logical before any calculator uses them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.survival_assumption <= Decimal::ZERO || self.survival_assumption > Decimal::ONE {
            return Err(ConfigError::ValidationError(
                "survival_assumption must be greater than 0 and at most 1".to_string(),
            ));
        }
        if self.sample_weight_tolerance.is_sign_negative() {
            return Err(ConfigError::ValidationError(
                "sample_weight_tolerance cannot be negative".to_string(),
            ));
        }
        if self.ideal_harvest_weight_g <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "ideal_harvest_weight_g must be greater than 0".to_string(),
            ));
        }
        if self.min_cultivation_days < 0 || self.min_cultivation_days >= self.max_cultivation_days {
            return Err(ConfigError::ValidationError(format!(
                "cultivation day window is invalid: min {} / max {}",
                self.min_cultivation_days, self.max_cultivation_days
            )));
        }
        if self.growth_window == 0 {
            return Err(ConfigError::ValidationError(
                "growth_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Result<Self, ConfigError> {
        if let Some(survival) = overrides.survival_assumption {
            self.survival_assumption = survival;
        }
        if let Some(weight) = overrides.ideal_harvest_weight_g {
            self.ideal_harvest_weight_g = weight;
        }
        self.validate()?;
        Ok(self)
    }
}

/// Optional overrides, exposed as CLI flags when the `clap` feature is enabled.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct SettingsOverrides {
    /// Override the assumed survival fraction (e.g. 0.75).
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub survival_assumption: Option<Decimal>,

    /// Override the ideal harvest weight in grams.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub ideal_harvest_weight_g: Option<Decimal>,
}
