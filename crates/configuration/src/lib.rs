use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalyticsSettings, SettingsOverrides};

/// Prefix for environment overrides, e.g. `AQUAFARM__SURVIVAL_ASSUMPTION=0.75`.
const ENV_PREFIX: &str = "AQUAFARM";

/// Loads the analytics settings from an optional `aquafarm.toml` in the working
/// directory, layered under `AQUAFARM__*` environment variables.
pub fn load_settings() -> Result<AnalyticsSettings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("aquafarm").required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    finish(builder)
}

/// Loads the analytics settings from an explicit file. The file must exist.
pub fn load_settings_from(path: &Path) -> Result<AnalyticsSettings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<AnalyticsSettings, ConfigError> {
    let settings = builder.try_deserialize::<AnalyticsSettings>()?;
    settings.validate()?;
    tracing::debug!(?settings, "Analytics settings loaded.");
    Ok(settings)
}
