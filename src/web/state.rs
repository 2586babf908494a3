use indexmap::IndexMap;

use crate::analysis::ScenarioOverride;
use crate::config::ForecastConfig;
use crate::error::ForecastError;
use crate::models::{ForecastParameters, ValidationLimits};

/// Read-only settings shared by all request handlers.
///
/// Nothing here changes after start-up; every request computes its forecast
/// from scratch.
pub struct AppState {
    pub defaults: ForecastParameters,
    pub limits: ValidationLimits,
    pub scenarios: IndexMap<String, ScenarioOverride>,
    pub csv_delimiter: u8,
    pub pretty_json: bool,
}

impl AppState {
    pub fn from_config(config: &ForecastConfig) -> Result<Self, ForecastError> {
        Ok(Self {
            defaults: config.parameters()?,
            limits: config.limits()?,
            scenarios: config.scenario_overrides(),
            csv_delimiter: config.csv_delimiter()?,
            pretty_json: config.export.pretty_json,
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            defaults: ForecastParameters::default(),
            limits: ValidationLimits::default(),
            scenarios: crate::analysis::default_scenarios(),
            csv_delimiter: b';',
            pretty_json: true,
        }
    }
}
