//! Loading forecast settings from a TOML file.
//!
//! Every section is optional. Missing values fall back to the reference
//! orchard (60,000 trees from 2025-05-01, 1,800 planted per month, 7% annual
//! growth, five years) and the four reference scenarios.
use std::path::Path;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{default_scenarios, ScenarioOverride};
use crate::error::ForecastError;
use crate::models::{ForecastParameters, ValidationLimits, PERIODS_PER_YEAR};

const DEFAULT_HORIZON_YEARS: u32 = 5;
const DEFAULT_MAX_HORIZON_YEARS: u32 = 50;

const DEFAULT_CONFIG_HEADER: &str = "# Orchard forecast configuration
# Rates are fractions (0.07 = 7%). Give either horizon_years or horizon_periods.
";

/// `[forecast]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastSection {
    pub start_date: NaiveDate,
    pub initial_population: f64,
    pub periodic_addition: f64,
    pub annual_growth_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizon_periods: Option<u32>,
}

impl Default for ForecastSection {
    fn default() -> Self {
        let reference = ForecastParameters::default();
        Self {
            start_date: reference.start_date,
            initial_population: reference.initial_population,
            periodic_addition: reference.periodic_addition,
            annual_growth_rate: reference.annual_growth_rate,
            horizon_years: None,
            horizon_periods: None,
        }
    }
}

impl ForecastSection {
    /// Horizon in periods; at most one of the two horizon keys may be set.
    pub fn resolved_horizon_periods(&self) -> Result<u32, ForecastError> {
        match (self.horizon_years, self.horizon_periods) {
            (Some(_), Some(_)) => Err(ForecastError::invalid(
                "horizon_periods",
                "give either horizon_years or horizon_periods, not both",
            )),
            (None, Some(periods)) => Ok(periods),
            (years, None) => years
                .unwrap_or(DEFAULT_HORIZON_YEARS)
                .checked_mul(PERIODS_PER_YEAR)
                .ok_or_else(|| ForecastError::invalid("horizon_years", "value is too large")),
        }
    }
}

/// `[limits]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsSection {
    pub max_horizon_years: u32,
    pub allow_attrition: bool,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_horizon_years: DEFAULT_MAX_HORIZON_YEARS,
            allow_attrition: false,
        }
    }
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    pub csv_delimiter: String,
    pub pretty_json: bool,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            csv_delimiter: ";".to_string(),
            pretty_json: true,
        }
    }
}

/// Complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    pub forecast: ForecastSection,
    pub limits: LimitsSection,
    pub export: ExportSection,
    /// Named scenarios in file order; empty means the reference scenarios
    pub scenarios: IndexMap<String, ScenarioOverride>,
}

impl ForecastConfig {
    /// Read a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ForecastError> {
        Ok(toml::from_str(content)?)
    }

    /// Read `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ForecastError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Contents of a fully spelled-out default configuration file.
    pub fn default_toml() -> Result<String, ForecastError> {
        let mut config = Self::default();
        config.forecast.horizon_years = Some(DEFAULT_HORIZON_YEARS);
        config.scenarios = default_scenarios();
        let body = toml::to_string(&config)
            .map_err(|e| ForecastError::ParseError(format!("cannot render config: {e}")))?;
        Ok(format!("{DEFAULT_CONFIG_HEADER}\n{body}"))
    }

    /// Forecast parameters described by the `[forecast]` section, checked against the limits.
    pub fn parameters(&self) -> Result<ForecastParameters, ForecastError> {
        let f = &self.forecast;
        let params = ForecastParameters::new(
            f.initial_population,
            f.periodic_addition,
            f.annual_growth_rate,
            f.resolved_horizon_periods()?,
            f.start_date,
        )?;
        params.validate_with(&self.limits()?)?;
        Ok(params)
    }

    /// Validation limits described by the `[limits]` section.
    pub fn limits(&self) -> Result<ValidationLimits, ForecastError> {
        let max_horizon_periods = self
            .limits
            .max_horizon_years
            .checked_mul(PERIODS_PER_YEAR)
            .ok_or_else(|| ForecastError::invalid("max_horizon_years", "value is too large"))?;
        Ok(ValidationLimits {
            max_horizon_periods,
            allow_attrition: self.limits.allow_attrition,
        })
    }

    /// Scenarios from the file, or the reference set when none are given.
    pub fn scenario_overrides(&self) -> IndexMap<String, ScenarioOverride> {
        if self.scenarios.is_empty() {
            default_scenarios()
        } else {
            self.scenarios.clone()
        }
    }

    /// The CSV delimiter as a single byte.
    pub fn csv_delimiter(&self) -> Result<u8, ForecastError> {
        match self.export.csv_delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ForecastError::invalid(
                "csv_delimiter",
                format!(
                    "must be a single ASCII character, got '{}'",
                    self.export.csv_delimiter
                ),
            )),
        }
    }
}
