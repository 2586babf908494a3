use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{compute_forecast, growth_percent};
use crate::error::ForecastError;
use crate::models::{ForecastParameters, ValidationLimits};

/// Rate and addition replacing the base values for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOverride {
    pub annual_growth_rate: f64,
    pub periodic_addition: f64,
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub annual_growth_rate: f64,
    pub periodic_addition: f64,
    pub end_population: i64,
    /// `None` when the initial population is zero
    pub total_growth_percent: Option<f64>,
}

/// The four reference scenarios, from most cautious to most aggressive.
pub fn default_scenarios() -> IndexMap<String, ScenarioOverride> {
    [
        ("conservative", 0.05, 1_500.0),
        ("base", 0.07, 1_800.0),
        ("optimistic", 0.09, 2_200.0),
        ("aggressive", 0.12, 2_500.0),
    ]
    .into_iter()
    .map(|(name, annual_growth_rate, periodic_addition)| {
        (
            name.to_string(),
            ScenarioOverride {
                annual_growth_rate,
                periodic_addition,
            },
        )
    })
    .collect()
}

/// Run one forecast per scenario and collect end population and total growth.
///
/// Each scenario is computed independently from `base` with its overrides
/// applied; output order follows `overrides`.
pub fn run_scenarios(
    base: &ForecastParameters,
    overrides: &IndexMap<String, ScenarioOverride>,
) -> Result<IndexMap<String, ScenarioResult>, ForecastError> {
    run_scenarios_with(base, overrides, None)
}

/// Like [`run_scenarios`], additionally checking every scenario against `limits`.
pub fn run_scenarios_with(
    base: &ForecastParameters,
    overrides: &IndexMap<String, ScenarioOverride>,
    limits: Option<&ValidationLimits>,
) -> Result<IndexMap<String, ScenarioResult>, ForecastError> {
    let mut results = IndexMap::with_capacity(overrides.len());

    for (name, over) in overrides {
        let params = base.with_overrides(over.annual_growth_rate, over.periodic_addition);
        let checked = match limits {
            Some(limits) => params.validate_with(limits),
            None => params.validate(),
        };
        checked.map_err(|e| scenario_error(name, e))?;

        let forecast = compute_forecast(&params)?;
        let end_population = forecast.end_population();
        let total_growth_percent = growth_percent(
            end_population as f64,
            params.initial_population,
            "scenario total growth",
        )
        .ok();

        tracing::debug!(scenario = %name, end_population, "scenario computed");

        results.insert(
            name.clone(),
            ScenarioResult {
                annual_growth_rate: over.annual_growth_rate,
                periodic_addition: over.periodic_addition,
                end_population,
                total_growth_percent,
            },
        );
    }

    tracing::info!(scenarios = results.len(), "scenario comparison complete");
    Ok(results)
}

fn scenario_error(name: &str, err: ForecastError) -> ForecastError {
    match err {
        ForecastError::InvalidParameter { field, reason } => ForecastError::InvalidParameter {
            field: format!("scenarios.{name}.{field}"),
            reason,
        },
        other => other,
    }
}
