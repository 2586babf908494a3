use indexmap::IndexMap;

use crate::analysis::{
    compute_forecast, compute_statistics, linear_series, run_scenarios, ScenarioOverride,
    ScenarioResult, StatisticsReport,
};
use crate::error::ForecastError;
use crate::models::{Forecast, ForecastParameters};

/// Unified API that groups all forecast operations on one parameter set.
pub struct Forecaster<'a> {
    params: &'a ForecastParameters,
}

impl<'a> Forecaster<'a> {
    /// Create a new Forecaster for the given parameters.
    pub fn new(params: &'a ForecastParameters) -> Self {
        Self { params }
    }

    /// Monthly and yearly series.
    pub fn forecast(&self) -> Result<Forecast, ForecastError> {
        compute_forecast(self.params)
    }

    /// Summary metrics of an already computed forecast.
    pub fn statistics(&self, forecast: &Forecast) -> Result<StatisticsReport, ForecastError> {
        compute_statistics(&forecast.periods, &forecast.years, self.params)
    }

    /// Compute the forecast and its statistics in one step.
    pub fn report(&self) -> Result<(Forecast, StatisticsReport), ForecastError> {
        let forecast = self.forecast()?;
        let stats = self.statistics(&forecast)?;
        Ok((forecast, stats))
    }

    /// Pure-linear comparison curve for these parameters.
    pub fn linear_series(&self) -> Vec<f64> {
        linear_series(self.params)
    }

    /// Run scenarios using these parameters as the base.
    pub fn scenarios(
        &self,
        overrides: &IndexMap<String, ScenarioOverride>,
    ) -> Result<IndexMap<String, ScenarioResult>, ForecastError> {
        run_scenarios(self.params, overrides)
    }
}
