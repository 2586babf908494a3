use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::StatisticsReport;
use crate::error::ForecastError;
use crate::models::{Forecast, ForecastParameters, PeriodRecord, YearRecord};

/// Everything a forecast run produced, as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastExport {
    pub parameters: ForecastParameters,
    pub periods: Vec<PeriodRecord>,
    pub years: Vec<YearRecord>,
    pub statistics: StatisticsReport,
}

impl ForecastExport {
    pub fn new(forecast: &Forecast, statistics: &StatisticsReport) -> Self {
        Self {
            parameters: forecast.parameters.clone(),
            periods: forecast.periods.clone(),
            years: forecast.years.clone(),
            statistics: statistics.clone(),
        }
    }
}

/// Render a forecast and its statistics as JSON text.
pub fn to_json_string(
    forecast: &Forecast,
    statistics: &StatisticsReport,
    pretty: bool,
) -> Result<String, ForecastError> {
    let export = ForecastExport::new(forecast, statistics);
    let content = if pretty {
        serde_json::to_string_pretty(&export)?
    } else {
        serde_json::to_string(&export)?
    };
    Ok(content)
}

/// Write a forecast and its statistics to a JSON file.
pub fn write_json(
    forecast: &Forecast,
    statistics: &StatisticsReport,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ForecastError> {
    let content = to_json_string(forecast, statistics, pretty)?;
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}

/// Read a previously written JSON export.
pub fn read_json(path: impl AsRef<Path>) -> Result<ForecastExport, ForecastError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let export: ForecastExport = serde_json::from_str(&content)?;
    export.parameters.validate()?;
    Ok(export)
}
