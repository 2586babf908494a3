use serde::{Deserialize, Serialize};

use super::{ForecastParameters, PeriodRecord, YearRecord};

/// The monthly and yearly series computed for one parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub parameters: ForecastParameters,
    pub periods: Vec<PeriodRecord>,
    pub years: Vec<YearRecord>,
}

impl Forecast {
    /// Number of projected periods.
    pub fn num_periods(&self) -> usize {
        self.periods.len()
    }

    /// Number of complete years.
    pub fn num_years(&self) -> usize {
        self.years.len()
    }

    /// Rounded population of the last period record.
    pub fn end_population(&self) -> i64 {
        self.periods.last().map_or(0, |p| p.population)
    }

    /// Rounded population of the first period record.
    pub fn first_population(&self) -> i64 {
        self.periods.first().map_or(0, |p| p.population)
    }

    /// Growth of the record at `index` (0-based) relative to the first record.
    pub fn cumulative_growth(&self, index: usize) -> Option<i64> {
        self.periods
            .get(index)
            .map(|p| p.population - self.first_population())
    }

    /// Percentage growth of the record at `index` relative to the first record.
    ///
    /// `None` when the index is out of range or the first population is zero.
    pub fn cumulative_growth_percent(&self, index: usize) -> Option<f64> {
        let first = self.first_population();
        if first == 0 {
            return None;
        }
        self.periods
            .get(index)
            .map(|p| (p.population as f64 / first as f64 - 1.0) * 100.0)
    }

    /// Split into the monthly and yearly series.
    pub fn into_parts(self) -> (Vec<PeriodRecord>, Vec<YearRecord>) {
        (self.periods, self.years)
    }
}
