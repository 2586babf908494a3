use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One projected month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based position in the forecast
    pub period_index: u32,
    /// Start date advanced by `period_index - 1` months
    pub calendar_label: NaiveDate,
    /// 1-based forecast year this period falls into
    pub forecast_year: u32,
    /// Position within the forecast year (1..=12)
    pub period_in_year: u32,
    /// Population at the start of the period, rounded half to even
    pub population: i64,
    /// Rounded growth from this period into the next (rate component plus addition)
    pub period_growth: i64,
    /// Fixed addition applied at the end of this period
    pub periodic_addition: f64,
}

impl PeriodRecord {
    /// Whether this record closes a forecast year.
    pub fn is_year_end(&self) -> bool {
        self.period_in_year == super::PERIODS_PER_YEAR
    }

    /// Label such as "May 2025".
    pub fn month_name(&self) -> String {
        self.calendar_label.format("%B %Y").to_string()
    }
}

/// Snapshot taken at every 12th period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// 1-based forecast year
    pub year_index: u32,
    /// Calendar year of the year-end period
    pub calendar_year: i32,
    /// Calendar date of the year-end period
    pub calendar_label: NaiveDate,
    pub population_at_year_end: i64,
    /// Difference from the previous year-end, or from the initial population in year 1
    pub year_over_year_growth: i64,
    /// `None` when the baseline population is zero
    pub year_over_year_growth_percent: Option<f64>,
    /// Growth since the initial population
    pub cumulative_growth: i64,
}

impl YearRecord {
    pub(crate) fn from_period(
        period: &PeriodRecord,
        baseline: i64,
        initial_population: i64,
    ) -> Self {
        let growth = period.population - baseline;
        let percent = if baseline != 0 {
            Some((period.population as f64 / baseline as f64 - 1.0) * 100.0)
        } else {
            None
        };
        Self {
            year_index: period.forecast_year,
            calendar_year: period.calendar_label.year(),
            calendar_label: period.calendar_label,
            population_at_year_end: period.population,
            year_over_year_growth: growth,
            year_over_year_growth_percent: percent,
            cumulative_growth: period.population - initial_population,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: u32, population: i64) -> PeriodRecord {
        PeriodRecord {
            period_index: index,
            calendar_label: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            forecast_year: (index - 1) / 12 + 1,
            period_in_year: (index - 1) % 12 + 1,
            population,
            period_growth: 0,
            periodic_addition: 0.0,
        }
    }

    #[test]
    fn test_is_year_end() {
        assert!(record(12, 1).is_year_end());
        assert!(record(24, 1).is_year_end());
        assert!(!record(13, 1).is_year_end());
    }

    #[test]
    fn test_month_name() {
        assert_eq!(record(12, 1).month_name(), "April 2026");
    }

    #[test]
    fn test_year_record_from_period() {
        let year = YearRecord::from_period(&record(12, 1_100), 1_000, 1_000);
        assert_eq!(year.year_index, 1);
        assert_eq!(year.calendar_year, 2026);
        assert_eq!(year.year_over_year_growth, 100);
        assert!((year.year_over_year_growth_percent.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(year.cumulative_growth, 100);
    }

    #[test]
    fn test_year_record_zero_baseline() {
        let year = YearRecord::from_period(&record(12, 500), 0, 0);
        assert_eq!(year.year_over_year_growth, 500);
        assert!(year.year_over_year_growth_percent.is_none());
    }
}
