use crate::analysis::projection::round_count;
use crate::models::{PeriodRecord, YearRecord};

/// Reduce a monthly series to one record per complete forecast year.
///
/// Only the 12th period of each year is kept, so a trailing partial year is
/// dropped and a horizon shorter than a year yields an empty summary. The
/// first year is measured against the initial population; later years
/// against the previous year-end.
pub fn aggregate_years(periods: &[PeriodRecord], initial_population: f64) -> Vec<YearRecord> {
    let initial = round_count(initial_population);
    let mut baseline = initial;

    periods
        .iter()
        .filter(|p| p.is_year_end())
        .map(|p| {
            let year = YearRecord::from_period(p, baseline, initial);
            baseline = p.population;
            year
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::project_periods;
    use crate::models::ForecastParameters;
    use chrono::NaiveDate;

    fn periods(initial: f64, addition: f64, rate: f64, horizon: u32) -> Vec<PeriodRecord> {
        let params = ForecastParameters::new(
            initial,
            addition,
            rate,
            horizon,
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        )
        .unwrap();
        project_periods(&params).unwrap()
    }

    #[test]
    fn test_length_is_complete_years() {
        for horizon in [1, 11, 12, 13, 23, 24, 60, 61] {
            let years = aggregate_years(&periods(1_000.0, 10.0, 0.05, horizon), 1_000.0);
            assert_eq!(years.len(), (horizon / 12) as usize, "horizon {horizon}");
        }
    }

    #[test]
    fn test_short_horizon_is_empty() {
        let years = aggregate_years(&periods(1_000.0, 10.0, 0.05, 11), 1_000.0);
        assert!(years.is_empty());
    }

    #[test]
    fn test_year_one_baseline_is_initial_population() {
        let series = periods(60_000.0, 1_800.0, 0.07, 60);
        let years = aggregate_years(&series, 60_000.0);
        assert_eq!(
            years[0].year_over_year_growth,
            years[0].population_at_year_end - 60_000
        );
        assert_eq!(years[0].population_at_year_end, series[11].population);
    }

    #[test]
    fn test_later_years_use_previous_year_end() {
        let series = periods(60_000.0, 1_800.0, 0.07, 60);
        let years = aggregate_years(&series, 60_000.0);
        for pair in years.windows(2) {
            assert_eq!(
                pair[1].year_over_year_growth,
                pair[1].population_at_year_end - pair[0].population_at_year_end
            );
        }
    }

    #[test]
    fn test_year_indices_and_calendar() {
        let series = periods(60_000.0, 1_800.0, 0.07, 60);
        let years = aggregate_years(&series, 60_000.0);
        let indices: Vec<u32> = years.iter().map(|y| y.year_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        // Period 12 from May 2025 is April 2026.
        assert_eq!(years[0].calendar_year, 2026);
        assert_eq!(years[4].calendar_year, 2030);
    }

    #[test]
    fn test_cumulative_growth_matches_sum_of_yearly() {
        let series = periods(5_000.0, 120.0, 0.09, 48);
        let years = aggregate_years(&series, 5_000.0);
        let sum: i64 = years.iter().map(|y| y.year_over_year_growth).sum();
        assert_eq!(years.last().unwrap().cumulative_growth, sum);
    }

    #[test]
    fn test_zero_initial_population_percent_undefined() {
        let series = periods(0.0, 100.0, 0.05, 24);
        let years = aggregate_years(&series, 0.0);
        assert!(years[0].year_over_year_growth_percent.is_none());
        assert!(years[1].year_over_year_growth_percent.is_some());
    }

    #[test]
    fn test_empty_series() {
        assert!(aggregate_years(&[], 100.0).is_empty());
    }
}
