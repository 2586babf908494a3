use chrono::{Months, NaiveDate};

use crate::analysis::aggregate_years;
use crate::error::ForecastError;
use crate::models::{
    Forecast, ForecastParameters, PeriodRecord, DEFAULT_MAX_HORIZON_PERIODS, PERIODS_PER_YEAR,
};

/// Round to the nearest integer, ties to even.
pub(crate) fn round_count(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Calendar label for a 1-based period index.
fn period_label(start: NaiveDate, period_index: u32) -> Result<NaiveDate, ForecastError> {
    start
        .checked_add_months(Months::new(period_index - 1))
        .ok_or_else(|| {
            ForecastError::invalid(
                "start_date",
                format!("period {period_index} falls outside the supported calendar range"),
            )
        })
}

/// Project the monthly series.
///
/// The running population is carried at full precision; each record holds the
/// population observed at the start of its period, rounded only for display.
///
/// ```text
/// P[i+1] = P[i] * r + A,   r = (1 + annual_rate)^(1/12)
/// ```
pub fn project_periods(params: &ForecastParameters) -> Result<Vec<PeriodRecord>, ForecastError> {
    params.validate()?;

    let factor = params.period_growth_factor();
    let mut current = params.initial_population;
    let mut records =
        Vec::with_capacity(params.horizon_periods.min(DEFAULT_MAX_HORIZON_PERIODS) as usize);

    for period_index in 1..=params.horizon_periods {
        let growth = current * (factor - 1.0) + params.periodic_addition;
        records.push(PeriodRecord {
            period_index,
            calendar_label: period_label(params.start_date, period_index)?,
            forecast_year: (period_index - 1) / PERIODS_PER_YEAR + 1,
            period_in_year: (period_index - 1) % PERIODS_PER_YEAR + 1,
            population: round_count(current),
            period_growth: round_count(growth),
            periodic_addition: params.periodic_addition,
        });

        current = current * factor + params.periodic_addition;
    }

    tracing::debug!(
        periods = records.len(),
        factor,
        final_population = current,
        "projected monthly series"
    );

    Ok(records)
}

/// Compute the monthly series and its yearly summary.
///
/// # Examples
///
/// ```
/// use orchard_forecast::{analysis::compute_forecast, ForecastParameters};
///
/// let forecast = compute_forecast(&ForecastParameters::default()).unwrap();
/// assert_eq!(forecast.periods.len(), 60);
/// assert_eq!(forecast.years.len(), 5);
/// assert_eq!(forecast.periods[0].population, 60_000);
/// ```
pub fn compute_forecast(params: &ForecastParameters) -> Result<Forecast, ForecastError> {
    let periods = project_periods(params)?;
    let years = aggregate_years(&periods, params.initial_population);
    Ok(Forecast {
        parameters: params.clone(),
        periods,
        years,
    })
}

/// Population after `n` periods from the geometric-series closed form.
///
/// `P0 * r^n + A * (r^n - 1) / (r - 1)`, degenerating to `P0 + n * A` when
/// `r == 1`. Used as an independent cross-check of the recurrence.
pub fn closed_form_population(params: &ForecastParameters, n: u32) -> f64 {
    let r = params.period_growth_factor();
    let rn = r.powi(n as i32);
    if (r - 1.0).abs() < f64::EPSILON {
        params.initial_population + n as f64 * params.periodic_addition
    } else {
        params.initial_population * rn + params.periodic_addition * (rn - 1.0) / (r - 1.0)
    }
}
