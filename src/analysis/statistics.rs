use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::ForecastError;
use crate::models::{ForecastParameters, PeriodRecord, YearRecord};

/// Split of total growth into fixed additions and the compounding on top of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthComposition {
    /// `periodic_addition * horizon_periods`
    pub total_fixed_additions: f64,
    /// `total_growth - total_fixed_additions`
    pub compounding_contribution: f64,
    /// Share of total growth from additions; `None` when total growth is zero
    pub fixed_additions_percent: Option<f64>,
    /// Share of total growth from compounding; `None` when total growth is zero
    pub compounding_percent: Option<f64>,
}

/// Comparison of the end population with a curve that has no growth factor at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundingComparison {
    /// Last value of [`linear_series`]
    pub linear_end_population: f64,
    /// `end_population - linear_end_population`
    pub compounding_effect: f64,
    /// Effect as a share of the end population; `None` when that is zero
    pub compounding_share_percent: Option<f64>,
}

/// Summary metrics of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub start_population: f64,
    pub end_population: i64,
    pub total_growth: f64,
    /// `None` when the initial population is zero
    pub total_growth_percent: Option<f64>,
    /// Geometric-mean realized annual growth; `None` when undefined
    pub average_annual_growth_percent: Option<f64>,
    /// The input annual rate as a percentage
    pub theoretical_annual_growth_percent: f64,
    pub average_period_growth: f64,
    pub min_period_growth: f64,
    pub max_period_growth: f64,
    pub composition: GrowthComposition,
    pub compounding_comparison: CompoundingComparison,
}

impl StatisticsReport {
    /// Flat list of named metrics; undefined values are `None`.
    pub fn metrics(&self) -> Vec<(&'static str, Option<f64>)> {
        let c = &self.composition;
        let l = &self.compounding_comparison;
        vec![
            ("start_population", Some(self.start_population)),
            ("end_population", Some(self.end_population as f64)),
            ("total_growth", Some(self.total_growth)),
            ("total_growth_percent", self.total_growth_percent),
            ("average_annual_growth_percent", self.average_annual_growth_percent),
            (
                "theoretical_annual_growth_percent",
                Some(self.theoretical_annual_growth_percent),
            ),
            ("average_period_growth", Some(self.average_period_growth)),
            ("min_period_growth", Some(self.min_period_growth)),
            ("max_period_growth", Some(self.max_period_growth)),
            ("total_fixed_additions", Some(c.total_fixed_additions)),
            ("compounding_contribution", Some(c.compounding_contribution)),
            ("fixed_additions_percent", c.fixed_additions_percent),
            ("compounding_percent", c.compounding_percent),
            ("linear_end_population", Some(l.linear_end_population)),
            ("compounding_effect", Some(l.compounding_effect)),
            ("compounding_share_percent", l.compounding_share_percent),
        ]
    }
}

/// `numerator / denominator * 100`, refusing a zero denominator.
pub fn percent_of(numerator: f64, denominator: f64, what: &str) -> Result<f64, ForecastError> {
    if denominator == 0.0 {
        return Err(ForecastError::DivisionUndefined(format!(
            "{what}: denominator is zero"
        )));
    }
    Ok(numerator / denominator * 100.0)
}

/// Percentage change from `start` to `end`, refusing a zero start.
pub fn growth_percent(end: f64, start: f64, what: &str) -> Result<f64, ForecastError> {
    percent_of(end - start, start, what)
}

fn undefined_as_none(result: Result<f64, ForecastError>) -> Option<f64> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("{e}; reporting as undefined");
            None
        }
    }
}

/// Pure-linear comparison curve: `initial + (i - 1) * addition` for each period.
pub fn linear_series(params: &ForecastParameters) -> Vec<f64> {
    (0..params.horizon_periods)
        .map(|i| params.initial_population + i as f64 * params.periodic_addition)
        .collect()
}

/// Compute summary metrics from the monthly and yearly series.
///
/// The monthly series is the source of truth for the end population; the
/// yearly summary only agrees with it when the horizon is a whole number of
/// years.
pub fn compute_statistics(
    periods: &[PeriodRecord],
    years: &[YearRecord],
    params: &ForecastParameters,
) -> Result<StatisticsReport, ForecastError> {
    let last = periods
        .last()
        .ok_or_else(|| ForecastError::invalid("periods", "forecast has no period records"))?;

    if let Some(year_end) = years.last() {
        if year_end.population_at_year_end != last.population {
            tracing::debug!(
                year_end = year_end.population_at_year_end,
                period_end = last.population,
                "partial trailing year; using monthly end population"
            );
        }
    }

    let start = params.initial_population;
    let end = last.population;
    let end_f = end as f64;
    let total_growth = end_f - start;

    let total_growth_percent = undefined_as_none(growth_percent(end_f, start, "total growth"));

    let average_annual_growth_percent = if start == 0.0 {
        tracing::warn!("average annual growth undefined for zero initial population");
        None
    } else {
        let ratio = end_f / start;
        if ratio < 0.0 {
            tracing::warn!(ratio, "average annual growth undefined for negative end population");
            None
        } else {
            Some((ratio.powf(1.0 / params.horizon_years()) - 1.0) * 100.0)
        }
    };

    let growths: Vec<f64> = periods.iter().map(|p| p.period_growth as f64).collect();

    let total_fixed_additions = params.total_fixed_additions();
    let compounding_contribution = total_growth - total_fixed_additions;
    let (fixed_additions_percent, compounding_percent) = if total_growth == 0.0 {
        tracing::warn!("growth composition undefined for zero total growth");
        (None, None)
    } else {
        (
            percent_of(total_fixed_additions, total_growth, "fixed additions").ok(),
            percent_of(compounding_contribution, total_growth, "compounding").ok(),
        )
    };

    let linear_end_population = linear_series(params).last().copied().unwrap_or(start);
    let compounding_effect = end_f - linear_end_population;
    let compounding_share_percent =
        undefined_as_none(percent_of(compounding_effect, end_f, "compounding share"));

    let report = StatisticsReport {
        start_population: start,
        end_population: end,
        total_growth,
        total_growth_percent,
        average_annual_growth_percent,
        theoretical_annual_growth_percent: params.annual_growth_rate * 100.0,
        average_period_growth: Statistics::mean(&growths),
        min_period_growth: Statistics::min(&growths),
        max_period_growth: Statistics::max(&growths),
        composition: GrowthComposition {
            total_fixed_additions,
            compounding_contribution,
            fixed_additions_percent,
            compounding_percent,
        },
        compounding_comparison: CompoundingComparison {
            linear_end_population,
            compounding_effect,
            compounding_share_percent,
        },
    };

    tracing::debug!(
        end_population = report.end_population,
        total_growth = report.total_growth,
        "computed forecast statistics"
    );

    Ok(report)
}
