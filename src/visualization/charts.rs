use colored::Colorize;

use crate::analysis::{linear_series, StatisticsReport};
use crate::models::Forecast;

use super::tables::format_count;

const BAR_WIDTH: usize = 40;
/// Rows shown before the monthly curve is sampled.
const MAX_CHART_ROWS: usize = 24;

fn scaled(value: f64, max: f64) -> usize {
    if max > 0.0 && value > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    }
}

/// Format the population curve against the linear development as a string.
///
/// Each bar is split into the linear part (dark) and the compounding excess
/// (green). Long horizons are sampled so that the first and last months are
/// always shown.
pub fn format_population_chart(forecast: &Forecast) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Population Development".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if forecast.periods.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let linear = linear_series(&forecast.parameters);
    let max = forecast
        .periods
        .iter()
        .map(|p| p.population as f64)
        .chain(linear.iter().copied())
        .fold(0.0f64, f64::max);

    let n = forecast.periods.len();
    let step = n.div_ceil(MAX_CHART_ROWS).max(1);
    let mut indices: Vec<usize> = (0..n).step_by(step).collect();
    if indices.last() != Some(&(n - 1)) {
        indices.push(n - 1);
    }

    output.push_str(&format!(
        "  {:<14}  {:>12}  {:>12}  {}\n",
        "Month", "Population", "Linear", "\u{2588} linear  \u{2593} compounding"
    ));
    output.push_str(&format!("  {}\n", "-".repeat(90)));

    for i in indices {
        let p = &forecast.periods[i];
        let lin = linear.get(i).copied().unwrap_or_default();
        let total_len = scaled(p.population as f64, max);
        let linear_len = scaled(lin, max).min(total_len);
        let base = "\u{2588}".repeat(linear_len);
        let extra = "\u{2593}".repeat(total_len - linear_len);

        output.push_str(&format!(
            "  {:<14}  {:>12}  {:>12}  {}{}\n",
            p.month_name(),
            format_count(p.population),
            format_count(lin.round() as i64),
            base.dimmed(),
            extra.green()
        ));
    }

    output.push('\n');
    output
}

/// Print the population curve.
pub fn print_population_chart(forecast: &Forecast) {
    print!("{}", format_population_chart(forecast));
}

fn share_bar(label_a: &str, share_a: Option<f64>, label_b: &str) -> String {
    match share_a {
        Some(a) => {
            let a_len = ((a.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
            format!(
                "  {}{}  {} {:.1}% / {} {:.1}%\n",
                "\u{2588}".repeat(a_len).cyan(),
                "\u{2588}".repeat(BAR_WIDTH - a_len).green(),
                label_a,
                a,
                label_b,
                100.0 - a
            )
        }
        None => "  Shares undefined (denominator is zero).\n".to_string(),
    }
}

/// Format both growth decompositions as share bars.
pub fn format_composition_chart(report: &StatisticsReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Growth Composition".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    output.push_str("  Total growth: fixed additions vs compounding\n");
    output.push_str(&share_bar(
        "additions",
        report.composition.fixed_additions_percent,
        "compounding",
    ));

    output.push_str("  End population: linear development vs compounding effect\n");
    output.push_str(&share_bar(
        "linear",
        report
            .compounding_comparison
            .compounding_share_percent
            .map(|s| 100.0 - s),
        "compounding",
    ));

    output.push('\n');
    output
}

/// Print both growth decompositions.
pub fn print_composition_chart(report: &StatisticsReport) {
    print!("{}", format_composition_chart(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Forecaster;
    use crate::models::ForecastParameters;

    #[test]
    fn test_population_chart_samples_long_horizon() {
        let params = ForecastParameters::default();
        let (forecast, _) = Forecaster::new(&params).report().unwrap();
        let output = format_population_chart(&forecast);
        assert!(output.contains("Population Development"));
        assert!(output.contains("May 2025"));
        assert!(output.contains("April 2030"));
        let rows = output.lines().filter(|l| l.contains(" 20")).count();
        assert!(rows <= MAX_CHART_ROWS + 1);
    }

    #[test]
    fn test_population_chart_short_horizon_shows_every_month() {
        let mut params = ForecastParameters::default();
        params.horizon_periods = 3;
        let (forecast, _) = Forecaster::new(&params).report().unwrap();
        let output = format_population_chart(&forecast);
        assert!(output.contains("May 2025"));
        assert!(output.contains("June 2025"));
        assert!(output.contains("July 2025"));
    }

    #[test]
    fn test_population_chart_zero_population() {
        let mut params = ForecastParameters::default();
        params.initial_population = 0.0;
        params.periodic_addition = 0.0;
        params.horizon_periods = 2;
        let (forecast, _) = Forecaster::new(&params).report().unwrap();
        let output = format_population_chart(&forecast);
        assert!(output.contains("May 2025"));
    }

    #[test]
    fn test_composition_chart() {
        let params = ForecastParameters::default();
        let (_, stats) = Forecaster::new(&params).report().unwrap();
        let output = format_composition_chart(&stats);
        assert!(output.contains("Growth Composition"));
        assert!(output.contains("additions"));
        assert!(output.contains("linear"));
    }

    #[test]
    fn test_composition_chart_undefined() {
        let mut params = ForecastParameters::default();
        params.periodic_addition = 0.0;
        params.annual_growth_rate = 0.0;
        let (_, stats) = Forecaster::new(&params).report().unwrap();
        let output = format_composition_chart(&stats);
        assert!(output.contains("Shares undefined"));
    }
}
