use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement,
    Table,
};
use indexmap::IndexMap;

use crate::analysis::{ScenarioResult, StatisticsReport};
use crate::models::{Forecast, ForecastParameters};

/// Group digits in thousands, e.g. `1234567` -> `1,234,567`.
pub(crate) fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        format!("-{out}")
    } else {
        out
    }
}

/// Like [`format_count`] with an explicit `+` on non-negative values.
fn format_signed_count(value: i64) -> String {
    if value >= 0 {
        format!("+{}", format_count(value))
    } else {
        format_count(value)
    }
}

fn format_amount(value: f64) -> String {
    format_count(value.round() as i64)
}

fn format_percent(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}%"),
        None => "n/a".to_string(),
    }
}

fn new_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn heading(output: &mut String, title: &str, width: usize) {
    output.push_str(&format!("\n{}\n", title.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(width)));
}

/// Format the forecast parameters as a string.
pub fn format_parameters_table(params: &ForecastParameters) -> String {
    let mut output = String::new();
    heading(&mut output, "Forecast Parameters", 50);

    let mut table = new_table(vec!["Parameter", "Value"]);
    table.add_row(vec![
        Cell::new("Start date"),
        right(params.start_date.format("%d.%m.%Y").to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Initial population"),
        right(format_amount(params.initial_population)),
    ]);
    table.add_row(vec![
        Cell::new("Addition per month"),
        right(format_amount(params.periodic_addition)),
    ]);
    table.add_row(vec![
        Cell::new("Annual growth"),
        right(format!("{:.2}%", params.annual_growth_rate * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Horizon"),
        right(format!(
            "{} months ({:.1} years)",
            params.horizon_periods,
            params.horizon_years()
        )),
    ]);
    table.add_row(vec![
        Cell::new("Monthly growth factor"),
        right(format!("{:.6}", params.period_growth_factor())),
    ]);

    output.push_str(&format!("{table}"));
    output
}

/// Print the forecast parameters.
pub fn print_parameters_table(params: &ForecastParameters) {
    print!("{}", format_parameters_table(params));
}

/// Format the monthly series as a string.
pub fn format_monthly_table(forecast: &Forecast) -> String {
    let mut output = String::new();
    heading(&mut output, "Monthly Development", 60);

    let mut table = new_table(vec![
        "Month",
        "Date",
        "Population",
        "Growth",
        "Cumulative",
        "Cumulative %",
    ]);

    for (index, p) in forecast.periods.iter().enumerate() {
        table.add_row(vec![
            right(p.period_index.to_string()),
            Cell::new(p.month_name()),
            right(format_count(p.population)),
            right(format_count(p.period_growth)),
            right(format_count(forecast.cumulative_growth(index).unwrap_or_default())),
            right(format_percent(forecast.cumulative_growth_percent(index), 2)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the monthly series.
pub fn print_monthly_table(forecast: &Forecast) {
    print!("{}", format_monthly_table(forecast));
}

/// Format the yearly summary as a string.
pub fn format_yearly_table(forecast: &Forecast) -> String {
    let mut output = String::new();
    heading(&mut output, "Yearly Summary", 60);

    if forecast.years.is_empty() {
        output.push_str("  Horizon shorter than one year; no year-end records.\n");
        return output;
    }

    let mut table = new_table(vec![
        "Year",
        "Calendar",
        "Population",
        "Growth",
        "Growth %",
        "Cumulative",
    ]);

    for y in &forecast.years {
        table.add_row(vec![
            right(y.year_index.to_string()),
            right(y.calendar_year.to_string()),
            right(format_count(y.population_at_year_end)),
            right(format_signed_count(y.year_over_year_growth)),
            right(format_percent(y.year_over_year_growth_percent, 2)),
            right(format_count(y.cumulative_growth)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the yearly summary.
pub fn print_yearly_table(forecast: &Forecast) {
    print!("{}", format_yearly_table(forecast));
}

/// Format forecast statistics, including both growth decompositions.
pub fn format_statistics_table(report: &StatisticsReport) -> String {
    let mut output = String::new();
    heading(&mut output, "Statistics", 60);

    let mut table = new_table(vec!["Metric", "Value"]);
    let rows = [
        ("Start population", format_amount(report.start_population)),
        ("End population", format_count(report.end_population)),
        (
            "Total growth",
            format!(
                "{} ({})",
                format_amount(report.total_growth),
                format_percent(report.total_growth_percent, 2)
            ),
        ),
        (
            "Average annual growth (realized)",
            format_percent(report.average_annual_growth_percent, 2),
        ),
        (
            "Annual growth (assumed)",
            format_percent(Some(report.theoretical_annual_growth_percent), 2),
        ),
        (
            "Average monthly growth",
            format_amount(report.average_period_growth),
        ),
        ("Minimum monthly growth", format_amount(report.min_period_growth)),
        ("Maximum monthly growth", format_amount(report.max_period_growth)),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), right(value)]);
    }
    output.push_str(&format!("{table}"));

    let c = &report.composition;
    output.push_str(&format!("\n{}\n", "Growth composition (additions vs compounding)".bold()));
    let mut composition = new_table(vec!["Component", "Trees", "Share of growth"]);
    composition.add_row(vec![
        Cell::new("Fixed additions"),
        right(format_amount(c.total_fixed_additions)),
        right(format_percent(c.fixed_additions_percent, 1)),
    ]);
    composition.add_row(vec![
        Cell::new("Compounding"),
        right(format_amount(c.compounding_contribution)),
        right(format_percent(c.compounding_percent, 1)),
    ]);
    output.push_str(&format!("{composition}"));

    let l = &report.compounding_comparison;
    output.push_str(&format!("\n{}\n", "Compounding effect (vs linear development)".bold()));
    let mut comparison = new_table(vec!["Curve", "Trees", "Share of end population"]);
    comparison.add_row(vec![
        Cell::new("Linear development"),
        right(format_amount(l.linear_end_population)),
        right(format_percent(
            l.compounding_share_percent.map(|s| 100.0 - s),
            1,
        )),
    ]);
    comparison.add_row(vec![
        Cell::new("Compounding effect"),
        right(format_amount(l.compounding_effect)),
        right(format_percent(l.compounding_share_percent, 1)),
    ]);
    output.push_str(&format!("{comparison}"));

    output
}

/// Print forecast statistics.
pub fn print_statistics_table(report: &StatisticsReport) {
    print!("{}", format_statistics_table(report));
}

/// Format a scenario comparison as a string.
pub fn format_scenario_table(results: &IndexMap<String, ScenarioResult>) -> String {
    let mut output = String::new();
    heading(&mut output, "Scenario Comparison", 60);

    if results.is_empty() {
        output.push_str("  No scenarios defined.\n");
        return output;
    }

    let mut table = new_table(vec![
        "Scenario",
        "Annual growth",
        "Addition/month",
        "End population",
        "Total growth",
    ]);
    for (name, r) in results {
        table.add_row(vec![
            Cell::new(name),
            right(format!("{:.1}%", r.annual_growth_rate * 100.0)),
            right(format_amount(r.periodic_addition)),
            right(format_count(r.end_population)),
            right(format_percent(r.total_growth_percent, 1)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print a scenario comparison.
pub fn print_scenario_table(results: &IndexMap<String, ScenarioResult>) {
    print!("{}", format_scenario_table(results));
}
