use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};

use crate::analysis::StatisticsReport;
use crate::error::ForecastError;
use crate::models::Forecast;

const MONTHLY_HEADERS: [&str; 10] = [
    "period",
    "date",
    "month",
    "forecast_year",
    "period_in_year",
    "population",
    "period_growth",
    "periodic_addition",
    "cumulative_growth",
    "cumulative_growth_percent",
];

const YEARLY_HEADERS: [&str; 7] = [
    "year",
    "calendar_year",
    "date",
    "population",
    "yearly_growth",
    "yearly_growth_percent",
    "cumulative_growth",
];

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), ForecastError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    Ok(())
}

/// A single worksheet cell; undefined values are written as the text "undefined".
#[derive(Debug, Clone, PartialEq)]
enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    fn number_or_undefined(value: Option<f64>) -> Self {
        match value {
            Some(v) => CellValue::Number(v),
            None => CellValue::Text("undefined".to_string()),
        }
    }

    fn write(&self, sheet: &mut Worksheet, row: u32, col: u16) -> Result<(), ForecastError> {
        match self {
            CellValue::Number(v) => sheet.write_number(row, col, *v)?,
            CellValue::Text(t) => sheet.write_string(row, col, t)?,
        };
        Ok(())
    }
}

/// Cells of one Monthly row, in `MONTHLY_HEADERS` order.
fn monthly_row(forecast: &Forecast, index: usize) -> Vec<CellValue> {
    let p = &forecast.periods[index];
    vec![
        CellValue::Number(p.period_index as f64),
        CellValue::Text(p.calendar_label.to_string()),
        CellValue::Text(p.month_name()),
        CellValue::Number(p.forecast_year as f64),
        CellValue::Number(p.period_in_year as f64),
        CellValue::Number(p.population as f64),
        CellValue::Number(p.period_growth as f64),
        CellValue::Number(p.periodic_addition),
        CellValue::number_or_undefined(forecast.cumulative_growth(index).map(|g| g as f64)),
        CellValue::number_or_undefined(forecast.cumulative_growth_percent(index)),
    ]
}

fn write_monthly_sheet(sheet: &mut Worksheet, forecast: &Forecast) -> Result<(), ForecastError> {
    sheet.set_name("Monthly")?;
    write_headers(sheet, &MONTHLY_HEADERS)?;

    for index in 0..forecast.periods.len() {
        let row = index as u32 + 1;
        for (col, cell) in monthly_row(forecast, index).iter().enumerate() {
            cell.write(sheet, row, col as u16)?;
        }
    }
    Ok(())
}

fn write_yearly_sheet(sheet: &mut Worksheet, forecast: &Forecast) -> Result<(), ForecastError> {
    sheet.set_name("Yearly")?;
    write_headers(sheet, &YEARLY_HEADERS)?;

    for (index, y) in forecast.years.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_number(row, 0, y.year_index as f64)?;
        sheet.write_number(row, 1, y.calendar_year as f64)?;
        sheet.write_string(row, 2, y.calendar_label.to_string())?;
        sheet.write_number(row, 3, y.population_at_year_end as f64)?;
        sheet.write_number(row, 4, y.year_over_year_growth as f64)?;
        CellValue::number_or_undefined(y.year_over_year_growth_percent).write(sheet, row, 5)?;
        sheet.write_number(row, 6, y.cumulative_growth as f64)?;
    }
    Ok(())
}

fn write_statistics_sheet(
    sheet: &mut Worksheet,
    statistics: &StatisticsReport,
) -> Result<(), ForecastError> {
    sheet.set_name("Statistics")?;
    write_headers(sheet, &["metric", "value"])?;

    for (index, (name, value)) in statistics.metrics().into_iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, name)?;
        CellValue::number_or_undefined(value).write(sheet, row, 1)?;
    }
    Ok(())
}

fn build_workbook(
    forecast: &Forecast,
    statistics: &StatisticsReport,
) -> Result<Workbook, ForecastError> {
    let mut workbook = Workbook::new();
    write_monthly_sheet(workbook.add_worksheet(), forecast)?;
    write_yearly_sheet(workbook.add_worksheet(), forecast)?;
    write_statistics_sheet(workbook.add_worksheet(), statistics)?;
    Ok(workbook)
}

/// Write a forecast workbook with Monthly, Yearly and Statistics sheets.
pub fn write_excel(
    forecast: &Forecast,
    statistics: &StatisticsReport,
    path: impl AsRef<Path>,
) -> Result<(), ForecastError> {
    let mut workbook = build_workbook(forecast, statistics)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

/// Render the forecast workbook in memory.
pub fn excel_bytes(
    forecast: &Forecast,
    statistics: &StatisticsReport,
) -> Result<Vec<u8>, ForecastError> {
    let mut workbook = build_workbook(forecast, statistics)?;
    Ok(workbook.save_to_buffer()?)
}
