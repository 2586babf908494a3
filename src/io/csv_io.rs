use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::ForecastError;
use crate::models::{Forecast, PeriodRecord, YearRecord};

/// CSV row structure for the monthly series.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct PeriodRow {
    pub period: u32,
    pub date: NaiveDate,
    pub month: String,
    pub forecast_year: u32,
    pub period_in_year: u32,
    pub population: i64,
    pub period_growth: i64,
    pub periodic_addition: f64,
    pub cumulative_growth: i64,
    pub cumulative_growth_percent: Option<f64>,
}

impl PeriodRow {
    fn from_record(record: &PeriodRecord, forecast: &Forecast, index: usize) -> Self {
        Self {
            period: record.period_index,
            date: record.calendar_label,
            month: record.month_name(),
            forecast_year: record.forecast_year,
            period_in_year: record.period_in_year,
            population: record.population,
            period_growth: record.period_growth,
            periodic_addition: record.periodic_addition,
            cumulative_growth: forecast.cumulative_growth(index).unwrap_or_default(),
            cumulative_growth_percent: forecast.cumulative_growth_percent(index),
        }
    }
}

/// CSV row structure for the yearly summary.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct YearRow {
    pub year: u32,
    pub calendar_year: i32,
    pub date: NaiveDate,
    pub population: i64,
    pub yearly_growth: i64,
    pub yearly_growth_percent: Option<f64>,
    pub cumulative_growth: i64,
}

impl From<&YearRecord> for YearRow {
    fn from(y: &YearRecord) -> Self {
        Self {
            year: y.year_index,
            calendar_year: y.calendar_year,
            date: y.calendar_label,
            population: y.population_at_year_end,
            yearly_growth: y.year_over_year_growth,
            yearly_growth_percent: y.year_over_year_growth_percent,
            cumulative_growth: y.cumulative_growth,
        }
    }
}

fn writer<W: Write>(inner: W, delimiter: u8) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_writer(inner)
}

fn write_period_rows<W: Write>(
    wtr: &mut csv::Writer<W>,
    forecast: &Forecast,
) -> Result<(), ForecastError> {
    for (index, record) in forecast.periods.iter().enumerate() {
        wtr.serialize(PeriodRow::from_record(record, forecast, index))?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_year_rows<W: Write>(
    wtr: &mut csv::Writer<W>,
    years: &[YearRecord],
) -> Result<(), ForecastError> {
    for year in years {
        wtr.serialize(YearRow::from(year))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the monthly series to a CSV file.
pub fn write_periods_csv(
    forecast: &Forecast,
    path: impl AsRef<Path>,
    delimiter: u8,
) -> Result<(), ForecastError> {
    let file = std::fs::File::create(path.as_ref())?;
    write_period_rows(&mut writer(file, delimiter), forecast)
}

/// Write the yearly summary to a CSV file.
///
/// An empty summary still produces a header row.
pub fn write_years_csv(
    forecast: &Forecast,
    path: impl AsRef<Path>,
    delimiter: u8,
) -> Result<(), ForecastError> {
    let file = std::fs::File::create(path.as_ref())?;
    let mut wtr = writer(file, delimiter);
    if forecast.years.is_empty() {
        wtr.write_record(YEAR_HEADERS)?;
    }
    write_year_rows(&mut wtr, &forecast.years)
}

const YEAR_HEADERS: [&str; 7] = [
    "year",
    "calendar_year",
    "date",
    "population",
    "yearly_growth",
    "yearly_growth_percent",
    "cumulative_growth",
];

/// Render the monthly series as CSV bytes.
pub fn periods_csv_bytes(forecast: &Forecast, delimiter: u8) -> Result<Vec<u8>, ForecastError> {
    let mut wtr = writer(Vec::new(), delimiter);
    write_period_rows(&mut wtr, forecast)?;
    wtr.into_inner()
        .map_err(|e| ForecastError::Io(std::io::Error::other(e.to_string())))
}

/// Render the yearly summary as CSV bytes.
pub fn years_csv_bytes(forecast: &Forecast, delimiter: u8) -> Result<Vec<u8>, ForecastError> {
    let mut wtr = writer(Vec::new(), delimiter);
    if forecast.years.is_empty() {
        wtr.write_record(YEAR_HEADERS)?;
    }
    write_year_rows(&mut wtr, &forecast.years)?;
    wtr.into_inner()
        .map_err(|e| ForecastError::Io(std::io::Error::other(e.to_string())))
}

/// Path of the yearly CSV that accompanies a monthly CSV at `path`.
pub fn yearly_csv_path(path: &Path) -> std::path::PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "forecast".to_string());
    path.with_file_name(format!("{stem}_yearly.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_forecast;
    use crate::models::ForecastParameters;

    fn sample() -> Forecast {
        compute_forecast(&ForecastParameters::default()).unwrap()
    }

    #[test]
    fn test_periods_csv_rows() {
        let forecast = sample();
        let bytes = periods_csv_bytes(&forecast, b';').unwrap();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(bytes.as_slice());
        let rows: Vec<PeriodRow> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 60);
        assert_eq!(rows[0].population, 60_000);
        assert_eq!(rows[0].cumulative_growth, 0);
        assert_eq!(rows[0].month, "May 2025");
        assert_eq!(rows[59].population, forecast.end_population());
    }

    #[test]
    fn test_periods_csv_header() {
        let bytes = periods_csv_bytes(&sample(), b',').unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("period,date,month,forecast_year"));
    }

    #[test]
    fn test_years_csv_rows() {
        let forecast = sample();
        let bytes = years_csv_bytes(&forecast, b';').unwrap();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(bytes.as_slice());
        let rows: Vec<YearRow> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].year, 1);
        assert_eq!(rows[0].yearly_growth, rows[0].population - 60_000);
    }

    #[test]
    fn test_empty_years_csv_has_header() {
        let mut params = ForecastParameters::default();
        params.horizon_periods = 6;
        let forecast = compute_forecast(&params).unwrap();
        let text = String::from_utf8(years_csv_bytes(&forecast, b';').unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("year;calendar_year"));
    }

    #[test]
    fn test_write_files() {
        let forecast = sample();
        let dir = tempfile::tempdir().unwrap();
        let monthly = dir.path().join("forecast.csv");
        let yearly = yearly_csv_path(&monthly);
        write_periods_csv(&forecast, &monthly, b';').unwrap();
        write_years_csv(&forecast, &yearly, b';').unwrap();
        assert!(monthly.exists());
        assert_eq!(yearly.file_name().unwrap(), "forecast_yearly.csv");
        let text = std::fs::read_to_string(&yearly).unwrap();
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let result = write_periods_csv(&sample(), "no/such/dir/forecast.csv", b';');
        assert!(matches!(result, Err(ForecastError::Io(_))));
    }
}
