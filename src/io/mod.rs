mod csv_io;
mod json_io;
mod excel_io;

use std::path::Path;

use crate::analysis::StatisticsReport;
use crate::error::ForecastError;
use crate::models::Forecast;

pub use csv_io::{
    periods_csv_bytes, write_periods_csv, write_years_csv, yearly_csv_path, years_csv_bytes,
};
pub use json_io::{read_json, to_json_string, write_json, ForecastExport};
pub use excel_io::{excel_bytes, write_excel};

/// Trait for exporting a forecast and its statistics to a file.
pub trait ForecastWriter {
    fn write(
        &self,
        forecast: &Forecast,
        statistics: &StatisticsReport,
        path: &Path,
    ) -> Result<(), ForecastError>;
}

/// CSV export: the monthly series at the given path, the yearly summary next to it.
pub struct CsvFormat {
    pub delimiter: u8,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self { delimiter: b';' }
    }
}

impl ForecastWriter for CsvFormat {
    fn write(
        &self,
        forecast: &Forecast,
        _statistics: &StatisticsReport,
        path: &Path,
    ) -> Result<(), ForecastError> {
        write_periods_csv(forecast, path, self.delimiter)?;
        write_years_csv(forecast, yearly_csv_path(path), self.delimiter)
    }
}

/// JSON format writer.
pub struct JsonFormat {
    pub pretty: bool,
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl ForecastWriter for JsonFormat {
    fn write(
        &self,
        forecast: &Forecast,
        statistics: &StatisticsReport,
        path: &Path,
    ) -> Result<(), ForecastError> {
        write_json(forecast, statistics, path, self.pretty)
    }
}

/// Excel (.xlsx) format writer.
pub struct ExcelFormat;

impl ForecastWriter for ExcelFormat {
    fn write(
        &self,
        forecast: &Forecast,
        statistics: &StatisticsReport,
        path: &Path,
    ) -> Result<(), ForecastError> {
        write_excel(forecast, statistics, path)
    }
}

/// Pick a writer from the file extension of `path`.
pub fn writer_for_path(
    path: &Path,
    csv_delimiter: u8,
    pretty_json: bool,
) -> Result<Box<dyn ForecastWriter>, ForecastError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => Ok(Box::new(CsvFormat {
            delimiter: csv_delimiter,
        })),
        "json" => Ok(Box::new(JsonFormat {
            pretty: pretty_json,
        })),
        "xlsx" => Ok(Box::new(ExcelFormat)),
        _ => Err(ForecastError::ParseError(format!(
            "Unsupported output format: .{ext}. Use .csv, .json, or .xlsx"
        ))),
    }
}

/// Export through `writer`, logging the outcome.
///
/// Export runs after the forecast is complete and only reads it, so a failure
/// here leaves the computed results intact for the caller to keep using.
pub fn export(
    writer: &dyn ForecastWriter,
    forecast: &Forecast,
    statistics: &StatisticsReport,
    path: &Path,
) -> Result<(), ForecastError> {
    match writer.write(forecast, statistics, path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "forecast exported");
            Ok(())
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "forecast export failed");
            Err(e)
        }
    }
}
