//! Monthly population forecasts for a growing orchard.
//!
//! A forecast starts from an initial tree count, compounds a monthly growth
//! factor derived from the annual rate, and adds a fixed number of trees each
//! month. Results come as a monthly series, year-end summaries, summary
//! statistics and scenario comparisons, and can be exported to CSV, JSON or
//! Excel.
//!
//! ```
//! use orchard_forecast::{ForecastParameters, Forecaster};
//!
//! let params = ForecastParameters::default();
//! let (forecast, stats) = Forecaster::new(&params).report().unwrap();
//! assert_eq!(forecast.num_periods(), 60);
//! assert_eq!(stats.composition.total_fixed_additions, 108_000.0);
//! ```
pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod visualization;

#[cfg(feature = "web")]
pub mod web;

pub use analysis::{Forecaster, ScenarioOverride, ScenarioResult, StatisticsReport};
pub use config::ForecastConfig;
pub use error::ForecastError;
pub use io::{ForecastWriter, CsvFormat, ExcelFormat, JsonFormat};
pub use models::{Forecast, ForecastParameters, PeriodRecord, ValidationLimits, YearRecord};
