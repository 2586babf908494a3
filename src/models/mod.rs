mod parameters;
mod records;
mod forecast;

pub use parameters::{
    ForecastParameters, ValidationLimits, DEFAULT_MAX_HORIZON_PERIODS, MAX_HORIZON_PERIODS,
    PERIODS_PER_YEAR,
};
pub use records::{PeriodRecord, YearRecord};
pub use forecast::Forecast;
