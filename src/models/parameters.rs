use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Number of compounding periods in one year.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Largest horizon the growth model accepts at all (1,000 years).
///
/// Front ends normally apply the much tighter
/// [`DEFAULT_MAX_HORIZON_PERIODS`] through [`ValidationLimits`].
pub const MAX_HORIZON_PERIODS: u32 = 1_000 * PERIODS_PER_YEAR;

/// Default upper bound on the horizon accepted by front ends (50 years).
pub const DEFAULT_MAX_HORIZON_PERIODS: u32 = 50 * PERIODS_PER_YEAR;

/// Inputs of a single forecast.
///
/// Construct through [`ForecastParameters::new`] or
/// [`ForecastParameters::from_years`], both of which reject values outside the
/// modeled domain. The fields stay public so that front ends can build
/// overrides, but every computation re-checks them before running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastParameters {
    /// Population at the start of the first period
    pub initial_population: f64,
    /// Quantity added once per period (negative values model attrition)
    pub periodic_addition: f64,
    /// Annual growth rate as a fraction (0.07 = 7%)
    pub annual_growth_rate: f64,
    /// Number of monthly periods to project
    pub horizon_periods: u32,
    /// Calendar date of the first period, used only for labels
    pub start_date: NaiveDate,
}

impl ForecastParameters {
    /// Create validated parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use orchard_forecast::ForecastParameters;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    /// let params = ForecastParameters::new(60_000.0, 1_800.0, 0.07, 60, start).unwrap();
    /// assert!((params.period_growth_factor() - 1.005654).abs() < 1e-6);
    ///
    /// assert!(ForecastParameters::new(60_000.0, 1_800.0, 0.07, 0, start).is_err());
    /// ```
    pub fn new(
        initial_population: f64,
        periodic_addition: f64,
        annual_growth_rate: f64,
        horizon_periods: u32,
        start_date: NaiveDate,
    ) -> Result<Self, ForecastError> {
        let params = Self {
            initial_population,
            periodic_addition,
            annual_growth_rate,
            horizon_periods,
            start_date,
        };
        params.validate()?;
        Ok(params)
    }

    /// Create validated parameters with a horizon given in whole years.
    pub fn from_years(
        initial_population: f64,
        periodic_addition: f64,
        annual_growth_rate: f64,
        years: u32,
        start_date: NaiveDate,
    ) -> Result<Self, ForecastError> {
        let horizon_periods = years.checked_mul(PERIODS_PER_YEAR).ok_or_else(|| {
            ForecastError::invalid("horizon_periods", format!("{years} years is too long"))
        })?;
        Self::new(
            initial_population,
            periodic_addition,
            annual_growth_rate,
            horizon_periods,
            start_date,
        )
    }

    /// Check the invariants the growth model relies on.
    ///
    /// This does not apply front-end limits such as a maximum horizon; see
    /// [`ForecastParameters::validate_with`].
    pub fn validate(&self) -> Result<(), ForecastError> {
        if !self.initial_population.is_finite() {
            return Err(ForecastError::invalid(
                "initial_population",
                "must be a finite number",
            ));
        }
        if self.initial_population < 0.0 {
            return Err(ForecastError::invalid(
                "initial_population",
                format!("must be non-negative, got {}", self.initial_population),
            ));
        }
        if !self.periodic_addition.is_finite() {
            return Err(ForecastError::invalid(
                "periodic_addition",
                "must be a finite number",
            ));
        }
        if !self.annual_growth_rate.is_finite() {
            return Err(ForecastError::invalid(
                "annual_growth_rate",
                "must be a finite number",
            ));
        }
        if self.annual_growth_rate < 0.0 {
            return Err(ForecastError::invalid(
                "annual_growth_rate",
                format!("must be non-negative, got {}", self.annual_growth_rate),
            ));
        }
        if self.horizon_periods < 1 {
            return Err(ForecastError::invalid(
                "horizon_periods",
                "must be at least 1",
            ));
        }
        if self.horizon_periods > MAX_HORIZON_PERIODS {
            return Err(ForecastError::invalid(
                "horizon_periods",
                format!(
                    "must not exceed {MAX_HORIZON_PERIODS} periods, got {}",
                    self.horizon_periods
                ),
            ));
        }
        Ok(())
    }

    /// Check the model invariants plus the limits a front end enforces.
    pub fn validate_with(&self, limits: &ValidationLimits) -> Result<(), ForecastError> {
        self.validate()?;
        if self.horizon_periods > limits.max_horizon_periods {
            return Err(ForecastError::invalid(
                "horizon_periods",
                format!(
                    "must not exceed {} periods, got {}",
                    limits.max_horizon_periods, self.horizon_periods
                ),
            ));
        }
        if !limits.allow_attrition && self.periodic_addition < 0.0 {
            return Err(ForecastError::invalid(
                "periodic_addition",
                format!(
                    "must be non-negative unless attrition is allowed, got {}",
                    self.periodic_addition
                ),
            ));
        }
        Ok(())
    }

    /// Monthly multiplicative factor equivalent to the annual rate.
    pub fn period_growth_factor(&self) -> f64 {
        (1.0 + self.annual_growth_rate).powf(1.0 / PERIODS_PER_YEAR as f64)
    }

    /// Horizon in (possibly fractional) years.
    pub fn horizon_years(&self) -> f64 {
        self.horizon_periods as f64 / PERIODS_PER_YEAR as f64
    }

    /// Sum of all fixed additions over the horizon.
    pub fn total_fixed_additions(&self) -> f64 {
        self.periodic_addition * self.horizon_periods as f64
    }

    /// Copy of these parameters with a different rate and addition.
    pub fn with_overrides(&self, annual_growth_rate: f64, periodic_addition: f64) -> Self {
        Self {
            annual_growth_rate,
            periodic_addition,
            ..self.clone()
        }
    }
}

impl Default for ForecastParameters {
    /// The reference orchard: 60,000 trees on 2025-05-01, 1,800 planted per
    /// month, 7% annual growth, five years.
    fn default() -> Self {
        Self {
            initial_population: 60_000.0,
            periodic_addition: 1_800.0,
            annual_growth_rate: 0.07,
            horizon_periods: 5 * PERIODS_PER_YEAR,
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid reference date"),
        }
    }
}

/// Limits applied by front ends before handing parameters to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Largest accepted horizon in periods
    pub max_horizon_periods: u32,
    /// Whether a negative periodic addition is accepted
    pub allow_attrition: bool,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_horizon_periods: DEFAULT_MAX_HORIZON_PERIODS,
            allow_attrition: false,
        }
    }
}
