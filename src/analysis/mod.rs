mod projection;
mod yearly;
mod statistics;
mod scenario;
mod forecaster;

pub use projection::{closed_form_population, compute_forecast, project_periods};
pub use yearly::aggregate_years;
pub use statistics::{
    compute_statistics, growth_percent, linear_series, percent_of, CompoundingComparison,
    GrowthComposition, StatisticsReport,
};
pub use scenario::{
    default_scenarios, run_scenarios, run_scenarios_with, ScenarioOverride, ScenarioResult,
};
pub use forecaster::Forecaster;
