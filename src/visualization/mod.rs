mod tables;
mod charts;

pub use tables::{
    format_parameters_table, print_parameters_table,
    format_monthly_table, print_monthly_table,
    format_yearly_table, print_yearly_table,
    format_statistics_table, print_statistics_table,
    format_scenario_table, print_scenario_table,
};
pub use charts::{
    format_population_chart, print_population_chart,
    format_composition_chart, print_composition_chart,
};
