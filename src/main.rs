use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use orchard_forecast::{
    analysis::run_scenarios_with,
    io,
    models::Forecast,
    visualization::{
        print_composition_chart, print_monthly_table, print_parameters_table,
        print_population_chart, print_scenario_table, print_statistics_table, print_yearly_table,
    },
    ForecastConfig, Forecaster, StatisticsReport,
};

#[derive(Parser)]
#[command(
    name = "orchard-forecast",
    about = "Orchard Forecast - Monthly tree population forecasting with compounding growth",
    version,
    author
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Forecast inputs shared by the computing subcommands.
#[derive(Args, Debug)]
struct ForecastArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial tree count
    #[arg(long)]
    initial: Option<f64>,

    /// Trees added each month
    #[arg(long)]
    addition: Option<f64>,

    /// Annual growth rate as a fraction (0.07 = 7%)
    #[arg(long)]
    rate: Option<f64>,

    /// Horizon in years
    #[arg(long, conflicts_with = "periods")]
    years: Option<u32>,

    /// Horizon in months
    #[arg(long)]
    periods: Option<u32>,

    /// First forecast month (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
}

impl ForecastArgs {
    /// Configuration file (or defaults) with command-line values applied on top.
    fn load_config(&self) -> Result<ForecastConfig> {
        let mut config = ForecastConfig::load_or_default(self.config.as_deref())
            .with_context(|| match &self.config {
                Some(p) => format!("cannot load configuration {}", p.display()),
                None => "cannot build default configuration".to_string(),
            })?;

        let f = &mut config.forecast;
        if let Some(v) = self.initial {
            f.initial_population = v;
        }
        if let Some(v) = self.addition {
            f.periodic_addition = v;
        }
        if let Some(v) = self.rate {
            f.annual_growth_rate = v;
        }
        if let Some(v) = self.start {
            f.start_date = v;
        }
        if let Some(years) = self.years {
            f.horizon_years = Some(years);
            f.horizon_periods = None;
        }
        if let Some(periods) = self.periods {
            f.horizon_periods = Some(periods);
            f.horizon_years = None;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a forecast and display its tables
    Forecast {
        #[command(flatten)]
        args: ForecastArgs,

        /// Also show every month
        #[arg(long)]
        monthly: bool,

        /// Show the population and composition charts
        #[arg(long)]
        chart: bool,
    },

    /// Compare the configured growth scenarios
    Scenarios {
        #[command(flatten)]
        args: ForecastArgs,
    },

    /// Compute a forecast and write it to a file (.csv, .json or .xlsx)
    Export {
        #[command(flatten)]
        args: ForecastArgs,

        /// Output file path; CSV also writes a `_yearly.csv` sibling
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Display a forecast previously exported as JSON
    Show {
        /// Path to a JSON export
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print or write the default configuration file
    InitConfig {
        /// Write to this path instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the web API server
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// TOML configuration file with server defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn print_forecast(forecast: &Forecast, stats: &StatisticsReport, monthly: bool, chart: bool) {
    print_parameters_table(&forecast.parameters);
    if monthly {
        print_monthly_table(forecast);
    }
    print_yearly_table(forecast);
    print_statistics_table(stats);
    if chart {
        print_population_chart(forecast);
        print_composition_chart(stats);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Forecast {
            args,
            monthly,
            chart,
        } => {
            let params = args.load_config()?.parameters()?;
            println!(
                "\n{}",
                format!(
                    "Orchard Forecast: {} months from {}",
                    params.horizon_periods, params.start_date
                )
                .bold()
                .cyan()
            );

            let (forecast, stats) = Forecaster::new(&params).report()?;
            print_forecast(&forecast, &stats, monthly, chart);
        }

        Commands::Scenarios { args } => {
            let config = args.load_config()?;
            let params = config.parameters()?;
            let overrides = config.scenario_overrides();
            let results = run_scenarios_with(&params, &overrides, Some(&config.limits()?))?;

            println!(
                "\n{}",
                format!(
                    "Scenario Comparison: {} scenarios over {} months",
                    results.len(),
                    params.horizon_periods
                )
                .bold()
                .cyan()
            );
            print_scenario_table(&results);
        }

        Commands::Export { args, output } => {
            let config = args.load_config()?;
            let params = config.parameters()?;
            let (forecast, stats) = Forecaster::new(&params).report()?;

            let writer = io::writer_for_path(
                &output,
                config.csv_delimiter()?,
                config.export.pretty_json,
            )?;
            io::export(writer.as_ref(), &forecast, &stats, &output)
                .with_context(|| format!("export to {} failed", output.display()))?;

            println!(
                "{} Exported {} months to {}",
                "Success:".green().bold(),
                forecast.num_periods(),
                output.display()
            );
        }

        Commands::Show { input } => {
            let export = io::read_json(&input)
                .with_context(|| format!("cannot read export {}", input.display()))?;
            let forecast = Forecast {
                parameters: export.parameters,
                periods: export.periods,
                years: export.years,
            };
            print_forecast(&forecast, &export.statistics, false, false);
        }

        Commands::InitConfig { output } => {
            let text = ForecastConfig::default_toml()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("cannot write {}", path.display()))?;
                    println!(
                        "{} Wrote default configuration to {}",
                        "Success:".green().bold(),
                        path.display()
                    );
                }
                None => print!("{text}"),
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, config } => {
            let config = ForecastConfig::load_or_default(config.as_deref())?;
            let state = orchard_forecast::web::AppState::from_config(&config)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(orchard_forecast::web::start_server(port, state))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_replace_config_horizon() {
        let cli = Cli::parse_from([
            "orchard-forecast",
            "forecast",
            "--periods",
            "7",
            "--rate",
            "0.05",
        ]);
        let Commands::Forecast { args, .. } = cli.command else {
            panic!("expected forecast subcommand");
        };
        let params = args.load_config().unwrap().parameters().unwrap();
        assert_eq!(params.horizon_periods, 7);
        assert_eq!(params.annual_growth_rate, 0.05);
    }
}
