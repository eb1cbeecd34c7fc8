use bandits_sim::config::AppConfig;
use bandits_sim::report::Report;
use bandits_sim::runner::Comparison;

use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let config = AppConfig::from_env().expect("Cannot read config");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        experiments = config.experiments.len(),
        repetitions = config.simulation.repetitions,
        "Starting comparison"
    );

    let reports = match Comparison::run(&config.experiments, &config.simulation) {
        Ok(reports) => reports,
        Err(err) => {
            error!(%err, "Comparison failed");
            return ExitCode::FAILURE;
        }
    };

    let report = Report::new(config.simulation, reports);
    if let Err(err) = report.write_json(std::io::stdout().lock()) {
        error!(%err, "Cannot write report");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
