use crate::runner::{ComparisonSettings, Experiment};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub simulation: ComparisonSettings,
    pub experiments: Vec<Experiment>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_file("config")
    }

    pub fn from_file(name: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(name))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        builder.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionPolicy;
    use crate::sources::{SourceType, UcbConfig};
    use config::FileFormat;

    const CONFIG: &str = r#"
[logging]
log_level = "debug"

[simulation]
true_means = [1.0, 2.0, 3.0, 10.0, 4.0]
max_steps = 500
max_cumulative_reward = 3600.0
repetitions = 10
seed = 1234

[[experiments]]
name = "greedy"

[[experiments]]
name = "epsilon-greedy"
selection = { type = "EpsilonGreedy" }

[[experiments]]
name = "ucb"
source = { type = "Ucb", confidence_level = 0.6 }
"#;

    #[test]
    fn parse() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(CONFIG, FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();

        assert_eq!(config.logging.log_level, "debug");
        assert_eq!(config.simulation.true_means.len(), 5);
        assert_eq!(config.simulation.seed, Some(1234));
        assert_eq!(config.experiments.len(), 3);
        assert_eq!(config.experiments[0].source, SourceType::Basic);
        assert_eq!(config.experiments[0].selection, SelectionPolicy::Greedy);
        assert_eq!(
            config.experiments[1].selection,
            SelectionPolicy::EpsilonGreedy { epsilon: 0.2 }
        );
        assert_eq!(
            config.experiments[2].source,
            SourceType::Ucb(UcbConfig {
                confidence_level: 0.6
            })
        );
    }
}
