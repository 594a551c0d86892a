//! Command line configuration for the simulation binary.

use clap::Parser;
use thiserror::Error;

/// Configuration errors surfaced before any matching work starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// At least one pair is needed to build a preference matrix
    #[error("number of pairs must be at least 1")]
    NoPairs,
}

/// Run a Gale-Shapley simulation over random preferences.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "stable-matching")]
#[command(about = "Deterministic Gale-Shapley stable matching simulator")]
#[command(version)]
pub struct SimulationConfig {
    /// Number of proposer/reviewer pairs
    pub pairs: usize,

    /// Seed for the preference generator
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Print a snapshot after every proposal
    #[arg(long)]
    pub frames: bool,

    /// Emit snapshots and the result as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl SimulationConfig {
    /// Reject configurations the engine cannot run
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.pairs == 0 {
            return Err(ConfigError::NoPairs);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = SimulationConfig::try_parse_from(["stable-matching", "4"]).unwrap();
        assert_eq!(config.pairs, 4);
        assert_eq!(config.seed, 0);
        assert!(!config.frames);
        assert!(!config.json);
    }

    #[test]
    fn test_parse_flags() {
        let config =
            SimulationConfig::try_parse_from(["stable-matching", "3", "--seed", "99", "--frames", "--json"]).unwrap();
        assert_eq!(config.seed, 99);
        assert!(config.frames);
        assert!(config.json);
    }

    #[test]
    fn test_zero_pairs_rejected() {
        let config = SimulationConfig::try_parse_from(["stable-matching", "0"]).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::NoPairs));
    }

    #[test]
    fn test_missing_pairs_is_a_parse_error() {
        assert!(SimulationConfig::try_parse_from(["stable-matching"]).is_err());
    }
}
