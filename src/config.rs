use clap::Args;

use crate::{
    core::Ticks,
    sim::workload::{DEFAULT_MAX_REQUIRED, DEFAULT_MIN_REQUIRED},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("step must be positive")]
    ZeroStep,
    #[error("at least one trial per workload size is required")]
    ZeroTrials,
    #[error("start size {start} exceeds max size {max}")]
    EmptyRange { start: usize, max: usize },
    #[error("workload sizes must be positive")]
    ZeroJobs,
    #[error("required time bounds {min}..={max} are invalid; need 0 < min <= max")]
    InvalidBounds { min: Ticks, max: Ticks },
}

/// Shape of a comparison sweep over increasing workload sizes
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct SweepConfig {
    /// Smallest workload size
    #[arg(long, default_value_t = 5)]
    pub start_jobs: usize,

    /// Largest workload size (inclusive)
    #[arg(long, default_value_t = 15)]
    pub max_jobs: usize,

    /// Increment between workload sizes
    #[arg(long, default_value_t = 5)]
    pub step: usize,

    /// Random workloads averaged per size
    #[arg(long, default_value_t = 20)]
    pub trials: usize,

    /// Lower bound on a job's required time
    #[arg(long, default_value_t = DEFAULT_MIN_REQUIRED)]
    pub min_required: Ticks,

    /// Upper bound on a job's required time (inclusive)
    #[arg(long, default_value_t = DEFAULT_MAX_REQUIRED)]
    pub max_required: Ticks,

    /// Seed for a reproducible sweep; the thread RNG is used otherwise
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start_jobs: 5,
            max_jobs: 15,
            step: 5,
            trials: 20,
            min_required: DEFAULT_MIN_REQUIRED,
            max_required: DEFAULT_MAX_REQUIRED,
            seed: None,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if self.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        if self.start_jobs == 0 {
            return Err(ConfigError::ZeroJobs);
        }
        if self.start_jobs > self.max_jobs {
            return Err(ConfigError::EmptyRange {
                start: self.start_jobs,
                max: self.max_jobs,
            });
        }
        if self.min_required == 0 || self.min_required > self.max_required {
            return Err(ConfigError::InvalidBounds {
                min: self.min_required,
                max: self.max_required,
            });
        }
        Ok(())
    }

    pub fn sizes(&self) -> impl Iterator<Item = usize> {
        (self.start_jobs..=self.max_jobs).step_by(self.step.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_cli_defaults() {
        #[derive(clap::Parser)]
        struct Cli {
            #[command(flatten)]
            sweep: SweepConfig,
        }

        let cli = <Cli as clap::Parser>::parse_from(["sched_model"]);
        assert_eq!(cli.sweep, SweepConfig::default());
    }

    #[test]
    fn default_sizes() {
        let config = SweepConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sizes().collect::<Vec<_>>(), vec![5, 10, 15]);
    }

    #[test]
    fn rejects_bad_shapes() {
        let base = SweepConfig::default();
        assert_eq!(
            SweepConfig { step: 0, ..base.clone() }.validate(),
            Err(ConfigError::ZeroStep)
        );
        assert_eq!(
            SweepConfig { trials: 0, ..base.clone() }.validate(),
            Err(ConfigError::ZeroTrials)
        );
        assert_eq!(
            SweepConfig { start_jobs: 20, ..base.clone() }.validate(),
            Err(ConfigError::EmptyRange { start: 20, max: 15 })
        );
        assert_eq!(
            SweepConfig { min_required: 0, ..base.clone() }.validate(),
            Err(ConfigError::InvalidBounds { min: 0, max: 35 })
        );
        assert_eq!(
            SweepConfig { min_required: 40, ..base }.validate(),
            Err(ConfigError::InvalidBounds { min: 40, max: 35 })
        );
    }
}
