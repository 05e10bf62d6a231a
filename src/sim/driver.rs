use average::{Estimate, Mean};
use serde::Serialize;

use super::workload::UniformSource;
use crate::{
    config::{ConfigError, SweepConfig},
    core::{JobIdGen, SchedError, Ticks},
    scheduler::Scheduler,
};

pub const RR_SHORT_SLICE: Ticks = 2;
pub const RR_LONG_SLICE: Ticks = 5;

/// Average turnaround of one workload under each compared policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub fcfs: f64,
    pub sjf: f64,
    pub rr2: f64,
    pub rr5: f64,
}

impl Comparison {
    /// Processes the scheduler's jobs under FCFS, SJF, RR(2) and RR(5), in that order
    pub fn measure(scheduler: &mut Scheduler, log: bool) -> Result<Self, SchedError> {
        Ok(Self {
            fcfs: scheduler.order_first_come_first_serve().process(log)?,
            sjf: scheduler.order_shortest_job_first().process(log)?,
            rr2: scheduler.order_round_robin(RR_SHORT_SLICE).process(log)?,
            rr5: scheduler.order_round_robin(RR_LONG_SLICE).process(log)?,
        })
    }

    pub fn rounded(&self, places: i32) -> Self {
        let scale = 10f64.powi(places);
        let round = |x: f64| (x * scale).round() / scale;
        Self {
            fcfs: round(self.fcfs),
            sjf: round(self.sjf),
            rr2: round(self.rr2),
            rr5: round(self.rr5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRow {
    pub num_jobs: usize,
    #[serde(flatten)]
    pub averages: Comparison,
}

#[derive(Debug, thiserror::Error)]
#[error("sweep aborted at {num_jobs} jobs")]
pub struct SweepError {
    pub num_jobs: usize,
    // Rows finished before the failing size
    pub completed: Vec<SweepRow>,
    #[source]
    pub source: SchedError,
}

/// Compares the policies over random workloads of increasing size, averaging
/// each size over several trials.
pub struct Sweep<'a> {
    config: &'a SweepConfig,
    ids: JobIdGen,
}

impl<'a> Sweep<'a> {
    /// Rejects a config whose sizes or bounds cannot be swept
    pub fn new(config: &'a SweepConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ids: JobIdGen::new(),
        })
    }

    pub fn run(
        &mut self,
        rng: &mut impl UniformSource,
        log: bool,
    ) -> Result<Vec<SweepRow>, SweepError> {
        let mut rows = Vec::new();
        for num_jobs in self.config.sizes() {
            tracing::info!(num_jobs, trials = self.config.trials, "testing scheduler");
            match self.run_size(num_jobs, rng, log) {
                Ok(averages) => rows.push(SweepRow { num_jobs, averages }),
                Err(source) => {
                    return Err(SweepError {
                        num_jobs,
                        completed: rows,
                        source,
                    });
                }
            }
        }
        Ok(rows)
    }

    fn run_size(
        &mut self,
        num_jobs: usize,
        rng: &mut impl UniformSource,
        log: bool,
    ) -> Result<Comparison, SchedError> {
        let mut trials = Vec::with_capacity(self.config.trials);
        for trial in 0..self.config.trials {
            let mut scheduler = Scheduler::random_within(
                num_jobs,
                &mut self.ids,
                rng,
                self.config.min_required,
                self.config.max_required,
            )?;
            let comparison = Comparison::measure(&mut scheduler, log)?;
            tracing::debug!(num_jobs, trial, ?comparison, "trial finished");
            trials.push(comparison);
        }

        Ok(Comparison {
            fcfs: avg(trials.iter().map(|c| c.fcfs)),
            sjf: avg(trials.iter().map(|c| c.sjf)),
            rr2: avg(trials.iter().map(|c| c.rr2)),
            rr5: avg(trials.iter().map(|c| c.rr5)),
        })
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    struct Constant(Ticks);

    impl UniformSource for Constant {
        fn uniform(&mut self, _low: Ticks, _high: Ticks) -> Ticks {
            self.0
        }
    }

    #[test]
    fn constant_workloads_have_closed_form_averages() {
        let config = SweepConfig {
            start_jobs: 2,
            max_jobs: 4,
            step: 2,
            trials: 3,
            ..SweepConfig::default()
        };
        let rows = Sweep::new(&config).unwrap().run(&mut Constant(4), false).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].num_jobs, 2);
        // Two jobs of 4: sequential 4 and 8
        assert_eq!(rows[0].averages.fcfs, 6.0);
        assert_eq!(rows[0].averages.sjf, 6.0);
        // RR(2) interleaves to 6 and 8; RR(5) degenerates to FCFS
        assert_eq!(rows[0].averages.rr2, 7.0);
        assert_eq!(rows[0].averages.rr5, 6.0);
        assert_eq!(rows[1].averages.fcfs, 10.0);
    }

    #[test]
    fn seeded_sweep_is_reproducible() {
        let config = SweepConfig {
            trials: 4,
            ..SweepConfig::default()
        };
        let run = |seed| {
            Sweep::new(&config)
                .unwrap()
                .run(&mut StdRng::seed_from_u64(seed), false)
                .unwrap()
        };
        let first = run(3);
        let second = run(3);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        for row in &first {
            // SJF is optimal for average turnaround on a single processor
            assert!(row.averages.sjf <= row.averages.fcfs);
            assert!(row.averages.sjf <= row.averages.rr2);
        }
    }

    #[test]
    fn failure_keeps_finished_rows() {
        let config = SweepConfig {
            start_jobs: 1,
            max_jobs: 2,
            step: 1,
            trials: 1,
            ..SweepConfig::default()
        };
        let err = Sweep::new(&config).unwrap().run(&mut Constant(0), false).unwrap_err();
        assert_eq!(err.num_jobs, 1);
        assert!(err.completed.is_empty());
        assert!(matches!(err.source, SchedError::Job(_)));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = SweepConfig {
            min_required: 10,
            max_required: 5,
            ..SweepConfig::default()
        };
        assert_eq!(
            Sweep::new(&config).err(),
            Some(ConfigError::InvalidBounds { min: 10, max: 5 })
        );

        let config = SweepConfig {
            step: 0,
            ..SweepConfig::default()
        };
        assert_eq!(Sweep::new(&config).err(), Some(ConfigError::ZeroStep));
    }

    #[test]
    fn rounding() {
        let c = Comparison {
            fcfs: 29.0 / 3.0,
            sjf: 9.0,
            rr2: 37.0 / 3.0,
            rr5: 0.0005,
        }
        .rounded(3);
        assert_eq!(c.fcfs, 9.667);
        assert_eq!(c.rr2, 12.333);
        assert_eq!(c.rr5, 0.001);
    }

    #[test]
    fn rows_serialize_flat() {
        let row = SweepRow {
            num_jobs: 5,
            averages: Comparison {
                fcfs: 1.0,
                sjf: 2.0,
                rr2: 3.0,
                rr5: 4.0,
            },
        };
        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json["num_jobs"], 5);
        assert_eq!(json["rr5"], 4.0);
    }
}
