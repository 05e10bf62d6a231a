use rand::Rng;

use crate::{
    core::{Job, JobError, JobIdGen, Ticks},
    scheduler::Scheduler,
};

pub const DEFAULT_MIN_REQUIRED: Ticks = 5;
pub const DEFAULT_MAX_REQUIRED: Ticks = 35;
pub const DEFAULT_NUM_JOBS: usize = 5;

/// Uniform integer source over an inclusive range.
///
/// Any `rand::Rng` works; tests can substitute a scripted source.
pub trait UniformSource {
    fn uniform(&mut self, low: Ticks, high: Ticks) -> Ticks;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn uniform(&mut self, low: Ticks, high: Ticks) -> Ticks {
        self.random_range(low..=high)
    }
}

impl Job {
    /// Job named `Job{id}` with a requirement drawn from `min..=max`.
    pub fn random(
        ids: &mut JobIdGen,
        rng: &mut impl UniformSource,
        min_required: Ticks,
        max_required: Ticks,
    ) -> Result<Self, JobError> {
        if min_required > max_required {
            return Err(JobError::InvalidBounds {
                min: min_required,
                max: max_required,
            });
        }
        let name = format!("Job{}", ids.peek());
        Job::new(ids, name, rng.uniform(min_required, max_required))
    }
}

impl Scheduler {
    /// `num_jobs` random jobs within the default requirement bounds
    pub fn random(
        num_jobs: usize,
        ids: &mut JobIdGen,
        rng: &mut impl UniformSource,
    ) -> Result<Self, JobError> {
        Self::random_within(num_jobs, ids, rng, DEFAULT_MIN_REQUIRED, DEFAULT_MAX_REQUIRED)
    }

    pub fn random_within(
        num_jobs: usize,
        ids: &mut JobIdGen,
        rng: &mut impl UniformSource,
        min_required: Ticks,
        max_required: Ticks,
    ) -> Result<Self, JobError> {
        let jobs = (0..num_jobs)
            .map(|_| Job::random(ids, rng, min_required, max_required))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(jobs))
    }
}
