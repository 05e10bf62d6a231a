pub mod policy;

use slotmap::SlotMap;

use crate::core::{Job, JobKey, RunReport, SchedCore, SchedError, Ticks};
pub use policy::Policy;

/// Owns a workload and runs it under one ordering policy at a time.
///
/// `jobs` keeps insertion order and is the source of truth; `schedule` is the
/// sweep order derived from it by the active policy. The schedule only
/// changes through the `order_*` methods and `add_job`.
#[derive(Debug, Default)]
pub struct Scheduler {
    arena: SlotMap<JobKey, Job>,
    jobs: Vec<JobKey>,
    schedule: Vec<JobKey>,
    policy: Policy,
}

impl Scheduler {
    /// Schedule starts as the given order under FCFS
    pub fn new(jobs: impl IntoIterator<Item = Job>) -> Self {
        let mut arena = SlotMap::with_key();
        let jobs: Vec<JobKey> = jobs.into_iter().map(|job| arena.insert(job)).collect();
        Self {
            arena,
            schedule: jobs.clone(),
            jobs,
            policy: Policy::Fcfs,
        }
    }

    /// Appends a job and re-applies the active policy.
    pub fn add_job(&mut self, job: Job) -> JobKey {
        let key = self.arena.insert(job);
        self.jobs.push(key);
        self.schedule.push(key);
        self.policy.arrange(&self.arena, &self.jobs, &mut self.schedule);
        key
    }

    pub fn order_first_come_first_serve(&mut self) -> &mut Self {
        self.apply(Policy::Fcfs)
    }

    pub fn order_shortest_job_first(&mut self) -> &mut Self {
        self.apply(Policy::Sjf)
    }

    /// The slice is not checked here; `process` rejects a zero slice.
    pub fn order_round_robin(&mut self, time_slice: Ticks) -> &mut Self {
        self.apply(Policy::RoundRobin { time_slice })
    }

    fn apply(&mut self, policy: Policy) -> &mut Self {
        policy.arrange(&self.arena, &self.jobs, &mut self.schedule);
        self.policy = policy;
        self
    }

    /// Runs every job to completion and returns the average turnaround time.
    ///
    /// Jobs are reset first, so repeated calls under different policies do
    /// not affect each other. `log` promotes the run trace to `info`.
    pub fn process(&mut self, log: bool) -> Result<f64, SchedError> {
        self.process_report(log).map(|report| report.average_turnaround)
    }

    pub fn process_report(&mut self, log: bool) -> Result<RunReport, SchedError> {
        SchedCore::new(&mut self.arena, self.policy, log).run(&self.schedule, &self.jobs)
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn time_slice(&self) -> Option<Ticks> {
        self.policy.time_slice()
    }

    pub fn job(&self, key: JobKey) -> Option<&Job> {
        self.arena.get(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> &[JobKey] {
        &self.jobs
    }

    /// Jobs in insertion order
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().map(|&key| &self.arena[key])
    }

    /// Jobs in the order the next `process` will sweep them
    pub fn schedule(&self) -> impl Iterator<Item = &Job> {
        self.schedule.iter().map(|&key| &self.arena[key])
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
