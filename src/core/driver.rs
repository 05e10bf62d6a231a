use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use super::{
    error::SchedError,
    event::SimEvent,
    job::{Job, JobKey, Ticks},
    observer::Observer,
};
use crate::scheduler::Policy;

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub average_turnaround: f64,
    pub total_time: Ticks,
    pub events: Vec<SimEvent>,
}

/// One processing run over a fixed schedule.
///
/// Every policy runs through the same sweep; they differ only in the order of
/// the schedule and in how much time a single visit may spend.
pub struct SchedCore<'a> {
    jobs: &'a mut SlotMap<JobKey, Job>,
    policy: Policy,
    clock: Ticks,
    completed: FxHashSet<JobKey>,
    observer: Observer,
}

impl<'a> SchedCore<'a> {
    pub fn new(jobs: &'a mut SlotMap<JobKey, Job>, policy: Policy, verbose: bool) -> Self {
        Self {
            jobs,
            policy,
            clock: 0,
            completed: FxHashSet::default(),
            observer: Observer::new(verbose, policy.time_slice()),
        }
    }

    /// Runs `schedule` to completion and averages turnaround over `members`.
    ///
    /// The quantum check happens before any job is touched, so a rejected
    /// call leaves every job as it was.
    pub fn run(
        mut self,
        schedule: &[JobKey],
        members: &[JobKey],
    ) -> Result<RunReport, SchedError> {
        if let Policy::RoundRobin { time_slice: 0 } = self.policy {
            return Err(SchedError::InvalidQuantum { time_slice: 0 });
        }
        if members.is_empty() {
            return Err(SchedError::EmptyWorkload);
        }

        for &key in schedule {
            self.jobs[key].reset();
        }
        self.observer.scheduled(schedule.iter().map(|&key| &self.jobs[key]));

        while self.completed.len() != schedule.len() {
            for &key in schedule {
                self.visit(key)?;
            }
        }

        let total_turnaround: Ticks = members
            .iter()
            .map(|&key| self.jobs[key].turnaround_time().unwrap_or(0))
            .sum();
        let average_turnaround = total_turnaround as f64 / members.len() as f64;

        let total_required: Ticks = schedule
            .iter()
            .map(|&key| self.jobs[key].time_required())
            .sum();
        self.observer.finish(total_required, average_turnaround);

        Ok(RunReport {
            average_turnaround,
            total_time: self.clock,
            events: self.observer.into_events(),
        })
    }

    fn visit(&mut self, key: JobKey) -> Result<(), SchedError> {
        let job = &mut self.jobs[key];
        if job.is_complete() {
            return Ok(());
        }

        self.observer.before_visit(job);

        let remaining = job.time_remaining();
        let spent = self.policy.slice_for(remaining);
        job.spend_time(spent)?;
        self.clock += spent;
        self.observer.visit(key, job, spent, remaining, self.clock);

        if job.is_complete() {
            job.set_turnaround_time(self.clock)?;
            self.completed.insert(key);
            self.observer.completed(key, job, self.clock);
        }

        Ok(())
    }
}
