use std::fmt;
use std::hash::{Hash, Hasher};

use slotmap::new_key_type;

use super::error::JobError;

pub type JobId = u64;
pub type Ticks = u64;
new_key_type! {
    /// Handle to a job owned by a `Scheduler`
    pub struct JobKey;
}

/// Hands out job identifiers in creation order. Identifiers are never reused
/// for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct JobIdGen {
    next: JobId,
}

impl JobIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier the next created job will receive
    pub fn peek(&self) -> JobId {
        self.next
    }

    pub fn next_id(&mut self) -> JobId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// A unit of work with a fixed service requirement.
///
/// Progress (`time_elapsed`) and the turnaround stamp are owned by the
/// processing loop; callers only read them.
#[derive(Debug, Clone)]
pub struct Job {
    id: JobId,
    name: String,
    time_required: Ticks,
    time_elapsed: Ticks,
    turnaround_time: Option<Ticks>,
}

impl Job {
    pub fn new(
        ids: &mut JobIdGen,
        name: impl Into<String>,
        time_required: Ticks,
    ) -> Result<Self, JobError> {
        let name = name.into();
        if time_required == 0 {
            return Err(JobError::ZeroRequirement { name });
        }

        Ok(Self {
            id: ids.next_id(),
            name,
            time_required,
            time_elapsed: 0,
            turnaround_time: None,
        })
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time_required(&self) -> Ticks {
        self.time_required
    }

    pub fn time_elapsed(&self) -> Ticks {
        self.time_elapsed
    }

    pub fn time_remaining(&self) -> Ticks {
        self.time_required - self.time_elapsed
    }

    pub fn is_complete(&self) -> bool {
        self.time_remaining() == 0
    }

    /// Completion timestamp of the last run, `None` until stamped
    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.turnaround_time
    }

    /// Clears progress so the job can be scheduled again. Identity and the
    /// requirement are kept.
    pub fn reset(&mut self) {
        self.time_elapsed = 0;
        self.turnaround_time = None;
    }

    pub fn spend_time(&mut self, amount: Ticks) -> Result<(), JobError> {
        let remaining = self.time_remaining();
        if amount > remaining {
            return Err(JobError::Overspend {
                job: self.label(),
                requested: amount,
                remaining,
            });
        }

        self.time_elapsed += amount;
        Ok(())
    }

    /// Records the completion time. The first stamp of a run wins; later calls
    /// on a complete job leave it untouched.
    pub fn set_turnaround_time(&mut self, value: Ticks) -> Result<(), JobError> {
        if !self.is_complete() {
            return Err(JobError::PrematureTurnaround { job: self.label() });
        }

        if self.turnaround_time.is_none() {
            self.turnaround_time = Some(value);
        }
        Ok(())
    }

    /// `name (elapsed/required)`
    pub fn progress(&self) -> String {
        format!(
            "{} ({}/{})",
            self.name, self.time_elapsed, self.time_required
        )
    }

    /// `name#id`, unique per generator
    pub fn label(&self) -> String {
        format!("{}#{}", self.name, self.id)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.time_required)
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Job {}

impl Hash for Job {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn ids_are_sequential() {
        let mut ids = JobIdGen::new();
        let a = Job::new(&mut ids, "A", 5).unwrap();
        let b = Job::new(&mut ids, "B", 3).unwrap();
        assert_eq!(a.id(), 0);
        assert_eq!(b.id(), 1);
        assert_eq!(ids.peek(), 2);
    }

    #[test]
    fn zero_requirement_is_rejected_without_consuming_an_id() {
        let mut ids = JobIdGen::new();
        let err = Job::new(&mut ids, "Z", 0).unwrap_err();
        assert_eq!(err, JobError::ZeroRequirement { name: "Z".into() });
        assert_eq!(ids.peek(), 0);
    }

    #[test]
    fn spend_time_tracks_progress() {
        let mut ids = JobIdGen::new();
        let mut job = Job::new(&mut ids, "A", 5).unwrap();
        job.spend_time(2).unwrap();
        assert_eq!(job.time_elapsed(), 2);
        assert_eq!(job.time_remaining(), 3);
        assert!(!job.is_complete());

        job.spend_time(3).unwrap();
        assert!(job.is_complete());
    }

    #[test]
    fn overspend_leaves_state_untouched() {
        let mut ids = JobIdGen::new();
        let mut job = Job::new(&mut ids, "A", 5).unwrap();
        job.spend_time(4).unwrap();

        let err = job.spend_time(2).unwrap_err();
        assert_eq!(
            err,
            JobError::Overspend {
                job: "A#0".into(),
                requested: 2,
                remaining: 1,
            }
        );
        assert_eq!(job.time_elapsed(), 4);
    }

    #[test]
    fn turnaround_requires_completion() {
        let mut ids = JobIdGen::new();
        let mut job = Job::new(&mut ids, "A", 5).unwrap();
        job.spend_time(1).unwrap();

        assert!(matches!(
            job.set_turnaround_time(7),
            Err(JobError::PrematureTurnaround { .. })
        ));
        assert_eq!(job.turnaround_time(), None);
    }

    #[test]
    fn first_turnaround_stamp_wins() {
        let mut ids = JobIdGen::new();
        let mut job = Job::new(&mut ids, "A", 5).unwrap();
        job.spend_time(5).unwrap();

        job.set_turnaround_time(11).unwrap();
        job.set_turnaround_time(42).unwrap();
        assert_eq!(job.turnaround_time(), Some(11));
    }

    #[test]
    fn reset_keeps_identity() {
        let mut ids = JobIdGen::new();
        let mut job = Job::new(&mut ids, "A", 5).unwrap();
        job.spend_time(5).unwrap();
        job.set_turnaround_time(5).unwrap();

        job.reset();
        assert_eq!(job.time_elapsed(), 0);
        assert_eq!(job.turnaround_time(), None);
        assert_eq!(job.time_required(), 5);
        assert_eq!(job.id(), 0);
    }

    #[test]
    fn equality_uses_name_and_id() {
        let mut ids = JobIdGen::new();
        let a = Job::new(&mut ids, "A", 5).unwrap();
        let mut a_progressed = a.clone();
        a_progressed.spend_time(3).unwrap();
        let other_a = Job::new(&mut ids, "A", 5).unwrap();

        assert_eq!(a, a_progressed);
        assert_ne!(a, other_a);

        let set: FxHashSet<Job> = [a, a_progressed, other_a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_forms() {
        let mut ids = JobIdGen::new();
        let mut job = Job::new(&mut ids, "Job0", 12).unwrap();
        job.spend_time(4).unwrap();
        assert_eq!(job.to_string(), "Job0 (12)");
        assert_eq!(job.progress(), "Job0 (4/12)");
    }
}
