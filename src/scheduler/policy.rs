use std::fmt;

use slotmap::SlotMap;

use crate::core::{Job, JobKey, Ticks};

/// How the schedule is ordered and how long one visit may run.
///
/// FCFS and SJF are round-robin with an unbounded slice: a visit always runs
/// the job to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    #[default]
    Fcfs,
    Sjf,
    RoundRobin {
        time_slice: Ticks,
    },
}

impl Policy {
    pub fn time_slice(&self) -> Option<Ticks> {
        match self {
            Self::RoundRobin { time_slice } => Some(*time_slice),
            Self::Fcfs | Self::Sjf => None,
        }
    }

    /// Time a single visit spends on a job with `remaining` time left
    pub fn slice_for(&self, remaining: Ticks) -> Ticks {
        match self {
            Self::RoundRobin { time_slice } => (*time_slice).min(remaining),
            Self::Fcfs | Self::Sjf => remaining,
        }
    }

    /// Rebuilds `schedule` from the insertion order in `members`.
    ///
    /// SJF sorts the existing schedule in place, so ties keep whatever order
    /// the schedule already had; `schedule` must hold the same keys as
    /// `members` on entry.
    pub fn arrange(
        &self,
        jobs: &SlotMap<JobKey, Job>,
        members: &[JobKey],
        schedule: &mut Vec<JobKey>,
    ) {
        match self {
            Self::Fcfs | Self::RoundRobin { .. } => {
                schedule.clear();
                schedule.extend_from_slice(members);
            }
            Self::Sjf => {
                debug_assert_eq!(
                    schedule.len(),
                    members.len(),
                    "Schedule out of sync with jobs"
                );
                schedule.sort_by_key(|&key| jobs[key].time_required());
            }
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::Sjf => write!(f, "SJF"),
            Self::RoundRobin { time_slice } => write!(f, "RR({time_slice})"),
        }
    }
}
