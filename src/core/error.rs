use super::job::Ticks;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("job {name} must require a positive amount of time")]
    ZeroRequirement { name: String },

    #[error("required time bounds {min}..={max} are empty")]
    InvalidBounds { min: Ticks, max: Ticks },

    // Unreachable from a correct sweep; the slice is always clamped to the remaining time
    #[error("cannot spend {requested} on job {job}: only {remaining} remaining")]
    Overspend {
        job: String,
        requested: Ticks,
        remaining: Ticks,
    },

    #[error("job {job} is not complete; turnaround time cannot be recorded")]
    PrematureTurnaround { job: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedError {
    #[error(transparent)]
    Job(#[from] JobError),

    #[error("round-robin ordering requires a positive time slice (got {time_slice})")]
    InvalidQuantum { time_slice: Ticks },

    #[error("cannot average turnaround over an empty workload")]
    EmptyWorkload,
}
