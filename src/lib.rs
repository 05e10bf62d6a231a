pub mod config;
pub mod core;
pub mod fixture;
pub mod scheduler;
pub mod sim;

pub use crate::core::{Job, JobError, JobIdGen, JobKey, RunReport, SchedError, SimEvent, Ticks};
pub use scheduler::{Policy, Scheduler};
pub use sim::{Comparison, Sweep, SweepRow, UniformSource};
