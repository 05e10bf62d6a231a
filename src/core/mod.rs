pub mod driver;
pub mod error;
pub mod event;
pub mod job;
pub mod observer;

pub use driver::{RunReport, SchedCore};
pub use error::{JobError, SchedError};
pub use event::SimEvent;
pub use job::{Job, JobId, JobIdGen, JobKey, Ticks};
