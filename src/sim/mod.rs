pub mod driver;
pub mod workload;

pub use driver::{Comparison, Sweep, SweepError, SweepRow};
pub use workload::UniformSource;
