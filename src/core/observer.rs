use super::{
    event::SimEvent,
    job::{Job, JobKey, Ticks},
};

// Diagnostic trace goes out at info when the caller asked for it, trace otherwise
macro_rules! run_log {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::trace!($($arg)+);
        }
    };
}

/// Watches a single run of the sweep loop: checks the loop invariants after
/// every visit, records the event trace and emits the diagnostic log.
#[derive(Debug)]
pub struct Observer {
    verbose: bool,
    slice_cap: Option<Ticks>,
    clock: Ticks,
    events: Vec<SimEvent>,
}

impl Observer {
    pub fn new(verbose: bool, slice_cap: Option<Ticks>) -> Self {
        Self {
            verbose,
            slice_cap,
            clock: 0,
            events: Vec::new(),
        }
    }

    pub fn scheduled<'a>(&self, order: impl Iterator<Item = &'a Job>) {
        for (position, job) in order.enumerate() {
            run_log!(self.verbose, position, job = %job, "scheduled");
        }
    }

    pub fn before_visit(&self, job: &Job) {
        run_log!(self.verbose, job = %job.progress(), clock = self.clock, "visiting");
    }

    pub fn visit(
        &mut self,
        key: JobKey,
        job: &Job,
        spent: Ticks,
        remaining_before: Ticks,
        clock: Ticks,
    ) {
        debug_assert!(spent > 0, "Visit to {} made no progress", job.label());
        debug_assert!(
            spent <= remaining_before,
            "Visit to {} spent {spent} with only {remaining_before} remaining",
            job.label()
        );
        if let Some(cap) = self.slice_cap {
            debug_assert!(
                spent <= cap,
                "Visit to {} spent {spent}, above the {cap} time slice",
                job.label()
            );
        }
        debug_assert_eq!(
            clock,
            self.clock + spent,
            "Clock must advance by exactly the time spent"
        );

        self.clock = clock;
        self.events.push(SimEvent::Visit {
            job: key,
            spent,
            remaining_before,
            clock,
        });
        run_log!(self.verbose, job = %job.progress(), spent, clock, "visited");
    }

    pub fn completed(&mut self, key: JobKey, job: &Job, turnaround: Ticks) {
        debug_assert_eq!(
            job.turnaround_time(),
            Some(turnaround),
            "Job {} completed without its turnaround stamp",
            job.label()
        );
        self.events.push(SimEvent::Completed {
            job: key,
            turnaround,
        });
        run_log!(self.verbose, job = %job.label(), turnaround, "completed");
    }

    pub fn finish(&self, total_required: Ticks, average_turnaround: f64) {
        debug_assert_eq!(
            self.clock, total_required,
            "Time spent must equal the total time required"
        );
        run_log!(
            self.verbose,
            total_time = self.clock,
            average_turnaround,
            "jobs complete"
        );
    }

    pub fn into_events(self) -> Vec<SimEvent> {
        self.events
    }
}
