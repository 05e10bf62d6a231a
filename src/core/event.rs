use crate::core::{JobKey, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    // One visit to an incomplete job; `clock` is the total after spending
    Visit {
        job: JobKey,
        spent: Ticks,
        remaining_before: Ticks,
        clock: Ticks,
    },
    Completed {
        job: JobKey,
        turnaround: Ticks,
    },
}
