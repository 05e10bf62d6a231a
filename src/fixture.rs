//! Regression fixtures: blocks of jobs with the expected average turnaround
//! under FCFS, SJF, RR(2) and RR(5).
//!
//! ```text
//! # comment
//! BEGIN
//! A 5
//! B 3
//! TURNAROUND 6.5 5.5 7 6.5
//! END
//! ```
//!
//! Values are compared after rounding to three decimal places.

use crate::{
    core::{Job, JobIdGen, SchedError, Ticks},
    scheduler::Scheduler,
    sim::Comparison,
};

const PLACES: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixtureError {
    #[error("line {line}: malformed TURNAROUND, expected four numbers")]
    MalformedTurnaround { line: usize },
    #[error("line {line}: malformed job, expected `<name> <time_required>`")]
    MalformedJob { line: usize },
    #[error("line {line}: block already has a TURNAROUND line")]
    DuplicateTurnaround { line: usize },
    #[error("line {line}: block has no TURNAROUND line")]
    MissingTurnaround { line: usize },
    #[error("line {line}: block has no jobs")]
    EmptyBlock { line: usize },
    #[error("line {line}: END without a matching BEGIN")]
    UnexpectedEnd { line: usize },
    #[error("line {line}: BEGIN without a matching END")]
    UnterminatedBlock { line: usize },
    #[error("line {line}: entry outside of a BEGIN/END block")]
    OutsideBlock { line: usize },
    #[error("fixture contains no cases")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureCase {
    /// Line of the case's BEGIN, 1-based
    pub line: usize,
    pub jobs: Vec<(String, Ticks)>,
    pub expected: Comparison,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    pub actual: Comparison,
    pub expected: Comparison,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.actual.rounded(PLACES) == self.expected
    }
}

impl FixtureCase {
    /// Fresh jobs on a fresh scheduler
    pub fn scheduler(&self, ids: &mut JobIdGen) -> Result<Scheduler, SchedError> {
        let jobs = self
            .jobs
            .iter()
            .map(|(name, required)| Job::new(ids, name.as_str(), *required))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Scheduler::new(jobs))
    }

    pub fn check(&self, ids: &mut JobIdGen) -> Result<CaseOutcome, SchedError> {
        let mut scheduler = self.scheduler(ids)?;
        let actual = Comparison::measure(&mut scheduler, false)?;
        Ok(CaseOutcome {
            actual,
            expected: self.expected,
        })
    }
}

struct OpenBlock {
    line: usize,
    jobs: Vec<(String, Ticks)>,
    expected: Option<Comparison>,
}

pub fn parse(input: &str) -> Result<Vec<FixtureCase>, FixtureError> {
    let mut cases = Vec::new();
    let mut open: Option<OpenBlock> = None;

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let entry = raw.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }

        match entry {
            "BEGIN" => {
                if let Some(block) = &open {
                    return Err(FixtureError::UnterminatedBlock { line: block.line });
                }
                open = Some(OpenBlock {
                    line,
                    jobs: Vec::new(),
                    expected: None,
                });
            }
            "END" => {
                let block = open.take().ok_or(FixtureError::UnexpectedEnd { line })?;
                if block.jobs.is_empty() {
                    return Err(FixtureError::EmptyBlock { line: block.line });
                }
                let expected = block
                    .expected
                    .ok_or(FixtureError::MissingTurnaround { line: block.line })?;
                cases.push(FixtureCase {
                    line: block.line,
                    jobs: block.jobs,
                    expected,
                });
            }
            _ => {
                let block = open.as_mut().ok_or(FixtureError::OutsideBlock { line })?;
                if let Some(values) = entry.strip_prefix("TURNAROUND") {
                    if block.expected.is_some() {
                        return Err(FixtureError::DuplicateTurnaround { line });
                    }
                    block.expected = Some(parse_turnaround(values, line)?);
                } else {
                    block.jobs.push(parse_job(entry, line)?);
                }
            }
        }
    }

    if let Some(block) = open {
        return Err(FixtureError::UnterminatedBlock { line: block.line });
    }
    if cases.is_empty() {
        return Err(FixtureError::Empty);
    }
    Ok(cases)
}

fn parse_turnaround(values: &str, line: usize) -> Result<Comparison, FixtureError> {
    let malformed = || FixtureError::MalformedTurnaround { line };
    let parsed = values
        .split_whitespace()
        .map(|v| v.parse::<f64>().map_err(|_| malformed()))
        .collect::<Result<Vec<_>, _>>()?;

    match parsed[..] {
        [fcfs, sjf, rr2, rr5] => Ok(Comparison {
            fcfs,
            sjf,
            rr2,
            rr5,
        }
        .rounded(PLACES)),
        _ => Err(malformed()),
    }
}

fn parse_job(entry: &str, line: usize) -> Result<(String, Ticks), FixtureError> {
    let mut fields = entry.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(name), Some(required), None) => required
            .parse::<Ticks>()
            .map(|required| (name.to_string(), required))
            .map_err(|_| FixtureError::MalformedJob { line }),
        _ => Err(FixtureError::MalformedJob { line }),
    }
}
