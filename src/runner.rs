use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::errors::BenchError;
use crate::launcher::Launcher;
use crate::types::{Candidate, Invocation};

/// Elapsed seconds with exactly three decimal places.
pub fn format_seconds(elapsed: Duration) -> String {
    format!("{:.3}", elapsed.as_secs_f64())
}

/// Per-case timing samples, kept in the order cases were first recorded.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResultTable {
    rows: Vec<(String, Vec<Duration>)>,
    // case name -> position in `rows`
    index: HashMap<String, usize>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample to `case`, creating its row on first use.
    pub fn record(&mut self, case: &str, elapsed: Duration) {
        match self.index.get(case) {
            Some(&row) => self.rows[row].1.push(elapsed),
            None => {
                self.index.insert(case.to_string(), self.rows.len());
                self.rows.push((case.to_string(), vec![elapsed]));
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Duration])> {
        self.rows.iter().map(|(name, samples)| (name.as_str(), samples.as_slice()))
    }
}

/// What a run produced. `failure` is set when the run stopped early.
#[derive(Debug)]
pub struct RunOutcome {
    pub table: ResultTable,
    pub failure: Option<BenchError>,
}

impl RunOutcome {
    /// Name of the case whose invocation aborted the run.
    pub fn failed_case(&self) -> Option<&str> {
        match &self.failure {
            Some(BenchError::ToolFailed { case, .. }) => Some(case),
            _ => None,
        }
    }
}

/// Builds the invocation list for `candidates`, preserving their order.
pub fn plan(candidates: &[Candidate], tool: &str, interpreter: Option<&str>) -> Vec<Invocation> {
    candidates
        .iter()
        .map(|c| Invocation::new(c, tool, interpreter))
        .collect()
}

pub struct Runner<L> {
    launcher: L,
    repetitions: u32,
}

impl<L: Launcher> Runner<L> {
    pub fn new(launcher: L, repetitions: u32) -> Self {
        Runner {
            launcher,
            repetitions,
        }
    }

    /// Runs every invocation `repetitions` times, in order.
    ///
    /// The first failing invocation stops the run; cases after it are never
    /// started and the table holds only what finished before it.
    /// `on_case` is called once per invocation before its first repetition.
    pub fn run(&self, invocations: &[Invocation], mut on_case: impl FnMut(&Invocation)) -> RunOutcome {
        let mut table = ResultTable::new();

        for invocation in invocations {
            on_case(invocation);

            for rep in 0..self.repetitions {
                let start = Instant::now();
                let result = self.launcher.run(&invocation.program, &invocation.args);
                let elapsed = start.elapsed();

                if let Err(source) = result {
                    log::warn!("case {} failed on repetition {}", invocation.case, rep + 1);
                    return RunOutcome {
                        table,
                        failure: Some(BenchError::ToolFailed {
                            case: invocation.case.clone(),
                            source,
                        }),
                    };
                }

                log::info!(
                    "case {} repetition {}: {}s",
                    invocation.case,
                    rep + 1,
                    format_seconds(elapsed)
                );
                table.record(&invocation.case, elapsed);
            }
        }

        RunOutcome {
            table,
            failure: None,
        }
    }
}
