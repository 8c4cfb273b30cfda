use log::debug;
use serde::Serialize;

use crate::{
    config::SolverConfig,
    problem::LpInstance,
    solution::{Phase, PivotStep, SolveResult},
    solver::{Error, Solver, SolverTryNew},
};

use super::{
    counting::{Counter, OpCounts},
    tableau::Tableau,
    TableauSimplex,
};

/// Operation counts attributed to one pivot: the selection scans that chose it and the
/// elimination that applied it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IterationRecord {
    /// 1-based pivot number.
    pub iteration: usize,
    pub phase: Phase,
    pub entering: usize,
    pub leaving: usize,
    pub counts: OpCounts,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstrumentedResult {
    pub result: SolveResult,
    /// One record per pivot, in execution order.
    pub records: Vec<IterationRecord>,
    /// Scans that did not lead to a pivot: the final optimality or unboundedness check of
    /// each phase, and drive-out scans of redundant rows.
    pub unattributed: OpCounts,
}

impl InstrumentedResult {
    pub fn totals(&self) -> OpCounts {
        let mut totals: OpCounts = self.records.iter().map(|r| r.counts).sum();
        totals += self.unattributed;
        totals
    }
}

#[derive(Debug, Default)]
struct Recorder {
    current: OpCounts,
    records: Vec<IterationRecord>,
    unattributed: OpCounts,
}

impl Counter for Recorder {
    fn columns_scanned(&mut self, n: u64) {
        self.current.columns_scanned(n);
    }

    fn rows_scanned(&mut self, n: u64) {
        self.current.rows_scanned(n);
    }

    fn comparisons(&mut self, n: u64) {
        self.current.comparisons(n);
    }

    fn arithmetic(&mut self, n: u64) {
        self.current.arithmetic(n);
    }

    fn cell_updates(&mut self, n: u64) {
        self.current.cell_updates(n);
    }

    fn row_operations(&mut self, n: u64) {
        self.current.row_operations(n);
    }

    fn accesses(&mut self, n: u64) {
        self.current.accesses(n);
    }

    fn pivot_done(&mut self, step: PivotStep) {
        self.records.push(IterationRecord {
            iteration: self.records.len() + 1,
            phase: step.phase,
            entering: step.col,
            leaving: step.row,
            counts: std::mem::take(&mut self.current),
        });
    }

    fn no_pivot(&mut self) {
        self.unattributed += std::mem::take(&mut self.current);
    }

    fn phase_done(&mut self, _phase: Phase) {
        self.unattributed += std::mem::take(&mut self.current);
    }
}

/// Runs [`TableauSimplex`] while recording per-pivot operation counts.
///
/// The wrapped solver executes exactly the same pivot loop as an uninstrumented solve, so
/// the chosen pivots and numeric results are identical.
#[derive(Debug)]
pub struct InstrumentedSolver {
    inner: TableauSimplex,
    result: Option<InstrumentedResult>,
}

impl SolverTryNew<InstrumentedSolver> for InstrumentedSolver {
    fn try_new(instance: &LpInstance) -> Result<InstrumentedSolver, Error> {
        InstrumentedSolver::with_config(instance, SolverConfig::default())
    }
}

impl Solver for InstrumentedSolver {
    type Output = InstrumentedResult;

    fn solve(&mut self) -> Result<InstrumentedResult, Error> {
        if let Some(result) = &self.result {
            return Ok(result.clone());
        }

        let mut recorder = Recorder::default();
        let result = self.inner.run(&mut recorder)?;

        let instrumented = InstrumentedResult {
            result,
            records: recorder.records,
            unattributed: recorder.unattributed,
        };
        debug!("operation counts: {:?}", instrumented.totals());

        self.result = Some(instrumented.clone());
        Ok(instrumented)
    }
}

impl InstrumentedSolver {
    pub fn with_config(instance: &LpInstance, config: SolverConfig) -> Result<InstrumentedSolver, Error> {
        Ok(InstrumentedSolver {
            inner: TableauSimplex::with_config(instance, config)?,
            result: None,
        })
    }

    pub fn tableau(&self) -> &Tableau {
        self.inner.tableau()
    }
}
