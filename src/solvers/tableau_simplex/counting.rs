use std::ops::AddAssign;

use serde::Serialize;

use crate::solution::{Phase, PivotStep};

/// Receives operation counts from the pivot loop.
///
/// Selection and elimination report every scan, comparison and cell update here. The
/// plain solver passes [`NoCount`], so both solver variants execute identical code.
pub trait Counter {
    fn columns_scanned(&mut self, _n: u64) {}
    fn rows_scanned(&mut self, _n: u64) {}
    fn comparisons(&mut self, _n: u64) {}
    fn arithmetic(&mut self, _n: u64) {}
    fn cell_updates(&mut self, _n: u64) {}
    fn row_operations(&mut self, _n: u64) {}
    fn accesses(&mut self, _n: u64) {}

    /// Called once a pivot has been applied to the tableau.
    fn pivot_done(&mut self, _step: PivotStep) {}

    /// Called when a scan ends without a pivot: a terminal selection, or a drive-out
    /// scan of a redundant row.
    fn no_pivot(&mut self) {}

    /// Called when a phase stops selecting pivots.
    fn phase_done(&mut self, _phase: Phase) {}
}

#[derive(Debug, Default)]
pub struct NoCount;

impl Counter for NoCount {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OpCounts {
    /// Columns examined while looking for the entering variable.
    pub columns_scanned: u64,
    /// Rows examined by the ratio test.
    pub rows_scanned: u64,
    pub comparisons: u64,
    /// Divisions, multiplications and subtractions.
    pub arithmetic: u64,
    /// Tableau cells written by elimination.
    pub cell_updates: u64,
    /// Rows normalized or eliminated.
    pub row_operations: u64,
    /// Tableau cells read.
    pub accesses: u64,
}

impl Counter for OpCounts {
    fn columns_scanned(&mut self, n: u64) {
        self.columns_scanned += n;
    }

    fn rows_scanned(&mut self, n: u64) {
        self.rows_scanned += n;
    }

    fn comparisons(&mut self, n: u64) {
        self.comparisons += n;
    }

    fn arithmetic(&mut self, n: u64) {
        self.arithmetic += n;
    }

    fn cell_updates(&mut self, n: u64) {
        self.cell_updates += n;
    }

    fn row_operations(&mut self, n: u64) {
        self.row_operations += n;
    }

    fn accesses(&mut self, n: u64) {
        self.accesses += n;
    }
}

impl AddAssign for OpCounts {
    fn add_assign(&mut self, other: OpCounts) {
        self.columns_scanned += other.columns_scanned;
        self.rows_scanned += other.rows_scanned;
        self.comparisons += other.comparisons;
        self.arithmetic += other.arithmetic;
        self.cell_updates += other.cell_updates;
        self.row_operations += other.row_operations;
        self.accesses += other.accesses;
    }
}

impl std::iter::Sum for OpCounts {
    fn sum<I: Iterator<Item = OpCounts>>(iter: I) -> Self {
        let mut total = OpCounts::default();
        for counts in iter {
            total += counts;
        }
        total
    }
}
