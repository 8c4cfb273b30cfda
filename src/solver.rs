use thiserror::Error;

use crate::problem::LpInstance;

/// A fault that stops a solve.
///
/// Infeasible, unbounded and iteration-capped problems are not errors; they are reported
/// through [`Outcome`](crate::solution::Outcome).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    /// Dimensions or values of the instance are inconsistent.
    #[error("malformed instance: {0}")]
    MalformedInstance(String),
    /// A direct (Phase 2) tableau was requested but row `row` has no slack to start the basis.
    #[error("row {row} has no slack variable to start a basis from")]
    NoInitialBasis { row: usize },
    /// The chosen pivot element is numerically zero.
    #[error("pivot element at row {row}, column {col} is zero ({value:e})")]
    DegeneratePivot { row: usize, col: usize, value: f64 },
    /// Internal state that the algorithm guarantees cannot occur.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

pub trait SolverTryNew<T> {
    fn try_new(instance: &LpInstance) -> Result<T, Error>;
}

pub trait Solver {
    type Output;

    fn solve(&mut self) -> Result<Self::Output, Error>;
}
