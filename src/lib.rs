//! Two-phase tableau Simplex with Dantzig's pivoting rule.
//!
//! The solver works on a dense tableau, picks the entering column with the most
//! negative reduced cost and the leaving row with the min-ratio test. An
//! instrumented variant runs the very same pivot loop and records operation
//! counts for every iteration.

pub mod batch;
pub mod config;
pub mod consts;
pub mod datatype;
pub mod helpers;
pub mod problem;
pub mod solution;
pub mod solver;
pub mod solvers;

pub use config::{ArtificialPolicy, Elimination, SolverConfig, TieBreak};
pub use problem::{ComparisonOp, LinearExpr, LpInstance, OptimizationDirection, Variable};
pub use solution::{Outcome, Phase, PivotStep, SolveResult, Solution};
pub use solver::{Error, Solver, SolverTryNew};
pub use solvers::tableau_simplex::instrumented::{InstrumentedResult, InstrumentedSolver};
pub use solvers::tableau_simplex::TableauSimplex;
