use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_ITERATIONS, EPS};

/// How the leaving row is chosen when several rows attain the minimum ratio.
///
/// Reported pivot counts depend on this choice, so it is part of every experiment's
/// configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TieBreak {
    /// The tied row whose basic variable has the smallest column index.
    #[default]
    LowestBasisIndex,
    /// The tied row with the smallest row index.
    LowestRow,
}

/// How Gauss-Jordan elimination walks the tableau.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Elimination {
    /// Every cell of every row is updated.
    #[default]
    Dense,
    /// Rows with a zero entry in the pivot column are skipped and only non-zero entries of
    /// the pivot row are propagated. Produces the same tableau as `Dense`.
    Sparse,
}

/// Which rows get an artificial variable in Phase 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArtificialPolicy {
    /// One artificial variable per constraint row.
    #[default]
    Uniform,
    /// `<=` rows start with their slack in the basis; only `>=` and `==` rows get an
    /// artificial. Phase 1 is skipped when no artificial is needed.
    Minimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Cap on the total number of pivots over both phases.
    pub max_iterations: usize,
    pub tie_break: TieBreak,
    pub elimination: Elimination,
    pub artificials: ArtificialPolicy,
    /// Entries with absolute value below this are treated as zero.
    pub eps: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tie_break: TieBreak::default(),
            elimination: Elimination::default(),
            artificials: ArtificialPolicy::default(),
            eps: EPS,
        }
    }
}

impl SolverConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_elimination(mut self, elimination: Elimination) -> Self {
        self.elimination = elimination;
        self
    }

    pub fn with_artificials(mut self, artificials: ArtificialPolicy) -> Self {
        self.artificials = artificials;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }
}
