use serde::Serialize;

use crate::problem::{OptimizationDirection, Variable};

/// An optimal vertex of an [`LpInstance`](crate::problem::LpInstance).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Solution {
    direction: OptimizationDirection,
    objective_val: f64,
    optimal_vars: Vec<f64>,
}

impl Solution {
    /// `objective_val` is in minimization form, as kept by the tableau.
    pub fn new(direction: OptimizationDirection, objective_val: f64, optimal_vars: Vec<f64>) -> Self {
        Solution {
            direction,
            objective_val,
            optimal_vars,
        }
    }

    /// Optimal objective value in the direction of the original instance.
    pub fn objective_value(&self) -> f64 {
        match self.direction {
            OptimizationDirection::Minimize => self.objective_val,
            OptimizationDirection::Maximize => -self.objective_val,
        }
    }

    pub fn var_value(&self, var: Variable) -> f64 {
        assert!(var.0 < self.optimal_vars.len());
        self.optimal_vars[var.0]
    }

    pub fn values(&self) -> &[f64] {
        &self.optimal_vars
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// Minimizing the sum of artificial variables.
    PhaseOne,
    /// Optimizing the original objective from a feasible basis.
    PhaseTwo,
}

/// One executed pivot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PivotStep {
    pub phase: Phase,
    pub row: usize,
    pub col: usize,
}

/// How a solve ended.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Outcome {
    Optimal(Solution),
    /// The Phase 1 optimum is strictly positive: no point satisfies the constraints.
    Infeasible { phase_one_objective: f64 },
    /// The objective decreases without bound along column `entering`.
    Unbounded { entering: usize },
    /// The pivot cap was reached before either phase finished.
    IterationLimitExceeded { limit: usize },
}

impl Outcome {
    pub fn is_optimal(&self) -> bool {
        matches!(self, Outcome::Optimal(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Optimal(solution) => Some(solution),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolveResult {
    pub outcome: Outcome,
    /// Total pivots over both phases.
    pub pivots: usize,
    pub phase_one_pivots: usize,
    /// Every pivot in execution order.
    pub steps: Vec<PivotStep>,
}

impl SolveResult {
    pub fn objective_value(&self) -> Option<f64> {
        self.outcome.solution().map(Solution::objective_value)
    }
}
