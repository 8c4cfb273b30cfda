use crate::{solution::Phase, solver::Error};

use super::{pivot::PivotChoice, tableau::Tableau};

/// What the pivot loop should do next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    Pivot { row: usize, col: usize },
    /// Phase 1 reached objective zero; the basis is feasible for the original constraints.
    FeasibleBasis,
    /// Phase 1 optimum is strictly positive.
    Infeasible { phase_one_objective: f64 },
    /// Phase 2 optimum.
    Optimal,
    Unbounded { col: usize },
    IterationLimit,
}

#[derive(Clone, Copy, Debug)]
pub struct TerminationDetector {
    max_iterations: usize,
    eps: f64,
}

impl TerminationDetector {
    pub fn new(max_iterations: usize, eps: f64) -> Self {
        TerminationDetector {
            max_iterations,
            eps,
        }
    }

    pub fn inspect(
        &self,
        tableau: &Tableau,
        phase: Phase,
        choice: PivotChoice,
        pivots_done: usize,
    ) -> Result<Verdict, Error> {
        let verdict = match (phase, choice) {
            (_, PivotChoice::Pivot { .. }) if pivots_done >= self.max_iterations => {
                Verdict::IterationLimit
            }
            (_, PivotChoice::Pivot { row, col }) => Verdict::Pivot { row, col },
            (Phase::PhaseOne, PivotChoice::Optimal) => {
                let phase_one_objective = tableau.objective_value();
                if phase_one_objective > self.eps * tableau.rhs_scale() {
                    Verdict::Infeasible {
                        phase_one_objective,
                    }
                } else {
                    Verdict::FeasibleBasis
                }
            }
            (Phase::PhaseOne, PivotChoice::Unbounded { col }) => {
                // The sum of artificial variables is bounded below by zero.
                return Err(Error::InvariantViolation(format!(
                    "phase one objective unbounded along column {}",
                    col
                )));
            }
            (Phase::PhaseTwo, PivotChoice::Optimal) => Verdict::Optimal,
            (Phase::PhaseTwo, PivotChoice::Unbounded { col }) => Verdict::Unbounded { col },
        };
        Ok(verdict)
    }
}
