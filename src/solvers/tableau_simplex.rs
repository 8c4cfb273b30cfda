pub mod counting;
mod elimination;
pub mod instrumented;
pub mod pivot;
pub mod tableau;
pub mod termination;

use log::{debug, trace};
use stopwatch::Stopwatch;

use crate::{
    config::SolverConfig,
    problem::{LpInstance, OptimizationDirection},
    solution::{Outcome, Phase, PivotStep, SolveResult, Solution},
    solver::{Error, Solver, SolverTryNew},
};

use self::{
    counting::{Counter, NoCount},
    pivot::{dantzig::Dantzig, PivotChooser},
    tableau::{Tableau, TableauMode},
    termination::{TerminationDetector, Verdict},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    PhaseOne,
    PhaseTwo,
    Done,
}

/// Two-phase tableau Simplex.
///
/// Phase 1 minimizes the sum of artificial variables. Once it reaches zero the artificial
/// columns are disabled, the objective row is rebuilt from the instance's costs and Phase 2
/// optimizes from the feasible basis. Instances that need no artificial variable start in
/// Phase 2 directly.
#[derive(Debug)]
pub struct TableauSimplex {
    config: SolverConfig,
    direction: OptimizationDirection,
    num_vars: usize,
    costs: Vec<f64>,
    tableau: Tableau,
    chooser: Dantzig,
    detector: TerminationDetector,
    state: State,
    steps: Vec<PivotStep>,
    phase_one_pivots: usize,
    result: Option<SolveResult>,
}

impl SolverTryNew<TableauSimplex> for TableauSimplex {
    fn try_new(instance: &LpInstance) -> Result<TableauSimplex, Error> {
        TableauSimplex::with_config(instance, SolverConfig::default())
    }
}

impl Solver for TableauSimplex {
    type Output = SolveResult;

    fn solve(&mut self) -> Result<SolveResult, Error> {
        self.run(&mut NoCount)
    }
}

impl TableauSimplex {
    pub fn with_config(instance: &LpInstance, config: SolverConfig) -> Result<TableauSimplex, Error> {
        let mut tableau = Tableau::new(instance, TableauMode::PhaseOne(config.artificials))?;
        let costs = tableau.extend_costs(instance.min_obj_coeffs());

        let state = if tableau.artificial_cols().is_empty() {
            tableau.set_objective(&costs)?;
            State::PhaseTwo
        } else {
            State::PhaseOne
        };

        debug!(
            "initialized solver: vars: {}, constraints: {}, artificials: {}, starting in {:?}, config: {:?}",
            instance.num_vars(),
            instance.num_constraints(),
            tableau.artificial_cols().len(),
            state,
            config,
        );

        Ok(TableauSimplex {
            chooser: Dantzig::new(config.tie_break, config.eps),
            detector: TerminationDetector::new(config.max_iterations, config.eps),
            config,
            direction: instance.direction(),
            num_vars: instance.num_vars(),
            costs,
            tableau,
            state,
            steps: vec![],
            phase_one_pivots: 0,
            result: None,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    /// Runs the state machine to completion, reporting every operation to `counter`.
    ///
    /// Once finished, further calls return the same result without touching the tableau.
    pub(crate) fn run(&mut self, counter: &mut dyn Counter) -> Result<SolveResult, Error> {
        if let Some(result) = &self.result {
            return Ok(result.clone());
        }

        let stopwatch = Stopwatch::start_new();
        let limit = self.config.max_iterations;

        let outcome = loop {
            match self.state {
                State::PhaseOne => {
                    let outcome = match self.run_phase(Phase::PhaseOne, counter)? {
                        Verdict::FeasibleBasis => {
                            if self.start_phase_two(counter)? {
                                None
                            } else {
                                Some(Outcome::IterationLimitExceeded { limit })
                            }
                        }
                        Verdict::Infeasible {
                            phase_one_objective,
                        } => Some(Outcome::Infeasible {
                            phase_one_objective,
                        }),
                        Verdict::IterationLimit => Some(Outcome::IterationLimitExceeded { limit }),
                        verdict => return Err(unexpected(Phase::PhaseOne, verdict)),
                    };
                    counter.phase_done(Phase::PhaseOne);
                    if let Some(outcome) = outcome {
                        break outcome;
                    }
                }
                State::PhaseTwo => {
                    let outcome = match self.run_phase(Phase::PhaseTwo, counter)? {
                        Verdict::Optimal => Outcome::Optimal(self.read_solution()),
                        Verdict::Unbounded { col } => Outcome::Unbounded { entering: col },
                        Verdict::IterationLimit => Outcome::IterationLimitExceeded { limit },
                        verdict => return Err(unexpected(Phase::PhaseTwo, verdict)),
                    };
                    counter.phase_done(Phase::PhaseTwo);
                    break outcome;
                }
                State::Done => {
                    return Err(Error::InvariantViolation(
                        "solver finished without a result".to_string(),
                    ))
                }
            }
        };
        self.state = State::Done;

        debug!(
            "finished after {} pivots ({} in phase one) in {} ms: {:?}",
            self.steps.len(),
            self.phase_one_pivots,
            stopwatch.elapsed_ms(),
            outcome,
        );

        let result = SolveResult {
            outcome,
            pivots: self.steps.len(),
            phase_one_pivots: self.phase_one_pivots,
            steps: self.steps.clone(),
        };
        self.result = Some(result.clone());
        Ok(result)
    }

    /// Pivots until the termination detector reports anything but a pivot.
    fn run_phase(&mut self, phase: Phase, counter: &mut dyn Counter) -> Result<Verdict, Error> {
        loop {
            let choice = self.chooser.choose_pivot(&self.tableau, counter);
            match self.detector.inspect(&self.tableau, phase, choice, self.steps.len())? {
                Verdict::Pivot { row, col } => self.pivot(phase, row, col, counter)?,
                verdict => {
                    counter.no_pivot();
                    return Ok(verdict);
                }
            }
        }
    }

    fn pivot(
        &mut self,
        phase: Phase,
        row: usize,
        col: usize,
        counter: &mut dyn Counter,
    ) -> Result<(), Error> {
        let leaving = self.tableau.basis()[row];
        self.tableau
            .apply_pivot(row, col, self.config.elimination, self.config.eps, counter)?;

        let step = PivotStep { phase, row, col };
        trace!(
            "pivot {}: {:?}, column {} enters, column {} leaves, obj.: {}",
            self.steps.len() + 1,
            phase,
            col,
            leaving,
            self.tableau.objective_value(),
        );
        self.steps.push(step);
        if phase == Phase::PhaseOne {
            self.phase_one_pivots += 1;
        }
        counter.pivot_done(step);
        Ok(())
    }

    /// Moves from a zero-objective Phase 1 tableau to Phase 2. Returns `false` if the
    /// iteration cap was hit while driving artificial variables out of the basis.
    fn start_phase_two(&mut self, counter: &mut dyn Counter) -> Result<bool, Error> {
        if !self.drive_out_artificials(counter)? {
            return Ok(false);
        }

        for col in self.tableau.artificial_cols() {
            self.tableau.disable(col);
        }
        self.tableau.set_objective(&self.costs)?;
        self.tableau.check_unit_basis(self.config.eps)?;
        self.state = State::PhaseTwo;

        debug!(
            "feasible basis after {} pivots, phase two obj.: {}",
            self.phase_one_pivots,
            self.tableau.objective_value(),
        );
        Ok(true)
    }

    /// Replaces artificial variables that are still basic (at zero level) by any
    /// non-artificial column with a non-zero entry in their row. Rows without such a column
    /// are redundant and keep their artificial variable at zero.
    fn drive_out_artificials(&mut self, counter: &mut dyn Counter) -> Result<bool, Error> {
        let eps = self.config.eps;
        let first_artificial = self.tableau.artificial_cols().start;

        for row in 0..self.tableau.rows() {
            let basic = self.tableau.basis()[row];
            if !self.tableau.is_artificial(basic) {
                continue;
            }

            let tableau = &self.tableau;
            let replacement = (0..first_artificial).find(|&col| {
                counter.columns_scanned(1);
                counter.accesses(1);
                counter.comparisons(1);
                tableau.get(row, col).abs() > eps
            });

            match replacement {
                Some(_) if self.steps.len() >= self.config.max_iterations => return Ok(false),
                Some(col) => self.pivot(Phase::PhaseOne, row, col, counter)?,
                None => {
                    debug!(
                        "row {} is redundant, artificial column {} stays basic at zero",
                        row, basic
                    );
                    counter.no_pivot();
                }
            }
        }
        Ok(true)
    }

    fn read_solution(&self) -> Solution {
        let mut values = self.tableau.basic_solution();
        values.truncate(self.num_vars);
        Solution::new(self.direction, self.tableau.objective_value(), values)
    }
}

fn unexpected(phase: Phase, verdict: Verdict) -> Error {
    Error::InvariantViolation(format!("{:?} ended with {:?}", phase, verdict))
}
