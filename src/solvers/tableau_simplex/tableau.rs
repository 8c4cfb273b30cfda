use std::ops::Range;

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::{
    config::{ArtificialPolicy, Elimination},
    problem::{ComparisonOp, LpInstance},
    solver::Error,
};

use super::{counting::Counter, elimination::eliminate};

/// How the initial basis of a [`Tableau`] is set up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableauMode {
    /// Artificial variables start in the basis and the objective row minimizes their sum.
    PhaseOne(ArtificialPolicy),
    /// Slacks start in the basis and the objective row holds the instance's objective.
    /// Every row must be a `<=` row with non-negative right-hand side (after negating rows
    /// with a negative one).
    Direct,
}

/// Dense simplex tableau.
///
/// Columns are laid out as `[original | slack/surplus | artificial | rhs]`. Rows `0..m` are
/// constraints; row `m` holds the reduced costs and, in the rhs column, the negated value of
/// the current objective. For every row `r`, column `basis[r]` is a unit column.
#[derive(Clone, Debug)]
pub struct Tableau {
    cells: Array2<f64>,
    basis: Vec<usize>,
    disabled: Vec<bool>,
    num_vars: usize,
    num_slacks: usize,
    num_artificials: usize,
    rhs_scale: f64,
}

impl Tableau {
    pub fn new(instance: &LpInstance, mode: TableauMode) -> Result<Tableau, Error> {
        instance.validate()?;

        let num_vars = instance.num_vars();
        let rows: Vec<(Vec<f64>, ComparisonOp, f64)> = (0..instance.num_constraints())
            .map(|r| {
                let (mut coeffs, op, rhs) = instance.dense_row(r);
                if rhs < 0.0 {
                    coeffs.iter_mut().for_each(|c| *c = -*c);
                    (coeffs, op.flipped(), -rhs)
                } else {
                    (coeffs, op, rhs)
                }
            })
            .collect();

        if mode == TableauMode::Direct {
            if let Some(row) = rows.iter().position(|(_, op, _)| *op != ComparisonOp::Le) {
                return Err(Error::NoInitialBasis { row });
            }
        }

        let needs_artificial = |op: ComparisonOp| match mode {
            TableauMode::PhaseOne(ArtificialPolicy::Uniform) => true,
            TableauMode::PhaseOne(ArtificialPolicy::Minimal) => op != ComparisonOp::Le,
            TableauMode::Direct => false,
        };

        let num_constraints = rows.len();
        let num_slacks = rows.iter().filter(|(_, op, _)| *op != ComparisonOp::Eq).count();
        let num_artificials = rows.iter().filter(|(_, op, _)| needs_artificial(*op)).count();
        let width = num_vars + num_slacks + num_artificials + 1;
        let rhs_col = width - 1;

        let mut cells = Array2::zeros((num_constraints + 1, width));
        let mut basis = Vec::with_capacity(num_constraints);
        let mut next_slack = num_vars;
        let mut next_artificial = num_vars + num_slacks;
        for (r, (coeffs, op, rhs)) in rows.iter().enumerate() {
            for (c, &coeff) in coeffs.iter().enumerate() {
                cells[[r, c]] = coeff;
            }
            cells[[r, rhs_col]] = *rhs;

            let slack = match op {
                ComparisonOp::Le => Some(1.0),
                ComparisonOp::Ge => Some(-1.0),
                ComparisonOp::Eq => None,
            }
            .map(|sign| {
                cells[[r, next_slack]] = sign;
                next_slack += 1;
                (next_slack - 1, sign)
            });

            let basic = if needs_artificial(*op) {
                cells[[r, next_artificial]] = 1.0;
                next_artificial += 1;
                next_artificial - 1
            } else {
                match slack {
                    Some((col, sign)) if sign > 0.0 => col,
                    _ => return Err(Error::NoInitialBasis { row: r }),
                }
            };
            basis.push(basic);
        }

        let rhs_scale = 1.0 + rows.iter().map(|(_, _, rhs)| *rhs).fold(0.0, f64::max);
        let mut tableau = Tableau {
            cells,
            basis,
            disabled: vec![false; width - 1],
            num_vars,
            num_slacks,
            num_artificials,
            rhs_scale,
        };

        let costs = match mode {
            TableauMode::PhaseOne(_) => tableau.phase_one_costs(),
            TableauMode::Direct => tableau.extend_costs(instance.min_obj_coeffs()),
        };
        tableau.set_objective(&costs)?;

        debug!(
            "initialized tableau: mode: {:?}, rows: {}, cols: {}, vars: {}, slacks: {}, artificials: {}",
            mode,
            tableau.rows(),
            tableau.cols(),
            num_vars,
            num_slacks,
            num_artificials,
        );

        Ok(tableau)
    }

    /// Number of constraint rows.
    pub fn rows(&self) -> usize {
        self.basis.len()
    }

    /// Number of variable columns, not counting the rhs column.
    pub fn cols(&self) -> usize {
        self.cells.ncols() - 1
    }

    pub fn rhs_col(&self) -> usize {
        self.cells.ncols() - 1
    }

    /// The full `(rows + 1) x (cols + 1)` matrix, objective row last.
    pub fn cells(&self) -> ArrayView2<'_, f64> {
        self.cells.view()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[[row, col]]
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.cells[[row, self.rhs_col()]]
    }

    /// Reduced costs followed by the negated objective value.
    pub fn objective_row(&self) -> ArrayView1<'_, f64> {
        self.cells.row(self.rows())
    }

    pub fn reduced_cost(&self, col: usize) -> f64 {
        self.cells[[self.rows(), col]]
    }

    /// Value of the objective the objective row currently encodes (minimization form).
    pub fn objective_value(&self) -> f64 {
        -self.cells[[self.rows(), self.rhs_col()]]
    }

    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn num_slacks(&self) -> usize {
        self.num_slacks
    }

    pub fn artificial_cols(&self) -> Range<usize> {
        let start = self.num_vars + self.num_slacks;
        start..(start + self.num_artificials)
    }

    pub fn is_artificial(&self, col: usize) -> bool {
        self.artificial_cols().contains(&col)
    }

    /// Whether `col` is excluded from entering the basis.
    pub fn is_disabled(&self, col: usize) -> bool {
        self.disabled[col]
    }

    pub fn disable(&mut self, col: usize) {
        self.disabled[col] = true;
    }

    /// `1 + max(rhs)` of the initial tableau; used to scale feasibility tolerances.
    pub fn rhs_scale(&self) -> f64 {
        self.rhs_scale
    }

    /// Cost vector over all columns that is 1 on artificial variables and 0 elsewhere.
    pub fn phase_one_costs(&self) -> Vec<f64> {
        let mut costs = vec![0.0; self.cols()];
        for col in self.artificial_cols() {
            costs[col] = 1.0;
        }
        costs
    }

    /// Pads the original objective with zero costs for slack and artificial columns.
    pub fn extend_costs(&self, obj_coeffs: &[f64]) -> Vec<f64> {
        let mut costs = obj_coeffs.to_vec();
        costs.resize(self.cols(), 0.0);
        costs
    }

    /// Replaces the objective row with the reduced costs of `costs` against the current basis.
    pub fn set_objective(&mut self, costs: &[f64]) -> Result<(), Error> {
        if costs.len() != self.cols() {
            return Err(Error::MalformedInstance(format!(
                "expected {} costs, got {}",
                self.cols(),
                costs.len()
            )));
        }

        let mut objective = Array1::zeros(self.cells.ncols());
        for (c, &cost) in costs.iter().enumerate() {
            objective[c] = cost;
        }
        for (r, &var) in self.basis.iter().enumerate() {
            let basic_cost = costs[var];
            if basic_cost != 0.0 {
                objective.scaled_add(-basic_cost, &self.cells.row(r));
            }
        }
        let obj_row = self.rows();
        self.cells.row_mut(obj_row).assign(&objective);
        Ok(())
    }

    /// Exchanges the basic variable of `row` for `col` by Gauss-Jordan elimination.
    pub fn apply_pivot(
        &mut self,
        row: usize,
        col: usize,
        elimination: Elimination,
        eps: f64,
        counter: &mut dyn Counter,
    ) -> Result<(), Error> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::InvariantViolation(format!(
                "pivot ({}, {}) outside of a {}x{} tableau",
                row,
                col,
                self.rows(),
                self.cols()
            )));
        }
        eliminate(&mut self.cells, row, col, elimination, eps, counter)?;
        self.basis[row] = col;
        Ok(())
    }

    /// Values of all variables in the current basic solution.
    pub fn basic_solution(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.cols()];
        for (r, &var) in self.basis.iter().enumerate() {
            values[var] = self.rhs(r);
        }
        values
    }

    /// Checks that every basic column is a unit column, objective row included.
    pub fn check_unit_basis(&self, eps: f64) -> Result<(), Error> {
        for (r, &var) in self.basis.iter().enumerate() {
            for (i, &val) in self.cells.column(var).iter().enumerate() {
                let expected = if i == r { 1.0 } else { 0.0 };
                if (val - expected).abs() > eps {
                    return Err(Error::InvariantViolation(format!(
                        "basic column {} of row {} has {} in row {}",
                        var, r, val, i
                    )));
                }
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        cells: Array2<f64>,
        basis: Vec<usize>,
        num_vars: usize,
        num_slacks: usize,
    ) -> Tableau {
        let cols = cells.ncols() - 1;
        Tableau {
            num_artificials: cols - num_vars - num_slacks,
            disabled: vec![false; cols],
            cells,
            basis,
            num_vars,
            num_slacks,
            rhs_scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::{
        problem::OptimizationDirection::*, solvers::tableau_simplex::counting::NoCount,
    };

    fn small_instance() -> LpInstance {
        LpInstance::from_dense_with_ops(
            Maximize,
            &[3.0, 2.0],
            &[vec![1.0, 1.0], vec![1.0, -1.0], vec![1.0, 0.0]],
            &[ComparisonOp::Le, ComparisonOp::Ge, ComparisonOp::Eq],
            &[4.0, -2.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn direct_setup() {
        let instance = LpInstance::from_dense(Maximize, &[3.0, 2.0], &[vec![1.0, 1.0], vec![2.0, 1.0]], &[4.0, 5.0])
            .unwrap();
        let tableau = Tableau::new(&instance, TableauMode::Direct).unwrap();
        assert_eq!(tableau.rows(), 2);
        assert_eq!(tableau.cols(), 4);
        assert_eq!(tableau.basis(), &[2, 3]);
        assert_eq!(
            tableau.cells(),
            array![
                [1.0, 1.0, 1.0, 0.0, 4.0],
                [2.0, 1.0, 0.0, 1.0, 5.0],
                [-3.0, -2.0, 0.0, 0.0, 0.0],
            ]
        );
        assert_eq!(tableau.artificial_cols(), 4..4);
        tableau.check_unit_basis(1e-12).unwrap();
    }

    #[test]
    fn phase_one_uniform_setup() {
        let tableau = Tableau::new(&small_instance(), TableauMode::PhaseOne(ArtificialPolicy::Uniform)).unwrap();
        // x + y <= 4 | -x + y <= 2 (negated >=) | x == 1
        assert_eq!(tableau.cols(), 2 + 2 + 3);
        assert_eq!(tableau.basis(), &[4, 5, 6]);
        assert_eq!(
            tableau.cells(),
            array![
                [1.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 4.0],
                [-1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 2.0],
                [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0],
                [-1.0, -2.0, -1.0, -1.0, 0.0, 0.0, 0.0, -7.0],
            ]
        );
        assert_eq!(tableau.objective_value(), 7.0);
        tableau.check_unit_basis(1e-12).unwrap();
    }

    #[test]
    fn phase_one_minimal_setup() {
        let tableau = Tableau::new(&small_instance(), TableauMode::PhaseOne(ArtificialPolicy::Minimal)).unwrap();
        assert_eq!(tableau.cols(), 2 + 2 + 1);
        assert_eq!(tableau.basis(), &[2, 3, 4]);
        assert!(tableau.is_artificial(4));
        assert!(!tableau.is_artificial(3));
        assert_eq!(tableau.objective_value(), 1.0);
        tableau.check_unit_basis(1e-12).unwrap();
    }

    #[test]
    fn direct_setup_needs_slacks() {
        let res = Tableau::new(&small_instance(), TableauMode::Direct);
        assert_eq!(res.err(), Some(Error::NoInitialBasis { row: 2 }));
    }

    #[test]
    fn set_objective_against_basis() {
        let instance = LpInstance::from_dense(Maximize, &[3.0, 2.0], &[vec![1.0, 1.0], vec![2.0, 1.0]], &[4.0, 5.0])
            .unwrap();
        let mut tableau = Tableau::new(&instance, TableauMode::Direct).unwrap();
        tableau.apply_pivot(1, 0, Elimination::Dense, 1e-9, &mut NoCount).unwrap();
        assert_eq!(tableau.basis(), &[2, 0]);

        let costs = tableau.extend_costs(&[-3.0, -2.0]);
        let before = tableau.objective_row().to_owned();
        tableau.set_objective(&costs).unwrap();
        assert_eq!(tableau.objective_row(), before);
        assert_eq!(tableau.objective_value(), -7.5);
        assert_eq!(tableau.basic_solution(), vec![2.5, 0.0, 1.5, 0.0]);

        assert!(tableau.set_objective(&[1.0]).is_err());
    }

    #[test]
    fn pivot_out_of_range() {
        let instance = LpInstance::from_dense(Maximize, &[1.0], &[vec![1.0]], &[1.0]).unwrap();
        let mut tableau = Tableau::new(&instance, TableauMode::Direct).unwrap();
        let res = tableau.apply_pivot(1, 0, Elimination::Dense, 1e-9, &mut NoCount);
        assert!(matches!(res, Err(Error::InvariantViolation(_))));
    }
}
