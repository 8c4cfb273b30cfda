use serde::{Deserialize, Serialize};

use crate::{datatype::CsVec, helpers::helpers::to_dense, solver::Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationDirection {
    /// Minimize the objective function.
    Minimize,
    /// Maximize the objective function.
    Maximize,
}

/// A reference to a decision variable of an [`LpInstance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(pub(crate) usize);

impl Variable {
    /// Column of the variable in the constraint matrix.
    pub fn idx(&self) -> usize {
        self.0
    }
}

/// Left-hand side of a constraint: a sum of `coeff * variable` terms.
#[derive(Clone, Debug, Default)]
pub struct LinearExpr {
    terms: Vec<(usize, f64)>,
}

impl LinearExpr {
    pub fn empty() -> Self {
        Self { terms: vec![] }
    }

    /// Add a single term. Terms may come in any order, but a variable may appear only once
    /// ([`LpInstance::add_constraint`] rejects duplicates).
    pub fn add(&mut self, var: Variable, coeff: f64) {
        self.terms.push((var.0, coeff));
    }
}

impl<'a, I: IntoIterator<Item = &'a (Variable, f64)>> From<I> for LinearExpr {
    fn from(iter: I) -> Self {
        let mut expr = LinearExpr::empty();
        for &(var, coeff) in iter {
            expr.add(var, coeff);
        }
        expr
    }
}

impl std::iter::FromIterator<(Variable, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (Variable, f64)>>(iter: I) -> Self {
        let mut expr = LinearExpr::empty();
        for (var, coeff) in iter {
            expr.add(var, coeff)
        }
        expr
    }
}

/// Relation between the left-hand and right-hand side of a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    /// The == operator (equal to)
    Eq,
    /// The <= operator (less than or equal to)
    Le,
    /// The >= operator (greater than or equal to)
    Ge,
}

impl ComparisonOp {
    /// Checks `lhs op rhs` with an absolute tolerance.
    pub fn holds(&self, lhs: f64, rhs: f64, eps: f64) -> bool {
        match self {
            ComparisonOp::Eq => (lhs - rhs).abs() <= eps,
            ComparisonOp::Le => lhs <= rhs + eps,
            ComparisonOp::Ge => lhs >= rhs - eps,
        }
    }

    /// The relation obtained by multiplying both sides by -1.
    pub fn flipped(&self) -> ComparisonOp {
        match self {
            ComparisonOp::Eq => ComparisonOp::Eq,
            ComparisonOp::Le => ComparisonOp::Ge,
            ComparisonOp::Ge => ComparisonOp::Le,
        }
    }
}

/// A linear program over non-negative variables.
///
/// The objective is stored in minimization form: coefficients of a maximization problem
/// are negated when they are added, and the sign is restored in
/// [`Solution::objective_value`](crate::solution::Solution::objective_value).
#[derive(Clone)]
pub struct LpInstance {
    direction: OptimizationDirection,
    obj_coeffs: Vec<f64>,
    constraints: Vec<(CsVec, ComparisonOp, f64)>,
}

impl std::fmt::Debug for LpInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LpInstance")
            .field("direction", &self.direction)
            .field("num_vars", &self.obj_coeffs.len())
            .field("num_constraints", &self.constraints.len())
            .finish()
    }
}

impl LpInstance {
    pub fn new(direction: OptimizationDirection) -> Self {
        LpInstance {
            direction,
            obj_coeffs: vec![],
            constraints: vec![],
        }
    }

    /// Builds `optimize c^T x  s.t.  A x <= b, x >= 0` from dense data, the shape produced by
    /// instance generators.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedInstance`] if `a` is not `b.len() x c.len()` or any entry is not finite.
    pub fn from_dense(
        direction: OptimizationDirection,
        c: &[f64],
        a: &[Vec<f64>],
        b: &[f64],
    ) -> Result<Self, Error> {
        let ops = vec![ComparisonOp::Le; b.len()];
        Self::from_dense_with_ops(direction, c, a, &ops, b)
    }

    /// Like [`LpInstance::from_dense`], with an explicit relation for every row.
    pub fn from_dense_with_ops(
        direction: OptimizationDirection,
        c: &[f64],
        a: &[Vec<f64>],
        ops: &[ComparisonOp],
        b: &[f64],
    ) -> Result<Self, Error> {
        if a.len() != b.len() || ops.len() != b.len() {
            return Err(Error::MalformedInstance(format!(
                "{} constraint rows, {} relations and {} right-hand sides",
                a.len(),
                ops.len(),
                b.len()
            )));
        }

        let mut instance = LpInstance::new(direction);
        let vars: Vec<Variable> = c.iter().map(|&coeff| instance.add_var(coeff)).collect();
        for (r, ((row, &op), &rhs)) in a.iter().zip(ops).zip(b).enumerate() {
            if row.len() != vars.len() {
                return Err(Error::MalformedInstance(format!(
                    "row {} has {} coefficients, expected {}",
                    r,
                    row.len(),
                    vars.len()
                )));
            }
            let expr: LinearExpr = vars
                .iter()
                .zip(row)
                .filter(|(_, &coeff)| coeff != 0.0)
                .map(|(&var, &coeff)| (var, coeff))
                .collect();
            instance.add_constraint(expr, op, rhs)?;
        }
        instance.validate()?;
        Ok(instance)
    }

    /// Add a new non-negative variable with objective coefficient `obj_coeff`.
    ///
    /// Variables added after a constraint do not appear in it.
    pub fn add_var(&mut self, obj_coeff: f64) -> Variable {
        let var = Variable(self.obj_coeffs.len());
        let obj_coeff = match self.direction {
            OptimizationDirection::Minimize => obj_coeff,
            OptimizationDirection::Maximize => -obj_coeff,
        };
        self.obj_coeffs.push(obj_coeff);
        var
    }

    /// Add a linear constraint `expr cmp_op rhs`.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedInstance`] if a variable appears twice in `expr`, does not belong to
    /// this instance, or a value is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use dantzig_tableau::problem::*;
    ///
    /// let mut instance = LpInstance::new(OptimizationDirection::Minimize);
    /// let x = instance.add_var(1.0);
    /// let y = instance.add_var(1.0);
    ///
    /// // x + y >= 2, from a slice of pairs
    /// instance.add_constraint(&[(x, 1.0), (y, 1.0)], ComparisonOp::Ge, 2.0).unwrap();
    ///
    /// // x - y <= 3, from an iterator
    /// let lhs: LinearExpr = [(x, 1.0), (y, -1.0)].into_iter().collect();
    /// instance.add_constraint(lhs, ComparisonOp::Le, 3.0).unwrap();
    /// assert_eq!(instance.num_constraints(), 2);
    /// ```
    pub fn add_constraint(
        &mut self,
        expr: impl Into<LinearExpr>,
        cmp_op: ComparisonOp,
        rhs: f64,
    ) -> Result<(), Error> {
        let mut terms = expr.into().terms;
        terms.sort_by_key(|&(var, _)| var);

        let row = self.constraints.len();
        if !rhs.is_finite() || terms.iter().any(|(_, coeff)| !coeff.is_finite()) {
            return Err(Error::MalformedInstance(format!(
                "constraint {} has a non-finite value",
                row
            )));
        }

        let (indices, data): (Vec<usize>, Vec<f64>) = terms.into_iter().unzip();
        let coeffs = CsVec::try_new(self.obj_coeffs.len(), indices, data).map_err(|(_, _, e)| {
            Error::MalformedInstance(format!("constraint {}: {}", row, e))
        })?;
        self.constraints.push((coeffs, cmp_op, rhs));
        Ok(())
    }

    /// Checks that every constraint row spans exactly the instance's variables and all values
    /// are finite.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(j) = self.obj_coeffs.iter().position(|c| !c.is_finite()) {
            return Err(Error::MalformedInstance(format!(
                "objective coefficient {} is not finite",
                j
            )));
        }
        for (r, (coeffs, _, rhs)) in self.constraints.iter().enumerate() {
            if coeffs.dim() > self.num_vars() {
                return Err(Error::MalformedInstance(format!(
                    "constraint {} spans {} variables, instance has {}",
                    r,
                    coeffs.dim(),
                    self.num_vars()
                )));
            }
            if !rhs.is_finite() {
                return Err(Error::MalformedInstance(format!(
                    "right-hand side {} is not finite",
                    r
                )));
            }
        }
        Ok(())
    }

    pub fn direction(&self) -> OptimizationDirection {
        self.direction
    }

    pub fn num_vars(&self) -> usize {
        self.obj_coeffs.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective coefficients in minimization form.
    pub(crate) fn min_obj_coeffs(&self) -> &[f64] {
        &self.obj_coeffs
    }

    /// Constraint `r` as a dense row of length [`LpInstance::num_vars`], its relation and rhs.
    pub fn dense_row(&self, r: usize) -> (Vec<f64>, ComparisonOp, f64) {
        let (coeffs, op, rhs) = &self.constraints[r];
        let mut row = to_dense(coeffs);
        row.resize(self.num_vars(), 0.0);
        (row, *op, *rhs)
    }

    /// Value of the objective (in the instance's own direction) at `x`.
    pub fn objective_at(&self, x: &[f64]) -> f64 {
        let min_val: f64 = self.obj_coeffs.iter().zip(x).map(|(c, v)| c * v).sum();
        match self.direction {
            OptimizationDirection::Minimize => min_val,
            OptimizationDirection::Maximize => -min_val,
        }
    }

    /// Whether `x` is non-negative and satisfies all constraints within `eps`.
    pub fn is_feasible(&self, x: &[f64], eps: f64) -> bool {
        if x.len() != self.num_vars() || x.iter().any(|&v| v < -eps) {
            return false;
        }
        self.constraints.iter().all(|(coeffs, op, rhs)| {
            let lhs: f64 = coeffs.iter().map(|(var, &coeff)| coeff * x[var]).sum();
            op.holds(lhs, *rhs, eps)
        })
    }
}
