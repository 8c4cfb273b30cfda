use ndarray::Array2;

use crate::{config::Elimination, solver::Error};

use super::counting::Counter;

/// Gauss-Jordan elimination around `(row, col)`.
///
/// Divides the pivot row by the pivot element, then subtracts multiples of it from every
/// other row, the objective row included. Afterwards `col` is exactly the unit column of
/// `row`.
pub(crate) fn eliminate(
    cells: &mut Array2<f64>,
    row: usize,
    col: usize,
    mode: Elimination,
    eps: f64,
    counter: &mut dyn Counter,
) -> Result<(), Error> {
    let pivot = cells[[row, col]];
    counter.accesses(1);
    // Also rejects NaN.
    if !(pivot.abs() > eps) {
        return Err(Error::DegeneratePivot {
            row,
            col,
            value: pivot,
        });
    }

    let width = cells.ncols() as u64;

    match mode {
        Elimination::Dense => {
            cells.row_mut(row).mapv_inplace(|val| val / pivot);
            counter.accesses(width);
            counter.arithmetic(width);
            counter.cell_updates(width);
        }
        Elimination::Sparse => {
            let mut updated = 0;
            for val in cells.row_mut(row).iter_mut() {
                if *val != 0.0 {
                    *val /= pivot;
                    updated += 1;
                }
            }
            counter.accesses(width);
            counter.comparisons(width);
            counter.arithmetic(updated);
            counter.cell_updates(updated);
        }
    }
    counter.row_operations(1);

    let pivot_row = cells.row(row).to_owned();
    for (r, mut target) in cells.rows_mut().into_iter().enumerate() {
        if r == row {
            continue;
        }
        let factor = target[col];
        counter.accesses(1);

        match mode {
            Elimination::Dense => {
                target.scaled_add(-factor, &pivot_row);
                counter.accesses(2 * width);
                counter.arithmetic(2 * width);
                counter.cell_updates(width);
            }
            Elimination::Sparse => {
                counter.comparisons(1);
                if factor == 0.0 {
                    continue;
                }
                let mut updated = 0;
                for (val, &pivot_val) in target.iter_mut().zip(pivot_row.iter()) {
                    if pivot_val != 0.0 {
                        *val -= factor * pivot_val;
                        updated += 1;
                    }
                }
                counter.accesses(width + updated);
                counter.comparisons(width);
                counter.arithmetic(2 * updated);
                counter.cell_updates(updated);
            }
        }
        counter.row_operations(1);
    }

    // Round-off would otherwise leave tiny residues in the pivot column.
    for (r, val) in cells.column_mut(col).iter_mut().enumerate() {
        *val = if r == row { 1.0 } else { 0.0 };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::{helpers::helpers::assert_cells_eq, solvers::tableau_simplex::counting::OpCounts};

    #[test]
    fn dense_elimination() {
        let mut cells = array![
            [2.0, 1.0, 1.0, 0.0, 10.0],
            [5.0, 3.0, 0.0, 1.0, 15.0],
            [-3.0, -4.0, 0.0, 0.0, 0.0],
        ];
        let mut counts = OpCounts::default();
        eliminate(&mut cells, 1, 1, Elimination::Dense, 1e-9, &mut counts).unwrap();

        assert_cells_eq(
            cells.view(),
            &[
                vec![1.0 / 3.0, 0.0, 1.0, -1.0 / 3.0, 5.0],
                vec![5.0 / 3.0, 1.0, 0.0, 1.0 / 3.0, 5.0],
                vec![11.0 / 3.0, 0.0, 0.0, 4.0 / 3.0, 20.0],
            ],
            1e-12,
        );
        assert_eq!(counts.cell_updates, 3 * 5);
        assert_eq!(counts.row_operations, 3);
        assert_eq!(counts.arithmetic, 5 + 2 * 2 * 5);
        // pivot, pivot row, then factor plus both operands for the other two rows
        assert_eq!(counts.accesses, 1 + 5 + 2 * (1 + 2 * 5));
    }

    #[test]
    fn sparse_matches_dense() {
        let original = array![
            [1.0, 0.0, 2.0, 0.0, 4.0],
            [0.0, 3.0, 0.0, 1.0, 6.0],
            [2.0, 0.0, 1.0, 0.0, 3.0],
            [-1.0, -1.0, 0.0, 0.0, 0.0],
        ];
        let mut dense = original.clone();
        let mut sparse = original.clone();
        let mut dense_counts = OpCounts::default();
        let mut sparse_counts = OpCounts::default();
        eliminate(&mut dense, 0, 0, Elimination::Dense, 1e-9, &mut dense_counts).unwrap();
        eliminate(&mut sparse, 0, 0, Elimination::Sparse, 1e-9, &mut sparse_counts).unwrap();

        assert_eq!(dense, sparse);
        assert_eq!(dense_counts.cell_updates, 4 * 5);
        // pivot row has 3 non-zeros; rows 2 and 3 have a non-zero factor, row 1 is skipped
        assert_eq!(sparse_counts.cell_updates, 3 + 3 + 3);
        assert_eq!(sparse_counts.row_operations, 3);
        assert_eq!(dense_counts.accesses, 1 + 5 + 3 * (1 + 2 * 5));
        // skipped row 1 only has its factor read
        assert_eq!(sparse_counts.accesses, 1 + 5 + 1 + 2 * (1 + 5 + 3));
    }

    #[test]
    fn zero_pivot_is_an_error() {
        let mut cells = array![[0.0, 1.0, 1.0], [1.0, 1.0, 0.0]];
        let res = eliminate(&mut cells, 0, 0, Elimination::Dense, 1e-9, &mut OpCounts::default());
        assert_eq!(
            res,
            Err(Error::DegeneratePivot {
                row: 0,
                col: 0,
                value: 0.0
            })
        );
        assert_eq!(cells, array![[0.0, 1.0, 1.0], [1.0, 1.0, 0.0]]);
    }
}
