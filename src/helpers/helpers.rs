use sprs::CsVecBase;
use std::ops::Deref;

pub(crate) fn to_dense<IStorage, DStorage>(vec: &CsVecBase<IStorage, DStorage, f64>) -> Vec<f64>
where
    IStorage: Deref<Target = [usize]>,
    DStorage: Deref<Target = [f64]>,
{
    let mut dense = vec![0.0; vec.dim()];
    vec.scatter(&mut dense);
    dense
}

#[cfg(test)]
use ndarray::ArrayView2;

#[cfg(test)]
pub(crate) fn assert_cells_eq(cells: ArrayView2<f64>, reference: &[Vec<f64>], eps: f64) {
    assert_eq!(cells.nrows(), reference.len());
    for (r, (row, expected)) in cells.rows().into_iter().zip(reference).enumerate() {
        assert_eq!(row.len(), expected.len(), "row {} has the wrong width", r);
        for (c, (&val, &expected)) in row.iter().zip(expected).enumerate() {
            assert!(
                (val - expected).abs() <= eps,
                "cells differ at ({}, {}): {} vs {}",
                r,
                c,
                val,
                expected
            );
        }
    }
}
