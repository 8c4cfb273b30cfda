use super::{counting::Counter, tableau::Tableau};

pub mod dantzig;

/// Result of pivot selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PivotChoice {
    Pivot { row: usize, col: usize },
    /// No enabled column has a negative reduced cost.
    Optimal,
    /// Column `col` may enter but no row bounds it.
    Unbounded { col: usize },
}

pub trait PivotChooser {
    fn choose_entering_col(&self, tableau: &Tableau, counter: &mut dyn Counter) -> Option<usize>;

    fn choose_leaving_row(
        &self,
        tableau: &Tableau,
        entering_col: usize,
        counter: &mut dyn Counter,
    ) -> Option<usize>;

    fn choose_pivot(&self, tableau: &Tableau, counter: &mut dyn Counter) -> PivotChoice {
        match self.choose_entering_col(tableau, counter) {
            None => PivotChoice::Optimal,
            Some(col) => match self.choose_leaving_row(tableau, col, counter) {
                Some(row) => PivotChoice::Pivot { row, col },
                None => PivotChoice::Unbounded { col },
            },
        }
    }
}
