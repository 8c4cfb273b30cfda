use crate::{
    config::TieBreak,
    solvers::tableau_simplex::{counting::Counter, pivot::PivotChooser, tableau::Tableau},
};

/// Dantzig's rule: the entering column has the most negative reduced cost, the leaving row
/// wins the min-ratio test.
///
/// Reduced costs that tie resolve to the lowest column index. Ratios within `eps` of each
/// other tie and are resolved by `tie_break`.
#[derive(Clone, Copy, Debug)]
pub struct Dantzig {
    tie_break: TieBreak,
    eps: f64,
}

impl Dantzig {
    pub fn new(tie_break: TieBreak, eps: f64) -> Self {
        Dantzig { tie_break, eps }
    }

    /// Whether tied `row` should replace the current `best_row`. Rows are visited in
    /// ascending order.
    fn prefers(&self, tableau: &Tableau, row: usize, best_row: usize) -> bool {
        match self.tie_break {
            TieBreak::LowestBasisIndex => tableau.basis()[row] < tableau.basis()[best_row],
            TieBreak::LowestRow => row < best_row,
        }
    }
}

impl PivotChooser for Dantzig {
    fn choose_entering_col(&self, tableau: &Tableau, counter: &mut dyn Counter) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for col in 0..tableau.cols() {
            if tableau.is_disabled(col) {
                continue;
            }
            counter.columns_scanned(1);

            let cost = tableau.reduced_cost(col);
            counter.accesses(1);
            counter.comparisons(1);
            if cost >= -self.eps {
                continue;
            }

            match best {
                Some((_, best_cost)) => {
                    counter.comparisons(1);
                    if cost < best_cost {
                        best = Some((col, cost));
                    }
                }
                None => best = Some((col, cost)),
            }
        }
        best.map(|(col, _)| col)
    }

    fn choose_leaving_row(
        &self,
        tableau: &Tableau,
        entering_col: usize,
        counter: &mut dyn Counter,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for row in 0..tableau.rows() {
            counter.rows_scanned(1);

            let coeff = tableau.get(row, entering_col);
            counter.accesses(1);
            counter.comparisons(1);
            if coeff <= self.eps {
                continue;
            }

            let ratio = tableau.rhs(row) / coeff;
            counter.accesses(1);
            counter.arithmetic(1);

            match best {
                Some((best_row, best_ratio)) => {
                    counter.comparisons(1);
                    if ratio < best_ratio - self.eps {
                        best = Some((row, ratio));
                    } else {
                        counter.comparisons(1);
                        if ratio <= best_ratio + self.eps {
                            counter.comparisons(1);
                            if self.prefers(tableau, row, best_row) {
                                best = Some((row, ratio.min(best_ratio)));
                            }
                        }
                    }
                }
                None => best = Some((row, ratio)),
            }
        }
        best.map(|(row, _)| row)
    }
}
