//! Solving many independent instances on a pool of worker threads.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, trace, warn};
use rayon::prelude::*;
use stopwatch::Stopwatch;

use crate::problem::LpInstance;

/// Applies `f` to every instance on `workers` threads and returns the results in input
/// order.
///
/// Each call of `f` builds and owns its solver; nothing but the instance slice is shared.
/// `workers == 0` uses rayon's global pool, `workers == 1` runs everything on the calling
/// thread.
///
/// # Examples
///
/// ```
/// use dantzig_tableau::{batch, LpInstance, OptimizationDirection, Solver, SolverTryNew, TableauSimplex};
///
/// let instances: Vec<LpInstance> = (1..=4)
///     .map(|b| {
///         LpInstance::from_dense(OptimizationDirection::Maximize, &[1.0], &[vec![1.0]], &[b as f64])
///             .unwrap()
///     })
///     .collect();
///
/// let results = batch::solve_all(&instances, 2, |instance| {
///     TableauSimplex::try_new(instance).and_then(|mut solver| solver.solve())
/// });
/// let optima: Vec<f64> = results
///     .iter()
///     .map(|r| r.as_ref().unwrap().objective_value().unwrap())
///     .collect();
/// assert_eq!(optima, vec![1.0, 2.0, 3.0, 4.0]);
/// ```
pub fn solve_all<T, F>(instances: &[LpInstance], workers: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&LpInstance) -> T + Sync,
{
    let stopwatch = Stopwatch::start_new();
    let completed = AtomicUsize::new(0);

    let results = if workers == 1 {
        instances.iter().map(&f).collect()
    } else {
        let run = || {
            instances
                .par_iter()
                .map(|instance| {
                    let result = f(instance);
                    let count = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    trace!(
                        "thread {} finished instance {} of {}",
                        thread_id::get(),
                        count,
                        instances.len()
                    );
                    result
                })
                .collect::<Vec<_>>()
        };

        let pool = match workers {
            0 => None,
            n => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    warn!("could not build a pool of {} threads, using the global pool: {}", n, e);
                    None
                }
            },
        };
        match pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    };

    debug!(
        "solved {} instances with {} workers in {} ms (caller thread {})",
        instances.len(),
        workers,
        stopwatch.elapsed_ms(),
        thread_id::get(),
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        problem::OptimizationDirection,
        solution::SolveResult,
        solver::{Error, Solver, SolverTryNew},
        solvers::tableau_simplex::{instrumented::InstrumentedSolver, TableauSimplex},
    };

    fn instances(n: usize) -> Vec<LpInstance> {
        (0..n)
            .map(|i| {
                let b = (i + 1) as f64;
                LpInstance::from_dense(
                    OptimizationDirection::Maximize,
                    &[1.0, 2.0],
                    &[vec![1.0, 1.0], vec![0.0, 1.0]],
                    &[2.0 * b, b],
                )
                .unwrap()
            })
            .collect()
    }

    fn solve(instance: &LpInstance) -> Result<SolveResult, Error> {
        TableauSimplex::try_new(instance)?.solve()
    }

    #[test]
    fn results_keep_input_order() {
        let _ = env_logger::builder().is_test(true).try_init();

        let instances = instances(17);
        for workers in [0, 1, 3, 8, 64] {
            let results = solve_all(&instances, workers, solve);
            assert_eq!(results.len(), instances.len());
            for (i, result) in results.iter().enumerate() {
                // x = y = b
                let b = (i + 1) as f64;
                assert_eq!(result.as_ref().unwrap().objective_value(), Some(3.0 * b));
            }
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let instances = instances(12);
        let instrumented = |instance: &LpInstance| {
            InstrumentedSolver::try_new(instance)
                .and_then(|mut solver| solver.solve())
                .unwrap()
        };
        let sequential = solve_all(&instances, 1, instrumented);
        let parallel = solve_all(&instances, 4, instrumented);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn empty_batch() {
        let results = solve_all(&[], 4, solve);
        assert!(results.is_empty());
    }
}
