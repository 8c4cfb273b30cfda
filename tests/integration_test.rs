#[cfg(test)]
mod integration_test {
    use approx::assert_abs_diff_eq;

    use dantzig_tableau::{
        batch,
        problem::{ComparisonOp, LinearExpr, LpInstance, OptimizationDirection},
        solution::{Outcome, Phase},
        solver::{Error, Solver, SolverTryNew},
        ArtificialPolicy, Elimination, InstrumentedSolver, SolverConfig, TableauSimplex,
    };

    /// Production planning: max 3a + 5b over three resource limits.
    fn wyndor() -> LpInstance {
        let mut instance = LpInstance::new(OptimizationDirection::Maximize);
        let a = instance.add_var(3.0);
        let b = instance.add_var(5.0);
        instance.add_constraint(&[(a, 1.0)], ComparisonOp::Le, 4.0).unwrap();
        instance.add_constraint(&[(b, 2.0)], ComparisonOp::Le, 12.0).unwrap();
        instance
            .add_constraint(&[(a, 3.0), (b, 2.0)], ComparisonOp::Le, 18.0)
            .unwrap();
        instance
    }

    /// Diet problem: cheapest mix meeting minimum nutrient levels.
    fn diet() -> LpInstance {
        let mut instance = LpInstance::new(OptimizationDirection::Minimize);
        let foods: Vec<_> = [0.6, 0.35, 0.9].iter().map(|&cost| instance.add_var(cost)).collect();
        let nutrients = [
            ([5.0, 2.0, 8.0], 20.0),
            ([1.0, 4.0, 2.0], 12.0),
            ([3.0, 0.0, 6.0], 9.0),
        ];
        for (amounts, minimum) in nutrients.iter() {
            let expr: LinearExpr = foods.iter().copied().zip(amounts.iter().copied()).collect();
            instance.add_constraint(expr, ComparisonOp::Ge, *minimum).unwrap();
        }
        instance
    }

    #[test]
    fn wyndor_test() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut solver = TableauSimplex::try_new(&wyndor()).unwrap();
        let result = solver.solve().unwrap();
        let solution = result.outcome.solution().unwrap();
        assert_abs_diff_eq!(solution.objective_value(), 36.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.values()[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.values()[1], 6.0, epsilon = 1e-9);
        println!("objective value: {}", solution.objective_value());

        let mut solver = TableauSimplex::with_config(
            &wyndor(),
            SolverConfig::default().with_artificials(ArtificialPolicy::Minimal),
        )
        .unwrap();
        let result = solver.solve().unwrap();
        assert_eq!(result.objective_value(), Some(36.0));
        assert_eq!(result.phase_one_pivots, 0);
        // b enters first (reduced cost -5), then a
        assert_eq!(result.steps.iter().map(|s| s.col).collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn diet_test() {
        let _ = env_logger::builder().is_test(true).try_init();

        let instance = diet();
        for elimination in [Elimination::Dense, Elimination::Sparse] {
            let config = SolverConfig::default().with_elimination(elimination);
            let result = TableauSimplex::with_config(&instance, config)
                .and_then(|mut solver| solver.solve())
                .unwrap();
            let solution = result.outcome.solution().unwrap();
            assert!(instance.is_feasible(solution.values(), 1e-9));
            assert_abs_diff_eq!(
                instance.objective_at(solution.values()),
                solution.objective_value(),
                epsilon = 1e-9
            );
            // x = (0, 2, 2) meets the first two minimums exactly
            assert_abs_diff_eq!(solution.objective_value(), 2.5, epsilon = 1e-9);
            assert_abs_diff_eq!(solution.values()[1], 2.0, epsilon = 1e-9);
            assert_abs_diff_eq!(solution.values()[2], 2.0, epsilon = 1e-9);
            assert!(result.phase_one_pivots > 0);
        }
    }

    #[test]
    fn outcomes() {
        let _ = env_logger::builder().is_test(true).try_init();

        // x + y >= 5 with x, y <= 2
        let infeasible = LpInstance::from_dense_with_ops(
            OptimizationDirection::Minimize,
            &[1.0, 1.0],
            &[vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
            &[ComparisonOp::Ge, ComparisonOp::Le, ComparisonOp::Le],
            &[5.0, 2.0, 2.0],
        )
        .unwrap();
        let result = TableauSimplex::try_new(&infeasible).unwrap().solve().unwrap();
        match result.outcome {
            Outcome::Infeasible {
                phase_one_objective,
            } => assert_abs_diff_eq!(phase_one_objective, 1.0, epsilon = 1e-9),
            outcome => panic!("expected infeasible, got {:?}", outcome),
        }
        assert_eq!(result.objective_value(), None);

        // max x + y with only x - y <= 1 and x >= 1
        let unbounded = LpInstance::from_dense_with_ops(
            OptimizationDirection::Maximize,
            &[1.0, 1.0],
            &[vec![1.0, -1.0], vec![1.0, 0.0]],
            &[ComparisonOp::Le, ComparisonOp::Ge],
            &[1.0, 1.0],
        )
        .unwrap();
        let result = TableauSimplex::try_new(&unbounded).unwrap().solve().unwrap();
        // the surplus of x >= 1 can grow without bound
        assert_eq!(result.outcome, Outcome::Unbounded { entering: 3 });
        assert_eq!(result.pivots, result.phase_one_pivots);
        assert!(result.steps.iter().all(|s| s.phase == Phase::PhaseOne));

        let config = SolverConfig::default().with_max_iterations(1);
        let result = TableauSimplex::with_config(&wyndor(), config).unwrap().solve().unwrap();
        assert_eq!(result.outcome, Outcome::IterationLimitExceeded { limit: 1 });
    }

    #[test]
    fn malformed_instances() {
        let mut instance = LpInstance::new(OptimizationDirection::Minimize);
        let x = instance.add_var(1.0);
        let res = instance.add_constraint(&[(x, f64::INFINITY)], ComparisonOp::Le, 1.0);
        assert!(matches!(res, Err(Error::MalformedInstance(_))));

        let res = LpInstance::from_dense(OptimizationDirection::Minimize, &[1.0, f64::NAN], &[], &[]);
        assert!(matches!(res, Err(Error::MalformedInstance(_))));
    }

    #[test]
    fn instrumented_wyndor() {
        let _ = env_logger::builder().is_test(true).try_init();

        let config = SolverConfig::default().with_artificials(ArtificialPolicy::Minimal);
        let mut solver = InstrumentedSolver::with_config(&wyndor(), config).unwrap();
        let counted = solver.solve().unwrap();
        assert_eq!(counted.result.objective_value(), Some(36.0));
        assert_eq!(counted.records.len(), 2);

        // 4 rows (3 constraints + objective) by 6 columns (2 vars, 3 slacks, rhs)
        for record in &counted.records {
            assert_eq!(record.counts.cell_updates, 4 * 6);
            assert_eq!(record.counts.columns_scanned, 5);
            assert_eq!(record.counts.rows_scanned, 3);
        }
        assert_eq!(counted.totals().cell_updates, 2 * 4 * 6);
        assert_eq!(counted.totals().columns_scanned, 3 * 5);

        // solving again hands back the recorded run
        assert_eq!(solver.solve().unwrap(), counted);
    }

    #[test]
    fn batch_of_instances() {
        let _ = env_logger::builder().is_test(true).try_init();

        let instances = vec![wyndor(), diet(), wyndor(), diet()];
        let results = batch::solve_all(&instances, 3, |instance| {
            TableauSimplex::try_new(instance).and_then(|mut solver| solver.solve())
        });
        let optima: Vec<f64> = results
            .into_iter()
            .map(|r| r.unwrap().objective_value().unwrap())
            .collect();
        assert_abs_diff_eq!(optima[0], 36.0, epsilon = 1e-9);
        assert_abs_diff_eq!(optima[2], 36.0, epsilon = 1e-9);
        assert_abs_diff_eq!(optima[1], 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(optima[3], 2.5, epsilon = 1e-9);
    }
}
