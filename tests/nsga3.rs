//! End-to-end NSGA-III runs.

use std::f64::consts::FRAC_PI_2;
use u_nsga3::nsga3::operators::RealCodedProblem;
use u_nsga3::nsga3::{
    dominates, AssociationMetric, Bounds, FnProblem, Nsga3Config, Nsga3Runner, ScalarObjectives,
};
use u_nsga3::Nsga3Error;

/// DTLZ2 with `m` objectives; the Pareto front is the unit sphere octant.
fn dtlz2(x: &[f64], m: usize) -> Vec<f64> {
    let n = x.len();
    let k = n - (m - 1);
    let g: f64 = x[n - k..].iter().map(|v| (v - 0.5) * (v - 0.5)).sum();

    (0..m)
        .map(|i| {
            let mut f = 1.0 + g;
            for xj in &x[..m - i - 1] {
                f *= (FRAC_PI_2 * xj).cos();
            }
            if i > 0 {
                f *= (FRAC_PI_2 * x[m - i - 1]).sin();
            }
            f
        })
        .collect()
}

fn assert_mutually_non_dominated(front: &[Vec<f64>]) {
    for (i, a) in front.iter().enumerate() {
        for (j, b) in front.iter().enumerate() {
            assert!(i == j || !dominates(a, b), "{a:?} dominates {b:?}");
        }
    }
}

#[test]
fn test_replicated_objective_with_identity_operators() {
    let problem = FnProblem::new(|x: &[f64]| vec![x[0], x[0]]);
    let bounds = Bounds::new(vec![(0.0, 1.0)]).unwrap();
    let config = Nsga3Config::default()
        .with_population_size(20)
        .with_generations(5)
        .with_seed(2024);

    let result = Nsga3Runner::run(&problem, &bounds, &config).unwrap();

    assert!(!result.pareto_front.is_empty());
    assert!(result.pareto_front.len() <= 20);
    assert_mutually_non_dominated(&result.pareto_front);
}

#[test]
fn test_dtlz2_three_objectives_converges() {
    let _ = env_logger::builder().is_test(true).try_init();
    let m = 3;
    let problem = RealCodedProblem::new(move |x: &[f64]| dtlz2(x, m))
        .with_crossover_prob(0.9)
        .with_mutation_rate(1.0);
    let bounds = Bounds::uniform(m - 1 + 10, 0.0, 1.0).unwrap();
    let config = Nsga3Config::default()
        .with_population_size(92)
        .with_generations(150)
        .with_divisions(12)
        .with_seed(42);

    let result = Nsga3Runner::run(&problem, &bounds, &config).unwrap();

    assert_eq!(result.n_objectives, 3);
    assert_eq!(result.n_reference_points, 91);
    assert_eq!(result.population.len(), 92);
    assert_mutually_non_dominated(&result.pareto_front);

    // every decision vector stays within bounds
    for x in &result.population {
        assert!(bounds.contains(x), "{x:?} out of bounds");
    }

    // points approach the unit sphere: mean radius close to 1
    let mean_radius: f64 = result
        .pareto_front
        .iter()
        .map(|f| f.iter().map(|v| v * v).sum::<f64>().sqrt())
        .sum::<f64>()
        / result.pareto_front.len() as f64;
    assert!(
        mean_radius < 1.25,
        "front should approach the unit sphere, mean radius {mean_radius}"
    );
}

#[test]
fn test_perpendicular_metric_run() {
    let m = 3;
    let problem = RealCodedProblem::new(move |x: &[f64]| dtlz2(x, m));
    let bounds = Bounds::uniform(7, 0.0, 1.0).unwrap();
    let config = Nsga3Config::default()
        .with_population_size(28)
        .with_generations(20)
        .with_divisions(6)
        .with_association(AssociationMetric::PerpendicularDistance)
        .with_seed(3);

    let result = Nsga3Runner::run(&problem, &bounds, &config).unwrap();
    assert_eq!(result.population.len(), 28);
    assert_mutually_non_dominated(&result.pareto_front);
}

#[test]
fn test_scalar_objective_list() {
    let objectives = ScalarObjectives::new()
        .with(|x: &[f64]| x[0] * x[0])
        .with(|x: &[f64]| (x[0] - 2.0) * (x[0] - 2.0));
    let problem = FnProblem::from_scalar_objectives(objectives);
    let bounds = Bounds::uniform(1, -5.0, 5.0).unwrap();
    let config = Nsga3Config::default()
        .with_population_size(12)
        .with_generations(3)
        .with_seed(11);

    let result = Nsga3Runner::run(&problem, &bounds, &config).unwrap();
    assert_eq!(result.n_objectives, 2);
    assert_mutually_non_dominated(&result.pareto_front);
}

#[test]
fn test_sorted_output() {
    let problem = FnProblem::new(|x: &[f64]| vec![x[0], 1.0 - x[0]]);
    let bounds = Bounds::uniform(1, 0.0, 1.0).unwrap();
    let config = Nsga3Config::default()
        .with_population_size(10)
        .with_generations(2)
        .with_seed(99);

    let result = Nsga3Runner::run(&problem, &bounds, &config).unwrap();
    for w in result.pareto_front.windows(2) {
        assert!(w[0][0] <= w[1][0], "front not sorted: {:?}", result.pareto_front);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_evaluation_matches_sequential() {
    let problem = RealCodedProblem::new(|x: &[f64]| dtlz2(x, 2));
    let bounds = Bounds::uniform(6, 0.0, 1.0).unwrap();
    let base = Nsga3Config::default()
        .with_population_size(20)
        .with_generations(10)
        .with_seed(5);

    let sequential = Nsga3Runner::run(&problem, &bounds, &base).unwrap();
    let parallel = Nsga3Runner::run(&problem, &bounds, &base.clone().with_parallel(true)).unwrap();
    assert_eq!(sequential.pareto_front, parallel.pareto_front);
}

#[test]
fn test_empty_bounds_rejected() {
    assert_eq!(Bounds::new(Vec::new()), Err(Nsga3Error::EmptyBounds));
}
