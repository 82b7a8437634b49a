//! NSGA-III generational loop.
//!
//! [`Nsga3Runner`] orchestrates the complete run:
//! initialization → evaluation → ranking → breeding → selection → repeat.

use super::config::Nsga3Config;
use super::dominance::non_dominated_sort;
use super::niching::environmental_selection;
use super::reference_points::{generate_reference_points, validate_reference_points};
use super::selection::binary_tournament;
use super::types::{Bounds, Nsga3Problem};
use crate::error::{Nsga3Error, Result};
use crate::random::rng_from_option;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::cmp::Ordering;

/// States of the generational loop, used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Building the population, probing the objective count and reference points.
    Init,
    /// Scoring the current population.
    Evaluating,
    /// Non-dominated sorting.
    Ranking,
    /// Tournament selection and variation.
    Breeding,
    /// Environmental selection of the combined population.
    Selecting,
    /// Final evaluation done; result returned.
    Terminated,
}

/// Result of an NSGA-III run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nsga3Result {
    /// Objective vectors of the final rank-0 front, sorted lexicographically
    /// ascending.
    pub pareto_front: Vec<Vec<f64>>,

    /// Decision vectors of the final rank-0 front, aligned with
    /// `pareto_front`.
    pub pareto_set: Vec<Vec<f64>>,

    /// The whole final population.
    pub population: Vec<Vec<f64>>,

    /// Number of objectives learned from the probe.
    pub n_objectives: usize,

    /// Number of reference points used for niching.
    pub n_reference_points: usize,

    /// Number of generations executed.
    pub generations: usize,

    /// Rank-0 size at every ranking of the parent population: one entry per
    /// generation plus the terminal ranking.
    pub front_sizes: Vec<usize>,
}

/// Executes the NSGA-III loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let bounds = Bounds::uniform(12, 0.0, 1.0)?;
/// let config = Nsga3Config::default().with_seed(42);
/// let result = Nsga3Runner::run(&problem, &bounds, &config)?;
/// println!("front size: {}", result.pareto_front.len());
/// ```
pub struct Nsga3Runner;

impl Nsga3Runner {
    /// Runs NSGA-III from a random initial population.
    ///
    /// # Errors
    /// Fails before the first generation on an invalid configuration, an
    /// empty probe result or unusable reference points, and during the run
    /// when an evaluation changes the objective count or a variation
    /// operator changes the decision vector length.
    pub fn run<P: Nsga3Problem>(problem: &P, bounds: &Bounds, config: &Nsga3Config) -> Result<Nsga3Result> {
        Self::execute(problem, bounds, config, None)
    }

    /// Runs NSGA-III from a caller-supplied initial population.
    ///
    /// The population may have any size of at least two, each vector with
    /// one value per bound. Every generation still breeds and keeps
    /// `config.population_size` individuals, so the population settles to
    /// that size after the first selection.
    pub fn run_with_population<P: Nsga3Problem>(
        problem: &P,
        bounds: &Bounds,
        config: &Nsga3Config,
        initial_population: Vec<Vec<f64>>,
    ) -> Result<Nsga3Result> {
        Self::execute(problem, bounds, config, Some(initial_population))
    }

    fn execute<P: Nsga3Problem>(
        problem: &P,
        bounds: &Bounds,
        config: &Nsga3Config,
        initial_population: Option<Vec<Vec<f64>>>,
    ) -> Result<Nsga3Result> {
        config.validate()?;
        if config.parallel && !cfg!(feature = "parallel") {
            log::warn!("parallel evaluation requested but the `parallel` feature is disabled");
        }

        let pop_size = config.population_size;
        let n_var = bounds.len();
        let mut rng = rng_from_option(config.seed);

        log::debug!("phase {:?}", Phase::Init);
        let mut population = match initial_population {
            Some(initial) => {
                check_population(&initial, n_var)?;
                initial
            }
            None => initialize_population(bounds, pop_size, &mut rng),
        };

        let n_objectives = probe_objective_count(problem, n_var)?;
        let reference_points = match &config.reference_points {
            Some(points) => {
                validate_reference_points(points, n_objectives)?;
                points.clone()
            }
            None => generate_reference_points(n_objectives, config.divisions)?,
        };

        log::info!(
            "NSGA-III start: {pop_size} individuals, {n_var} variables, {n_objectives} objectives, {} reference points, {} generations",
            reference_points.len(),
            config.generations
        );

        let evaluator = Evaluator::new(problem, n_objectives, config.parallel);
        let mut front_sizes = Vec::with_capacity(config.generations + 1);

        for gen in 0..config.generations {
            log::trace!("generation {gen}: phase {:?}", Phase::Evaluating);
            let objectives = evaluator.evaluate(&population)?;

            log::trace!("generation {gen}: phase {:?}", Phase::Ranking);
            let sorted = non_dominated_sort(&objectives);
            front_sizes.push(sorted.first_front().len());

            log::trace!("generation {gen}: phase {:?}", Phase::Breeding);
            let offspring = breed(
                problem,
                bounds,
                &population,
                &sorted.ranks,
                pop_size,
                config.keep_both_children,
                &mut rng,
            )?;

            log::trace!("generation {gen}: phase {:?}", Phase::Selecting);
            let mut combined = population;
            combined.extend(offspring);
            let combined_objectives = evaluator.evaluate(&combined)?;
            let combined_sorted = non_dominated_sort(&combined_objectives);
            let survivors = environmental_selection(
                &combined_objectives,
                &combined_sorted.fronts,
                &reference_points,
                pop_size,
                config.association,
                &mut rng,
            );
            population = take_indices(combined, &survivors);

            log::debug!(
                "generation {}: {} fronts in combined population, parent rank-0 size {}",
                gen + 1,
                combined_sorted.len(),
                sorted.first_front().len()
            );
            problem.on_generation(gen + 1, &population);
        }

        let objectives = evaluator.evaluate(&population)?;
        let sorted = non_dominated_sort(&objectives);
        front_sizes.push(sorted.first_front().len());

        let mut front: Vec<(Vec<f64>, Vec<f64>)> = sorted
            .first_front()
            .iter()
            .map(|&i| (objectives[i].clone(), population[i].clone()))
            .collect();
        front.sort_by(|a, b| lexicographic_cmp(&a.0, &b.0));
        let (pareto_front, pareto_set): (Vec<_>, Vec<_>) = front.into_iter().unzip();

        log::debug!("phase {:?}", Phase::Terminated);
        log::info!(
            "NSGA-III done after {} generations: {} non-dominated solutions",
            config.generations,
            pareto_front.len()
        );

        Ok(Nsga3Result {
            pareto_front,
            pareto_set,
            population,
            n_objectives,
            n_reference_points: reference_points.len(),
            generations: config.generations,
            front_sizes,
        })
    }
}

/// Draws `size` decision vectors uniformly within `bounds`.
pub fn initialize_population<R: Rng>(bounds: &Bounds, size: usize, rng: &mut R) -> Vec<Vec<f64>> {
    (0..size).map(|_| bounds.sample(rng)).collect()
}

/// Learns the objective count by evaluating the zero vector.
///
/// # Errors
/// [`Nsga3Error::EmptyObjective`] if the probe returns no objectives.
pub fn probe_objective_count<P: Nsga3Problem>(problem: &P, n_var: usize) -> Result<usize> {
    let probe = problem.evaluate(&vec![0.0; n_var]);
    if probe.is_empty() {
        return Err(Nsga3Error::EmptyObjective);
    }
    Ok(probe.len())
}

/// Scores populations and enforces a fixed objective count.
pub struct Evaluator<'a, P> {
    problem: &'a P,
    n_objectives: usize,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
}

impl<'a, P: Nsga3Problem> Evaluator<'a, P> {
    /// Creates an evaluator expecting `n_objectives` per evaluation.
    pub fn new(problem: &'a P, n_objectives: usize, parallel: bool) -> Self {
        Self {
            problem,
            n_objectives,
            parallel,
        }
    }

    /// Evaluates every individual independently.
    ///
    /// # Errors
    /// [`Nsga3Error::ObjectiveShape`] for the first individual whose
    /// objective vector has the wrong length.
    pub fn evaluate(&self, population: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let objectives = self.evaluate_all(population);

        if let Some((index, got)) = objectives
            .iter()
            .enumerate()
            .find(|(_, o)| o.len() != self.n_objectives)
            .map(|(i, o)| (i, o.len()))
        {
            return Err(Nsga3Error::ObjectiveShape {
                index,
                expected: self.n_objectives,
                got,
            });
        }
        Ok(objectives)
    }

    #[cfg(feature = "parallel")]
    fn evaluate_all(&self, population: &[Vec<f64>]) -> Vec<Vec<f64>> {
        if self.parallel {
            population.par_iter().map(|x| self.problem.evaluate(x)).collect()
        } else {
            population.iter().map(|x| self.problem.evaluate(x)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_all(&self, population: &[Vec<f64>]) -> Vec<Vec<f64>> {
        population.iter().map(|x| self.problem.evaluate(x)).collect()
    }
}

/// Produces `target` offspring by tournament selection and variation.
///
/// Each mating picks two parents by binary tournament on `ranks`, crosses
/// them, and mutates the first child; only that child is kept unless
/// `keep_both_children` is set.
fn breed<P: Nsga3Problem, R: Rng>(
    problem: &P,
    bounds: &Bounds,
    population: &[Vec<f64>],
    ranks: &[usize],
    target: usize,
    keep_both_children: bool,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>> {
    let n_var = bounds.len();
    let mut offspring = Vec::with_capacity(target);

    while offspring.len() < target {
        let p1 = binary_tournament(ranks, rng);
        let p2 = binary_tournament(ranks, rng);
        let (child1, child2) = problem.crossover(&population[p1], &population[p2], rng);

        let mutated = problem.mutate(&child1, bounds, rng);
        check_dimension(&mutated, offspring.len(), n_var)?;
        offspring.push(mutated);

        if keep_both_children && offspring.len() < target {
            let mutated = problem.mutate(&child2, bounds, rng);
            check_dimension(&mutated, offspring.len(), n_var)?;
            offspring.push(mutated);
        }
    }

    Ok(offspring)
}

fn check_dimension(x: &[f64], index: usize, n_var: usize) -> Result<()> {
    if x.len() != n_var {
        return Err(Nsga3Error::DecisionDimension {
            index,
            expected: n_var,
            got: x.len(),
        });
    }
    Ok(())
}

/// Smallest initial population a tournament can draw two parents from.
const MIN_INITIAL_POPULATION: usize = 2;

fn check_population(population: &[Vec<f64>], n_var: usize) -> Result<()> {
    if population.len() < MIN_INITIAL_POPULATION {
        return Err(Nsga3Error::InitialPopulationSize {
            minimum: MIN_INITIAL_POPULATION,
            got: population.len(),
        });
    }
    for (i, x) in population.iter().enumerate() {
        check_dimension(x, i, n_var)?;
    }
    Ok(())
}

/// Moves the vectors at `indices` out of `population`, in `indices` order.
fn take_indices(population: Vec<Vec<f64>>, indices: &[usize]) -> Vec<Vec<f64>> {
    let mut slots: Vec<Option<Vec<f64>>> = population.into_iter().map(Some).collect();
    indices.iter().filter_map(|&i| slots[i].take()).collect()
}

/// Lexicographic order on objective vectors using `f64::total_cmp`.
fn lexicographic_cmp(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

// ============================================================================
// Tests
// ============================================================================
