//! Problem definition for the NSGA-III engine.
//!
//! [`Nsga3Problem`] is the contract between the generic engine and a
//! concrete optimization problem. [`FnProblem`] builds one from closures,
//! and [`ScalarObjectives`] adapts a list of per-objective functions to the
//! single `decision vector -> objective vector` convention.

use crate::error::{Nsga3Error, Result};
use rand::{Rng, RngCore};

/// Per-variable `(lower, upper)` limits of the decision space.
///
/// Immutable for the duration of a run. A variable with `upper <= lower`
/// is accepted: initialization then draws between the two values and
/// mutation leaves that variable untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    limits: Vec<(f64, f64)>,
}

impl Bounds {
    /// Creates bounds from `(lower, upper)` pairs.
    ///
    /// # Errors
    /// - [`Nsga3Error::EmptyBounds`] if `limits` is empty
    /// - [`Nsga3Error::NonFiniteBounds`] if any value is NaN or infinite
    pub fn new(limits: Vec<(f64, f64)>) -> Result<Self> {
        if limits.is_empty() {
            return Err(Nsga3Error::EmptyBounds);
        }
        if let Some((index, &(lower, upper))) = limits
            .iter()
            .enumerate()
            .find(|(_, (lo, hi))| !lo.is_finite() || !hi.is_finite())
        {
            return Err(Nsga3Error::NonFiniteBounds { index, lower, upper });
        }
        Ok(Self { limits })
    }

    /// Same `(lower, upper)` pair for each of `n_var` variables.
    pub fn uniform(n_var: usize, lower: f64, upper: f64) -> Result<Self> {
        Self::new(vec![(lower, upper); n_var])
    }

    /// Number of decision variables.
    pub fn len(&self) -> usize {
        self.limits.len()
    }

    /// Always `false` for validated bounds.
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// The `(lower, upper)` pairs.
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.limits
    }

    /// Draws one decision vector, each variable uniform in its interval.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.limits
            .iter()
            .map(|&(lo, hi)| {
                if lo == hi {
                    lo
                } else {
                    lo + (hi - lo) * rng.random::<f64>()
                }
            })
            .collect()
    }

    /// Returns `true` if every variable of `x` lies within its bound.
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.limits.len()
            && x.iter()
                .zip(&self.limits)
                .all(|(&v, &(lo, hi))| v >= lo.min(hi) && v <= hi.max(lo))
    }
}

/// Defines a multi-objective optimization problem.
///
/// Implementors supply the objective function and, optionally, variation
/// operators. All objectives are **minimized**.
///
/// The engine threads its single seeded generator through
/// [`crossover`](Nsga3Problem::crossover) and
/// [`mutate`](Nsga3Problem::mutate), so a problem that draws its
/// randomness from `rng` keeps runs reproducible.
///
/// # Thread Safety
///
/// `Nsga3Problem` must be `Send + Sync` because evaluation may run in
/// parallel with the `parallel` feature.
pub trait Nsga3Problem: Send + Sync {
    /// Evaluates a decision vector and returns its objective vector.
    ///
    /// Must return the same number of objectives for every input.
    fn evaluate(&self, x: &[f64]) -> Vec<f64>;

    /// Recombines two parents into two children.
    ///
    /// Children must keep the parents' length. The default returns copies
    /// of both parents.
    fn crossover<R: Rng>(&self, parent1: &[f64], parent2: &[f64], _rng: &mut R) -> (Vec<f64>, Vec<f64>) {
        (parent1.to_vec(), parent2.to_vec())
    }

    /// Returns a mutated copy of `x`.
    ///
    /// Should keep values within `bounds`. The default returns `x`
    /// unchanged.
    fn mutate<R: Rng>(&self, x: &[f64], _bounds: &Bounds, _rng: &mut R) -> Vec<f64> {
        x.to_vec()
    }

    /// Called after each completed generation with the surviving decision
    /// vectors. The default is a no-op.
    fn on_generation(&self, _generation: usize, _population: &[Vec<f64>]) {}
}

type ObjectiveFn = Box<dyn Fn(&[f64]) -> Vec<f64> + Send + Sync>;
type CrossoverFn = Box<dyn Fn(&[f64], &[f64], &mut dyn RngCore) -> (Vec<f64>, Vec<f64>) + Send + Sync>;
type MutationFn = Box<dyn Fn(&[f64], &Bounds, &mut dyn RngCore) -> Vec<f64> + Send + Sync>;

/// A problem assembled from closures.
///
/// Crossover and mutation default to the identity when not set.
///
/// ```
/// use u_nsga3::nsga3::{Bounds, FnProblem, Nsga3Config, Nsga3Runner};
///
/// let problem = FnProblem::new(|x: &[f64]| vec![x[0], 1.0 - x[0]]);
/// let bounds = Bounds::uniform(1, 0.0, 1.0).unwrap();
/// let config = Nsga3Config::default()
///     .with_population_size(10)
///     .with_generations(3)
///     .with_seed(1);
///
/// let result = Nsga3Runner::run(&problem, &bounds, &config).unwrap();
/// assert!(!result.pareto_front.is_empty());
/// ```
pub struct FnProblem {
    objective: ObjectiveFn,
    crossover: Option<CrossoverFn>,
    mutation: Option<MutationFn>,
}

impl FnProblem {
    /// Creates a problem from an objective closure.
    pub fn new<F>(objective: F) -> Self
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        Self {
            objective: Box::new(objective),
            crossover: None,
            mutation: None,
        }
    }

    /// Creates a problem whose objectives are a list of scalar functions.
    pub fn from_scalar_objectives(objectives: ScalarObjectives) -> Self {
        Self::new(move |x| objectives.evaluate(x))
    }

    /// Sets the crossover closure.
    pub fn with_crossover<F>(mut self, crossover: F) -> Self
    where
        F: Fn(&[f64], &[f64], &mut dyn RngCore) -> (Vec<f64>, Vec<f64>) + Send + Sync + 'static,
    {
        self.crossover = Some(Box::new(crossover));
        self
    }

    /// Sets the mutation closure.
    pub fn with_mutation<F>(mut self, mutation: F) -> Self
    where
        F: Fn(&[f64], &Bounds, &mut dyn RngCore) -> Vec<f64> + Send + Sync + 'static,
    {
        self.mutation = Some(Box::new(mutation));
        self
    }
}

impl Nsga3Problem for FnProblem {
    fn evaluate(&self, x: &[f64]) -> Vec<f64> {
        (self.objective)(x)
    }

    fn crossover<R: Rng>(&self, parent1: &[f64], parent2: &[f64], rng: &mut R) -> (Vec<f64>, Vec<f64>) {
        match &self.crossover {
            Some(f) => f(parent1, parent2, rng),
            None => (parent1.to_vec(), parent2.to_vec()),
        }
    }

    fn mutate<R: Rng>(&self, x: &[f64], bounds: &Bounds, rng: &mut R) -> Vec<f64> {
        match &self.mutation {
            Some(f) => f(x, bounds, rng),
            None => x.to_vec(),
        }
    }
}

/// An ordered list of scalar objective functions, evaluated together as
/// one objective vector.
#[derive(Default)]
pub struct ScalarObjectives {
    functions: Vec<Box<dyn Fn(&[f64]) -> f64 + Send + Sync>>,
}

impl ScalarObjectives {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an objective.
    pub fn with<F>(mut self, f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.functions.push(Box::new(f));
        self
    }

    /// Number of objectives.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if no objective was added.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Evaluates every objective on `x`, in insertion order.
    pub fn evaluate(&self, x: &[f64]) -> Vec<f64> {
        self.functions.iter().map(|f| f(x)).collect()
    }
}
