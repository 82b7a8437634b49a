//! NSGA-III configuration.
//!
//! [`Nsga3Config`] holds all parameters that control the generational loop.

use super::niching::AssociationMetric;
use crate::error::{Nsga3Error, Result};

/// Configuration for NSGA-III.
///
/// # Defaults
///
/// ```
/// use u_nsga3::nsga3::Nsga3Config;
///
/// let config = Nsga3Config::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.generations, 100);
/// assert_eq!(config.divisions, 10);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_nsga3::nsga3::{AssociationMetric, Nsga3Config};
///
/// let config = Nsga3Config::default()
///     .with_population_size(92)
///     .with_generations(250)
///     .with_divisions(12)
///     .with_association(AssociationMetric::PerpendicularDistance)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nsga3Config {
    /// Number of individuals that survive each generation.
    pub population_size: usize,

    /// Number of generations to run. The only stopping condition.
    pub generations: usize,

    /// Das-Dennis divisions used when no reference points are supplied.
    ///
    /// `M` objectives and `p` divisions give `C(M+p-1, p)` points.
    pub divisions: usize,

    /// Externally supplied reference points.
    ///
    /// When set, `divisions` is ignored. Each point must have one
    /// coordinate per objective.
    pub reference_points: Option<Vec<Vec<f64>>>,

    /// Distance used to associate individuals with reference points.
    pub association: AssociationMetric,

    /// Keep the mutated second crossover child as well as the first.
    ///
    /// Off by default: each mating contributes only its first child.
    pub keep_both_children: bool,

    /// Whether to evaluate individuals in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for Nsga3Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 100,
            divisions: 10,
            reference_points: None,
            association: AssociationMetric::PointDistance,
            keep_both_children: false,
            parallel: false,
            seed: None,
        }
    }
}

impl Nsga3Config {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the Das-Dennis division count.
    pub fn with_divisions(mut self, p: usize) -> Self {
        self.divisions = p;
        self
    }

    /// Supplies fixed reference points instead of generating them.
    pub fn with_reference_points(mut self, points: Vec<Vec<f64>>) -> Self {
        self.reference_points = Some(points);
        self
    }

    /// Sets the association metric.
    pub fn with_association(mut self, metric: AssociationMetric) -> Self {
        self.association = metric;
        self
    }

    /// Keeps both crossover children per mating.
    pub fn with_keep_both_children(mut self, keep: bool) -> Self {
        self.keep_both_children = keep;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Reference points are checked against the objective count later,
    /// once the objective count is known.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Nsga3Error::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if self.reference_points.is_none() && self.divisions == 0 {
            return Err(Nsga3Error::InvalidConfig(
                "divisions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
