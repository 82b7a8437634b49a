//! NSGA-III: reference-point-guided many-objective evolutionary search.
//!
//! A generic engine for continuous decision vectors. Users define their
//! problem by implementing [`Nsga3Problem`] (or assembling a [`FnProblem`]
//! from closures) and run it with [`Nsga3Runner`].
//!
//! # Key Types
//!
//! - [`Nsga3Config`]: Algorithm parameters (population size, generations, divisions)
//! - [`Nsga3Runner`]: Executes the generational loop
//! - [`Nsga3Result`]: Final Pareto front and run statistics
//! - [`Bounds`]: Per-variable limits of the decision space
//!
//! # Submodules
//!
//! - [`dominance`]: Pareto dominance and fast non-dominated sorting
//! - [`reference_points`]: Das-Dennis reference points on the unit simplex
//! - [`niching`]: Reference-point niching and environmental selection
//! - [`operators`]: SBX crossover and polynomial mutation
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Deb & Jain (2014), *An Evolutionary Many-Objective Optimization Algorithm
//!   Using Reference-Point-Based Nondominated Sorting Approach, Part I*

mod config;
pub mod dominance;
pub mod niching;
pub mod operators;
pub mod reference_points;
mod runner;
mod selection;
mod types;

pub use config::Nsga3Config;
pub use dominance::{dominates, non_dominated_sort, NondominatedSortResult};
pub use niching::{environmental_selection, niching_selection, AssociationMetric};
pub use reference_points::{generate_reference_points, reference_point_count};
pub use runner::{initialize_population, probe_objective_count, Evaluator, Nsga3Result, Nsga3Runner, Phase};
pub use selection::binary_tournament;
pub use types::{Bounds, FnProblem, Nsga3Problem, ScalarObjectives};
