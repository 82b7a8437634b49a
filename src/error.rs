//! Error type for NSGA-III runs.
//!
//! Every failure is a deterministic function of the input: nothing here is
//! transient and nothing is retried.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Nsga3Error>;

/// Errors raised while validating or running an NSGA-III optimization.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Nsga3Error {
    /// Returned when the bounds list has no variables.
    #[error("bounds must describe at least one decision variable")]
    EmptyBounds,

    /// Returned when a bound is NaN or infinite.
    #[error("bound {index} is not finite: ({lower}, {upper})")]
    NonFiniteBounds {
        /// Variable index of the offending bound.
        index: usize,
        /// The lower bound value.
        lower: f64,
        /// The upper bound value.
        upper: f64,
    },

    /// Returned when a configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Returned when reference points are requested for zero objectives.
    #[error("number of objectives must be at least 1, got {0}")]
    InvalidObjectiveCount(usize),

    /// Returned when reference points are requested with zero divisions.
    #[error("number of divisions must be at least 1, got {0}")]
    InvalidDivisions(usize),

    /// Returned when the lattice for `(n_objectives, divisions)` cannot be
    /// held in memory.
    #[error("{n_objectives} objectives with {divisions} divisions yield too many reference points")]
    TooManyReferencePoints {
        /// Requested objective count.
        n_objectives: usize,
        /// Requested division count.
        divisions: usize,
    },

    /// Returned when externally supplied reference points are unusable.
    #[error("invalid reference points: {0}")]
    InvalidReferencePoints(String),

    /// Returned when the objective probe yields an empty vector.
    #[error("objective function returned an empty objective vector")]
    EmptyObjective,

    /// Returned when an evaluation disagrees with the probed objective count.
    #[error(
        "objective shape mismatch: expected {expected} objectives but individual {index} produced {got}"
    )]
    ObjectiveShape {
        /// Position of the individual in the evaluated population.
        index: usize,
        /// Objective count learned from the probe.
        expected: usize,
        /// Objective count actually returned.
        got: usize,
    },

    /// Returned when an initial population is too small to run a tournament.
    #[error("initial population has {got} individuals, at least {minimum} required")]
    InitialPopulationSize {
        /// Smallest accepted population.
        minimum: usize,
        /// Number of individuals supplied.
        got: usize,
    },

    /// Returned when a decision vector does not match the bounds dimensionality.
    #[error("decision vector {index} has {got} variables, expected {expected}")]
    DecisionDimension {
        /// Position of the individual.
        index: usize,
        /// Number of variables described by the bounds.
        expected: usize,
        /// Number of variables in the vector.
        got: usize,
    },
}
