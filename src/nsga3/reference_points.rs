//! Structured reference points on the unit simplex.
//!
//! Generates the Das-Dennis lattice: every point `(i_1/p, ..., i_M/p)` whose
//! non-negative integer numerators sum to `p`. The set is fixed for a run and
//! never adapted.
//!
//! # References
//!
//! - Das & Dennis (1998), "Normal-Boundary Intersection: A New Method for
//!   Generating the Pareto Surface in Nonlinear Multicriteria Optimization
//!   Problems"
//! - Deb & Jain (2014), "An Evolutionary Many-Objective Optimization
//!   Algorithm Using Reference-Point-Based Nondominated Sorting Approach"

use crate::error::{Nsga3Error, Result};

/// One pending node of the depth-first lattice walk.
struct Frame {
    depth: usize,
    remaining: usize,
    numerators: Vec<usize>,
}

/// Generates all Das-Dennis reference points for `n_objectives` objectives
/// and `divisions` divisions.
///
/// The walk is depth-first over the objective index: each level chooses how
/// much of the remaining budget goes to its coordinate, and the last
/// coordinate takes whatever is left. An explicit stack replaces recursion,
/// and children are pushed in reverse so points come out in ascending
/// lexicographic order of their numerators.
///
/// # Errors
///
/// - [`Nsga3Error::InvalidObjectiveCount`] if `n_objectives == 0`
/// - [`Nsga3Error::InvalidDivisions`] if `divisions == 0`
/// - [`Nsga3Error::TooManyReferencePoints`] if the lattice size overflows
///   or cannot be allocated
///
/// # Example
///
/// ```
/// use u_nsga3::nsga3::generate_reference_points;
///
/// let points = generate_reference_points(3, 2).unwrap();
/// assert_eq!(points.len(), 6);
/// assert!(points.contains(&vec![0.5, 0.0, 0.5]));
/// ```
pub fn generate_reference_points(n_objectives: usize, divisions: usize) -> Result<Vec<Vec<f64>>> {
    if n_objectives == 0 {
        return Err(Nsga3Error::InvalidObjectiveCount(n_objectives));
    }
    if divisions == 0 {
        return Err(Nsga3Error::InvalidDivisions(divisions));
    }

    let too_many = Nsga3Error::TooManyReferencePoints {
        n_objectives,
        divisions,
    };
    let count = reference_point_count(n_objectives, divisions);
    if count == usize::MAX {
        return Err(too_many);
    }
    let mut points: Vec<Vec<f64>> = Vec::new();
    points.try_reserve_exact(count).map_err(|_| too_many)?;

    let total = divisions as f64;
    let mut stack = vec![Frame {
        depth: 0,
        remaining: divisions,
        numerators: Vec::with_capacity(n_objectives),
    }];

    while let Some(frame) = stack.pop() {
        if frame.depth == n_objectives - 1 {
            let mut numerators = frame.numerators;
            numerators.push(frame.remaining);
            points.push(numerators.iter().map(|&k| k as f64 / total).collect());
            continue;
        }

        for share in (0..=frame.remaining).rev() {
            let mut numerators = frame.numerators.clone();
            numerators.push(share);
            stack.push(Frame {
                depth: frame.depth + 1,
                remaining: frame.remaining - share,
                numerators,
            });
        }
    }

    Ok(points)
}

/// Number of lattice points for `n_objectives` and `divisions`:
/// `C(M + p - 1, p)`.
///
/// Returns 0 for zero objectives and saturates at `usize::MAX`.
pub fn reference_point_count(n_objectives: usize, divisions: usize) -> usize {
    if n_objectives == 0 {
        return 0;
    }
    let n = n_objectives as u128 + divisions as u128 - 1;
    let k = divisions.min(n_objectives - 1) as u128;

    let mut result: u128 = 1;
    for i in 0..k {
        result = match result.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return usize::MAX,
        };
    }
    usize::try_from(result).unwrap_or(usize::MAX)
}

/// Checks externally supplied reference points against the objective count.
///
/// Points must be non-empty, each of length `n_objectives`, with finite
/// coordinates. They are not required to lie on the simplex.
pub fn validate_reference_points(points: &[Vec<f64>], n_objectives: usize) -> Result<()> {
    if points.is_empty() {
        return Err(Nsga3Error::InvalidReferencePoints(
            "at least one reference point is required".into(),
        ));
    }
    for (i, point) in points.iter().enumerate() {
        if point.len() != n_objectives {
            return Err(Nsga3Error::InvalidReferencePoints(format!(
                "point {i} has {} coordinates, expected {n_objectives}",
                point.len()
            )));
        }
        if point.iter().any(|c| !c.is_finite()) {
            return Err(Nsga3Error::InvalidReferencePoints(format!(
                "point {i} has a non-finite coordinate"
            )));
        }
    }
    Ok(())
}
