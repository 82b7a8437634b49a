//! Real-coded variation operators.
//!
//! - [`sbx_crossover`]: Simulated Binary Crossover, Deb & Agrawal (1995)
//! - [`polynomial_mutation`]: Deb (2001)
//!
//! [`RealCodedProblem`] bundles both with an objective closure.

use super::types::{Bounds, Nsga3Problem};
use rand::Rng;

/// Genes closer than this are copied instead of recombined.
const GENE_EPSILON: f64 = 1e-14;

/// Simulated Binary Crossover (SBX).
///
/// Each gene pair is recombined with probability `per_gene_prob`; pairs
/// that are skipped, or nearly identical, are copied unchanged. Larger
/// `eta` keeps children closer to their parents. No bounds are applied.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn sbx_crossover<R: Rng>(
    parent1: &[f64],
    parent2: &[f64],
    eta: f64,
    per_gene_prob: f64,
    rng: &mut R,
) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");

    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();
    let exponent = 1.0 / (eta + 1.0);

    for i in 0..parent1.len() {
        let (mut x1, mut x2) = (parent1[i], parent2[i]);
        if rng.random::<f64>() >= per_gene_prob || (x1 - x2).abs() <= GENE_EPSILON {
            continue;
        }
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
        }

        let u: f64 = rng.random();
        let beta_q = if u <= 0.5 {
            (2.0 * u).powf(exponent)
        } else {
            (1.0 / (2.0 * (1.0 - u))).powf(exponent)
        };

        child1[i] = 0.5 * ((x1 + x2) - beta_q * (x2 - x1));
        child2[i] = 0.5 * ((x1 + x2) + beta_q * (x2 - x1));
    }

    (child1, child2)
}

/// Polynomial mutation.
///
/// With probability `rate` the vector is mutated; each gene is then
/// perturbed with probability `1/n`. Variables whose bounds are degenerate
/// (`upper <= lower`) are skipped. Mutated genes are clamped to their
/// bounds. Genes beyond the bounds' length are left as they are.
pub fn polynomial_mutation<R: Rng>(
    x: &[f64],
    bounds: &[(f64, f64)],
    eta: f64,
    rate: f64,
    rng: &mut R,
) -> Vec<f64> {
    let mut y = x.to_vec();
    if y.is_empty() || rng.random::<f64>() >= rate {
        return y;
    }

    let per_gene = 1.0 / y.len() as f64;
    let exponent = 1.0 / (eta + 1.0);

    for (yi, &(lo, hi)) in y.iter_mut().zip(bounds) {
        if rng.random::<f64>() >= per_gene {
            continue;
        }
        if hi <= lo {
            continue;
        }

        let span = hi - lo;
        let delta1 = (*yi - lo) / span;
        let delta2 = (hi - *yi) / span;
        let r: f64 = rng.random();

        let delta_q = if r < 0.5 {
            let xy = 1.0 - delta1;
            let val = 2.0 * r + (1.0 - 2.0 * r) * xy.powf(eta + 1.0);
            val.powf(exponent) - 1.0
        } else {
            let xy = 1.0 - delta2;
            let val = 2.0 * (1.0 - r) + 2.0 * (r - 0.5) * xy.powf(eta + 1.0);
            1.0 - val.powf(exponent)
        };

        *yi = (*yi + delta_q * span).clamp(lo, hi);
    }

    y
}

/// Clamps each variable of `x` into its bound. Degenerate bounds are left
/// alone.
pub fn clamp_to_bounds(x: &mut [f64], bounds: &[(f64, f64)]) {
    for (v, &(lo, hi)) in x.iter_mut().zip(bounds) {
        if lo <= hi {
            *v = v.clamp(lo, hi);
        }
    }
}

/// An objective closure paired with SBX crossover and polynomial mutation.
///
/// Defaults: crossover `eta = 20`, per-gene probability `0.5`; mutation
/// `eta = 25`, rate `0.5`.
#[derive(Debug, Clone)]
pub struct RealCodedProblem<F> {
    objective: F,
    /// SBX distribution index.
    pub crossover_eta: f64,
    /// Probability of recombining each gene pair.
    pub crossover_prob: f64,
    /// Polynomial mutation distribution index.
    pub mutation_eta: f64,
    /// Probability of mutating a child at all.
    pub mutation_rate: f64,
}

impl<F> RealCodedProblem<F>
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    /// Wraps `objective` with the default operator parameters.
    pub fn new(objective: F) -> Self {
        Self {
            objective,
            crossover_eta: 20.0,
            crossover_prob: 0.5,
            mutation_eta: 25.0,
            mutation_rate: 0.5,
        }
    }

    /// Sets the SBX distribution index.
    pub fn with_crossover_eta(mut self, eta: f64) -> Self {
        self.crossover_eta = eta.max(0.0);
        self
    }

    /// Sets the per-gene crossover probability.
    pub fn with_crossover_prob(mut self, prob: f64) -> Self {
        self.crossover_prob = prob.clamp(0.0, 1.0);
        self
    }

    /// Sets the polynomial mutation distribution index.
    pub fn with_mutation_eta(mut self, eta: f64) -> Self {
        self.mutation_eta = eta.max(0.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }
}

impl<F> Nsga3Problem for RealCodedProblem<F>
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    fn evaluate(&self, x: &[f64]) -> Vec<f64> {
        (self.objective)(x)
    }

    fn crossover<R: Rng>(&self, parent1: &[f64], parent2: &[f64], rng: &mut R) -> (Vec<f64>, Vec<f64>) {
        sbx_crossover(parent1, parent2, self.crossover_eta, self.crossover_prob, rng)
    }

    /// Mutates `x` and clamps every variable, since SBX children may land
    /// outside the bounds.
    fn mutate<R: Rng>(&self, x: &[f64], bounds: &Bounds, rng: &mut R) -> Vec<f64> {
        let mut y = polynomial_mutation(x, bounds.as_slice(), self.mutation_eta, self.mutation_rate, rng);
        clamp_to_bounds(&mut y, bounds.as_slice());
        y
    }
}
