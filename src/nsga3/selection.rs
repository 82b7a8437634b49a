//! Mating selection.
//!
//! Parents are chosen by binary tournament on Pareto rank. Ranks come from
//! the current generation's sort, computed before any offspring exist.

use rand::Rng;

/// Binary tournament on Pareto rank.
///
/// Draws two distinct indices uniformly, returns the one with the lower
/// rank, and flips a fair coin on a tie. A single-individual population
/// always yields index 0.
///
/// # Panics
/// Panics if `ranks` is empty.
pub fn binary_tournament<R: Rng>(ranks: &[usize], rng: &mut R) -> usize {
    let n = ranks.len();
    assert!(n > 0, "cannot select from empty population");
    if n == 1 {
        return 0;
    }

    let a = rng.random_range(0..n);
    let mut b = rng.random_range(0..n - 1);
    if b >= a {
        b += 1;
    }

    match ranks[a].cmp(&ranks[b]) {
        std::cmp::Ordering::Less => a,
        std::cmp::Ordering::Greater => b,
        std::cmp::Ordering::Equal => {
            if rng.random_bool(0.5) {
                a
            } else {
                b
            }
        }
    }
}
