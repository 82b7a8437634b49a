//! Pareto dominance and fast non-dominated sorting.
//!
//! Every objective is minimized.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

/// Ranks and fronts produced by [`non_dominated_sort`].
///
/// `ranks[i]` is the index of the front holding solution `i`. Front 0
/// holds the solutions nobody dominates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NondominatedSortResult {
    /// Front index per solution.
    pub ranks: Vec<usize>,

    /// Solution indices per front, best front first.
    ///
    /// Every index appears in exactly one front.
    pub fronts: Vec<Vec<usize>>,
}

impl NondominatedSortResult {
    /// Number of fronts.
    pub fn len(&self) -> usize {
        self.fronts.len()
    }

    /// `true` when the sorted set was empty.
    pub fn is_empty(&self) -> bool {
        self.fronts.is_empty()
    }

    /// Indices of front 0, or an empty slice for an empty input.
    pub fn first_front(&self) -> &[usize] {
        self.fronts.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Outcome of comparing two objective vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// The first vector dominates.
    Left,
    /// The second vector dominates.
    Right,
    /// Incomparable or equal.
    Neither,
}

/// Pareto comparison of `a` against `b`.
///
/// Identical vectors give [`Dominance::Neither`].
pub fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    let (a_wins, b_wins) = a
        .iter()
        .zip(b)
        .fold((false, false), |(aw, bw), (&va, &vb)| (aw || va < vb, bw || vb < va));

    match (a_wins, b_wins) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// `true` when `a` is no worse than `b` everywhere and strictly better
/// somewhere. Never true for `a == b`, and never true both ways.
///
/// ```
/// use u_nsga3::nsga3::dominates;
///
/// assert!(dominates(&[1.0, 2.0], &[1.0, 3.0]));
/// assert!(!dominates(&[1.0, 2.0], &[1.0, 2.0]));
/// assert!(!dominates(&[1.0, 5.0], &[2.0, 4.0]));
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

/// Partitions `objectives` into successive non-dominated fronts.
///
/// One pass over all pairs records, per solution, whom it beats and how
/// many beat it. Solutions beaten by nobody open front 0. Peeling a front
/// releases the solutions it beats; those whose count drops to zero make
/// up the next front. Cost is `O(m * n^2)` for `n` vectors of `m`
/// objectives. An empty input gives an empty result.
///
/// ```
/// use u_nsga3::nsga3::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 1.0],
///     vec![2.0, 2.0],
///     vec![0.0, 0.0],
/// ];
///
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.fronts, vec![vec![2], vec![0], vec![1]]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    debug_assert!(
        objectives.windows(2).all(|w| w[0].len() == w[1].len()),
        "objective vectors differ in length"
    );

    let mut beaten_by = vec![0usize; n];
    let mut beats: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..n {
        for j in (i + 1)..n {
            let (winner, loser) = match dominance_cmp(&objectives[i], &objectives[j]) {
                Dominance::Left => (i, j),
                Dominance::Right => (j, i),
                Dominance::Neither => continue,
            };
            beats[winner].push(loser);
            beaten_by[loser] += 1;
        }
    }

    let mut ranks = vec![0usize; n];
    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| beaten_by[i] == 0).collect();

    while !current.is_empty() {
        let rank = fronts.len();
        let mut next = Vec::new();
        for &i in &current {
            ranks[i] = rank;
            for &j in &beats[i] {
                beaten_by[j] -= 1;
                if beaten_by[j] == 0 {
                    next.push(j);
                }
            }
        }
        fronts.push(std::mem::replace(&mut current, next));
    }

    NondominatedSortResult { ranks, fronts }
}

// ============================================================================
// Tests
// ============================================================================
