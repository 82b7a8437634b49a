//! Reference-point niching and environmental selection.
//!
//! Environmental selection truncates a combined population to the target
//! size: whole fronts are accepted in rank order, and the first front that
//! would overflow (the *splitting front*) is thinned by niching so that
//! survivors spread across the reference directions.
//!
//! # Niching
//!
//! 1. Translate the splitting front by its ideal point (per-objective min)
//! 2. Divide by the per-objective max of the translated values; a zero max
//!    is left unscaled
//! 3. Associate every point with its nearest reference point
//! 4. Repeatedly serve the least-occupied reference point that still has
//!    an unselected associate, taking its closest associate; when no such
//!    reference point exists, pick a random unselected member instead
//!
//! # References
//!
//! - Deb & Jain (2014), "An Evolutionary Many-Objective Optimization
//!   Algorithm Using Reference-Point-Based Nondominated Sorting Approach"

use rand::Rng;

/// Distance used to associate normalized objective vectors with
/// reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssociationMetric {
    /// Euclidean distance to the reference point itself.
    #[default]
    PointDistance,

    /// Perpendicular distance to the line through the origin and the
    /// reference point, as in the canonical NSGA-III paper.
    PerpendicularDistance,
}

impl AssociationMetric {
    /// Distance from `point` to `reference` under this metric.
    pub fn distance(self, point: &[f64], reference: &[f64]) -> f64 {
        match self {
            AssociationMetric::PointDistance => point
                .iter()
                .zip(reference)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt(),
            AssociationMetric::PerpendicularDistance => {
                let norm_sq: f64 = reference.iter().map(|w| w * w).sum();
                if norm_sq == 0.0 {
                    return point.iter().map(|a| a * a).sum::<f64>().sqrt();
                }
                let scale = point.iter().zip(reference).map(|(a, w)| a * w).sum::<f64>() / norm_sq;
                point
                    .iter()
                    .zip(reference)
                    .map(|(a, w)| {
                        let d = a - scale * w;
                        d * d
                    })
                    .sum::<f64>()
                    .sqrt()
            }
        }
    }
}

/// Min-max normalizes a set of objective vectors.
///
/// Each vector is translated by the ideal point and divided by the
/// per-objective maximum of the translated set. Objectives whose maximum is
/// zero keep a divisor of 1.
pub fn normalize(objectives: &[&[f64]]) -> Vec<Vec<f64>> {
    let Some(first) = objectives.first() else {
        return Vec::new();
    };
    let m = first.len();

    let mut ideal = vec![f64::INFINITY; m];
    for obj in objectives {
        for (lo, &v) in ideal.iter_mut().zip(obj.iter()) {
            *lo = lo.min(v);
        }
    }

    let translated: Vec<Vec<f64>> = objectives
        .iter()
        .map(|obj| obj.iter().zip(&ideal).map(|(v, lo)| v - lo).collect())
        .collect();

    let mut scale = vec![f64::NEG_INFINITY; m];
    for t in &translated {
        for (hi, &v) in scale.iter_mut().zip(t.iter()) {
            *hi = hi.max(v);
        }
    }
    for hi in &mut scale {
        if *hi == 0.0 {
            *hi = 1.0;
        }
    }

    translated
        .into_iter()
        .map(|t| t.iter().zip(&scale).map(|(v, s)| v / s).collect())
        .collect()
}

/// Associates each point with its nearest reference point.
///
/// Returns `(reference index, distance)` per point. Distance ties go to the
/// lower reference index.
pub fn associate(
    points: &[Vec<f64>],
    reference_points: &[Vec<f64>],
    metric: AssociationMetric,
) -> Vec<(usize, f64)> {
    points
        .iter()
        .map(|point| {
            let mut best = (0usize, f64::INFINITY);
            for (r, reference) in reference_points.iter().enumerate() {
                let d = metric.distance(point, reference);
                if d < best.1 {
                    best = (r, d);
                }
            }
            best
        })
        .collect()
}

/// Selects `k` members of `front` by reference-point niching.
///
/// `front` holds indices into `objectives`. Returns at most `k` indices
/// drawn from `front`, exactly `k` whenever `k <= front.len()`.
///
/// Among reference points with the lowest occupancy, the one with the
/// lowest index that still has an unselected associate is served, and its
/// nearest associate is taken (distance ties keep front order). When none
/// of them has an associate left, a uniformly random unselected member of
/// the front is taken and occupancies are left unchanged.
pub fn niching_selection<R: Rng>(
    front: &[usize],
    objectives: &[Vec<f64>],
    reference_points: &[Vec<f64>],
    k: usize,
    metric: AssociationMetric,
    rng: &mut R,
) -> Vec<usize> {
    let k = k.min(front.len());
    if k == 0 {
        return Vec::new();
    }

    let front_objs: Vec<&[f64]> = front.iter().map(|&i| objectives[i].as_slice()).collect();
    let normalized = normalize(&front_objs);
    let associations = associate(&normalized, reference_points, metric);

    // (position in front, distance), nearest first
    let mut niches: Vec<Vec<(usize, f64)>> = vec![Vec::new(); reference_points.len()];
    for (pos, &(r, d)) in associations.iter().enumerate() {
        if let Some(niche) = niches.get_mut(r) {
            niche.push((pos, d));
        }
    }
    for niche in &mut niches {
        niche.sort_by(|a, b| a.1.total_cmp(&b.1));
    }

    let mut occupancy = vec![0usize; reference_points.len()];
    let mut cursor = vec![0usize; reference_points.len()];
    let mut taken = vec![false; front.len()];
    let mut selected = Vec::with_capacity(k);

    while selected.len() < k {
        let min_count = occupancy.iter().copied().min().unwrap_or(0);

        let mut pick = None;
        for r in 0..niches.len() {
            if occupancy[r] != min_count {
                continue;
            }
            while cursor[r] < niches[r].len() && taken[niches[r][cursor[r]].0] {
                cursor[r] += 1;
            }
            if let Some(&(pos, _)) = niches[r].get(cursor[r]) {
                pick = Some((r, pos));
                break;
            }
        }

        match pick {
            Some((r, pos)) => {
                taken[pos] = true;
                occupancy[r] += 1;
                selected.push(front[pos]);
            }
            None => {
                let remaining: Vec<usize> = (0..front.len()).filter(|&p| !taken[p]).collect();
                if remaining.is_empty() {
                    break;
                }
                let pos = remaining[rng.random_range(0..remaining.len())];
                log::trace!(
                    "niche fallback: no associate left at occupancy {min_count}, picked {}",
                    front[pos]
                );
                taken[pos] = true;
                selected.push(front[pos]);
            }
        }
    }

    selected
}

/// Environmental selection: keeps `target` indices out of a ranked
/// population.
///
/// Whole fronts are accepted while the running total stays within
/// `target`; the first overflowing front is thinned by
/// [`niching_selection`] and all later fronts are dropped. The result has
/// exactly `target` indices whenever the fronts cover at least `target`
/// individuals, and all of them otherwise.
pub fn environmental_selection<R: Rng>(
    objectives: &[Vec<f64>],
    fronts: &[Vec<usize>],
    reference_points: &[Vec<f64>],
    target: usize,
    metric: AssociationMetric,
    rng: &mut R,
) -> Vec<usize> {
    let mut survivors = Vec::with_capacity(target);

    for front in fronts {
        if survivors.len() + front.len() <= target {
            survivors.extend_from_slice(front);
            continue;
        }
        let k = target - survivors.len();
        if k > 0 {
            log::trace!(
                "splitting front of {} individuals, niching {k} survivors",
                front.len()
            );
            survivors.extend(niching_selection(
                front,
                objectives,
                reference_points,
                k,
                metric,
                rng,
            ));
        }
        break;
    }

    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nsga3::non_dominated_sort;
    use crate::random::create_rng;

    fn two_axes() -> Vec<Vec<f64>> {
        vec![vec![0.0, 1.0], vec![1.0, 0.0]]
    }

    #[test]
    fn test_point_distance() {
        let d = AssociationMetric::PointDistance.distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_perpendicular_distance() {
        // (1, 1) against the x-axis direction: distance 1 to the line
        let d = AssociationMetric::PerpendicularDistance.distance(&[1.0, 1.0], &[1.0, 0.0]);
        assert!((d - 1.0).abs() < 1e-12);
        // a point on the line has zero distance regardless of its length
        let d = AssociationMetric::PerpendicularDistance.distance(&[2.0, 2.0], &[0.5, 0.5]);
        assert!(d.abs() < 1e-12);
    }

    #[test]
    fn test_perpendicular_distance_zero_reference() {
        let d = AssociationMetric::PerpendicularDistance.distance(&[3.0, 4.0], &[0.0, 0.0]);
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_min_max() {
        let a = [2.0, 10.0];
        let b = [4.0, 20.0];
        let c = [3.0, 15.0];
        let norm = normalize(&[&a, &b, &c]);
        assert_eq!(norm, vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.5, 0.5]]);
    }

    #[test]
    fn test_normalize_constant_objective_is_not_scaled() {
        let a = [1.0, 7.0];
        let b = [3.0, 7.0];
        let norm = normalize(&[&a, &b]);
        assert_eq!(norm, vec![vec![0.0, 0.0], vec![1.0, 0.0]]);
    }

    #[test]
    fn test_associate_nearest() {
        let points = vec![vec![0.1, 0.9], vec![0.8, 0.2]];
        let assoc = associate(&points, &two_axes(), AssociationMetric::PointDistance);
        assert_eq!(assoc[0].0, 0);
        assert_eq!(assoc[1].0, 1);
    }

    #[test]
    fn test_niching_balances_references() {
        let objs = vec![
            vec![0.0, 10.0],
            vec![1.0, 9.0],
            vec![9.0, 1.0],
            vec![10.0, 0.0],
        ];
        let front = vec![0, 1, 2, 3];
        let mut rng = create_rng(1);

        let two = niching_selection(&front, &objs, &two_axes(), 2, AssociationMetric::default(), &mut rng);
        assert_eq!(two, vec![0, 3]);

        let three = niching_selection(&front, &objs, &two_axes(), 3, AssociationMetric::default(), &mut rng);
        assert_eq!(three, vec![0, 3, 1]);
    }

    #[test]
    fn test_niching_falls_back_when_niche_is_empty() {
        let objs = vec![vec![0.0, 10.0], vec![10.0, 0.0], vec![1.0, 9.0]];
        let refs = vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]];
        let front = vec![0, 1, 2];
        let mut rng = create_rng(5);

        let selected = niching_selection(&front, &objs, &refs, 3, AssociationMetric::default(), &mut rng);
        assert_eq!(selected, vec![0, 1, 2]);
    }

    #[test]
    fn test_niching_never_exceeds_front() {
        let objs = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let mut rng = create_rng(3);
        let selected = niching_selection(&[0, 1], &objs, &two_axes(), 5, AssociationMetric::default(), &mut rng);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_niching_without_reference_points_uses_fallback() {
        let objs = vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]];
        let mut rng = create_rng(9);
        let mut selected = niching_selection(&[0, 1, 2], &objs, &[], 2, AssociationMetric::default(), &mut rng);
        assert_eq!(selected.len(), 2);
        selected.sort_unstable();
        selected.dedup();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_environmental_selection_accepts_whole_fronts() {
        let objs = vec![
            vec![1.0, 1.0], // front 0
            vec![2.0, 2.0], // front 1
            vec![3.0, 3.0], // front 2
            vec![0.5, 4.0], // front 0
        ];
        let sorted = non_dominated_sort(&objs);
        let mut rng = create_rng(0);
        let mut survivors = environmental_selection(
            &objs,
            &sorted.fronts,
            &two_axes(),
            3,
            AssociationMetric::default(),
            &mut rng,
        );
        survivors.sort_unstable();
        assert_eq!(survivors, vec![0, 1, 3]);
    }

    #[test]
    fn test_environmental_selection_splits_front() {
        let objs = vec![
            vec![0.0, 10.0],
            vec![1.0, 9.0],
            vec![9.0, 1.0],
            vec![10.0, 0.0],
            vec![11.0, 11.0],
        ];
        let sorted = non_dominated_sort(&objs);
        let mut rng = create_rng(0);
        let survivors = environmental_selection(
            &objs,
            &sorted.fronts,
            &two_axes(),
            2,
            AssociationMetric::default(),
            &mut rng,
        );
        assert_eq!(survivors, vec![0, 3]);
    }

    #[test]
    fn test_environmental_selection_exact_fit_stops() {
        let objs = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![2.0, 2.0]];
        let sorted = non_dominated_sort(&objs);
        let mut rng = create_rng(0);
        let survivors = environmental_selection(
            &objs,
            &sorted.fronts,
            &two_axes(),
            2,
            AssociationMetric::default(),
            &mut rng,
        );
        assert_eq!(survivors, vec![0, 1]);
    }

    #[test]
    fn test_environmental_selection_size_invariant() {
        let mut rng = create_rng(42);
        let refs = crate::nsga3::generate_reference_points(3, 4).unwrap();
        for target in [1usize, 5, 17, 30] {
            let objs: Vec<Vec<f64>> = (0..2 * target.max(10))
                .map(|_| (0..3).map(|_| rng.random_range(0.0..1.0)).collect())
                .collect();
            let sorted = non_dominated_sort(&objs);
            let survivors = environmental_selection(
                &objs,
                &sorted.fronts,
                &refs,
                target,
                AssociationMetric::PerpendicularDistance,
                &mut rng,
            );
            assert_eq!(survivors.len(), target);
            let mut unique = survivors.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), target);
        }
    }
}
