//! Gene vector operations for the genetic algorithm.
//!
//! These are the positional operators [`Population`](crate::Population) applies to
//! each candidate's gene values. They work on plain `f64` slices and know nothing
//! about tags or fitness, which keeps them easy to test in isolation.
//!
//! # Operations
//!
//! - **Crossover**: [`single_point`] splices two parents at a cut point
//! - **Classic mutation**: [`add_growth`] adds one shared delta to random genes
//! - **Offset mutation**: [`swap_offsets`] exchanges the values of random gene pairs
//!
//! All random indices are drawn with replacement: the same gene may be hit more than
//! once in a single pass.

use rand::Rng;

/// Splices two parents at `cut`.
///
/// Returns `(mother[..cut] ++ father[cut..], father[..cut] ++ mother[cut..])`.
///
/// # Panics
///
/// Panics if the parents have different lengths or `cut` is out of bounds.
///
/// # Examples
///
/// ```
/// use nnga_genetic::genes;
///
/// let (a, b) = genes::single_point(&[1.0, 1.0, 1.0, 1.0], &[2.0, 2.0, 2.0, 2.0], 1);
/// assert_eq!(a, [1.0, 2.0, 2.0, 2.0]);
/// assert_eq!(b, [2.0, 1.0, 1.0, 1.0]);
/// ```
#[must_use]
pub fn single_point(mother: &[f64], father: &[f64], cut: usize) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(mother.len(), father.len());
    assert!(cut <= mother.len());
    let splice = |head: &[f64], tail: &[f64]| {
        let mut child = Vec::with_capacity(head.len());
        child.extend_from_slice(&head[..cut]);
        child.extend_from_slice(&tail[cut..]);
        child
    };
    (splice(mother, father), splice(father, mother))
}

/// Draws the additive delta for one classic mutation: `(U(0, 1) - 0.5) × magnitude`.
pub fn growth_delta<R>(magnitude: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    (rng.random::<f64>() - 0.5) * magnitude
}

/// Draws how many edits a mutated candidate receives, uniformly from `[0, max)`.
///
/// Returns zero without consuming randomness when `max` is zero.
pub fn mutation_count<R>(max: usize, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    if max == 0 { 0 } else { rng.random_range(0..max) }
}

/// Classic mutation: adds `delta` to up to `max_genes - 1` randomly chosen genes.
///
/// Returns the number of additions made.
pub fn add_growth<R>(values: &mut [f64], delta: f64, max_genes: usize, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    if values.is_empty() {
        return 0;
    }
    let count = mutation_count(max_genes, rng);
    for _ in 0..count {
        let index = rng.random_range(0..values.len());
        values[index] += delta;
    }
    count
}

/// Offset mutation: swaps the values of up to `max_genes - 1` random index pairs.
///
/// Both indices are drawn from `[0, N - 1)`, so the last gene never moves. The
/// multiset of values is preserved. Returns the number of swaps made.
pub fn swap_offsets<R>(values: &mut [f64], max_genes: usize, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    if values.len() < 2 {
        return 0;
    }
    let bound = values.len() - 1;
    let count = mutation_count(max_genes, rng);
    for _ in 0..count {
        let target = rng.random_range(0..bound);
        let neighbour = rng.random_range(0..bound);
        values.swap(target, neighbour);
    }
    count
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    fn random_values(rng: &mut Pcg64, len: usize) -> Vec<f64> {
        (0..len).map(|_| rng.random_range(-5.0..5.0)).collect()
    }

    #[test]
    fn test_single_point_children_inherit_from_both_parents() {
        let mother = [0.0, 1.0, 2.0, 3.0, 4.0];
        let father = [10.0, 11.0, 12.0, 13.0, 14.0];
        for cut in 1..=3 {
            let (a, b) = single_point(&mother, &father, cut);
            assert_eq!(a[..cut], mother[..cut]);
            assert_eq!(a[cut..], father[cut..]);
            assert_eq!(b[..cut], father[..cut]);
            assert_eq!(b[cut..], mother[cut..]);
        }
    }

    #[test]
    #[should_panic(expected = "assertion")]
    fn test_single_point_rejects_length_mismatch() {
        let _ = single_point(&[0.0; 3], &[0.0; 4], 1);
    }

    #[test]
    fn test_growth_delta_range() {
        let mut rng = Pcg64::seed_from_u64(3);
        for _ in 0..1000 {
            let delta = growth_delta(2.0, &mut rng);
            assert!((-1.0..1.0).contains(&delta));
        }
        assert_eq!(growth_delta(0.0, &mut rng), 0.0);
    }

    #[test]
    fn test_mutation_count_zero_bound_consumes_nothing() {
        let mut rng = Pcg64::seed_from_u64(5);
        let mut reference = rng.clone();
        assert_eq!(mutation_count(0, &mut rng), 0);
        assert_eq!(rng.random::<u64>(), reference.random::<u64>());
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_add_growth_adds_single_delta() {
        let mut rng = Pcg64::seed_from_u64(7);
        for _ in 0..50 {
            let mut values = vec![0.0; 20];
            let delta = 0.25;
            let additions = add_growth(&mut values, delta, 10, &mut rng);
            assert!(additions < 10);

            // every gene was hit a whole number of times with the same delta
            let mut hits = 0.0;
            for &value in &values {
                let k = value / delta;
                assert_eq!(k.fract(), 0.0, "{value} is not a multiple of {delta}");
                assert!(k >= 0.0);
                hits += k;
            }
            assert_eq!(hits, additions as f64);
        }
    }

    #[test]
    fn test_add_growth_without_budget_is_noop() {
        let mut rng = Pcg64::seed_from_u64(11);
        let original = random_values(&mut rng, 8);
        let mut values = original.clone();
        assert_eq!(add_growth(&mut values, 1.0, 0, &mut rng), 0);
        assert_eq!(values, original);
    }

    #[test]
    fn test_swap_offsets_preserves_multiset() {
        let mut rng = Pcg64::seed_from_u64(13);
        for _ in 0..50 {
            let original = random_values(&mut rng, 12);
            let mut values = original.clone();
            swap_offsets(&mut values, 12, &mut rng);

            let mut before = original.clone();
            let mut after = values.clone();
            before.sort_by(f64::total_cmp);
            after.sort_by(f64::total_cmp);
            assert_eq!(before, after);

            assert_eq!(values.last(), original.last());
        }
    }

    #[test]
    fn test_swap_offsets_short_vectors_are_untouched() {
        let mut rng = Pcg64::seed_from_u64(17);
        let mut values = vec![1.0];
        assert_eq!(swap_offsets(&mut values, 5, &mut rng), 0);
        assert_eq!(values, [1.0]);
        assert_eq!(swap_offsets(&mut [], 5, &mut rng), 0);
    }
}
