#![forbid(unsafe_code)]

//! Uniform sampling without replacement for the recommendations view.

use rand::Rng;
use rand::seq::SliceRandom;

/// Draw up to `amount` elements from `pool` uniformly without replacement.
///
/// Returns `min(amount, pool.len())` elements in shuffled order. The sample
/// is freshly randomized on every call; repeat calls with the same pool and
/// a live generator produce different draws.
pub(crate) fn draw<T: Clone, R: Rng + ?Sized>(pool: &[T], amount: usize, rng: &mut R) -> Vec<T> {
    let mut scratch: Vec<T> = pool.to_vec();
    let take = amount.min(scratch.len());
    let (picked, _rest) = scratch.partial_shuffle(rng, take);
    picked.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn draw_is_bounded_by_amount() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool: Vec<u32> = (0..10).collect();
        assert_eq!(draw(&pool, 3, &mut rng).len(), 3);
    }

    #[test]
    fn draw_is_bounded_by_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = vec![7u32, 8];
        let got = draw(&pool, 3, &mut rng);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn draw_from_empty_pool_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool: Vec<u32> = Vec::new();
        assert!(draw(&pool, 3, &mut rng).is_empty());
    }

    #[test]
    fn draw_has_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(99);
        let pool: Vec<u32> = (0..20).collect();
        for _ in 0..50 {
            let mut got = draw(&pool, 3, &mut rng);
            got.sort_unstable();
            got.dedup();
            assert_eq!(got.len(), 3, "sample must be without replacement");
        }
    }

    #[test]
    fn draw_is_subset_of_pool() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool: Vec<u32> = (100..110).collect();
        for item in draw(&pool, 3, &mut rng) {
            assert!(pool.contains(&item));
        }
    }

    #[test]
    fn same_seed_same_draw() {
        let pool: Vec<u32> = (0..10).collect();
        let a = draw(&pool, 3, &mut StdRng::seed_from_u64(42));
        let b = draw(&pool, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
