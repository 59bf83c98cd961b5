use rand::Rng;

/// Fisher–Yates shuffle.
///
/// Walks from the last index down to 1 and swaps each slot with a uniformly
/// chosen slot in `0..=i`, which yields every one of the `n!` orderings with
/// equal probability given a uniform `rng`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [0_usize, 1, 2, 5, 64] {
            let original: Vec<usize> = (0..n).collect();
            let mut items = original.clone();
            shuffle(&mut items, &mut rng);
            let mut sorted = items.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, original, "n = {n}");
        }
    }

    #[test]
    fn same_seed_same_order() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        shuffle(&mut a, &mut StdRng::seed_from_u64(42));
        shuffle(&mut b, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn all_orderings_are_roughly_equally_likely() {
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 60_000;
        let mut counts: HashMap<[u8; 3], u32> = HashMap::new();
        for _ in 0..trials {
            let mut items = [0_u8, 1, 2];
            shuffle(&mut items, &mut rng);
            *counts.entry(items).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        let expected = trials / 6;
        for (perm, count) in counts {
            let diff = count.abs_diff(expected);
            assert!(diff < expected / 10, "{perm:?} seen {count} times");
        }
    }

    #[test]
    fn each_position_sees_each_element_uniformly() {
        let mut rng = StdRng::seed_from_u64(99);
        let n = 8;
        let trials = 40_000;
        let mut grid = vec![vec![0_u32; n]; n];
        for _ in 0..trials {
            let mut items: Vec<usize> = (0..n).collect();
            shuffle(&mut items, &mut rng);
            for (pos, item) in items.into_iter().enumerate() {
                grid[pos][item] += 1;
            }
        }

        let expected = trials / n as u32;
        for row in grid {
            for count in row {
                assert!(count.abs_diff(expected) < expected / 10);
            }
        }
    }
}
