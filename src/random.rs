use rand::RngCore;

/// Draws a value uniformly from `0..range`.
///
/// A plain `next_u32() % range` favours the low values whenever `range` does not
/// divide 2^32, so raw draws above the last complete multiple of `range` are thrown
/// away and drawn again.
pub fn balanced_random<R: RngCore + ?Sized>(rng: &mut R, range: u32) -> u32 {
    debug_assert!(range > 0, "range must be positive");
    let max_valid = u32::MAX - ((u64::from(u32::MAX) + 1) % u64::from(range)) as u32;
    let mut raw = rng.next_u32();
    while raw > max_valid {
        raw = rng.next_u32();
    }
    raw % range
}

/// Replays a fixed list of raw draws, cycling once exhausted.
#[cfg(test)]
pub(crate) struct ScriptedRng {
    draws: Vec<u32>,
    position: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub(crate) fn new(draws: Vec<u32>) -> ScriptedRng {
        ScriptedRng { draws, position: 0 }
    }

    pub(crate) fn consumed(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.draws[self.position % self.draws.len()];
        self.position += 1;
        value
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod random_tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_draws_past_the_last_full_multiple() {
        // 2^32 % 10 == 6, so the top six raw values are biased and must be redrawn
        let mut rng = ScriptedRng::new(vec![u32::MAX, u32::MAX - 5, u32::MAX - 6]);
        assert_eq!(balanced_random(&mut rng, 10), (u32::MAX - 6) % 10);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn power_of_two_range_never_redraws() {
        let mut rng = ScriptedRng::new(vec![u32::MAX]);
        assert_eq!(balanced_random(&mut rng, 16), 15);
        assert_eq!(rng.consumed(), 1);
    }

    #[test]
    fn range_of_one_is_always_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(balanced_random(&mut rng, 1), 0);
        }
    }

    #[test]
    fn chi_square_against_uniform() {
        let range = 10u32;
        let trials = 100_000u32;
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts = vec![0u32; range as usize];
        for _ in 0..trials {
            counts[balanced_random(&mut rng, range) as usize] += 1;
        }
        let expected = f64::from(trials) / f64::from(range);
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| {
                let diff = f64::from(observed) - expected;
                diff * diff / expected
            })
            .sum();
        // 9 degrees of freedom, critical value well past p = 0.001 (27.88)
        assert!(chi_square < 40.0, "chi square {} for {:?}", chi_square, counts);
    }

    proptest! {
        #[test]
        fn stays_below_range(seed in any::<u64>(), range in 1..u32::MAX) {
            let mut rng = StdRng::seed_from_u64(seed);
            prop_assert!(balanced_random(&mut rng, range) < range);
        }
    }
}
