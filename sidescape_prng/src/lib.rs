// Deterministic, portable pseudo-random number generator for world building.
//
// xoshiro256++ (Blackman & Vigna, 2019), seeded through SplitMix64. Flora
// placement, trunk tints and leaf flutter delays all draw from instances of
// `WorldRng`, so a given seed always produces the same forest. Builders take
// their generator by value, which is how callers inject a specific stream.
//
// `fork()` derives an independent child stream from the parent's next output.
// The world uses it to split one seed into a placement stream and a runtime
// reaction stream, so that runtime draws never perturb placement.
//
// **Critical constraint: determinism.** Output depends only on the seed and
// the sequence of calls. No OS entropy, no stdlib hasher state, no floating
// point inside the core generator.

use serde::{Deserialize, Serialize};

/// Seeded xoshiro256++ generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRng {
    s: [u64; 4],
}

impl WorldRng {
    /// Create a generator from a `u64` seed. Equal seeds give equal streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        let mut s = [0u64; 4];
        for word in &mut s {
            *word = splitmix64(&mut sm);
        }
        Self { s }
    }

    /// Derive an independent child generator, advancing this one by one step.
    pub fn fork(&mut self) -> Self {
        Self::new(self.next_u64())
    }

    pub fn next_u64(&mut self) -> u64 {
        let [s0, s1, s2, s3] = self.s;
        let result = s0.wrapping_add(s3).rotate_left(23).wrapping_add(s0);

        let t = s1 << 17;
        let mut next = [s0, s1, s2 ^ s0, s3 ^ s1];
        next[1] ^= next[2];
        next[0] ^= next[3];
        next[2] ^= t;
        next[3] = next[3].rotate_left(45);
        self.s = next;

        result
    }

    /// Upper 32 bits of the next `u64`.
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform `f32` in [0, 1), built from the top 24 bits.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform `f32` in `[low, high)`. Returns `low` when the range is empty.
    ///
    /// Panics if `low > high`.
    pub fn range_f32(&mut self, low: f32, high: f32) -> f32 {
        assert!(low <= high, "range_f32: low must not exceed high");
        if low == high {
            return low;
        }
        low + self.next_f32() * (high - low)
    }

    /// Uniform integer in `[low, high)`, rejection-sampled to avoid modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_i32(&mut self, low: i32, high: i32) -> i32 {
        assert!(low < high, "range_i32: low must be less than high");
        let span = (i64::from(high) - i64::from(low)) as u64;
        let offset = self.below(span);
        (i64::from(low) + offset as i64) as i32
    }

    /// `true` with probability `p`. `p <= 0` is never, `p >= 1` is always.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    fn below(&mut self, span: u64) -> u64 {
        if span.is_power_of_two() {
            return self.next_u64() & (span - 1);
        }
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return r % span;
            }
        }
    }
}

/// SplitMix64 step, used only to expand a seed into the 256-bit state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = WorldRng::new(7);
        let mut b = WorldRng::new(7);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = WorldRng::new(0);
        let mut b = WorldRng::new(1);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn fork_is_deterministic_and_independent() {
        let mut parent_a = WorldRng::new(42);
        let mut parent_b = WorldRng::new(42);
        let mut child_a = parent_a.fork();
        let mut child_b = parent_b.fork();
        for _ in 0..100 {
            assert_eq!(child_a.next_u64(), child_b.next_u64());
        }
        // Drawing from the child leaves the parent stream untouched.
        assert_eq!(parent_a.next_u64(), parent_b.next_u64());
        assert_ne!(parent_a, child_a);
    }

    #[test]
    fn next_f32_stays_in_unit_interval() {
        let mut rng = WorldRng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn range_f32_bounds_and_empty_range() {
        let mut rng = WorldRng::new(3);
        for _ in 0..10_000 {
            let v = rng.range_f32(0.1, 0.8);
            assert!((0.1..0.8).contains(&v), "out of range: {v}");
        }
        assert_eq!(rng.range_f32(0.5, 0.5), 0.5);
    }

    #[test]
    fn range_i32_covers_negative_spans() {
        let mut rng = WorldRng::new(99);
        let mut seen_low = false;
        for _ in 0..10_000 {
            let v = rng.range_i32(-15, 15);
            assert!((-15..15).contains(&v), "out of range: {v}");
            seen_low |= v == -15;
        }
        assert!(seen_low, "lower bound should be reachable");
    }

    #[test]
    fn chance_extremes_and_rate() {
        let mut rng = WorldRng::new(5);
        assert!((0..100).all(|_| !rng.chance(0.0)));
        assert!((0..100).all(|_| rng.chance(1.0)));

        let hits = (0..10_000).filter(|_| rng.chance(0.6)).count();
        let rate = hits as f64 / 10_000.0;
        assert!((0.55..0.65).contains(&rate), "rate was {rate}");
    }

    #[test]
    fn state_survives_json() {
        let mut rng = WorldRng::new(11);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: WorldRng = serde_json::from_str(&json).unwrap();
        for _ in 0..50 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
