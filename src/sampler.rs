use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Number of discrete outcomes every sampler draws from
pub const OUTCOMES: usize = 4;

/// Draws one of four outcomes with probability proportional to its weight.
///
/// Weights are expected to be percentages summing to 100, but any
/// non-negative vector works: the actual sum is used as the normalization
/// base. A vector that cannot form a distribution (all zero) falls back to
/// a uniform draw.
#[derive(Debug, Clone)]
pub struct DirectionSampler {
    dist: Option<WeightedIndex<u64>>,
}

impl DirectionSampler {
    pub fn new(weights: [u32; OUTCOMES]) -> Self {
        Self {
            // Summed as u64 so four u32 weights can never overflow
            dist: WeightedIndex::new(weights.map(u64::from)).ok(),
        }
    }

    /// True when the weights could not be used and draws are uniform
    pub fn is_uniform_fallback(&self) -> bool {
        self.dist.is_none()
    }

    /// Draw an outcome index in `0..4`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match &self.dist {
            Some(dist) => dist.sample(rng),
            None => rng.gen_range(0..OUTCOMES),
        }
    }

    /// Draw one label from an ordered set of four
    pub fn pick<T: Copy, R: Rng + ?Sized>(&self, rng: &mut R, labels: &[T; OUTCOMES]) -> T {
        labels[self.sample(rng)]
    }
}
