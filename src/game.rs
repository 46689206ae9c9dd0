//! Weighted prize board.
//!
//! The bin a ball lands in is a server-chosen outcome, not a simulated
//! trajectory: each bin carries a weight that falls off with the square of
//! its distance from the center, so the middle (lowest-value) bin lands most
//! often and the lucrative edges stay rare.

use rand::Rng;

/// Default bin values, symmetric around the center.
pub const DEFAULT_BINS: [u32; 11] = [100, 75, 50, 35, 20, 10, 20, 35, 50, 75, 100];

/// Immutable prize table with precomputed selection weights.
#[derive(Debug, Clone)]
pub struct PrizeBoard {
    bins: Vec<u32>,
    weights: Vec<f64>,
    total_weight: f64,
}

impl PrizeBoard {
    /// Builds a board from bin values. `bins` must be non-empty; the config
    /// layer validates this before construction.
    pub fn new(bins: Vec<u32>) -> Self {
        assert!(!bins.is_empty(), "prize board needs at least one bin");

        let mid = (bins.len() as f64 - 1.0) / 2.0;
        let weights: Vec<f64> = (0..bins.len())
            .map(|i| 1.0 / (1.0 + (i as f64 - mid).powi(2)))
            .collect();
        let total_weight = weights.iter().sum();

        Self {
            bins,
            weights,
            total_weight,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn values(&self) -> &[u32] {
        &self.bins
    }

    /// Draws a landing bin, returning `(prize value, bin index)`.
    ///
    /// Walks the bins subtracting weights from a uniform draw in
    /// `[0, total_weight)`. The last bin absorbs any floating-point
    /// remainder so the index never runs off the table.
    pub fn drop_ball<R: Rng + ?Sized>(&self, rng: &mut R) -> (u32, usize) {
        let mut r = rng.gen_range(0.0..self.total_weight);
        let mut idx = 0;
        while idx + 1 < self.weights.len() && r > self.weights[idx] {
            r -= self.weights[idx];
            idx += 1;
        }
        (self.bins[idx], idx)
    }
}

impl Default for PrizeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_BINS.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_weights_follow_inverse_square_falloff() {
        let board = PrizeBoard::default();

        // Center bin has weight 1, neighbours 1/2, edges 1/26.
        assert_eq!(board.weights[5], 1.0);
        assert_eq!(board.weights[4], 0.5);
        assert_eq!(board.weights[6], 0.5);
        assert_eq!(board.weights[0], 1.0 / 26.0);
        assert_eq!(board.weights[10], 1.0 / 26.0);

        // Symmetric around the center.
        for d in 0..=5 {
            assert_eq!(board.weights[5 - d], board.weights[5 + d]);
        }
    }

    #[test]
    fn test_drop_stays_in_bounds() {
        let board = PrizeBoard::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let (value, idx) = board.drop_ball(&mut rng);
            assert!(idx < board.bin_count());
            assert_eq!(value, board.values()[idx]);
        }
    }

    #[test]
    fn test_center_bin_dominates_edges() {
        let board = PrizeBoard::default();
        let mut rng = StdRng::seed_from_u64(42);

        let mut counts = vec![0u32; board.bin_count()];
        for _ in 0..100_000 {
            let (_, idx) = board.drop_ball(&mut rng);
            counts[idx] += 1;
        }

        // Center weight is 26x an edge weight; even a loose margin holds.
        assert!(counts[5] > counts[0] * 5);
        assert!(counts[5] > counts[10] * 5);
        // And the center beats every other bin outright.
        for (idx, count) in counts.iter().enumerate() {
            if idx != 5 {
                assert!(counts[5] > *count, "bin {} beat the center", idx);
            }
        }
    }

    #[test]
    fn test_single_bin_board() {
        let board = PrizeBoard::new(vec![50]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(board.drop_ball(&mut rng), (50, 0));
    }
}
