// ============================================================
// Layer 4 — Train/Evaluation Splitter
// ============================================================
// Shuffles samples with a SEEDED generator and cuts them into
//   - a training partition (scaler + classifier are fitted here)
//   - an evaluation partition (only used for the advisory report)
//
// The same input and seed always produce the same split, so
// retraining on an unchanged dataset is reproducible.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom over a
// StdRng seeded from a u64.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Default seed for reproducible splits
pub const DEFAULT_SEED: u64 = 42;

/// Shuffle `samples` with `seed` and split into (train, eval).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `seed`           - Shuffle seed
pub fn split_train_eval<T>(mut samples: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    // The evaluation side is rounded UP: 12 samples at 0.8 give
    // ceil(2.4) = 3 evaluation rows and 9 training rows. The small
    // offset keeps 50 * (1 - 0.7) = 15.000000000000002 at 15.
    let total    = samples.len();
    let raw_eval = (total as f64) * (1.0 - train_fraction);
    let n_eval   = (raw_eval - 1e-9).ceil().max(0.0) as usize;
    let split_at = total.saturating_sub(n_eval);

    let eval = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split (seed {}): {} training, {} evaluation",
        seed,
        samples.len(),
        eval.len(),
    );

    (samples, eval)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, eval)     = split_train_eval(items, 0.8, DEFAULT_SEED);
        assert_eq!(train.len(), 80);
        assert_eq!(eval.len(),  20);
    }

    #[test]
    fn test_evaluation_share_rounds_up() {
        for (n, train_len) in [(7usize, 5usize), (12, 9), (10, 8), (1, 0), (3, 2)] {
            let (train, eval) = split_train_eval((0..n).collect::<Vec<_>>(), 0.8, DEFAULT_SEED);
            assert_eq!(train.len(), train_len, "n = {n}");
            assert_eq!(eval.len(), n - train_len, "n = {n}");
        }
    }

    #[test]
    fn test_full_fraction_keeps_everything() {
        let (train, eval) = split_train_eval((0..9).collect::<Vec<u8>>(), 1.0, DEFAULT_SEED);
        assert_eq!(train.len(), 9);
        assert!(eval.is_empty());
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, eval)     = split_train_eval(items, 0.7, DEFAULT_SEED);
        assert_eq!(eval.len(), 15);
        let mut all: Vec<usize> = train.into_iter().chain(eval).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_eval((0..200).collect::<Vec<u32>>(), 0.8, 7);
        let b = split_train_eval((0..200).collect::<Vec<u32>>(), 0.8, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_order() {
        let (a, _) = split_train_eval((0..200).collect::<Vec<u32>>(), 0.8, 1);
        let (b, _) = split_train_eval((0..200).collect::<Vec<u32>>(), 0.8, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, eval)     = split_train_eval(items, 0.8, DEFAULT_SEED);
        assert!(train.is_empty());
        assert!(eval.is_empty());
    }
}
