use serde::Serialize;

/// Highest goal count with its own bucket; everything above lands in the tail.
pub const MAX_GOALS: usize = 9;
/// Buckets 0..=9 plus the tail.
pub const BUCKETS: usize = MAX_GOALS + 2;
pub const TAIL_INDEX: usize = BUCKETS - 1;

/// Goal-count probabilities for one side: `probs[0..=9]` exact counts, `probs[10]` the "9+" tail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringDistribution {
    pub lambda: f64,
    pub probs: [f64; BUCKETS],
}

impl ScoringDistribution {
    pub fn from_lambda(lambda: f64) -> Self {
        let lambda = if lambda.is_finite() { lambda.max(0.0) } else { 0.0 };
        let mut probs = [0.0; BUCKETS];

        probs[0] = (-lambda).exp();
        for k in 1..=MAX_GOALS {
            probs[k] = probs[k - 1] * lambda / k as f64;
        }
        let head: f64 = probs[..=MAX_GOALS].iter().sum();
        probs[TAIL_INDEX] = (1.0 - head).max(0.0);

        Self { lambda, probs }
    }

    pub fn p(&self, bucket: usize) -> f64 {
        self.probs.get(bucket).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Bucket with the highest probability; lower counts win ties.
    pub fn mode(&self) -> usize {
        let mut best = 0;
        for (k, p) in self.probs.iter().enumerate() {
            if *p > self.probs[best] {
                best = k;
            }
        }
        best
    }
}

pub fn bucket_label(bucket: usize) -> String {
    if bucket >= TAIL_INDEX {
        format!("{MAX_GOALS}+")
    } else {
        bucket.to_string()
    }
}

/// Goal count a bucket stands for in totals markets; the tail counts as ten.
pub fn bucket_goals(bucket: usize) -> usize {
    bucket.min(TAIL_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_to_one_across_rates() {
        for lambda in [0.0_f64, 0.05, 0.7, 1.4, 2.9, 5.0, 8.5, 15.0, 40.0] {
            let d = ScoringDistribution::from_lambda(lambda);
            assert!((d.total() - 1.0).abs() < 1e-6, "lambda={lambda}");
            assert!((d.p(0) - (-lambda).exp()).abs() < 1e-15);
            assert!(d.probs.iter().all(|p| *p >= 0.0));
        }
    }

    #[test]
    fn zero_rate_is_certain_nil() {
        let d = ScoringDistribution::from_lambda(0.0);
        assert_eq!(d.p(0), 1.0);
        assert!(d.probs[1..].iter().all(|p| *p == 0.0));
        assert_eq!(d.mode(), 0);
    }

    #[test]
    fn large_rate_goes_to_tail() {
        let d = ScoringDistribution::from_lambda(30.0);
        assert!(d.p(TAIL_INDEX) > 0.99);
        assert_eq!(d.mode(), TAIL_INDEX);
    }

    #[test]
    fn negative_or_bad_rates_are_floored() {
        assert_eq!(ScoringDistribution::from_lambda(-2.0).p(0), 1.0);
        assert_eq!(ScoringDistribution::from_lambda(f64::NAN).p(0), 1.0);
    }

    #[test]
    fn labels_mark_tail() {
        assert_eq!(bucket_label(0), "0");
        assert_eq!(bucket_label(9), "9");
        assert_eq!(bucket_label(10), "9+");
        assert_eq!(bucket_goals(10), 10);
    }
}
