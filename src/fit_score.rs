/*!
# Fit score module
Aggregates the near-optimal candidate subset into a single `FittedPurityScore`.
The subset is "everything within tolerance of the lowest score", where the
tolerance is an absolute window OR a relative window around the best score.
*/
use anyhow::ensure;
use serde::Serialize;

use crate::data_types::fitted_purity::FittedPurity;
use crate::util::doubles;

/// Absolute score tolerance for membership in the near-optimal subset
pub const ABS_RANGE: f64 = 0.0005;
/// Relative score tolerance for membership in the near-optimal subset
pub const PERCENT_RANGE: f64 = 0.1;

/// Aggregate statistics over the near-optimal candidate subset.
/// Computed once per sample, never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FittedPurityScore {
    /// Lowest purity in the subset
    min_purity: f64,
    /// Highest purity in the subset
    max_purity: f64,
    /// Lowest ploidy in the subset
    min_ploidy: f64,
    /// Highest ploidy in the subset
    max_ploidy: f64,
    /// Highest precomputed diploid proportion in the subset
    max_diploid_proportion: f64
}

impl FittedPurityScore {
    /// The spread of purity values across the near-optimal subset.
    /// A wide spread means the copy-number data alone does not pin down purity.
    pub fn purity_spread(&self) -> f64 {
        self.max_purity - self.min_purity
    }

    // getters
    pub fn min_purity(&self) -> f64 {
        self.min_purity
    }

    pub fn max_purity(&self) -> f64 {
        self.max_purity
    }

    pub fn min_ploidy(&self) -> f64 {
        self.min_ploidy
    }

    pub fn max_ploidy(&self) -> f64 {
        self.max_ploidy
    }

    pub fn max_diploid_proportion(&self) -> f64 {
        self.max_diploid_proportion
    }
}

/// Returns true if a candidate score is within tolerance of the lowest score.
/// Membership is inclusive: a score exactly on either window boundary is in range.
/// # Arguments
/// * `score` - the candidate score under test
/// * `lowest_score` - the best (lowest) score over all candidates
pub fn in_range_of_lowest(score: f64, lowest_score: f64) -> bool {
    let abs_difference = (score - lowest_score).abs();
    let rel_difference = (abs_difference / lowest_score).abs();
    doubles::less_or_equal(abs_difference, ABS_RANGE) || doubles::less_or_equal(rel_difference, PERCENT_RANGE)
}

/// Filters the candidates down to the near-optimal subset.
/// # Arguments
/// * `lowest_score` - the best (lowest) score over all candidates
/// * `candidates` - the full candidate list
pub fn candidates_in_range(lowest_score: f64, candidates: &[FittedPurity]) -> Vec<FittedPurity> {
    candidates.iter()
        .filter(|c| in_range_of_lowest(c.score(), lowest_score))
        .cloned()
        .collect()
}

/// Aggregates a candidate subset into a `FittedPurityScore`.
/// # Arguments
/// * `candidates` - the near-optimal subset, must be non-empty
/// # Errors
/// * if the subset is empty, which violates the caller contract
pub fn score_candidates(candidates: &[FittedPurity]) -> anyhow::Result<FittedPurityScore> {
    ensure!(!candidates.is_empty(), "Cannot score an empty candidate list");

    let mut min_purity = f64::MAX;
    let mut max_purity = f64::MIN;
    let mut min_ploidy = f64::MAX;
    let mut max_ploidy = f64::MIN;
    let mut max_diploid_proportion: f64 = 0.0;

    for candidate in candidates {
        min_purity = min_purity.min(candidate.purity());
        max_purity = max_purity.max(candidate.purity());
        min_ploidy = min_ploidy.min(candidate.ploidy());
        max_ploidy = max_ploidy.max(candidate.ploidy());
        max_diploid_proportion = max_diploid_proportion.max(candidate.diploid_proportion());
    }

    Ok(FittedPurityScore {
        min_purity,
        max_purity,
        min_ploidy,
        max_ploidy,
        max_diploid_proportion
    })
}
