/*!
# Best fit module
The orchestrator that turns the candidate grid plus the per-sample evidence into a
single `BestFit` decision. The algorithm is a strictly sequential decision tree with
three terminal outcomes:

* `NO_TUMOR` - the fit was highly diploid and no tumor evidence could be found;
* `NORMAL` - the lowest-score candidate stands;
* `SOMATIC` - the somatic VAF refit replaced (or tried to replace) the default fit.

## Example usage
```rust
use plumage::best_fit::{determine_best_fit, FitConfigBuilder, FitMethod};
use plumage::data_types::fitted_purity::FittedPurity;

let candidates = vec![
    FittedPurity::new(0.30, 1.0, 2.0, 0.010, 1.0, 0.0).unwrap(),
    FittedPurity::new(0.30, 1.0, 2.0, 0.011, 1.0, 0.0).unwrap(),
];
let config = FitConfigBuilder::default().build().unwrap();

// a flat, highly-diploid sample with no evidence at all is judged tumor-free
let best_fit = determine_best_fit(&config, &candidates, &[], &[], &[]).unwrap();
assert_eq!(best_fit.method(), FitMethod::NoTumor);
```
*/
use anyhow::ensure;
use derive_builder::Builder;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::data_types::fitted_purity::FittedPurity;
use crate::data_types::observed_region::ObservedRegion;
use crate::data_types::somatic_variant::SomaticVariant;
use crate::data_types::structural_variant::StructuralVariant;
use crate::fit_score::{FittedPurityScore, candidates_in_range, score_candidates};
use crate::somatic_fitter::SomaticPurityFitter;
use crate::tumor_evidence::{has_tumor_evidence, summarize_somatics, summarize_structural_variants};
use crate::util::doubles;

/// A candidate only counts as a diploid baseline if its ploidy is within this distance of 2.0
const DIPLOID_PLOIDY_TOLERANCE: f64 = 1.0;

/// Which evidence path produced the final fit
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum_macros::Display)]
pub enum FitMethod {
    /// The lowest-score candidate from the copy-number sweep
    #[strum(serialize = "NORMAL")]
    #[serde(rename = "NORMAL")]
    Normal,
    /// The somatic VAF refit path was taken (even if it fell back to a diploid candidate)
    #[strum(serialize = "SOMATIC")]
    #[serde(rename = "SOMATIC")]
    Somatic,
    /// No tumor signal could be detected in the sample
    #[strum(serialize = "NO_TUMOR")]
    #[serde(rename = "NO_TUMOR")]
    NoTumor
}

/// Thresholds steering the best-fit decision tree
#[derive(Builder, Clone, Copy, Debug)]
#[builder(default)]
pub struct FitConfig {
    /// Lowest purity the somatic refit may report
    min_purity: f64,
    /// Highest purity the somatic refit may report
    max_purity: f64,
    /// Minimum raw variant support for a trusted VAF peak
    min_peak_variants: u32,
    /// Minimum usable somatic variants before a refit is attempted
    min_total_variants: u32,
    /// Purity below which neither the default nor the somatic fit is considered reliable
    min_somatic_purity: f64,
    /// Purity spread at or above which the copy-number fit is considered ambiguous
    min_somatic_purity_spread: f64,
    /// Max diploid proportion at or above which a sample counts as highly diploid
    highly_diploid_percentage: f64,
    /// Lower bound of the somatic read-depth window, inclusive
    min_read_count: u32,
    /// Upper bound of the somatic read-depth window, inclusive
    max_read_count: u32,
    /// Master toggle for the somatic refit path
    fit_with_somatics: bool,
    /// Purity rounding granularity when picking one diploid representative per purity
    purity_bucket_size: f64
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_purity: 0.08,
            max_purity: 1.0,
            min_peak_variants: 50,
            min_total_variants: 600,
            min_somatic_purity: 0.17,
            min_somatic_purity_spread: 0.15,
            highly_diploid_percentage: 0.97,
            min_read_count: 8,
            max_read_count: 1000,
            fit_with_somatics: true,
            purity_bucket_size: 0.01
        }
    }
}

impl FitConfig {
    // mostly getters
    pub fn min_purity(&self) -> f64 {
        self.min_purity
    }

    pub fn max_purity(&self) -> f64 {
        self.max_purity
    }

    pub fn min_peak_variants(&self) -> u32 {
        self.min_peak_variants
    }

    pub fn min_total_variants(&self) -> u32 {
        self.min_total_variants
    }

    pub fn min_somatic_purity(&self) -> f64 {
        self.min_somatic_purity
    }

    pub fn min_somatic_purity_spread(&self) -> f64 {
        self.min_somatic_purity_spread
    }

    pub fn highly_diploid_percentage(&self) -> f64 {
        self.highly_diploid_percentage
    }

    pub fn min_read_count(&self) -> u32 {
        self.min_read_count
    }

    pub fn max_read_count(&self) -> u32 {
        self.max_read_count
    }

    pub fn fit_with_somatics(&self) -> bool {
        self.fit_with_somatics
    }

    pub fn purity_bucket_size(&self) -> f64 {
        self.purity_bucket_size
    }
}

/// The final decision for one sample, created exactly once and never mutated
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BestFit {
    /// The chosen candidate
    fit: FittedPurity,
    /// Which evidence path produced `fit`
    method: FitMethod,
    /// Aggregate statistics over the near-optimal candidate subset
    score: FittedPurityScore,
    /// The full candidate list sorted by score, retained for diagnostics
    all_fits: Vec<FittedPurity>
}

impl BestFit {
    // getters
    pub fn fit(&self) -> &FittedPurity {
        &self.fit
    }

    pub fn method(&self) -> FitMethod {
        self.method
    }

    pub fn score(&self) -> &FittedPurityScore {
        &self.score
    }

    pub fn all_fits(&self) -> &[FittedPurity] {
        &self.all_fits
    }
}

/// Reduces the candidate list to one diploid representative per purity bucket.
/// Purity values are rounded to the nearest `purity_bucket_size` multiple; within a
/// bucket the candidate with ploidy closest to 2.0 wins, first-seen winning exact
/// ties. Candidates whose ploidy is further than `DIPLOID_PLOIDY_TOLERANCE` from 2.0
/// never qualify as a diploid baseline. Result is ordered by bucket purity.
/// # Arguments
/// * `candidates` - the full candidate list
/// * `purity_bucket_size` - the rounding granularity, must be > 0
pub fn most_diploid_per_purity(candidates: &[FittedPurity], purity_bucket_size: f64) -> Vec<FittedPurity> {
    let mut buckets: BTreeMap<i64, FittedPurity> = BTreeMap::new();
    for candidate in candidates {
        if (candidate.ploidy() - 2.0).abs() > DIPLOID_PLOIDY_TOLERANCE {
            continue;
        }

        let bucket = (candidate.purity() / purity_bucket_size).round() as i64;
        match buckets.get(&bucket) {
            Some(current) if (current.ploidy() - 2.0).abs() <= (candidate.ploidy() - 2.0).abs() => {},
            _ => {
                buckets.insert(bucket, candidate.clone());
            }
        }
    }

    buckets.into_values().collect()
}

/// The asymmetric tie-break that rejects a somatic refit: it only loses when both
/// purities sit below the reliability threshold AND the refit pushed purity upward.
/// # Arguments
/// * `lowest_score_fit` - the default copy-number fit
/// * `somatic_fit` - the candidate somatic refit
/// * `min_somatic_purity` - the reliability threshold
pub fn somatic_fit_is_worse(lowest_score_fit: &FittedPurity, somatic_fit: &FittedPurity, min_somatic_purity: f64) -> bool {
    let lowest_purity = lowest_score_fit.purity();
    let somatic_purity = somatic_fit.purity();

    doubles::less_than(lowest_purity, min_somatic_purity)
        && doubles::less_than(somatic_purity, min_somatic_purity)
        && doubles::greater_than(somatic_purity, lowest_purity)
}

/// Selects the single best purity/ploidy fit for one sample.
/// # Arguments
/// * `config` - decision thresholds
/// * `all_candidates` - the full candidate grid, must be non-empty
/// * `somatics` - the sample's somatic variants
/// * `structural_variants` - the sample's structural variants
/// * `observed_regions` - the sample's segmented regions
/// # Errors
/// * if `all_candidates` is empty, which violates the caller contract
pub fn determine_best_fit(
    config: &FitConfig,
    all_candidates: &[FittedPurity],
    somatics: &[SomaticVariant],
    structural_variants: &[StructuralVariant],
    observed_regions: &[ObservedRegion]
) -> anyhow::Result<BestFit> {
    ensure!(!all_candidates.is_empty(), "Best-fit selection requires at least one candidate");

    let mut sorted_candidates = all_candidates.to_vec();
    sorted_candidates.sort_by(FittedPurity::score_cmp);
    let lowest_score_fit = sorted_candidates[0].clone();

    let in_range_candidates = candidates_in_range(lowest_score_fit.score(), &sorted_candidates);
    let score = score_candidates(&in_range_candidates)?;

    let exceeds_purity_spread = doubles::greater_or_equal(score.purity_spread(), config.min_somatic_purity_spread());
    let highly_diploid = doubles::greater_or_equal(score.max_diploid_proportion(), config.highly_diploid_percentage());

    // non-diploid fits imply tumor signal by construction; only highly-diploid
    // samples need explicit evidence
    let somatic_evidence = summarize_somatics(somatics, config.min_read_count(), config.max_read_count());
    let sv_evidence = summarize_structural_variants(structural_variants);
    let has_tumor = !highly_diploid || has_tumor_evidence(&somatic_evidence, &sv_evidence, observed_regions);

    let diploid_candidates = most_diploid_per_purity(&sorted_candidates, config.purity_bucket_size());
    info!(
        "Fit overview: max diploid proportion = {:.4}, diploid candidates = {}, purity range = {:.4} - {:.4}, has tumor = {}",
        score.max_diploid_proportion(), diploid_candidates.len(), score.min_purity(), score.max_purity(), has_tumor
    );

    let lowest_purity_fit = diploid_candidates.iter()
        .min_by(|a, b| a.purity().total_cmp(&b.purity()))
        .cloned()
        .unwrap_or_else(|| lowest_score_fit.clone());

    if !has_tumor {
        return Ok(BestFit {
            fit: lowest_purity_fit,
            method: FitMethod::NoTumor,
            score,
            all_fits: sorted_candidates
        });
    }

    if diploid_candidates.is_empty() {
        warn!("Unable to attempt a somatic fit: no diploid candidates");
        return Ok(BestFit {
            fit: lowest_score_fit,
            method: FitMethod::Normal,
            score,
            all_fits: sorted_candidates
        });
    }

    let use_somatics = config.fit_with_somatics() && exceeds_purity_spread && highly_diploid;
    if !use_somatics {
        return Ok(BestFit {
            fit: lowest_score_fit,
            method: FitMethod::Normal,
            score,
            all_fits: sorted_candidates
        });
    }

    let fitter = SomaticPurityFitter::new(
        config.min_peak_variants(), config.min_total_variants(), config.min_purity(), config.max_purity()
    );
    let somatic_fit = fitter.from_somatics(
        &somatic_evidence.in_read_count_range, structural_variants, &diploid_candidates
    );

    let best_fit = match somatic_fit {
        // refit attempted but found no reliable peak: fall back to the most
        // conservative diploid candidate, still flagged as the somatic path
        None => BestFit {
            fit: lowest_purity_fit,
            method: FitMethod::Somatic,
            score,
            all_fits: sorted_candidates
        },
        Some(somatic_fit) if somatic_fit_is_worse(&lowest_score_fit, &somatic_fit, config.min_somatic_purity()) => BestFit {
            fit: lowest_score_fit,
            method: FitMethod::Normal,
            score,
            all_fits: sorted_candidates
        },
        Some(somatic_fit) => BestFit {
            fit: somatic_fit,
            method: FitMethod::Somatic,
            score,
            all_fits: sorted_candidates
        }
    };

    Ok(best_fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::somatic_variant::VariantType;
    use approx_eq::assert_approx_eq;

    fn test_fit(purity: f64, ploidy: f64, score: f64, diploid_proportion: f64) -> FittedPurity {
        FittedPurity::new(purity, 1.0, ploidy, score, diploid_proportion, 0.0).unwrap()
    }

    fn hotspot_snp() -> SomaticVariant {
        SomaticVariant::new(VariantType::Snp, true, true, 10, 40)
    }

    #[test]
    fn test_most_diploid_per_purity() {
        let candidates = vec![
            test_fit(0.30, 2.4, 0.01, 0.9),
            test_fit(0.30, 2.1, 0.02, 0.9),
            test_fit(0.30, 1.8, 0.03, 0.9),
            test_fit(0.40, 2.0, 0.04, 0.9),
            // too far from diploid to ever act as a baseline
            test_fit(0.50, 4.0, 0.05, 0.1),
        ];

        let diploid = most_diploid_per_purity(&candidates, 0.01);
        assert_eq!(diploid.len(), 2);
        // purity 0.30 bucket keeps ploidy 2.1 (closest to 2.0), ordered by purity
        assert_approx_eq!(diploid[0].purity(), 0.30);
        assert_approx_eq!(diploid[0].ploidy(), 2.1);
        assert_approx_eq!(diploid[1].purity(), 0.40);
    }

    #[test]
    fn test_most_diploid_bucketing_granularity() {
        let candidates = vec![
            test_fit(0.301, 2.2, 0.01, 0.9),
            test_fit(0.302, 2.0, 0.02, 0.9),
        ];

        // at 0.01 granularity both purities share one bucket
        assert_eq!(most_diploid_per_purity(&candidates, 0.01).len(), 1);
        // at 0.001 granularity they are distinct
        assert_eq!(most_diploid_per_purity(&candidates, 0.001).len(), 2);
    }

    #[test]
    fn test_most_diploid_first_wins_exact_tie() {
        let candidates = vec![
            test_fit(0.30, 2.1, 0.05, 0.9),
            test_fit(0.30, 2.1, 0.01, 0.9),
        ];
        let diploid = most_diploid_per_purity(&candidates, 0.01);
        assert_eq!(diploid.len(), 1);
        assert_approx_eq!(diploid[0].score(), 0.05);
    }

    #[test]
    fn test_somatic_fit_is_worse() {
        let threshold = 0.17;

        // both below threshold and somatic pushed purity up: worse
        let default = test_fit(0.10, 2.0, 0.01, 0.9);
        let somatic = test_fit(0.15, 2.0, 0.01, 0.9);
        assert!(somatic_fit_is_worse(&default, &somatic, threshold));

        // somatic cleared the threshold: not worse
        let somatic = test_fit(0.40, 2.0, 0.01, 0.9);
        assert!(!somatic_fit_is_worse(&default, &somatic, threshold));

        // somatic moved purity down: not worse
        let somatic = test_fit(0.05, 2.0, 0.01, 0.9);
        assert!(!somatic_fit_is_worse(&default, &somatic, threshold));

        // default already above threshold: not worse
        let default = test_fit(0.20, 2.0, 0.01, 0.9);
        let somatic = test_fit(0.25, 2.0, 0.01, 0.9);
        assert!(!somatic_fit_is_worse(&default, &somatic, threshold));
    }

    #[test]
    fn test_empty_candidates_is_error() {
        let config = FitConfigBuilder::default().build().unwrap();
        assert!(determine_best_fit(&config, &[], &[], &[], &[]).is_err());
    }

    /// Scenario: flat highly-diploid genome, no evidence anywhere
    #[test]
    fn test_no_tumor_sample() {
        let config = FitConfigBuilder::default().build().unwrap();
        let candidates = vec![
            test_fit(0.30, 2.0, 0.010, 1.0),
            test_fit(0.30, 2.0, 0.011, 1.0),
        ];
        // all regions sit inside the null depth-ratio window
        let regions = vec![
            ObservedRegion::new(crate::data_types::observed_region::GermlineStatus::Diploid, 1.0, 5000),
        ];

        let best_fit = determine_best_fit(&config, &candidates, &[], &[], &regions).unwrap();
        assert_eq!(best_fit.method(), FitMethod::NoTumor);
        // lowest-purity diploid candidate; the two share a bucket, first-sorted wins
        assert_approx_eq!(best_fit.fit().purity(), 0.30);
        assert_approx_eq!(best_fit.fit().score(), 0.010);
    }

    /// Scenario: same sample, but one hotspot SNV flips the tumor-evidence call
    #[test]
    fn test_hotspot_rescues_tumor_call() {
        let config = FitConfigBuilder::default().build().unwrap();
        let candidates = vec![
            test_fit(0.30, 2.0, 0.010, 1.0),
            test_fit(0.30, 2.0, 0.011, 1.0),
        ];
        let somatics = vec![hotspot_snp()];

        let best_fit = determine_best_fit(&config, &candidates, &somatics, &[], &[]).unwrap();
        // purity spread is 0, so the somatic path is not taken
        assert_eq!(best_fit.method(), FitMethod::Normal);
        assert_approx_eq!(best_fit.fit().score(), 0.010);
    }

    /// Scenario: no diploid baseline at all, somatic refit cannot be attempted
    #[test]
    fn test_no_diploid_candidates() {
        let config = FitConfigBuilder::default().build().unwrap();
        let candidates = vec![
            test_fit(0.30, 4.0, 0.010, 0.0),
            test_fit(0.60, 3.9, 0.011, 0.0),
        ];

        let best_fit = determine_best_fit(&config, &candidates, &[], &[], &[]).unwrap();
        assert_eq!(best_fit.method(), FitMethod::Normal);
        assert_approx_eq!(best_fit.fit().score(), 0.010);
    }

    /// Scenario: highly diploid with no evidence, but every candidate sits far
    /// from ploidy 2; the no-tumor fallback is the lowest-score candidate itself
    #[test]
    fn test_no_tumor_without_diploid_candidates() {
        let config = FitConfigBuilder::default().build().unwrap();
        let candidates = vec![
            test_fit(0.30, 4.0, 0.010, 1.0),
            test_fit(0.60, 3.9, 0.011, 1.0),
        ];

        let best_fit = determine_best_fit(&config, &candidates, &[], &[], &[]).unwrap();
        assert_eq!(best_fit.method(), FitMethod::NoTumor);
        assert_approx_eq!(best_fit.fit().purity(), 0.30);
        assert_approx_eq!(best_fit.fit().score(), 0.010);
    }

    /// Builds an ambiguous highly-diploid candidate grid with purities spanning
    /// [0.10, 0.60] and near-identical scores, lowest at purity 0.10
    fn ambiguous_candidates() -> Vec<FittedPurity> {
        (0..=50)
            .map(|i| {
                let purity = 0.10 + 0.01 * i as f64;
                test_fit(purity, 2.0, 0.0100 + 0.000001 * i as f64, 1.0)
            })
            .collect()
    }

    /// Somatic variants forming a clean clonal peak at the given VAF
    fn clonal_peak_variants(vaf: f64, count: usize) -> Vec<SomaticVariant> {
        (0..count)
            .map(|_| SomaticVariant::new(VariantType::Snp, true, false, (vaf * 100.0).round() as u32, 100))
            .collect()
    }

    /// Scenario: ambiguous fit, somatic refit finds a strong peak and wins
    #[test]
    fn test_somatic_refit_replaces_default() {
        let config = FitConfigBuilder::default()
            .min_peak_variants(5)
            .min_total_variants(10)
            .build().unwrap();
        let mut somatics = clonal_peak_variants(0.20, 20);
        somatics.push(hotspot_snp());

        let best_fit = determine_best_fit(&config, &ambiguous_candidates(), &somatics, &[], &[]).unwrap();
        assert_eq!(best_fit.method(), FitMethod::Somatic);
        // peak VAF 0.20 implies purity 0.40; default purity 0.10 is below the 0.17
        // threshold but the somatic purity is not, so the refit is not "worse"
        assert_approx_eq!(best_fit.fit().purity(), 0.40);
    }

    /// Scenario: somatic path taken but no peak found, conservative diploid fallback
    #[test]
    fn test_somatic_refit_falls_back_without_peak() {
        let config = FitConfigBuilder::default()
            .min_peak_variants(5)
            .min_total_variants(10)
            .build().unwrap();
        // hotspot provides tumor evidence but there are too few variants to refit
        let somatics = vec![hotspot_snp()];

        let best_fit = determine_best_fit(&config, &ambiguous_candidates(), &somatics, &[], &[]).unwrap();
        assert_eq!(best_fit.method(), FitMethod::Somatic);
        // fallback is the lowest-purity diploid candidate
        assert_approx_eq!(best_fit.fit().purity(), 0.10);
    }

    /// Scenario: the refit lands below the reliability threshold and above the
    /// default purity, so the default fit stands
    #[test]
    fn test_somatic_refit_rejected_as_worse() {
        let config = FitConfigBuilder::default()
            .min_peak_variants(5)
            .min_total_variants(10)
            .build().unwrap();
        // peak VAF 0.07 implies purity 0.14: above the default 0.10, below 0.17
        let mut somatics = clonal_peak_variants(0.07, 20);
        somatics.push(hotspot_snp());

        let best_fit = determine_best_fit(&config, &ambiguous_candidates(), &somatics, &[], &[]).unwrap();
        assert_eq!(best_fit.method(), FitMethod::Normal);
        assert_approx_eq!(best_fit.fit().purity(), 0.10);
    }

    /// Scenario: the somatic toggle disables the refit even for ambiguous samples
    #[test]
    fn test_somatic_toggle_disabled() {
        let config = FitConfigBuilder::default()
            .min_peak_variants(5)
            .min_total_variants(10)
            .fit_with_somatics(false)
            .build().unwrap();
        let mut somatics = clonal_peak_variants(0.20, 20);
        somatics.push(hotspot_snp());

        let best_fit = determine_best_fit(&config, &ambiguous_candidates(), &somatics, &[], &[]).unwrap();
        assert_eq!(best_fit.method(), FitMethod::Normal);
        assert_approx_eq!(best_fit.fit().purity(), 0.10);
    }

    /// A purity spread exactly on the threshold counts as exceeding it
    #[test]
    fn test_purity_spread_boundary_inclusive() {
        let config = FitConfigBuilder::default()
            .min_peak_variants(5)
            .min_total_variants(10)
            .build().unwrap();

        // two near-optimal candidates exactly 0.15 purity apart
        let candidates = vec![
            test_fit(0.10, 2.0, 0.0100, 1.0),
            test_fit(0.25, 2.0, 0.0101, 1.0),
        ];
        let mut somatics = clonal_peak_variants(0.20, 20);
        somatics.push(hotspot_snp());

        let best_fit = determine_best_fit(&config, &candidates, &somatics, &[], &[]).unwrap();
        // the somatic path ran, proving the inclusive spread comparison
        assert_eq!(best_fit.method(), FitMethod::Somatic);
        assert_approx_eq!(best_fit.fit().purity(), 0.40);
    }

    #[test]
    fn test_determinism() {
        let config = FitConfigBuilder::default()
            .min_peak_variants(5)
            .min_total_variants(10)
            .build().unwrap();
        let mut somatics = clonal_peak_variants(0.20, 20);
        somatics.push(hotspot_snp());

        let first = determine_best_fit(&config, &ambiguous_candidates(), &somatics, &[], &[]).unwrap();
        let second = determine_best_fit(&config, &ambiguous_candidates(), &somatics, &[], &[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_fits_sorted_by_score() {
        let config = FitConfigBuilder::default().build().unwrap();
        let candidates = vec![
            test_fit(0.50, 2.0, 0.030, 1.0),
            test_fit(0.30, 2.0, 0.010, 1.0),
            test_fit(0.40, 2.0, 0.020, 1.0),
        ];

        let best_fit = determine_best_fit(&config, &candidates, &[hotspot_snp()], &[], &[]).unwrap();
        let scores: Vec<f64> = best_fit.all_fits().iter().map(|f| f.score()).collect();
        assert_eq!(scores, vec![0.010, 0.020, 0.030]);
    }
}
