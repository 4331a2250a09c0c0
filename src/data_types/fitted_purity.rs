
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum FittedPurityError {
    #[error("purity must be in range [0.0, 1.0], found {purity}")]
    PurityRange { purity: f64 },
    #[error("norm_factor must be > 0, found {norm_factor}")]
    NormFactorRange { norm_factor: f64 },
    #[error("ploidy must be >= 0, found {ploidy}")]
    NegativePloidy { ploidy: f64 },
    #[error("score must be >= 0, found {score}")]
    NegativeScore { score: f64 },
    #[error("diploid_proportion must be in range [0.0, 1.0], found {diploid_proportion}")]
    DiploidProportionRange { diploid_proportion: f64 },
    #[error("somatic_penalty must be >= 0, found {somatic_penalty}")]
    NegativeSomaticPenalty { somatic_penalty: f64 }
}

/// One candidate solution from the purity x ploidy model sweep.
/// These are immutable once created; the selector only ever reads them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FittedPurity {
    /// Estimated fraction of tumor-derived DNA, range [0.0, 1.0]
    purity: f64,
    /// Normalization factor the model applied to the depth ratios
    norm_factor: f64,
    /// Average tumor genome copy number under this solution
    ploidy: f64,
    /// Goodness-of-fit against the observed BAF/depth-ratio data, lower is better
    score: f64,
    /// Precomputed fraction of the genome consistent with copy number 2 under this solution
    diploid_proportion: f64,
    /// Diagnostic sub-score from the somatic deviation model
    somatic_penalty: f64
}

impl FittedPurity {
    /// Constructor with range validation on all fields.
    /// # Arguments
    /// * `purity` - estimated tumor fraction, [0.0, 1.0]
    /// * `norm_factor` - depth normalization factor, > 0
    /// * `ploidy` - average copy number, >= 0
    /// * `score` - goodness-of-fit, >= 0, lower is better
    /// * `diploid_proportion` - diploid genome fraction, [0.0, 1.0]
    /// * `somatic_penalty` - somatic deviation sub-score, >= 0
    /// # Errors
    /// * if any value falls outside its documented range
    pub fn new(
        purity: f64, norm_factor: f64, ploidy: f64, score: f64, diploid_proportion: f64, somatic_penalty: f64
    ) -> Result<FittedPurity, FittedPurityError> {
        if !(0.0..=1.0).contains(&purity) {
            return Err(FittedPurityError::PurityRange { purity });
        }
        if norm_factor <= 0.0 {
            return Err(FittedPurityError::NormFactorRange { norm_factor });
        }
        if ploidy < 0.0 {
            return Err(FittedPurityError::NegativePloidy { ploidy });
        }
        if score < 0.0 {
            return Err(FittedPurityError::NegativeScore { score });
        }
        if !(0.0..=1.0).contains(&diploid_proportion) {
            return Err(FittedPurityError::DiploidProportionRange { diploid_proportion });
        }
        if somatic_penalty < 0.0 {
            return Err(FittedPurityError::NegativeSomaticPenalty { somatic_penalty });
        }

        Ok(FittedPurity {
            purity,
            norm_factor,
            ploidy,
            score,
            diploid_proportion,
            somatic_penalty
        })
    }

    /// Builds a copy of this candidate with the purity replaced.
    /// Used by the somatic refit, which infers purity from the variant allele frequencies
    /// but keeps the ploidy/score diagnostics of the nearest diploid candidate.
    /// # Arguments
    /// * `purity` - the replacement purity value
    /// # Errors
    /// * if the replacement purity is out of range
    pub fn with_purity(&self, purity: f64) -> Result<FittedPurity, FittedPurityError> {
        FittedPurity::new(
            purity, self.norm_factor, self.ploidy, self.score, self.diploid_proportion, self.somatic_penalty
        )
    }

    /// Total ordering on score, ascending; this is the "best first" sort for candidates
    pub fn score_cmp(&self, other: &FittedPurity) -> std::cmp::Ordering {
        self.score.total_cmp(&other.score)
    }

    // getters
    pub fn purity(&self) -> f64 {
        self.purity
    }

    pub fn norm_factor(&self) -> f64 {
        self.norm_factor
    }

    pub fn ploidy(&self) -> f64 {
        self.ploidy
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn diploid_proportion(&self) -> f64 {
        self.diploid_proportion
    }

    pub fn somatic_penalty(&self) -> f64 {
        self.somatic_penalty
    }
}
