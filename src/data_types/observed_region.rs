
use serde::{Deserialize, Serialize};

/// Germline copy number classification of a segment, assigned by upstream segmentation
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, strum_macros::Display, strum_macros::EnumString)]
pub enum GermlineStatus {
    #[strum(serialize = "UNKNOWN")]
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[strum(serialize = "DIPLOID")]
    #[serde(rename = "DIPLOID")]
    Diploid,
    #[strum(serialize = "AMPLIFICATION")]
    #[serde(rename = "AMPLIFICATION")]
    Amplification,
    #[strum(serialize = "HET_DELETION")]
    #[serde(rename = "HET_DELETION")]
    HetDeletion,
    #[strum(serialize = "HOM_DELETION")]
    #[serde(rename = "HOM_DELETION")]
    HomDeletion,
    #[strum(serialize = "NOISE")]
    #[serde(rename = "NOISE")]
    Noise
}

/// Per-segment observations from upstream segmentation.
/// Only germline-diploid segments contribute to the residual tumor-signal check.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObservedRegion {
    /// Germline copy number state of the segment
    germline_status: GermlineStatus,
    /// Tumor depth ratio observed over the segment, 1.0 is the null-tumor expectation
    observed_tumor_ratio: f64,
    /// Number of heterozygous germline BAF points supporting the segment
    baf_count: u32
}

impl ObservedRegion {
    /// Constructor
    /// # Arguments
    /// * `germline_status` - germline copy number state
    /// * `observed_tumor_ratio` - observed tumor depth ratio
    /// * `baf_count` - BAF points supporting the segment
    pub fn new(germline_status: GermlineStatus, observed_tumor_ratio: f64, baf_count: u32) -> ObservedRegion {
        ObservedRegion {
            germline_status,
            observed_tumor_ratio,
            baf_count
        }
    }

    // getters
    pub fn germline_status(&self) -> GermlineStatus {
        self.germline_status
    }

    pub fn observed_tumor_ratio(&self) -> f64 {
        self.observed_tumor_ratio
    }

    pub fn baf_count(&self) -> u32 {
        self.baf_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_strings() {
        assert_eq!(GermlineStatus::Diploid.to_string(), "DIPLOID");
        assert_eq!(GermlineStatus::from_str("HET_DELETION").unwrap(), GermlineStatus::HetDeletion);
        assert!(GermlineStatus::from_str("diploidish").is_err());
    }
}
