
use serde::{Deserialize, Serialize};

/// Variant classes we distinguish when summarizing somatic evidence.
/// Only SNPs feed the read-count accumulators, but other classes still count as hotspots.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, strum_macros::Display, strum_macros::EnumString)]
pub enum VariantType {
    #[strum(serialize = "SNP")]
    #[serde(rename = "SNP")]
    Snp,
    #[strum(serialize = "MNP")]
    #[serde(rename = "MNP")]
    Mnp,
    #[strum(serialize = "INDEL")]
    #[serde(rename = "INDEL")]
    Indel
}

/// The subset view of a somatic variant call that the fit logic consumes.
/// Sourced from an externally-parsed call set; read-only here.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SomaticVariant {
    /// The variant class
    variant_type: VariantType,
    /// True if the call passed all upstream filters
    is_pass: bool,
    /// True if the call sits at a known cancer hotspot position
    is_hotspot: bool,
    /// Tumor reads supporting the alternate allele
    allele_read_count: u32,
    /// Total tumor reads at the locus
    total_read_count: u32
}

impl SomaticVariant {
    /// Constructor
    /// # Arguments
    /// * `variant_type` - the variant class
    /// * `is_pass` - upstream filter status
    /// * `is_hotspot` - known cancer hotspot flag
    /// * `allele_read_count` - ALT-supporting tumor reads
    /// * `total_read_count` - total tumor reads at the locus
    pub fn new(
        variant_type: VariantType, is_pass: bool, is_hotspot: bool, allele_read_count: u32, total_read_count: u32
    ) -> SomaticVariant {
        SomaticVariant {
            variant_type,
            is_pass,
            is_hotspot,
            allele_read_count,
            total_read_count
        }
    }

    /// The observed variant allele frequency; 0.0 when there is no read support at all
    pub fn allele_frequency(&self) -> f64 {
        if self.total_read_count == 0 {
            0.0
        } else {
            self.allele_read_count as f64 / self.total_read_count as f64
        }
    }

    // getters
    pub fn variant_type(&self) -> VariantType {
        self.variant_type
    }

    pub fn is_pass(&self) -> bool {
        self.is_pass
    }

    pub fn is_hotspot(&self) -> bool {
        self.is_hotspot
    }

    pub fn allele_read_count(&self) -> u32 {
        self.allele_read_count
    }

    pub fn total_read_count(&self) -> u32 {
        self.total_read_count
    }
}
