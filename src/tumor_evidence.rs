/*!
# Tumor evidence module
Decides whether a sample shows any detectable tumor DNA at all.
Three ordered signals are checked: somatic SNV support, structural variant support,
and residual BAF weight on germline-diploid segments whose depth ratio deviates
from the null-tumor expectation. Any one firing is sufficient.

All summaries are pure functions of their inputs; the accumulators live on the
returned structs rather than any shared state, so samples can be processed in
parallel by the surrounding pipeline.
*/
use log::{debug, info};

use crate::data_types::observed_region::{GermlineStatus, ObservedRegion};
use crate::data_types::somatic_variant::{SomaticVariant, VariantType};
use crate::data_types::structural_variant::StructuralVariant;

/// Minimum summed ALT read support across passing somatic SNVs to call tumor evidence
pub const MIN_TOTAL_SOMATIC_ALLELE_READ_COUNT: u64 = 1000;
/// Minimum summed tumor fragment support across unfiltered SVs to call tumor evidence
pub const MIN_TOTAL_SV_FRAGMENT_COUNT: u64 = 1000;
/// Minimum residual BAF weight on deviating diploid segments to call tumor evidence
pub const NO_TUMOR_BAF_TOTAL: u64 = 3000;
/// Lower bound of the depth-ratio window a tumor-free diploid segment is expected to occupy
pub const NO_TUMOR_DEPTH_RATIO_MIN: f64 = 0.8;
/// Upper bound of the depth-ratio window a tumor-free diploid segment is expected to occupy
pub const NO_TUMOR_DEPTH_RATIO_MAX: f64 = 1.2;

/// Accumulated somatic SNV evidence for one sample
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SomaticEvidence {
    /// Passing variants flagged as cancer hotspots
    pub hotspot_count: u32,
    /// Summed ALT read support over passing SNVs
    pub allele_read_count_total: u64,
    /// Passing SNVs whose total read count lies in the configured depth window;
    /// these are the only variants the somatic purity refit may use
    pub in_read_count_range: Vec<SomaticVariant>
}

/// Accumulated structural variant evidence for one sample
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SvEvidence {
    /// Unfiltered SVs flagged as cancer hotspots
    pub hotspot_count: u32,
    /// Summed tumor fragment support at start breakends of two-breakend events
    pub fragment_read_count: u64
}

/// Summarizes the somatic variants of one sample in a single pass.
/// Filtered variants are skipped entirely; hotspot counting covers every passing
/// variant while the read-count accumulators are restricted to SNPs.
/// # Arguments
/// * `somatics` - all somatic variants of the sample
/// * `min_read_count` - lower bound of the safe depth window, inclusive
/// * `max_read_count` - upper bound of the safe depth window, inclusive
pub fn summarize_somatics(somatics: &[SomaticVariant], min_read_count: u32, max_read_count: u32) -> SomaticEvidence {
    let mut evidence = SomaticEvidence::default();
    for variant in somatics {
        if !variant.is_pass() {
            continue;
        }

        if variant.is_hotspot() {
            evidence.hotspot_count += 1;
        }

        if variant.variant_type() == VariantType::Snp {
            evidence.allele_read_count_total += u64::from(variant.allele_read_count());

            if variant.total_read_count() >= min_read_count && variant.total_read_count() <= max_read_count {
                evidence.in_read_count_range.push(variant.clone());
            }
        }
    }

    evidence
}

/// Summarizes the structural variants of one sample in a single pass.
/// Fragment support is only trusted when both breakends are present and the
/// start breakend actually carries a count; missing counts are treated as absent.
/// # Arguments
/// * `structural_variants` - all structural variants of the sample
pub fn summarize_structural_variants(structural_variants: &[StructuralVariant]) -> SvEvidence {
    let mut evidence = SvEvidence::default();
    for variant in structural_variants {
        if variant.is_filtered() {
            continue;
        }

        if variant.is_hotspot() {
            evidence.hotspot_count += 1;
        }

        if let (Some(fragment_count), Some(_end)) = (variant.start().tumor_fragment_count(), variant.end()) {
            evidence.fragment_read_count += u64::from(fragment_count);
        }
    }

    evidence
}

/// Sums the BAF weight of germline-diploid segments whose tumor depth ratio falls
/// outside the null-tumor window; that weight is residual evidence of tumor DNA.
/// # Arguments
/// * `observed_regions` - all segmented regions of the sample
pub fn residual_baf_count(observed_regions: &[ObservedRegion]) -> u64 {
    observed_regions.iter()
        .filter(|r| r.germline_status() == GermlineStatus::Diploid)
        .filter(|r| {
            r.observed_tumor_ratio() < NO_TUMOR_DEPTH_RATIO_MIN || r.observed_tumor_ratio() > NO_TUMOR_DEPTH_RATIO_MAX
        })
        .map(|r| u64::from(r.baf_count()))
        .sum()
}

/// Returns true if any of the three evidence signals indicates tumor DNA is present.
/// # Arguments
/// * `somatic_evidence` - output of `summarize_somatics`
/// * `sv_evidence` - output of `summarize_structural_variants`
/// * `observed_regions` - all segmented regions of the sample
pub fn has_tumor_evidence(
    somatic_evidence: &SomaticEvidence, sv_evidence: &SvEvidence, observed_regions: &[ObservedRegion]
) -> bool {
    if somatic_evidence.hotspot_count > 0
        || somatic_evidence.allele_read_count_total >= MIN_TOTAL_SOMATIC_ALLELE_READ_COUNT {
        info!(
            "Tumor evidence: somatic hotspots = {}, allele read count total = {}",
            somatic_evidence.hotspot_count, somatic_evidence.allele_read_count_total
        );
        return true;
    }

    if sv_evidence.hotspot_count > 0 || sv_evidence.fragment_read_count >= MIN_TOTAL_SV_FRAGMENT_COUNT {
        info!(
            "Tumor evidence: SV hotspots = {}, SV fragment read count = {}",
            sv_evidence.hotspot_count, sv_evidence.fragment_read_count
        );
        return true;
    }

    let baf_count_total = residual_baf_count(observed_regions);
    if baf_count_total >= NO_TUMOR_BAF_TOTAL {
        info!("Tumor evidence: residual BAF count total = {baf_count_total}");
        return true;
    }

    debug!(
        "No tumor evidence: somatic hotspots = {}, SV hotspots = {}, residual BAF count total = {}",
        somatic_evidence.hotspot_count, sv_evidence.hotspot_count, baf_count_total
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::structural_variant::Breakend;

    fn snp(is_pass: bool, is_hotspot: bool, allele_read_count: u32, total_read_count: u32) -> SomaticVariant {
        SomaticVariant::new(VariantType::Snp, is_pass, is_hotspot, allele_read_count, total_read_count)
    }

    #[test]
    fn test_summarize_somatics() {
        let somatics = vec![
            snp(true, true, 10, 40),
            snp(true, false, 20, 60),
            // filtered variants are ignored, hotspot or not
            snp(false, true, 500, 1000),
            // non-SNPs count hotspots but not reads
            SomaticVariant::new(VariantType::Indel, true, true, 30, 70),
        ];

        let evidence = summarize_somatics(&somatics, 50, 100);
        assert_eq!(evidence.hotspot_count, 2);
        assert_eq!(evidence.allele_read_count_total, 30);
        // only the second SNP sits inside the [50, 100] depth window
        assert_eq!(evidence.in_read_count_range, vec![somatics[1].clone()]);
    }

    #[test]
    fn test_summarize_somatics_depth_window_inclusive() {
        let somatics = vec![
            snp(true, false, 10, 50),
            snp(true, false, 10, 100),
            snp(true, false, 10, 49),
            snp(true, false, 10, 101),
        ];
        let evidence = summarize_somatics(&somatics, 50, 100);
        assert_eq!(evidence.in_read_count_range.len(), 2);
    }

    #[test]
    fn test_summarize_structural_variants() {
        let svs = vec![
            StructuralVariant::new(false, true, Breakend::new(Some(40)), Some(Breakend::new(Some(35)))),
            // filtered: skipped entirely
            StructuralVariant::new(true, true, Breakend::new(Some(100)), Some(Breakend::new(None))),
            // single breakend: no trusted fragment support
            StructuralVariant::new(false, false, Breakend::new(Some(25)), None),
            // missing start count: nothing to add
            StructuralVariant::new(false, false, Breakend::new(None), Some(Breakend::new(Some(10)))),
        ];

        let evidence = summarize_structural_variants(&svs);
        assert_eq!(evidence.hotspot_count, 1);
        assert_eq!(evidence.fragment_read_count, 40);
    }

    #[test]
    fn test_residual_baf_count() {
        let regions = vec![
            // diploid and deviating: counted
            ObservedRegion::new(GermlineStatus::Diploid, 0.5, 1000),
            ObservedRegion::new(GermlineStatus::Diploid, 1.3, 500),
            // diploid but inside the null window: not counted
            ObservedRegion::new(GermlineStatus::Diploid, 1.0, 2000),
            ObservedRegion::new(GermlineStatus::Diploid, 0.8, 2000),
            ObservedRegion::new(GermlineStatus::Diploid, 1.2, 2000),
            // deviating but not germline diploid: not counted
            ObservedRegion::new(GermlineStatus::Amplification, 1.6, 3000),
        ];
        assert_eq!(residual_baf_count(&regions), 1500);
    }

    #[test]
    fn test_has_tumor_evidence_branches() {
        let no_somatic = SomaticEvidence::default();
        let no_sv = SvEvidence::default();

        // nothing at all
        assert!(!has_tumor_evidence(&no_somatic, &no_sv, &[]));

        // a single somatic hotspot is enough
        let somatic_hotspot = SomaticEvidence { hotspot_count: 1, ..Default::default() };
        assert!(has_tumor_evidence(&somatic_hotspot, &no_sv, &[]));

        // summed allele reads on the threshold are enough
        let somatic_reads = SomaticEvidence {
            allele_read_count_total: MIN_TOTAL_SOMATIC_ALLELE_READ_COUNT, ..Default::default()
        };
        assert!(has_tumor_evidence(&somatic_reads, &no_sv, &[]));

        // SV signals
        let sv_hotspot = SvEvidence { hotspot_count: 1, fragment_read_count: 0 };
        assert!(has_tumor_evidence(&no_somatic, &sv_hotspot, &[]));
        let sv_fragments = SvEvidence { hotspot_count: 0, fragment_read_count: MIN_TOTAL_SV_FRAGMENT_COUNT };
        assert!(has_tumor_evidence(&no_somatic, &sv_fragments, &[]));

        // residual BAF signal
        let deviating = vec![ObservedRegion::new(GermlineStatus::Diploid, 1.5, NO_TUMOR_BAF_TOTAL as u32)];
        assert!(has_tumor_evidence(&no_somatic, &no_sv, &deviating));
        let below = vec![ObservedRegion::new(GermlineStatus::Diploid, 1.5, NO_TUMOR_BAF_TOTAL as u32 - 1)];
        assert!(!has_tumor_evidence(&no_somatic, &no_sv, &below));
    }
}
