/*!
# Somatic fitter module
Purity refit from the somatic variant allele frequency (VAF) distribution.

Copy-number-only fitting cannot pin down purity on flat, highly-diploid genomes,
so this module bins the VAFs of passing SNVs from a safe read-depth window into a
histogram, smooths it, and looks for a clonal peak. Under the diploid assumption a
clonal heterozygous mutation sits at VAF = purity / 2, so the peak VAF is doubled
to recover purity. The refit only replaces the purity value; ploidy and the fit
diagnostics are inherited from the diploid candidate with the nearest purity.
*/
use log::{debug, info};

use crate::data_types::fitted_purity::FittedPurity;
use crate::data_types::somatic_variant::SomaticVariant;
use crate::data_types::structural_variant::StructuralVariant;
use crate::util::doubles;

/// Width of one VAF histogram bin
const VAF_BIN_WIDTH: f64 = 0.01;
/// Symmetric smoothing kernel applied to the raw histogram, centered on each bin
const SMOOTHING_KERNEL: [u64; 5] = [1, 2, 3, 2, 1];
/// Bins on each side of a peak that contribute to its raw variant support
const PEAK_SUPPORT_RADIUS: usize = 2;

/// A local maximum of the smoothed VAF histogram
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VafPeak {
    /// VAF at the peak bin center
    pub vaf: f64,
    /// Raw variants within `PEAK_SUPPORT_RADIUS` bins of the peak
    pub support: u32
}

/// Refits purity from somatic VAFs when the copy-number fit is ambiguous
#[derive(Clone, Copy, Debug)]
pub struct SomaticPurityFitter {
    /// Minimum raw variant support for a peak to be trusted
    min_peak_variants: u32,
    /// Minimum number of usable variants before a refit is attempted at all
    min_total_variants: u32,
    /// Lowest purity the refit may report
    min_purity: f64,
    /// Highest purity the refit may report
    max_purity: f64
}

impl SomaticPurityFitter {
    /// Constructor
    /// # Arguments
    /// * `min_peak_variants` - minimum raw variant support for a trusted peak
    /// * `min_total_variants` - minimum usable variants before attempting a refit
    /// * `min_purity` - lowest reportable purity
    /// * `max_purity` - highest reportable purity
    pub fn new(min_peak_variants: u32, min_total_variants: u32, min_purity: f64, max_purity: f64) -> SomaticPurityFitter {
        SomaticPurityFitter {
            min_peak_variants,
            min_total_variants,
            min_purity,
            max_purity
        }
    }

    /// Attempts a purity refit from the somatic VAF distribution.
    /// Returns None when there are too few variants or no peak qualifies; the caller
    /// treats that as "refit attempted, no reliable signal" and falls back.
    /// # Arguments
    /// * `variants` - passing SNVs inside the configured read-depth window
    /// * `structural_variants` - the sample's SVs; context only, they carry no usable VAF
    /// * `diploid_candidates` - most-diploid-per-purity candidates, sorted by purity
    pub fn from_somatics(
        &self,
        variants: &[SomaticVariant],
        structural_variants: &[StructuralVariant],
        diploid_candidates: &[FittedPurity]
    ) -> Option<FittedPurity> {
        let hotspot_sv_count = structural_variants.iter()
            .filter(|sv| !sv.is_filtered() && sv.is_hotspot())
            .count();
        debug!(
            "Somatic refit inputs: variants = {}, hotspot SVs = {}, diploid candidates = {}",
            variants.len(), hotspot_sv_count, diploid_candidates.len()
        );

        if (variants.len() as u32) < self.min_total_variants {
            info!(
                "Not enough somatic variants for a purity refit: {} < {}",
                variants.len(), self.min_total_variants
            );
            return None;
        }

        let histogram = vaf_histogram(variants);
        let peak = self.select_peak(&histogram)?;
        let somatic_purity = 2.0 * peak.vaf;

        let nearest_diploid = diploid_candidates.iter()
            .min_by(|a, b| {
                let dist_a = (a.purity() - somatic_purity).abs();
                let dist_b = (b.purity() - somatic_purity).abs();
                dist_a.total_cmp(&dist_b)
            })?;

        let somatic_fit = nearest_diploid.with_purity(somatic_purity).ok()?;
        info!(
            "Somatic fit: purity = {:.4} from peak VAF {:.2} with {} supporting variants",
            somatic_fit.purity(), peak.vaf, peak.support
        );
        Some(somatic_fit)
    }

    /// Picks the qualifying peak with the highest raw support, ties going to the higher VAF.
    /// A peak qualifies when its support meets `min_peak_variants` and its implied purity
    /// lies within the configured purity bounds.
    fn select_peak(&self, histogram: &[u32]) -> Option<VafPeak> {
        let mut selected: Option<VafPeak> = None;
        for peak in find_peaks(histogram) {
            if peak.support < self.min_peak_variants {
                debug!("Rejecting peak at VAF {:.2}: support {} too low", peak.vaf, peak.support);
                continue;
            }

            let implied_purity = 2.0 * peak.vaf;
            if doubles::less_than(implied_purity, self.min_purity)
                || doubles::greater_than(implied_purity, self.max_purity) {
                debug!("Rejecting peak at VAF {:.2}: implied purity {:.4} out of bounds", peak.vaf, implied_purity);
                continue;
            }

            // ">=" so an equal-support peak at a higher VAF replaces the earlier one
            if selected.map_or(true, |best| peak.support >= best.support) {
                selected = Some(peak);
            }
        }

        if selected.is_none() {
            info!("No qualifying somatic VAF peak found");
        }
        selected
    }
}

/// Bins variant allele frequencies into a histogram spanning [0.0, 1.0].
/// # Arguments
/// * `variants` - the variants to bin
pub fn vaf_histogram(variants: &[SomaticVariant]) -> Vec<u32> {
    let bin_count = (1.0 / VAF_BIN_WIDTH).round() as usize + 1;
    let mut histogram = vec![0u32; bin_count];
    for variant in variants {
        let bin = (variant.allele_frequency() / VAF_BIN_WIDTH).round() as usize;
        let bin = bin.min(bin_count - 1);
        histogram[bin] += 1;
    }
    histogram
}

/// Finds the local maxima of the kernel-smoothed histogram.
/// Boundary bins treat out-of-range neighbors as empty. Each peak's support is the
/// raw variant count within `PEAK_SUPPORT_RADIUS` bins of its center.
/// # Arguments
/// * `histogram` - raw VAF histogram from `vaf_histogram`
pub fn find_peaks(histogram: &[u32]) -> Vec<VafPeak> {
    let smoothed = smooth_histogram(histogram);

    let mut peaks = vec![];
    for (bin, &weight) in smoothed.iter().enumerate() {
        if weight == 0 {
            continue;
        }

        let left = if bin > 0 { smoothed[bin - 1] } else { 0 };
        let right = if bin + 1 < smoothed.len() { smoothed[bin + 1] } else { 0 };
        if weight < left || weight < right {
            continue;
        }

        let support_start = bin.saturating_sub(PEAK_SUPPORT_RADIUS);
        let support_end = (bin + PEAK_SUPPORT_RADIUS).min(histogram.len() - 1);
        let support: u32 = histogram[support_start..=support_end].iter().sum();

        peaks.push(VafPeak {
            vaf: bin as f64 * VAF_BIN_WIDTH,
            support
        });
    }

    peaks
}

/// Applies the fixed symmetric kernel to each histogram bin
fn smooth_histogram(histogram: &[u32]) -> Vec<u64> {
    let radius = SMOOTHING_KERNEL.len() / 2;
    (0..histogram.len())
        .map(|bin| {
            SMOOTHING_KERNEL.iter().enumerate()
                .map(|(k, &kernel_weight)| {
                    let offset = bin as i64 + k as i64 - radius as i64;
                    if offset < 0 || offset >= histogram.len() as i64 {
                        0
                    } else {
                        kernel_weight * u64::from(histogram[offset as usize])
                    }
                })
                .sum()
        })
        .collect()
}
