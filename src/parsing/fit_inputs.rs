
use anyhow::Context;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::data_types::fitted_purity::FittedPurity;
use crate::data_types::observed_region::{GermlineStatus, ObservedRegion};
use crate::data_types::somatic_variant::{SomaticVariant, VariantType};
use crate::data_types::structural_variant::{Breakend, StructuralVariant};

/// One row of the candidate fit TSV, as written by the upstream model sweep
#[derive(Debug, Deserialize)]
struct CandidateRow {
    purity: f64,
    norm_factor: f64,
    ploidy: f64,
    score: f64,
    diploid_proportion: f64,
    somatic_penalty: f64
}

/// One row of the somatic variant TSV
#[derive(Debug, Deserialize)]
struct SomaticRow {
    variant_type: VariantType,
    is_pass: bool,
    is_hotspot: bool,
    allele_read_count: u32,
    total_read_count: u32
}

/// One row of the structural variant TSV; empty fragment fields mean "not reported"
#[derive(Debug, Deserialize)]
struct StructuralRow {
    is_filtered: bool,
    is_hotspot: bool,
    start_tumor_fragment_count: Option<u32>,
    end_present: bool,
    end_tumor_fragment_count: Option<u32>
}

/// One row of the observed region TSV from upstream segmentation
#[derive(Debug, Deserialize)]
struct RegionRow {
    germline_status: GermlineStatus,
    observed_tumor_ratio: f64,
    baf_count: u32
}

/// Builds a tab-delimited reader over any input source
fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(reader)
}

/// Parses candidate fits from a tab-delimited source, validating each row.
/// # Arguments
/// * `reader` - the TSV content, header row required
/// # Errors
/// * if a row fails to parse or a value falls outside its documented range
pub fn read_candidate_fits<R: Read>(reader: R) -> anyhow::Result<Vec<FittedPurity>> {
    let mut csv_reader = tsv_reader(reader);
    let mut candidates = vec![];
    for (row_index, result) in csv_reader.deserialize().enumerate() {
        let row: CandidateRow = result.with_context(|| format!("Error while parsing candidate row {row_index}:"))?;
        let candidate = FittedPurity::new(
            row.purity, row.norm_factor, row.ploidy, row.score, row.diploid_proportion, row.somatic_penalty
        ).with_context(|| format!("Invalid candidate on row {row_index}:"))?;
        candidates.push(candidate);
    }
    Ok(candidates)
}

/// Opens and parses a candidate fit TSV file.
/// # Arguments
/// * `filename` - the file to open
/// # Errors
/// * if the file does not open or any row is invalid
pub fn load_candidate_fits(filename: &Path) -> anyhow::Result<Vec<FittedPurity>> {
    let fp = std::fs::File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    read_candidate_fits(fp)
        .with_context(|| format!("Error while reading {filename:?}:"))
}

/// Parses somatic variants from a tab-delimited source.
/// # Arguments
/// * `reader` - the TSV content, header row required
/// # Errors
/// * if a row fails to parse
pub fn read_somatic_variants<R: Read>(reader: R) -> anyhow::Result<Vec<SomaticVariant>> {
    let mut csv_reader = tsv_reader(reader);
    let mut variants = vec![];
    for (row_index, result) in csv_reader.deserialize().enumerate() {
        let row: SomaticRow = result.with_context(|| format!("Error while parsing somatic row {row_index}:"))?;
        variants.push(SomaticVariant::new(
            row.variant_type, row.is_pass, row.is_hotspot, row.allele_read_count, row.total_read_count
        ));
    }
    Ok(variants)
}

/// Opens and parses a somatic variant TSV file.
/// # Arguments
/// * `filename` - the file to open
/// # Errors
/// * if the file does not open or any row is invalid
pub fn load_somatic_variants(filename: &Path) -> anyhow::Result<Vec<SomaticVariant>> {
    let fp = std::fs::File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    read_somatic_variants(fp)
        .with_context(|| format!("Error while reading {filename:?}:"))
}

/// Parses structural variants from a tab-delimited source.
/// An `end_present = false` row becomes a single-breakend event regardless of any
/// end fragment count in the file.
/// # Arguments
/// * `reader` - the TSV content, header row required
/// # Errors
/// * if a row fails to parse
pub fn read_structural_variants<R: Read>(reader: R) -> anyhow::Result<Vec<StructuralVariant>> {
    let mut csv_reader = tsv_reader(reader);
    let mut variants = vec![];
    for (row_index, result) in csv_reader.deserialize().enumerate() {
        let row: StructuralRow = result.with_context(|| format!("Error while parsing SV row {row_index}:"))?;
        let end = if row.end_present {
            Some(Breakend::new(row.end_tumor_fragment_count))
        } else {
            None
        };
        variants.push(StructuralVariant::new(
            row.is_filtered, row.is_hotspot, Breakend::new(row.start_tumor_fragment_count), end
        ));
    }
    Ok(variants)
}

/// Opens and parses a structural variant TSV file.
/// # Arguments
/// * `filename` - the file to open
/// # Errors
/// * if the file does not open or any row is invalid
pub fn load_structural_variants(filename: &Path) -> anyhow::Result<Vec<StructuralVariant>> {
    let fp = std::fs::File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    read_structural_variants(fp)
        .with_context(|| format!("Error while reading {filename:?}:"))
}

/// Parses observed regions from a tab-delimited source.
/// # Arguments
/// * `reader` - the TSV content, header row required
/// # Errors
/// * if a row fails to parse
pub fn read_observed_regions<R: Read>(reader: R) -> anyhow::Result<Vec<ObservedRegion>> {
    let mut csv_reader = tsv_reader(reader);
    let mut regions = vec![];
    for (row_index, result) in csv_reader.deserialize().enumerate() {
        let row: RegionRow = result.with_context(|| format!("Error while parsing region row {row_index}:"))?;
        regions.push(ObservedRegion::new(row.germline_status, row.observed_tumor_ratio, row.baf_count));
    }
    Ok(regions)
}

/// Opens and parses an observed region TSV file.
/// # Arguments
/// * `filename` - the file to open
/// # Errors
/// * if the file does not open or any row is invalid
pub fn load_observed_regions(filename: &Path) -> anyhow::Result<Vec<ObservedRegion>> {
    let fp = std::fs::File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    read_observed_regions(fp)
        .with_context(|| format!("Error while reading {filename:?}:"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_read_candidate_fits() {
        let tsv = "purity\tnorm_factor\tploidy\tscore\tdiploid_proportion\tsomatic_penalty\n\
            0.30\t0.95\t2.0\t0.010\t0.99\t0.0\n\
            0.40\t0.90\t2.1\t0.012\t0.85\t0.1\n";
        let candidates = read_candidate_fits(tsv.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_approx_eq!(candidates[0].purity(), 0.30);
        assert_approx_eq!(candidates[1].ploidy(), 2.1);
    }

    #[test]
    fn test_read_candidate_fits_rejects_bad_purity() {
        let tsv = "purity\tnorm_factor\tploidy\tscore\tdiploid_proportion\tsomatic_penalty\n\
            1.30\t0.95\t2.0\t0.010\t0.99\t0.0\n";
        assert!(read_candidate_fits(tsv.as_bytes()).is_err());
    }

    #[test]
    fn test_read_somatic_variants() {
        let tsv = "variant_type\tis_pass\tis_hotspot\tallele_read_count\ttotal_read_count\n\
            SNP\ttrue\tfalse\t12\t48\n\
            INDEL\tfalse\ttrue\t5\t30\n";
        let variants = read_somatic_variants(tsv.as_bytes()).unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0], SomaticVariant::new(VariantType::Snp, true, false, 12, 48));
        assert_eq!(variants[1].variant_type(), VariantType::Indel);
    }

    #[test]
    fn test_read_structural_variants() {
        let tsv = "is_filtered\tis_hotspot\tstart_tumor_fragment_count\tend_present\tend_tumor_fragment_count\n\
            false\ttrue\t40\ttrue\t35\n\
            false\tfalse\t\tfalse\t\n";
        let variants = read_structural_variants(tsv.as_bytes()).unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].start().tumor_fragment_count(), Some(40));
        assert_eq!(variants[0].end().unwrap().tumor_fragment_count(), Some(35));
        // empty fragment fields and a missing end become None
        assert_eq!(variants[1].start().tumor_fragment_count(), None);
        assert!(variants[1].end().is_none());
    }

    #[test]
    fn test_read_observed_regions() {
        let tsv = "germline_status\tobserved_tumor_ratio\tbaf_count\n\
            DIPLOID\t1.02\t2500\n\
            HET_DELETION\t0.55\t120\n";
        let regions = read_observed_regions(tsv.as_bytes()).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].germline_status(), GermlineStatus::Diploid);
        assert_approx_eq!(regions[1].observed_tumor_ratio(), 0.55);
    }

    #[test]
    fn test_unknown_enum_value_is_error() {
        let tsv = "germline_status\tobserved_tumor_ratio\tbaf_count\n\
            TRIPLOID\t1.02\t2500\n";
        assert!(read_observed_regions(tsv.as_bytes()).is_err());
    }
}
