
use anyhow::bail;
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_optional_filename, check_required_filename, AFTER_HELP, FULL_VERSION};

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct FitSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    plumage_version: String,

    /// Candidate purity/ploidy fits from the model sweep (TSV)
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "candidates")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub candidates_filename: PathBuf,

    /// Somatic variant evidence (TSV) [default: no somatic evidence]
    #[clap(long = "somatics")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub somatics_filename: Option<PathBuf>,

    /// Structural variant evidence (TSV) [default: no SV evidence]
    #[clap(long = "structural-variants")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub structural_variants_filename: Option<PathBuf>,

    /// Segmented region observations (TSV) [default: no region evidence]
    #[clap(long = "regions")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub regions_filename: Option<PathBuf>,

    /// Output directory containing the fit summary and candidate range
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-dir")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_folder: PathBuf,

    /// Sample identifier, used in output filenames and rows
    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "sample")]
    #[clap(value_name = "SAMPLE")]
    #[clap(help_heading = Some("Input/Output"))]
    pub sample: String,

    /// Lowest purity the somatic refit may report
    #[clap(long = "min-purity")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Fit parameters"))]
    #[clap(default_value = "0.08")]
    pub min_purity: f64,

    /// Highest purity the somatic refit may report
    #[clap(long = "max-purity")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Fit parameters"))]
    #[clap(default_value = "1.0")]
    pub max_purity: f64,

    /// Minimum variant support for a trusted somatic VAF peak
    #[clap(long = "min-peak-variants")]
    #[clap(value_name = "INT")]
    #[clap(help_heading = Some("Fit parameters"))]
    #[clap(default_value = "50")]
    pub min_peak_variants: u32,

    /// Minimum usable somatic variants before a refit is attempted
    #[clap(long = "min-total-variants")]
    #[clap(value_name = "INT")]
    #[clap(help_heading = Some("Fit parameters"))]
    #[clap(default_value = "600")]
    pub min_total_variants: u32,

    /// Purity below which neither the default nor the somatic fit is considered reliable
    #[clap(long = "min-somatic-purity")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Fit parameters"))]
    #[clap(default_value = "0.17")]
    pub min_somatic_purity: f64,

    /// Purity spread at or above which the copy-number fit counts as ambiguous
    #[clap(long = "min-somatic-purity-spread")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Fit parameters"))]
    #[clap(default_value = "0.15")]
    pub min_somatic_purity_spread: f64,

    /// Max diploid proportion at or above which a sample counts as highly diploid
    #[clap(long = "highly-diploid-percentage")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Fit parameters"))]
    #[clap(default_value = "0.97")]
    pub highly_diploid_percentage: f64,

    /// Lower bound of the somatic read-depth window, inclusive
    #[clap(long = "min-read-count")]
    #[clap(value_name = "INT")]
    #[clap(help_heading = Some("Fit parameters"))]
    #[clap(default_value = "8")]
    pub min_read_count: u32,

    /// Upper bound of the somatic read-depth window, inclusive
    #[clap(long = "max-read-count")]
    #[clap(value_name = "INT")]
    #[clap(help_heading = Some("Fit parameters"))]
    #[clap(default_value = "1000")]
    pub max_read_count: u32,

    /// Purity rounding granularity for the diploid-per-purity selection
    #[clap(long = "purity-bucket-size")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Fit parameters"))]
    #[clap(default_value = "0.01")]
    pub purity_bucket_size: f64,

    /// Disables the somatic VAF refit path entirely
    #[clap(long = "disable-somatic-fit")]
    #[clap(help_heading = Some("Fit parameters"))]
    pub disable_somatic_fit: bool,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_fit_settings(mut settings: FitSettings) -> anyhow::Result<FitSettings> {
    // hard code the version in
    settings.plumage_version = FULL_VERSION.clone();
    info!("Plumage version: {:?}", &settings.plumage_version);
    info!("Sub-command: fit");
    info!("Inputs:");

    // check for all the required input files
    check_required_filename(&settings.candidates_filename, "Candidate fits")?;
    check_optional_filename(settings.somatics_filename.as_deref(), "Somatic variants")?;
    check_optional_filename(settings.structural_variants_filename.as_deref(), "Structural variants")?;
    check_optional_filename(settings.regions_filename.as_deref(), "Regions")?;

    // dump stuff to the logger
    info!("\tSample: {:?}", &settings.sample);
    info!("\tCandidate fits: {:?}", &settings.candidates_filename);
    if let Some(filename) = settings.somatics_filename.as_deref() {
        info!("\tSomatic variants: {filename:?}");
    } else {
        info!("\tSomatic variants: None");
    }
    if let Some(filename) = settings.structural_variants_filename.as_deref() {
        info!("\tStructural variants: {filename:?}");
    } else {
        info!("\tStructural variants: None");
    }
    if let Some(filename) = settings.regions_filename.as_deref() {
        info!("\tRegions: {filename:?}");
    } else {
        info!("\tRegions: None");
    }

    if settings.sample.is_empty() {
        bail!("--sample must be non-empty");
    }

    // outputs
    info!("Outputs:");
    info!("\tOutput folder: {:?}", &settings.output_folder);

    // fit parameter sanity checks
    info!("Fit parameters:");
    if !(0.0..=1.0).contains(&settings.min_purity) || !(0.0..=1.0).contains(&settings.max_purity) {
        bail!("--min-purity and --max-purity must be in range [0.0, 1.0]");
    }
    if settings.min_purity > settings.max_purity {
        bail!("--min-purity must be <= --max-purity");
    }
    info!("\tPurity bounds: [{}, {}]", settings.min_purity, settings.max_purity);

    if settings.min_read_count > settings.max_read_count {
        bail!("--min-read-count must be <= --max-read-count");
    }
    info!("\tRead-depth window: [{}, {}]", settings.min_read_count, settings.max_read_count);

    if !(0.0..=1.0).contains(&settings.highly_diploid_percentage) {
        bail!("--highly-diploid-percentage must be in range [0.0, 1.0]");
    }
    if settings.purity_bucket_size <= 0.0 {
        bail!("--purity-bucket-size must be >0");
    }
    info!("\tMinimum peak variants: {}", settings.min_peak_variants);
    info!("\tMinimum total variants: {}", settings.min_total_variants);
    info!("\tMinimum somatic purity: {}", settings.min_somatic_purity);
    info!("\tMinimum somatic purity spread: {}", settings.min_somatic_purity_spread);
    info!("\tHighly diploid percentage: {}", settings.highly_diploid_percentage);
    info!("\tPurity bucket size: {}", settings.purity_bucket_size);
    info!("\tSomatic refit: {}", if settings.disable_somatic_fit { "DISABLED" } else { "ENABLED" });

    Ok(settings)
}
