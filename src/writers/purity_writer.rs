
use serde::Serialize;
use std::path::Path;

use crate::best_fit::BestFit;
use crate::fit_score::in_range_of_lowest;

/// The single summary row describing the final decision for one sample
#[derive(Serialize)]
struct BestFitSummaryRow {
    /// Sample identifier
    sample: String,
    /// Chosen tumor purity
    purity: f64,
    /// Depth normalization factor of the chosen fit
    norm_factor: f64,
    /// Chosen average tumor ploidy
    ploidy: f64,
    /// Goodness-of-fit score of the chosen fit
    score: f64,
    /// Diploid genome fraction of the chosen fit
    diploid_proportion: f64,
    /// Somatic deviation sub-score of the chosen fit
    somatic_penalty: f64,
    /// Which evidence path produced the fit
    method: String,
    /// Lowest purity across the near-optimal subset
    min_purity: f64,
    /// Highest purity across the near-optimal subset
    max_purity: f64,
    /// Purity spread across the near-optimal subset
    purity_spread: f64,
    /// Lowest ploidy across the near-optimal subset
    min_ploidy: f64,
    /// Highest ploidy across the near-optimal subset
    max_ploidy: f64,
    /// Highest diploid proportion across the near-optimal subset
    max_diploid_proportion: f64
}

/// One diagnostic row per candidate in the range output
#[derive(Serialize)]
struct PurityRangeRow {
    purity: f64,
    norm_factor: f64,
    ploidy: f64,
    score: f64,
    diploid_proportion: f64,
    somatic_penalty: f64,
    /// True if this candidate sat within tolerance of the best score
    in_range_of_best: bool
}

/// Builds a writer with the delimiter matching the file extension
fn build_writer(filename: &Path) -> csv::Result<csv::Writer<std::fs::File>> {
    let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
    let delimiter: u8 = if is_csv { b',' } else { b'\t' };
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(filename)
}

/// Writes the one-row best-fit summary for a sample.
/// # Arguments
/// * `filename` - output path, .tsv or .csv
/// * `sample` - sample identifier for the row
/// * `best_fit` - the final decision
pub fn write_best_fit_summary(filename: &Path, sample: &str, best_fit: &BestFit) -> csv::Result<()> {
    let fit = best_fit.fit();
    let score = best_fit.score();
    let row = BestFitSummaryRow {
        sample: sample.to_string(),
        purity: fit.purity(),
        norm_factor: fit.norm_factor(),
        ploidy: fit.ploidy(),
        score: fit.score(),
        diploid_proportion: fit.diploid_proportion(),
        somatic_penalty: fit.somatic_penalty(),
        method: best_fit.method().to_string(),
        min_purity: score.min_purity(),
        max_purity: score.max_purity(),
        purity_spread: score.purity_spread(),
        min_ploidy: score.min_ploidy(),
        max_ploidy: score.max_ploidy(),
        max_diploid_proportion: score.max_diploid_proportion()
    };

    let mut csv_writer = build_writer(filename)?;
    csv_writer.serialize(&row)?;
    csv_writer.flush()?;
    Ok(())
}

/// Writes the full sorted candidate list with the in-range flag, for diagnostics.
/// # Arguments
/// * `filename` - output path, .tsv or .csv
/// * `best_fit` - the final decision carrying the sorted candidate list
pub fn write_purity_range(filename: &Path, best_fit: &BestFit) -> csv::Result<()> {
    let mut csv_writer = build_writer(filename)?;

    // all_fits is sorted by score, so the first entry holds the best score
    let lowest_score = best_fit.all_fits()[0].score();
    for candidate in best_fit.all_fits() {
        let row = PurityRangeRow {
            purity: candidate.purity(),
            norm_factor: candidate.norm_factor(),
            ploidy: candidate.ploidy(),
            score: candidate.score(),
            diploid_proportion: candidate.diploid_proportion(),
            somatic_penalty: candidate.somatic_penalty(),
            in_range_of_best: in_range_of_lowest(candidate.score(), lowest_score)
        };
        csv_writer.serialize(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}
