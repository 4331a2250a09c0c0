
/// The best-fit selector that orchestrates scoring, evidence, and the somatic refit
pub mod best_fit;
/// Command line interface functionality
pub mod cli;
/// Contains various shared data types
pub mod data_types;
/// Aggregation of the near-optimal candidate subset into a fit score
pub mod fit_score;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Purity refit from the somatic variant allele frequency distribution
pub mod somatic_fitter;
/// Detection of whether a sample carries any tumor signal at all
pub mod tumor_evidence;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
