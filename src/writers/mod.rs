/*!
# Writers module
Output writers for the per-sample fit results.
*/

/// Best-fit summary and candidate-range TSV writers
pub mod purity_writer;
