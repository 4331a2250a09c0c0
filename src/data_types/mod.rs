/*!
# Data types module
Read-only views of the per-sample inputs plus the candidate fit record.
All of these are fully materialized by upstream loaders before the fit logic runs.
*/

/// A candidate purity/ploidy solution from the copy-number model sweep
pub mod fitted_purity;
/// Per-segment observations from upstream segmentation
pub mod observed_region;
/// The subset view of a somatic variant call that fitting needs
pub mod somatic_variant;
/// The subset view of a structural variant call that fitting needs
pub mod structural_variant;
