/*!
# Parsing module
Loaders for the tab-delimited per-sample inputs.
All parsing happens up front; the fit logic itself never touches a file.
*/

/// TSV loaders for candidates, somatic variants, structural variants, and regions
pub mod fit_inputs;
