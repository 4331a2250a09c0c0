
/// Epsilon-aware floating point comparisons used throughout the fit logic
pub mod doubles;
/// Generic JSON save functionality
pub mod json_io;
