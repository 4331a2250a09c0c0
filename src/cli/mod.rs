/*!
# CLI module
Command line interface functionality that is specific to Plumage.
*/

/// The main CLI module that contains the top-level CLI parser and help text
pub mod core;
/// The fit CLI subcommand
pub mod fit;
