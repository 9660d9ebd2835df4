//! Command line interface module
//!
//! Argument parsing and the runner that writes the generated configuration to
//! standard output.

pub mod args;
pub mod runner;

pub use args::Args;
pub use runner::Runner;
