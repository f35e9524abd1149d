//! Rebound compiler: pattern parser, node emitter and graph analysis.
//!
//! The pipeline is a single pass over the pattern text:
//! - `parser` - recursive-descent parser writing nodes straight into the arena
//! - `emit` - arena writes, gap insertion and target fixups
//! - `analyze` - start maps, nullability, restart strategy, lookbehind widths
//! - `error` - error codes and snippet rendering

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod analyze;
mod compile;
mod emit;
mod error;
mod parser;

#[cfg(test)]
pub mod test_utils;

pub use compile::{CompileLimits, compile};
pub use error::{CompileError, ErrorKind};

#[cfg(test)]
mod error_tests;
