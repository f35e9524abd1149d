//! Rebound: a backtracking regular-expression engine.
//!
//! # Example
//!
//! ```
//! use rebound_lib::Regex;
//!
//! let re = Regex::new(r"(?<key>\w+)=(?<value>\d+)").unwrap();
//! let m = re.search("size=42").unwrap().unwrap();
//! assert_eq!(m.name("value").unwrap().as_str(), "42");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod regex;

pub use rebound_bytecode::{MatchFlags, SyntaxFlags};
pub use rebound_compiler::{CompileError, CompileLimits, ErrorKind};
pub use rebound_core::{CharTraits, Colors, DefaultTraits};
pub use rebound_vm::{
    FuelLimits, MatchRecord, MatchResults, Matches, NoopTracer, PrintTracer, RuntimeError,
    SubMatch, Tokens, Tracer, Verbosity,
};
pub use regex::{Regex, RegexBuilder};

/// Errors surfaced by [`Regex`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The pattern failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A search ran out of budget.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// A search was run on an expression that failed to compile.
    #[error("Invalid regular expression used for matching.")]
    InvalidPattern,
}

impl Error {
    /// Stable snake_case code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Compile(e) => e.kind.code(),
            Self::Runtime(e) => e.code(),
            Self::InvalidPattern => RuntimeError::InvalidPattern.code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod regex_tests;
