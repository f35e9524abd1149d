//! Backtracking matcher for compiled rebound programs.
//!
//! This crate runs a [`Program`](rebound_bytecode::Program) against a text
//! and reports capture positions. Searching, whole-input matching, global
//! iteration and token splitting are all built on the same [`VM`].

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;
pub mod iter;
pub mod results;

#[cfg(test)]
pub mod test_utils;

pub use engine::{
    FuelLimits, NoopTracer, PrintTracer, RuntimeError, SearchResult, Tracer, VM, VMBuilder,
    Verbosity,
};
pub use iter::{Matches, Tokens};
pub use results::{GroupRecord, MatchRecord, MatchResults, SubMatch};
