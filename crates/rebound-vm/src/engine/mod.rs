//! Runtime engine for compiled rebound programs.
//!
//! The VM walks the node graph depth-first, saving a checkpoint at every
//! choice and restoring the most recent one on failure. Register writes are
//! logged on an undo trail so a checkpoint only needs a trail watermark.

mod checkpoint;
mod error;
mod frame;
mod input;
mod search;
mod trace;
mod trail;
mod vm;

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod trace_tests;

pub use error::RuntimeError;
pub use search::SearchResult;
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
pub use vm::{FuelLimits, VM, VMBuilder, estimate_fuel};
