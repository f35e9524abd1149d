#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compiled program format for rebound.
//!
//! This crate contains:
//! - The node arena (`Arena`) and node encoding (`Node`, `NodeTag`)
//! - The compiled expression (`Program`) and its group name table
//! - Compile and match flag sets
//! - The human-readable program dump

pub mod arena;
pub mod dump;
pub mod flags;
pub mod names;
pub mod node;
pub mod program;

pub use arena::Arena;
pub use dump::{dump, format_node};
pub use flags::{CondKind, GroupKind, MatchFlags, RestartKind, SyntaxFlags, WildMode};
pub use names::{NameTable, hash_name};
pub use node::{
    ByteMap, CharMap, CharSetSpec, INFINITE, LongSet, NO_SCOPE, Node, NodeTag, Repeat, UNLINKED,
};
pub use program::{Program, ProgramParts};

#[cfg(test)]
mod flags_tests;
#[cfg(test)]
mod names_tests;
