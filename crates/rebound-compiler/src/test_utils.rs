//! Test utilities.

use std::sync::Arc;

use rebound_bytecode::{Program, SyntaxFlags, format_node};
use rebound_core::{Colors, DefaultTraits};

use crate::{CompileError, CompileLimits, compile};

pub fn compile_with(pattern: &str, flags: SyntaxFlags) -> Result<Program, CompileError> {
    compile(
        pattern,
        flags,
        Arc::new(DefaultTraits::new()),
        CompileLimits::default(),
    )
}

pub fn expect_valid(pattern: &str) -> Program {
    expect_valid_with(pattern, SyntaxFlags::PERL)
}

pub fn expect_valid_with(pattern: &str, flags: SyntaxFlags) -> Program {
    compile_with(pattern, flags).unwrap_or_else(|e| panic!("{pattern:?} should compile: {e}"))
}

pub fn expect_invalid(pattern: &str) -> CompileError {
    expect_invalid_with(pattern, SyntaxFlags::PERL)
}

pub fn expect_invalid_with(pattern: &str, flags: SyntaxFlags) -> CompileError {
    match compile_with(pattern, flags) {
        Ok(_) => panic!("{pattern:?} should not compile"),
        Err(e) => e,
    }
}

/// Node listing, one `offset node` line per node.
pub fn listing(program: &Program) -> String {
    program
        .nodes()
        .map(|(at, node)| format!("{at:04} {}", format_node(&node, Colors::OFF)))
        .collect::<Vec<_>>()
        .join("\n")
}
