//! Test utilities.

use std::sync::Arc;

use rebound_bytecode::{MatchFlags, Program, SyntaxFlags};
use rebound_compiler::{CompileLimits, compile};
use rebound_core::DefaultTraits;

use crate::{MatchResults, RuntimeError, VM};

pub fn program(pattern: &str) -> Program {
    program_with(pattern, SyntaxFlags::PERL)
}

pub fn program_with(pattern: &str, flags: SyntaxFlags) -> Program {
    compile(
        pattern,
        flags,
        Arc::new(DefaultTraits::new()),
        CompileLimits::default(),
    )
    .unwrap_or_else(|e| panic!("{pattern:?} should compile: {e}"))
}

/// Searches `text` from the start and renders the outcome.
pub fn find(pattern: &str, text: &str) -> String {
    find_with(pattern, text, MatchFlags::NONE)
}

pub fn find_with(pattern: &str, text: &str, flags: MatchFlags) -> String {
    let program = program(pattern);
    let found = VM::builder(&program, text).flags(flags).build().search(0);
    render(&found)
}

/// Groups as quoted text, `-` for a group that did not participate.
pub fn render(found: &Result<Option<MatchResults<'_, '_>>, RuntimeError>) -> String {
    match found {
        Ok(Some(m)) => m
            .iter()
            .map(|g| {
                if g.matched {
                    format!("{:?}", g.as_str())
                } else {
                    "-".to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        Ok(None) => "no match".to_owned(),
        Err(e) => format!("error: {}", e.code()),
    }
}

/// Offsets of the leftmost match.
pub fn span(pattern: &str, text: &str) -> Option<(usize, usize)> {
    let program = program(pattern);
    let found = VM::builder(&program, text)
        .build()
        .search(0)
        .unwrap_or_else(|e| panic!("{pattern:?} on {text:?} failed: {e}"));
    found.map(|m| (m.start(), m.end()))
}
