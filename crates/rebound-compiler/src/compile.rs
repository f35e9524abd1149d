//! Compilation pipeline: parse, link, analyze.

use std::sync::Arc;

use rebound_bytecode::{Program, ProgramParts, SyntaxFlags};
use rebound_core::CharTraits;

use crate::analyze::analyze;
use crate::error::CompileError;
use crate::parser::Parser;

/// Resource ceilings enforced while compiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileLimits {
    pub(crate) max_size: usize,
    pub(crate) max_depth: usize,
    pub(crate) max_recursion_refs: usize,
}

impl Default for CompileLimits {
    fn default() -> Self {
        Self {
            max_size: 16 * 1024 * 1024,
            max_depth: 1000,
            max_recursion_refs: 10_000,
        }
    }
}

impl CompileLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest program, in arena bytes.
    pub fn max_size(mut self, bytes: usize) -> Self {
        self.max_size = bytes;
        self
    }

    /// Deepest group nesting.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Most recursion calls in one pattern.
    pub fn max_recursion_refs(mut self, refs: usize) -> Self {
        self.max_recursion_refs = refs;
        self
    }

    pub fn get_max_size(&self) -> usize {
        self.max_size
    }

    pub fn get_max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn get_max_recursion_refs(&self) -> usize {
        self.max_recursion_refs
    }
}

/// Compiles `pattern` into an immutable program.
pub fn compile(
    pattern: &str,
    flags: SyntaxFlags,
    traits: Arc<dyn CharTraits>,
    limits: CompileLimits,
) -> Result<Program, CompileError> {
    let parsed = Parser::new(pattern, flags, traits.as_ref(), limits).parse()?;
    let mut emit = parsed.emit;
    emit.link();

    let can_lead = !parsed.has_backrefs && !parsed.has_recursion && !parsed.has_verbs;
    let analysis = analyze(&mut emit, traits.as_ref(), parsed.has_recursion, can_lead);

    Ok(Program::new(ProgramParts {
        arena: emit.into_arena(),
        pattern: pattern.to_owned(),
        flags,
        mark_count: parsed.mark_count,
        repeat_count: parsed.repeat_count,
        names: parsed.names,
        start_map: analysis.start_map,
        can_be_null: analysis.can_be_null,
        restart: analysis.restart,
        literal_prefix: analysis.literal_prefix,
        has_recursion: parsed.has_recursion,
        has_backrefs: parsed.has_backrefs,
        has_verbs: parsed.has_verbs,
        group_starts: parsed.group_starts,
        traits,
    }))
}
