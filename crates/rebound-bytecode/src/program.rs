//! The compiled expression.
//!
//! A [`Program`] owns the node arena and every piece of metadata the
//! matcher needs. It is immutable once built and is shared across threads
//! behind an `Arc`.

use std::sync::Arc;

use rebound_core::CharTraits;

use crate::arena::Arena;
use crate::flags::{RestartKind, SyntaxFlags};
use crate::names::NameTable;
use crate::node::{CharMap, Header, Node, node_size, walk};

/// Everything the compiler produces, handed over in one piece.
#[derive(Debug)]
pub struct ProgramParts {
    pub arena: Arena,
    pub pattern: String,
    pub flags: SyntaxFlags,
    /// Number of capturing groups, group 0 excluded.
    pub mark_count: u32,
    pub repeat_count: u32,
    pub names: NameTable,
    pub start_map: CharMap,
    pub can_be_null: bool,
    pub restart: RestartKind,
    pub literal_prefix: Option<String>,
    pub has_recursion: bool,
    pub has_backrefs: bool,
    pub has_verbs: bool,
    /// Offset of the start mark of each capture group; index 0 is the program start.
    pub group_starts: Vec<u32>,
    pub traits: Arc<dyn CharTraits>,
}

#[derive(Debug)]
pub struct Program {
    parts: ProgramParts,
}

impl Program {
    pub fn new(parts: ProgramParts) -> Self {
        Self { parts }
    }

    pub fn bytes(&self) -> &[u8] {
        self.parts.arena.as_slice()
    }

    /// Entry point of the node graph.
    pub fn start(&self) -> u32 {
        0
    }

    #[inline]
    pub fn node(&self, at: u32) -> Node<'_> {
        Node::decode(self.bytes(), at as usize)
    }

    #[inline]
    pub fn next(&self, at: u32) -> u32 {
        Header::read(self.bytes(), at as usize).next
    }

    /// Offset just past the node at `at`.
    pub fn after(&self, at: u32) -> u32 {
        at + node_size(self.bytes(), at as usize) as u32
    }

    pub fn nodes(&self) -> impl Iterator<Item = (u32, Node<'_>)> {
        walk(self.bytes())
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn pattern(&self) -> &str {
        &self.parts.pattern
    }

    pub fn flags(&self) -> SyntaxFlags {
        self.parts.flags
    }

    pub fn mark_count(&self) -> u32 {
        self.parts.mark_count
    }

    pub fn repeat_count(&self) -> u32 {
        self.parts.repeat_count
    }

    pub fn names(&self) -> &NameTable {
        &self.parts.names
    }

    pub fn start_map(&self) -> &CharMap {
        &self.parts.start_map
    }

    pub fn can_be_null(&self) -> bool {
        self.parts.can_be_null
    }

    pub fn restart(&self) -> RestartKind {
        self.parts.restart
    }

    pub fn literal_prefix(&self) -> Option<&str> {
        self.parts.literal_prefix.as_deref()
    }

    pub fn has_recursion(&self) -> bool {
        self.parts.has_recursion
    }

    pub fn has_backrefs(&self) -> bool {
        self.parts.has_backrefs
    }

    pub fn has_verbs(&self) -> bool {
        self.parts.has_verbs
    }

    pub fn group_start(&self, index: u32) -> Option<u32> {
        self.parts.group_starts.get(index as usize).copied()
    }

    pub fn traits(&self) -> &dyn CharTraits {
        self.parts.traits.as_ref()
    }

    pub fn shared_traits(&self) -> Arc<dyn CharTraits> {
        Arc::clone(&self.parts.traits)
    }

    /// Whether searches pick the leftmost-longest candidate by default.
    pub fn is_posix(&self) -> bool {
        self.parts.flags.is_posix()
    }
}
