//! Node emission into the arena.
//!
//! The parser appends nodes as it reads the pattern and occasionally opens
//! a gap in front of already emitted nodes (alternations and repeats are
//! only recognized after their operand). Every absolute target stored in
//! the arena is fixed up when that happens.

use rebound_bytecode::node::{Header, UNLINKED, field, node_size, read_u32};
use rebound_bytecode::{Arena, Node, NodeTag};

#[derive(Debug, Default)]
pub struct Emitter {
    arena: Arena,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> u32 {
        self.arena.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        self.arena.as_slice()
    }

    pub fn node(&self, at: u32) -> Node<'_> {
        Node::decode(self.bytes(), at as usize)
    }

    pub fn tag(&self, at: u32) -> NodeTag {
        Header::read(self.bytes(), at as usize).tag
    }

    /// Offset just past the node at `at`.
    pub fn after(&self, at: u32) -> u32 {
        at + node_size(self.bytes(), at as usize) as u32
    }

    /// Appends a node and returns its offset.
    pub fn append(&mut self, node: &Node<'_>) -> u32 {
        self.append_encoded(&node.encode())
    }

    pub fn append_encoded(&mut self, bytes: &[u8]) -> u32 {
        self.arena.align();
        self.arena.push(bytes) as u32
    }

    /// Inserts a node at `pos` and returns the number of bytes inserted.
    ///
    /// A target equal to `pos` keeps pointing at `pos` (now the new node)
    /// unless it is held by a node that moves along with the gap.
    pub fn insert(&mut self, pos: u32, node: &Node<'_>) -> u32 {
        let bytes = node.encode();
        let n = bytes.len() as u32;

        let mut at = 0usize;
        while at < self.arena.len() {
            let tag = Header::read(self.bytes(), at).tag;
            for &f in tag.target_fields() {
                let target = self.arena.read_u32(at + f);
                if target == UNLINKED {
                    continue;
                }
                if target > pos || (target == pos && at as u32 >= pos) {
                    self.arena.write_u32(at + f, target + n);
                }
            }
            at += node_size(self.bytes(), at);
        }

        self.arena
            .insert(pos as usize, n as usize)
            .copy_from_slice(&bytes);
        n
    }

    pub fn read(&self, at: u32, offset: usize) -> u32 {
        read_u32(self.bytes(), at as usize + offset)
    }

    pub fn patch(&mut self, at: u32, offset: usize, value: u32) {
        self.arena.write_u32(at as usize + offset, value);
    }

    pub fn set_flags(&mut self, at: u32, bits: u8) {
        self.arena.as_mut_slice()[at as usize + 1] |= bits;
    }

    /// Overwrites `len` bytes of a node payload in place.
    pub fn write_bytes(&mut self, at: u32, offset: usize, bytes: &[u8]) {
        let start = at as usize + offset;
        self.arena.as_mut_slice()[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// Sets every `next` to the node that physically follows.
    pub fn link(&mut self) {
        let mut at = 0usize;
        while at < self.arena.len() {
            let next = at + node_size(self.bytes(), at);
            self.arena.write_u32(at + field::NEXT, next as u32);
            at = next;
        }
    }

    pub fn into_arena(self) -> Arena {
        self.arena
    }
}
