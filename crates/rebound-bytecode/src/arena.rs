//! Growable, aligned byte arena backing the node graph.
//!
//! Nodes are addressed by byte offset, never by pointer: the backing
//! buffer moves whenever it grows. The buffer starts on a 64-byte
//! boundary and every node starts on a [`WORD`] boundary, so fixed-size
//! node headers never straddle unaligned memory.
//!
//! There is no per-node deallocation. The whole arena is dropped with the
//! program that owns it.

use std::ops::Deref;

/// Base alignment of the backing buffer.
pub const ALIGN: usize = 64;

/// Alignment of every node start.
pub const WORD: usize = std::mem::size_of::<usize>();

#[repr(C, align(64))]
#[derive(Clone, Copy)]
struct Block([u8; ALIGN]);

impl Block {
    const ZERO: Self = Self([0; ALIGN]);
}

/// Append-only byte arena with geometric growth and gap insertion.
///
/// `Vec<Block>` guarantees element alignment, so the data starts at a
/// 64-byte boundary without a custom allocator.
#[derive(Clone, Default)]
pub struct Arena {
    blocks: Vec<Block>,
    len: usize,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        let mut arena = Self::new();
        arena.reserve(bytes);
        arena
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.blocks.len() * ALIGN
    }

    pub fn as_slice(&self) -> &[u8] {
        if self.blocks.is_empty() {
            return &[];
        }
        debug_assert!(self.len <= self.capacity());
        // SAFETY: Block is repr(C) over [u8; 64], so the blocks form one
        // contiguous initialized byte region of `capacity()` bytes.
        unsafe { std::slice::from_raw_parts(self.blocks.as_ptr() as *const u8, self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        if self.blocks.is_empty() {
            return &mut [];
        }
        debug_assert!(self.len <= self.capacity());
        // SAFETY: see `as_slice`; the exclusive borrow of `self` covers the blocks.
        unsafe { std::slice::from_raw_parts_mut(self.blocks.as_mut_ptr() as *mut u8, self.len) }
    }

    /// Ensures room for `additional` more bytes, doubling the block count.
    ///
    /// Reallocation copies the existing bytes. Allocation failure aborts.
    fn reserve(&mut self, additional: usize) {
        let needed = self.len + additional;
        if needed <= self.capacity() {
            return;
        }
        let mut blocks = self.blocks.len().max(1);
        while blocks * ALIGN < needed {
            blocks *= 2;
        }
        self.blocks.resize(blocks, Block::ZERO);
    }

    /// Appends `n` zeroed bytes and returns them for writing.
    pub fn extend(&mut self, n: usize) -> &mut [u8] {
        self.reserve(n);
        let start = self.len;
        self.len += n;
        let region = &mut self.as_mut_slice()[start..];
        region.fill(0);
        region
    }

    /// Appends `bytes` and returns the offset they were written at.
    pub fn push(&mut self, bytes: &[u8]) -> usize {
        let at = self.len;
        self.extend(bytes.len()).copy_from_slice(bytes);
        at
    }

    /// Opens a zeroed gap of `n` bytes at `pos`, shifting the tail up.
    ///
    /// Offsets held by the caller that point at or past `pos` are now stale;
    /// fixing them up is the caller's job.
    pub fn insert(&mut self, pos: usize, n: usize) -> &mut [u8] {
        assert!(pos <= self.len, "insert at {pos} past end {}", self.len);
        self.reserve(n);
        let old_len = self.len;
        self.len += n;
        let bytes = self.as_mut_slice();
        bytes.copy_within(pos..old_len, pos + n);
        let gap = &mut bytes[pos..pos + n];
        gap.fill(0);
        gap
    }

    /// Converts an address inside the arena back to its offset.
    pub fn index(&self, ptr: *const u8) -> usize {
        let base = self.as_slice().as_ptr() as usize;
        let addr = ptr as usize;
        assert!(
            addr >= base && addr <= base + self.len,
            "pointer is not inside the arena"
        );
        addr - base
    }

    /// Pads the write cursor up to the next [`WORD`] boundary.
    pub fn align(&mut self) {
        let pad = self.len.next_multiple_of(WORD) - self.len;
        if pad > 0 {
            self.extend(pad);
        }
    }

    pub fn read_u32(&self, at: usize) -> u32 {
        let b = &self.as_slice()[at..at + 4];
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    pub fn write_u32(&mut self, at: usize, value: u32) {
        self.as_mut_slice()[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Deref for Arena {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field(
                "aligned",
                &(self.blocks.as_ptr() as usize).is_multiple_of(ALIGN),
            )
            .finish()
    }
}
