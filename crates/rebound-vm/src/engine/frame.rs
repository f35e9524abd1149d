//! Call frame arena for pattern recursion.
//!
//! Implements the cactus stack pattern: frames are append-only,
//! with a current pointer that can be restored for backtracking.

use super::trail::Snapshot;

/// Frame pushed by a `Recurse` node.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Where to continue once the called group ends.
    pub return_addr: u32,
    /// Parent frame index (for cactus stack).
    pub parent: Option<u32>,
    /// Called group; 0 is the whole pattern.
    pub group: i32,
    /// Input position at the call.
    pub entry_pos: usize,
    /// Number of frames in this chain, this one included.
    pub depth: u32,
    /// Registers at the call, put back on return.
    pub saved: Snapshot,
}

/// Append-only arena for frames (cactus stack implementation).
///
/// Frames are never deallocated during execution - "pop" just moves
/// the current pointer. This allows checkpoint restoration without
/// invalidating frames referenced by other checkpoints.
#[derive(Debug, Default)]
pub struct FrameArena {
    frames: Vec<Frame>,
    current: Option<u32>,
}

impl FrameArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new frame, returns its index.
    pub fn push(&mut self, return_addr: u32, group: i32, entry_pos: usize, saved: Snapshot) -> u32 {
        let idx = self.frames.len() as u32;
        self.frames.push(Frame {
            return_addr,
            parent: self.current,
            group,
            entry_pos,
            depth: self.depth() + 1,
            saved,
        });
        self.current = Some(idx);
        idx
    }

    /// Leave the current frame, returning a copy of it.
    pub fn pop(&mut self) -> Option<Frame> {
        let frame = self.frames[self.current? as usize].clone();
        self.current = frame.parent;
        Some(frame)
    }

    /// Restore frame state for backtracking.
    #[inline]
    pub fn restore(&mut self, frame_index: Option<u32>) {
        self.current = frame_index;
    }

    #[inline]
    pub fn current(&self) -> Option<u32> {
        self.current
    }

    /// Group called by the innermost active frame.
    #[inline]
    pub fn current_group(&self) -> Option<i32> {
        self.current.map(|i| self.frames[i as usize].group)
    }

    pub fn depth(&self) -> u32 {
        self.current.map_or(0, |i| self.frames[i as usize].depth)
    }

    /// Active frames, innermost first.
    pub fn chain(&self) -> impl Iterator<Item = &Frame> {
        let mut idx = self.current;
        std::iter::from_fn(move || {
            let frame = &self.frames[idx? as usize];
            idx = frame.parent;
            Some(frame)
        })
    }

    /// Prune frames above high-water mark.
    ///
    /// Frames are only pruned after a return, when we know no checkpoint
    /// references them. The `max_referenced` is the highest frame index
    /// still referenced by any active checkpoint.
    pub fn prune(&mut self, max_referenced: Option<u32>) {
        let keep = match (self.current, max_referenced) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        match keep {
            Some(high_water) => self.frames.truncate(high_water as usize + 1),
            None => self.frames.clear(),
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.current = None;
    }
}
