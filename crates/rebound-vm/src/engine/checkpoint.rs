//! Checkpoints for backtracking.
//!
//! Every choice the VM makes (take a branch, run another repeat iteration,
//! enter an assertion) saves a checkpoint. On failure the most recent one
//! is restored and its [`Resume`] decides what happens next.

/// A backtracking verb that was passed and fires when backtracked into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verb {
    Prune,
    Skip,
    Commit,
    Then { scope: u32 },
}

/// What restoring a checkpoint does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resume {
    /// Continue at the saved ip: a repeat exit or a lazy iteration.
    Retry,
    /// Try the next alternative of an alternation.
    Branch { scope: u32 },
    /// Marks that the last alternative of `scope` is running.
    Fence { scope: u32 },
    /// Start of an atomic group; cut away when the group ends.
    Barrier,
    /// Start of an assertion. The saved ip is the assertion's end mark.
    Assertion {
        negated: bool,
        cond_no: Option<u32>,
    },
    Verb(Verb),
}

/// Checkpoint for backtracking.
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint {
    /// Input position to restore.
    pub pos: usize,
    /// Resume point (node offset).
    pub ip: u32,
    /// Undo trail length at checkpoint.
    pub trail_watermark: usize,
    /// Frame arena state at checkpoint.
    pub frame_index: Option<u32>,
    pub resume: Resume,
}

/// Stack of checkpoints with O(1) max_frame_ref tracking.
///
/// The `max_frame_ref` is maintained for frame arena pruning:
/// we track the highest frame index referenced by any checkpoint
/// so pruning knows which frames are safe to remove.
#[derive(Debug, Default)]
pub struct CheckpointStack {
    stack: Vec<Checkpoint>,
    max_frame_ref: Option<u32>,
}

impl CheckpointStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, checkpoint: Checkpoint) {
        if let Some(frame_idx) = checkpoint.frame_index {
            self.max_frame_ref = Some(match self.max_frame_ref {
                Some(max) => max.max(frame_idx),
                None => frame_idx,
            });
        }
        self.stack.push(checkpoint);
    }

    /// Pop and return the most recent checkpoint.
    pub fn pop(&mut self) -> Option<Checkpoint> {
        let cp = self.stack.pop()?;
        if self.stack.is_empty() {
            self.max_frame_ref = None;
        } else if cp.frame_index.is_some() && cp.frame_index == self.max_frame_ref {
            self.recompute_max();
        }
        Some(cp)
    }

    /// Removes the most recent checkpoint matching `pred` together with
    /// everything pushed after it, and returns it.
    pub fn cut_to_last(&mut self, pred: impl Fn(&Resume) -> bool) -> Option<Checkpoint> {
        let at = self.stack.iter().rposition(|cp| pred(&cp.resume))?;
        let cp = self.stack[at];
        self.stack.truncate(at);
        self.recompute_max();
        Some(cp)
    }

    /// The most recent checkpoint matching `pred`, left in place.
    pub fn find_last(&self, pred: impl Fn(&Resume) -> bool) -> Option<&Checkpoint> {
        self.stack.iter().rev().find(|cp| pred(&cp.resume))
    }

    fn recompute_max(&mut self) {
        self.max_frame_ref = self.stack.iter().filter_map(|c| c.frame_index).max();
    }

    /// Get the highest frame index referenced by any checkpoint.
    #[inline]
    pub fn max_frame_ref(&self) -> Option<u32> {
        self.max_frame_ref
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.max_frame_ref = None;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }
}
