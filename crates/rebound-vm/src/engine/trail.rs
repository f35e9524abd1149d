//! Match registers with an undo trail.
//!
//! Every write to a register logs the previous value. Backtracking rewinds
//! the trail to the watermark a checkpoint recorded, so checkpoints stay
//! small no matter how many groups and repeats a program has.

/// A capture span as byte offsets into the input.
pub type Span = (usize, usize);

/// Loop state of one repeat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counter {
    /// Completed iterations.
    pub count: u32,
    /// Input position at the start of the current iteration.
    pub start: usize,
}

#[derive(Clone, Copy, Debug)]
enum Undo {
    Capture { index: u32, old: Option<Span> },
    Open { index: u32, old: Option<usize> },
    Counter { id: u32, old: Counter },
    Icase(bool),
}

/// Register values saved by a recursion frame.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    captures: Vec<Option<Span>>,
    open: Vec<Option<usize>>,
    counters: Vec<Counter>,
}

#[derive(Debug, Default)]
pub struct Registers {
    /// Closed capture spans; index 0 is filled in when a match completes.
    pub captures: Vec<Option<Span>>,
    /// Start positions of groups that are open right now.
    pub open: Vec<Option<usize>>,
    pub counters: Vec<Counter>,
    /// Case folding for backreferences, switched by `CaseToggle` nodes.
    pub icase: bool,
    trail: Vec<Undo>,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self, groups: usize, repeats: usize, icase: bool) {
        self.captures.clear();
        self.captures.resize(groups, None);
        self.open.clear();
        self.open.resize(groups, None);
        self.counters.clear();
        self.counters.resize(repeats, Counter::default());
        self.icase = icase;
        self.trail.clear();
    }

    pub fn set_capture(&mut self, index: u32, value: Option<Span>) {
        let old = std::mem::replace(&mut self.captures[index as usize], value);
        self.trail.push(Undo::Capture { index, old });
    }

    pub fn set_open(&mut self, index: u32, value: Option<usize>) {
        let old = std::mem::replace(&mut self.open[index as usize], value);
        self.trail.push(Undo::Open { index, old });
    }

    pub fn set_counter(&mut self, id: u32, value: Counter) {
        let old = std::mem::replace(&mut self.counters[id as usize], value);
        self.trail.push(Undo::Counter { id, old });
    }

    pub fn set_icase(&mut self, icase: bool) {
        let old = std::mem::replace(&mut self.icase, icase);
        self.trail.push(Undo::Icase(old));
    }

    pub fn capture(&self, index: u32) -> Option<Span> {
        self.captures.get(index as usize).copied().flatten()
    }

    #[inline]
    pub fn watermark(&self) -> usize {
        self.trail.len()
    }

    /// Undo every write made after `watermark`.
    pub fn rewind(&mut self, watermark: usize) {
        while self.trail.len() > watermark {
            let Some(undo) = self.trail.pop() else {
                break;
            };
            match undo {
                Undo::Capture { index, old } => self.captures[index as usize] = old,
                Undo::Open { index, old } => self.open[index as usize] = old,
                Undo::Counter { id, old } => self.counters[id as usize] = old,
                Undo::Icase(old) => self.icase = old,
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            captures: self.captures.clone(),
            open: self.open.clone(),
            counters: self.counters.clone(),
        }
    }

    /// Puts back a snapshot through the trail, so the restore itself can
    /// be backtracked over.
    pub fn restore(&mut self, saved: &Snapshot) {
        for (i, &value) in saved.captures.iter().enumerate() {
            if self.captures[i] != value {
                self.set_capture(i as u32, value);
            }
        }
        for (i, &value) in saved.open.iter().enumerate() {
            if self.open[i] != value {
                self.set_open(i as u32, value);
            }
        }
        for (i, &value) in saved.counters.iter().enumerate() {
            if self.counters[i] != value {
                self.set_counter(i as u32, value);
            }
        }
    }
}
