//! Backtracking virtual machine over a compiled program.

use rebound_bytecode::{
    ByteMap, CondKind, GroupKind, MatchFlags, NO_SCOPE, Node, Program, Repeat, SyntaxFlags,
    WildMode,
};

use super::checkpoint::{Checkpoint, CheckpointStack, Resume, Verb};
use super::error::RuntimeError;
use super::frame::FrameArena;
use super::input::Input;
use super::trace::Tracer;
use super::trail::{Counter, Registers, Span};
use crate::results::prefer;

/// Runtime limits for a single search.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    /// Maximum node visits; `None` derives a budget from the input.
    pub(crate) exec_fuel: Option<u32>,
    /// Maximum pending checkpoints (default: 1,048,576).
    pub(crate) checkpoint_limit: u32,
    /// Maximum recursion depth (default: 1,024).
    pub(crate) recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: None,
            checkpoint_limit: 1 << 20,
            recursion_limit: 1024,
        }
    }
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = Some(fuel);
        self
    }

    /// Set the checkpoint stack limit.
    pub fn checkpoint_limit(mut self, limit: u32) -> Self {
        self.checkpoint_limit = limit;
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> Option<u32> {
        self.exec_fuel
    }
    pub fn get_checkpoint_limit(&self) -> u32 {
        self.checkpoint_limit
    }
    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Automatic state-visit budget for `states` nodes over `len` input bytes.
pub fn estimate_fuel(states: usize, len: usize) -> u32 {
    let n = len as u128;
    let s = states as u128;
    let budget = (n * s * s).max(n * n) + 100_000;
    budget.min(100_000_000) as u32
}

/// How one attempt at a start position ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Attempt {
    Matched,
    Failed,
    /// `(*SKIP)` fired: the next attempt starts here.
    SkipTo(usize),
    /// `(*COMMIT)` fired: no further attempts.
    Committed,
}

pub(crate) enum Step {
    Continue,
    Done(Attempt),
}

type StepResult = Result<Step, RuntimeError>;

enum Literal {
    Matched(usize),
    Mismatch,
    /// Input ended while the literal still matched.
    Truncated,
}

/// Virtual machine state for one search.
pub struct VM<'p, 't> {
    pub(crate) program: &'p Program,
    pub(crate) input: Input<'t>,
    pub(crate) flags: MatchFlags,
    pub(crate) limits: FuelLimits,
    pub(crate) fuel: u32,

    /// Current node offset.
    pub(crate) ip: u32,
    /// Current input position (byte offset).
    pub(crate) pos: usize,
    /// Start of the current attempt.
    pub(crate) start: usize,
    /// Set by whole-input matching.
    pub(crate) required_end: Option<usize>,

    pub(crate) regs: Registers,
    pub(crate) checkpoints: CheckpointStack,
    pub(crate) frames: FrameArena,

    /// Accepted capture set of the current attempt.
    pub(crate) best: Option<Vec<Option<Span>>>,
    /// The attempt ran into the end of input under `PARTIAL`.
    pub(crate) partial: bool,
    /// Furthest position a leading `.*` reached in the current attempt.
    pub(crate) leading_reach: Option<usize>,
}

/// Builder for VM instances.
pub struct VMBuilder<'p, 't> {
    program: &'p Program,
    text: &'t str,
    flags: MatchFlags,
    limits: FuelLimits,
}

impl<'p, 't> VMBuilder<'p, 't> {
    pub fn new(program: &'p Program, text: &'t str) -> Self {
        Self {
            program,
            text,
            flags: MatchFlags::NONE,
            limits: FuelLimits::default(),
        }
    }

    /// Set the match flags.
    pub fn flags(mut self, flags: MatchFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the fuel limits.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.limits = self.limits.recursion_limit(limit);
        self
    }

    pub fn build(self) -> VM<'p, 't> {
        VM {
            program: self.program,
            input: Input::new(self.text),
            flags: self.flags,
            limits: self.limits,
            fuel: 0,
            ip: 0,
            pos: 0,
            start: 0,
            required_end: None,
            regs: Registers::new(),
            checkpoints: CheckpointStack::new(),
            frames: FrameArena::new(),
            best: None,
            partial: false,
            leading_reach: None,
        }
    }
}

impl<'p, 't> VM<'p, 't> {
    /// Create a VM builder.
    pub fn builder(program: &'p Program, text: &'t str) -> VMBuilder<'p, 't> {
        VMBuilder::new(program, text)
    }

    /// Runs the program anchored at `start` until it matches or runs out
    /// of alternatives.
    pub(crate) fn run_attempt<T: Tracer>(
        &mut self,
        start: usize,
        tracer: &mut T,
    ) -> Result<Attempt, RuntimeError> {
        let program = self.program;
        self.start = start;
        self.pos = start;
        self.ip = program.start();
        self.regs.reset(
            program.mark_count() as usize + 1,
            program.repeat_count() as usize,
            program.flags().contains(SyntaxFlags::ICASE),
        );
        self.checkpoints.clear();
        self.frames.clear();
        self.best = None;
        self.partial = false;
        self.leading_reach = None;
        tracer.trace_attempt(start);

        loop {
            if self.fuel == 0 {
                return Err(RuntimeError::Complexity);
            }
            self.fuel -= 1;

            let node = program.node(self.ip);
            tracer.trace_node(self.ip, self.pos, &node);
            if let Step::Done(attempt) = self.step(node, tracer)? {
                return Ok(attempt);
            }
        }
    }

    fn step<T: Tracer>(&mut self, node: Node<'p>, tracer: &mut T) -> StepResult {
        let program = self.program;
        let ip = self.ip;
        let next = program.next(ip);
        let pos = self.pos;

        match node {
            Node::Literal { text, icase } => match self.match_literal(text, icase) {
                Literal::Matched(end) => {
                    self.pos = end;
                    self.goto(next)
                }
                Literal::Mismatch => self.backtrack(tracer),
                Literal::Truncated => {
                    self.hit_end();
                    self.backtrack(tracer)
                }
            },
            Node::Wild { mode } => {
                let c = self.input.char_at(pos);
                let ok = c.is_some_and(|c| self.wild_allows(c, mode));
                self.consume(c, ok, next, tracer)
            }
            Node::Set {
                map,
                negated,
                icase,
            } => {
                let c = self.input.char_at(pos);
                let ok = c.is_some_and(|c| {
                    let folded = program.traits().translate(c, icase) as u32;
                    u8::try_from(folded).is_ok_and(|b| map.contains(b)) != negated
                });
                self.consume(c, ok, next, tracer)
            }
            Node::LongSet(set) => {
                let c = self.input.char_at(pos);
                let ok = c.is_some_and(|c| set.contains(c, program.traits()));
                self.consume(c, ok, next, tracer)
            }
            Node::Combining => self.exec_combining(next, tracer),
            Node::Backref { value, named } => self.exec_backref(value, named, next, tracer),

            Node::StartLine { single_line } => {
                let ok = self.at_line_start(single_line);
                self.test(ok, next, tracer)
            }
            Node::EndLine { single_line } => {
                let ok = self.at_line_end(single_line);
                self.test(ok, next, tracer)
            }
            Node::WordBoundary => {
                let (before, after) = self.word_context();
                let ok = before != after && self.boundary_allowed(before, after);
                self.test(ok, next, tracer)
            }
            Node::NotWordBoundary => {
                let (before, after) = self.word_context();
                self.test(before == after, next, tracer)
            }
            Node::WordStart => {
                let (before, after) = self.word_context();
                let ok = !before && after && self.boundary_allowed(before, after);
                self.test(ok, next, tracer)
            }
            Node::WordEnd => {
                let (before, after) = self.word_context();
                let ok = before && !after && self.boundary_allowed(before, after);
                self.test(ok, next, tracer)
            }
            Node::BufferStart => {
                let ok = pos == self.input.floor && !self.flags.contains(MatchFlags::NOT_BOB);
                self.test(ok, next, tracer)
            }
            Node::BufferEnd => {
                let ok = pos == self.input.end() && !self.flags.contains(MatchFlags::NOT_EOB);
                self.test(ok, next, tracer)
            }
            Node::SoftBufferEnd => {
                let rest = &self.input.text[pos..];
                let ok = rest.chars().all(|c| program.traits().is_separator(c))
                    && !self.flags.contains(MatchFlags::NOT_EOB);
                self.test(ok, next, tracer)
            }
            Node::ContinueMatch => {
                let ok = pos == self.input.base;
                self.test(ok, next, tracer)
            }

            Node::Jump { target } => {
                if target < ip
                    && let Node::Repeat(r) = program.node(target)
                {
                    return self.continue_repeat(target, r, tracer);
                }
                self.goto(target)
            }
            Node::Alt {
                alt,
                scope,
                take,
                skip,
                take_null,
                skip_null,
            } => {
                let c = self.input.char_at(pos);
                let take_ok = self.map_allows(take, take_null, c);
                let skip_ok = self.map_allows(skip, skip_null, c);
                if take_ok {
                    if skip_ok || program.has_verbs() {
                        self.push_checkpoint(alt, Resume::Branch { scope }, tracer)?;
                    }
                    self.goto(next)
                } else if skip_ok {
                    self.resume_branch(alt, scope, tracer)
                } else {
                    self.backtrack(tracer)
                }
            }
            Node::Repeat(r) => {
                self.regs.set_counter(r.id, Counter { count: 0, start: pos });
                if r.leading {
                    self.note_leading(pos);
                }
                self.decide_repeat(ip, r, false, tracer)
            }

            Node::StartMark {
                kind,
                index,
                end,
                cond_no,
            } => match kind {
                GroupKind::Capture => {
                    self.regs.set_open(index as u32, Some(pos));
                    self.goto(next)
                }
                GroupKind::NonCapture => self.goto(next),
                GroupKind::Atomic => {
                    self.push_checkpoint(ip, Resume::Barrier, tracer)?;
                    self.goto(next)
                }
                _ => {
                    let resume = Resume::Assertion {
                        negated: kind.is_negated(),
                        cond_no,
                    };
                    self.push_checkpoint(end, resume, tracer)?;
                    self.goto(next)
                }
            },
            Node::EndMark { kind, index } => match kind {
                GroupKind::Capture => {
                    if self.frames.current_group() == Some(index) {
                        return self.return_from_frame(tracer);
                    }
                    self.close_group(index as u32, tracer);
                    self.goto(next)
                }
                GroupKind::NonCapture => self.goto(next),
                GroupKind::Atomic => {
                    self.checkpoints
                        .cut_to_last(|r| matches!(r, Resume::Barrier));
                    self.goto(next)
                }
                _ => {
                    let Some(cp) = self
                        .checkpoints
                        .cut_to_last(|r| matches!(r, Resume::Assertion { .. }))
                    else {
                        return self.backtrack(tracer);
                    };
                    self.finish_assertion(cp, tracer)
                }
            },
            Node::Backstep { width } => match self.input.back(pos, width) {
                Some(at) => {
                    self.pos = at;
                    self.goto(next)
                }
                None => self.backtrack(tracer),
            },
            Node::CaseToggle { icase } => {
                self.regs.set_icase(icase);
                self.goto(next)
            }
            Node::Recurse { group, target } => self.exec_recurse(group, target, next, tracer),
            Node::Conditional { kind, value, alt } => {
                let yes = self.condition_holds(kind, value);
                self.goto(if yes { next } else { alt })
            }

            Node::Prune => self.pass_verb(Verb::Prune, next, tracer),
            Node::Skip => self.pass_verb(Verb::Skip, next, tracer),
            Node::Commit => self.pass_verb(Verb::Commit, next, tracer),
            Node::Then { scope } => self.pass_verb(Verb::Then { scope }, next, tracer),
            Node::Fail => self.backtrack(tracer),
            Node::Accept => self.exec_accept(tracer),
            Node::Match => {
                if self.frames.current().is_some() {
                    return self.return_from_frame(tracer);
                }
                self.exec_match(tracer)
            }
        }
    }

    #[inline]
    fn goto(&mut self, ip: u32) -> StepResult {
        self.ip = ip;
        Ok(Step::Continue)
    }

    /// Continue at `next` when a zero-width test passed, else backtrack.
    #[inline]
    fn test<T: Tracer>(&mut self, ok: bool, next: u32, tracer: &mut T) -> StepResult {
        if ok {
            self.goto(next)
        } else {
            self.backtrack(tracer)
        }
    }

    /// Consume `c` when it passed the node's test.
    fn consume<T: Tracer>(
        &mut self,
        c: Option<char>,
        ok: bool,
        next: u32,
        tracer: &mut T,
    ) -> StepResult {
        match c {
            Some(c) if ok => {
                self.pos += c.len_utf8();
                self.goto(next)
            }
            Some(_) => self.backtrack(tracer),
            None => {
                self.hit_end();
                self.backtrack(tracer)
            }
        }
    }

    /// A consuming node ran out of input.
    fn hit_end(&mut self) {
        if self.flags.contains(MatchFlags::PARTIAL) {
            self.partial = true;
        }
    }

    fn map_allows(&self, map: ByteMap<'_>, null: bool, c: Option<char>) -> bool {
        match c {
            Some(c) => map.allows(c),
            None => null || self.flags.contains(MatchFlags::PARTIAL),
        }
    }

    fn match_literal(&self, text: &str, icase: bool) -> Literal {
        let rest = &self.input.text[self.pos..];
        if !icase {
            if rest.starts_with(text) {
                return Literal::Matched(self.pos + text.len());
            }
            if text.starts_with(rest) {
                return Literal::Truncated;
            }
            return Literal::Mismatch;
        }

        let traits = self.program.traits();
        let mut at = self.pos;
        for want in text.chars() {
            let Some(c) = self.input.char_at(at) else {
                return Literal::Truncated;
            };
            if traits.translate(c, true) != want {
                return Literal::Mismatch;
            }
            at += c.len_utf8();
        }
        Literal::Matched(at)
    }

    fn wild_allows(&self, c: char, mode: WildMode) -> bool {
        let separator = self.program.traits().is_separator(c);
        match mode {
            WildMode::NoNewline if separator => return false,
            WildMode::Default if separator && self.flags.contains(MatchFlags::NOT_DOT_NEWLINE) => {
                return false;
            }
            _ => {}
        }
        !(c == '\0' && self.flags.contains(MatchFlags::NOT_DOT_NULL))
    }

    fn exec_combining<T: Tracer>(&mut self, next: u32, tracer: &mut T) -> StepResult {
        let traits = self.program.traits();
        let Some(c) = self.input.char_at(self.pos) else {
            self.hit_end();
            return self.backtrack(tracer);
        };
        if traits.is_combining(c) {
            return self.backtrack(tracer);
        }
        let mut at = self.pos + c.len_utf8();
        while let Some(m) = self.input.char_at(at) {
            if !traits.is_combining(m) {
                break;
            }
            at += m.len_utf8();
        }
        self.pos = at;
        self.goto(next)
    }

    fn exec_backref<T: Tracer>(
        &mut self,
        value: u32,
        named: bool,
        next: u32,
        tracer: &mut T,
    ) -> StepResult {
        let span = if named {
            self.program
                .names()
                .equal_range(value)
                .find_map(|i| self.regs.capture(i))
        } else {
            self.regs.capture(value)
        };
        let Some((s, e)) = span else {
            return self.backtrack(tracer);
        };

        let traits = self.program.traits();
        let icase = self.regs.icase;
        let mut at = self.pos;
        for want in self.input.text[s..e].chars() {
            let Some(c) = self.input.char_at(at) else {
                self.hit_end();
                return self.backtrack(tracer);
            };
            if traits.translate(c, icase) != traits.translate(want, icase) {
                return self.backtrack(tracer);
            }
            at += c.len_utf8();
        }
        self.pos = at;
        self.goto(next)
    }

    fn at_line_start(&self, single_line: bool) -> bool {
        let Some(prev) = self.input.char_before(self.pos) else {
            return !self.flags.contains(MatchFlags::NOT_BOL);
        };
        if single_line || self.flags.contains(MatchFlags::SINGLE_LINE) {
            return false;
        }
        // No line start between the halves of a CRLF.
        self.program.traits().is_separator(prev)
            && !(prev == '\r' && self.input.char_at(self.pos) == Some('\n'))
    }

    fn at_line_end(&self, single_line: bool) -> bool {
        let Some(c) = self.input.char_at(self.pos) else {
            return !self.flags.contains(MatchFlags::NOT_EOL);
        };
        if single_line || self.flags.contains(MatchFlags::SINGLE_LINE) {
            return false;
        }
        self.program.traits().is_separator(c)
            && !(c == '\n' && self.input.char_before(self.pos) == Some('\r'))
    }

    /// Word-ness of the characters before and at the cursor.
    fn word_context(&self) -> (bool, bool) {
        let traits = self.program.traits();
        let before = self
            .input
            .char_before(self.pos)
            .is_some_and(|c| traits.is_word(c));
        let after = self
            .input
            .char_at(self.pos)
            .is_some_and(|c| traits.is_word(c));
        (before, after)
    }

    /// Applies `NOT_BOW`/`NOT_EOW` to a boundary at the input edges.
    fn boundary_allowed(&self, before: bool, after: bool) -> bool {
        let at_floor = self.input.char_before(self.pos).is_none();
        let at_end = self.pos == self.input.end();
        !(after && at_floor && self.flags.contains(MatchFlags::NOT_BOW))
            && !(before && at_end && self.flags.contains(MatchFlags::NOT_EOW))
    }

    fn note_leading(&mut self, pos: usize) {
        self.leading_reach = Some(self.leading_reach.map_or(pos, |r| r.max(pos)));
    }

    /// Loop back from the end of a repeat body.
    fn continue_repeat<T: Tracer>(&mut self, at: u32, r: Repeat<'p>, tracer: &mut T) -> StepResult {
        let counter = self.regs.counters[r.id as usize];
        let stalled = counter.start == self.pos;
        self.regs.set_counter(
            r.id,
            Counter {
                count: counter.count.saturating_add(1),
                start: self.pos,
            },
        );
        if r.leading {
            self.note_leading(self.pos);
        }
        self.decide_repeat(at, r, stalled, tracer)
    }

    /// Chooses between another iteration and the exit.
    ///
    /// An iteration that consumed nothing ends the loop, whatever the bounds.
    fn decide_repeat<T: Tracer>(
        &mut self,
        at: u32,
        r: Repeat<'p>,
        stalled: bool,
        tracer: &mut T,
    ) -> StepResult {
        let count = self.regs.counters[r.id as usize].count;
        let c = self.input.char_at(self.pos);
        let body = self.program.next(at);
        let take = count < r.max && !stalled && self.map_allows(r.take, r.take_null, c);
        let exit = (count >= r.min || stalled) && self.map_allows(r.skip, r.skip_null, c);

        match (r.greedy, take, exit) {
            (true, true, exit) => {
                if exit {
                    self.push_checkpoint(r.alt, Resume::Retry, tracer)?;
                }
                self.goto(body)
            }
            (false, take, true) => {
                if take {
                    self.push_checkpoint(body, Resume::Retry, tracer)?;
                }
                self.goto(r.alt)
            }
            (_, true, false) => self.goto(body),
            (_, false, true) => self.goto(r.alt),
            (_, false, false) => self.backtrack(tracer),
        }
    }

    /// Enter the alternative at `ip`, fencing the last one of a scope so
    /// `(*THEN)` inside it can tell it has nothing left to try.
    fn resume_branch<T: Tracer>(&mut self, ip: u32, scope: u32, tracer: &mut T) -> StepResult {
        if self.program.has_verbs() && !matches!(self.program.node(ip), Node::Alt { .. }) {
            self.push_checkpoint(ip, Resume::Fence { scope }, tracer)?;
        }
        self.goto(ip)
    }

    fn close_group<T: Tracer>(&mut self, index: u32, tracer: &mut T) {
        if let Some(open) = self.regs.open[index as usize] {
            let span = (open, self.pos);
            self.regs.set_capture(index, Some(span));
            self.regs.set_open(index, None);
            tracer.trace_capture(index, span);
        }
    }

    /// The assertion whose checkpoint is `cp` has matched its body.
    fn finish_assertion<T: Tracer>(&mut self, cp: Checkpoint, tracer: &mut T) -> StepResult {
        let Resume::Assertion { negated, cond_no } = cp.resume else {
            return self.backtrack(tracer);
        };
        self.pos = cp.pos;
        self.frames.restore(cp.frame_index);
        if !negated {
            return self.goto(self.program.next(cp.ip));
        }
        self.regs.rewind(cp.trail_watermark);
        match cond_no {
            Some(no) => self.goto(no),
            None => self.backtrack(tracer),
        }
    }

    fn condition_holds(&self, kind: CondKind, value: u32) -> bool {
        let names = self.program.names();
        match kind {
            CondKind::Group => self.regs.capture(value).is_some(),
            CondKind::Named => names
                .equal_range(value)
                .any(|i| self.regs.capture(i).is_some()),
            CondKind::Recursion => self.frames.current().is_some(),
            CondKind::RecursionGroup => self.frames.current_group() == Some(value as i32),
            CondKind::RecursionNamed => self
                .frames
                .current_group()
                .is_some_and(|g| names.equal_range(value).any(|i| i as i32 == g)),
            CondKind::Define => false,
            CondKind::Assertion => true,
        }
    }

    fn exec_recurse<T: Tracer>(
        &mut self,
        group: i32,
        target: u32,
        next: u32,
        tracer: &mut T,
    ) -> StepResult {
        if self.frames.depth() >= self.limits.recursion_limit {
            return Err(RuntimeError::Stack);
        }
        // Re-entering a group at the position it was entered at cannot progress.
        let looping = self
            .frames
            .chain()
            .find(|f| f.group == group)
            .is_some_and(|f| f.entry_pos == self.pos);
        if looping {
            return self.backtrack(tracer);
        }
        let saved = self.regs.snapshot();
        self.frames.push(next, group, self.pos, saved);
        tracer.trace_recurse(group, target);
        self.goto(target)
    }

    fn return_from_frame<T: Tracer>(&mut self, tracer: &mut T) -> StepResult {
        let Some(frame) = self.frames.pop() else {
            return self.backtrack(tracer);
        };
        self.regs.restore(&frame.saved);
        tracer.trace_return(frame.group);
        self.frames.prune(self.checkpoints.max_frame_ref());
        self.goto(frame.return_addr)
    }

    fn exec_accept<T: Tracer>(&mut self, tracer: &mut T) -> StepResult {
        let frame = self.frames.current();
        let in_assertion = self
            .checkpoints
            .find_last(|r| matches!(r, Resume::Assertion { .. }))
            .is_some_and(|cp| cp.frame_index == frame);
        if in_assertion
            && let Some(cp) = self
                .checkpoints
                .cut_to_last(|r| matches!(r, Resume::Assertion { .. }))
        {
            return self.finish_assertion(cp, tracer);
        }
        if frame.is_some() {
            return self.return_from_frame(tracer);
        }
        for index in 1..=self.program.mark_count() {
            self.close_group(index, tracer);
        }
        self.exec_match(tracer)
    }

    fn exec_match<T: Tracer>(&mut self, tracer: &mut T) -> StepResult {
        let empty = self.pos == self.start;
        let rejected = (empty && self.flags.contains(MatchFlags::NOT_NULL))
            || (empty
                && self.start == self.input.base
                && self.flags.contains(MatchFlags::NOT_INITIAL_NULL))
            || self.required_end.is_some_and(|end| end != self.pos);
        if rejected {
            return self.backtrack(tracer);
        }

        let mut groups = self.regs.captures.clone();
        groups[0] = Some((self.start, self.pos));
        tracer.trace_match(self.start, self.pos);

        if self.flags.contains(MatchFlags::POSIX) && !self.flags.contains(MatchFlags::ANY) {
            if self.best.as_ref().is_none_or(|best| prefer(&groups, best)) {
                self.best = Some(groups);
            }
            return self.backtrack(tracer);
        }
        self.best = Some(groups);
        Ok(Step::Done(Attempt::Matched))
    }

    fn pass_verb<T: Tracer>(&mut self, verb: Verb, next: u32, tracer: &mut T) -> StepResult {
        self.push_checkpoint(self.ip, Resume::Verb(verb), tracer)?;
        self.goto(next)
    }

    fn push_checkpoint<T: Tracer>(
        &mut self,
        ip: u32,
        resume: Resume,
        tracer: &mut T,
    ) -> Result<(), RuntimeError> {
        if self.checkpoints.len() >= self.limits.checkpoint_limit as usize {
            return Err(RuntimeError::Stack);
        }
        self.checkpoints.push(Checkpoint {
            pos: self.pos,
            ip,
            trail_watermark: self.regs.watermark(),
            frame_index: self.frames.current(),
            resume,
        });
        tracer.trace_checkpoint_created(ip);
        Ok(())
    }

    fn restore(&mut self, cp: &Checkpoint) {
        self.pos = cp.pos;
        self.regs.rewind(cp.trail_watermark);
        self.frames.restore(cp.frame_index);
    }

    /// Resume from the most recent live checkpoint.
    pub(crate) fn backtrack<T: Tracer>(&mut self, tracer: &mut T) -> StepResult {
        loop {
            let Some(cp) = self.checkpoints.pop() else {
                let outcome = if self.best.is_some() {
                    Attempt::Matched
                } else {
                    Attempt::Failed
                };
                return Ok(Step::Done(outcome));
            };
            self.restore(&cp);
            tracer.trace_backtrack(cp.ip, cp.pos);

            match cp.resume {
                Resume::Retry => return self.goto(cp.ip),
                Resume::Branch { scope } => return self.resume_branch(cp.ip, scope, tracer),
                Resume::Fence { .. } | Resume::Barrier => continue,
                Resume::Assertion { negated, cond_no } => {
                    // The assertion body failed.
                    if negated {
                        return self.goto(self.program.next(cp.ip));
                    }
                    if let Some(no) = cond_no {
                        return self.goto(no);
                    }
                }
                Resume::Verb(verb) => return self.fire_verb(verb, cp.pos, tracer),
            }
        }
    }

    fn fire_verb<T: Tracer>(&mut self, verb: Verb, pos: usize, tracer: &mut T) -> StepResult {
        tracer.trace_verb(verb_name(verb), pos);
        if self.best.is_some() {
            return Ok(Step::Done(Attempt::Matched));
        }
        let scope = match verb {
            Verb::Commit => return Ok(Step::Done(Attempt::Committed)),
            Verb::Prune => return Ok(Step::Done(Attempt::Failed)),
            Verb::Skip => return Ok(Step::Done(Attempt::SkipTo(pos))),
            Verb::Then { scope } if scope == NO_SCOPE => {
                return Ok(Step::Done(Attempt::Failed));
            }
            Verb::Then { scope } => scope,
        };

        while let Some(cp) = self.checkpoints.pop() {
            match cp.resume {
                Resume::Branch { scope: s } if s == scope => {
                    self.restore(&cp);
                    tracer.trace_backtrack(cp.ip, cp.pos);
                    return self.resume_branch(cp.ip, scope, tracer);
                }
                // Last alternative: the whole alternation fails.
                Resume::Fence { scope: s } if s == scope => return self.backtrack(tracer),
                _ => {}
            }
        }
        Ok(Step::Done(Attempt::Failed))
    }
}

fn verb_name(verb: Verb) -> &'static str {
    match verb {
        Verb::Prune => "PRUNE",
        Verb::Skip => "SKIP",
        Verb::Commit => "COMMIT",
        Verb::Then { .. } => "THEN",
    }
}
