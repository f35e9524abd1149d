//! Recursive-descent pattern parser.
//!
//! Nodes are emitted straight into the arena as the pattern is read; there
//! is no intermediate tree. Constructs that are only recognized after their
//! operand (alternation bars, quantifiers, lookbehind widths) open a gap in
//! front of the operand and the parser fixes up every offset it holds.
//!
//! Groups are tracked on an explicit frame stack rather than the call
//! stack, so nesting depth is bounded by [`CompileLimits`], not by the
//! thread's stack size.

mod escape;
mod perl;
mod posix;
mod repeat;
mod set;

use rebound_bytecode::node::{NO_SCOPE, field};
use rebound_bytecode::{CondKind, GroupKind, NameTable, Node, NodeTag, SyntaxFlags, WildMode};
use rebound_core::CharTraits;

use crate::analyze::fixed_width;
use crate::compile::CompileLimits;
use crate::emit::Emitter;
use crate::error::{CompileError, ErrorKind};

pub(crate) type PResult<T> = Result<T, CompileError>;

/// Scope marker of a `(*THEN)` whose alternation is not known yet.
const THEN_PENDING: u32 = u32::MAX - 1;

/// Literal runs longer than this are split across nodes.
const MAX_LITERAL_BYTES: usize = 60_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameKind {
    Top,
    Group(GroupKind),
    Conditional,
}

/// Pattern modifiers that `(?imsx)` can change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Modes {
    pub icase: bool,
    pub wild: WildMode,
    pub single_line: bool,
    pub free_spacing: bool,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    index: i32,
    /// Pattern offset of the opening parenthesis.
    open_pos: usize,
    /// Start mark (or conditional node) of this frame.
    mark_at: u32,
    content_start: u32,
    branch_start: u32,
    alt_jumps: Vec<u32>,
    alternatives: u32,
    scope: u32,
    saved: Modes,
    case_changed: bool,
    /// Start mark of the assertion that decides a conditional.
    cond_assert: Option<u32>,
    /// This group is the assertion deciding the enclosing conditional.
    is_condition: bool,
}

/// Last thing that a quantifier may apply to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Atom {
    None,
    /// The last character of the pending literal run.
    Pending,
    At(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RefTarget {
    Group(u32),
    Name(String),
}

/// Recursion call waiting for its target.
#[derive(Clone, Debug)]
pub(crate) struct PendingRecursion {
    pub at: u32,
    pub target: RefTarget,
    pub offset: usize,
}

/// Everything the parser hands to analysis.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub emit: Emitter,
    pub mark_count: u32,
    pub repeat_count: u32,
    pub names: NameTable,
    pub group_starts: Vec<u32>,
    pub has_backrefs: bool,
    pub has_recursion: bool,
    pub has_verbs: bool,
}

pub(crate) struct Parser<'p> {
    pattern: &'p str,
    pos: usize,
    flags: SyntaxFlags,
    traits: &'p dyn CharTraits,
    limits: CompileLimits,
    emit: Emitter,
    modes: Modes,
    frames: Vec<Frame>,
    pending: String,
    pending_icase: bool,
    last_atom: Atom,
    mark_count: u32,
    repeat_count: u32,
    scope_count: u32,
    names: NameTable,
    group_starts: Vec<u32>,
    recursions: Vec<PendingRecursion>,
    /// Names used by conditions before they may have been declared.
    name_refs: Vec<(String, usize)>,
    /// Group numbers used by conditions, checked once every group is known.
    group_refs: Vec<(u32, usize)>,
    has_backrefs: bool,
    has_recursion: bool,
    has_verbs: bool,
}

impl<'p> Parser<'p> {
    pub fn new(
        pattern: &'p str,
        flags: SyntaxFlags,
        traits: &'p dyn CharTraits,
        limits: CompileLimits,
    ) -> Self {
        let modes = Modes {
            icase: flags.contains(SyntaxFlags::ICASE),
            wild: if flags.contains(SyntaxFlags::NO_MOD_S) {
                WildMode::NoNewline
            } else {
                WildMode::Default
            },
            single_line: flags.contains(SyntaxFlags::NO_MOD_M),
            free_spacing: flags.contains(SyntaxFlags::EXTENDED) && flags.is_perl(),
        };
        Self {
            pattern,
            pos: 0,
            flags,
            traits,
            limits,
            emit: Emitter::new(),
            modes,
            frames: Vec::new(),
            pending: String::new(),
            pending_icase: modes.icase,
            last_atom: Atom::None,
            mark_count: 0,
            repeat_count: 0,
            scope_count: 0,
            names: NameTable::new(),
            group_starts: vec![0],
            recursions: Vec::new(),
            name_refs: Vec::new(),
            group_refs: Vec::new(),
            has_backrefs: false,
            has_recursion: false,
            has_verbs: false,
        }
    }

    pub fn parse(mut self) -> PResult<Parsed> {
        self.frames.push(Frame {
            kind: FrameKind::Top,
            index: 0,
            open_pos: 0,
            mark_at: 0,
            content_start: 0,
            branch_start: 0,
            alt_jumps: Vec::new(),
            alternatives: 0,
            scope: 0,
            saved: self.modes,
            case_changed: false,
            cond_assert: None,
            is_condition: false,
        });
        self.scope_count = 1;

        if self.flags.contains(SyntaxFlags::LITERAL) {
            while let Some(c) = self.bump() {
                self.push_literal(c);
            }
        } else {
            while self.pos < self.pattern.len() {
                if self.flags.contains(SyntaxFlags::BASIC) {
                    self.parse_basic()?;
                } else {
                    self.parse_extended()?;
                }
                if self.emit.len() as usize + self.pending.len() > self.limits.max_size {
                    return Err(self.error(ErrorKind::Size, self.pos));
                }
            }
        }
        self.flush_literal();

        if self.frames.len() > 1 {
            let open = self.frames.last().map_or(0, |f| f.open_pos);
            return Err(self.error(ErrorKind::Paren, open));
        }
        let mut top = self.frames.pop().ok_or_else(|| self.error(ErrorKind::Unknown, 0))?;
        self.finish_branches(&mut top)?;
        self.emit.append(&Node::Match);

        self.resolve_recursions()?;
        if let Some(&(_, offset)) = self.group_refs.iter().find(|(n, _)| *n > self.mark_count) {
            return Err(self.error(ErrorKind::Backref, offset));
        }
        for (name, offset) in std::mem::take(&mut self.name_refs) {
            if self.names.lookup(&name).is_empty() {
                return Err(self.error(ErrorKind::Backref, offset));
            }
        }

        Ok(Parsed {
            emit: self.emit,
            mark_count: self.mark_count,
            repeat_count: self.repeat_count,
            names: self.names,
            group_starts: self.group_starts,
            has_backrefs: self.has_backrefs,
            has_recursion: self.has_recursion,
            has_verbs: self.has_verbs,
        })
    }

    // ---- cursor -------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.pattern[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.pattern[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn rest(&self) -> &'p str {
        &self.pattern[self.pos..]
    }

    fn rest_from(&self, at: usize) -> &'p str {
        &self.pattern[at..]
    }

    fn error(&self, kind: ErrorKind, offset: usize) -> CompileError {
        CompileError::new(kind, offset)
    }

    fn is_perl(&self) -> bool {
        self.flags.is_perl()
    }

    fn is_posix_extended(&self) -> bool {
        self.flags.contains(SyntaxFlags::EXTENDED_POSIX)
    }

    /// Skips whitespace and `#` comments in free-spacing mode.
    fn skip_free_space(&mut self) -> bool {
        let mut skipped = false;
        while self.modes.free_spacing {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.pos += c.len_utf8();
                    skipped = true;
                }
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                    skipped = true;
                }
                _ => break,
            }
        }
        skipped
    }

    // ---- emission -----------------------------------------------------

    pub(crate) fn push_literal(&mut self, c: char) {
        if self.pending_icase != self.modes.icase {
            self.flush_literal();
            self.pending_icase = self.modes.icase;
        }
        if self.pending.len() >= MAX_LITERAL_BYTES {
            self.flush_literal();
        }
        self.pending.push(self.traits.translate(c, self.modes.icase));
        self.last_atom = Atom::Pending;
    }

    fn flush_literal(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        self.emit.append(&Node::Literal {
            text: &text,
            icase: self.pending_icase,
        });
        self.pending_icase = self.modes.icase;
    }

    /// Appends a node after flushing any pending literal.
    fn append(&mut self, node: &Node<'_>) -> u32 {
        self.flush_literal();
        self.emit.append(node)
    }

    /// Appends a node a quantifier may apply to.
    fn append_atom(&mut self, node: &Node<'_>) -> u32 {
        let at = self.append(node);
        self.last_atom = Atom::At(at);
        at
    }

    /// Appends a zero-width node that cannot be quantified.
    fn append_assertion(&mut self, node: &Node<'_>) -> u32 {
        let at = self.append(node);
        self.last_atom = Atom::None;
        at
    }

    /// Inserts a node at `pos` and moves every offset the parser holds.
    fn insert(&mut self, pos: u32, node: &Node<'_>) -> u32 {
        let n = self.emit.insert(pos, node);
        let shift_node = |at: &mut u32| {
            if *at >= pos {
                *at += n;
            }
        };
        let shift_target = |at: &mut u32| {
            if *at > pos {
                *at += n;
            }
        };
        for frame in &mut self.frames {
            if frame.kind != FrameKind::Top {
                shift_node(&mut frame.mark_at);
            }
            shift_target(&mut frame.content_start);
            shift_target(&mut frame.branch_start);
            frame.alt_jumps.iter_mut().for_each(shift_node);
            if let Some(at) = frame.cond_assert.as_mut() {
                shift_node(at);
            }
        }
        self.group_starts.iter_mut().skip(1).for_each(shift_node);
        for r in &mut self.recursions {
            shift_node(&mut r.at);
        }
        n
    }

    /// Start offset of the quantifiable atom, splitting a literal run so
    /// the quantifier only covers its last character.
    fn take_atom(&mut self) -> Option<u32> {
        match self.last_atom {
            Atom::None => None,
            Atom::At(at) => Some(at),
            Atom::Pending => {
                let last = self.pending.pop()?;
                self.flush_literal();
                let at = self.emit.len();
                let icase = self.pending_icase;
                let mut buf = [0u8; 4];
                self.emit.append(&Node::Literal {
                    text: last.encode_utf8(&mut buf),
                    icase,
                });
                Some(at)
            }
        }
    }

    fn set_icase(&mut self, icase: bool) {
        if self.modes.icase == icase {
            return;
        }
        self.flush_literal();
        self.modes.icase = icase;
        self.append(&Node::CaseToggle { icase });
        if let Some(frame) = self.frames.last_mut() {
            frame.case_changed = true;
        }
        self.pending_icase = icase;
    }

    // ---- groups and alternation ----------------------------------------

    fn open_frame(&mut self, kind: FrameKind, index: i32, open_pos: usize, mark_at: u32) -> PResult<()> {
        if self.frames.len() > self.limits.max_depth {
            return Err(self.error(ErrorKind::Complexity, open_pos));
        }
        let start = self.emit.len();
        let scope = self.scope_count;
        self.scope_count += 1;
        self.frames.push(Frame {
            kind,
            index,
            open_pos,
            mark_at,
            content_start: start,
            branch_start: start,
            alt_jumps: Vec::new(),
            alternatives: 0,
            scope,
            saved: self.modes,
            case_changed: false,
            cond_assert: None,
            is_condition: false,
        });
        self.last_atom = Atom::None;
        Ok(())
    }

    /// Opens a group whose start mark is emitted now.
    pub(crate) fn open_group(&mut self, kind: GroupKind, open_pos: usize) -> PResult<()> {
        self.open_group_with(kind, open_pos, None)
    }

    fn open_group_with(&mut self, kind: GroupKind, open_pos: usize, name: Option<&str>) -> PResult<()> {
        let index = match kind {
            GroupKind::Capture => {
                self.mark_count += 1;
                self.mark_count as i32
            }
            GroupKind::NonCapture => 0,
            _ => -1,
        };
        let at = self.append(&Node::StartMark {
            kind,
            index,
            end: rebound_bytecode::UNLINKED,
            cond_no: None,
        });
        if index > 0 {
            self.group_starts.push(at);
            if let Some(name) = name {
                self.names.insert(name, index as u32);
            }
        }
        self.open_frame(FrameKind::Group(kind), index, open_pos, at)
    }

    /// Capturing group unless captures are disabled.
    fn open_plain_group(&mut self, open_pos: usize) -> PResult<()> {
        let kind = if self.flags.contains(SyntaxFlags::NOSUBS) {
            GroupKind::NonCapture
        } else {
            GroupKind::Capture
        };
        self.open_group(kind, open_pos)
    }

    fn open_named_group(&mut self, name: &str, open_pos: usize) -> PResult<()> {
        if self.flags.contains(SyntaxFlags::NOSUBS) {
            return self.open_group(GroupKind::NonCapture, open_pos);
        }
        self.open_group_with(GroupKind::Capture, open_pos, Some(name))
    }

    fn open_conditional(&mut self, kind: CondKind, value: u32, open_pos: usize) -> PResult<()> {
        let at = self.append(&Node::Conditional {
            kind,
            value,
            alt: rebound_bytecode::UNLINKED,
        });
        self.open_frame(FrameKind::Conditional, 0, open_pos, at)
    }

    /// Handles `|` inside the innermost frame.
    fn parse_alt(&mut self, at: usize) -> PResult<()> {
        self.flush_literal();
        let posix_ext = self.is_posix_extended();
        let len = self.emit.len();
        let frame = self.frames.last().ok_or_else(|| self.error(ErrorKind::Unknown, at))?;
        if posix_ext && len == frame.branch_start {
            return Err(self.error(ErrorKind::Empty, at));
        }

        if frame.kind == FrameKind::Conditional {
            if frame.alternatives > 0 {
                return Err(CompileError::with_message(
                    ErrorKind::BadPattern,
                    at,
                    "A conditional may have at most two alternatives.",
                ));
            }
            let cond_at = frame.mark_at;
            let cond_assert = frame.cond_assert;
            if matches!(
                self.emit.node(cond_at),
                Node::Conditional {
                    kind: CondKind::Define,
                    ..
                }
            ) {
                return Err(CompileError::with_message(
                    ErrorKind::BadPattern,
                    at,
                    "A DEFINE block may not contain alternatives.",
                ));
            }
            let jump = self.emit.append(&Node::Jump {
                target: rebound_bytecode::UNLINKED,
            });
            let no_start = self.emit.len();
            self.emit.patch(cond_at, field::COND_ALT, no_start);
            if let Some(mark) = cond_assert {
                self.emit.patch(mark, field::MARK_COND_NO, no_start);
            }
            let frame = self.frames.last_mut().ok_or_else(|| CompileError::new(ErrorKind::Unknown, at))?;
            frame.alt_jumps.push(jump);
            frame.alternatives += 1;
        } else {
            let branch_start = frame.branch_start;
            let scope = frame.scope;
            self.insert(
                branch_start,
                &Node::Alt {
                    alt: rebound_bytecode::UNLINKED,
                    scope,
                    take: rebound_bytecode::ByteMap::empty(),
                    skip: rebound_bytecode::ByteMap::empty(),
                    take_null: false,
                    skip_null: false,
                },
            );
            let jump = self.emit.append(&Node::Jump {
                target: rebound_bytecode::UNLINKED,
            });
            let next_branch = self.emit.len();
            self.emit.patch(branch_start, field::ALT, next_branch);
            let frame = self.frames.last_mut().ok_or_else(|| CompileError::new(ErrorKind::Unknown, at))?;
            frame.alt_jumps.push(jump);
            frame.alternatives += 1;
            frame.branch_start = next_branch;
        }

        let case_changed = self.frames.last().is_some_and(|f| f.case_changed);
        if case_changed {
            let icase = self.modes.icase;
            self.emit.append(&Node::CaseToggle { icase });
        }
        self.last_atom = Atom::None;
        Ok(())
    }

    /// Patches the pending jumps of a frame and resolves its `(*THEN)`s.
    /// Returns the offset just past the frame's content.
    fn finish_branches(&mut self, frame: &mut Frame) -> PResult<u32> {
        self.flush_literal();
        let end = self.emit.len();
        if self.is_posix_extended() && frame.alternatives > 0 && end == frame.branch_start {
            return Err(self.error(ErrorKind::Empty, self.pos));
        }
        for &jump in &frame.alt_jumps {
            self.emit.patch(jump, field::TARGET, end);
        }
        if frame.kind == FrameKind::Conditional && frame.alternatives == 0 {
            self.emit.patch(frame.mark_at, field::COND_ALT, end);
            if let Some(mark) = frame.cond_assert {
                self.emit.patch(mark, field::MARK_COND_NO, end);
            }
        }

        let scope = if frame.alternatives > 0 && frame.kind != FrameKind::Conditional {
            Some(frame.scope)
        } else if frame.kind == FrameKind::Top {
            Some(NO_SCOPE)
        } else {
            None
        };
        if let Some(scope) = scope {
            let mut at = frame.content_start;
            while at < end {
                if self.emit.tag(at) == NodeTag::Then
                    && self.emit.read(at, field::TARGET) == THEN_PENDING
                {
                    self.emit.patch(at, field::TARGET, scope);
                }
                at = self.emit.after(at);
            }
        }
        Ok(end)
    }

    /// Handles `)` (or `\)` in basic syntax).
    fn close_group(&mut self, close_pos: usize) -> PResult<()> {
        self.flush_literal();
        if self.frames.len() <= 1 {
            return Err(self.error(ErrorKind::Paren, close_pos));
        }
        let mut frame = self
            .frames
            .pop()
            .ok_or_else(|| self.error(ErrorKind::Paren, close_pos))?;
        if self.is_posix_extended() && self.emit.len() == frame.content_start {
            return Err(self.error(ErrorKind::Empty, close_pos));
        }
        let end = self.finish_branches(&mut frame)?;

        if let FrameKind::Group(kind) = frame.kind {
            if kind.is_behind() {
                let width = fixed_width(self.emit.bytes(), frame.content_start, end).ok_or_else(
                    || {
                        CompileError::with_message(
                            ErrorKind::BadPattern,
                            frame.open_pos,
                            "A lookbehind assertion must have a fixed width.",
                        )
                    },
                )?;
                self.insert(frame.content_start, &Node::Backstep { width });
            }
            let end_at = self.emit.append(&Node::EndMark {
                kind,
                index: frame.index,
            });
            self.emit.patch(frame.mark_at, field::MARK_END, end_at);
        }

        if self.modes.icase != frame.saved.icase {
            self.emit.append(&Node::CaseToggle {
                icase: frame.saved.icase,
            });
        }
        self.modes = frame.saved;
        self.pending_icase = self.modes.icase;
        self.last_atom = if frame.is_condition {
            Atom::None
        } else {
            Atom::At(frame.mark_at)
        };
        Ok(())
    }

    // ---- references ----------------------------------------------------

    fn add_recursion(&mut self, target: RefTarget, offset: usize) -> PResult<()> {
        if self.recursions.len() >= self.limits.max_recursion_refs {
            return Err(self.error(ErrorKind::Complexity, offset));
        }
        let group = match &target {
            RefTarget::Group(n) => *n as i32,
            RefTarget::Name(_) => -1,
        };
        let at = self.append_atom(&Node::Recurse {
            group,
            target: rebound_bytecode::UNLINKED,
        });
        self.recursions.push(PendingRecursion { at, target, offset });
        self.has_recursion = true;
        Ok(())
    }

    /// Points every recursion node at the start of its group.
    fn resolve_recursions(&mut self) -> PResult<()> {
        for r in std::mem::take(&mut self.recursions) {
            let group = match &r.target {
                RefTarget::Group(n) => *n,
                RefTarget::Name(name) => match self.names.lookup(name).first() {
                    Some(&index) => index,
                    None => return Err(self.error(ErrorKind::Backref, r.offset)),
                },
            };
            let Some(&target) = self.group_starts.get(group as usize) else {
                return Err(self.error(ErrorKind::Backref, r.offset));
            };
            self.emit.patch(r.at, 8, group);
            self.emit.patch(r.at, field::RECURSE_TARGET, target);
        }
        Ok(())
    }

    fn append_backref(&mut self, index: u32, offset: usize) -> PResult<()> {
        if index == 0 || index > self.mark_count {
            return Err(self.error(ErrorKind::Backref, offset));
        }
        self.append_atom(&Node::Backref {
            value: index,
            named: false,
        });
        self.has_backrefs = true;
        Ok(())
    }

    fn append_named_backref(&mut self, name: &str, offset: usize) -> PResult<()> {
        if self.names.lookup(name).is_empty() {
            return Err(self.error(ErrorKind::Backref, offset));
        }
        self.append_atom(&Node::Backref {
            value: rebound_bytecode::hash_name(name),
            named: true,
        });
        self.has_backrefs = true;
        Ok(())
    }

    // ---- Perl / POSIX extended ------------------------------------------

    fn parse_extended(&mut self) -> PResult<()> {
        if self.is_perl() && self.skip_free_space() {
            return Ok(());
        }
        let at = self.pos;
        let Some(c) = self.peek() else {
            return Ok(());
        };
        use rebound_core::SyntaxType as S;
        match self.traits.syntax_type(c) {
            S::OpenMark => {
                self.pos += 1;
                if self.is_perl() && matches!(self.peek(), Some('?' | '*')) {
                    self.parse_perl_extension(at)
                } else {
                    self.open_plain_group(at)
                }
            }
            S::CloseMark => {
                self.pos += 1;
                self.close_group(at)
            }
            S::Escape => self.parse_escape(),
            S::Dot => {
                self.pos += 1;
                let mode = self.modes.wild;
                self.append_atom(&Node::Wild { mode });
                Ok(())
            }
            S::Caret => {
                self.pos += 1;
                let single_line = self.modes.single_line;
                self.append_assertion(&Node::StartLine { single_line });
                Ok(())
            }
            S::Dollar => {
                self.pos += 1;
                let single_line = self.modes.single_line;
                self.append_assertion(&Node::EndLine { single_line });
                Ok(())
            }
            S::Or => {
                self.pos += 1;
                self.parse_alt(at)
            }
            S::OpenSet => self.parse_set(),
            S::Star => {
                self.pos += 1;
                self.parse_repeat(at, 0, rebound_bytecode::INFINITE)
            }
            S::Plus => {
                self.pos += 1;
                self.parse_repeat(at, 1, rebound_bytecode::INFINITE)
            }
            S::Question => {
                self.pos += 1;
                self.parse_repeat(at, 0, 1)
            }
            S::OpenBrace => self.parse_brace(at),
            _ => {
                self.pos += c.len_utf8();
                self.push_literal(c);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod parser_tests;
