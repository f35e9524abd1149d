//! Node encoding.
//!
//! Every node is an 8-byte header followed by a tag-specific payload,
//! padded so the next node starts on a [`WORD`] boundary:
//!
//! ```text
//! | tag: u8 | flags: u8 | extra: u16 | next: u32 | payload ... |
//! ```
//!
//! All references between nodes (`next`, jump targets, alternatives,
//! assertion ends) are absolute arena offsets. [`Node`] is the decoded,
//! borrowed view the compiler and the matcher pattern-match on.

use rebound_core::{CharTraits, ClassMask};

use crate::arena::WORD;
use crate::flags::{CondKind, GroupKind, WildMode};

pub const HEADER_SIZE: usize = 8;

/// Placeholder for a reference that is not resolved yet.
pub const UNLINKED: u32 = u32::MAX;

/// Upper bound of an unbounded repeat.
pub const INFINITE: u32 = u32::MAX;

/// Scope of a `(*THEN)` with no enclosing alternation.
pub const NO_SCOPE: u32 = u32::MAX;

/// Header flag bits. Their meaning depends on the tag.
pub mod flag {
    pub const ICASE: u8 = 1 << 0;
    pub const NEGATED: u8 = 1 << 1;
    pub const COLLATE: u8 = 1 << 2;
    pub const NAMED: u8 = 1 << 3;
    pub const SINGLE_LINE: u8 = 1 << 4;
    /// Start mark of an assertion that selects a conditional branch.
    pub const COND: u8 = 1 << 5;

    pub const TAKE_NULL: u8 = 1 << 0;
    pub const SKIP_NULL: u8 = 1 << 1;
    pub const GREEDY: u8 = 1 << 2;
    pub const LEADING: u8 = 1 << 3;
}

/// Byte offsets of fields inside a node, relative to the node start.
pub mod field {
    pub const NEXT: usize = 4;

    pub const MARK_INDEX: usize = 8;
    pub const MARK_END: usize = 12;
    pub const MARK_COND_NO: usize = 16;

    pub const TARGET: usize = 8;

    pub const ALT: usize = 8;
    pub const ALT_SCOPE: usize = 12;
    pub const ALT_TAKE: usize = 16;
    pub const ALT_SKIP: usize = 48;

    pub const REPEAT_MIN: usize = 12;
    pub const REPEAT_MAX: usize = 16;
    pub const REPEAT_ID: usize = 20;
    pub const REPEAT_TAKE: usize = 24;
    pub const REPEAT_SKIP: usize = 56;

    pub const RECURSE_TARGET: usize = 12;

    pub const COND_VALUE: usize = 8;
    pub const COND_ALT: usize = 12;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeTag {
    StartMark = 0,
    EndMark,
    Literal,
    StartLine,
    EndLine,
    Wild,
    Match,
    WordBoundary,
    NotWordBoundary,
    WordStart,
    WordEnd,
    BufferStart,
    BufferEnd,
    SoftBufferEnd,
    ContinueMatch,
    Backref,
    Set,
    LongSet,
    Jump,
    Alt,
    Repeat,
    Backstep,
    CaseToggle,
    Recurse,
    Conditional,
    Prune,
    Skip,
    Commit,
    Then,
    Fail,
    Accept,
    Combining,
}

impl NodeTag {
    const ALL: [NodeTag; 32] = [
        Self::StartMark,
        Self::EndMark,
        Self::Literal,
        Self::StartLine,
        Self::EndLine,
        Self::Wild,
        Self::Match,
        Self::WordBoundary,
        Self::NotWordBoundary,
        Self::WordStart,
        Self::WordEnd,
        Self::BufferStart,
        Self::BufferEnd,
        Self::SoftBufferEnd,
        Self::ContinueMatch,
        Self::Backref,
        Self::Set,
        Self::LongSet,
        Self::Jump,
        Self::Alt,
        Self::Repeat,
        Self::Backstep,
        Self::CaseToggle,
        Self::Recurse,
        Self::Conditional,
        Self::Prune,
        Self::Skip,
        Self::Commit,
        Self::Then,
        Self::Fail,
        Self::Accept,
        Self::Combining,
    ];

    pub fn from_u8(v: u8) -> Self {
        match Self::ALL.get(v as usize) {
            Some(tag) => *tag,
            None => panic!("invalid node tag: {v}"),
        }
    }

    /// Offsets of absolute target fields that must follow the node graph
    /// when a gap is inserted.
    pub fn target_fields(self) -> &'static [usize] {
        match self {
            Self::StartMark => &[field::MARK_END, field::MARK_COND_NO],
            Self::Jump => &[field::TARGET],
            Self::Alt | Self::Repeat => &[field::ALT],
            Self::Conditional => &[field::COND_ALT],
            _ => &[],
        }
    }
}

/// Fixed 8-byte node header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub tag: NodeTag,
    pub flags: u8,
    pub extra: u16,
    pub next: u32,
}

impl Header {
    pub fn read(bytes: &[u8], at: usize) -> Self {
        Self {
            tag: NodeTag::from_u8(bytes[at]),
            flags: bytes[at + 1],
            extra: u16::from_le_bytes([bytes[at + 2], bytes[at + 3]]),
            next: read_u32(bytes, at + field::NEXT),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.tag as u8);
        out.push(self.flags);
        out.extend_from_slice(&self.extra.to_le_bytes());
        out.extend_from_slice(&self.next.to_le_bytes());
    }
}

#[inline]
pub fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Size in bytes of the node starting at `at`, padding included.
pub fn node_size(bytes: &[u8], at: usize) -> usize {
    let header = Header::read(bytes, at);
    let payload = match header.tag {
        NodeTag::StartMark => 12,
        NodeTag::EndMark
        | NodeTag::Backref
        | NodeTag::Jump
        | NodeTag::Backstep
        | NodeTag::Then => 4,
        NodeTag::Literal => header.extra as usize,
        NodeTag::Set => 32,
        NodeTag::LongSet => {
            let p = at + HEADER_SIZE;
            let singles = read_u32(bytes, p) as usize;
            let ranges = read_u32(bytes, p + 4) as usize;
            let equivs = read_u32(bytes, p + 8) as usize;
            LONG_SET_FIXED + 4 * (singles + 2 * ranges + equivs)
        }
        NodeTag::Alt => 72,
        NodeTag::Repeat => 80,
        NodeTag::Recurse | NodeTag::Conditional => 8,
        _ => 0,
    };
    (HEADER_SIZE + payload).next_multiple_of(WORD)
}

/// Iterates `(offset, node)` pairs of an encoded node sequence.
pub fn walk(bytes: &[u8]) -> impl Iterator<Item = (u32, Node<'_>)> {
    let mut at = 0;
    std::iter::from_fn(move || {
        if at >= bytes.len() {
            return None;
        }
        let node = Node::decode(bytes, at);
        let here = at as u32;
        at += node_size(bytes, at);
        Some((here, node))
    })
}

/// 256-bit membership map over the first 256 code points.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct CharMap([u8; 32]);

impl CharMap {
    pub const EMPTY: Self = Self([0; 32]);
    pub const FULL: Self = Self([0xFF; 32]);

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut map = Self::EMPTY;
        map.0.copy_from_slice(&bytes[..32]);
        map
    }

    pub fn insert(&mut self, b: u8) {
        self.0[(b >> 3) as usize] |= 1 << (b & 7);
    }

    pub fn contains(&self, b: u8) -> bool {
        self.0[(b >> 3) as usize] & (1 << (b & 7)) != 0
    }

    pub fn union_with(&mut self, other: &Self) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a |= b;
        }
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|&b| b == 0xFF)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    pub fn count(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for CharMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CharMap({} set)", self.count())
    }
}

/// Borrowed view of a [`CharMap`] stored in the arena.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ByteMap<'a>(&'a [u8]);

impl<'a> ByteMap<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self(&bytes[..32])
    }

    #[inline]
    pub fn contains(&self, b: u8) -> bool {
        self.0[(b >> 3) as usize] & (1 << (b & 7)) != 0
    }

    /// Test for the character at the cursor: characters outside the map's
    /// range are always allowed.
    #[inline]
    pub fn allows(&self, c: char) -> bool {
        let v = c as u32;
        v > 0xFF || self.contains(v as u8)
    }

    pub fn to_char_map(&self) -> CharMap {
        CharMap::from_bytes(self.0)
    }
}

impl std::fmt::Debug for ByteMap<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_char_map().fmt(f)
    }
}

const LONG_SET_FIXED: usize = 20;

/// Owned description of a wide character set, encoded into a `LongSet` node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharSetSpec {
    /// Single members, translated when the set is case-insensitive.
    pub singles: Vec<char>,
    /// Inclusive ranges as code points, or collation keys under `COLLATE`.
    pub ranges: Vec<(u32, u32)>,
    /// Primary keys of `[=c=]` equivalence classes.
    pub equivs: Vec<u32>,
    pub class: ClassMask,
    /// Members are characters *outside* this mask (`[\D]`).
    pub not_class: ClassMask,
}

impl CharSetSpec {
    fn encode_payload(&self, out: &mut Vec<u8>) {
        for n in [self.singles.len(), self.ranges.len(), self.equivs.len()] {
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        out.extend_from_slice(&self.class.bits().to_le_bytes());
        out.extend_from_slice(&self.not_class.bits().to_le_bytes());
        for c in &self.singles {
            out.extend_from_slice(&(*c as u32).to_le_bytes());
        }
        for (lo, hi) in &self.ranges {
            out.extend_from_slice(&lo.to_le_bytes());
            out.extend_from_slice(&hi.to_le_bytes());
        }
        for key in &self.equivs {
            out.extend_from_slice(&key.to_le_bytes());
        }
    }
}

/// Borrowed view of a `LongSet` node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LongSet<'a> {
    payload: &'a [u8],
    pub negated: bool,
    pub icase: bool,
    pub collate: bool,
}

impl<'a> LongSet<'a> {
    fn count(&self, i: usize) -> usize {
        read_u32(self.payload, i * 4) as usize
    }

    fn words(&self, from: usize, n: usize) -> impl Iterator<Item = u32> + 'a {
        let start = LONG_SET_FIXED + from * 4;
        self.payload[start..start + n * 4]
            .chunks_exact(4)
            .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
    }

    pub fn class(&self) -> ClassMask {
        ClassMask::from_bits(read_u32(self.payload, 12))
    }

    pub fn not_class(&self) -> ClassMask {
        ClassMask::from_bits(read_u32(self.payload, 16))
    }

    pub fn singles(&self) -> impl Iterator<Item = char> + 'a {
        self.words(0, self.count(0)).filter_map(char::from_u32)
    }

    pub fn ranges(&self) -> impl Iterator<Item = (u32, u32)> + 'a {
        let mut words = self.words(self.count(0), 2 * self.count(1));
        std::iter::from_fn(move || Some((words.next()?, words.next()?)))
    }

    pub fn equivs(&self) -> impl Iterator<Item = u32> + 'a {
        self.words(self.count(0) + 2 * self.count(1), self.count(2))
    }

    /// Membership test through the trait interface. Negation flips the result.
    pub fn contains(&self, c: char, traits: &dyn CharTraits) -> bool {
        self.member(c, traits) != self.negated
    }

    fn member(&self, c: char, traits: &dyn CharTraits) -> bool {
        let folded = traits.translate(c, self.icase);
        if self.singles().any(|s| s == folded) {
            return true;
        }

        let in_ranges = |ch: char| {
            let key = if self.collate {
                traits.transform(ch)
            } else {
                ch as u32
            };
            self.ranges().any(|(lo, hi)| lo <= key && key <= hi)
        };
        if self.icase {
            if traits.case_variants(c).into_iter().any(in_ranges) {
                return true;
            }
        } else if in_ranges(c) {
            return true;
        }

        let class = if self.icase {
            self.class().case_folded()
        } else {
            self.class()
        };
        if !class.is_empty() && traits.is_class(c, class) {
            return true;
        }
        let not_class = self.not_class();
        if !not_class.is_empty() && !traits.is_class(c, not_class) {
            return true;
        }

        let primary = traits.transform_primary(c);
        self.equivs().any(|key| key == primary)
    }
}

/// Repeat payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repeat<'a> {
    /// Exit target, taken when the loop stops.
    pub alt: u32,
    pub min: u32,
    /// [`INFINITE`] when unbounded.
    pub max: u32,
    pub id: u32,
    pub take: ByteMap<'a>,
    pub skip: ByteMap<'a>,
    pub take_null: bool,
    pub skip_null: bool,
    pub greedy: bool,
    pub leading: bool,
}

/// Decoded node view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node<'a> {
    StartMark {
        kind: GroupKind,
        index: i32,
        /// Offset of the matching end mark.
        end: u32,
        /// Branch taken when a conditional assertion fails.
        cond_no: Option<u32>,
    },
    EndMark {
        kind: GroupKind,
        index: i32,
    },
    Literal {
        text: &'a str,
        icase: bool,
    },
    StartLine {
        single_line: bool,
    },
    EndLine {
        single_line: bool,
    },
    Wild {
        mode: WildMode,
    },
    Match,
    WordBoundary,
    NotWordBoundary,
    WordStart,
    WordEnd,
    BufferStart,
    BufferEnd,
    SoftBufferEnd,
    ContinueMatch,
    /// Compares against the runtime case state, not a compile-time flag.
    Backref {
        /// Group index, or the name hash when `named`.
        value: u32,
        named: bool,
    },
    Set {
        map: ByteMap<'a>,
        negated: bool,
        icase: bool,
    },
    LongSet(LongSet<'a>),
    Jump {
        target: u32,
    },
    Alt {
        alt: u32,
        scope: u32,
        take: ByteMap<'a>,
        skip: ByteMap<'a>,
        take_null: bool,
        skip_null: bool,
    },
    Repeat(Repeat<'a>),
    Backstep {
        width: u32,
    },
    CaseToggle {
        icase: bool,
    },
    Recurse {
        group: i32,
        target: u32,
    },
    Conditional {
        kind: CondKind,
        value: u32,
        /// Start of the "no" branch, or the end when there is none.
        alt: u32,
    },
    Prune,
    Skip,
    Commit,
    Then {
        scope: u32,
    },
    Fail,
    Accept,
    Combining,
}

impl<'a> Node<'a> {
    pub fn tag(&self) -> NodeTag {
        match self {
            Self::StartMark { .. } => NodeTag::StartMark,
            Self::EndMark { .. } => NodeTag::EndMark,
            Self::Literal { .. } => NodeTag::Literal,
            Self::StartLine { .. } => NodeTag::StartLine,
            Self::EndLine { .. } => NodeTag::EndLine,
            Self::Wild { .. } => NodeTag::Wild,
            Self::Match => NodeTag::Match,
            Self::WordBoundary => NodeTag::WordBoundary,
            Self::NotWordBoundary => NodeTag::NotWordBoundary,
            Self::WordStart => NodeTag::WordStart,
            Self::WordEnd => NodeTag::WordEnd,
            Self::BufferStart => NodeTag::BufferStart,
            Self::BufferEnd => NodeTag::BufferEnd,
            Self::SoftBufferEnd => NodeTag::SoftBufferEnd,
            Self::ContinueMatch => NodeTag::ContinueMatch,
            Self::Backref { .. } => NodeTag::Backref,
            Self::Set { .. } => NodeTag::Set,
            Self::LongSet(_) => NodeTag::LongSet,
            Self::Jump { .. } => NodeTag::Jump,
            Self::Alt { .. } => NodeTag::Alt,
            Self::Repeat(_) => NodeTag::Repeat,
            Self::Backstep { .. } => NodeTag::Backstep,
            Self::CaseToggle { .. } => NodeTag::CaseToggle,
            Self::Recurse { .. } => NodeTag::Recurse,
            Self::Conditional { .. } => NodeTag::Conditional,
            Self::Prune => NodeTag::Prune,
            Self::Skip => NodeTag::Skip,
            Self::Commit => NodeTag::Commit,
            Self::Then { .. } => NodeTag::Then,
            Self::Fail => NodeTag::Fail,
            Self::Accept => NodeTag::Accept,
            Self::Combining => NodeTag::Combining,
        }
    }

    pub fn decode(bytes: &'a [u8], at: usize) -> Self {
        let h = Header::read(bytes, at);
        let p = at + HEADER_SIZE;
        let has = |bit: u8| h.flags & bit != 0;
        let u32_at = |off: usize| read_u32(bytes, at + off);

        match h.tag {
            NodeTag::StartMark => Self::StartMark {
                kind: GroupKind::from_u8(h.extra as u8),
                index: u32_at(field::MARK_INDEX) as i32,
                end: u32_at(field::MARK_END),
                cond_no: has(flag::COND).then(|| u32_at(field::MARK_COND_NO)),
            },
            NodeTag::EndMark => Self::EndMark {
                kind: GroupKind::from_u8(h.extra as u8),
                index: u32_at(field::MARK_INDEX) as i32,
            },
            NodeTag::Literal => {
                let raw = &bytes[p..p + h.extra as usize];
                // Literal payloads are only ever written from `&str`.
                let text = std::str::from_utf8(raw).unwrap_or_default();
                Self::Literal {
                    text,
                    icase: has(flag::ICASE),
                }
            }
            NodeTag::StartLine => Self::StartLine {
                single_line: has(flag::SINGLE_LINE),
            },
            NodeTag::EndLine => Self::EndLine {
                single_line: has(flag::SINGLE_LINE),
            },
            NodeTag::Wild => Self::Wild {
                mode: WildMode::from_u8(h.extra as u8),
            },
            NodeTag::Match => Self::Match,
            NodeTag::WordBoundary => Self::WordBoundary,
            NodeTag::NotWordBoundary => Self::NotWordBoundary,
            NodeTag::WordStart => Self::WordStart,
            NodeTag::WordEnd => Self::WordEnd,
            NodeTag::BufferStart => Self::BufferStart,
            NodeTag::BufferEnd => Self::BufferEnd,
            NodeTag::SoftBufferEnd => Self::SoftBufferEnd,
            NodeTag::ContinueMatch => Self::ContinueMatch,
            NodeTag::Backref => Self::Backref {
                value: u32_at(8),
                named: has(flag::NAMED),
            },
            NodeTag::Set => Self::Set {
                map: ByteMap::new(&bytes[p..p + 32]),
                negated: has(flag::NEGATED),
                icase: has(flag::ICASE),
            },
            NodeTag::LongSet => {
                let size = node_size(bytes, at);
                Self::LongSet(LongSet {
                    payload: &bytes[p..at + size],
                    negated: has(flag::NEGATED),
                    icase: has(flag::ICASE),
                    collate: has(flag::COLLATE),
                })
            }
            NodeTag::Jump => Self::Jump {
                target: u32_at(field::TARGET),
            },
            NodeTag::Alt => Self::Alt {
                alt: u32_at(field::ALT),
                scope: u32_at(field::ALT_SCOPE),
                take: ByteMap::new(&bytes[at + field::ALT_TAKE..]),
                skip: ByteMap::new(&bytes[at + field::ALT_SKIP..]),
                take_null: has(flag::TAKE_NULL),
                skip_null: has(flag::SKIP_NULL),
            },
            NodeTag::Repeat => Self::Repeat(Repeat {
                alt: u32_at(field::ALT),
                min: u32_at(field::REPEAT_MIN),
                max: u32_at(field::REPEAT_MAX),
                id: u32_at(field::REPEAT_ID),
                take: ByteMap::new(&bytes[at + field::REPEAT_TAKE..]),
                skip: ByteMap::new(&bytes[at + field::REPEAT_SKIP..]),
                take_null: has(flag::TAKE_NULL),
                skip_null: has(flag::SKIP_NULL),
                greedy: has(flag::GREEDY),
                leading: has(flag::LEADING),
            }),
            NodeTag::Backstep => Self::Backstep {
                width: u32_at(field::TARGET),
            },
            NodeTag::CaseToggle => Self::CaseToggle {
                icase: has(flag::ICASE),
            },
            NodeTag::Recurse => Self::Recurse {
                group: u32_at(8) as i32,
                target: u32_at(field::RECURSE_TARGET),
            },
            NodeTag::Conditional => Self::Conditional {
                kind: CondKind::from_u8(h.extra as u8),
                value: u32_at(field::COND_VALUE),
                alt: u32_at(field::COND_ALT),
            },
            NodeTag::Prune => Self::Prune,
            NodeTag::Skip => Self::Skip,
            NodeTag::Commit => Self::Commit,
            NodeTag::Then => Self::Then {
                scope: u32_at(field::TARGET),
            },
            NodeTag::Fail => Self::Fail,
            NodeTag::Accept => Self::Accept,
            NodeTag::Combining => Self::Combining,
        }
    }

    /// Encodes the node with an unlinked `next`, padded to a word boundary.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + 32);
        let mut header = Header {
            tag: self.tag(),
            flags: 0,
            extra: 0,
            next: UNLINKED,
        };
        let bit = |on: bool, b: u8| if on { b } else { 0 };
        let mut payload: Vec<u8> = Vec::new();
        fn word(v: u32, payload: &mut Vec<u8>) {
            payload.extend_from_slice(&v.to_le_bytes());
        }

        match self {
            Self::StartMark {
                kind,
                index,
                end,
                cond_no,
            } => {
                header.extra = *kind as u16;
                header.flags = bit(cond_no.is_some(), flag::COND);
                word(*index as u32, &mut payload);
                word(*end, &mut payload);
                word(cond_no.unwrap_or(UNLINKED), &mut payload);
            }
            Self::EndMark { kind, index } => {
                header.extra = *kind as u16;
                word(*index as u32, &mut payload);
            }
            Self::Literal { text, icase } => {
                header.extra = text.len() as u16;
                header.flags = bit(*icase, flag::ICASE);
                payload.extend_from_slice(text.as_bytes());
            }
            Self::StartLine { single_line } | Self::EndLine { single_line } => {
                header.flags = bit(*single_line, flag::SINGLE_LINE);
            }
            Self::Wild { mode } => header.extra = *mode as u16,
            Self::Backref { value, named } => {
                header.flags = bit(*named, flag::NAMED);
                word(*value, &mut payload);
            }
            Self::Set {
                map,
                negated,
                icase,
            } => {
                header.flags = bit(*negated, flag::NEGATED) | bit(*icase, flag::ICASE);
                payload.extend_from_slice(map.0);
            }
            Self::LongSet(set) => {
                header.flags = bit(set.negated, flag::NEGATED)
                    | bit(set.icase, flag::ICASE)
                    | bit(set.collate, flag::COLLATE);
                payload.extend_from_slice(set.payload);
            }
            Self::Jump { target } => word(*target, &mut payload),
            Self::Alt {
                alt,
                scope,
                take,
                skip,
                take_null,
                skip_null,
            } => {
                header.flags = bit(*take_null, flag::TAKE_NULL) | bit(*skip_null, flag::SKIP_NULL);
                word(*alt, &mut payload);
                word(*scope, &mut payload);
                payload.extend_from_slice(take.0);
                payload.extend_from_slice(skip.0);
            }
            Self::Repeat(r) => {
                header.flags = bit(r.take_null, flag::TAKE_NULL)
                    | bit(r.skip_null, flag::SKIP_NULL)
                    | bit(r.greedy, flag::GREEDY)
                    | bit(r.leading, flag::LEADING);
                word(r.alt, &mut payload);
                word(r.min, &mut payload);
                word(r.max, &mut payload);
                word(r.id, &mut payload);
                payload.extend_from_slice(r.take.0);
                payload.extend_from_slice(r.skip.0);
            }
            Self::Backstep { width } => word(*width, &mut payload),
            Self::CaseToggle { icase } => header.flags = bit(*icase, flag::ICASE),
            Self::Recurse { group, target } => {
                word(*group as u32, &mut payload);
                word(*target, &mut payload);
            }
            Self::Conditional { kind, value, alt } => {
                header.extra = *kind as u16;
                word(*value, &mut payload);
                word(*alt, &mut payload);
            }
            Self::Then { scope } => word(*scope, &mut payload),
            Self::Match
            | Self::WordBoundary
            | Self::NotWordBoundary
            | Self::WordStart
            | Self::WordEnd
            | Self::BufferStart
            | Self::BufferEnd
            | Self::SoftBufferEnd
            | Self::ContinueMatch
            | Self::Prune
            | Self::Skip
            | Self::Commit
            | Self::Fail
            | Self::Accept
            | Self::Combining => {}
        }

        header.write(&mut out);
        out.extend_from_slice(&payload);
        out.resize(out.len().next_multiple_of(WORD), 0);
        out
    }
}

/// Encodes a `LongSet` node from its owned description.
pub fn encode_long_set(spec: &CharSetSpec, negated: bool, icase: bool, collate: bool) -> Vec<u8> {
    let mut payload = Vec::new();
    spec.encode_payload(&mut payload);
    Node::LongSet(LongSet {
        payload: &payload,
        negated,
        icase,
        collate,
    })
    .encode()
}

/// Zeroed 32-byte map for nodes whose maps are filled in after parsing.
pub static EMPTY_MAP: [u8; 32] = [0; 32];

impl ByteMap<'static> {
    pub fn empty() -> Self {
        ByteMap(&EMPTY_MAP)
    }
}

impl CharMap {
    pub fn view(&self) -> ByteMap<'_> {
        ByteMap(&self.0)
    }
}
