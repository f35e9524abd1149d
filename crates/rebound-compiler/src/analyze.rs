//! Post-parse analysis over the linked node graph.
//!
//! Fills in the take/skip maps of every branching node, the program's start
//! map and nullability, classifies how a search may skip ahead between
//! attempts, and marks a leading `.*` so failed attempts can resume past it.

use std::collections::HashSet;

use rebound_bytecode::node::{field, flag, node_size};
use rebound_bytecode::{CharMap, GroupKind, INFINITE, Node, RestartKind};
use rebound_core::CharTraits;

use crate::emit::Emitter;

/// Width of an encoded `Jump`, the last node of every branch and repeat body.
const JUMP_SIZE: u32 = 16;

/// Summary attached to the program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Analysis {
    pub start_map: CharMap,
    pub can_be_null: bool,
    pub restart: RestartKind,
    pub literal_prefix: Option<String>,
}

/// Number of characters every match of `from..to` consumes, if fixed.
pub(crate) fn fixed_width(bytes: &[u8], from: u32, to: u32) -> Option<u32> {
    let mut width = 0u32;
    let mut at = from;
    while at < to {
        let size = node_size(bytes, at as usize) as u32;
        match Node::decode(bytes, at as usize) {
            Node::Literal { text, .. } => width += text.chars().count() as u32,
            Node::Wild { .. } | Node::Set { .. } | Node::LongSet(_) => width += 1,
            Node::StartMark { kind, end, .. } if kind.is_assertion() => {
                at = end + node_size(bytes, end as usize) as u32;
                continue;
            }
            Node::Alt { alt, .. } => {
                let jump = alt.checked_sub(JUMP_SIZE)?;
                let Node::Jump { target: end } = Node::decode(bytes, jump as usize) else {
                    return None;
                };
                let first = fixed_width(bytes, at + size, jump)?;
                let rest = fixed_width(bytes, alt, end)?;
                if first != rest {
                    return None;
                }
                width += first;
                at = end;
                continue;
            }
            Node::Repeat(r) => {
                if r.min != r.max {
                    return None;
                }
                let body = fixed_width(bytes, at + size, r.alt.checked_sub(JUMP_SIZE)?)?;
                width = width.checked_add(body.checked_mul(r.min)?)?;
                at = r.alt;
                continue;
            }
            Node::Backref { .. }
            | Node::Recurse { .. }
            | Node::Combining
            | Node::Conditional { .. }
            | Node::Jump { .. }
            | Node::Accept => return None,
            _ => {}
        }
        at += size;
    }
    Some(width)
}

struct FirstSets<'a> {
    bytes: &'a [u8],
    traits: &'a dyn CharTraits,
    has_recursion: bool,
}

impl FirstSets<'_> {
    /// Characters that can start a match from `start`, and whether the
    /// match can reach its end without consuming anything.
    fn first(&self, start: u32) -> (CharMap, bool) {
        let mut map = CharMap::EMPTY;
        let mut nullable = false;
        let mut seen = HashSet::new();
        let mut stack = vec![start];

        while let Some(at) = stack.pop() {
            if map.is_full() && nullable {
                break;
            }
            if !seen.insert(at) {
                continue;
            }
            let next = at + node_size(self.bytes, at as usize) as u32;
            match Node::decode(self.bytes, at as usize) {
                Node::Literal { text, icase } => {
                    if let Some(c) = text.chars().next() {
                        let variants = if icase {
                            self.traits.case_variants(c)
                        } else {
                            vec![c]
                        };
                        for v in variants {
                            if let Ok(b) = u8::try_from(v as u32) {
                                map.insert(b);
                            }
                        }
                    }
                }
                Node::Wild { .. } | Node::Combining => map = CharMap::FULL,
                Node::Set {
                    map: bits,
                    negated,
                    icase,
                } => {
                    for b in 0..=255u8 {
                        let folded = self.traits.translate(char::from(b), icase) as u32;
                        let member = u8::try_from(folded).is_ok_and(|f| bits.contains(f));
                        if member != negated {
                            map.insert(b);
                        }
                    }
                }
                Node::LongSet(set) => {
                    for b in 0..=255u8 {
                        if set.contains(char::from(b), self.traits) {
                            map.insert(b);
                        }
                    }
                }
                Node::Backref { .. }
                | Node::Recurse { .. }
                | Node::Backstep { .. }
                | Node::Prune
                | Node::Skip
                | Node::Commit
                | Node::Then { .. }
                | Node::Accept
                | Node::Match => {
                    map = CharMap::FULL;
                    nullable = true;
                }
                Node::Fail => {}
                Node::StartMark {
                    kind, end, cond_no, ..
                } if kind.is_assertion() => {
                    stack.push(end + node_size(self.bytes, end as usize) as u32);
                    if let Some(no) = cond_no {
                        stack.push(no);
                    }
                }
                // Leaving an independent group: the body cannot be re-entered
                // to make what follows fit.
                Node::EndMark { kind, .. }
                    if self.has_recursion || kind.is_assertion() || kind == GroupKind::Atomic =>
                {
                    map = CharMap::FULL;
                    nullable = true;
                }
                Node::Conditional { alt, .. } => {
                    stack.push(next);
                    stack.push(alt);
                }
                Node::Jump { target } => match Node::decode(self.bytes, target as usize) {
                    // Loop back: either another iteration or the exit.
                    Node::Repeat(r) if target < at => {
                        stack.push(r.alt);
                        stack.push(target + node_size(self.bytes, target as usize) as u32);
                    }
                    _ => stack.push(target),
                },
                Node::Alt { alt, .. } => {
                    stack.push(next);
                    stack.push(alt);
                }
                Node::Repeat(r) => {
                    stack.push(next);
                    if r.min == 0 {
                        stack.push(r.alt);
                    }
                }
                _ => stack.push(next),
            }
        }
        (map, nullable)
    }
}

/// Runs every analysis pass and writes the per-node results in place.
pub(crate) fn analyze(
    emit: &mut Emitter,
    traits: &dyn CharTraits,
    has_recursion: bool,
    can_lead: bool,
) -> Analysis {
    let mut patches = Vec::new();
    let (start_map, can_be_null) = {
        let sets = FirstSets {
            bytes: emit.bytes(),
            traits,
            has_recursion,
        };
        let mut at = 0u32;
        while at < emit.len() {
            let next = emit.after(at);
            let targets = match emit.node(at) {
                Node::Alt { alt, .. } => Some((next, alt, field::ALT_TAKE, field::ALT_SKIP)),
                Node::Repeat(r) => Some((next, r.alt, field::REPEAT_TAKE, field::REPEAT_SKIP)),
                _ => None,
            };
            if let Some((take_at, skip_at, take_field, skip_field)) = targets {
                let take = sets.first(take_at);
                let skip = sets.first(skip_at);
                patches.push((at, take_field, take, skip_field, skip));
            }
            at = next;
        }
        sets.first(0)
    };

    for (at, take_field, (take, take_null), skip_field, (skip, skip_null)) in patches {
        emit.write_bytes(at, take_field, take.as_bytes());
        emit.write_bytes(at, skip_field, skip.as_bytes());
        let mut bits = 0;
        if take_null {
            bits |= flag::TAKE_NULL;
        }
        if skip_null {
            bits |= flag::SKIP_NULL;
        }
        emit.set_flags(at, bits);
    }

    if can_lead && is_leading_wild(emit) {
        emit.set_flags(0, flag::LEADING);
    }

    let (restart, literal_prefix) = restart_kind(emit);
    Analysis {
        start_map,
        can_be_null,
        restart,
        literal_prefix,
    }
}

/// A greedy unbounded repeat of a single wildcard at the very start.
fn is_leading_wild(emit: &Emitter) -> bool {
    if emit.is_empty() {
        return false;
    }
    let Node::Repeat(r) = emit.node(0) else {
        return false;
    };
    if !r.greedy || r.max != INFINITE {
        return false;
    }
    let body = emit.after(0);
    matches!(emit.node(body), Node::Wild { .. }) && emit.after(body) + JUMP_SIZE == r.alt
}

/// Where a failed attempt may look for the next candidate start.
fn restart_kind(emit: &Emitter) -> (RestartKind, Option<String>) {
    let mut at = 0u32;
    while at < emit.len() {
        match emit.node(at) {
            Node::StartMark {
                kind: GroupKind::Capture | GroupKind::NonCapture | GroupKind::Atomic,
                ..
            }
            | Node::CaseToggle { .. } => {
                at = emit.after(at);
                continue;
            }
            Node::BufferStart | Node::StartLine { single_line: true } => {
                return (RestartKind::Buffer, None);
            }
            Node::StartLine { .. } => return (RestartKind::Line, None),
            Node::ContinueMatch => return (RestartKind::Continue, None),
            Node::WordStart => return (RestartKind::Word, None),
            Node::Literal { text, icase: false } => {
                return (RestartKind::Literal, Some(text.to_owned()));
            }
            _ => break,
        }
    }
    (RestartKind::Any, None)
}

#[cfg(test)]
#[path = "analyze_tests.rs"]
mod analyze_tests;
