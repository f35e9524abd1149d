//! Match results and the capture model.
//!
//! Positions are byte offsets into the searched text. Index 0 is the whole
//! match; [`MatchResults::get`] also accepts -1 for the prefix and -2 for
//! the suffix.

use std::collections::BTreeMap;
use std::ops::Range;

use rebound_bytecode::NameTable;
use serde::Serialize;

type Span = (usize, usize);

/// One captured span, or a group that did not participate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubMatch<'t> {
    text: &'t str,
    pub start: usize,
    pub end: usize,
    pub matched: bool,
}

impl<'t> SubMatch<'t> {
    pub fn new(text: &'t str, start: usize, end: usize) -> Self {
        Self {
            text,
            start,
            end,
            matched: true,
        }
    }

    /// A group that did not participate, placed at the end of the text.
    pub fn unmatched(text: &'t str) -> Self {
        Self {
            text,
            start: text.len(),
            end: text.len(),
            matched: false,
        }
    }

    fn from_span(text: &'t str, span: Option<Span>) -> Self {
        match span {
            Some((start, end)) => Self::new(text, start, end),
            None => Self::unmatched(text),
        }
    }

    /// Matched text; empty for a group that did not participate.
    pub fn as_str(&self) -> &'t str {
        if self.matched {
            &self.text[self.start..self.end]
        } else {
            ""
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for SubMatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful (or partial) search.
#[derive(Clone, Debug)]
pub struct MatchResults<'p, 't> {
    text: &'t str,
    groups: Vec<Option<Span>>,
    /// Where the search started; the prefix begins here.
    base: usize,
    partial: bool,
    names: &'p NameTable,
}

impl<'p, 't> MatchResults<'p, 't> {
    pub fn new(
        text: &'t str,
        groups: Vec<Option<Span>>,
        base: usize,
        partial: bool,
        names: &'p NameTable,
    ) -> Self {
        Self {
            text,
            groups,
            base,
            partial,
            names,
        }
    }

    /// Group `index`, the prefix (-1) or the suffix (-2).
    pub fn get(&self, index: isize) -> Option<SubMatch<'t>> {
        match index {
            -1 => Some(self.prefix()),
            -2 => Some(self.suffix()),
            i if i >= 0 => {
                let span = *self.groups.get(i as usize)?;
                Some(SubMatch::from_span(self.text, span))
            }
            _ => None,
        }
    }

    /// Group called `name`: the leftmost one that matched, else the
    /// leftmost one declared.
    pub fn name(&self, name: &str) -> Option<SubMatch<'t>> {
        let index = self.name_index(name)?;
        self.get(index as isize)
    }

    pub fn name_index(&self, name: &str) -> Option<u32> {
        let indices = self.names.lookup(name);
        indices
            .iter()
            .copied()
            .find(|&i| self.groups.get(i as usize).is_some_and(Option::is_some))
            .or_else(|| indices.first().copied())
    }

    /// Text of group `index`; empty when it did not participate.
    pub fn str(&self, index: usize) -> &'t str {
        self.get(index as isize).map_or("", |m| m.as_str())
    }

    /// Text between the search start and the match.
    pub fn prefix(&self) -> SubMatch<'t> {
        SubMatch::new(self.text, self.base.min(self.start()), self.start())
    }

    /// Text after the match.
    pub fn suffix(&self) -> SubMatch<'t> {
        SubMatch::new(self.text, self.end(), self.text.len())
    }

    /// Start offset of group `index`, if it participated.
    pub fn position(&self, index: usize) -> Option<usize> {
        self.span(index).map(|(start, _)| start)
    }

    /// Length of group `index`, if it participated.
    pub fn length(&self, index: usize) -> Option<usize> {
        self.span(index).map(|(start, end)| end - start)
    }

    pub fn span(&self, index: usize) -> Option<Span> {
        self.groups.get(index).copied().flatten()
    }

    pub fn start(&self) -> usize {
        self.span(0).map_or(self.text.len(), |(start, _)| start)
    }

    pub fn end(&self) -> usize {
        self.span(0).map_or(self.text.len(), |(_, end)| end)
    }

    pub fn as_str(&self) -> &'t str {
        self.str(0)
    }

    /// Number of groups, the whole match included.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SubMatch<'t>> + '_ {
        self.groups
            .iter()
            .map(|&span| SubMatch::from_span(self.text, span))
    }

    /// Only group 0 is set, and it runs to the end of the text.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn text(&self) -> &'t str {
        self.text
    }

    /// Leftmost-longest comparison against another candidate.
    pub fn is_better_than(&self, other: &Self) -> bool {
        prefer(&self.groups, &other.groups)
    }

    pub fn to_record(&self) -> MatchRecord {
        let groups = self
            .groups
            .iter()
            .map(|span| {
                span.map(|(start, end)| GroupRecord {
                    start,
                    end,
                    text: self.text[start..end].to_owned(),
                })
            })
            .collect();
        let names = self
            .names
            .iter()
            .filter_map(|(name, _)| Some((name.to_owned(), self.name_index(name)?)))
            .collect();
        MatchRecord {
            start: self.start(),
            end: self.end(),
            text: self.as_str().to_owned(),
            partial: self.partial,
            groups,
            names,
        }
    }
}

/// Whether capture set `a` beats `b`: earlier start, then longer match,
/// then groupwise from the left, a group that participated beats one that
/// did not and an earlier or longer span beats a later or shorter one.
pub(crate) fn prefer(a: &[Option<Span>], b: &[Option<Span>]) -> bool {
    for (x, y) in a.iter().zip(b) {
        match (x, y) {
            (Some(_), None) => return true,
            (None, Some(_)) => return false,
            (Some(x), Some(y)) if x.0 != y.0 => return x.0 < y.0,
            (Some(x), Some(y)) if x.1 != y.1 => return x.1 > y.1,
            _ => {}
        }
    }
    false
}

/// Owned, serializable form of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub start: usize,
    pub end: usize,
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
    pub groups: Vec<Option<GroupRecord>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupRecord {
    pub start: usize,
    pub end: usize,
    pub text: String,
}
