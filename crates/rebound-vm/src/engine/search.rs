//! Search driver: picks candidate start positions and runs attempts.

use rebound_bytecode::{MatchFlags, RestartKind};

use super::error::RuntimeError;
use super::trace::{NoopTracer, Tracer};
use super::vm::{Attempt, VM, estimate_fuel};
use crate::results::MatchResults;

pub type SearchResult<'p, 't> = Result<Option<MatchResults<'p, 't>>, RuntimeError>;

impl<'p, 't> VM<'p, 't> {
    /// Finds the leftmost match starting at or after `start`.
    ///
    /// This is a convenience method that uses `NoopTracer`, which gets
    /// completely optimized away at compile time.
    pub fn search(self, start: usize) -> SearchResult<'p, 't> {
        self.search_with(start, &mut NoopTracer)
    }

    /// Finds the leftmost match, reporting execution to `tracer`.
    pub fn search_with<T: Tracer>(mut self, start: usize, tracer: &mut T) -> SearchResult<'p, 't> {
        let start = self.input.clamp(start);
        self.prepare(start);
        let anchored = self.flags.contains(MatchFlags::CONTINUOUS)
            || matches!(
                self.program.restart(),
                RestartKind::Continue | RestartKind::Buffer
            );

        let Some(mut at) = (if anchored {
            Some(start)
        } else {
            self.next_candidate(start)
        }) else {
            return Ok(None);
        };

        loop {
            let outcome = self.run_attempt(at, tracer)?;
            match outcome {
                Attempt::Matched => return Ok(self.take_results()),
                Attempt::Committed => return Ok(self.partial_results(at)),
                Attempt::Failed | Attempt::SkipTo(_) => {}
            }
            if self.partial {
                return Ok(self.partial_results(at));
            }
            if anchored {
                return Ok(None);
            }

            let mut from = match outcome {
                Attempt::SkipTo(p) if p > at => p,
                _ => match self.input.advance(at) {
                    Some(p) => p,
                    None => return Ok(None),
                },
            };
            if let Some(reach) = self.leading_reach {
                from = from.max(reach);
            }
            match self.next_candidate(from) {
                Some(p) => at = p,
                None => return Ok(None),
            }
        }
    }

    /// Matches only if the whole text, from its first byte, is consumed.
    pub fn match_whole(self) -> SearchResult<'p, 't> {
        self.match_whole_with(&mut NoopTracer)
    }

    pub fn match_whole_with<T: Tracer>(mut self, tracer: &mut T) -> SearchResult<'p, 't> {
        self.flags |= MatchFlags::CONTINUOUS;
        self.required_end = Some(self.input.end());
        self.search_with(0, tracer)
    }

    fn prepare(&mut self, start: usize) {
        self.input.base = start;
        self.input.floor = if self.flags.contains(MatchFlags::PREV_AVAIL) {
            0
        } else {
            start
        };
        if self.program.is_posix() {
            self.flags |= MatchFlags::POSIX;
        }
        self.fuel = match self.limits.get_exec_fuel() {
            Some(fuel) => fuel,
            None => estimate_fuel(self.program.node_count(), self.input.end()),
        };
    }

    /// First position at or after `from` where an attempt can succeed.
    fn next_candidate(&self, from: usize) -> Option<usize> {
        let program = self.program;
        let traits = program.traits();
        let input = &self.input;
        let partial = self.flags.contains(MatchFlags::PARTIAL);

        match program.restart() {
            RestartKind::Literal if !partial => {
                let prefix = program.literal_prefix()?;
                input.text[from..].find(prefix).map(|i| from + i)
            }
            RestartKind::Line => {
                let mut at = from;
                loop {
                    let line_start = at == input.base
                        || input.char_before(at).is_some_and(|c| traits.is_separator(c));
                    if line_start {
                        return Some(at);
                    }
                    at = input.advance(at)?;
                }
            }
            RestartKind::Word => {
                let mut at = from;
                loop {
                    let word_start = at == input.base
                        || (input.char_at(at).is_some_and(|c| traits.is_word(c))
                            && !input.char_before(at).is_some_and(|c| traits.is_word(c)));
                    if word_start {
                        return Some(at);
                    }
                    at = input.advance(at)?;
                }
            }
            RestartKind::Buffer | RestartKind::Continue => Some(from),
            RestartKind::Any | RestartKind::Literal => {
                let map = program.start_map().view();
                let mut at = from;
                loop {
                    match input.char_at(at) {
                        Some(c) if map.allows(c) => return Some(at),
                        Some(c) => at += c.len_utf8(),
                        None => return (program.can_be_null() || partial).then_some(at),
                    }
                }
            }
        }
    }

    fn take_results(&mut self) -> Option<MatchResults<'p, 't>> {
        let mut groups = self.best.take()?;
        if self.flags.contains(MatchFlags::NOSUBS) {
            groups.iter_mut().skip(1).for_each(|g| *g = None);
        }
        Some(MatchResults::new(
            self.input.text,
            groups,
            self.input.base,
            false,
            self.program.names(),
        ))
    }

    /// A partial match from `start` to the end of input, if one was seen.
    fn partial_results(&self, start: usize) -> Option<MatchResults<'p, 't>> {
        if !self.partial {
            return None;
        }
        let mut groups = vec![None; self.program.mark_count() as usize + 1];
        groups[0] = Some((start, self.input.end()));
        Some(MatchResults::new(
            self.input.text,
            groups,
            self.input.base,
            true,
            self.program.names(),
        ))
    }
}
