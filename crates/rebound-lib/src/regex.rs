//! Compiled expressions and the builder that configures them.

use std::fmt;
use std::sync::Arc;

use rebound_bytecode::{MatchFlags, Program, SyntaxFlags, dump};
use rebound_compiler::{CompileError, CompileLimits, compile};
use rebound_core::{CharTraits, Colors, DefaultTraits};
use rebound_vm::{FuelLimits, MatchResults, Matches, Tokens, Tracer, VM};

use crate::{Error, Result};

/// A compiled regular expression.
///
/// Cloning is cheap: the compiled program is shared, never copied, and can
/// be searched from many threads at once.
#[derive(Clone)]
pub struct Regex {
    pattern: Arc<str>,
    compiled: std::result::Result<Arc<Program>, CompileError>,
    fuel: FuelLimits,
}

impl Regex {
    /// Compiles `pattern` with Perl syntax and default limits.
    pub fn new(pattern: &str) -> Result<Self> {
        RegexBuilder::new(pattern).build()
    }

    pub fn builder(pattern: &str) -> RegexBuilder {
        RegexBuilder::new(pattern)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compile error, for an expression built with `no_except`.
    pub fn status(&self) -> Option<&CompileError> {
        self.compiled.as_ref().err()
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    pub fn program(&self) -> Result<&Program> {
        match &self.compiled {
            Ok(program) => Ok(program.as_ref()),
            Err(_) => Err(Error::InvalidPattern),
        }
    }

    /// Number of capturing groups, not counting the whole match.
    pub fn mark_count(&self) -> u32 {
        self.compiled.as_ref().map_or(0, |p| p.mark_count())
    }

    /// Group names with their indices, in declaration order.
    pub fn names(&self) -> Vec<(&str, u32)> {
        let Ok(program) = &self.compiled else {
            return Vec::new();
        };
        let mut names: Vec<_> = program
            .names()
            .iter()
            .flat_map(|(name, indices)| indices.iter().map(move |&i| (name, i)))
            .collect();
        names.sort_by_key(|&(_, i)| i);
        names
    }

    pub fn fuel_limits(&self) -> FuelLimits {
        self.fuel
    }

    fn vm<'p, 't>(&'p self, text: &'t str, flags: MatchFlags) -> Result<VM<'p, 't>> {
        Ok(VM::builder(self.program()?, text)
            .flags(flags)
            .limits(self.fuel)
            .build())
    }

    /// Whether the expression matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> Result<bool> {
        let found = self
            .vm(text, MatchFlags::ANY | MatchFlags::NOSUBS)?
            .search(0)?;
        Ok(found.is_some())
    }

    /// Leftmost match in `text`.
    pub fn search<'p, 't>(&'p self, text: &'t str) -> Result<Option<MatchResults<'p, 't>>> {
        self.search_at(text, 0, MatchFlags::NONE)
    }

    /// Leftmost match starting at or after byte offset `start`.
    pub fn search_at<'p, 't>(
        &'p self,
        text: &'t str,
        start: usize,
        flags: MatchFlags,
    ) -> Result<Option<MatchResults<'p, 't>>> {
        Ok(self.vm(text, flags)?.search(start)?)
    }

    /// Like [`Regex::search_at`], reporting execution to `tracer`.
    pub fn search_traced<'p, 't, T: Tracer>(
        &'p self,
        text: &'t str,
        start: usize,
        flags: MatchFlags,
        tracer: &mut T,
    ) -> Result<Option<MatchResults<'p, 't>>> {
        Ok(self.vm(text, flags)?.search_with(start, tracer)?)
    }

    /// Match that consumes the whole of `text`.
    pub fn match_whole<'p, 't>(&'p self, text: &'t str) -> Result<Option<MatchResults<'p, 't>>> {
        self.match_whole_with(text, MatchFlags::NONE)
    }

    pub fn match_whole_with<'p, 't>(
        &'p self,
        text: &'t str,
        flags: MatchFlags,
    ) -> Result<Option<MatchResults<'p, 't>>> {
        Ok(self.vm(text, flags)?.match_whole()?)
    }

    /// Every non-overlapping match, left to right.
    pub fn find_iter<'p, 't>(&'p self, text: &'t str) -> Result<Matches<'p, 't>> {
        self.find_iter_with(text, MatchFlags::NONE)
    }

    pub fn find_iter_with<'p, 't>(
        &'p self,
        text: &'t str,
        flags: MatchFlags,
    ) -> Result<Matches<'p, 't>> {
        Ok(Matches::new(self.program()?, text, flags, self.fuel))
    }

    /// Groups `subs` of every match; `-1` selects the text between matches.
    pub fn tokens<'p, 't>(&'p self, text: &'t str, subs: &[i32]) -> Result<Tokens<'p, 't>> {
        Ok(Tokens::new(self.find_iter(text)?, subs.to_vec()))
    }

    /// The pieces of `text` between matches.
    pub fn split<'p, 't>(&'p self, text: &'t str) -> Result<Tokens<'p, 't>> {
        Ok(Tokens::split(self.find_iter(text)?))
    }

    /// Human-readable listing of the compiled program.
    pub fn dump(&self, colors: Colors) -> Result<String> {
        Ok(dump(self.program()?, colors))
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Regex")
            .field("pattern", &self.pattern)
            .field("valid", &self.is_valid())
            .finish()
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl std::str::FromStr for Regex {
    type Err = Error;

    fn from_str(pattern: &str) -> Result<Self> {
        Self::new(pattern)
    }
}

/// Configures and compiles a [`Regex`].
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    pattern: String,
    flags: SyntaxFlags,
    traits: Option<Arc<dyn CharTraits>>,
    compile_limits: CompileLimits,
    fuel: FuelLimits,
}

impl RegexBuilder {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_owned(),
            flags: SyntaxFlags::PERL,
            traits: None,
            compile_limits: CompileLimits::default(),
            fuel: FuelLimits::default(),
        }
    }

    /// Replaces every flag, the syntax family included.
    pub fn flags(mut self, flags: SyntaxFlags) -> Self {
        self.flags = flags;
        self
    }

    /// POSIX basic syntax.
    pub fn basic(mut self) -> Self {
        self.flags = (self.flags - SyntaxFlags::EXTENDED_POSIX - SyntaxFlags::LITERAL)
            | SyntaxFlags::BASIC;
        self
    }

    /// POSIX extended syntax.
    pub fn extended_posix(mut self) -> Self {
        self.flags = (self.flags - SyntaxFlags::BASIC - SyntaxFlags::LITERAL)
            | SyntaxFlags::EXTENDED_POSIX;
        self
    }

    /// The pattern is matched verbatim.
    pub fn literal(mut self) -> Self {
        self.flags = (self.flags - SyntaxFlags::BASIC - SyntaxFlags::EXTENDED_POSIX)
            | SyntaxFlags::LITERAL;
        self
    }

    pub fn icase(mut self, on: bool) -> Self {
        self.flags.set(SyntaxFlags::ICASE, on);
        self
    }

    /// Free-spacing syntax: whitespace and `#` comments are ignored.
    pub fn free_spacing(mut self, on: bool) -> Self {
        self.flags.set(SyntaxFlags::EXTENDED, on);
        self
    }

    /// Groups do not capture.
    pub fn nosubs(mut self, on: bool) -> Self {
        self.flags.set(SyntaxFlags::NOSUBS, on);
        self
    }

    /// Ranges follow the traits' collation order.
    pub fn collate(mut self, on: bool) -> Self {
        self.flags.set(SyntaxFlags::COLLATE, on);
        self
    }

    /// Keep a failed compilation as an invalid [`Regex`] instead of an error.
    pub fn no_except(mut self, on: bool) -> Self {
        self.flags.set(SyntaxFlags::NO_EXCEPT, on);
        self
    }

    pub fn traits(mut self, traits: Arc<dyn CharTraits>) -> Self {
        self.traits = Some(traits);
        self
    }

    pub fn compile_limits(mut self, limits: CompileLimits) -> Self {
        self.compile_limits = limits;
        self
    }

    pub fn fuel_limits(mut self, limits: FuelLimits) -> Self {
        self.fuel = limits;
        self
    }

    pub fn build(self) -> Result<Regex> {
        let traits = self
            .traits
            .unwrap_or_else(|| Arc::new(DefaultTraits::new()));
        let compiled = compile(&self.pattern, self.flags, traits, self.compile_limits);
        let compiled = match compiled {
            Ok(program) => Ok(Arc::new(program)),
            Err(e) if self.flags.contains(SyntaxFlags::NO_EXCEPT) => Err(e),
            Err(e) => return Err(e.into()),
        };
        Ok(Regex {
            pattern: self.pattern.into(),
            compiled,
            fuel: self.fuel,
        })
    }
}
