//! Tracing infrastructure for debugging VM execution.
//!
//! # Design: Zero-Cost Abstraction
//!
//! The tracer is a zero-cost abstraction. When `NoopTracer` is used:
//! - All trait methods are `#[inline(always)]` empty functions
//! - The compiler eliminates all tracer calls and their arguments
//! - No tracing-related state exists in core execution structures

use rebound_bytecode::{Node, format_node};
use rebound_core::Colors;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Attempts, backtracks, captures, recursion, verbs and matches.
    #[default]
    Default,
    /// Adds one line per executed node.
    Verbose,
    /// Adds checkpoint pushes and the input at the cursor.
    VeryVerbose,
}

/// Tracer trait for VM execution instrumentation.
///
/// Each method is called at a specific point during execution:
/// - `trace_attempt` - before trying a start position
/// - `trace_node` - before executing a node
/// - `trace_checkpoint_created` - when a checkpoint is pushed
/// - `trace_backtrack` - when a checkpoint is restored
/// - `trace_capture` - when a capture group closes
/// - `trace_recurse` / `trace_return` - around pattern recursion
/// - `trace_verb` - when a backtracking verb fires
/// - `trace_match` - when the match node accepts
pub trait Tracer {
    fn trace_attempt(&mut self, start: usize);

    fn trace_node(&mut self, ip: u32, pos: usize, node: &Node<'_>);

    fn trace_checkpoint_created(&mut self, ip: u32);

    fn trace_backtrack(&mut self, ip: u32, pos: usize);

    fn trace_capture(&mut self, index: u32, span: (usize, usize));

    fn trace_recurse(&mut self, group: i32, target: u32);

    fn trace_return(&mut self, group: i32);

    fn trace_verb(&mut self, verb: &str, pos: usize);

    fn trace_match(&mut self, start: usize, end: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_attempt(&mut self, _start: usize) {}

    #[inline(always)]
    fn trace_node(&mut self, _ip: u32, _pos: usize, _node: &Node<'_>) {}

    #[inline(always)]
    fn trace_checkpoint_created(&mut self, _ip: u32) {}

    #[inline(always)]
    fn trace_backtrack(&mut self, _ip: u32, _pos: usize) {}

    #[inline(always)]
    fn trace_capture(&mut self, _index: u32, _span: (usize, usize)) {}

    #[inline(always)]
    fn trace_recurse(&mut self, _group: i32, _target: u32) {}

    #[inline(always)]
    fn trace_return(&mut self, _group: i32) {}

    #[inline(always)]
    fn trace_verb(&mut self, _verb: &str, _pos: usize) {}

    #[inline(always)]
    fn trace_match(&mut self, _start: usize, _end: usize) {}
}

/// Longest input preview shown in very verbose node lines.
const PREVIEW_CHARS: usize = 12;

/// Tracer that collects execution trace for debugging.
pub struct PrintTracer<'t> {
    /// Searched text, for capture and match excerpts.
    text: &'t str,
    verbosity: Verbosity,
    lines: Vec<String>,
    colors: Colors,
}

impl<'t> PrintTracer<'t> {
    pub fn new(text: &'t str, verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            text,
            verbosity,
            lines: Vec::new(),
            colors,
        }
    }

    /// Collected trace lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn excerpt(&self, start: usize, end: usize) -> String {
        format!("{:?}", self.text.get(start..end).unwrap_or_default())
    }

    fn preview(&self, pos: usize) -> String {
        let rest = self.text.get(pos..).unwrap_or_default();
        let shown: String = rest.chars().take(PREVIEW_CHARS).collect();
        let more = if shown.len() < rest.len() { "…" } else { "" };
        format!("{shown:?}{more}")
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_attempt(&mut self, start: usize) {
        let c = self.colors;
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines
            .push(format!("{}attempt @{start}{}", c.blue, c.reset));
    }

    fn trace_node(&mut self, ip: u32, pos: usize, node: &Node<'_>) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let c = self.colors;
        let mut line = format!(
            "  {}{ip:04}{} {pos:>4}  {}",
            c.dim,
            c.reset,
            format_node(node, c)
        );
        if self.verbosity == Verbosity::VeryVerbose {
            line.push_str(&format!("  {}{}{}", c.dim, self.preview(pos), c.reset));
        }
        self.lines.push(line);
    }

    fn trace_checkpoint_created(&mut self, ip: u32) {
        if self.verbosity != Verbosity::VeryVerbose {
            return;
        }
        let c = self.colors;
        self.lines
            .push(format!("  {}     +    checkpoint {ip:04}{}", c.dim, c.reset));
    }

    fn trace_backtrack(&mut self, ip: u32, pos: usize) {
        let c = self.colors;
        self.lines
            .push(format!("  {}↺ {ip:04} {pos:>4}{}", c.red, c.reset));
    }

    fn trace_capture(&mut self, index: u32, (start, end): (usize, usize)) {
        let c = self.colors;
        let text = self.excerpt(start, end);
        self.lines.push(format!(
            "           {}#{index}{} = {}{text}{}",
            c.blue, c.reset, c.green, c.reset
        ));
    }

    fn trace_recurse(&mut self, group: i32, target: u32) {
        let c = self.colors;
        self.lines.push(format!(
            "           {}→ #{group}{} {}{target:04}{}",
            c.blue, c.reset, c.dim, c.reset
        ));
    }

    fn trace_return(&mut self, group: i32) {
        let c = self.colors;
        self.lines
            .push(format!("           {}← #{group}{}", c.blue, c.reset));
    }

    fn trace_verb(&mut self, verb: &str, pos: usize) {
        let c = self.colors;
        self.lines
            .push(format!("  {}(*{verb}) @{pos}{}", c.red, c.reset));
    }

    fn trace_match(&mut self, start: usize, end: usize) {
        let c = self.colors;
        let text = self.excerpt(start, end);
        self.lines.push(format!(
            "  {}✓ match {start}..{end} {text}{}",
            c.green, c.reset
        ));
    }
}
