//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `*Params` structs that mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors that pull relevant fields (ignoring hidden ones)
//! - `Into<*Args>` impls to bridge dispatch → command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use rebound_lib::{MatchFlags, SyntaxFlags, Verbosity};

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::exec::ExecArgs;
use crate::commands::run_common::SearchInput;
use crate::commands::split::SplitArgs;
use crate::commands::trace::TraceArgs;

pub struct CheckParams {
    pub pattern: String,
    pub syntax: SyntaxFlags,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            pattern: parse_pattern(m),
            syntax: parse_syntax(m),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            pattern: p.pattern,
            syntax: p.syntax,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub pattern: String,
    pub syntax: SyntaxFlags,
    pub color: ColorChoice,
    // Note: text, match flags, fuel, all, compact, verbose, no_result and
    // sub are parsed but not extracted (unified flags)
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            pattern: parse_pattern(m),
            syntax: parse_syntax(m),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            pattern: p.pattern,
            syntax: p.syntax,
            color: p.color.should_colorize(),
        }
    }
}

/// Fields shared by the commands that run a search.
pub struct SearchParams {
    pub pattern: String,
    pub text_path: Option<PathBuf>,
    pub text: Option<String>,
    pub syntax: SyntaxFlags,
    pub flags: MatchFlags,
    pub start: usize,
    pub fuel: Option<u32>,
}

impl SearchParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            pattern: parse_pattern(m),
            text_path: m.get_one::<PathBuf>("text_path").cloned(),
            text: m.get_one::<String>("text").cloned(),
            syntax: parse_syntax(m),
            flags: parse_match_flags(m),
            start: m.get_one::<usize>("start").copied().unwrap_or(0),
            fuel: m.get_one::<u32>("fuel").copied(),
        }
    }
}

impl From<SearchParams> for SearchInput {
    fn from(p: SearchParams) -> Self {
        Self {
            pattern: p.pattern,
            text_path: p.text_path,
            text: p.text,
            syntax: p.syntax,
            flags: p.flags,
            start: p.start,
            fuel: p.fuel,
        }
    }
}

pub struct ExecParams {
    pub search: SearchParams,
    pub all: bool,
    pub compact: bool,
    pub color: ColorChoice,
}

impl ExecParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            search: SearchParams::from_matches(m),
            all: m.get_flag("all"),
            compact: m.get_flag("compact"),
            color: parse_color(m),
        }
    }
}

impl From<ExecParams> for ExecArgs {
    fn from(p: ExecParams) -> Self {
        Self {
            search: p.search.into(),
            all: p.all,
            pretty: !p.compact,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TraceParams {
    pub search: SearchParams,
    pub verbosity: Verbosity,
    pub no_result: bool,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            search: SearchParams::from_matches(m),
            verbosity: parse_verbosity(m),
            no_result: m.get_flag("no_result"),
            color: parse_color(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        Self {
            search: p.search.into(),
            verbosity: p.verbosity,
            no_result: p.no_result,
            color: p.color.should_colorize(),
        }
    }
}

pub struct SplitParams {
    pub search: SearchParams,
    pub subs: Vec<i32>,
    pub color: ColorChoice,
}

impl SplitParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            search: SearchParams::from_matches(m),
            subs: m
                .get_many::<i32>("sub")
                .map(|subs| subs.copied().collect())
                .unwrap_or_default(),
            color: parse_color(m),
        }
    }
}

impl From<SplitParams> for SplitArgs {
    fn from(p: SplitParams) -> Self {
        Self {
            search: p.search.into(),
            subs: p.subs,
            color: p.color.should_colorize(),
        }
    }
}

fn parse_pattern(m: &ArgMatches) -> String {
    m.get_one::<String>("pattern").cloned().unwrap_or_default()
}

fn parse_syntax(m: &ArgMatches) -> SyntaxFlags {
    let mut flags = match m.get_one::<String>("syntax").map(String::as_str) {
        Some("basic") => SyntaxFlags::BASIC,
        Some("extended") => SyntaxFlags::EXTENDED_POSIX,
        Some("literal") => SyntaxFlags::LITERAL,
        _ => SyntaxFlags::PERL,
    };
    flags.set(SyntaxFlags::ICASE, m.get_flag("icase"));
    flags.set(SyntaxFlags::EXTENDED, m.get_flag("free_spacing"));
    flags.set(SyntaxFlags::NOSUBS, m.get_flag("nosubs"));
    flags
}

fn parse_match_flags(m: &ArgMatches) -> MatchFlags {
    let mut flags = MatchFlags::NONE;
    flags.set(MatchFlags::POSIX, m.get_flag("posix"));
    flags.set(MatchFlags::PARTIAL, m.get_flag("partial"));
    flags.set(MatchFlags::NOT_BOL, m.get_flag("not_bol"));
    flags.set(MatchFlags::NOT_EOL, m.get_flag("not_eol"));
    flags.set(MatchFlags::SINGLE_LINE, m.get_flag("single_line"));
    flags.set(MatchFlags::NOT_DOT_NEWLINE, m.get_flag("no_dot_newline"));
    flags
}

fn parse_verbosity(m: &ArgMatches) -> Verbosity {
    match m.get_count("verbose") {
        0 => Verbosity::Default,
        1 => Verbosity::Verbose,
        _ => Verbosity::VeryVerbose,
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
