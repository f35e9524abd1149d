//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.
//! The same arg definition is reused across commands with different
//! visibility settings (via `.hide(true)`).

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Regular expression (first positional).
pub fn pattern_arg() -> Arg {
    Arg::new("pattern")
        .value_name("PATTERN")
        .required(true)
        .help("Regular expression")
}

/// File to search (second positional).
pub fn text_path_arg() -> Arg {
    Arg::new("text_path")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("File to search ('-' reads stdin)")
}

/// Inline text to search (-t/--text).
pub fn text_arg() -> Arg {
    Arg::new("text")
        .short('t')
        .long("text")
        .value_name("TEXT")
        .conflicts_with("text_path")
        .help("Inline text to search")
}

/// Pattern syntax family (--syntax).
pub fn syntax_arg() -> Arg {
    Arg::new("syntax")
        .long("syntax")
        .value_name("SYNTAX")
        .default_value("perl")
        .value_parser(["perl", "basic", "extended", "literal"])
        .help("Pattern syntax")
}

/// Case-insensitive matching (-i/--icase).
pub fn icase_arg() -> Arg {
    Arg::new("icase")
        .short('i')
        .long("icase")
        .action(ArgAction::SetTrue)
        .help("Ignore case")
}

/// Free-spacing pattern syntax (-x/--free-spacing).
pub fn free_spacing_arg() -> Arg {
    Arg::new("free_spacing")
        .short('x')
        .long("free-spacing")
        .action(ArgAction::SetTrue)
        .help("Ignore whitespace and '#' comments in the pattern")
}

/// Non-capturing groups (--nosubs).
pub fn nosubs_arg() -> Arg {
    Arg::new("nosubs")
        .long("nosubs")
        .action(ArgAction::SetTrue)
        .help("Report only the whole match")
}

/// Search start offset (--start).
pub fn start_arg() -> Arg {
    Arg::new("start")
        .long("start")
        .value_name("OFFSET")
        .default_value("0")
        .value_parser(value_parser!(usize))
        .help("Byte offset to start searching from")
}

/// Leftmost-longest matching (--posix).
pub fn posix_arg() -> Arg {
    Arg::new("posix")
        .long("posix")
        .action(ArgAction::SetTrue)
        .help("Prefer the leftmost-longest match")
}

/// Accept a match cut short by the end of the text (--partial).
pub fn partial_arg() -> Arg {
    Arg::new("partial")
        .long("partial")
        .action(ArgAction::SetTrue)
        .help("Report a match that runs off the end of the text")
}

/// The text start is not a line start (--not-bol).
pub fn not_bol_arg() -> Arg {
    Arg::new("not_bol")
        .long("not-bol")
        .action(ArgAction::SetTrue)
        .help("Do not treat the text start as a line start")
}

/// The text end is not a line end (--not-eol).
pub fn not_eol_arg() -> Arg {
    Arg::new("not_eol")
        .long("not-eol")
        .action(ArgAction::SetTrue)
        .help("Do not treat the text end as a line end")
}

/// `^` and `$` match only at the text edges (--single-line).
pub fn single_line_arg() -> Arg {
    Arg::new("single_line")
        .long("single-line")
        .action(ArgAction::SetTrue)
        .help("Anchor '^' and '$' to the text edges only")
}

/// `.` does not match a newline (--no-dot-newline).
pub fn no_dot_newline_arg() -> Arg {
    Arg::new("no_dot_newline")
        .long("no-dot-newline")
        .action(ArgAction::SetTrue)
        .help("Do not let '.' match a newline")
}

/// Report every match (-a/--all).
pub fn all_arg() -> Arg {
    Arg::new("all")
        .short('a')
        .long("all")
        .action(ArgAction::SetTrue)
        .help("Report every non-overlapping match")
}

/// Output compact JSON (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Output compact JSON")
}

/// Selected sub-matches (--sub), `-1` for the text between matches.
pub fn sub_arg() -> Arg {
    Arg::new("sub")
        .long("sub")
        .value_name("N")
        .action(ArgAction::Append)
        .allow_negative_numbers(true)
        .value_parser(value_parser!(i32).range(-1..))
        .help("Group to emit per match, -1 for the text between (repeatable)")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for verbose, -vv for very verbose)")
}

/// Skip the match report (--no-result).
pub fn no_result_arg() -> Arg {
    Arg::new("no_result")
        .long("no-result")
        .action(ArgAction::SetTrue)
        .help("Show the trace only")
}

/// Execution fuel limit (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .value_parser(value_parser!(u32))
        .help("State-visit budget per search (default: estimated from the input)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
