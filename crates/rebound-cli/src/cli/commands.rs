//! Command builders for the CLI.
//!
//! Each command is built from the shared arg builders in `args.rs`. Every
//! subcommand accepts the full flag set so a command line can be switched
//! between `exec`, `trace` and friends by changing one word; flags a command
//! ignores are hidden from its `--help`.

use clap::Command;

use super::args::*;

/// Pattern syntax flags, shared by every command.
fn with_syntax_args(cmd: Command) -> Command {
    cmd.arg(syntax_arg())
        .arg(icase_arg())
        .arg(free_spacing_arg())
        .arg(nosubs_arg())
}

/// Text input and match flags.
fn with_search_args(cmd: Command, hide: bool) -> Command {
    cmd.arg(text_path_arg().hide(hide))
        .arg(text_arg().hide(hide))
        .arg(start_arg().hide(hide))
        .arg(posix_arg().hide(hide))
        .arg(partial_arg().hide(hide))
        .arg(not_bol_arg().hide(hide))
        .arg(not_eol_arg().hide(hide))
        .arg(single_line_arg().hide(hide))
        .arg(no_dot_newline_arg().hide(hide))
        .arg(fuel_arg().hide(hide))
}

/// Add hidden exec output args (for commands that don't produce JSON).
fn with_hidden_exec_args(cmd: Command) -> Command {
    cmd.arg(all_arg().hide(true))
        .arg(compact_arg().hide(true))
}

/// Add hidden trace args (for commands that don't trace).
fn with_hidden_trace_args(cmd: Command) -> Command {
    cmd.arg(verbose_arg().hide(true))
        .arg(no_result_arg().hide(true))
}

/// Add hidden split args (for commands that don't split).
fn with_hidden_split_args(cmd: Command) -> Command {
    cmd.arg(sub_arg().hide(true))
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("rebound")
        .about("Backtracking regular expressions with Perl and POSIX syntaxes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check_command())
        .subcommand(dump_command())
        .subcommand(exec_command())
        .subcommand(trace_command())
        .subcommand(split_command())
}

/// Validate a pattern.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Validate a pattern")
        .after_help(
            r#"EXAMPLES:
  rebound check '(\w+)@(\w+)'          # silent when valid
  rebound check 'a(b' --color never    # annotated error
  rebound check '\(a\)\1' --syntax basic"#,
        )
        .arg(pattern_arg())
        .arg(color_arg());

    let cmd = with_search_args(with_syntax_args(cmd), true);
    with_hidden_split_args(with_hidden_trace_args(with_hidden_exec_args(cmd)))
}

/// Show the compiled program.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Show the compiled program")
        .after_help(
            r#"EXAMPLES:
  rebound dump 'a*b'
  rebound dump -i '(?<year>\d{4})-\d\d'"#,
        )
        .arg(pattern_arg())
        .arg(color_arg());

    let cmd = with_search_args(with_syntax_args(cmd), true);
    with_hidden_split_args(with_hidden_trace_args(with_hidden_exec_args(cmd)))
}

/// Search a text and print the match as JSON.
pub fn exec_command() -> Command {
    let cmd = Command::new("exec")
        .about("Search a text and print matches as JSON")
        .override_usage(
            "\
  rebound exec <PATTERN> <FILE>
  rebound exec <PATTERN> -t <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  rebound exec '\d+' -t 'a 12 b'       # leftmost match
  rebound exec '\d+' data.txt --all    # every match
  cat data.txt | rebound exec 'x+' -   # from stdin"#,
        )
        .arg(pattern_arg())
        .arg(all_arg())
        .arg(compact_arg())
        .arg(color_arg());

    let cmd = with_search_args(with_syntax_args(cmd), false);
    with_hidden_split_args(with_hidden_trace_args(cmd))
}

/// Trace a search step by step.
pub fn trace_command() -> Command {
    let cmd = Command::new("trace")
        .about("Trace a search for debugging")
        .override_usage(
            "\
  rebound trace <PATTERN> <FILE>
  rebound trace <PATTERN> -t <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  rebound trace 'a*ab' -t aab          # attempts and backtracks
  rebound trace 'a*ab' -t aab -vv      # every node and checkpoint
  rebound trace '(a*)*b' -t aaaa --fuel 200"#,
        )
        .arg(pattern_arg())
        .arg(verbose_arg())
        .arg(no_result_arg())
        .arg(color_arg());

    let cmd = with_search_args(with_syntax_args(cmd), false);
    with_hidden_split_args(with_hidden_exec_args(cmd))
}

/// Split a text on matches, or print selected groups of every match.
pub fn split_command() -> Command {
    let cmd = Command::new("split")
        .about("Split a text on matches, or print selected groups")
        .override_usage(
            "\
  rebound split <PATTERN> <FILE>
  rebound split <PATTERN> -t <TEXT> [--sub <N>]...",
        )
        .after_help(
            r#"EXAMPLES:
  rebound split ',\s*' -t 'a, b,c'            # a / b / c
  rebound split '(\w)=(\d)' -t 'a=1 b=2' --sub 2
  rebound split '(\w)=' -t 'a=1 b=2' --sub -1 --sub 1"#,
        )
        .arg(pattern_arg())
        .arg(sub_arg())
        .arg(color_arg());

    let cmd = with_search_args(with_syntax_args(cmd), false);
    with_hidden_trace_args(with_hidden_exec_args(cmd))
}
