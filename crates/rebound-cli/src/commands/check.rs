use rebound_lib::SyntaxFlags;

use super::run_common;

pub struct CheckArgs {
    pub pattern: String,
    pub syntax: SyntaxFlags,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    run_common::compile_or_exit(&args.pattern, args.syntax, None, args.color);
    // Silent on success (like cargo check)
}
