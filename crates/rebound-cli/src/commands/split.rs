//! Split a text on matches, or print selected groups of every match.

use rebound_lib::{Regex, Result, Tokens};

use super::run_common::{self, SearchInput};

pub struct SplitArgs {
    pub search: SearchInput,
    /// Empty means a plain split.
    pub subs: Vec<i32>,
    pub color: bool,
}

pub fn run(args: SplitArgs) {
    let search = &args.search;
    let input = run_common::load_input_or_exit(search);
    let text = run_common::text_or_exit(&input);
    let regex =
        run_common::compile_or_exit(&search.pattern, search.syntax, search.fuel, args.color);

    let tokens = collect_tokens(&regex, text, search, &args.subs)
        .unwrap_or_else(|e| run_common::runtime_error(e));
    for token in tokens {
        println!("{}", token);
    }
}

pub fn collect_tokens<'t>(
    regex: &Regex,
    text: &'t str,
    search: &SearchInput,
    subs: &[i32],
) -> Result<Vec<&'t str>> {
    let matches = regex.find_iter_with(text, search.flags)?;
    let tokens = if subs.is_empty() {
        Tokens::split(matches)
    } else {
        Tokens::new(matches, subs.to_vec())
    };
    let mut out = Vec::new();
    for token in tokens {
        out.push(token?.as_str());
    }
    Ok(out)
}
