use rebound_lib::{MatchRecord, Regex, Result};
use serde::Serialize;

use super::run_common::{self, SearchInput};

pub struct ExecArgs {
    pub search: SearchInput,
    pub all: bool,
    pub pretty: bool,
    pub color: bool,
}

/// What `exec` prints: one match (or `null`), or every match with `--all`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ExecOutput {
    First(Option<MatchRecord>),
    All(Vec<MatchRecord>),
}

impl ExecOutput {
    pub fn is_empty(&self) -> bool {
        match self {
            ExecOutput::First(found) => found.is_none(),
            ExecOutput::All(found) => found.is_empty(),
        }
    }
}

pub fn run(args: ExecArgs) {
    let search = &args.search;
    let input = run_common::load_input_or_exit(search);
    let text = run_common::text_or_exit(&input);
    let regex =
        run_common::compile_or_exit(&search.pattern, search.syntax, search.fuel, args.color);

    let output = execute(&regex, text, search, args.all)
        .unwrap_or_else(|e| run_common::runtime_error(e));

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: JSON serialization failed: {}", e);
            std::process::exit(1);
        }
    }

    if output.is_empty() {
        std::process::exit(1);
    }
}

pub fn execute(regex: &Regex, text: &str, search: &SearchInput, all: bool) -> Result<ExecOutput> {
    if !all {
        let found = regex.search_at(text, search.start, search.flags)?;
        return Ok(ExecOutput::First(found.map(|m| m.to_record())));
    }
    let mut records = Vec::new();
    for m in regex.find_iter_with(text, search.flags)? {
        let m = m?;
        if m.start() >= search.start {
            records.push(m.to_record());
        }
    }
    Ok(ExecOutput::All(records))
}
