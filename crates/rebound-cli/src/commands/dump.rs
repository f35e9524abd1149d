use rebound_lib::{Colors, SyntaxFlags};

use super::run_common;

pub struct DumpArgs {
    pub pattern: String,
    pub syntax: SyntaxFlags,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let regex = run_common::compile_or_exit(&args.pattern, args.syntax, None, args.color);
    match regex.dump(Colors::new(args.color)) {
        Ok(listing) => print!("{}", listing),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
