//! Trace a search for debugging.

use rebound_lib::{Colors, PrintTracer, Verbosity};

use super::run_common::{self, SearchInput};

pub struct TraceArgs {
    pub search: SearchInput,
    pub verbosity: Verbosity,
    pub no_result: bool,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let search = &args.search;
    let input = run_common::load_input_or_exit(search);
    let text = run_common::text_or_exit(&input);
    let regex =
        run_common::compile_or_exit(&search.pattern, search.syntax, search.fuel, args.color);

    let colors = Colors::new(args.color);
    let mut tracer = PrintTracer::new(text, args.verbosity, colors);
    let found = regex.search_traced(text, search.start, search.flags, &mut tracer);
    tracer.print();

    let m = match found {
        Ok(Some(m)) => m,
        Ok(None) => std::process::exit(1),
        Err(e) => run_common::runtime_error(e),
    };

    if args.no_result {
        return;
    }

    println!("{}---{}", colors.dim, colors.reset);
    match serde_json::to_string_pretty(&m.to_record()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: JSON serialization failed: {}", e);
            std::process::exit(1);
        }
    }
}
