//! Shared logic for the commands that compile a pattern and search a text.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use rebound_lib::{Error, FuelLimits, MatchFlags, Regex, SyntaxFlags};

/// Pattern, text source and flags for one search.
pub struct SearchInput {
    pub pattern: String,
    pub text_path: Option<PathBuf>,
    pub text: Option<String>,
    pub syntax: SyntaxFlags,
    pub flags: MatchFlags,
    pub start: usize,
    pub fuel: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("text is required: use a file argument, '-' for stdin, or -t/--text")]
    Missing,

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("'{}' is not valid UTF-8", path.display())]
    Utf8 { path: PathBuf },
}

/// Text to search, owned or memory-mapped.
pub enum Input {
    Owned(String),
    Mapped { path: PathBuf, map: Mmap },
}

impl Input {
    pub fn as_str(&self) -> Result<&str, InputError> {
        match self {
            Input::Owned(text) => Ok(text.as_str()),
            Input::Mapped { path, map } => {
                std::str::from_utf8(map).map_err(|_| InputError::Utf8 { path: path.clone() })
            }
        }
    }
}

/// Load the text from inline text, stdin (`-`) or a file.
pub fn load_input(text: Option<&str>, path: Option<&Path>) -> Result<Input, InputError> {
    if let Some(text) = text {
        return Ok(Input::Owned(text.to_owned()));
    }
    let Some(path) = path else {
        return Err(InputError::Missing);
    };
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(InputError::Stdin)?;
        return Ok(Input::Owned(buf));
    }

    let io_error = |source| InputError::Io {
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    if file.metadata().map_err(io_error)?.len() == 0 {
        return Ok(Input::Owned(String::new()));
    }
    // SAFETY: the map is read-only; a concurrent writer truncating the file
    // is not something a CLI can guard against.
    let map = unsafe { Mmap::map(&file) }.map_err(io_error)?;
    Ok(Input::Mapped {
        path: path.to_owned(),
        map,
    })
}

/// Load the text, exiting with a message on failure.
pub fn load_input_or_exit(input: &SearchInput) -> Input {
    load_input(input.text.as_deref(), input.text_path.as_deref()).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    })
}

pub fn text_or_exit(input: &Input) -> &str {
    input.as_str().unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    })
}

/// Compile a pattern with an optional fuel override.
pub fn compile(pattern: &str, syntax: SyntaxFlags, fuel: Option<u32>) -> Result<Regex, Error> {
    let mut limits = FuelLimits::new();
    if let Some(fuel) = fuel {
        limits = limits.exec_fuel(fuel);
    }
    Regex::builder(pattern)
        .flags(syntax)
        .fuel_limits(limits)
        .build()
}

/// Compile a pattern, rendering any error against it.
pub fn compile_or_exit(
    pattern: &str,
    syntax: SyntaxFlags,
    fuel: Option<u32>,
    color: bool,
) -> Regex {
    match compile(pattern, syntax, fuel) {
        Ok(regex) => regex,
        Err(Error::Compile(e)) => {
            eprintln!("{}", e.render(pattern, color));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Report a failed search: exit code 2 keeps it apart from "no match".
pub fn runtime_error(e: Error) -> ! {
    eprintln!("runtime error: {}", e);
    std::process::exit(2);
}
