//! Core logic of the `gson-get` command-line tool.
//!
//! The binary only wires stdin, stdout and logging around [`run`].

use std::io::Read;

use thiserror::Error;
use tracing::Level;

use crate::{Error, Json};

pub const USAGE: &str =
    "usage: gson-get [-v|-vv] [--comments] [--raw] <smart-key> [<smart-key>...]";

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{}", USAGE)]
    Usage,

    #[error("unknown option '{option}'\n{}", USAGE)]
    UnknownOption { option: String },

    #[error("gson-get: reading input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Lookup(#[from] Error),
}

impl CliError {
    /// 1 when a key was simply absent, 2 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Lookup(e) if e.is_not_found() => 1,
            _ => 2,
        }
    }
}

// ── Arguments ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    /// Number of `-v` flags seen.
    pub verbosity: u8,
    /// Strip `//` and `/* */` comments before parsing.
    pub comments: bool,
    /// Print string values unquoted.
    pub raw: bool,
    pub keys: Vec<String>,
}

impl Args {
    /// Parse arguments, program name excluded. Everything after `--` is
    /// taken as a smart key.
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Args::default();
        let mut options = true;
        for arg in args {
            let arg = arg.into();
            if !options || arg == "-" || !arg.starts_with('-') {
                parsed.keys.push(arg);
                continue;
            }
            match arg.as_str() {
                "--" => options = false,
                "-v" => parsed.verbosity = parsed.verbosity.saturating_add(1),
                "-vv" => parsed.verbosity = parsed.verbosity.saturating_add(2),
                "--comments" => parsed.comments = true,
                "--raw" => parsed.raw = true,
                _ => return Err(CliError::UnknownOption { option: arg }),
            }
        }
        if parsed.keys.is_empty() {
            return Err(CliError::Usage);
        }
        Ok(parsed)
    }

    pub fn level(&self) -> Level {
        match self.verbosity {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

// ── Lookup ────────────────────────────────────────────────────────────────

/// Read one document from `input` and resolve every key of `args`, in
/// order. Stops at the first key that does not resolve.
pub fn run<R: Read>(args: &Args, input: R) -> Result<Vec<String>, CliError> {
    let doc = if args.comments {
        Json::from_reader(jcon::CommentStripper::new(input))?
    } else {
        Json::from_reader(input)?
    };
    debug!(keys = args.keys.len(), comments = args.comments, "document loaded");

    args.keys
        .iter()
        .map(|key| lookup(&doc, key, args.raw).map_err(CliError::from))
        .collect()
}

fn lookup(doc: &Json, key: &str, raw: bool) -> Result<String, Error> {
    let node = doc.get(key);
    if let Some(err) = node.err() {
        return Err(err);
    }
    trace!(key, kind = %node.kind(), "resolved");
    if raw {
        node.try_str()
    } else {
        Ok(node.to_string())
    }
}
