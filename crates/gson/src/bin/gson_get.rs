//! `gson-get`: print values from a JSON document by smart key.
//!
//! Usage:
//!   gson-get [-v|-vv] [--comments] [--raw] <smart-key> [<smart-key>...]
//!
//! The document is read from stdin. Each result is printed on its own line.
//! Exit status is 1 when a key is absent and 2 for any other failure.

use std::io::{self, Write};
use std::process;

use gson::cli::{run, Args};

fn main() {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(args.level())
        .with_writer(io::stderr)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match run(&args, io::stdin().lock()) {
        Ok(lines) => {
            let mut out = io::stdout().lock();
            for line in lines {
                if writeln!(out, "{line}").is_err() {
                    process::exit(2);
                }
            }
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    }
}
