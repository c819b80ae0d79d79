// src/main.rs
//! vmforge entry point.
//!
//! The only place in the tool that terminates the process: every failure
//! below arrives here as a `BuildError` and is mapped to an exit code.

use colored::*;

fn main() {
    if let Err(e) = vmforge::cli::run() {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}
