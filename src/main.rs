//! tilecomp - Command-line tool for rendering tilesets and blocksets

use std::process::ExitCode;

use tilecomp::cli;

fn main() -> ExitCode {
    cli::run()
}
