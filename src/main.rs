use std::process::ExitCode;

use trashcan::cli;
use trashcan::output as out;

mod app;
mod logging;

/// Exit status for configuration and startup failures.
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    let args = cli::parse();
    match app::run(args) {
        Ok(code) => code,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::from(EXIT_CONFIG)
        }
    }
}
