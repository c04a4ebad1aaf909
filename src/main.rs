use std::process::ExitCode;

use brrtcors::cli::run_cli;
use brrtcors::logging::{init_logging_with_config, LogConfig};

fn main() -> ExitCode {
    if let Err(e) = init_logging_with_config(&LogConfig::from_env()) {
        eprintln!("Warning: {e:#}");
    }

    match run_cli() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
