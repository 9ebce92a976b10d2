//! Hospital records shell entry point.
//!
//! # Responsibility
//! - Resolve configuration, start file logging, open the database.
//! - Hand stdin/stdout to the menu loop and map fatal errors to exit code 1.

mod shell;

use hospital_core::db::open_db;
use hospital_core::{init_logging, sqlite_service, AppConfig};
use log::error;
use shell::Shell;
use std::error::Error;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;

    // Logging is diagnostics only; the shell still works without it.
    if let Err(message) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {message}");
    }

    let conn = open_db(&config.db_path)?;
    let stdin = io::stdin();
    let mut shell = Shell::new(sqlite_service(&conn), stdin.lock(), io::stdout().lock());
    shell.run()?;
    Ok(())
}
