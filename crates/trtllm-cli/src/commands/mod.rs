//! Command handlers. Each returns the process exit code.

pub mod config;
pub mod generate;

/// Log an error chain and map it to exit code 1.
pub(crate) fn report(command: &str, err: anyhow::Error) -> i32 {
    tracing::error!(command, error = %format!("{:#}", err), "Command failed");
    eprintln!("error: {:#}", err);
    1
}
