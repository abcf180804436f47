pub mod logging;
pub mod resolver;

mod cli;

pub use cli::{Cli, Command};

/// Binary entry point: parse arguments, resolve, print.
pub async fn run() -> std::process::ExitCode {
    cli::run().await
}
