//! Raw shell execution for the unvalidated dispatch variant
//!
//! Runs a fetched descriptor body verbatim through `sh -c`, with no
//! inspection or sanitization. This reproduces the legacy raw-shell
//! catalog behavior and is only reachable when `dispatch.mode` is set to
//! `raw-shell`; the validated grammar is the default. Treat the catalog
//! host as fully trusted before enabling it.

use tokio::process::Command;
use tracing::{error, info, warn};

/// Execute `command_line` through the system shell
///
/// Fire-and-forget: the child is not awaited and spawn errors are logged
/// and swallowed, keeping the host process alive either way.
pub async fn run_shell_command(command_line: &str) {
    warn!(command = %command_line, "Executing raw catalog command");

    #[cfg(unix)]
    let result = Command::new("sh").arg("-c").arg(command_line).spawn();

    #[cfg(not(unix))]
    let result = Command::new("cmd").arg("/C").arg(command_line).spawn();

    match result {
        Ok(_child) => info!("Raw command spawned"),
        Err(e) => error!(error = %e, "Failed to spawn raw command"),
    }
}
