//! A small wrapper around [`reth_tasks::TaskManager`] that gives CLI subcommands a Tokio
//! runtime, a task executor, and a graceful-shutdown-on-Ctrl+C without every subcommand having
//! to wire that up itself.
//!
//! Note: the crate this is adapted from ships only its `Cargo.toml` in this workspace's
//! reference material, not its source — the shape below is inferred from the call site
//! (`runner.run_command_until_exit(|ctx| cmd.execute(ctx))`), not copied from an original file.

use std::future::Future;

use reth_tasks::{TaskExecutor, TaskManager};
use tracing::{debug, error};

/// Execution context handed to a CLI subcommand: a task executor for spawning background work,
/// bound to the runtime [`CliRunner`] set up.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub task_executor: TaskExecutor,
}

/// Builds a Tokio runtime and a `reth_tasks` task manager, then runs one async command to
/// completion — or until Ctrl+C arrives, whichever happens first.
#[derive(Debug, Default)]
pub struct CliRunner;

impl CliRunner {
    /// Runs `command` on a fresh multi-threaded runtime, returning the command's result. If
    /// Ctrl+C is pressed first, background tasks are given a chance to shut down gracefully
    /// before this returns `Ok(())`.
    pub fn run_command_until_exit<F, Fut>(self, command: F) -> eyre::Result<()>
    where
        F: FnOnce(CliContext) -> Fut,
        Fut: Future<Output = eyre::Result<()>>,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let manager = TaskManager::new(runtime.handle().clone());
        let executor = manager.executor();
        let ctx = CliContext {
            task_executor: executor,
        };

        let command_result = runtime.block_on(async move {
            tokio::select! {
                result = command(ctx) => result,
                _ = tokio::signal::ctrl_c() => {
                    debug!("received Ctrl+C, shutting down");
                    Ok(())
                }
            }
        });

        if let Err(err) = &command_result {
            error!(%err, "command exited with an error");
        }

        manager.graceful_shutdown();
        command_result
    }
}
