//! Cooperative shutdown coordination.

use crate::error::{BankError, Result};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Shared shutdown flag.
///
/// Triggering sets the flag and wakes every task waiting on `cancelled()`,
/// including workers blocked in `TransactionQueue::dequeue`. Clones observe
/// the same flag.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Calling it more than once has no further effect.
    pub fn trigger(&self) {
        if !self.token.is_cancelled() {
            tracing::info!("Shutdown requested");
        }
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once shutdown has been triggered.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Interrupt handlers, registered before any worker is started.
pub struct InterruptListener {
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl InterruptListener {
    /// Installs the SIGINT and SIGTERM handlers.
    ///
    /// Failing to install them is fatal: the bank must not run without a way
    /// to shut it down cleanly.
    #[cfg(unix)]
    pub fn install() -> Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        let sigint = signal(SignalKind::interrupt()).map_err(BankError::Signal)?;
        let sigterm = signal(SignalKind::terminate()).map_err(BankError::Signal)?;
        Ok(Self { sigint, sigterm })
    }

    /// Installs the Ctrl+C handler.
    #[cfg(windows)]
    pub fn install() -> Result<Self> {
        let ctrl_c = tokio::signal::windows::ctrl_c().map_err(BankError::Signal)?;
        Ok(Self { ctrl_c })
    }

    /// Waits for the next interrupt.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> Result<()> {
        tokio::select! {
            _ = self.sigint.recv() => {
                tracing::info!("Received SIGINT, initiating shutdown...");
            }
            _ = self.sigterm.recv() => {
                tracing::info!("Received SIGTERM, initiating shutdown...");
            }
        }
        Ok(())
    }

    #[cfg(windows)]
    pub async fn recv(&mut self) -> Result<()> {
        if self.ctrl_c.recv().await.is_none() {
            return Err(BankError::Signal(std::io::Error::other(
                "Ctrl+C listener closed",
            )));
        }
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        Ok(())
    }

    /// Triggers `shutdown` on the first interrupt. The task ends on its own
    /// once shutdown is triggered by anything else.
    pub fn spawn(mut self, shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tokio::select! {
                received = self.recv() => {
                    if let Err(e) = received {
                        tracing::error!(error = %e, "Interrupt handler failed");
                    }
                    shutdown.trigger();
                }
                _ = shutdown.cancelled() => {}
            }
        })
    }
}
