//! Signal handling for cooperative shutdown.
//!
//! The first SIGTERM or SIGINT cancels the root token shared by every
//! generator; the process then drives `Runtime::stop` with a bounded
//! deadline.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Shutdown signal types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGTERM signal received
    Sigterm,
    /// SIGINT signal received (Ctrl+C)
    Sigint,
}

impl std::fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sigterm => write!(f, "SIGTERM"),
            Self::Sigint => write!(f, "SIGINT"),
        }
    }
}

/// Install OS signal handlers that cancel `root` on SIGTERM/SIGINT.
pub fn install_signal_handlers(root: CancellationToken) -> JoinHandle<()> {
    info!("Installing OS signal handlers");

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    error!(error = %e, "Failed to install SIGTERM handler");
                    return;
                }
            };
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(s) => s,
                Err(e) => {
                    error!(error = %e, "Failed to install SIGINT handler");
                    return;
                }
            };

            let received = tokio::select! {
                _ = sigterm.recv() => ShutdownSignal::Sigterm,
                _ = sigint.recv() => ShutdownSignal::Sigint,
            };
            info!(signal = %received, "Received shutdown signal");
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
                return;
            }
            info!(signal = %ShutdownSignal::Sigint, "Received shutdown signal");
        }

        root.cancel();
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_signal_display() {
        assert_eq!(format!("{}", ShutdownSignal::Sigterm), "SIGTERM");
        assert_eq!(format!("{}", ShutdownSignal::Sigint), "SIGINT");
    }
}
