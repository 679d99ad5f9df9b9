//! Graceful shutdown controller for the estate daemon.
//!
//! Listens for SIGINT/SIGTERM and flips a `tokio::sync::watch` flag that every
//! task can await.

use tokio::signal;
use tokio::sync::watch;

/// Coordinates graceful shutdown across the daemon's tasks.
///
/// Tasks call [`ShutdownController::subscribe`] and `select!` on
/// [`wait_for_shutdown`] alongside their main loop. A receiver created after
/// shutdown was triggered still observes it.
pub struct ShutdownController {
    tx: watch::Sender<bool>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Trigger shutdown programmatically.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait for SIGTERM or SIGINT, then trigger shutdown.
    pub async fn wait_for_signal(&self) -> std::io::Result<()> {
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        #[cfg(unix)]
        let terminate = sigterm.recv();

        #[cfg(not(unix))]
        let terminate = std::future::pending::<Option<()>>();

        tokio::select! {
            result = ctrl_c => {
                result?;
                tracing::info!("received SIGINT, shutting down");
            }
            _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
        }

        self.shutdown();
        Ok(())
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once `rx` observes shutdown, or its controller is gone.
pub async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    // An Err means the sender was dropped, which also ends the task.
    let _ = rx.wait_for(|stopped| *stopped).await;
}
