//! Ctrl+C handling for the menu and during a recording

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

/// Clears a running flag when Ctrl+C is pressed
pub struct CancelSignal {
    running: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
}

impl CancelSignal {
    /// Watch Ctrl+C on behalf of `running`
    pub fn new(running: Arc<AtomicBool>) -> Self {
        Self {
            running,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if Ctrl+C was received
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Spawn the listener. Abort the returned handle once recording ends.
    pub fn setup(&self) -> JoinHandle<()> {
        let running = Arc::clone(&self.running);
        let cancelled = Arc::clone(&self.cancelled);

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received, stopping countdown");
                cancelled.store(true, Ordering::SeqCst);
                running.store(false, Ordering::SeqCst);
            }
        })
    }
}

/// Resolve on the first Ctrl+C received while `busy` is clear.
///
/// Interrupts during a recording belong to [`CancelSignal`] and are skipped.
pub async fn idle_interrupt(busy: Arc<AtomicBool>) {
    loop {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal support: never resolve
            std::future::pending::<()>().await;
        }
        if !busy.load(Ordering::SeqCst) {
            return;
        }
        debug!("interrupt during recording left to the cancel handler");
    }
}
