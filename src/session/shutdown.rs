use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Session life cycle; once stopping, never running again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Stopping,
}

#[derive(Debug, Default)]
struct Inner {
    stop: AtomicBool,
    wake: Notify,
}

/// Cooperative stop request shared between the signal handler and the loop
///
/// Setting the flag never interrupts a verse; the loop checks it between
/// verses and cuts the inter-verse pause short.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<Inner>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.inner.stop.store(true, Ordering::SeqCst);
        self.inner.wake.notify_one();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.inner.stop.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SessionState {
        if self.is_stop_requested() {
            SessionState::Stopping
        } else {
            SessionState::Running
        }
    }

    /// Sleep for `duration` unless a stop arrives first.
    ///
    /// Returns `true` when the wait ended because of a stop request.
    pub async fn pause(&self, duration: Duration) -> bool {
        if self.is_stop_requested() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => self.is_stop_requested(),
            _ = self.inner.wake.notified() => true,
        }
    }

    /// Turn the first Ctrl-C into a stop request
    pub fn listen_for_ctrl_c(&self) -> JoinHandle<()> {
        let token = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Gracefully stopping... Please wait for current video to complete.");
                    token.request_stop();
                }
                Err(e) => warn!("Could not listen for Ctrl-C: {}", e),
            }
        })
    }
}
