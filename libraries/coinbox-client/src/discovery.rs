//! Periodic device discovery
//!
//! Probes `/ping` on an interval from a background task and publishes one
//! result per probe over a watch channel. The poller is cancellable:
//! dropping it (or calling `cancel`) aborts the task. No pipeline code
//! depends on this; it exists for callers that wait for the device to
//! appear on the network.

use crate::client::DeviceClient;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Cancellable periodic `/ping` poller
///
/// # Example
///
/// ```ignore
/// use coinbox_client::{DeviceClient, DiscoveryPoller};
/// use std::time::Duration;
///
/// let client = DeviceClient::new("192.168.0.31")?;
/// let mut poller = DiscoveryPoller::spawn(client, Duration::from_millis(500));
/// poller.wait_until_found().await;
/// ```
pub struct DiscoveryPoller {
    handle: JoinHandle<()>,
    rx: watch::Receiver<Option<bool>>,
}

impl DiscoveryPoller {
    /// Start probing `client` every `interval`.
    pub fn spawn(client: DeviceClient, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(None);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let found = client.ping().await;
                debug!(found, "discovery probe");
                if tx.send(Some(found)).is_err() {
                    break;
                }
            }
        });

        Self { handle, rx }
    }

    /// Latest probe result, if any probe has completed yet.
    pub fn latest(&self) -> Option<bool> {
        *self.rx.borrow()
    }

    /// Wait until a probe reports the device as reachable.
    pub async fn wait_until_found(&mut self) {
        loop {
            if matches!(*self.rx.borrow_and_update(), Some(true)) {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Stop probing.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for DiscoveryPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
