//! Notification channel from the execution loops to the observer.
//!
//! Many senders, one receiver. Sends are accepted in FIFO order and never
//! dropped; a sender waits while the buffer is full.

use stabring_core::UnitId;
use thiserror::Error;
use tokio::sync::mpsc;

/// The observer has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("notification channel closed")]
pub struct ChannelClosed;

/// Create a channel buffering up to `capacity` notifications.
///
/// `capacity` must be at least 1.
pub fn notification_channel(capacity: usize) -> (Notifier, Notifications) {
    let (tx, rx) = mpsc::channel(capacity);
    (Notifier { tx }, Notifications { rx })
}

/// Sending half, one clone per execution loop.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::Sender<UnitId>,
}

impl Notifier {
    /// Announce that `id` just moved, waiting for buffer space if needed.
    pub async fn notify(&self, id: UnitId) -> Result<(), ChannelClosed> {
        self.tx.send(id).await.map_err(|_| ChannelClosed)
    }

    /// Whether the receiving half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half, owned by the observer.
#[derive(Debug)]
pub struct Notifications {
    rx: mpsc::Receiver<UnitId>,
}

impl Notifications {
    /// Wait for the next notification.
    ///
    /// Returns `None` once every sender is gone and the buffer is drained.
    pub async fn next(&mut self) -> Option<UnitId> {
        self.rx.recv().await
    }

    /// Stop accepting sends; buffered notifications can still be read.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
