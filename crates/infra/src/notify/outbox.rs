use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use super::{Notification, Notifier};

/// Sending side of the notification queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NotificationOutbox {
    tx: mpsc::UnboundedSender<Notification>,
}

/// Handle to join the background delivery task.
#[derive(Debug)]
pub struct OutboxHandle {
    join: JoinHandle<()>,
}

impl OutboxHandle {
    /// Wait until the queue is drained. The task stops once every
    /// [`NotificationOutbox`] clone has been dropped.
    pub async fn join(self) {
        if let Err(err) = self.join.await {
            warn!(error = %err, "notification worker ended abnormally");
        }
    }
}

impl NotificationOutbox {
    /// Spawn the delivery task on the current tokio runtime.
    ///
    /// Every queued notification is sent to `mailbox`; failures are logged
    /// and dropped.
    pub fn spawn(notifier: Arc<dyn Notifier>, mailbox: impl Into<String>) -> (Self, OutboxHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let join = tokio::spawn(deliver(rx, notifier, mailbox.into()));
        (Self { tx }, OutboxHandle { join })
    }

    /// Queue a notification without waiting for delivery.
    pub fn enqueue(&self, notification: Notification) {
        if let Err(err) = self.tx.send(notification) {
            warn!(kind = err.0.kind(), "notification worker is gone; dropping notification");
        }
    }
}

async fn deliver(
    mut rx: mpsc::UnboundedReceiver<Notification>,
    notifier: Arc<dyn Notifier>,
    mailbox: String,
) {
    while let Some(notification) = rx.recv().await {
        match notifier.send(&mailbox, &notification).await {
            Ok(()) => tracing::debug!(kind = notification.kind(), "notification delivered"),
            Err(err) => warn!(kind = notification.kind(), error = %err, "notification delivery failed"),
        }
    }
}
