//! Engine → core notification channel.
//!
//! The engine announces new estimates by id only; the full record is pulled
//! by [`UpdateIngestion`] when the notification is handled.  Notifications
//! travel over a [`tokio::sync::broadcast`] channel so several listeners (the
//! ingestion task, a CLI monitor, tests) can observe the same stream.
//!
//! | Notification | Listener reaction |
//! |---|---|
//! | [`EngineNotification::DeviceUpdated`] | `on_device_updated(id)` |
//! | [`EngineNotification::AuthenticationFailed`] | logged at `error` |
//! | lag (buffer overrun) | `refresh_all()` |
//! | channel closed | task exits |

use std::sync::Arc;

use motion_registry::UpdateIngestion;
use motion_types::{DeviceId, MotionError};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Notifications buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CAPACITY: usize = 256;

/// A push notification from the sensing engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineNotification {
    /// A new estimate for this device is ready to be pulled.
    DeviceUpdated(DeviceId),
    /// The engine rejected its credentials; no further updates will arrive.
    AuthenticationFailed(String),
}

/// Shared notification bus.  Clones share the same channel.
#[derive(Clone, Debug)]
pub struct NotificationBus {
    sender: broadcast::Sender<EngineNotification>,
}

impl NotificationBus {
    /// Panics if `capacity` is zero, as [`broadcast::channel`] does.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notification.
    ///
    /// Returns the number of listeners handed the notification, or
    /// [`MotionError::Channel`] when nobody is listening.
    pub fn publish(&self, notification: EngineNotification) -> Result<usize, MotionError> {
        self.sender
            .send(notification)
            .map_err(|e| MotionError::Channel(format!("notification bus send error: {e}")))
    }

    /// Shorthand for publishing [`EngineNotification::DeviceUpdated`].
    pub fn device_updated(&self, id: impl Into<DeviceId>) -> Result<usize, MotionError> {
        self.publish(EngineNotification::DeviceUpdated(id.into()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineNotification> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Spawn a task that feeds `bus` into `ingestion` until the bus closes.
///
/// The subscription is taken before this function returns, so notifications
/// published right after the call are not missed.  Must be called from within
/// a Tokio runtime.
pub fn spawn_ingestion_listener(
    bus: &NotificationBus,
    ingestion: Arc<UpdateIngestion>,
) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        info!("ingestion listener started");
        loop {
            match rx.recv().await {
                Ok(EngineNotification::DeviceUpdated(id)) => {
                    ingestion.on_device_updated(&id);
                }
                Ok(EngineNotification::AuthenticationFailed(reason)) => {
                    error!(reason = %reason, "engine authentication failed");
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(lagged_by = n, "ingestion listener lagged; refreshing known devices");
                    let refreshed = ingestion.refresh_all();
                    debug!(refreshed, "refresh after lag complete");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        info!("notification bus closed; ingestion listener stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_listeners_is_channel_error() {
        let bus = NotificationBus::default();
        assert!(matches!(
            bus.device_updated("dev1"),
            Err(MotionError::Channel(_))
        ));
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_notification() -> Result<(), Box<dyn std::error::Error>> {
        let bus = NotificationBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.listener_count(), 2);

        assert_eq!(bus.device_updated("dev1")?, 2);
        let expected = EngineNotification::DeviceUpdated("dev1".into());
        assert_eq!(rx1.recv().await?, expected);
        assert_eq!(rx2.recv().await?, expected);
        Ok(())
    }

    #[tokio::test]
    async fn slow_subscriber_observes_lag() {
        let bus = NotificationBus::new(4);
        let mut slow = bus.subscribe();
        for i in 0..32 {
            let _ = bus.device_updated(format!("dev{i}"));
        }
        assert!(matches!(
            slow.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }
}
