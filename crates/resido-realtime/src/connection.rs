use common::domain::Notification;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Envelope pushed to a live client connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RealtimeEvent {
    Notification { notification: Notification },
}

impl RealtimeEvent {
    pub fn notification(notification: Notification) -> Self {
        Self::Notification { notification }
    }
}

/// Sending half of a live connection.
///
/// The transport layer owns the receiving half and drains it onto the
/// wire. The handle is cheap to clone; dropping the receiver makes every
/// subsequent send fail, which the dispatcher treats as a disconnect.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    sender: mpsc::UnboundedSender<RealtimeEvent>,
}

impl ConnectionHandle {
    /// Push an event to the connection; `Err` means the peer is gone
    pub fn send(&self, event: RealtimeEvent) -> Result<(), RealtimeEvent> {
        self.sender.send(event).map_err(|err| err.0)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Create a connected handle/receiver pair. The transport keeps the
/// receiver; the handle goes into the registry.
pub fn connection_channel() -> (ConnectionHandle, mpsc::UnboundedReceiver<RealtimeEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ConnectionHandle { sender }, receiver)
}
