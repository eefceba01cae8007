//! In-process message bus
//!
//! A thin wrapper over a tokio broadcast channel. Mutation handlers
//! publish [`BusMessage`]s through [`ServerState::broadcast_sync`]; each
//! WebSocket session holds its own receiver. Lagging subscribers drop
//! the oldest messages rather than block publishers.
//!
//! [`ServerState::broadcast_sync`]: crate::core::ServerState::broadcast_sync

use shared::message::BusMessage;
use tokio::sync::broadcast;

#[derive(Clone, Debug)]
pub struct MessageBusService {
    tx: broadcast::Sender<BusMessage>,
}

impl MessageBusService {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a message to every current subscriber.
    ///
    /// A send error only means no subscriber is connected; that is a
    /// normal state, not a failure.
    pub fn publish(&self, msg: BusMessage) {
        if let Err(e) = self.tx.send(msg) {
            tracing::trace!("No sync subscribers connected: {e}");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    /// Number of currently connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::SyncPayload;

    #[tokio::test]
    async fn subscribers_receive_published_messages() {
        let bus = MessageBusService::new(8);
        let mut rx = bus.subscribe();

        let payload = SyncPayload {
            resource: "pedidos".into(),
            version: 1,
            action: "created".into(),
            id: "42".into(),
            data: None,
        };
        bus.publish(BusMessage::sync(&payload).unwrap());

        let msg = rx.recv().await.unwrap();
        let decoded: SyncPayload = serde_json::from_slice(&msg.payload).unwrap();
        assert_eq!(decoded.resource, "pedidos");
        assert_eq!(decoded.version, 1);
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = MessageBusService::new(8);
        assert_eq!(bus.subscriber_count(), 0);
        let note = shared::message::NotificationPayload::info("Cierre", "Fin de jornada");
        bus.publish(BusMessage::notification(&note).unwrap());
    }
}
