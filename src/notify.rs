//! Per-customer order status topics.
//!
//! Publishing is fire-and-forget: events sent while the customer has no open
//! socket are dropped.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

const TOPIC_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderEvent {
    pub order_id: Uuid,
    pub invoice_number: String,
    pub previous_status: String,
    pub status: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationHub {
    topics: Arc<RwLock<HashMap<Uuid, broadcast::Sender<OrderEvent>>>>,
}

impl NotificationHub {
    pub fn subscribe(&self, customer_id: Uuid) -> broadcast::Receiver<OrderEvent> {
        let mut topics = self.topics.write().unwrap_or_else(|p| p.into_inner());
        topics
            .entry(customer_id)
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    /// Returns how many subscribers received the event.
    pub fn publish(&self, customer_id: Uuid, event: OrderEvent) -> usize {
        let mut topics = self.topics.write().unwrap_or_else(|p| p.into_inner());
        let Some(sender) = topics.get(&customer_id) else {
            return 0;
        };
        match sender.send(event) {
            Ok(delivered) => delivered,
            Err(_) => {
                // every receiver is gone
                topics.remove(&customer_id);
                0
            }
        }
    }

    /// Drops the customer's topic once nobody is listening to it.
    pub fn release(&self, customer_id: Uuid) {
        let mut topics = self.topics.write().unwrap_or_else(|p| p.into_inner());
        if topics
            .get(&customer_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            topics.remove(&customer_id);
        }
    }

    pub fn topic_count(&self) -> usize {
        self.topics.read().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(status: &str) -> OrderEvent {
        OrderEvent {
            order_id: Uuid::new_v4(),
            invoice_number: "INV-1".into(),
            previous_status: "pending".into(),
            status: status.into(),
            at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn delivers_only_to_the_customer_topic() {
        let hub = NotificationHub::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut alice_rx = hub.subscribe(alice);
        let mut bob_rx = hub.subscribe(bob);

        assert_eq!(hub.publish(alice, event("shipping")), 1);
        assert_eq!(alice_rx.recv().await.map(|e| e.status).ok(), Some("shipping".into()));
        assert!(bob_rx.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_dropped() {
        let hub = NotificationHub::default();
        let customer = Uuid::new_v4();
        assert_eq!(hub.publish(customer, event("shipping")), 0);

        drop(hub.subscribe(customer));
        assert_eq!(hub.topic_count(), 1);
        assert_eq!(hub.publish(customer, event("completed")), 0);
        assert_eq!(hub.topic_count(), 0);
    }

    #[test]
    fn release_drops_topics_without_listeners() {
        let hub = NotificationHub::default();
        let customer = Uuid::new_v4();

        let first = hub.subscribe(customer);
        let second = hub.subscribe(customer);
        drop(first);
        hub.release(customer);
        assert_eq!(hub.topic_count(), 1);

        drop(second);
        hub.release(customer);
        assert_eq!(hub.topic_count(), 0);
    }
}
