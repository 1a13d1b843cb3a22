//! Typed publish/subscribe bus used by the protocol engines to announce the lifecycle
//! transitions of their exchange records.
//!
//! A subscriber registers a topic predicate and an [`EventHandler`]. Each subscription
//! drains its own queue sequentially, so a handler observes the successive states of a
//! record in the order they were published, while different subscriptions run
//! independently from each other.
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rst_common::standard::async_trait::async_trait;
use rst_common::standard::serde::de::DeserializeOwned;
use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json::{self, Value};
use rst_common::with_logging::log::{debug, warn};
use rst_common::with_tokio::tokio;
use rst_common::with_tokio::tokio::sync::mpsc;
use rst_common::with_tokio::tokio::task::JoinHandle;

use super::types::HolderError;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// `Event` is a single lifecycle notification published by a protocol engine
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct Event {
    pub topic: String,
    pub payload: Value,
}

impl Event {
    pub fn new(topic: String, payload: Value) -> Self {
        Self { topic, payload }
    }
}

/// `WebhookRecord` keeps the topic predicate and the payload decoding next to the
/// record type that is published on the topic
pub trait WebhookRecord: Serialize + DeserializeOwned {
    const WEBHOOK_TOPIC: &'static str;

    /// `topic_state` is the suffix appended to the webhook topic when publishing
    fn topic_state(&self) -> String;

    fn matches_topic(topic: &str) -> bool {
        topic.starts_with(Self::WEBHOOK_TOPIC)
    }

    fn from_event(event: &Event) -> Result<Self, HolderError> {
        serde_json::from_value(event.payload.to_owned())
            .map_err(|err| HolderError::JSONError(err.to_string()))
    }

    fn to_event(&self) -> Result<Event, HolderError> {
        let payload =
            serde_json::to_value(self).map_err(|err| HolderError::JSONError(err.to_string()))?;

        Ok(Event::new(
            format!("{}::{}", Self::WEBHOOK_TOPIC, self.topic_state()),
            payload,
        ))
    }
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: Event);
}

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

struct Subscriber {
    id: u64,
    predicate: Predicate,
    sender: mpsc::UnboundedSender<Event>,
    backlog: Arc<AtomicUsize>,
}

type Subscribers = Arc<RwLock<Vec<Subscriber>>>;

/// `Subscription` owns the task draining a subscriber queue. Dropping it stops
/// the subscriber and removes it from the bus
pub struct Subscription {
    id: u64,
    handle: JoinHandle<()>,
    subscribers: Subscribers,
}

impl Subscription {
    pub fn cancel(&self) {
        self.handle.abort();
        write_subscribers(&self.subscribers).retain(|subscriber| subscriber.id != self.id);
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn read_subscribers(subscribers: &Subscribers) -> RwLockReadGuard<'_, Vec<Subscriber>> {
    subscribers
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_subscribers(subscribers: &Subscribers) -> RwLockWriteGuard<'_, Vec<Subscriber>> {
    subscribers
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// `EventBus` fans events out to one unbounded queue per subscriber
///
/// A slow handler never loses events, its queue simply grows. `capacity` is the
/// backlog above which the bus warns about a subscriber falling behind.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Subscribers,
    next_id: Arc<AtomicU64>,
    capacity: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn subscriber_count(&self) -> usize {
        read_subscribers(&self.subscribers).len()
    }

    /// `subscribe` MUST be called from inside a tokio runtime
    ///
    /// The subscriber is registered before returning, so any event published after
    /// this call is delivered to the handler
    pub fn subscribe<F>(&self, predicate: F, handler: Arc<dyn EventHandler>) -> Subscription
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, mut receiver) = mpsc::unbounded_channel::<Event>();
        let backlog = Arc::new(AtomicUsize::new(0));

        write_subscribers(&self.subscribers).push(Subscriber {
            id,
            predicate: Box::new(predicate),
            sender,
            backlog: backlog.clone(),
        });

        let handle = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                backlog.fetch_sub(1, Ordering::Relaxed);
                handler.handle(event).await;
            }
        });

        Subscription {
            id,
            handle,
            subscribers: self.subscribers.clone(),
        }
    }

    pub fn subscribe_record<R>(&self, handler: Arc<dyn EventHandler>) -> Subscription
    where
        R: WebhookRecord + 'static,
    {
        self.subscribe(|topic: &str| R::matches_topic(topic), handler)
    }

    /// `publish` returns the number of subscribers the event was queued for
    pub fn publish(&self, event: Event) -> usize {
        let mut queued = 0;
        let mut closed = Vec::new();

        for subscriber in read_subscribers(&self.subscribers).iter() {
            if !(subscriber.predicate)(&event.topic) {
                continue;
            }

            let backlog = subscriber.backlog.fetch_add(1, Ordering::Relaxed) + 1;
            if subscriber.sender.send(event.clone()).is_err() {
                subscriber.backlog.fetch_sub(1, Ordering::Relaxed);
                closed.push(subscriber.id);
                continue;
            }

            queued += 1;
            if backlog == self.capacity + 1 {
                warn!(
                    "event subscriber {} is falling behind, {} events queued",
                    subscriber.id, backlog
                );
            }
        }

        if !closed.is_empty() {
            write_subscribers(&self.subscribers)
                .retain(|subscriber| !closed.contains(&subscriber.id));
        }

        if queued == 0 {
            debug!("event dropped, no subscribers: {}", event.topic);
        } else {
            debug!("event published: {}, receivers: {}", event.topic, queued);
        }

        queued
    }

    pub fn publish_record<R: WebhookRecord>(&self, record: &R) -> Result<usize, HolderError> {
        let event = record.to_event()?;
        Ok(self.publish(event))
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
