//! Topic-addressed publish/subscribe fabric for the Hearth kernel.
//!
//! Publishers never wait on subscribers: `publish` stamps the event
//! with the next process-wide sequence number, copies it into each
//! matching subscriber's bounded queue, and returns. Every subscriber
//! owns a worker task that drains its queue and runs the handler, so a
//! stalled handler only backs up its own queue. When a queue is full
//! the oldest undelivered event for that subscriber is dropped and a
//! counter increments; nobody else is affected.
//!
//! Ordering: any single subscriber sees its matching events in
//! publication order. No ordering is guaranteed across subscribers.

mod pattern;
mod ticks;

pub use pattern::TopicPattern;
pub use ticks::{
    TickGenerator, TickHandle, CLOCK_SOURCE, TICK_DAILY, TICK_HOURLY, TICK_MINUTELY,
};

use hearth_types::{Event, SubscriptionId};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

/// Default per-subscriber queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type EventHandler = Arc<dyn Fn(Event) -> BoxFuture + Send + Sync>;

struct SubscriberQueue {
    events: Mutex<VecDeque<Event>>,
    capacity: usize,
    notify: Notify,
    dropped: AtomicU64,
    closed: AtomicBool,
}

impl SubscriberQueue {
    fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
            notify: Notify::new(),
            dropped: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Enqueues with drop-oldest overflow.
    fn push(&self, event: Event) -> bool {
        let mut events = lock(&self.events);
        let mut overflowed = false;
        if events.len() >= self.capacity {
            events.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
            overflowed = true;
        }
        events.push_back(event);
        drop(events);
        self.notify.notify_one();
        overflowed
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_one();
    }
}

struct Subscriber {
    pattern: TopicPattern,
    queue: Arc<SubscriberQueue>,
}

struct BusInner {
    next_sequence: u64,
    subscribers: HashMap<SubscriptionId, Subscriber>,
}

/// The event bus. Cheap to share behind an `Arc`.
///
/// Subscribing spawns a worker task, so subscriptions must be created
/// inside a tokio runtime; publishing works from any thread.
pub struct EventBus {
    inner: Mutex<BusInner>,
}

impl EventBus {
    /// Creates an empty bus with sequence numbering starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BusInner {
                next_sequence: 0,
                subscribers: HashMap::new(),
            }),
        }
    }

    /// Publishes an event, returning its sequence number.
    ///
    /// Sequence assignment and fan-out happen under one short-lived
    /// lock, which is what makes per-subscriber delivery order equal
    /// publication order. Handler execution is never awaited here.
    pub fn publish(&self, topic: &str, source: &str, payload: Value) -> u64 {
        let mut inner = lock(&self.inner);
        inner.next_sequence += 1;
        let sequence = inner.next_sequence;
        let event = Event::new(topic, source, payload, sequence);

        for (id, sub) in &inner.subscribers {
            if sub.pattern.matches(topic) && sub.queue.push(event.clone()) {
                warn!(
                    subscription = %id,
                    topic,
                    dropped = sub.queue.dropped.load(Ordering::Relaxed),
                    "Subscriber queue full, dropped oldest event"
                );
            }
        }
        sequence
    }

    /// Subscribes with the default queue capacity.
    pub fn subscribe<F, Fut>(&self, pattern: impl Into<TopicPattern>, handler: F) -> SubscriptionId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.subscribe_with_capacity(pattern, DEFAULT_QUEUE_CAPACITY, handler)
    }

    /// Subscribes with an explicit queue capacity and spawns the
    /// delivery worker for the new subscription.
    pub fn subscribe_with_capacity<F, Fut>(
        &self,
        pattern: impl Into<TopicPattern>,
        capacity: usize,
        handler: F,
    ) -> SubscriptionId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let pattern = pattern.into();
        let id = SubscriptionId::new();
        let queue = Arc::new(SubscriberQueue::new(capacity.max(1)));
        let handler: EventHandler = Arc::new(move |event| Box::pin(handler(event)));

        tokio::spawn(deliver(Arc::clone(&queue), handler));

        info!(subscription = %id, pattern = %pattern, "New subscription");
        lock(&self.inner)
            .subscribers
            .insert(id, Subscriber { pattern, queue });
        id
    }

    /// Removes a subscription and stops its worker. Idempotent.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let removed = lock(&self.inner).subscribers.remove(&id);
        match removed {
            Some(sub) => {
                sub.queue.close();
                debug!(subscription = %id, "Unsubscribed");
            }
            None => debug!(subscription = %id, "Unsubscribe for unknown subscription ignored"),
        }
    }

    /// Events dropped so far for a subscription due to queue overflow.
    /// `None` if the subscription does not exist.
    pub fn dropped_events(&self, id: SubscriptionId) -> Option<u64> {
        lock(&self.inner)
            .subscribers
            .get(&id)
            .map(|s| s.queue.dropped.load(Ordering::Relaxed))
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-subscriber delivery loop: drain the queue in order, run the
/// handler to completion for each event, exit once closed and empty.
async fn deliver(queue: Arc<SubscriberQueue>, handler: EventHandler) {
    loop {
        // Register for wakeup before checking the queue, otherwise a
        // push between check and await could be lost.
        let notified = queue.notify.notified();

        let next = lock(&queue.events).pop_front();
        match next {
            Some(event) => {
                handler(event).await;
            }
            None if queue.closed.load(Ordering::Acquire) => return,
            None => notified.await,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
