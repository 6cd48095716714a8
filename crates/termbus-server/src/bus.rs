//! Subscription registry and broadcaster.
//!
//! [`UpdateBus`] maps each client ID to exactly one [`UpdateChannel`] and fans
//! updates out to every subscription whose scope matches. One exclusive lock
//! covers both structural changes (register/unregister) and the whole fan-out
//! pass, so a given client sees updates in the order broadcasts took the lock.
//!
//! ## Backpressure
//!
//! What happens when a subscriber stops draining its channel depends on the
//! [`DeliveryPolicy`] the bus was built with:
//!
//! - [`DeliveryPolicy::Blocking`] waits on the full channel while still holding
//!   the lock. Every other client, and every later register, unregister and
//!   broadcast, stalls until that subscriber reads or drops its receiver.
//!   Only use it when all connection layers are trusted to keep draining.
//! - [`DeliveryPolicy::DropNewest`] never waits. The update is discarded for the
//!   full subscriber, the loss is counted, and a subscriber that keeps falling
//!   behind is evicted.
//!
//! Under either policy a subscriber whose receiver has been dropped is evicted
//! on the next broadcast that matches it.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use termbus_core::Update;
use termbus_settings::{BusSettings, DeliveryMode};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::metrics::{
    BUS_BROADCAST_DROPS_TOTAL, BUS_BROADCAST_DURATION_SECONDS, BUS_BROADCASTS_TOTAL,
    BUS_DELIVERIES_TOTAL, BUS_EVICTIONS_TOTAL, BUS_REGISTRATIONS_TOTAL,
    BUS_SUBSCRIPTIONS_ACTIVE, BUS_SUPERSEDED_TOTAL, BUS_UNREGISTRATIONS_TOTAL,
};
use crate::subscription::{Delivery, UpdateChannel, UpdateReceiver};

/// Default per-subscriber channel buffer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Default lifetime drops before a slow subscriber is evicted.
pub const DEFAULT_MAX_TOTAL_DROPS: u64 = 100;

/// Behavior when a matched subscriber's channel is full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Wait for buffer space while holding the registry lock.
    Blocking,
    /// Discard the update for that subscriber; evict after `max_total_drops`.
    DropNewest {
        /// Lifetime drops at which the subscriber is evicted.
        max_total_drops: u64,
    },
}

impl DeliveryPolicy {
    fn evicts_after(self, total_drops: u64) -> bool {
        match self {
            Self::Blocking => false,
            Self::DropNewest { max_total_drops } => total_drops >= max_total_drops,
        }
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self::DropNewest {
            max_total_drops: DEFAULT_MAX_TOTAL_DROPS,
        }
    }
}

/// The update bus: subscription registry plus broadcaster.
///
/// Build one at startup and share it as `Arc<UpdateBus>` with the connection
/// layer and every producer.
#[derive(Debug)]
pub struct UpdateBus {
    channels: Mutex<HashMap<String, UpdateChannel>>,
    /// Mirrors `channels.len()` so counts don't need the lock.
    active_count: AtomicUsize,
    policy: DeliveryPolicy,
    channel_capacity: usize,
}

impl UpdateBus {
    /// A bus with the default drop policy and channel capacity.
    pub fn new() -> Self {
        Self::with_policy(DeliveryPolicy::default(), DEFAULT_CHANNEL_CAPACITY)
    }

    /// A bus with an explicit policy. `channel_capacity` is raised to at least 1.
    pub fn with_policy(policy: DeliveryPolicy, channel_capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            active_count: AtomicUsize::new(0),
            policy,
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// A bus configured from settings.
    pub fn from_settings(settings: &BusSettings) -> Self {
        let policy = match settings.delivery {
            DeliveryMode::Blocking => DeliveryPolicy::Blocking,
            DeliveryMode::DropNewest => DeliveryPolicy::DropNewest {
                max_total_drops: settings.max_total_drops.max(1),
            },
        };
        Self::with_policy(policy, settings.channel_capacity)
    }

    /// Policy this bus was built with.
    pub fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    /// Per-subscriber channel buffer.
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Subscribe `client_id` to updates for `session_id` (empty for global only).
    ///
    /// Always hands out a new channel. An existing subscription for the same
    /// client is closed first, so its reader sees the end of its stream.
    pub async fn register(&self, client_id: &str, session_id: &str) -> UpdateReceiver {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let mut channels = self.channels.lock().await;
        if let Some(old) = channels.remove(client_id) {
            debug!(
                client_id,
                old_session = old.session_id(),
                session_id,
                "superseding subscription"
            );
            drop(old);
            counter!(BUS_SUPERSEDED_TOTAL).increment(1);
        } else {
            let _ = self.active_count.fetch_add(1, Ordering::Relaxed);
            debug!(client_id, session_id, "registered subscription");
        }
        let _ = channels.insert(
            client_id.to_string(),
            UpdateChannel::new(client_id, session_id, tx),
        );
        counter!(BUS_REGISTRATIONS_TOTAL).increment(1);
        gauge!(BUS_SUBSCRIPTIONS_ACTIVE).set(channels.len() as f64);
        rx
    }

    /// Remove `client_id`'s subscription and close its channel. Unknown IDs are ignored.
    pub async fn unregister(&self, client_id: &str) {
        let mut channels = self.channels.lock().await;
        if let Some(channel) = channels.remove(client_id) {
            let _ = self.active_count.fetch_sub(1, Ordering::Relaxed);
            debug!(
                client_id,
                session_id = channel.session_id(),
                drops = channel.drop_count(),
                "unregistered subscription"
            );
            counter!(BUS_UNREGISTRATIONS_TOTAL).increment(1);
            gauge!(BUS_SUBSCRIPTIONS_ACTIVE).set(channels.len() as f64);
        }
    }

    /// Deliver `update` to every subscription matching `session_id`.
    ///
    /// An empty `session_id` reaches every subscriber. Returns how many
    /// subscribers the update was placed in front of; drops and evictions are
    /// not counted.
    pub async fn broadcast(&self, session_id: &str, update: impl Into<Update>) -> usize {
        let update = Arc::new(update.into());
        let update_type = update.update_type();
        counter!(BUS_BROADCASTS_TOTAL, "update_type" => update_type).increment(1);

        let mut channels = self.channels.lock().await;
        let started = Instant::now();
        let mut delivered = 0usize;
        let mut evict: Vec<(String, &'static str)> = Vec::new();

        for channel in channels.values_mut() {
            if !channel.matches(session_id) {
                continue;
            }
            let outcome = match self.policy {
                DeliveryPolicy::Blocking => channel.deliver(&update).await,
                DeliveryPolicy::DropNewest { .. } => channel.try_deliver(&update),
            };
            match outcome {
                Delivery::Delivered => delivered += 1,
                Delivery::Dropped { total_drops } => {
                    counter!(BUS_BROADCAST_DROPS_TOTAL).increment(1);
                    if self.policy.evicts_after(total_drops) {
                        warn!(
                            client_id = channel.client_id(),
                            session_id, total_drops, "disconnecting slow subscriber"
                        );
                        evict.push((channel.client_id().to_string(), "slow"));
                    } else {
                        warn!(
                            client_id = channel.client_id(),
                            session_id,
                            total_drops,
                            "failed to send update to subscriber (channel full)"
                        );
                    }
                }
                Delivery::Closed => {
                    debug!(
                        client_id = channel.client_id(),
                        "subscriber receiver dropped, removing"
                    );
                    evict.push((channel.client_id().to_string(), "closed"));
                }
            }
        }

        for (client_id, reason) in &evict {
            if channels.remove(client_id).is_some() {
                let _ = self.active_count.fetch_sub(1, Ordering::Relaxed);
                counter!(BUS_EVICTIONS_TOTAL, "reason" => *reason).increment(1);
            }
        }
        if !evict.is_empty() {
            gauge!(BUS_SUBSCRIPTIONS_ACTIVE).set(channels.len() as f64);
        }
        drop(channels);

        histogram!(BUS_BROADCAST_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        counter!(BUS_DELIVERIES_TOTAL).increment(delivered as u64);
        debug!(update_type, session_id, delivered, "broadcast update");
        delivered
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }

    /// Whether `client_id` currently has a subscription.
    pub async fn is_registered(&self, client_id: &str) -> bool {
        self.channels.lock().await.contains_key(client_id)
    }

    /// Clients subscribed with exactly this session scope.
    pub async fn session_subscribers(&self, session_id: &str) -> Vec<String> {
        let channels = self.channels.lock().await;
        channels
            .values()
            .filter(|c| c.session_id() == session_id)
            .map(|c| c.client_id().to_string())
            .collect()
    }
}

impl Default for UpdateBus {
    fn default() -> Self {
        Self::new()
    }
}
