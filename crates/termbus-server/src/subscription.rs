//! Per-client subscription record.

use std::sync::Arc;

use termbus_core::Update;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Receive side of a subscription, owned by the connection layer.
///
/// Yields `None` once the subscription is unregistered, superseded or evicted,
/// after any updates already buffered have been drained.
pub type UpdateReceiver = mpsc::Receiver<Arc<Update>>;

/// One client's binding of identity, session scope and delivery channel.
///
/// The record owns the only sender for its channel, so dropping the record
/// closes the channel.
#[derive(Debug)]
pub struct UpdateChannel {
    client_id: String,
    session_id: String,
    tx: mpsc::Sender<Arc<Update>>,
    drops: u64,
}

/// Outcome of pushing one update onto a subscriber's channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Delivery {
    /// The update is in the subscriber's channel.
    Delivered,
    /// The channel was full; the update was discarded for this subscriber.
    Dropped {
        /// Lifetime drops for this subscriber, including this one.
        total_drops: u64,
    },
    /// The receiver is gone.
    Closed,
}

impl UpdateChannel {
    pub(crate) fn new(
        client_id: impl Into<String>,
        session_id: impl Into<String>,
        tx: mpsc::Sender<Arc<Update>>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            session_id: session_id.into(),
            tx,
            drops: 0,
        }
    }

    /// Client this subscription belongs to.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Session scope; empty when registered without one.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Updates discarded for this subscriber because its channel was full.
    pub fn drop_count(&self) -> u64 {
        self.drops
    }

    /// Whether a broadcast scoped to `session_id` reaches this subscription.
    ///
    /// An empty scope is a global broadcast and reaches everyone. Otherwise the
    /// subscription's own scope must be identical; an unscoped subscription
    /// only hears global broadcasts.
    pub fn matches(&self, session_id: &str) -> bool {
        session_id.is_empty() || session_id == self.session_id
    }

    /// Push without waiting. A full channel counts as a drop.
    pub(crate) fn try_deliver(&mut self, update: &Arc<Update>) -> Delivery {
        match self.tx.try_send(Arc::clone(update)) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(_)) => {
                self.drops += 1;
                Delivery::Dropped {
                    total_drops: self.drops,
                }
            }
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    /// Push, waiting for buffer space for as long as it takes.
    pub(crate) async fn deliver(&self, update: &Arc<Update>) -> Delivery {
        match self.tx.send(Arc::clone(update)).await {
            Ok(()) => Delivery::Delivered,
            Err(_) => Delivery::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use termbus_core::ModelUpdate;

    fn channel(session_id: &str, capacity: usize) -> (UpdateChannel, UpdateReceiver) {
        let (tx, rx) = mpsc::channel(capacity);
        (UpdateChannel::new("c1", session_id, tx), rx)
    }

    fn update() -> Arc<Update> {
        Arc::new(ModelUpdate::info("x").into())
    }

    #[test]
    fn global_broadcast_matches_any_scope() {
        assert!(channel("sess1", 1).0.matches(""));
        assert!(channel("", 1).0.matches(""));
    }

    #[test]
    fn scoped_broadcast_needs_identical_scope() {
        let (ch, _rx) = channel("sess1", 1);
        assert!(ch.matches("sess1"));
        assert!(!ch.matches("sess2"));
        assert!(!ch.matches("sess"));
    }

    #[test]
    fn unscoped_subscription_ignores_scoped_broadcast() {
        let (ch, _rx) = channel("", 1);
        assert!(!ch.matches("sess1"));
    }

    #[test]
    fn try_deliver_counts_drops_when_full() {
        let (mut ch, mut rx) = channel("s", 1);
        assert_eq!(ch.try_deliver(&update()), Delivery::Delivered);
        assert_eq!(
            ch.try_deliver(&update()),
            Delivery::Dropped { total_drops: 1 }
        );
        assert_eq!(
            ch.try_deliver(&update()),
            Delivery::Dropped { total_drops: 2 }
        );
        assert_eq!(ch.drop_count(), 2);

        assert!(rx.try_recv().is_ok());
        assert_eq!(ch.try_deliver(&update()), Delivery::Delivered);
        assert_eq!(ch.drop_count(), 2);
    }

    #[test]
    fn try_deliver_reports_closed_receiver() {
        let (mut ch, rx) = channel("s", 1);
        drop(rx);
        assert_eq!(ch.try_deliver(&update()), Delivery::Closed);
        assert_eq!(ch.drop_count(), 0);
    }

    #[tokio::test]
    async fn deliver_reports_closed_receiver() {
        let (ch, rx) = channel("s", 1);
        drop(rx);
        assert_eq!(ch.deliver(&update()).await, Delivery::Closed);
    }

    #[tokio::test]
    async fn dropping_record_closes_channel() {
        let (mut ch, mut rx) = channel("s", 4);
        assert_eq!(ch.try_deliver(&update()), Delivery::Delivered);
        drop(ch);
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }

    proptest! {
        #[test]
        fn matching_rule(scope in "[a-z0-9]{0,6}", target in "[a-z0-9]{0,6}") {
            let (tx, _rx) = mpsc::channel(1);
            let ch = UpdateChannel::new("c", scope.clone(), tx);
            prop_assert_eq!(ch.matches(&target), target.is_empty() || target == scope);
        }
    }
}
