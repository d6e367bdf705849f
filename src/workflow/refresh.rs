use std::sync::Arc;

use tokio::sync::watch;

/// Change-notification channel for ticket-affecting mutations. The producer
/// publishes without knowing who listens; each subscriber reacts to any change
/// of the counter, never to its value.
#[derive(Clone)]
pub struct RefreshBus {
    sender: Arc<watch::Sender<u64>>,
}

impl RefreshBus {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn publish(&self) -> u64 {
        let mut published = 0;
        self.sender.send_modify(|value| {
            *value += 1;
            published = *value;
        });
        tracing::debug!(signal = published, "refresh published");
        published
    }

    #[cfg(test)]
    pub fn current(&self) -> u64 {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> RefreshSubscription {
        RefreshSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for RefreshBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RefreshSubscription {
    receiver: watch::Receiver<u64>,
}

impl RefreshSubscription {
    /// Resolves with the new signal once it differs from the last one seen.
    /// Returns `None` when every bus handle has been dropped.
    pub async fn changed(&mut self) -> Option<u64> {
        self.receiver.changed().await.ok()?;
        Some(*self.receiver.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_counts_publications() {
        let bus = RefreshBus::new();
        assert_eq!(bus.current(), 0);
        assert_eq!(bus.publish(), 1);
        assert_eq!(bus.clone().publish(), 2);
        assert_eq!(bus.current(), 2);
    }

    #[tokio::test]
    async fn subscribers_only_see_later_changes() {
        let bus = RefreshBus::new();
        bus.publish();

        let mut subscription = bus.subscribe();
        bus.publish();

        assert_eq!(subscription.changed().await, Some(2));
    }

    #[tokio::test]
    async fn subscription_ends_with_the_bus() {
        let bus = RefreshBus::new();
        let mut subscription = bus.subscribe();
        drop(bus);

        assert_eq!(subscription.changed().await, None);
    }
}
