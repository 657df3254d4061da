//! Interval subscriptions for page data.
//!
//! A page subscribes each feed it needs and keeps the returned [`PollHandle`].
//! Dropping the handle (page teardown) cancels the subscription. The app asks
//! [`PollScheduler::due`] once per frame for the keys that should be fetched now.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::DEBUG_FLAGS;
use crate::utils::app_time::AppInstant;

/// Keeps a subscription alive. Cancels it on drop.
#[derive(Debug)]
pub struct PollHandle {
    alive: Arc<AtomicBool>,
}

impl PollHandle {
    pub fn is_active(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Relaxed);
    }
}

#[derive(Debug)]
struct Subscription<K> {
    key: K,
    interval: Option<Duration>,
    // None until the first fire
    next_due: Option<AppInstant>,
    alive: Arc<AtomicBool>,
}

#[derive(Debug)]
pub struct PollScheduler<K> {
    subscriptions: Vec<Subscription<K>>,
}

impl<K> Default for PollScheduler<K> {
    fn default() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }
}

impl<K: Clone + std::fmt::Debug> PollScheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires on the next `due`, then every `interval`. `None` fires once.
    pub fn subscribe(&mut self, key: K, interval: Option<Duration>) -> PollHandle {
        if cfg!(debug_assertions) && DEBUG_FLAGS.print_poll_events {
            log::info!("Poll subscribe {:?} every {:?}", key, interval);
        }
        let alive = Arc::new(AtomicBool::new(true));
        self.subscriptions.push(Subscription {
            key,
            interval,
            next_due: None,
            alive: Arc::clone(&alive),
        });
        PollHandle { alive }
    }

    /// Keys to fetch at `now`. Cancelled and spent one-shot subscriptions are pruned.
    pub fn due(&mut self, now: AppInstant) -> Vec<K> {
        self.prune();

        let mut fired = Vec::new();
        for sub in &mut self.subscriptions {
            if sub.next_due.is_some_and(|t| now < t) {
                continue;
            }
            fired.push(sub.key.clone());
            sub.next_due = sub.interval.map(|d| now + d);
            if sub.interval.is_none() {
                // One-shot: spent after firing
                sub.alive.store(false, Ordering::Relaxed);
            }
        }

        if cfg!(debug_assertions) && DEBUG_FLAGS.print_poll_events && !fired.is_empty() {
            log::info!("Poll fired {:?}", fired);
        }
        self.prune();
        fired
    }

    /// Earliest upcoming fire time, for scheduling the next repaint.
    pub fn next_deadline(&self) -> Option<AppInstant> {
        self.subscriptions
            .iter()
            .filter(|s| s.alive.load(Ordering::Relaxed))
            .filter_map(|s| s.next_due)
            .min()
    }

    pub fn len(&self) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| s.alive.load(Ordering::Relaxed))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&mut self) {
        self.subscriptions
            .retain(|s| s.alive.load(Ordering::Relaxed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::app_time::now;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn fires_immediately_then_on_interval() {
        let mut scheduler = PollScheduler::new();
        let _handle = scheduler.subscribe("logs", Some(2 * SECOND));
        let t0 = now();

        assert_eq!(scheduler.due(t0), vec!["logs"]);
        assert!(scheduler.due(t0 + SECOND).is_empty());
        assert_eq!(scheduler.due(t0 + 2 * SECOND), vec!["logs"]);
        assert_eq!(scheduler.next_deadline(), Some(t0 + 4 * SECOND));
    }

    #[test]
    fn one_shot_fires_once() {
        let mut scheduler = PollScheduler::new();
        let handle = scheduler.subscribe("dashboard", None);
        let t0 = now();

        assert_eq!(scheduler.due(t0), vec!["dashboard"]);
        assert!(scheduler.due(t0 + 60 * SECOND).is_empty());
        assert!(!handle.is_active());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn dropping_handle_cancels() {
        let mut scheduler = PollScheduler::new();
        let logs = scheduler.subscribe("logs", Some(SECOND));
        let market = scheduler.subscribe("market", Some(SECOND));
        let t0 = now();
        assert_eq!(scheduler.due(t0).len(), 2);

        drop(logs);
        assert_eq!(scheduler.due(t0 + SECOND), vec!["market"]);
        assert_eq!(scheduler.len(), 1);

        drop(market);
        assert!(scheduler.due(t0 + 2 * SECOND).is_empty());
        assert!(scheduler.is_empty());
    }
}
