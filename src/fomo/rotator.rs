//! Timer-driven social-proof rotator. Loads the active notifications once,
//! then shows one at random for a fixed window with a randomized gap in
//! between. Display state is ephemeral and lost on restart.

use std::{sync::Arc, time::Duration};

use rand::seq::IndexedRandom;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::model::FomoNotification;
use crate::store::FomoStore;

#[derive(Debug, Clone)]
pub struct RotatorConfig {
    /// Delay before the first notification is shown.
    pub initial_delay: Duration,
    /// How long each notification stays visible.
    pub visible_for: Duration,
    /// Bounds for the randomized gap between hide and the next show.
    pub min_gap: Duration,
    pub max_gap: Duration,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(3),
            visible_for: Duration::from_secs(5),
            min_gap: Duration::from_secs(15),
            max_gap: Duration::from_secs(25),
        }
    }
}

/// Read side of the rotator: whatever is visible right now.
#[derive(Clone)]
pub struct RotatorHandle {
    rx: watch::Receiver<Option<FomoNotification>>,
}

impl RotatorHandle {
    pub fn current(&self) -> Option<FomoNotification> {
        self.rx.borrow().clone()
    }

    /// A handle with no rotator behind it; nothing is ever visible.
    pub fn idle() -> Self {
        let (_tx, rx) = watch::channel(None);
        Self { rx }
    }
}

pub fn spawn(store: Arc<dyn FomoStore>, config: RotatorConfig) -> RotatorHandle {
    let (tx, rx) = watch::channel(None);
    tokio::spawn(run(store, config, tx));
    RotatorHandle { rx }
}

async fn run(
    store: Arc<dyn FomoStore>,
    config: RotatorConfig,
    tx: watch::Sender<Option<FomoNotification>>,
) {
    let pool = match store.active().await {
        Ok(pool) => pool,
        Err(err) => {
            warn!(error = %err, "failed to load fomo notifications");
            return;
        }
    };
    if pool.is_empty() {
        debug!("no active fomo notifications, rotator stays dark");
        return;
    }

    tokio::time::sleep(config.initial_delay).await;
    loop {
        if tx.is_closed() {
            return;
        }

        // strictly one visible at a time: show, hold, hide, wait out the gap
        if let Some(pick) = pool.choose(&mut rand::rng()) {
            debug!(id = pick.id, location = %pick.location, "showing fomo notification");
            tx.send_replace(Some(pick.clone()));
        }
        tokio::time::sleep(config.visible_for).await;
        tx.send_replace(None);

        let spread = config.max_gap.saturating_sub(config.min_gap);
        let gap = config.min_gap + spread.mul_f64(rand::random::<f64>());
        tokio::time::sleep(gap).await;
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::advance;

    use super::*;
    use crate::store::memory::MemStore;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn seeded() -> Arc<MemStore> {
        Arc::new(MemStore::seeded(false).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn shown_three_seconds_after_start_hidden_five_seconds_later() {
        let handle = spawn(seeded(), RotatorConfig::default());
        settle().await;
        assert!(handle.current().is_none());

        advance(Duration::from_millis(2_999)).await;
        settle().await;
        assert!(handle.current().is_none(), "nothing before the initial delay");

        advance(Duration::from_millis(2)).await;
        settle().await;
        let shown = handle.current().expect("visible after the initial delay");
        assert!(shown.is_active);

        advance(Duration::from_secs(5)).await;
        settle().await;
        assert!(handle.current().is_none(), "auto-hidden after five seconds");
    }

    #[tokio::test(start_paused = true)]
    async fn stays_hidden_through_the_minimum_gap_then_rotates_again() {
        let handle = spawn(seeded(), RotatorConfig::default());
        settle().await;

        // run through the first show/hide cycle: 3s delay + 5s visible.
        // advance in two steps so the rotator task is polled at the 3s
        // deadline; a lumped advance would register the visible-window
        // sleep only after the clock already passed 8s
        advance(Duration::from_secs(3)).await;
        settle().await;
        advance(Duration::from_secs(5)).await;
        settle().await;
        assert!(handle.current().is_none());

        // the next show is at least min_gap (15s) away
        advance(Duration::from_secs(14)).await;
        settle().await;
        assert!(handle.current().is_none());

        // and arrives within max_gap; 500ms steps cannot skip a 5s window
        let mut reappeared = false;
        for _ in 0..30 {
            advance(Duration::from_millis(500)).await;
            settle().await;
            if handle.current().is_some() {
                reappeared = true;
                break;
            }
        }
        assert!(reappeared, "rotated again within the maximum gap");
    }

    #[tokio::test(start_paused = true)]
    async fn no_active_notifications_means_nothing_is_ever_shown() {
        let handle = spawn(Arc::new(MemStore::empty(false)), RotatorConfig::default());
        settle().await;

        advance(Duration::from_secs(120)).await;
        settle().await;
        assert!(handle.current().is_none());
    }
}
