//! Periodic eviction of idle participants.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::lobby::Lobby;

/// Current activity of the sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    /// Waiting for the next tick.
    Idle,
    /// Running an eviction pass.
    Sweeping,
}

/// Resets the sweeping flag when a pass ends, however it ends.
struct SweepGuard<'a>(&'a AtomicBool);

impl<'a> SweepGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs [`Lobby::sweep`] on a fixed interval.
pub struct Sweeper {
    lobby: Arc<Lobby>,
    interval: Duration,
    sweeping: Arc<AtomicBool>,
}

impl Sweeper {
    /// Create a sweeper for `lobby` ticking every `interval`.
    pub fn new(lobby: Arc<Lobby>, interval: Duration) -> Self {
        Self {
            lobby,
            interval,
            sweeping: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the current state.
    pub fn state(&self) -> SweepState {
        state_of(&self.sweeping)
    }

    /// Run a single eviction pass now.
    ///
    /// Returns the evicted names.
    pub async fn tick(&self) -> Vec<String> {
        let _guard = SweepGuard::enter(&self.sweeping);

        let evicted = self.lobby.sweep().await;
        if evicted.is_empty() {
            tracing::debug!("No idle participants to evict");
        } else {
            tracing::info!(
                evicted_count = evicted.len(),
                names = ?evicted,
                "Evicted idle participants"
            );
        }
        evicted
    }

    /// Start ticking in a background task.
    ///
    /// The first pass runs one interval after spawning.
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let sweeping = Arc::clone(&self.sweeping);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = interval.tick() => {}
                }

                // Runs outside the select so shutdown never cuts a pass short.
                self.tick().await;
            }

            tracing::info!("Sweeper stopped");
        });

        SweeperHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
            sweeping,
        }
    }
}

/// Handle to a running [`Sweeper`] task.
pub struct SweeperHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    sweeping: Arc<AtomicBool>,
}

impl SweeperHandle {
    /// Get the current state.
    pub fn state(&self) -> SweepState {
        state_of(&self.sweeping)
    }

    /// Stop ticking and wait for an in-flight pass to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Err(e) = (&mut self.task).await {
            tracing::warn!(error = %e, "Sweeper task ended abnormally");
        }
    }
}

fn state_of(flag: &AtomicBool) -> SweepState {
    if flag.load(Ordering::SeqCst) {
        SweepState::Sweeping
    } else {
        SweepState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::LEAVE_TEXT;
    use crate::clock::ManualClock;

    const TTL: Duration = Duration::from_secs(10);

    fn setup() -> (Arc<ManualClock>, Arc<Lobby>) {
        let clock = Arc::new(ManualClock::default());
        let lobby = Arc::new(Lobby::new(clock.clone(), TTL, "UTC"));
        (clock, lobby)
    }

    #[tokio::test]
    async fn test_tick_evicts_expired() {
        let (clock, lobby) = setup();
        lobby.join("alice").await.unwrap();

        let sweeper = Sweeper::new(Arc::clone(&lobby), Duration::from_secs(15));
        assert!(sweeper.tick().await.is_empty());

        clock.advance(Duration::from_secs(11));
        assert_eq!(sweeper.tick().await, vec!["alice"]);
        assert_eq!(sweeper.state(), SweepState::Idle);
        assert!(lobby.registry().is_empty().await);

        // Already evicted: the next pass is a no-op
        let before = lobby.store().len().await;
        assert!(sweeper.tick().await.is_empty());
        assert_eq!(lobby.store().len().await, before);
    }

    #[tokio::test]
    async fn test_spawned_sweeper_evicts_and_shuts_down() {
        let (clock, lobby) = setup();
        lobby.join("alice").await.unwrap();
        clock.advance(Duration::from_secs(11));

        let handle = Sweeper::new(Arc::clone(&lobby), Duration::from_millis(20)).spawn();

        let mut evicted = false;
        for _ in 0..100 {
            if lobby.registry().is_empty().await {
                evicted = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(evicted, "participant should be evicted by a background tick");

        handle.shutdown().await;

        let leaves = lobby
            .messages(None, None)
            .await
            .into_iter()
            .filter(|m| m.text == LEAVE_TEXT)
            .count();
        assert_eq!(leaves, 1);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_tick() {
        let (_clock, lobby) = setup();
        let handle = Sweeper::new(lobby, Duration::from_secs(3600)).spawn();
        assert_eq!(handle.state(), SweepState::Idle);

        handle.shutdown().await;
    }
}
