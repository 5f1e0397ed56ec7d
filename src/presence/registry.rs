//! Participant registry with heartbeat expiry.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::{ParlorError, Result};

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Unique display name.
    pub name: String,
    /// Time of the last join or heartbeat.
    pub last_seen: DateTime<Utc>,
}

impl Participant {
    /// Create a new participant seen at `now`.
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            last_seen: now,
        }
    }

    /// Whether more than `ttl` has passed since the last heartbeat.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now - self.last_seen > ttl,
            // A TTL too large to represent never expires.
            Err(_) => false,
        }
    }
}

/// Registry of live participants.
///
/// Participants are kept in insertion order. Reads take the read lock,
/// every mutation takes the write lock, and the uniqueness check of
/// [`join`](Self::join) shares its critical section with the insert.
pub struct ParticipantRegistry {
    participants: RwLock<Vec<Participant>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl ParticipantRegistry {
    /// Create an empty registry.
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            participants: RwLock::new(Vec::new()),
            clock,
            ttl,
        }
    }

    /// Participant time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Register `name`.
    ///
    /// Fails with [`ParlorError::Conflict`] if an unexpired participant has the
    /// same name. An expired entry that the sweep has not reached yet is
    /// replaced and returned, so the caller can announce its departure.
    pub async fn join(&self, name: &str) -> Result<Option<Participant>> {
        let now = self.clock.now();
        let mut participants = self.participants.write().await;

        let stale = match participants.iter().position(|p| p.name == name) {
            Some(index) if !participants[index].is_expired(now, self.ttl) => {
                return Err(ParlorError::Conflict(format!(
                    "participant '{name}' already exists"
                )));
            }
            Some(index) => Some(participants.remove(index)),
            None => None,
        };

        participants.push(Participant::new(name, now));
        Ok(stale)
    }

    /// Refresh the last-seen time of `name`.
    pub async fn heartbeat(&self, name: &str) -> Result<Participant> {
        let now = self.clock.now();
        let mut participants = self.participants.write().await;

        let participant = participants
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ParlorError::NotFound(format!("participant '{name}'")))?;
        participant.last_seen = now;

        Ok(participant.clone())
    }

    /// Snapshot of all participants in insertion order.
    pub async fn list(&self) -> Vec<Participant> {
        self.participants.read().await.clone()
    }

    /// Get a participant by name.
    pub async fn get(&self, name: &str) -> Option<Participant> {
        self.participants
            .read()
            .await
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }

    /// Check if `name` is registered.
    pub async fn contains(&self, name: &str) -> bool {
        self.participants.read().await.iter().any(|p| p.name == name)
    }

    /// Remove every participant idle for more than `ttl` at `now`.
    ///
    /// Returns the evicted names in insertion order.
    pub async fn sweep_expired(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<String> {
        let mut participants = self.participants.write().await;
        let mut evicted = Vec::new();

        participants.retain(|p| {
            if p.is_expired(now, ttl) {
                evicted.push(p.name.clone());
                false
            } else {
                true
            }
        });

        evicted
    }

    /// Get the number of participants.
    pub async fn len(&self) -> usize {
        self.participants.read().await.len()
    }

    /// Whether no participant is registered.
    pub async fn is_empty(&self) -> bool {
        self.participants.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    const TTL: Duration = Duration::from_secs(10);

    fn setup() -> (Arc<ManualClock>, ParticipantRegistry) {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let registry = ParticipantRegistry::new(clock.clone(), TTL);
        (clock, registry)
    }

    #[test]
    fn test_is_expired_is_strict() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let p = Participant::new("alice", start);

        assert!(!p.is_expired(start + chrono::Duration::seconds(10), TTL));
        assert!(p.is_expired(start + chrono::Duration::milliseconds(10_001), TTL));
    }

    #[tokio::test]
    async fn test_join() {
        let (clock, registry) = setup();

        let stale = registry.join("alice").await.unwrap();
        assert!(stale.is_none());
        assert_eq!(registry.len().await, 1);

        let alice = registry.get("alice").await.unwrap();
        assert_eq!(alice.last_seen, clock.now());
    }

    #[tokio::test]
    async fn test_join_duplicate_rejected() {
        let (_clock, registry) = setup();
        registry.join("alice").await.unwrap();

        let result = registry.join("alice").await;
        assert!(matches!(result, Err(ParlorError::Conflict(_))));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_join_replaces_expired_entry() {
        let (clock, registry) = setup();
        registry.join("alice").await.unwrap();
        registry.join("bob").await.unwrap();

        clock.advance(Duration::from_secs(11));
        let stale = registry.join("alice").await.unwrap();

        assert_eq!(stale.map(|p| p.name), Some("alice".to_string()));
        assert_eq!(registry.len().await, 2);

        // Re-joined participant moves to the end
        let names: Vec<_> = registry.list().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["bob", "alice"]);
    }

    #[tokio::test]
    async fn test_heartbeat_updates_last_seen() {
        let (clock, registry) = setup();
        registry.join("alice").await.unwrap();

        clock.advance(Duration::from_secs(5));
        let alice = registry.heartbeat("alice").await.unwrap();
        assert_eq!(alice.last_seen, clock.now());
    }

    #[tokio::test]
    async fn test_heartbeat_unknown() {
        let (_clock, registry) = setup();
        let result = registry.heartbeat("bob").await;
        assert!(matches!(result, Err(ParlorError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_insertion_order() {
        let (clock, registry) = setup();
        registry.join("carol").await.unwrap();
        clock.advance(Duration::from_secs(1));
        registry.join("alice").await.unwrap();
        registry.join("bob").await.unwrap();

        // Heartbeats do not reorder
        registry.heartbeat("carol").await.unwrap();

        let names: Vec<_> = registry.list().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);
    }

    #[tokio::test]
    async fn test_sweep_expired() {
        let (clock, registry) = setup();
        registry.join("alice").await.unwrap();
        registry.join("bob").await.unwrap();
        registry.join("carol").await.unwrap();

        clock.advance(Duration::from_secs(6));
        registry.heartbeat("bob").await.unwrap();
        clock.advance(Duration::from_secs(6));

        let evicted = registry.sweep_expired(clock.now(), TTL).await;
        assert_eq!(evicted, vec!["alice", "carol"]);
        assert_eq!(registry.len().await, 1);
        assert!(registry.contains("bob").await);
    }

    #[tokio::test]
    async fn test_sweep_nothing_expired() {
        let (clock, registry) = setup();
        registry.join("alice").await.unwrap();
        let before = registry.list().await;

        let evicted = registry.sweep_expired(clock.now(), TTL).await;
        assert!(evicted.is_empty());
        assert_eq!(registry.list().await, before);
    }

    #[tokio::test]
    async fn test_heartbeat_keeps_alive() {
        let (clock, registry) = setup();
        registry.join("alice").await.unwrap();

        for _ in 0..10 {
            clock.advance(Duration::from_secs(9));
            registry.heartbeat("alice").await.unwrap();
            let evicted = registry.sweep_expired(clock.now(), TTL).await;
            assert!(evicted.is_empty());
        }
        assert!(registry.contains("alice").await);
    }

    #[tokio::test]
    async fn test_concurrent_joins_same_name() {
        let (_clock, registry) = setup();
        let registry = Arc::new(registry);

        let mut handles = Vec::new();
        for _ in 0..20 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move { registry.join("alice").await }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(registry.len().await, 1);
    }
}
