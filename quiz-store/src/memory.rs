use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use quiz_core::providers::{LeaderboardSource, ScoreInserted, ScoreStore};
use quiz_types::ScoreRow;

#[derive(Debug, Clone)]
struct StoredScore {
    player_id: Uuid,
    value: i32,
    played_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<StoredScore>,
    profiles: HashMap<Uuid, String>,
}

/// In-memory score store: append-only rows plus a profile registry supplying
/// display names at fetch time. Every insert broadcasts a new-event
/// notification.
pub struct MemoryScoreStore {
    inner: Mutex<Inner>,
    events: broadcast::Sender<ScoreInserted>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Mutex::new(Inner::default()),
            events,
        }
    }

    /// Associate a display name with a player. Rows for unregistered players
    /// surface no name and fall back to the aggregator's default label.
    pub fn register_profile(&self, player_id: Uuid, display_name: &str) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.profiles.insert(player_id, display_name.to_string());
    }

    /// Insert a row with an explicit timestamp. Lets tests seed history
    /// outside the current leaderboard window.
    pub fn insert_row_at(&self, player_id: Uuid, value: i32, played_at: DateTime<Utc>) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.rows.push(StoredScore {
            player_id,
            value: value.max(0),
            played_at,
        });
    }

    pub fn row_count(&self) -> usize {
        self.inner.lock().expect("store lock poisoned").rows.len()
    }

    fn to_score_row(inner: &Inner, stored: &StoredScore) -> ScoreRow {
        ScoreRow {
            player_id: stored.player_id,
            display_name: inner.profiles.get(&stored.player_id).cloned(),
            value: stored.value,
            played_at: Some(stored.played_at.to_rfc3339()),
        }
    }
}

impl Default for MemoryScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn insert_score_event(&self, player_id: Uuid, value: i32) -> Result<()> {
        {
            let mut inner = self.inner.lock().expect("store lock poisoned");
            inner.rows.push(StoredScore {
                player_id,
                // Sanitize to a non-negative integer.
                value: value.max(0),
                played_at: Utc::now(),
            });
        }
        // No receivers is fine; nobody is watching yet.
        let _ = self.events.send(ScoreInserted);
        Ok(())
    }

    async fn personal_best(&self, player_id: Uuid) -> Result<Option<i32>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner
            .rows
            .iter()
            .filter(|row| row.player_id == player_id)
            .map(|row| row.value)
            .max())
    }

    fn subscribe_new_events(&self) -> broadcast::Receiver<ScoreInserted> {
        self.events.subscribe()
    }
}

#[async_trait]
impl LeaderboardSource for MemoryScoreStore {
    async fn fetch_all_time(&self, limit: usize) -> Result<Vec<ScoreRow>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        let mut rows: Vec<ScoreRow> = inner
            .rows
            .iter()
            .map(|stored| Self::to_score_row(&inner, stored))
            .collect();
        // Highest values first so the fetch limit keeps the interesting rows.
        rows.sort_by(|a, b| b.value.cmp(&a.value));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn fetch_since(&self, days: i64, limit: usize) -> Result<Vec<ScoreRow>> {
        let since = Utc::now() - Duration::days(days);
        let inner = self.inner.lock().expect("store lock poisoned");
        let mut rows: Vec<ScoreRow> = inner
            .rows
            .iter()
            .filter(|stored| stored.played_at >= since)
            .map(|stored| Self::to_score_row(&inner, stored))
            .collect();
        rows.sort_by(|a, b| b.value.cmp(&a.value));
        rows.truncate(limit);
        Ok(rows)
    }
}
