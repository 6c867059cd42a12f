use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use quiz_types::{PlayerIdentity, ScoreRow};

/// Push notification for the score channel. Carries no payload on purpose:
/// every notification triggers a full refetch and recompute, never an
/// incremental patch.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInserted;

/// Who is playing right now. Session lifecycle lives elsewhere; the engine
/// only asks at the moment it needs to persist.
pub trait IdentityProvider: Send + Sync {
    fn current_player(&self) -> Option<PlayerIdentity>;
}

/// Append-only score persistence. Inserts are fire-and-forget from the
/// engine's perspective; a failure is logged and the session still completes.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn insert_score_event(&self, player_id: Uuid, value: i32) -> Result<()>;

    /// The player's highest persisted value, if any.
    async fn personal_best(&self, player_id: Uuid) -> Result<Option<i32>>;

    /// Subscribe to new-event notifications. Dropping the receiver
    /// unsubscribes.
    fn subscribe_new_events(&self) -> broadcast::Receiver<ScoreInserted>;
}

/// Row supplier for the leaderboard. Rows may be raw per-play records or a
/// pre-aggregated per-player summary; both feed the same reduction.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    async fn fetch_all_time(&self, limit: usize) -> Result<Vec<ScoreRow>>;
    async fn fetch_since(&self, days: i64, limit: usize) -> Result<Vec<ScoreRow>>;
}
