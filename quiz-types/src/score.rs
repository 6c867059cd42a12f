use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A persisted play result. Append-only; one per completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreEvent {
    pub player_id: Uuid,
    pub display_name: String,
    pub value: i32,
    pub occurred_at: String, // ISO 8601 string
}

/// A leaderboard input row as fetched from the score source. Either a raw
/// per-play record or a pre-aggregated per-player summary; both share this
/// shape. Name and timestamp may be absent on raw rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRow {
    pub player_id: Uuid,
    pub display_name: Option<String>,
    pub value: i32,
    pub played_at: Option<String>, // ISO 8601 string
}

/// One ranked leaderboard line. The aggregator guarantees at most one entry
/// per `player_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardEntry {
    pub player_id: Uuid,
    pub display_name: String,
    pub best_value: i32,
    pub best_at: Option<String>, // ISO 8601 string
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LeaderboardView {
    AllTime,
    Since { days: i64 },
}
