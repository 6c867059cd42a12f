use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::game::GamePhase;

/// Rejected engine operations. Phase guards reject instead of panicking so a
/// late caller (stale UI event, ghost timer) is a no-op.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("session already started")]
    AlreadyStarted,
    #[error("session not started")]
    NotStarted,
    #[error("operation '{operation}' is not valid in phase {phase:?}")]
    InvalidPhase {
        operation: String,
        phase: GamePhase,
    },
    #[error("candidate catalog is empty")]
    CatalogEmpty,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LeaderboardError {
    /// The row fetch itself failed. Distinct from an empty result, which is a
    /// valid (empty) ranking.
    #[error("leaderboard fetch failed: {message}")]
    FetchFailed { message: String },
}
