use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub type CandidateId = u32;

/// One entry of the guessing pool. Supplied by an external catalog and never
/// mutated by the game; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GamePhase {
    Guessing,
    Revealed,
    Complete,
}

/// Outcome of a single round. Appended once when the round resolves and never
/// touched again. `guess` is `None` when the timer expired the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundResult {
    pub target_id: CandidateId,
    pub guess: Option<String>,
    pub correct: bool,
    pub award: i32,
    pub completed_at: String, // ISO 8601 string
}

/// Serializable snapshot of a running session, safe to hand to a client.
/// The engine owns the live session; this is a copy.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionState {
    pub id: Uuid,
    pub current_round: u32,
    pub max_rounds: u32,
    pub score: i32,
    pub phase: GamePhase,
    pub rounds: Vec<RoundResult>,
}
