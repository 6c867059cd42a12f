use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::answer;
use crate::catalog::Catalog;
use crate::providers::{IdentityProvider, ScoreStore};
use crate::scoring::{self, MAX_POINTS_PER_ROUND};
use crate::timer::{RoundTimer, TimerConfig, TimerToken};
use quiz_types::{
    Candidate, GameError, GamePhase, RoundResult, ScoreEvent, SessionState,
};

pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// The live session, owned exclusively by the engine and replaced wholesale
/// on reset.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub rounds: Vec<RoundResult>,
    pub current_round: u32,
    pub max_rounds: u32,
    pub score: i32,
    pub phase: GamePhase,
}

/// What `advance` did. On completion the claimed score event (if any) must be
/// handed to the store by the caller; `GameRunner` does this.
#[derive(Debug)]
pub enum AdvanceOutcome {
    NextRound,
    Completed {
        final_score: i32,
        score_event: Option<ScoreEvent>,
    },
}

/// Finite state machine driving guess → reveal → next-round progression.
///
/// All state transitions happen through the methods below; the engine never
/// reaches into ambient globals. Collaborators arrive at construction. The
/// engine itself is synchronous; expiry scheduling and persistence calls are
/// the caller's job (see `service::GameRunner`).
pub struct RoundEngine {
    catalog: Arc<Catalog>,
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn ScoreStore>,
    timer_config: TimerConfig,
    session: Option<Session>,
    target: Option<Candidate>,
    timer: Option<RoundTimer>,
    score_saved: bool,
}

impl RoundEngine {
    pub fn new(
        catalog: Arc<Catalog>,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn ScoreStore>,
        timer_config: TimerConfig,
    ) -> Self {
        Self {
            catalog,
            identity,
            store,
            timer_config,
            session: None,
            target: None,
            timer: None,
            score_saved: false,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn target(&self) -> Option<&Candidate> {
        self.target.as_ref()
    }

    pub fn timer(&self) -> Option<&RoundTimer> {
        self.timer.as_ref()
    }

    pub fn store(&self) -> Arc<dyn ScoreStore> {
        Arc::clone(&self.store)
    }

    pub fn snapshot(&self) -> Option<SessionState> {
        self.session.as_ref().map(|session| SessionState {
            id: session.id,
            current_round: session.current_round,
            max_rounds: session.max_rounds,
            score: session.score,
            phase: session.phase,
            rounds: session.rounds.clone(),
        })
    }

    /// Begin the first session: round 1, score 0, a fresh target, timer
    /// armed. Valid once; use `reset` to play again.
    pub fn start(&mut self, max_rounds: u32) -> Result<(), GameError> {
        if self.session.is_some() {
            return Err(GameError::AlreadyStarted);
        }
        self.begin_session(max_rounds)
    }

    /// Throw away the current session and begin a fresh one, clearing the
    /// save-once guard. Valid in any phase.
    pub fn reset(&mut self, max_rounds: u32) -> Result<(), GameError> {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.session = None;
        self.target = None;
        self.begin_session(max_rounds)
    }

    fn begin_session(&mut self, max_rounds: u32) -> Result<(), GameError> {
        let target = self
            .catalog
            .pick_random(None)
            .ok_or(GameError::CatalogEmpty)?;
        let session = Session {
            id: Uuid::new_v4(),
            rounds: Vec::new(),
            current_round: 1,
            max_rounds,
            score: 0,
            phase: GamePhase::Guessing,
        };
        info!(session = %session.id, target = target.id, "session started");
        self.session = Some(session);
        self.target = Some(target);
        self.score_saved = false;
        self.arm_timer();
        Ok(())
    }

    /// Arm a fresh timer for the current round, cancelling the outgoing
    /// instance first so a stale expiry can never touch the new round.
    fn arm_timer(&mut self) {
        if let Some(old) = self.timer.take() {
            old.cancel();
        }
        self.timer = Some(RoundTimer::arm(self.timer_config));
    }

    fn require_phase(&self, operation: &str, wanted: GamePhase) -> Result<(), GameError> {
        match &self.session {
            None => Err(GameError::NotStarted),
            Some(session) if session.phase == wanted => Ok(()),
            Some(session) => Err(GameError::InvalidPhase {
                operation: operation.to_string(),
                phase: session.phase,
            }),
        }
    }

    /// Resolve the current round from a typed guess. Only valid while
    /// guessing. The timer is read and then cancelled before any state is
    /// committed, so a same-instant expiry always loses the race.
    pub fn submit_guess(&mut self, text: &str) -> Result<RoundResult, GameError> {
        self.require_phase("submit_guess", GamePhase::Guessing)?;
        let target = self.target.clone().ok_or(GameError::NotStarted)?;

        // Remaining time at the submission instant; cancellation discards the
        // instance afterwards.
        let (remaining, duration) = match &self.timer {
            Some(timer) => (timer.remaining(), timer.config().duration),
            None => (Duration::ZERO, self.timer_config.duration),
        };
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }

        let correct = answer::is_match(text, &target.name);
        let award = scoring::award(correct, remaining, duration, MAX_POINTS_PER_ROUND);
        let result = RoundResult {
            target_id: target.id,
            guess: Some(text.to_string()),
            correct,
            award,
            completed_at: Utc::now().to_rfc3339(),
        };

        let session = self.session.as_mut().ok_or(GameError::NotStarted)?;
        session.score += award;
        session.rounds.push(result.clone());
        session.phase = GamePhase::Revealed;
        info!(
            round = session.current_round,
            correct, award, "guess resolved"
        );
        Ok(result)
    }

    /// Called by the expiry task when the countdown for `round` ran out,
    /// carrying the token of the timer instance that fired. Records a
    /// zero-point miss and reveals. Returns `false` (and changes nothing)
    /// when the expiry is stale: a cancelled firing token, wrong phase,
    /// wrong round, or a cancelled current timer. The token must be checked
    /// here, under exclusive access to the engine, because a `reset` that
    /// cancelled it may have armed a fresh timer for the same round index
    /// while the expiry task was still waiting its turn.
    pub fn time_expired(&mut self, round: u32, token: &TimerToken) -> bool {
        if token.is_cancelled() {
            return false;
        }
        let Some(target_id) = self.target.as_ref().map(|t| t.id) else {
            return false;
        };
        match &self.timer {
            Some(timer) if !timer.is_cancelled() => {}
            _ => return false,
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.phase != GamePhase::Guessing || session.current_round != round {
            return false;
        }

        session.rounds.push(RoundResult {
            target_id,
            guess: None,
            correct: false,
            award: 0,
            completed_at: Utc::now().to_rfc3339(),
        });
        session.phase = GamePhase::Revealed;
        info!(round, "round timed out");
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        true
    }

    /// Leave the reveal: either move to the next round with a new target
    /// (never the one just shown, pool permitting) or complete the session
    /// and claim its score event under the save-once guard.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, GameError> {
        self.require_phase("advance", GamePhase::Revealed)?;
        let previous_target = self.target.as_ref().map(|t| t.id);

        let (current_round, max_rounds) = {
            let session = self.session.as_ref().ok_or(GameError::NotStarted)?;
            (session.current_round, session.max_rounds)
        };

        if current_round < max_rounds {
            let next = self
                .catalog
                .pick_random(previous_target)
                .ok_or(GameError::CatalogEmpty)?;
            let session = self.session.as_mut().ok_or(GameError::NotStarted)?;
            session.current_round += 1;
            session.phase = GamePhase::Guessing;
            info!(
                round = session.current_round,
                target = next.id,
                "next round"
            );
            self.target = Some(next);
            self.arm_timer();
            return Ok(AdvanceOutcome::NextRound);
        }

        let final_score = {
            let session = self.session.as_mut().ok_or(GameError::NotStarted)?;
            session.phase = GamePhase::Complete;
            info!(session = %session.id, final_score = session.score, "session complete");
            session.score
        };
        let score_event = self.claim_score_event(final_score);
        Ok(AdvanceOutcome::Completed {
            final_score,
            score_event,
        })
    }

    /// Claim the session's one score event. The guard trips before the event
    /// is handed out, and so before the insert is issued, which keeps a
    /// duplicate completion signal from double-persisting even while the
    /// first insert is still in flight. Signed-out players complete without
    /// persistence.
    fn claim_score_event(&mut self, final_score: i32) -> Option<ScoreEvent> {
        if self.score_saved {
            return None;
        }
        self.score_saved = true;
        match self.identity.current_player() {
            Some(player) => Some(ScoreEvent {
                player_id: player.id,
                display_name: player.display_name,
                value: final_score.max(0),
                occurred_at: Utc::now().to_rfc3339(),
            }),
            None => {
                warn!("no signed-in player; score not saved");
                None
            }
        }
    }
}
