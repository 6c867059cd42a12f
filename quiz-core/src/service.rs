use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::engine::{AdvanceOutcome, RoundEngine};
use crate::leaderboard::{self, RAW_FETCH_LIMIT, WINDOWED_FETCH_LIMIT};
use crate::providers::{LeaderboardSource, ScoreStore};
use quiz_types::{
    Candidate, GameError, LeaderboardEntry, LeaderboardError, LeaderboardView, RoundResult,
    ScoreEvent, ScoreRow, SessionState,
};

/// Async wrapper around the synchronous engine: schedules one expiry task per
/// armed timer and issues the completion insert as fire-and-forget.
pub struct GameRunner {
    engine: Arc<RwLock<RoundEngine>>,
}

impl GameRunner {
    pub fn new(engine: RoundEngine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
        }
    }

    pub async fn start(&self, max_rounds: u32) -> Result<(), GameError> {
        let mut engine = self.engine.write().await;
        engine.start(max_rounds)?;
        self.schedule_expiry(&engine);
        Ok(())
    }

    pub async fn reset(&self, max_rounds: u32) -> Result<(), GameError> {
        let mut engine = self.engine.write().await;
        engine.reset(max_rounds)?;
        self.schedule_expiry(&engine);
        Ok(())
    }

    pub async fn submit_guess(&self, text: &str) -> Result<RoundResult, GameError> {
        self.engine.write().await.submit_guess(text)
    }

    pub async fn advance(&self) -> Result<AdvanceOutcome, GameError> {
        let mut engine = self.engine.write().await;
        let outcome = engine.advance()?;
        match &outcome {
            AdvanceOutcome::NextRound => self.schedule_expiry(&engine),
            AdvanceOutcome::Completed { score_event, .. } => {
                if let Some(event) = score_event.clone() {
                    self.persist_score(engine.store(), event);
                }
            }
        }
        Ok(outcome)
    }

    pub async fn snapshot(&self) -> Option<SessionState> {
        self.engine.read().await.snapshot()
    }

    /// The candidate being guessed, for rendering its picture and revealing
    /// its name.
    pub async fn current_target(&self) -> Option<Candidate> {
        self.engine.read().await.target().cloned()
    }

    /// One task per timer instance. The task checks the token after sleeping
    /// as a cheap early-out, and hands it to the engine, which re-checks it
    /// under the write lock. A reset that cancels the token while this task
    /// is parked on the lock therefore still wins.
    fn schedule_expiry(&self, engine: &RoundEngine) {
        let (Some(timer), Some(session)) = (engine.timer(), engine.session()) else {
            return;
        };
        let token = timer.token();
        let delay = timer.expiry_delay();
        let round = session.current_round;
        let shared = Arc::clone(&self.engine);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if token.is_cancelled() {
                return;
            }
            shared.write().await.time_expired(round, &token);
        });
    }

    /// Fire and forget: a failed insert loses the row but never fails the
    /// session.
    fn persist_score(&self, store: Arc<dyn ScoreStore>, event: ScoreEvent) {
        tokio::spawn(async move {
            if let Err(err) = store.insert_score_event(event.player_id, event.value).await {
                error!(player = %event.player_id, %err, "failed to save score");
            }
        });
    }
}

/// Holds the last completed ranking for one leaderboard view and recomputes
/// it from a fresh fetch on every push notification. Overlapping refreshes
/// carry no ordering token; the most recently completed fetch wins and a
/// transiently stale ranking self-corrects on the next notification.
pub struct LeaderboardService {
    raw: Arc<dyn LeaderboardSource>,
    summary: Option<Arc<dyn LeaderboardSource>>,
    view: LeaderboardView,
    limit: usize,
    current: RwLock<Vec<LeaderboardEntry>>,
}

impl LeaderboardService {
    pub fn new(raw: Arc<dyn LeaderboardSource>, view: LeaderboardView, limit: usize) -> Self {
        Self {
            raw,
            summary: None,
            view,
            limit,
            current: RwLock::new(Vec::new()),
        }
    }

    /// Prefer a pre-aggregated summary source. Its rows still run through the
    /// same merge, which is a no-op for clean summaries but stays
    /// tie-break-safe against stale ones.
    pub fn with_summary_source(mut self, summary: Arc<dyn LeaderboardSource>) -> Self {
        self.summary = Some(summary);
        self
    }

    pub async fn current(&self) -> Vec<LeaderboardEntry> {
        self.current.read().await.clone()
    }

    /// Full fetch + recompute, replacing the held ranking on success. A fetch
    /// failure leaves the previous ranking in place and is surfaced as a load
    /// error, distinct from an empty result.
    pub async fn refresh(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let rows = self.fetch_rows().await?;
        let ranked = leaderboard::rank(rows, self.limit);
        *self.current.write().await = ranked.clone();
        Ok(ranked)
    }

    async fn fetch_rows(&self) -> Result<Vec<ScoreRow>, LeaderboardError> {
        if let Some(summary) = &self.summary {
            match self.fetch_from(summary.as_ref()).await {
                Ok(rows) => return Ok(rows),
                Err(err) => warn!(%err, "summary source failed; falling back to raw rows"),
            }
        }
        self.fetch_from(self.raw.as_ref())
            .await
            .map_err(|err| LeaderboardError::FetchFailed {
                message: err.to_string(),
            })
    }

    async fn fetch_from(&self, source: &dyn LeaderboardSource) -> anyhow::Result<Vec<ScoreRow>> {
        match self.view {
            LeaderboardView::AllTime => source.fetch_all_time(RAW_FETCH_LIMIT).await,
            LeaderboardView::Since { days } => source.fetch_since(days, WINDOWED_FETCH_LIMIT).await,
        }
    }

    /// Refresh on every new-event notification until the channel closes. Each
    /// notification triggers an idempotent full recompute, never an
    /// incremental patch.
    pub fn watch(self: &Arc<Self>, store: &dyn ScoreStore) -> JoinHandle<()> {
        let mut events = store.subscribe_new_events();
        let service = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    // A lagged receiver missed notifications, but the next
                    // recompute picks up everything anyway.
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        if let Err(err) = service.refresh().await {
                            warn!(%err, "leaderboard refresh failed");
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
