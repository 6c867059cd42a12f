use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use quiz_core::providers::ScoreStore;
use quiz_core::{Catalog, DEFAULT_POOL_SIZE, GameRunner, RoundEngine, TimerConfig};
use quiz_store::{MemoryScoreStore, StaticCandidates, StaticIdentity};

pub const PLAYER_NAME: &str = "ash";

/// Default game timer: 10s countdown, 50ms ticks, 1s grace.
pub fn game_timer() -> TimerConfig {
    TimerConfig::default()
}

/// Sleep duration that is safely past a timer's expiry.
pub fn past_expiry(config: TimerConfig) -> Duration {
    config.grace + config.duration + Duration::from_millis(100)
}

pub async fn load_catalog(count: u32) -> Arc<Catalog> {
    let source = StaticCandidates::numbered(count);
    Arc::new(
        Catalog::load(&source, DEFAULT_POOL_SIZE)
            .await
            .expect("static catalog loads"),
    )
}

pub struct TestGame {
    pub runner: GameRunner,
    pub store: Arc<MemoryScoreStore>,
    pub player_id: Uuid,
}

pub async fn signed_in_game(pool: u32, timer: TimerConfig) -> TestGame {
    let catalog = load_catalog(pool).await;
    let store = Arc::new(MemoryScoreStore::new());
    let player_id = Uuid::new_v4();
    store.register_profile(player_id, PLAYER_NAME);
    let identity = Arc::new(StaticIdentity::signed_in(player_id, PLAYER_NAME));
    let engine = RoundEngine::new(
        catalog,
        identity,
        store.clone() as Arc<dyn ScoreStore>,
        timer,
    );
    TestGame {
        runner: GameRunner::new(engine),
        store,
        player_id,
    }
}

pub async fn signed_out_game(pool: u32, timer: TimerConfig) -> TestGame {
    let catalog = load_catalog(pool).await;
    let store = Arc::new(MemoryScoreStore::new());
    let identity = Arc::new(StaticIdentity::signed_out());
    let engine = RoundEngine::new(
        catalog,
        identity,
        store.clone() as Arc<dyn ScoreStore>,
        timer,
    );
    TestGame {
        runner: GameRunner::new(engine),
        store,
        player_id: Uuid::new_v4(),
    }
}

/// Submit the correct answer for the current round.
pub async fn guess_correctly(runner: &GameRunner) -> quiz_types::RoundResult {
    let target = runner.current_target().await.expect("target is set");
    runner
        .submit_guess(&target.name)
        .await
        .expect("guess accepted")
}

/// Let spawned tasks (persistence, refresh) run to completion.
pub async fn drain_tasks() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}
