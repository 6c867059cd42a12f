use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use quiz_types::{LeaderboardEntry, ScoreRow};

/// Shown for rows whose player never set a display name.
pub const FALLBACK_DISPLAY_NAME: &str = "anon";

/// How many raw rows an all-time fetch pulls before reduction.
pub const RAW_FETCH_LIMIT: usize = 1000;
/// Windowed fetches pull more rows since the filter already narrows them.
pub const WINDOWED_FETCH_LIMIT: usize = 2000;

/// Missing or unparseable timestamps collapse to the epoch so they can never
/// win a recency tie-break.
fn parse_played_at(value: Option<&str>) -> DateTime<Utc> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

struct Best {
    entry: LeaderboardEntry,
    at: DateTime<Utc>,
}

/// Reduce score rows into one best entry per player, ranked.
///
/// A row becomes a player's entry iff no entry is held yet, its value is
/// strictly higher, or the value ties and the row is strictly more recent.
/// The result is sorted by value then recency, both descending, and cut to
/// `limit`. Idempotent and independent of input row order; malformed rows are
/// defaulted, never rejected.
pub fn rank(rows: impl IntoIterator<Item = ScoreRow>, limit: usize) -> Vec<LeaderboardEntry> {
    let mut by_player: HashMap<Uuid, Best> = HashMap::new();

    for row in rows {
        let at = parse_played_at(row.played_at.as_deref());
        let replaces = match by_player.get(&row.player_id) {
            None => true,
            Some(held) => {
                row.value > held.entry.best_value
                    || (row.value == held.entry.best_value && at > held.at)
            }
        };
        if replaces {
            let entry = LeaderboardEntry {
                player_id: row.player_id,
                display_name: row
                    .display_name
                    .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string()),
                best_value: row.value,
                best_at: row.played_at,
            };
            by_player.insert(entry.player_id, Best { entry, at });
        }
    }

    let mut ranked: Vec<Best> = by_player.into_values().collect();
    ranked.sort_by(|a, b| {
        b.entry
            .best_value
            .cmp(&a.entry.best_value)
            .then(b.at.cmp(&a.at))
            .then_with(|| a.entry.player_id.cmp(&b.entry.player_id))
    });
    ranked.truncate(limit);
    ranked.into_iter().map(|best| best.entry).collect()
}
