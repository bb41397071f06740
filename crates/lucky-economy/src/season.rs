//! Season rollover and the one-shot rebirth.
//!
//! A record belongs to the season it was last seen in. The first operation
//! in a new season window archives the old one into `season_history` and
//! resets the run, the rebirth and the layer. Rebirth moves a player with a
//! complete collection into layer 2 once per season.

use chrono::{DateTime, Utc};
use lucky_core::{BalanceConfig, Catalog, SeasonClock};
use lucky_types::{Layer, PlayerEconomyState, RebirthResult, SeasonHistoryEntry, SeasonWindow, Standing};
use tracing::info;

use crate::collection::{best_card, is_complete};
use crate::error::EconomyError;

/// Rebirths allowed per season.
pub const MAX_REBIRTHS: u8 = 1;

/// Archive row for the season `state` currently belongs to.
pub fn archive_row(state: &PlayerEconomyState, catalog: &Catalog, now: DateTime<Utc>) -> SeasonHistoryEntry {
    SeasonHistoryEntry {
        season_id: state.season.id.clone(),
        starts_at: state.season.starts_at,
        ends_at: state.season.ends_at,
        archived_at: now,
        score: state.coins,
        rank: 1,
        total_players: 1,
        layer: state.active_layer,
        best_card: best_card(state, catalog),
        standings: vec![Standing {
            place: 1,
            display_name: state.profile.display_name.clone(),
            score: state.coins,
        }],
    }
}

/// Insert `row` newest first, replacing any row with the same season id,
/// and keep at most `limit` rows.
pub fn push_history(history: &mut Vec<SeasonHistoryEntry>, row: SeasonHistoryEntry, limit: usize) {
    history.retain(|h| h.season_id != row.season_id);
    history.insert(0, row);
    history.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));
    history.truncate(limit);
}

/// Roll `state` into the season window containing `now` if it has moved.
///
/// Returns the archived row when a rollover happened.
///
/// # Errors
///
/// [`EconomyError::Clock`] when `now` cannot be placed in a window.
pub fn roll_season(
    config: &BalanceConfig,
    clock: &SeasonClock,
    catalog: &Catalog,
    state: &mut PlayerEconomyState,
    now: DateTime<Utc>,
) -> Result<Option<SeasonHistoryEntry>, EconomyError> {
    let window = clock.window_at(now)?;
    if window.id == state.season.id {
        return Ok(None);
    }
    Ok(Some(start_season(config, catalog, state, window, now)))
}

fn start_season(
    config: &BalanceConfig,
    catalog: &Catalog,
    state: &mut PlayerEconomyState,
    window: SeasonWindow,
    now: DateTime<Utc>,
) -> SeasonHistoryEntry {
    let row = archive_row(state, catalog, now);
    push_history(&mut state.season_history, row.clone(), config.season.history_limit);

    state.reset_run(config.initial_coins, now);
    state.rebirth_count = 0;
    state.active_layer = Layer::BASE;
    state.stolen.clear();

    info!(
        from = %row.season_id,
        to = %window.id,
        score = row.score,
        "season rolled over"
    );
    state.season = window;
    row
}

/// Move a complete collection into layer 2.
///
/// # Errors
///
/// [`EconomyError::RebirthUsed`] after a rebirth this season, or
/// [`EconomyError::CollectionIncomplete`] while any catalog card is missing.
pub fn rebirth(
    config: &BalanceConfig,
    catalog: &Catalog,
    state: &mut PlayerEconomyState,
    now: DateTime<Utc>,
) -> Result<RebirthResult, EconomyError> {
    if state.rebirth_count >= MAX_REBIRTHS {
        return Err(EconomyError::RebirthUsed {
            layer: state.active_layer,
        });
    }
    if !is_complete(state, catalog) {
        return Err(EconomyError::CollectionIncomplete {
            collected: state.collection.len(),
            total: catalog.len(),
        });
    }

    let from_layer = state.active_layer;
    let to_layer = Layer::REBORN;
    state.reset_run(config.initial_coins, now);
    state.rebirth_count = state.rebirth_count.saturating_add(1);
    state.active_layer = to_layer;
    state.stolen.retain(|m| m.layer != to_layer);

    info!(
        from_layer = from_layer.number(),
        to_layer = to_layer.number(),
        "rebirth completed"
    );

    Ok(RebirthResult {
        rebirth_count: state.rebirth_count,
        from_layer,
        to_layer,
    })
}

/// Up to `limit` archived seasons, newest first.
pub fn season_history(state: &PlayerEconomyState, limit: usize) -> Vec<SeasonHistoryEntry> {
    state.season_history.iter().take(limit).cloned().collect()
}
