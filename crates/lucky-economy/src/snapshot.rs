//! Snapshot builder.

use chrono::{DateTime, Utc};
use lucky_core::{BalanceConfig, Catalog};
use lucky_types::{PlayerEconomyState, Snapshot, SnapshotMeta, StateView};

use crate::collection::{lifetime_summary, passive_rate_cps, sorted_terms, stolen_terms};

/// Run counters and levels of `state`.
pub fn state_view(config: &BalanceConfig, state: &PlayerEconomyState) -> StateView {
    StateView {
        coins: state.coins,
        tier_boost_level: state.tier_boost_level,
        mutation_level: state.mutation_level,
        value_level: state.value_level,
        auto_speed_level: state.auto_speed_level,
        auto_unlocked: state.auto_unlocked,
        highest_tier_unlocked: state.highest_tier_unlocked,
        packs_opened: state.packs_opened,
        manual_opens: state.manual_opens,
        auto_opens: state.auto_opens,
        auto_open_progress: state.auto_open_progress,
        passive_rate_cps: passive_rate_cps(config, state),
        rebirth_count: state.rebirth_count,
        active_layer: state.active_layer,
        last_tick_at: state.last_tick_at,
        active_until_at: state.active_until_at,
        updated_at: state.updated_at,
    }
}

/// Full caller view of `state` at `now`.
pub fn build_snapshot(
    config: &BalanceConfig,
    catalog: &Catalog,
    state: &PlayerEconomyState,
    now: DateTime<Utc>,
    debug_allowed: bool,
) -> Snapshot {
    Snapshot {
        state: state_view(config, state),
        profile: state.profile.clone(),
        terms: sorted_terms(state),
        season: state.season.clone(),
        stolen_terms: stolen_terms(state),
        lifetime: lifetime_summary(state, catalog),
        season_history: state.season_history.clone(),
        meta: SnapshotMeta {
            server_now: now,
            debug_allowed,
        },
    }
}
