//! Idle accrual and the activity heartbeat.
//!
//! Time only counts while the player is active: each interaction pushes
//! `active_until_at` a heartbeat window into the future, and accrual uses
//! `min(now, active_until_at) - last_tick_at`, capped at the idle cap.
//! Passive income is credited first, then the auto opener resolves its
//! whole opens. Both carry their fractional remainder to the next tick.

use chrono::{DateTime, TimeDelta, Utc};
use lucky_core::numeric::{floor_to_u64, u64_to_f64};
use lucky_ledger::auto_opens_per_second;
use lucky_types::{DrawSource, PlayerEconomyState, SyncReport};
use rand::Rng;
use tracing::debug;

use crate::collection::passive_rate_cps;
use crate::error::EconomyError;
use crate::resolver::{DrawContext, open_pack};

/// Push the heartbeat window to at least `now + window`.
pub fn extend_heartbeat(state: &mut PlayerEconomyState, window_seconds: u64, now: DateTime<Utc>) {
    let window = i64::try_from(window_seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX);
    let until = now.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC);
    if until > state.active_until_at {
        state.active_until_at = until;
    }
}

/// Seconds of active time since the last tick, capped at `idle_cap_seconds`.
pub fn active_elapsed_seconds(state: &PlayerEconomyState, idle_cap_seconds: u64, now: DateTime<Utc>) -> f64 {
    let end = now.min(state.active_until_at);
    let millis = end.signed_duration_since(state.last_tick_at).num_milliseconds();
    if millis <= 0 {
        return 0.0;
    }
    let seconds = u64_to_f64(millis.unsigned_abs()) / 1000.0;
    seconds.min(u64_to_f64(idle_cap_seconds))
}

/// Run one accrual tick: passive income, then auto opens, then move
/// `last_tick_at` to `now`.
///
/// # Errors
///
/// Propagates auto draw failures. The caller discards the record on error.
pub fn accrue(ctx: &DrawContext<'_>, state: &mut PlayerEconomyState, rng: &mut impl Rng) -> Result<SyncReport, EconomyError> {
    let elapsed = active_elapsed_seconds(state, ctx.config.idle_cap_seconds, ctx.now);
    let mut report = SyncReport::default();

    if elapsed > 0.0 {
        let rate = passive_rate_cps(ctx.config, state);
        if rate > 0 {
            let earned = u64_to_f64(rate).mul_add(elapsed, state.passive_progress.max(0.0));
            let whole = floor_to_u64(earned);
            state.passive_progress = (earned - u64_to_f64(whole)).max(0.0);
            state.coins = state.coins.saturating_add(whole);
            report.passive_coins = whole;
        }

        if state.auto_unlocked {
            let per_second = auto_opens_per_second(ctx.config, state);
            let progress = per_second.mul_add(elapsed, state.auto_open_progress.max(0.0));
            let whole = floor_to_u64(progress);
            state.auto_open_progress = (progress - u64_to_f64(whole)).max(0.0);

            for _ in 0..whole {
                let draw = open_pack(ctx, state, DrawSource::Auto, None, rng)?;
                report.max_tier_drawn = report.max_tier_drawn.max(draw.effective_tier);
                report.draws_applied = report.draws_applied.saturating_add(1);
                report.last_draw = Some(draw);
            }
        }
    }

    state.last_tick_at = ctx.now;
    if report.draws_applied > 0 || report.passive_coins > 0 {
        debug!(
            elapsed_seconds = elapsed,
            passive_coins = report.passive_coins,
            auto_draws = report.draws_applied,
            "idle accrual applied"
        );
    }
    Ok(report)
}
