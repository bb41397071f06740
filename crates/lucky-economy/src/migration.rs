//! One-shot upgrade of pre-versioned records.
//!
//! Records written before [`SCHEMA_VERSION`] 2 carry `luck_level` beside
//! (or instead of) `value_level`, `eggs_opened` instead of `packs_opened`,
//! a `terms` array instead of the keyed collection, and no lifetime ledger.
//! [`migrate_legacy`] turns such a record into a current one exactly once,
//! at load time, so the rest of the engine never coalesces old fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lucky_core::distribution::highest_unlocked_tier;
use lucky_core::{BalanceConfig, Catalog};
use lucky_ledger::upgrade_cap;
use lucky_types::{
    CollectionEntry, Layer, LifetimeEntry, Mutation, PlayerEconomyState, Profile, SCHEMA_VERSION, SeasonWindow,
    UpgradeKey,
};
use rand::Rng;
use serde::Deserialize;
use tracing::warn;

use crate::profile::random_profile;

/// A record as older builds wrote it. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyRecord {
    /// Coin balance.
    pub coins: Option<u64>,
    /// Retired name of the value level.
    pub luck_level: Option<u32>,
    /// Value level, when the record already had it.
    pub value_level: Option<u32>,
    /// Mutation level.
    pub mutation_level: Option<u32>,
    /// Tier boost level.
    pub tier_boost_level: Option<u32>,
    /// Auto opener flag.
    pub auto_unlocked: Option<bool>,
    /// Auto speed level.
    pub auto_speed_level: Option<u32>,
    /// Packs opened.
    pub packs_opened: Option<u64>,
    /// Retired name of `packs_opened`.
    pub eggs_opened: Option<u64>,
    /// Manual opens.
    pub manual_opens: Option<u64>,
    /// Auto opens.
    pub auto_opens: Option<u64>,
    /// Fractional auto-open progress.
    pub auto_open_progress: Option<f64>,
    /// Last accrual tick.
    pub last_tick_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Collection rows.
    pub terms: Vec<LegacyTerm>,
    /// Profile, possibly partial.
    pub profile: Option<LegacyProfile>,
}

/// One collection row of a legacy record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyTerm {
    /// Card key.
    pub term_key: String,
    /// Copies owned.
    pub copies: u32,
    /// Best mutation name.
    #[serde(alias = "bestMutation")]
    pub best_mutation: Option<String>,
    /// Last change.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Profile of a legacy record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyProfile {
    /// First nickname word.
    pub nick_part_a: Option<String>,
    /// Second nickname word.
    pub nick_part_b: Option<String>,
    /// Third nickname word.
    pub nick_part_c: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Last change.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Whether a decoded JSON value is already a current record.
pub fn is_current(value: &serde_json::Value) -> bool {
    value
        .get("schema_version")
        .and_then(serde_json::Value::as_u64)
        .is_some_and(|v| v == u64::from(SCHEMA_VERSION))
}

/// Build a current record from `legacy`.
///
/// Levels are clamped to their caps, `value_level` takes the larger of the
/// value and luck levels, collection rows with unknown keys or no copies are
/// dropped, card levels are recomputed from copies and the lifetime ledger is
/// seeded from the surviving rows in layer 1. The profile is generated with
/// `rng` when the legacy one is missing or incomplete.
pub fn migrate_legacy(
    config: &BalanceConfig,
    catalog: &Catalog,
    legacy: LegacyRecord,
    season: SeasonWindow,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> PlayerEconomyState {
    let created_at = legacy.created_at.unwrap_or(now);
    let profile = migrate_profile(legacy.profile, rng, now);

    let mut state = PlayerEconomyState::new(profile, season, legacy.coins.unwrap_or(config.initial_coins), now);
    state.created_at = created_at;
    state.last_tick_at = legacy.last_tick_at.unwrap_or(now).min(now);
    state.active_until_at = state.last_tick_at;

    let clamp = |key: UpgradeKey, level: Option<u32>| level.unwrap_or(0).min(upgrade_cap(config, key));
    state.tier_boost_level = clamp(UpgradeKey::TierBoost, legacy.tier_boost_level);
    state.mutation_level = clamp(UpgradeKey::MutationUpgrade, legacy.mutation_level);
    state.value_level = clamp(
        UpgradeKey::ValueUpgrade,
        legacy.value_level.max(legacy.luck_level),
    );
    state.auto_speed_level = clamp(UpgradeKey::AutoSpeed, legacy.auto_speed_level);
    state.auto_unlocked = legacy.auto_unlocked.unwrap_or(false);
    state.highest_tier_unlocked = highest_unlocked_tier(config, state.tier_boost_level);

    state.packs_opened = legacy.packs_opened.or(legacy.eggs_opened).unwrap_or(0);
    state.manual_opens = legacy.manual_opens.unwrap_or(0);
    state.auto_opens = legacy.auto_opens.unwrap_or(0);
    state.auto_open_progress = legacy
        .auto_open_progress
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
        .max(0.0);

    let mut dropped = 0_usize;
    let mut collection = BTreeMap::new();
    for row in legacy.terms {
        if row.copies == 0 || !catalog.contains(&row.term_key) {
            dropped = dropped.saturating_add(1);
            continue;
        }
        let best_mutation = row
            .best_mutation
            .as_deref()
            .and_then(|m| m.parse::<Mutation>().ok())
            .unwrap_or(Mutation::None);
        let updated_at = row.updated_at.unwrap_or(created_at);
        let entry = collection
            .entry(row.term_key.clone())
            .or_insert_with(|| CollectionEntry {
                term_key: row.term_key.clone(),
                copies: 0,
                level: 1,
                best_mutation,
                updated_at,
            });
        entry.copies = entry.copies.saturating_add(row.copies);
        entry.level = CollectionEntry::level_for(entry.copies);
        entry.best_mutation = entry.best_mutation.best(best_mutation);
        entry.updated_at = entry.updated_at.max(updated_at);
    }

    state.lifetime = collection
        .values()
        .map(|entry| LifetimeEntry {
            layer: Layer::BASE,
            term_key: entry.term_key.clone(),
            copies: u64::from(entry.copies),
            best_mutation: entry.best_mutation,
            first_collected_at: entry.updated_at,
            last_collected_at: entry.updated_at,
        })
        .collect();
    state.collection = collection;

    warn!(
        kept_terms = state.collection.len(),
        dropped_terms = dropped,
        value_level = state.value_level,
        "migrated legacy economy record"
    );
    state
}

fn migrate_profile(legacy: Option<LegacyProfile>, rng: &mut impl Rng, now: DateTime<Utc>) -> Profile {
    let Some(LegacyProfile {
        nick_part_a: Some(a),
        nick_part_b: Some(b),
        nick_part_c: Some(c),
        display_name,
        updated_at,
    }) = legacy
    else {
        return random_profile(rng, now);
    };

    let display_name = display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("{a} {b} {c}"));
    let name_customized = display_name != format!("{a} {b} {c}");
    Profile {
        nick_part_a: a,
        nick_part_b: b,
        nick_part_c: c,
        display_name,
        name_customized,
        updated_at: updated_at.unwrap_or(now),
    }
}
