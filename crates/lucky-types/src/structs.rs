//! Persisted entity structs for one player's economy record.
//!
//! [`PlayerEconomyState`] is the root aggregate. It is serialised as a whole
//! to JSON and written under a single storage key; every other struct here is
//! one of its parts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Layer, Mutation, Rarity, Tier};

/// Schema version written by this build. Older records are migrated on load.
pub const SCHEMA_VERSION: u32 = 2;

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// One distinct card in the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CollectionEntry {
    /// Catalog key of the card.
    pub term_key: String,
    /// Copies owned in this run. Always at least 1 while the entry exists.
    pub copies: u32,
    /// Derived level, `max(1, floor(sqrt(copies)))`.
    pub level: u32,
    /// Highest mutation ever drawn for this card in this run.
    pub best_mutation: Mutation,
    /// When the entry last changed.
    pub updated_at: DateTime<Utc>,
}

impl CollectionEntry {
    /// Level for a copy count: `max(1, floor(sqrt(copies)))`.
    pub const fn level_for(copies: u32) -> u32 {
        let root = copies.isqrt();
        if root == 0 { 1 } else { root }
    }
}

/// Accumulated history of one card in one layer. Never shrinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LifetimeEntry {
    /// Layer the copies were drawn in.
    pub layer: Layer,
    /// Catalog key of the card.
    pub term_key: String,
    /// Total copies ever collected in that layer.
    pub copies: u64,
    /// Highest mutation ever collected in that layer.
    pub best_mutation: Mutation,
    /// First time the card was collected in that layer.
    pub first_collected_at: DateTime<Utc>,
    /// Most recent time the card was collected in that layer.
    pub last_collected_at: DateTime<Utc>,
}

/// A card lost from the current collection and not yet drawn again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StolenMarker {
    /// Layer the card was lost in.
    pub layer: Layer,
    /// Catalog key of the lost card.
    pub term_key: String,
    /// When the card was lost.
    pub stolen_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

/// A season window, derived from wall-clock time and the season duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SeasonWindow {
    /// Stable id, `season-YYYY-MM-DD` of the start date.
    pub id: String,
    /// Inclusive start.
    pub starts_at: DateTime<Utc>,
    /// Exclusive end.
    pub ends_at: DateTime<Utc>,
}

impl SeasonWindow {
    /// Whether `now` falls inside this window.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now && now < self.ends_at
    }
}

/// One row of the top-3 standings recorded with a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Standing {
    /// Finishing place, 1-based.
    pub place: u32,
    /// Display name at archive time.
    pub display_name: String,
    /// Final score.
    pub score: u64,
}

/// The most valuable card owned at the end of a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BestCard {
    /// Catalog key.
    pub term_key: String,
    /// Display name in the layer it was held in.
    pub term_name: String,
    /// Effective tier in that layer.
    pub tier: u8,
    /// Catalog rarity.
    pub rarity: Rarity,
    /// Best mutation held.
    pub mutation: Mutation,
    /// Copies held.
    pub copies: u32,
}

/// Immutable summary archived when a season ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SeasonHistoryEntry {
    /// Id of the archived season.
    pub season_id: String,
    /// Start of the archived season.
    pub starts_at: DateTime<Utc>,
    /// End of the archived season.
    pub ends_at: DateTime<Utc>,
    /// When the row was written.
    pub archived_at: DateTime<Utc>,
    /// Coins held at rollover.
    pub score: u64,
    /// Final rank.
    pub rank: u32,
    /// Players ranked in the season.
    pub total_players: u32,
    /// Layer the player finished in.
    pub layer: Layer,
    /// Best card owned at rollover, if any.
    pub best_card: Option<BestCard>,
    /// Top-3 standings.
    pub standings: Vec<Standing>,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Public-facing identity of the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Profile {
    /// First nickname word.
    pub nick_part_a: String,
    /// Second nickname word.
    pub nick_part_b: String,
    /// Third nickname word.
    pub nick_part_c: String,
    /// Name shown to other players.
    pub display_name: String,
    /// Whether the player chose a free-form display name.
    #[serde(default)]
    pub name_customized: bool,
    /// When the profile last changed.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Draw overrides
// ---------------------------------------------------------------------------

/// Caller-supplied draw override. Every field is optional and is validated
/// against the catalog and the closed enums before use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DrawOverride {
    /// Base tier to draw from.
    #[serde(default)]
    pub tier: Option<u8>,
    /// Exact card to draw.
    #[serde(default)]
    pub term_key: Option<String>,
    /// Rarity name.
    #[serde(default)]
    pub rarity: Option<String>,
    /// Mutation name.
    #[serde(default)]
    pub mutation: Option<String>,
}

impl DrawOverride {
    /// True when no field is set.
    pub const fn is_empty(&self) -> bool {
        self.tier.is_none()
            && self.term_key.is_none()
            && self.rarity.is_none()
            && self.mutation.is_none()
    }
}

/// A validated draw override, safe to store as the one-shot `next_reward`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ForcedDraw {
    /// Forced base tier.
    pub tier: Option<Tier>,
    /// Forced card key, known to exist in the catalog.
    pub term_key: Option<String>,
    /// Forced rarity.
    pub rarity: Option<Rarity>,
    /// Forced mutation.
    pub mutation: Option<Mutation>,
}

// ---------------------------------------------------------------------------
// Root aggregate
// ---------------------------------------------------------------------------

/// The whole economy record of one player.
///
/// Current-run fields (coins, levels, counters, `collection`) are reset by
/// season rollover and rebirth. `lifetime` and `season_history` survive both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerEconomyState {
    /// Record schema version.
    pub schema_version: u32,
    /// Spendable coin balance.
    pub coins: u64,
    /// Tier boost upgrade level.
    pub tier_boost_level: u32,
    /// Mutation upgrade level.
    pub mutation_level: u32,
    /// Value upgrade level.
    pub value_level: u32,
    /// Auto opener speed level.
    pub auto_speed_level: u32,
    /// Whether the auto opener has been bought.
    pub auto_unlocked: bool,
    /// Highest base tier currently drawable.
    pub highest_tier_unlocked: Tier,
    /// Packs opened this run, manual and auto.
    pub packs_opened: u64,
    /// Manually opened packs this run.
    pub manual_opens: u64,
    /// Auto-opened packs this run.
    pub auto_opens: u64,
    /// Fractional auto-open progress carried between ticks.
    pub auto_open_progress: f64,
    /// Fractional passive income carried between ticks.
    pub passive_progress: f64,
    /// Rebirths used this season, 0 or 1.
    pub rebirth_count: u8,
    /// Current prestige layer.
    pub active_layer: Layer,
    /// Last time idle accrual ran.
    pub last_tick_at: DateTime<Utc>,
    /// End of the current activity heartbeat window.
    pub active_until_at: DateTime<Utc>,
    /// When the record was first created.
    pub created_at: DateTime<Utc>,
    /// Last successful write.
    pub updated_at: DateTime<Utc>,
    /// Player identity.
    pub profile: Profile,
    /// Current-run collection keyed by card key.
    pub collection: BTreeMap<String, CollectionEntry>,
    /// Lifetime ledger keyed by `(layer, term_key)`.
    pub lifetime: Vec<LifetimeEntry>,
    /// Cards lost and not yet recollected.
    pub stolen: Vec<StolenMarker>,
    /// Season the record currently belongs to.
    pub season: SeasonWindow,
    /// Archived seasons, newest first.
    pub season_history: Vec<SeasonHistoryEntry>,
    /// One-shot debug override consumed by the next draw.
    pub next_reward: Option<ForcedDraw>,
}

impl PlayerEconomyState {
    /// A fresh record in layer 1 with an empty run.
    pub fn new(profile: Profile, season: SeasonWindow, initial_coins: u64, now: DateTime<Utc>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            coins: initial_coins,
            tier_boost_level: 0,
            mutation_level: 0,
            value_level: 0,
            auto_speed_level: 0,
            auto_unlocked: false,
            highest_tier_unlocked: Tier::FIRST,
            packs_opened: 0,
            manual_opens: 0,
            auto_opens: 0,
            auto_open_progress: 0.0,
            passive_progress: 0.0,
            rebirth_count: 0,
            active_layer: Layer::BASE,
            last_tick_at: now,
            active_until_at: now,
            created_at: now,
            updated_at: now,
            profile,
            collection: BTreeMap::new(),
            lifetime: Vec::new(),
            stolen: Vec::new(),
            season,
            season_history: Vec::new(),
            next_reward: None,
        }
    }

    /// Reset every current-run field: coins, upgrades, counters, accrual
    /// carries, the collection and any pending override. Layer, rebirth
    /// count, lifetime, stolen markers and history are left alone.
    pub fn reset_run(&mut self, initial_coins: u64, now: DateTime<Utc>) {
        self.coins = initial_coins;
        self.tier_boost_level = 0;
        self.mutation_level = 0;
        self.value_level = 0;
        self.auto_speed_level = 0;
        self.auto_unlocked = false;
        self.highest_tier_unlocked = Tier::FIRST;
        self.packs_opened = 0;
        self.manual_opens = 0;
        self.auto_opens = 0;
        self.auto_open_progress = 0.0;
        self.passive_progress = 0.0;
        self.collection.clear();
        self.next_reward = None;
        self.last_tick_at = now;
        self.updated_at = now;
    }

    /// Whether `term_key` has an open stolen marker in the active layer.
    pub fn is_stolen(&self, term_key: &str) -> bool {
        self.stolen
            .iter()
            .any(|m| m.layer == self.active_layer && m.term_key == term_key)
    }

    /// Lifetime entry for `(layer, term_key)`.
    pub fn lifetime_entry(&self, layer: Layer, term_key: &str) -> Option<&LifetimeEntry> {
        self.lifetime
            .iter()
            .find(|e| e.layer == layer && e.term_key == term_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_floor_sqrt_with_floor_of_one() {
        assert_eq!(CollectionEntry::level_for(0), 1);
        assert_eq!(CollectionEntry::level_for(1), 1);
        assert_eq!(CollectionEntry::level_for(3), 1);
        assert_eq!(CollectionEntry::level_for(4), 2);
        assert_eq!(CollectionEntry::level_for(8), 2);
        assert_eq!(CollectionEntry::level_for(9), 3);
        assert_eq!(CollectionEntry::level_for(100), 10);
        assert_eq!(CollectionEntry::level_for(99), 9);
        assert_eq!(CollectionEntry::level_for(u32::MAX), 65_535);
    }

    #[test]
    fn season_window_is_half_open() {
        let starts_at = DateTime::<Utc>::from_timestamp(0, 0).unwrap_or_default();
        let ends_at = DateTime::<Utc>::from_timestamp(60, 0).unwrap_or_default();
        let window = SeasonWindow {
            id: "season-test".to_owned(),
            starts_at,
            ends_at,
        };
        assert!(window.contains(starts_at));
        assert!(!window.contains(ends_at));
    }

    fn sample_state() -> PlayerEconomyState {
        let now = DateTime::<Utc>::from_timestamp(1_000, 0).unwrap_or_default();
        let profile = Profile {
            nick_part_a: "Amber".to_owned(),
            nick_part_b: "Agile".to_owned(),
            nick_part_c: "Fox".to_owned(),
            display_name: "Amber Agile Fox".to_owned(),
            name_customized: false,
            updated_at: now,
        };
        let season = SeasonWindow {
            id: "season-1970-01-05".to_owned(),
            starts_at: now,
            ends_at: now,
        };
        PlayerEconomyState::new(profile, season, 0, now)
    }

    #[test]
    fn reset_run_keeps_prestige_and_lifetime() {
        let mut state = sample_state();
        let now = state.created_at;
        state.coins = 500;
        state.tier_boost_level = 4;
        state.auto_unlocked = true;
        state.rebirth_count = 1;
        state.active_layer = Layer::REBORN;
        state.collection.insert(
            "hello_world".to_owned(),
            CollectionEntry {
                term_key: "hello_world".to_owned(),
                copies: 1,
                level: 1,
                best_mutation: Mutation::None,
                updated_at: now,
            },
        );
        state.lifetime.push(LifetimeEntry {
            layer: Layer::BASE,
            term_key: "hello_world".to_owned(),
            copies: 1,
            best_mutation: Mutation::None,
            first_collected_at: now,
            last_collected_at: now,
        });

        state.reset_run(0, now);

        assert_eq!(state.coins, 0);
        assert_eq!(state.tier_boost_level, 0);
        assert!(!state.auto_unlocked);
        assert!(state.collection.is_empty());
        assert_eq!(state.rebirth_count, 1);
        assert_eq!(state.active_layer, Layer::REBORN);
        assert_eq!(state.lifetime.len(), 1);
    }

    #[test]
    fn record_round_trips_through_json() {
        let state = sample_state();
        let json = serde_json::to_string(&state).unwrap_or_default();
        let back: Result<PlayerEconomyState, _> = serde_json::from_str(&json);
        assert!(back.is_ok());
        assert_eq!(back.ok(), Some(state));
    }

    #[test]
    fn empty_override_detected() {
        assert!(DrawOverride::default().is_empty());
        let o = DrawOverride {
            tier: Some(2),
            ..DrawOverride::default()
        };
        assert!(!o.is_empty());
    }
}
