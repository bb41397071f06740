//! Caller-facing shapes: the player snapshot and per-operation results.
//!
//! Every facade operation returns a [`Snapshot`] of the record after the
//! operation, plus one of the result structs below describing what changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DrawSource, Layer, Mutation, Rarity, Tier, UpgradeKey};
use crate::structs::{CollectionEntry, LifetimeEntry, Profile, SeasonHistoryEntry, SeasonWindow};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Counters and levels of the current run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StateView {
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
    /// Whether the auto opener is owned.
    pub auto_unlocked: bool,
    /// Highest drawable base tier.
    pub highest_tier_unlocked: Tier,
    /// Packs opened this run.
    pub packs_opened: u64,
    /// Manual opens this run.
    pub manual_opens: u64,
    /// Auto opens this run.
    pub auto_opens: u64,
    /// Fractional auto-open progress.
    pub auto_open_progress: f64,
    /// Passive income in coins per second from mutated cards.
    pub passive_rate_cps: u64,
    /// Rebirths used this season.
    pub rebirth_count: u8,
    /// Current prestige layer.
    pub active_layer: Layer,
    /// Last accrual tick.
    pub last_tick_at: DateTime<Utc>,
    /// End of the activity heartbeat window.
    pub active_until_at: DateTime<Utc>,
    /// Last successful write.
    pub updated_at: DateTime<Utc>,
}

/// Collection progress within one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LayerProgress {
    /// The layer.
    pub layer: Layer,
    /// Distinct cards ever collected in the layer.
    pub collected: usize,
    /// Cards in the catalog.
    pub total: usize,
}

/// Highest effective tier ever collected in one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LayerHighest {
    /// The layer.
    pub layer: Layer,
    /// Highest effective tier, or `None` if nothing was collected.
    pub tier: Option<u8>,
}

/// Lifetime collection across all layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LifetimeSummary {
    /// Distinct `(layer, card)` pairs ever collected.
    pub total_unique: usize,
    /// Per-layer progress, layer 1 first.
    pub per_layer: Vec<LayerProgress>,
    /// Every lifetime entry, layer then key order.
    pub cards: Vec<LifetimeEntry>,
    /// Highest effective tier per layer.
    pub highest_per_layer: Vec<LayerHighest>,
}

/// Request metadata echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SnapshotMeta {
    /// The `now` the operation ran at.
    pub server_now: DateTime<Utc>,
    /// Whether debug actions were authorised for the call.
    pub debug_allowed: bool,
}

/// Full view of one player's economy after an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// Run counters and levels.
    pub state: StateView,
    /// Player identity.
    pub profile: Profile,
    /// Current collection, by level desc, copies desc, key asc.
    pub terms: Vec<CollectionEntry>,
    /// Current season window.
    pub season: SeasonWindow,
    /// Keys of cards lost in the active layer.
    pub stolen_terms: Vec<String>,
    /// Lifetime collection summary.
    pub lifetime: LifetimeSummary,
    /// Archived seasons, newest first.
    pub season_history: Vec<SeasonHistoryEntry>,
    /// Request metadata.
    pub meta: SnapshotMeta,
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// One resolved pack draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DrawResult {
    /// Drawn card key.
    pub term_key: String,
    /// Display name in the active layer.
    pub term_name: String,
    /// Rarity of the draw.
    pub rarity: Rarity,
    /// Mutation of the draw.
    pub mutation: Mutation,
    /// Base tier drawn.
    pub tier: Tier,
    /// Tier as reported in the active layer.
    pub effective_tier: u8,
    /// Layer the draw happened in.
    pub layer: Layer,
    /// Coins credited.
    pub reward: u64,
    /// Copies now owned.
    pub copies: u32,
    /// Card level after the draw.
    pub level: u32,
    /// Best mutation now owned for the card.
    pub best_mutation: Mutation,
    /// What triggered the draw.
    pub source: DrawSource,
    /// Whether a debug override shaped the draw.
    pub debug_applied: bool,
}

/// A completed upgrade purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PurchaseResult {
    /// Upgrade bought.
    pub upgrade_key: UpgradeKey,
    /// Coins deducted.
    pub spent: u64,
    /// Level after the purchase (1 for the auto unlock).
    pub new_level: u32,
}

/// Outcome of removing a card from the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LossResult {
    /// Card targeted.
    pub term_key: String,
    /// False when the card was not in the collection.
    pub removed: bool,
    /// Layer the loss was recorded in.
    pub layer: Layer,
}

/// A completed rebirth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RebirthResult {
    /// Rebirths used this season after the transition.
    pub rebirth_count: u8,
    /// Layer left.
    pub from_layer: Layer,
    /// Layer entered.
    pub to_layer: Layer,
}

/// A completed missing-card gift purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GiftResult {
    /// Granted card key.
    pub term_key: String,
    /// Display name in the active layer.
    pub term_name: String,
    /// Base tier of the card.
    pub tier: Tier,
    /// Catalog rarity of the card.
    pub rarity: Rarity,
    /// Coins deducted.
    pub cost: u64,
    /// Always [`DrawSource::ShopGift`].
    pub source: DrawSource,
}

/// What idle accrual did during a tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SyncReport {
    /// Auto draws resolved.
    pub draws_applied: u64,
    /// The last auto draw, if any.
    pub last_draw: Option<DrawResult>,
    /// Highest effective tier among the auto draws, 0 if none.
    pub max_tier_drawn: u8,
    /// Passive coins credited.
    pub passive_coins: u64,
}
