//! Enumeration types for the pack economy.
//!
//! Closed sets (rarity, mutation, upgrade key, card source) are Rust enums so
//! weight tables and match arms stay exhaustive. Tiers and layers are small
//! bounded integers and are modelled as validated newtypes.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Number of base pack tiers in one layer.
pub const TIER_COUNT: usize = 6;

/// Error returned when a string does not name a member of a closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    /// Which set was being parsed (e.g. `"rarity"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// A base pack tier, `1..=TIER_COUNT`.
///
/// The tier a card is catalogued under. Layer 2 reports an *effective* tier
/// offset by the tier count, but the base tier never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Tier(u8);

impl Tier {
    /// The lowest tier, always unlocked.
    pub const FIRST: Self = Self(1);

    /// The highest base tier.
    #[allow(clippy::cast_possible_truncation)]
    pub const LAST: Self = Self(TIER_COUNT as u8);

    /// Every base tier in ascending order.
    pub const ALL: [Self; TIER_COUNT] = [Self(1), Self(2), Self(3), Self(4), Self(5), Self(6)];

    /// Build a tier from its number, rejecting anything outside `1..=6`.
    pub fn new(number: u8) -> Option<Self> {
        let max = u8::try_from(TIER_COUNT).ok()?;
        (1..=max).contains(&number).then_some(Self(number))
    }

    /// The tier number (1-based).
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index for fixed-size per-tier tables.
    pub const fn index(self) -> usize {
        self.0.saturating_sub(1) as usize
    }

    /// The tier number as reported in `layer`.
    pub fn effective(self, layer: Layer) -> u8 {
        let offset = u8::try_from(TIER_COUNT)
            .unwrap_or(u8::MAX)
            .saturating_mul(layer.number().saturating_sub(1));
        self.0.saturating_add(offset)
    }
}

impl Default for Tier {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// Prestige layer. Layer 1 is the base run; rebirth moves a player to layer 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Layer(u8);

impl Layer {
    /// The base layer every season starts in.
    pub const BASE: Self = Self(1);

    /// The post-rebirth layer.
    pub const REBORN: Self = Self(2);

    /// Every layer in ascending order.
    pub const ALL: [Self; 2] = [Self::BASE, Self::REBORN];

    /// Build a layer from its number, rejecting anything but 1 or 2.
    pub const fn new(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::BASE),
            2 => Some(Self::REBORN),
            _ => None,
        }
    }

    /// The layer number.
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::BASE
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// Card rarity within a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Rarity {
    /// The bulk of every tier.
    Common,
    /// Mid-value cards.
    Rare,
    /// One per tier; absorbs rounding remainder in weight tables.
    Legendary,
}

impl Rarity {
    /// Every rarity in ascending rank.
    pub const ALL: [Self; 3] = [Self::Common, Self::Rare, Self::Legendary];

    /// Ordinal rank (common = 0).
    pub const fn rank(self) -> u8 {
        match self {
            Self::Common => 0,
            Self::Rare => 1,
            Self::Legendary => 2,
        }
    }

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Legendary => "legendary",
        }
    }
}

impl FromStr for Rarity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "legendary" => Ok(Self::Legendary),
            _ => Err(ParseEnumError {
                kind: "rarity",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// Cosmetic card mutation. Foil and holo cards also pay passive income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Mutation {
    /// Plain card.
    #[default]
    None,
    /// Foil finish.
    Foil,
    /// Holographic finish.
    Holo,
}

impl Mutation {
    /// Every mutation in ascending rank.
    pub const ALL: [Self; 3] = [Self::None, Self::Foil, Self::Holo];

    /// Ordinal rank (none = 0).
    pub const fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Foil => 1,
            Self::Holo => 2,
        }
    }

    /// The higher-ranked of two mutations.
    pub const fn best(self, other: Self) -> Self {
        if other.rank() > self.rank() { other } else { self }
    }

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Foil => "foil",
            Self::Holo => "holo",
        }
    }
}

impl FromStr for Mutation {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "foil" => Ok(Self::Foil),
            "holo" => Ok(Self::Holo),
            _ => Err(ParseEnumError {
                kind: "mutation",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Upgrade keys
// ---------------------------------------------------------------------------

/// A purchasable shop upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum UpgradeKey {
    /// One-shot unlock of the auto opener.
    AutoUnlock,
    /// Shortens the auto opener interval. Requires [`UpgradeKey::AutoUnlock`].
    AutoSpeed,
    /// Shifts tier odds upward and unlocks higher tiers.
    TierBoost,
    /// Shifts mutation odds toward foil and holo.
    MutationUpgrade,
    /// Flattens rarity odds and scales rewards.
    ValueUpgrade,
}

impl UpgradeKey {
    /// Every upgrade in shop order.
    pub const ALL: [Self; 5] = [
        Self::AutoUnlock,
        Self::AutoSpeed,
        Self::TierBoost,
        Self::MutationUpgrade,
        Self::ValueUpgrade,
    ];

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoUnlock => "auto_unlock",
            Self::AutoSpeed => "auto_speed",
            Self::TierBoost => "tier_boost",
            Self::MutationUpgrade => "mutation_upgrade",
            Self::ValueUpgrade => "value_upgrade",
        }
    }
}

/// Parses current names and the retired shop keys (`luck_engine`,
/// `value_engine`, `mutation_lab`) that older clients still send.
impl FromStr for UpgradeKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto_unlock" => Ok(Self::AutoUnlock),
            "auto_speed" => Ok(Self::AutoSpeed),
            "tier_boost" => Ok(Self::TierBoost),
            "mutation_upgrade" | "mutation_lab" => Ok(Self::MutationUpgrade),
            "value_upgrade" | "value_engine" | "luck_engine" => Ok(Self::ValueUpgrade),
            _ => Err(ParseEnumError {
                kind: "upgrade key",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for UpgradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Card source
// ---------------------------------------------------------------------------

/// How a card entered the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DrawSource {
    /// Player-initiated pack open.
    #[default]
    Manual,
    /// Drawn by the auto opener during accrual.
    Auto,
    /// Bought through the missing-card gift.
    ShopGift,
}

impl DrawSource {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Auto => "auto",
            Self::ShopGift => "shop_gift",
        }
    }
}
