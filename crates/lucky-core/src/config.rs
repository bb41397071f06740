//! Balance configuration for the pack economy.
//!
//! The shipped balance lives in `lucky-balance.yaml` at the project root.
//! Every struct here mirrors a section of that file and defaults to the
//! shipped value, so a partial YAML only overrides what it names. A
//! [`BalanceConfig`] is an immutable value passed into every pure function;
//! there is no global instance.
//!
//! Weight tables are fixed-size arrays indexed by the closed enums:
//! tiers by [`Tier::index`], rarities and mutations by their rank.

use std::path::Path;

use serde::Deserialize;

use lucky_types::{Mutation, Rarity, TIER_COUNT, Tier, UpgradeKey};

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but breaks a balance invariant.
    #[error("invalid balance config at {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level balance configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceConfig {
    /// Identifier of this balance revision, echoed in logs.
    #[serde(default = "default_version")]
    pub version: String,

    /// Coins a fresh run starts with.
    #[serde(default)]
    pub initial_coins: u64,

    /// Upper bound on seconds of idle accrual per tick.
    #[serde(default = "default_idle_cap_seconds")]
    pub idle_cap_seconds: u64,

    /// Activity heartbeat window.
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,

    /// Season timing.
    #[serde(default)]
    pub season: SeasonConfig,

    /// Tier odds and unlocks.
    #[serde(default)]
    pub tiers: TierConfig,

    /// Rarity odds per tier.
    #[serde(default)]
    pub rarity: RarityConfig,

    /// Mutation odds and passive income.
    #[serde(default)]
    pub mutation: MutationConfig,

    /// Reward multipliers.
    #[serde(default)]
    pub reward: RewardConfig,

    /// Auto opener timing.
    #[serde(default)]
    pub auto_open: AutoOpenConfig,

    /// Upgrade caps and cost curves.
    #[serde(default)]
    pub upgrades: UpgradeConfig,

    /// Missing-card gift pricing.
    #[serde(default)]
    pub gift: GiftConfig,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            initial_coins: 0,
            idle_cap_seconds: default_idle_cap_seconds(),
            heartbeat: HeartbeatConfig::default(),
            season: SeasonConfig::default(),
            tiers: TierConfig::default(),
            rarity: RarityConfig::default(),
            mutation: MutationConfig::default(),
            reward: RewardConfig::default(),
            auto_open: AutoOpenConfig::default(),
            upgrades: UpgradeConfig::default(),
            gift: GiftConfig::default(),
        }
    }
}

impl BalanceConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if a balance invariant fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a balance invariant fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        tracing::debug!(version = %config.version, "balance config loaded");
        Ok(config)
    }

    /// Check the balance invariants every consumer relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first failing field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.heartbeat.validate()?;
        self.season.validate()?;
        self.tiers.validate(self.upgrades.caps.tier_boost)?;
        self.rarity.validate()?;
        self.mutation.validate()?;
        self.reward.validate()?;
        self.auto_open.validate()?;
        self.upgrades.validate()?;
        Ok(())
    }

    /// Heartbeat window in seconds, clamped into its allowed range.
    pub fn heartbeat_window_seconds(&self) -> u64 {
        self.heartbeat
            .window_seconds
            .clamp(self.heartbeat.min_window_seconds, self.heartbeat.max_window_seconds)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_weights(field: &'static str, weights: &[f64]) -> Result<(), ConfigError> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(invalid(field, "weights must be finite and non-negative"));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(invalid(field, "weights must have positive mass"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Heartbeat
// ---------------------------------------------------------------------------

/// Activity heartbeat window. Each interaction extends `active_until_at` by
/// `window_seconds`, clamped to `[min_window_seconds, max_window_seconds]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeartbeatConfig {
    /// Seconds each interaction keeps the player active.
    #[serde(default = "default_heartbeat_window")]
    pub window_seconds: u64,
    /// Lower clamp.
    #[serde(default = "default_heartbeat_min")]
    pub min_window_seconds: u64,
    /// Upper clamp.
    #[serde(default = "default_heartbeat_max")]
    pub max_window_seconds: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_heartbeat_window(),
            min_window_seconds: default_heartbeat_min(),
            max_window_seconds: default_heartbeat_max(),
        }
    }
}

impl HeartbeatConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_window_seconds == 0 || self.min_window_seconds > self.max_window_seconds {
            return Err(invalid(
                "heartbeat",
                "min_window_seconds must be positive and not above max_window_seconds",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// Season timing. Windows are aligned to `anchor_unix_seconds` (a Monday
/// 00:00 UTC) and last `duration_days`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeasonConfig {
    /// Season length in days.
    #[serde(default = "default_season_days")]
    pub duration_days: u32,
    /// Unix timestamp all windows are aligned to.
    #[serde(default = "default_season_anchor")]
    pub anchor_unix_seconds: i64,
    /// Maximum archived seasons kept on the record.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            duration_days: default_season_days(),
            anchor_unix_seconds: default_season_anchor(),
            history_limit: default_history_limit(),
        }
    }
}

impl SeasonConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_days == 0 {
            return Err(invalid("season.duration_days", "must be positive"));
        }
        if self.history_limit == 0 {
            return Err(invalid("season.history_limit", "must be positive"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Raw tier weights selected once `tier_boost_level >= level`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierProfile {
    /// Minimum tier boost level for this profile.
    pub level: u32,
    /// Raw weight per tier, tier 1 first.
    pub weights: [f64; TIER_COUNT],
}

/// Linear blend of the top profile toward a flat target over a level range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierEqualization {
    /// Level where blending starts (progress 0).
    pub start_level: u32,
    /// Level where blending completes (progress 1).
    pub end_level: u32,
    /// Target weight per tier.
    pub target: [f64; TIER_COUNT],
}

/// Tier odds and unlock gating.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Profiles in ascending `level` order. The first must be level 0.
    pub profiles: Vec<TierProfile>,
    /// Blend applied on top of the selected profile.
    pub equalization: TierEqualization,
    /// Minimum tier boost level to unlock each tier, tier 1 first.
    pub unlock_levels: [u32; TIER_COUNT],
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            profiles: vec![
                TierProfile {
                    level: 0,
                    weights: [100.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                },
                TierProfile {
                    level: 1,
                    weights: [90.0, 10.0, 0.0, 0.0, 0.0, 0.0],
                },
                TierProfile {
                    level: 4,
                    weights: [78.0, 14.0, 8.0, 0.0, 0.0, 0.0],
                },
                TierProfile {
                    level: 7,
                    weights: [66.0, 16.0, 11.0, 7.0, 0.0, 0.0],
                },
                TierProfile {
                    level: 10,
                    weights: [53.0, 18.0, 14.0, 10.0, 5.0, 0.0],
                },
                TierProfile {
                    level: 13,
                    weights: [41.0, 17.0, 16.0, 13.0, 8.0, 5.0],
                },
            ],
            equalization: TierEqualization {
                start_level: 13,
                end_level: 20,
                target: [8.0, 10.0, 12.0, 16.0, 22.0, 32.0],
            },
            unlock_levels: [0, 1, 4, 7, 10, 13],
        }
    }
}

impl TierConfig {
    fn validate(&self, tier_boost_cap: u32) -> Result<(), ConfigError> {
        match self.profiles.first() {
            Some(first) if first.level == 0 => {}
            _ => return Err(invalid("tiers.profiles", "first profile must be level 0")),
        }
        if self.profiles.windows(2).any(|w| match w {
            [a, b] => a.level >= b.level,
            _ => false,
        }) {
            return Err(invalid("tiers.profiles", "levels must be strictly ascending"));
        }
        for profile in &self.profiles {
            check_weights("tiers.profiles.weights", &profile.weights)?;
        }

        let eq = &self.equalization;
        if eq.start_level >= eq.end_level || eq.end_level > tier_boost_cap {
            return Err(invalid(
                "tiers.equalization",
                "start_level < end_level <= tier_boost cap required",
            ));
        }
        check_weights("tiers.equalization.target", &eq.target)?;

        if self.unlock_levels.first() != Some(&0) {
            return Err(invalid("tiers.unlock_levels", "tier 1 must unlock at level 0"));
        }
        if self.unlock_levels.windows(2).any(|w| match w {
            [a, b] => a > b,
            _ => false,
        }) {
            return Err(invalid("tiers.unlock_levels", "must be non-decreasing"));
        }
        Ok(())
    }

    /// Unlock level of `tier`.
    pub fn unlock_level(&self, tier: Tier) -> u32 {
        self.unlock_levels.get(tier.index()).copied().unwrap_or(u32::MAX)
    }
}

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// Interpolation of rarity odds toward a flat target as value level rises.
///
/// For tier index `i`, progress starts after `i * tier_step_levels` levels
/// and reaches 1 at `cap`, so higher tiers flatten later.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValueShift {
    /// Level where every tier reaches the target.
    pub cap: u32,
    /// Extra levels of delay per tier index.
    pub tier_step_levels: u32,
    /// Target weight per rarity.
    pub target: [f64; 3],
}

/// Rarity odds per tier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RarityConfig {
    /// Base weights (common, rare, legendary) per tier, tier 1 first.
    pub weights_by_tier: [[f64; 3]; TIER_COUNT],
    /// Value-level driven flattening.
    pub value_shift: ValueShift,
}

impl Default for RarityConfig {
    fn default() -> Self {
        let third = 100.0 / 3.0;
        Self {
            weights_by_tier: [
                [77.0, 20.0, 3.0],
                [79.5, 18.5, 2.0],
                [82.0, 16.5, 1.5],
                [84.5, 14.5, 1.0],
                [87.0, 12.2, 0.8],
                [89.5, 9.9, 0.6],
            ],
            value_shift: ValueShift {
                cap: 25,
                tier_step_levels: 4,
                target: [third, third, third],
            },
        }
    }
}

impl RarityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for weights in &self.weights_by_tier {
            check_weights("rarity.weights_by_tier", weights)?;
        }
        check_weights("rarity.value_shift.target", &self.value_shift.target)?;
        if self.value_shift.cap == 0 {
            return Err(invalid("rarity.value_shift.cap", "must be positive"));
        }
        Ok(())
    }

    /// Base weights for `tier`.
    pub fn base_for(&self, tier: Tier) -> [f64; 3] {
        self.weights_by_tier
            .get(tier.index())
            .copied()
            .unwrap_or([100.0, 0.0, 0.0])
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// Mutation odds and passive income.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Base weights (none, foil, holo).
    pub base: [f64; 3],
    /// Weight added per mutation level (none, foil, holo).
    pub shift_per_level: [f64; 3],
    /// Level beyond which the shift stops growing.
    pub cap: u32,
    /// Passive coins per second per card at each best mutation.
    pub passive_income_per_second: [u64; 3],
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            base: [95.4, 4.0, 0.6],
            shift_per_level: [-2.016, 1.44, 0.576],
            cap: 25,
            passive_income_per_second: [0, 1, 3],
        }
    }
}

impl MutationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_weights("mutation.base", &self.base)?;
        if self.shift_per_level.iter().any(|s| !s.is_finite()) {
            return Err(invalid("mutation.shift_per_level", "must be finite"));
        }
        Ok(())
    }

    /// Passive income per second for one card whose best mutation is `mutation`.
    pub fn passive_rate(&self, mutation: Mutation) -> u64 {
        self.passive_income_per_second
            .get(usize::from(mutation.rank()))
            .copied()
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Reward
// ---------------------------------------------------------------------------

/// Reward formula constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Multiplier per rarity (common, rare, legendary).
    pub rarity_multipliers: [f64; 3],
    /// Multiplier per mutation (none, foil, holo).
    pub mutation_multipliers: [f64; 3],
    /// Scale from catalog base value to coins, floored.
    pub card_base_value_factor: f64,
    /// Additive reward bonus per value level.
    pub value_multiplier_per_level: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            rarity_multipliers: [1.0, 1.8, 4.5],
            mutation_multipliers: [1.0, 1.0, 1.0],
            card_base_value_factor: 0.06,
            value_multiplier_per_level: 0.0,
        }
    }
}

impl RewardConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [self.card_base_value_factor, self.value_multiplier_per_level];
        let all = self
            .rarity_multipliers
            .iter()
            .chain(self.mutation_multipliers.iter())
            .chain(scalars.iter());
        for value in all {
            if !value.is_finite() || *value < 0.0 {
                return Err(invalid("reward", "multipliers must be finite and non-negative"));
            }
        }
        let non_decreasing = |m: &[f64; 3]| match m {
            [a, b, c] => a <= b && b <= c,
        };
        if !non_decreasing(&self.rarity_multipliers) || !non_decreasing(&self.mutation_multipliers)
        {
            return Err(invalid("reward", "multipliers must not decrease with rank"));
        }
        Ok(())
    }

    /// Multiplier for `rarity`.
    pub fn rarity_multiplier(&self, rarity: Rarity) -> f64 {
        self.rarity_multipliers
            .get(usize::from(rarity.rank()))
            .copied()
            .unwrap_or(1.0)
    }

    /// Multiplier for `mutation`.
    pub fn mutation_multiplier(&self, mutation: Mutation) -> f64 {
        self.mutation_multipliers
            .get(usize::from(mutation.rank()))
            .copied()
            .unwrap_or(1.0)
    }
}

// ---------------------------------------------------------------------------
// Auto opener
// ---------------------------------------------------------------------------

/// Auto opener pricing and speed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutoOpenConfig {
    /// Flat price of the auto unlock.
    pub unlock_cost: u64,
    /// Seconds between opens at speed level 0.
    pub base_interval_seconds: f64,
    /// Seconds removed per speed level.
    pub interval_reduction_per_level_seconds: f64,
    /// Fastest allowed interval.
    pub min_interval_seconds: f64,
}

impl Default for AutoOpenConfig {
    fn default() -> Self {
        Self {
            unlock_cost: 100,
            base_interval_seconds: 2.5,
            interval_reduction_per_level_seconds: 0.5,
            min_interval_seconds: 0.5,
        }
    }
}

impl AutoOpenConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_interval_seconds > 0.0 && self.base_interval_seconds >= self.min_interval_seconds)
        {
            return Err(invalid(
                "auto_open",
                "0 < min_interval_seconds <= base_interval_seconds required",
            ));
        }
        if !(self.interval_reduction_per_level_seconds >= 0.0) {
            return Err(invalid(
                "auto_open.interval_reduction_per_level_seconds",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Upgrades
// ---------------------------------------------------------------------------

/// Hard level cap per upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpgradeCaps {
    /// Auto unlock (a flag, so 1).
    pub auto_unlock: u32,
    /// Auto speed.
    pub auto_speed: u32,
    /// Tier boost.
    pub tier_boost: u32,
    /// Mutation upgrade.
    pub mutation_upgrade: u32,
    /// Value upgrade.
    pub value_upgrade: u32,
}

impl Default for UpgradeCaps {
    fn default() -> Self {
        Self {
            auto_unlock: 1,
            auto_speed: 4,
            tier_boost: 20,
            mutation_upgrade: 25,
            value_upgrade: 25,
        }
    }
}

impl UpgradeCaps {
    /// Cap for `key`.
    pub const fn for_key(&self, key: UpgradeKey) -> u32 {
        match key {
            UpgradeKey::AutoUnlock => self.auto_unlock,
            UpgradeKey::AutoSpeed => self.auto_speed,
            UpgradeKey::TierBoost => self.tier_boost,
            UpgradeKey::MutationUpgrade => self.mutation_upgrade,
            UpgradeKey::ValueUpgrade => self.value_upgrade,
        }
    }
}

/// Exponential cost curve, `floor(base * growth^level)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CostCurve {
    /// Cost at level 0.
    pub base: f64,
    /// Growth factor per level.
    pub growth: f64,
}

/// Cost curve per level-based upgrade.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpgradeCurves {
    /// Auto speed.
    pub auto_speed: CostCurve,
    /// Tier boost.
    pub tier_boost: CostCurve,
    /// Mutation upgrade.
    pub mutation_upgrade: CostCurve,
    /// Value upgrade.
    pub value_upgrade: CostCurve,
}

impl Default for UpgradeCurves {
    fn default() -> Self {
        Self {
            auto_speed: CostCurve {
                base: 250.0,
                growth: 1.45,
            },
            tier_boost: CostCurve {
                base: 25.0,
                growth: 1.42,
            },
            mutation_upgrade: CostCurve {
                base: 32.0,
                growth: 1.38,
            },
            value_upgrade: CostCurve {
                base: 40.0,
                growth: 1.4,
            },
        }
    }
}

impl UpgradeCurves {
    /// Curve for `key`; the auto unlock has a flat price instead.
    pub const fn for_key(&self, key: UpgradeKey) -> Option<CostCurve> {
        match key {
            UpgradeKey::AutoUnlock => None,
            UpgradeKey::AutoSpeed => Some(self.auto_speed),
            UpgradeKey::TierBoost => Some(self.tier_boost),
            UpgradeKey::MutationUpgrade => Some(self.mutation_upgrade),
            UpgradeKey::ValueUpgrade => Some(self.value_upgrade),
        }
    }
}

/// Minimum mutation upgrade cost once holo odds pass a threshold.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MutationCostFloor {
    /// Holo percent above which the floor applies.
    pub threshold_holo_percent: f64,
    /// Holo percent per floor step.
    pub step_percent: f64,
    /// Coins per floor step.
    pub min_cost_per_step: u64,
}

impl Default for MutationCostFloor {
    fn default() -> Self {
        Self {
            threshold_holo_percent: 4.0,
            step_percent: 2.0,
            min_cost_per_step: 8000,
        }
    }
}

/// Upgrade caps, curves and the mutation floor.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    /// Hard caps.
    pub caps: UpgradeCaps,
    /// Cost curves.
    pub curves: UpgradeCurves,
    /// Mutation cost floor.
    pub mutation_cost_floor: MutationCostFloor,
}

impl UpgradeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.caps.auto_unlock != 1 {
            return Err(invalid("upgrades.caps.auto_unlock", "must be 1"));
        }
        for key in UpgradeKey::ALL {
            if let Some(curve) = self.curves.for_key(key) {
                if !(curve.base >= 1.0 && curve.growth > 1.0 && curve.growth.is_finite()) {
                    return Err(invalid(
                        "upgrades.curves",
                        format!("{key}: base >= 1 and growth > 1 required"),
                    ));
                }
            }
        }
        if !(self.mutation_cost_floor.step_percent > 0.0) {
            return Err(invalid(
                "upgrades.mutation_cost_floor.step_percent",
                "must be positive",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Gift
// ---------------------------------------------------------------------------

/// Missing-card gift pricing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GiftConfig {
    /// Flat coin price of one missing card.
    #[serde(default = "default_gift_cost")]
    pub missing_card_cost: u64,
}

impl Default for GiftConfig {
    fn default() -> Self {
        Self {
            missing_card_cost: default_gift_cost(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "packs-v3".to_owned()
}

const fn default_idle_cap_seconds() -> u64 {
    12 * 60 * 60
}

const fn default_heartbeat_window() -> u64 {
    15
}

const fn default_heartbeat_min() -> u64 {
    5
}

const fn default_heartbeat_max() -> u64 {
    120
}

const fn default_season_days() -> u32 {
    7
}

/// Monday 1970-01-05 00:00 UTC.
const fn default_season_anchor() -> i64 {
    4 * 24 * 60 * 60
}

const fn default_history_limit() -> usize {
    52
}

const fn default_gift_cost() -> u64 {
    25_000
}
