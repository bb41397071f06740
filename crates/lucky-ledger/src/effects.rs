//! What an upgrade level does, in numbers and in shop labels.

use std::fmt::Write as _;

use lucky_core::BalanceConfig;
use lucky_core::distribution::{
    effective_tier_weights, mutation_weights, next_tier_odds_change_level, rarity_weights,
};
use lucky_types::{Mutation, PlayerEconomyState, Rarity, Tier, UpgradeKey};
use serde::Serialize;

use crate::upgrades::{can_buy, is_effectively_maxed, upgrade_cap, upgrade_cost, upgrade_level};

/// Seconds between auto opens at `auto_speed_level`.
pub fn auto_open_interval_seconds(config: &BalanceConfig, auto_speed_level: u32) -> f64 {
    let auto = &config.auto_open;
    let level = f64::from(auto_speed_level.min(config.upgrades.caps.auto_speed));
    auto.interval_reduction_per_level_seconds
        .mul_add(-level, auto.base_interval_seconds)
        .max(auto.min_interval_seconds)
}

/// Auto opens per second, or 0 while the opener is locked.
pub fn auto_opens_per_second(config: &BalanceConfig, state: &PlayerEconomyState) -> f64 {
    if !state.auto_unlocked {
        return 0.0;
    }
    let interval = auto_open_interval_seconds(config, state.auto_speed_level);
    if interval > 0.0 { interval.recip() } else { 0.0 }
}

/// Short human label for `key` at `level`.
pub fn effect_label(config: &BalanceConfig, key: UpgradeKey, level: u32) -> String {
    match key {
        UpgradeKey::AutoUnlock => {
            if level > 0 {
                "Auto opener on".to_owned()
            } else {
                "Auto opener off".to_owned()
            }
        }
        UpgradeKey::AutoSpeed => {
            format!("1 pack every {:.1}s", auto_open_interval_seconds(config, level))
        }
        UpgradeKey::TierBoost => {
            let weights = effective_tier_weights(config, level);
            let mut label = String::new();
            for (tier, weight) in weights.iter().filter(|(_, w)| *w > 0.0) {
                if !label.is_empty() {
                    label.push_str(" / ");
                }
                let _ = write!(label, "{tier} {weight:.1}%");
            }
            label
        }
        UpgradeKey::MutationUpgrade => {
            let weights = mutation_weights(config, level);
            format!(
                "Foil {:.2}% / Holo {:.2}%",
                weights.get(Mutation::Foil),
                weights.get(Mutation::Holo)
            )
        }
        UpgradeKey::ValueUpgrade => {
            let first = rarity_weights(config, Tier::FIRST, level);
            let last = rarity_weights(config, Tier::LAST, level);
            format!(
                "Legendary {:.2}% ({}) / {:.2}% ({})",
                first.get(Rarity::Legendary),
                Tier::FIRST,
                last.get(Rarity::Legendary),
                Tier::LAST
            )
        }
    }
}

/// Everything the shop shows for one upgrade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradePreview {
    /// The upgrade.
    pub key: UpgradeKey,
    /// Current level.
    pub level: u32,
    /// Hard cap.
    pub cap: u32,
    /// Price of the next level, `None` when maxed.
    pub cost: Option<u64>,
    /// Whether the player can buy it right now.
    pub affordable: bool,
    /// Whether another level would be a no-op.
    pub maxed: bool,
    /// Effect at the current level.
    pub current: String,
    /// Effect after one more level, `None` when maxed.
    pub next: Option<String>,
    /// For `tier_boost`, the next level whose base tier odds move.
    pub next_change_level: Option<u32>,
}

/// Build the shop preview of `key` for `state`.
pub fn upgrade_preview(config: &BalanceConfig, state: &PlayerEconomyState, key: UpgradeKey) -> UpgradePreview {
    let level = upgrade_level(state, key);
    let maxed = is_effectively_maxed(config, state, key);
    let next = if maxed {
        None
    } else {
        Some(effect_label(config, key, level.saturating_add(1)))
    };
    let next_change_level = match key {
        UpgradeKey::TierBoost => next_tier_odds_change_level(config, state.tier_boost_level),
        _ => None,
    };

    UpgradePreview {
        key,
        level,
        cap: upgrade_cap(config, key),
        cost: upgrade_cost(config, state, key),
        affordable: can_buy(config, state, key),
        maxed,
        current: effect_label(config, key, level),
        next,
        next_change_level,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use lucky_types::{Profile, SeasonWindow};

    use super::*;

    fn state(coins: u64) -> PlayerEconomyState {
        let now = DateTime::<Utc>::from_timestamp(0, 0).unwrap_or_default();
        let profile = Profile {
            nick_part_a: "Ruby".to_owned(),
            nick_part_b: "Calm".to_owned(),
            nick_part_c: "Heron".to_owned(),
            display_name: "Ruby Calm Heron".to_owned(),
            name_customized: false,
            updated_at: now,
        };
        let season = SeasonWindow {
            id: "season-1969-12-29".to_owned(),
            starts_at: now,
            ends_at: now,
        };
        PlayerEconomyState::new(profile, season, coins, now)
    }

    #[test]
    fn interval_shrinks_to_floor() {
        let config = BalanceConfig::default();
        for (level, expected) in [(0, 2.5), (1, 2.0), (2, 1.5), (3, 1.0), (4, 0.5)] {
            assert!((auto_open_interval_seconds(&config, level) - expected).abs() < 1e-9);
        }
        assert!((auto_open_interval_seconds(&config, 9) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn opens_per_second_requires_unlock() {
        let config = BalanceConfig::default();
        let mut s = state(0);
        assert!(auto_opens_per_second(&config, &s).abs() < f64::EPSILON);
        s.auto_unlocked = true;
        assert!((auto_opens_per_second(&config, &s) - 0.4).abs() < 1e-9);
        s.auto_speed_level = 4;
        assert!((auto_opens_per_second(&config, &s) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn labels_describe_levels() {
        let config = BalanceConfig::default();
        assert_eq!(effect_label(&config, UpgradeKey::AutoUnlock, 0), "Auto opener off");
        assert_eq!(effect_label(&config, UpgradeKey::AutoSpeed, 1), "1 pack every 2.0s");
        assert_eq!(effect_label(&config, UpgradeKey::TierBoost, 0), "T1 100.0%");
        assert_eq!(effect_label(&config, UpgradeKey::TierBoost, 1), "T1 90.0% / T2 10.0%");
        assert_eq!(
            effect_label(&config, UpgradeKey::MutationUpgrade, 0),
            "Foil 4.00% / Holo 0.60%"
        );
    }

    #[test]
    fn preview_reports_cost_and_next_effect() {
        let config = BalanceConfig::default();
        let s = state(30);
        let preview = upgrade_preview(&config, &s, UpgradeKey::TierBoost);
        assert_eq!(preview.level, 0);
        assert_eq!(preview.cap, 20);
        assert_eq!(preview.cost, Some(25));
        assert!(preview.affordable);
        assert!(!preview.maxed);
        assert_eq!(preview.next.as_deref(), Some("T1 90.0% / T2 10.0%"));
        assert_eq!(preview.next_change_level, Some(1));

        let speed = upgrade_preview(&config, &s, UpgradeKey::AutoSpeed);
        assert!(!speed.affordable);
        assert_eq!(speed.next_change_level, None);
    }

    #[test]
    fn maxed_preview_has_no_next() {
        let config = BalanceConfig::default();
        let mut s = state(0);
        s.auto_unlocked = true;
        let preview = upgrade_preview(&config, &s, UpgradeKey::AutoUnlock);
        assert!(preview.maxed);
        assert_eq!(preview.cost, None);
        assert_eq!(preview.next, None);
        assert_eq!(preview.current, "Auto opener on");
    }
}
