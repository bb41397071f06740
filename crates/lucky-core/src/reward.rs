//! Coin reward for a single drawn card.
//!
//! `reward = floor(max(1, floor(base_bp * factor) * rarity * mutation * value))`
//! where `value = 1 + value_level * value_multiplier_per_level`. Every card
//! pays at least one coin.

use lucky_types::{Mutation, Rarity};

use crate::config::RewardConfig;
use crate::numeric::{floor_to_u64, u64_to_f64};

/// Scaled base value of a card, `floor(base_bp * card_base_value_factor)`.
pub fn base_card_value(config: &RewardConfig, base_bp: u32) -> u64 {
    floor_to_u64(f64::from(base_bp) * config.card_base_value_factor)
}

/// Reward multiplier contributed by the value upgrade.
pub fn value_multiplier(config: &RewardConfig, value_level: u32) -> f64 {
    f64::from(value_level).mul_add(config.value_multiplier_per_level, 1.0)
}

/// Coins paid for drawing a card.
pub fn card_reward(
    config: &RewardConfig,
    base_bp: u32,
    rarity: Rarity,
    mutation: Mutation,
    value_level: u32,
) -> u64 {
    let scaled = u64_to_f64(base_card_value(config, base_bp))
        * config.rarity_multiplier(rarity)
        * config.mutation_multiplier(mutation)
        * value_multiplier(config, value_level);
    floor_to_u64(scaled.max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RewardConfig {
        RewardConfig::default()
    }

    #[test]
    fn common_plain_card_at_level_zero() {
        assert_eq!(card_reward(&config(), 100, Rarity::Common, Mutation::None, 0), 6);
        assert_eq!(card_reward(&config(), 60, Rarity::Common, Mutation::None, 0), 3);
        assert_eq!(card_reward(&config(), 69, Rarity::Common, Mutation::None, 0), 4);
    }

    #[test]
    fn reward_never_drops_below_one() {
        assert_eq!(card_reward(&config(), 0, Rarity::Common, Mutation::None, 0), 1);
        assert_eq!(card_reward(&config(), 10, Rarity::Common, Mutation::None, 0), 1);
    }

    #[test]
    fn reward_is_monotonic_in_rarity_and_mutation() {
        let config = config();
        for base_bp in [60, 100, 250, 491] {
            let mut previous = 0;
            for rarity in Rarity::ALL {
                for mutation in Mutation::ALL {
                    let reward = card_reward(&config, base_bp, rarity, mutation, 0);
                    assert!(reward >= previous, "{base_bp} {rarity} {mutation}");
                    previous = reward;
                }
            }
        }
    }

    #[test]
    fn legendary_holo_beats_common_plain() {
        let mut config = config();
        config.mutation_multipliers = [1.0, 1.5, 2.0];
        let plain = card_reward(&config, 100, Rarity::Common, Mutation::None, 0);
        let best = card_reward(&config, 100, Rarity::Legendary, Mutation::Holo, 0);
        assert!(best > plain);
        assert_eq!(best, 54);
    }

    #[test]
    fn value_level_scales_when_configured() {
        let mut config = config();
        assert_eq!(card_reward(&config, 100, Rarity::Common, Mutation::None, 10), 6);
        config.value_multiplier_per_level = 0.1;
        assert_eq!(card_reward(&config, 100, Rarity::Common, Mutation::None, 10), 12);
        let mut previous = 0;
        for level in 0..=25 {
            let reward = card_reward(&config, 100, Rarity::Rare, Mutation::None, level);
            assert!(reward >= previous);
            previous = reward;
        }
    }
}
