//! Upgrade levels, caps, costs and the purchase transaction.

use lucky_core::BalanceConfig;
use lucky_core::config::CostCurve;
use lucky_core::distribution::{effective_tier_weights, highest_unlocked_tier, mutation_weights, rarity_weights};
use lucky_core::numeric::{ceil_to_u64, floor_to_u64};
use lucky_types::{Mutation, PlayerEconomyState, PurchaseResult, Tier, UpgradeKey};

use crate::LedgerError;

/// Current level of `key`. The auto unlock reads as 0 or 1.
pub const fn upgrade_level(state: &PlayerEconomyState, key: UpgradeKey) -> u32 {
    match key {
        UpgradeKey::AutoUnlock => {
            if state.auto_unlocked {
                1
            } else {
                0
            }
        }
        UpgradeKey::AutoSpeed => state.auto_speed_level,
        UpgradeKey::TierBoost => state.tier_boost_level,
        UpgradeKey::MutationUpgrade => state.mutation_level,
        UpgradeKey::ValueUpgrade => state.value_level,
    }
}

/// Hard cap of `key`.
pub const fn upgrade_cap(config: &BalanceConfig, key: UpgradeKey) -> u32 {
    config.upgrades.caps.for_key(key)
}

/// `floor(base * growth^level)`, saturating.
pub fn curve_cost(curve: CostCurve, level: u32) -> u64 {
    let exponent = i32::try_from(level).unwrap_or(i32::MAX);
    floor_to_u64(curve.base * curve.growth.powi(exponent))
}

/// Minimum price of the mutation level `next_level`.
///
/// Zero while holo odds at `next_level` stay at or under the threshold;
/// above it, `ceil((holo - threshold) / step) * min_cost_per_step`.
pub fn mutation_cost_floor(config: &BalanceConfig, next_level: u32) -> u64 {
    let floor = &config.upgrades.mutation_cost_floor;
    let holo = mutation_weights(config, next_level).get(Mutation::Holo);
    let excess = holo - floor.threshold_holo_percent;
    if excess <= 0.0 || floor.step_percent <= 0.0 {
        return 0;
    }
    ceil_to_u64(excess / floor.step_percent).saturating_mul(floor.min_cost_per_step)
}

/// Whether buying another level of `key` would be a no-op.
///
/// True at the hard cap. For `tier_boost` and `value_upgrade` it is also true
/// when no level up to the cap changes the odds the player sees: tier odds
/// (including unlocks) for the first, rarity odds in any tier or the reward
/// multiplier for the second.
pub fn is_effectively_maxed(config: &BalanceConfig, state: &PlayerEconomyState, key: UpgradeKey) -> bool {
    let level = upgrade_level(state, key);
    let cap = upgrade_cap(config, key);
    if level >= cap {
        return true;
    }
    let Some(first_next) = level.checked_add(1) else {
        return true;
    };
    match key {
        UpgradeKey::TierBoost => {
            let current = effective_tier_weights(config, level);
            (first_next..=cap).all(|next| effective_tier_weights(config, next).approx_eq(&current))
        }
        UpgradeKey::ValueUpgrade => {
            if config.reward.value_multiplier_per_level > 0.0 {
                return false;
            }
            (first_next..=cap).all(|next| {
                Tier::ALL.into_iter().all(|tier| {
                    rarity_weights(config, tier, next).approx_eq(&rarity_weights(config, tier, level))
                })
            })
        }
        UpgradeKey::AutoUnlock | UpgradeKey::AutoSpeed | UpgradeKey::MutationUpgrade => false,
    }
}

/// Price of the next level of `key`, or `None` when it is maxed.
pub fn upgrade_cost(config: &BalanceConfig, state: &PlayerEconomyState, key: UpgradeKey) -> Option<u64> {
    if is_effectively_maxed(config, state, key) {
        return None;
    }
    let level = upgrade_level(state, key);
    let Some(curve) = config.upgrades.curves.for_key(key) else {
        return Some(config.auto_open.unlock_cost);
    };
    let cost = curve_cost(curve, level);
    if key == UpgradeKey::MutationUpgrade {
        let floor = mutation_cost_floor(config, level.saturating_add(1));
        return Some(cost.max(floor));
    }
    Some(cost)
}

/// Verify every purchase precondition and return the price.
///
/// # Errors
///
/// [`LedgerError::AlreadyMaxed`], [`LedgerError::AutoOpenerLocked`] or
/// [`LedgerError::InsufficientCoins`], checked in that order.
pub fn check_purchase(config: &BalanceConfig, state: &PlayerEconomyState, key: UpgradeKey) -> Result<u64, LedgerError> {
    let cost = upgrade_cost(config, state, key).ok_or(LedgerError::AlreadyMaxed { key })?;
    if key == UpgradeKey::AutoSpeed && !state.auto_unlocked {
        return Err(LedgerError::AutoOpenerLocked { key });
    }
    if state.coins < cost {
        return Err(LedgerError::InsufficientCoins {
            key,
            needed: cost,
            available: state.coins,
        });
    }
    Ok(cost)
}

/// Whether `key` can be bought right now.
pub fn can_buy(config: &BalanceConfig, state: &PlayerEconomyState, key: UpgradeKey) -> bool {
    check_purchase(config, state, key).is_ok()
}

/// Buy one level of `key`: deduct the price, raise the level (or set the
/// auto unlock flag) and recompute the highest unlocked tier.
///
/// # Errors
///
/// Any [`check_purchase`] error; the state is untouched in that case.
pub fn apply_upgrade(
    config: &BalanceConfig,
    state: &mut PlayerEconomyState,
    key: UpgradeKey,
) -> Result<PurchaseResult, LedgerError> {
    let cost = check_purchase(config, state, key)?;
    state.coins = state.coins.saturating_sub(cost);

    match key {
        UpgradeKey::AutoUnlock => state.auto_unlocked = true,
        UpgradeKey::AutoSpeed => state.auto_speed_level = state.auto_speed_level.saturating_add(1),
        UpgradeKey::TierBoost => state.tier_boost_level = state.tier_boost_level.saturating_add(1),
        UpgradeKey::MutationUpgrade => state.mutation_level = state.mutation_level.saturating_add(1),
        UpgradeKey::ValueUpgrade => state.value_level = state.value_level.saturating_add(1),
    }
    state.highest_tier_unlocked = highest_unlocked_tier(config, state.tier_boost_level);

    let new_level = upgrade_level(state, key);
    tracing::debug!(upgrade = %key, spent = cost, level = new_level, "upgrade purchased");

    Ok(PurchaseResult {
        upgrade_key: key,
        spent: cost,
        new_level,
    })
}
