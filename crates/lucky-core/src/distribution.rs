//! Weighted distributions for tier, rarity and mutation draws.
//!
//! Every table is normalized to percentages that sum to 100 (within
//! [`WEIGHT_EPSILON`]) and rounded to four decimals; the rounding remainder
//! goes to the last positive entry so the sum holds exactly. Tier, rarity and
//! mutation tables are computed independently and never mix.
//!
//! [`WEIGHT_EPSILON`]: crate::numeric::WEIGHT_EPSILON

use rand::Rng;

use lucky_types::{Mutation, Rarity, Tier};

use crate::config::BalanceConfig;
use crate::numeric::{WEIGHT_EPSILON, round4, weights_close};

// ---------------------------------------------------------------------------
// Weight map
// ---------------------------------------------------------------------------

/// An ordered `(key, weight)` table over a closed key set.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights<K> {
    entries: Vec<(K, f64)>,
}

impl<K: Copy + PartialEq> Weights<K> {
    /// Normalize raw weights to percentages. Negative weights count as zero;
    /// a table with no positive mass stays all-zero.
    pub fn normalized(raw: impl IntoIterator<Item = (K, f64)>) -> Self {
        let mut entries: Vec<(K, f64)> = raw
            .into_iter()
            .map(|(k, w)| (k, if w.is_finite() { w.max(0.0) } else { 0.0 }))
            .collect();
        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            for entry in &mut entries {
                entry.1 = 0.0;
            }
            return Self { entries };
        }
        for entry in &mut entries {
            entry.1 = round4(entry.1 / total * 100.0);
        }
        let mut weights = Self { entries };
        weights.absorb_remainder();
        weights
    }

    /// Wrap weights that are already percentages, without rescaling.
    pub fn from_percentages(entries: Vec<(K, f64)>) -> Self {
        Self { entries }
    }

    fn absorb_remainder(&mut self) {
        let remainder = 100.0 - self.total();
        if remainder.abs() <= f64::EPSILON {
            return;
        }
        if let Some(last) = self.entries.iter_mut().rev().find(|(_, w)| *w > 0.0) {
            last.1 = round4((last.1 + remainder).max(0.0));
        }
    }

    /// Weight of `key`, zero if absent.
    pub fn get(&self, key: K) -> f64 {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0.0, |(_, w)| *w)
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Whether the table sums to 100 within tolerance.
    pub fn is_normalized(&self) -> bool {
        (self.total() - 100.0).abs() <= WEIGHT_EPSILON
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &(K, f64)> {
        self.entries.iter()
    }

    /// Whether two tables agree entry by entry within tolerance.
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|((ka, wa), (kb, wb))| ka == kb && weights_close(*wa, *wb))
    }

    /// Pick a key with probability proportional to its weight.
    ///
    /// Zero-weight entries are never picked. If float error leaves the roll
    /// past the end, the last positive entry wins. Returns `None` only for a
    /// table with no positive weight.
    pub fn pick(&self, rng: &mut impl Rng) -> Option<K> {
        let positive: Vec<(K, f64)> = self
            .entries
            .iter()
            .copied()
            .filter(|(_, w)| *w > 0.0)
            .collect();
        let total: f64 = positive.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = rng.random::<f64>() * total;
        for (key, weight) in &positive {
            if roll < *weight {
                return Some(*key);
            }
            roll -= weight;
        }
        positive.last().map(|(k, _)| *k)
    }
}

// ---------------------------------------------------------------------------
// Tier weights
// ---------------------------------------------------------------------------

/// Normalized tier weights for a tier boost level, before unlock gating.
///
/// Selects the highest profile whose level is met, then inside the
/// equalization range blends linearly toward the flat target.
pub fn base_tier_weights(config: &BalanceConfig, tier_boost_level: u32) -> Weights<Tier> {
    let level = tier_boost_level.min(config.upgrades.caps.tier_boost);
    let profile = config
        .tiers
        .profiles
        .iter()
        .rev()
        .find(|p| p.level <= level)
        .map_or([100.0, 0.0, 0.0, 0.0, 0.0, 0.0], |p| p.weights);

    let eq = &config.tiers.equalization;
    let mut raw = profile;
    if level >= eq.start_level && eq.end_level > eq.start_level {
        let span = f64::from(eq.end_level.saturating_sub(eq.start_level));
        let done = f64::from(level.min(eq.end_level).saturating_sub(eq.start_level));
        let progress = (done / span).clamp(0.0, 1.0);
        for (slot, target) in raw.iter_mut().zip(eq.target.iter()) {
            *slot += (*target - *slot) * progress;
        }
    }

    Weights::normalized(Tier::ALL.into_iter().zip(raw))
}

/// Highest base tier unlocked at a tier boost level.
///
/// Tiers unlock in order; the scan stops at the first unmet requirement.
pub fn highest_unlocked_tier(config: &BalanceConfig, tier_boost_level: u32) -> Tier {
    let mut highest = Tier::FIRST;
    for tier in Tier::ALL {
        if tier_boost_level >= config.tiers.unlock_level(tier) {
            highest = tier;
        } else {
            break;
        }
    }
    highest
}

/// Tier weights actually used for draws.
///
/// Mass on tiers above the highest unlocked tier is redistributed to the
/// unlocked tiers in proportion to their weight. If the unlocked tiers carry
/// no weight at all, the highest unlocked tier gets 100%.
pub fn effective_tier_weights(config: &BalanceConfig, tier_boost_level: u32) -> Weights<Tier> {
    let highest = highest_unlocked_tier(config, tier_boost_level);
    let base = base_tier_weights(config, tier_boost_level);

    let (unlocked, locked): (Vec<&(Tier, f64)>, Vec<&(Tier, f64)>) =
        base.iter().partition(|(tier, _)| *tier <= highest);
    let unlocked_total: f64 = unlocked.iter().map(|(_, w)| w).sum();
    let locked_total: f64 = locked.iter().map(|(_, w)| w).sum();

    if unlocked_total <= 0.0 {
        return Weights::from_percentages(
            Tier::ALL
                .into_iter()
                .map(|t| (t, if t == highest { 100.0 } else { 0.0 }))
                .collect(),
        );
    }

    Weights::normalized(Tier::ALL.into_iter().map(|tier| {
        let weight = base.get(tier);
        if tier <= highest {
            (tier, weight + locked_total * (weight / unlocked_total))
        } else {
            (tier, 0.0)
        }
    }))
}

/// The next tier boost level whose base tier odds differ from the current
/// level's, or `None` if the odds never change again before the cap.
pub fn next_tier_odds_change_level(config: &BalanceConfig, tier_boost_level: u32) -> Option<u32> {
    let current = base_tier_weights(config, tier_boost_level);
    let cap = config.upgrades.caps.tier_boost;
    let start = tier_boost_level.checked_add(1)?;
    (start..=cap).find(|level| !base_tier_weights(config, *level).approx_eq(&current))
}

/// Progress toward the next tier unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierUnlockProgress {
    /// Highest tier unlocked now.
    pub highest: Tier,
    /// The next tier to unlock, `None` once every tier is open.
    pub next: Option<Tier>,
    /// Tier boost level that unlocks `next`.
    pub required_level: Option<u32>,
    /// Tier boost levels still needed.
    pub remaining_levels: u32,
}

/// Where a tier boost level stands relative to the next unlock.
pub fn tier_unlock_progress(config: &BalanceConfig, tier_boost_level: u32) -> TierUnlockProgress {
    let highest = highest_unlocked_tier(config, tier_boost_level);
    let next = highest.number().checked_add(1).and_then(Tier::new);
    let required_level = next.map(|t| config.tiers.unlock_level(t));
    TierUnlockProgress {
        highest,
        next,
        required_level,
        remaining_levels: required_level.map_or(0, |r| r.saturating_sub(tier_boost_level)),
    }
}

// ---------------------------------------------------------------------------
// Rarity weights
// ---------------------------------------------------------------------------

/// Progress of the value shift for `tier` at `value_level`, in `[0, 1]`.
///
/// Tier index `i` starts moving after `i * tier_step_levels` levels and
/// arrives at the target at the shift cap.
pub fn value_shift_progress(config: &BalanceConfig, tier: Tier, value_level: u32) -> f64 {
    let shift = &config.rarity.value_shift;
    let index = u32::try_from(tier.index()).unwrap_or(u32::MAX);
    let offset = index.saturating_mul(shift.tier_step_levels);
    if offset >= shift.cap {
        return 0.0;
    }
    let effective = value_level.min(shift.cap);
    let span = f64::from(shift.cap.saturating_sub(offset));
    let done = f64::from(effective.saturating_sub(offset));
    (done / span).clamp(0.0, 1.0)
}

/// Rarity weights for a draw from `tier` at `value_level`.
///
/// Common and rare move linearly from the tier's normalized base toward the
/// normalized target; legendary takes whatever remains of 100.
pub fn rarity_weights(config: &BalanceConfig, tier: Tier, value_level: u32) -> Weights<Rarity> {
    let base = Weights::normalized(Rarity::ALL.into_iter().zip(config.rarity.base_for(tier)));
    let target = Weights::normalized(
        Rarity::ALL
            .into_iter()
            .zip(config.rarity.value_shift.target),
    );
    let progress = value_shift_progress(config, tier, value_level);

    let lerp = |r: Rarity| {
        let from = base.get(r);
        round4((target.get(r) - from).mul_add(progress, from))
    };
    let common = lerp(Rarity::Common);
    let rare = lerp(Rarity::Rare);
    let legendary = round4((100.0 - common - rare).max(0.0));

    Weights::from_percentages(vec![
        (Rarity::Common, common),
        (Rarity::Rare, rare),
        (Rarity::Legendary, legendary),
    ])
}

// ---------------------------------------------------------------------------
// Mutation weights
// ---------------------------------------------------------------------------

/// Mutation weights at `mutation_level`: base plus a linear per-level shift
/// (levels past the cap add nothing), renormalized.
pub fn mutation_weights(config: &BalanceConfig, mutation_level: u32) -> Weights<Mutation> {
    let m = f64::from(mutation_level.min(config.mutation.cap));
    let raw = config
        .mutation
        .base
        .iter()
        .zip(config.mutation.shift_per_level.iter())
        .map(|(base, shift)| shift.mul_add(m, *base));
    Weights::normalized(Mutation::ALL.into_iter().zip(raw))
}

/// Passive coins per second for a collection, given each card's best mutation.
pub fn passive_rate(config: &BalanceConfig, best_mutations: impl IntoIterator<Item = Mutation>) -> u64 {
    best_mutations
        .into_iter()
        .map(|m| config.mutation.passive_rate(m))
        .fold(0_u64, u64::saturating_add)
}
