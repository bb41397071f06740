//! Upgrade progression ledger for the Lucky Agent pack economy.
//!
//! Every coin a player spends on the shop passes through this crate. The
//! ledger answers four questions about an upgrade (current level, cap, next
//! cost, affordability) and applies a purchase as a single transaction:
//! every precondition is checked before coins or levels change.
//!
//! # Architecture
//!
//! - [`upgrades`] -- Levels, caps, cost curves, the mutation cost floor,
//!   no-op detection and [`apply_upgrade`].
//! - [`effects`] -- What a level does: auto opener speed, effect labels and
//!   shop previews.
//!
//! # Cost rules
//!
//! | Upgrade | Cost at level `n` |
//! |---------|-------------------|
//! | `auto_unlock` | flat `unlock_cost`, once |
//! | `auto_speed` | `floor(base * growth^n)`, needs `auto_unlock` |
//! | `tier_boost` | `floor(base * growth^n)` |
//! | `mutation_upgrade` | `max(curve, floor rule)` |
//! | `value_upgrade` | `floor(base * growth^n)` |
//!
//! `tier_boost` and `value_upgrade` report themselves maxed once no later
//! level would change the odds a player sees, even below the numeric cap.
//!
//! # Usage
//!
//! ```
//! use chrono::{DateTime, Utc};
//! use lucky_core::BalanceConfig;
//! use lucky_ledger::{apply_upgrade, upgrade_cost};
//! use lucky_types::{PlayerEconomyState, Profile, SeasonWindow, UpgradeKey};
//!
//! let now = DateTime::<Utc>::from_timestamp(0, 0).unwrap_or_default();
//! let profile = Profile {
//!     nick_part_a: "Amber".to_owned(),
//!     nick_part_b: "Agile".to_owned(),
//!     nick_part_c: "Fox".to_owned(),
//!     display_name: "Amber Agile Fox".to_owned(),
//!     name_customized: false,
//!     updated_at: now,
//! };
//! let season = SeasonWindow { id: "season-1969-12-29".to_owned(), starts_at: now, ends_at: now };
//! let mut state = PlayerEconomyState::new(profile, season, 1_000, now);
//! let config = BalanceConfig::default();
//!
//! assert_eq!(upgrade_cost(&config, &state, UpgradeKey::TierBoost), Some(25));
//! let purchase = apply_upgrade(&config, &mut state, UpgradeKey::TierBoost);
//! assert!(purchase.is_ok());
//! assert_eq!(state.coins, 975);
//! assert_eq!(state.tier_boost_level, 1);
//! assert_eq!(state.highest_tier_unlocked.number(), 2);
//! ```

pub mod effects;
pub mod upgrades;

pub use effects::{UpgradePreview, auto_open_interval_seconds, auto_opens_per_second, effect_label, upgrade_preview};
pub use upgrades::{
    apply_upgrade, can_buy, check_purchase, curve_cost, is_effectively_maxed, mutation_cost_floor,
    upgrade_cap, upgrade_cost, upgrade_level,
};

use lucky_types::UpgradeKey;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Reasons a purchase is refused. Raised before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The upgrade is at its cap, or further levels would change nothing.
    #[error("upgrade {key} is already maxed")]
    AlreadyMaxed {
        /// The upgrade.
        key: UpgradeKey,
    },

    /// Auto speed was bought before the auto opener.
    #[error("unlock the auto opener before buying {key}")]
    AutoOpenerLocked {
        /// The upgrade.
        key: UpgradeKey,
    },

    /// The balance does not cover the price.
    #[error("not enough coins for {key}: need {needed}, have {available}")]
    InsufficientCoins {
        /// The upgrade.
        key: UpgradeKey,
        /// Price of the next level.
        needed: u64,
        /// Current balance.
        available: u64,
    },
}
