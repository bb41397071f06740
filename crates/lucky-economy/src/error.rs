//! Error types for the economy engine.
//!
//! Every failure is raised before the record is written, so a caller that
//! gets an error can retry with the record exactly as it was. Callers branch
//! on [`EconomyError::kind`] rather than on individual variants.

use lucky_core::{CatalogError, ClockError};
use lucky_ledger::LedgerError;
use lucky_types::{Layer, UpgradeKey};

use crate::store::StoreError;

/// Coarse error classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input named something that does not exist or is malformed.
    Validation,
    /// The input was well formed but the record does not allow it now.
    Precondition,
    /// The record could not be read, decoded or written.
    Storage,
}

/// Errors raised by economy operations.
#[derive(Debug, thiserror::Error)]
pub enum EconomyError {
    /// A card key that is not in the catalog.
    #[error("unknown term key: {key}")]
    UnknownTerm {
        /// The rejected key.
        key: String,
    },

    /// A tier number outside `1..=6`.
    #[error("invalid pack tier: {tier}")]
    InvalidTier {
        /// The rejected number.
        tier: u8,
    },

    /// A rarity, mutation or upgrade name outside its closed set.
    #[error("unknown {field}: {value}")]
    UnknownName {
        /// Which set was being parsed.
        field: &'static str,
        /// The rejected name.
        value: String,
    },

    /// A nickname that breaks the naming rules.
    #[error("invalid display name: {reason}")]
    InvalidNickname {
        /// Which rule was broken.
        reason: String,
    },

    /// A debug action that could not be decoded.
    #[error("unsupported debug action: {reason}")]
    UnknownDebugAction {
        /// Decoder message.
        reason: String,
    },

    /// A draw resolved to an empty card pool.
    #[error("unable to resolve a card for tier {tier}")]
    UnresolvedDraw {
        /// The tier with no cards.
        tier: u8,
    },

    /// A debug override or action without debug authorization.
    #[error("debug actions are not allowed for this account")]
    DebugNotAllowed,

    /// An upgrade purchase was refused.
    #[error(transparent)]
    Upgrade(#[from] LedgerError),

    /// The missing-card gift needs more coins.
    #[error("not enough coins for the missing card gift: need {needed}, have {available}")]
    InsufficientCoins {
        /// Gift price.
        needed: u64,
        /// Current balance.
        available: u64,
    },

    /// The missing-card gift has nothing left to give.
    #[error("collection is already complete")]
    CollectionComplete,

    /// Rebirth attempted before owning every card.
    #[error("rebirth requires a full collection: {collected}/{total} cards")]
    CollectionIncomplete {
        /// Distinct cards owned this run.
        collected: usize,
        /// Catalog size.
        total: usize,
    },

    /// Rebirth attempted twice in one season.
    #[error("rebirth already used this season (layer {layer})")]
    RebirthUsed {
        /// Current layer.
        layer: Layer,
    },

    /// The season window could not be computed for the supplied time.
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// The catalog failed to build.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The record could not be encoded.
    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl EconomyError {
    /// Class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTerm { .. }
            | Self::InvalidTier { .. }
            | Self::UnknownName { .. }
            | Self::InvalidNickname { .. }
            | Self::UnknownDebugAction { .. }
            | Self::UnresolvedDraw { .. }
            | Self::Clock(_)
            | Self::Catalog(_) => ErrorKind::Validation,
            Self::DebugNotAllowed
            | Self::Upgrade(_)
            | Self::InsufficientCoins { .. }
            | Self::CollectionComplete
            | Self::CollectionIncomplete { .. }
            | Self::RebirthUsed { .. } => ErrorKind::Precondition,
            Self::Store(_) | Self::Encode(_) => ErrorKind::Storage,
        }
    }

    /// Shorthand for an unparseable upgrade key.
    pub fn unknown_upgrade(value: &str) -> Self {
        Self::UnknownName {
            field: "upgrade key",
            value: value.to_owned(),
        }
    }

    /// The upgrade key, when this is a refused purchase.
    pub const fn upgrade_key(&self) -> Option<UpgradeKey> {
        match self {
            Self::Upgrade(
                LedgerError::AlreadyMaxed { key }
                | LedgerError::AutoOpenerLocked { key }
                | LedgerError::InsufficientCoins { key, .. },
            ) => Some(*key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            EconomyError::UnknownTerm { key: "x".to_owned() }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(EconomyError::DebugNotAllowed.kind(), ErrorKind::Precondition);
        assert_eq!(
            EconomyError::from(LedgerError::AlreadyMaxed {
                key: UpgradeKey::TierBoost
            })
            .kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            EconomyError::from(StoreError::Unavailable {
                key: "k".to_owned(),
                reason: "down".to_owned(),
            })
            .kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn refused_purchase_exposes_key() {
        let err = EconomyError::from(LedgerError::AutoOpenerLocked {
            key: UpgradeKey::AutoSpeed,
        });
        assert_eq!(err.upgrade_key(), Some(UpgradeKey::AutoSpeed));
        assert_eq!(EconomyError::CollectionComplete.upgrade_key(), None);
    }
}
