//! Shared type definitions for the Lucky Agent pack economy.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types flow downstream to `TypeScript` via `ts-rs` for the
//! game client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for player identifiers
//! - [`enums`] -- Closed sets (rarity, mutation, upgrades) and tier/layer newtypes
//! - [`structs`] -- The persisted player record and its entries
//! - [`snapshot`] -- Caller-facing snapshot and operation result shapes

pub mod enums;
pub mod ids;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DrawSource, Layer, Mutation, ParseEnumError, Rarity, TIER_COUNT, Tier, UpgradeKey};
pub use ids::PlayerId;
pub use snapshot::{
    DrawResult, GiftResult, LayerHighest, LayerProgress, LifetimeSummary, LossResult,
    PurchaseResult, RebirthResult, Snapshot, SnapshotMeta, StateView, SyncReport,
};
pub use structs::{
    BestCard, CollectionEntry, DrawOverride, ForcedDraw, LifetimeEntry, PlayerEconomyState,
    Profile, SCHEMA_VERSION, SeasonHistoryEntry, SeasonWindow, Standing, StolenMarker,
};

#[cfg(test)]
mod tests {
    //! Binding export for the `TypeScript` client.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::PlayerId::export_all();

        // Enums
        let _ = crate::enums::Tier::export_all();
        let _ = crate::enums::Layer::export_all();
        let _ = crate::enums::Rarity::export_all();
        let _ = crate::enums::Mutation::export_all();
        let _ = crate::enums::UpgradeKey::export_all();
        let _ = crate::enums::DrawSource::export_all();

        // Record
        let _ = crate::structs::PlayerEconomyState::export_all();
        let _ = crate::structs::DrawOverride::export_all();
        let _ = crate::structs::SeasonHistoryEntry::export_all();

        // Snapshot and results
        let _ = crate::snapshot::Snapshot::export_all();
        let _ = crate::snapshot::DrawResult::export_all();
        let _ = crate::snapshot::PurchaseResult::export_all();
        let _ = crate::snapshot::LossResult::export_all();
        let _ = crate::snapshot::RebirthResult::export_all();
        let _ = crate::snapshot::GiftResult::export_all();
        let _ = crate::snapshot::SyncReport::export_all();
    }
}
