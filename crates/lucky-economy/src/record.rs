//! Loading and saving whole player records.
//!
//! Lookup order: the primary key, then the legacy key, then a fresh record.
//! Anything that is not the current schema goes through
//! [`migrate_legacy`](crate::migration::migrate_legacy). Loading never
//! writes: created and migrated records reach the primary key only when the
//! operation that loaded them commits.

use chrono::{DateTime, Utc};
use lucky_core::{BalanceConfig, Catalog, SeasonClock};
use lucky_types::{PlayerEconomyState, PlayerId};
use rand::Rng;
use tracing::{info, warn};

use crate::error::EconomyError;
use crate::migration::{LegacyRecord, is_current, migrate_legacy};
use crate::profile::random_profile;
use crate::store::{KeyValueStore, legacy_record_key, record_key};

/// Where a loaded record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrigin {
    /// A current record under the primary key.
    Stored,
    /// An older record, upgraded on this load.
    Migrated,
    /// Nothing readable was stored; a default record was created.
    Created,
}

/// A record and how it was obtained.
#[derive(Debug, Clone)]
pub struct LoadedRecord {
    /// The record.
    pub state: PlayerEconomyState,
    /// Where it came from.
    pub origin: RecordOrigin,
}

/// Shared inputs for decoding and creating records.
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'a> {
    /// Balance tables.
    pub config: &'a BalanceConfig,
    /// Card catalog.
    pub catalog: &'a Catalog,
    /// Season clock.
    pub clock: &'a SeasonClock,
    /// Load time.
    pub now: DateTime<Utc>,
}

/// Load the record of `player`, creating or migrating it in memory as
/// needed.
///
/// # Errors
///
/// [`EconomyError::Store`] when the store fails, or [`EconomyError::Clock`]
/// when `now` has no season window.
pub fn load_record<S: KeyValueStore>(
    store: &S,
    ctx: &RecordContext<'_>,
    player: PlayerId,
    rng: &mut impl Rng,
) -> Result<LoadedRecord, EconomyError> {
    let key = record_key(player);
    if let Some(raw) = store.read(&key)? {
        match decode(ctx, &raw, rng)? {
            Some(loaded) => return Ok(loaded),
            None => warn!(%player, key = %key, "unreadable economy record, trying fallbacks"),
        }
    }

    let legacy_key = legacy_record_key(player);
    if let Some(raw) = store.read(&legacy_key)? {
        match decode(ctx, &raw, rng)? {
            Some(mut loaded) => {
                loaded.origin = RecordOrigin::Migrated;
                return Ok(loaded);
            }
            None => warn!(%player, key = %legacy_key, "unreadable legacy economy record"),
        }
    }

    let season = ctx.clock.window_at(ctx.now)?;
    let profile = random_profile(rng, ctx.now);
    let state = PlayerEconomyState::new(profile, season, ctx.config.initial_coins, ctx.now);
    info!(%player, display_name = %state.profile.display_name, "economy record created");
    Ok(LoadedRecord {
        state,
        origin: RecordOrigin::Created,
    })
}

/// Decode `raw` into a current record. `None` when it is not a readable
/// record of any version.
///
/// # Errors
///
/// [`EconomyError::Clock`] when a migrated record needs a season window and
/// `now` has none.
pub fn decode(ctx: &RecordContext<'_>, raw: &str, rng: &mut impl Rng) -> Result<Option<LoadedRecord>, EconomyError> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return Ok(None);
    };
    if !value.is_object() {
        return Ok(None);
    }

    if is_current(&value) {
        return Ok(serde_json::from_value::<PlayerEconomyState>(value)
            .ok()
            .map(|state| LoadedRecord {
                state,
                origin: RecordOrigin::Stored,
            }));
    }

    let Ok(legacy) = serde_json::from_value::<LegacyRecord>(value) else {
        return Ok(None);
    };
    let season = ctx.clock.window_at(ctx.now)?;
    let state = migrate_legacy(ctx.config, ctx.catalog, legacy, season, rng, ctx.now);
    Ok(Some(LoadedRecord {
        state,
        origin: RecordOrigin::Migrated,
    }))
}

/// Write the whole record of `player` under the primary key.
///
/// # Errors
///
/// [`EconomyError::Encode`] or [`EconomyError::Store`].
pub fn save_record<S: KeyValueStore>(
    store: &mut S,
    player: PlayerId,
    state: &PlayerEconomyState,
) -> Result<(), EconomyError> {
    let json = serde_json::to_string(state)?;
    store.write(&record_key(player), json)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_default()
    }

    struct Fixture {
        config: BalanceConfig,
        catalog: Catalog,
        clock: SeasonClock,
    }

    impl Fixture {
        fn new() -> Self {
            let config = BalanceConfig::default();
            let clock = SeasonClock::new(&config.season).unwrap();
            Self {
                config,
                catalog: Catalog::standard().unwrap(),
                clock,
            }
        }

        fn ctx(&self, now: DateTime<Utc>) -> RecordContext<'_> {
            RecordContext {
                config: &self.config,
                catalog: &self.catalog,
                clock: &self.clock,
                now,
            }
        }
    }

    #[test]
    fn first_load_creates_without_writing() {
        let fx = Fixture::new();
        let mut store = MemoryStore::new();
        let player = PlayerId::new();
        let mut rng = SmallRng::seed_from_u64(1);

        let loaded = load_record(&store, &fx.ctx(at(100)), player, &mut rng).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Created);
        assert_eq!(loaded.state.coins, 0);
        assert!(store.is_empty());

        save_record(&mut store, player, &loaded.state).unwrap();
        let again = load_record(&store, &fx.ctx(at(200)), player, &mut rng).unwrap();
        assert_eq!(again.origin, RecordOrigin::Stored);
        assert_eq!(again.state.profile, loaded.state.profile);
    }

    #[test]
    fn legacy_key_is_migrated_once() {
        let fx = Fixture::new();
        let mut store = MemoryStore::new();
        let player = PlayerId::new();
        let legacy = json!({"coins": 77, "luck_level": 4, "eggs_opened": 12});
        store.write(&legacy_record_key(player), legacy.to_string()).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        let loaded = load_record(&store, &fx.ctx(at(100)), player, &mut rng).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Migrated);
        assert_eq!(loaded.state.coins, 77);
        assert_eq!(loaded.state.value_level, 4);
        assert_eq!(loaded.state.packs_opened, 12);
        assert!(store.get(&record_key(player)).is_none());

        let reloaded = load_record(&store, &fx.ctx(at(100)), player, &mut rng).unwrap();
        assert_eq!(reloaded.origin, RecordOrigin::Migrated);

        save_record(&mut store, player, &loaded.state).unwrap();
        let again = load_record(&store, &fx.ctx(at(100)), player, &mut rng).unwrap();
        assert_eq!(again.origin, RecordOrigin::Stored);
        assert_eq!(again.state, loaded.state);
    }

    #[test]
    fn unversioned_primary_record_is_migrated() {
        let fx = Fixture::new();
        let mut store = MemoryStore::new();
        let player = PlayerId::new();
        store.write(&record_key(player), json!({"coins": 9}).to_string()).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        let loaded = load_record(&store, &fx.ctx(at(100)), player, &mut rng).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Migrated);
        assert_eq!(loaded.state.coins, 9);
        save_record(&mut store, player, &loaded.state).unwrap();
        let stored = store.get(&record_key(player)).unwrap();
        assert!(stored.contains("\"schema_version\":2"));
    }

    #[test]
    fn garbage_is_replaced_by_a_fresh_record() {
        let fx = Fixture::new();
        let mut store = MemoryStore::new();
        let player = PlayerId::new();
        store.write(&record_key(player), "{not json".to_owned()).unwrap();
        store.write(&legacy_record_key(player), "[1, 2, 3]".to_owned()).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        let loaded = load_record(&store, &fx.ctx(at(100)), player, &mut rng).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Created);
    }
}
