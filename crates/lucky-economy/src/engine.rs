//! The [`Economy`] facade: every player-facing operation.
//!
//! Each operation runs the same pipeline over one player's record:
//!
//! 1. **Load** -- read the record, migrating or creating it as needed.
//! 2. **Season** -- roll into the season window containing `now`.
//! 3. **Accrue** -- credit passive income and resolve auto opens.
//! 4. **Heartbeat** -- extend the activity window (every operation but
//!    [`Economy::sync`]).
//! 5. **Operation** -- the state change the caller asked for.
//! 6. **Persist** -- write the whole record back, then build a snapshot.
//!
//! A failure anywhere in steps 2-5 discards the working copy, so the stored
//! record is exactly what it was before the call.

use chrono::{DateTime, Utc};
use lucky_core::distribution::highest_unlocked_tier;
use lucky_core::{BalanceConfig, Catalog, SeasonClock};
use lucky_ledger::{UpgradePreview, apply_upgrade, upgrade_preview};
use lucky_types::{
    DrawOverride, DrawResult, DrawSource, GiftResult, LifetimeSummary, LossResult, PlayerEconomyState, PlayerId,
    PurchaseResult, RebirthResult, SeasonHistoryEntry, Snapshot, SyncReport, UpgradeKey,
};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::accrual::{accrue, extend_heartbeat};
use crate::collection::{lifetime_summary, remove_card};
use crate::debug::{DebugAction, apply_debug_action};
use crate::error::EconomyError;
use crate::gift;
use crate::profile::{NicknameUpdate, apply_nickname, random_profile};
use crate::record::{RecordContext, load_record, save_record};
use crate::resolver::{DrawContext, open_pack};
use crate::season::{self, roll_season};
use crate::snapshot::build_snapshot;
use crate::store::KeyValueStore;

/// Per-call inputs supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpContext {
    /// Player the call acts on.
    pub player: PlayerId,
    /// Wall-clock time of the call.
    pub now: DateTime<Utc>,
    /// Whether debug overrides and actions are authorised.
    pub debug_allowed: bool,
}

/// A snapshot after an operation plus the operation's own result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<T> {
    /// Player view after the operation.
    pub snapshot: Snapshot,
    /// What the operation did.
    pub result: T,
}

/// Immutable inputs shared by every operation.
#[derive(Debug, Clone)]
pub struct Rules {
    /// Balance tables.
    pub config: BalanceConfig,
    /// Drawable cards.
    pub catalog: Catalog,
    /// Season windows.
    pub clock: SeasonClock,
}

/// Pack economy over a [`KeyValueStore`].
#[derive(Debug)]
pub struct Economy<S> {
    rules: Rules,
    store: S,
}

impl<S: KeyValueStore> Economy<S> {
    /// Build an engine from a validated config and a catalog.
    ///
    /// # Errors
    ///
    /// [`EconomyError::Clock`] when the season settings are unusable.
    pub fn new(config: BalanceConfig, catalog: Catalog, store: S) -> Result<Self, EconomyError> {
        let clock = SeasonClock::new(&config.season)?;
        info!(
            version = %config.version,
            cards = catalog.len(),
            season_seconds = clock.duration_seconds(),
            "economy engine ready"
        );
        Ok(Self {
            rules: Rules { config, catalog, clock },
            store,
        })
    }

    /// Build an engine over the standard 60-card catalog.
    ///
    /// # Errors
    ///
    /// [`EconomyError::Catalog`] or [`EconomyError::Clock`].
    pub fn with_standard_catalog(config: BalanceConfig, store: S) -> Result<Self, EconomyError> {
        let catalog = Catalog::standard()?;
        Self::new(config, catalog, store)
    }

    /// Balance tables, catalog and clock.
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the engine, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Load (or create) the record, catch it up and return a snapshot.
    ///
    /// # Errors
    ///
    /// Storage and clock errors.
    pub fn bootstrap<R: Rng>(&mut self, ctx: OpContext, rng: &mut R) -> Result<Snapshot, EconomyError> {
        self.run(ctx, rng, true, |_, _, _| Ok(()))
            .map(|response| response.snapshot)
    }

    /// Catch the record up without extending the heartbeat.
    ///
    /// # Errors
    ///
    /// Storage and clock errors.
    pub fn sync<R: Rng>(&mut self, ctx: OpContext, rng: &mut R) -> Result<Response<SyncReport>, EconomyError> {
        self.run_with_report(ctx, rng, false)
    }

    /// Catch the record up and extend the heartbeat.
    ///
    /// # Errors
    ///
    /// Storage and clock errors.
    pub fn keep_alive<R: Rng>(&mut self, ctx: OpContext, rng: &mut R) -> Result<Response<SyncReport>, EconomyError> {
        self.run_with_report(ctx, rng, true)
    }

    /// Open one pack.
    ///
    /// # Errors
    ///
    /// Override validation errors and [`EconomyError::DebugNotAllowed`].
    pub fn open_pack<R: Rng>(
        &mut self,
        ctx: OpContext,
        source: DrawSource,
        request: Option<&DrawOverride>,
        rng: &mut R,
    ) -> Result<Response<DrawResult>, EconomyError> {
        self.run(ctx, rng, true, |rules, state, rng| {
            let draw_ctx = draw_context(rules, ctx);
            open_pack(&draw_ctx, state, source, request, rng)
        })
    }

    /// Buy one level of the upgrade named `key` (current or retired name).
    ///
    /// # Errors
    ///
    /// [`EconomyError::UnknownName`] for an unknown key, or the purchase
    /// preconditions wrapped in [`EconomyError::Upgrade`].
    pub fn buy_upgrade<R: Rng>(
        &mut self,
        ctx: OpContext,
        key: &str,
        rng: &mut R,
    ) -> Result<Response<PurchaseResult>, EconomyError> {
        let key = key
            .parse::<UpgradeKey>()
            .map_err(|_| EconomyError::unknown_upgrade(key))?;
        self.run(ctx, rng, true, |rules, state, _| Ok(apply_upgrade(&rules.config, state, key)?))
    }

    /// Buy one card missing from the collection at the gift price.
    ///
    /// # Errors
    ///
    /// [`EconomyError::CollectionComplete`] or [`EconomyError::InsufficientCoins`].
    pub fn buy_missing_card_gift<R: Rng>(
        &mut self,
        ctx: OpContext,
        rng: &mut R,
    ) -> Result<Response<GiftResult>, EconomyError> {
        self.run(ctx, rng, true, |rules, state, rng| {
            gift::buy_missing_card_gift(&rules.config, &rules.catalog, state, rng, ctx.now)
        })
    }

    /// Remove a card from the collection and mark it stolen. Losing a card
    /// that is not owned succeeds with `removed: false`.
    ///
    /// # Errors
    ///
    /// [`EconomyError::UnknownTerm`] for a key outside the catalog.
    pub fn lose_card<R: Rng>(
        &mut self,
        ctx: OpContext,
        term_key: &str,
        rng: &mut R,
    ) -> Result<Response<LossResult>, EconomyError> {
        if !self.rules.catalog.contains(term_key) {
            return Err(EconomyError::UnknownTerm {
                key: term_key.to_owned(),
            });
        }
        self.run(ctx, rng, true, |_, state, _| {
            let removed = remove_card(state, term_key, ctx.now);
            debug!(term = term_key, removed, "card lost");
            Ok(LossResult {
                term_key: term_key.to_owned(),
                removed,
                layer: state.active_layer,
            })
        })
    }

    /// Rebirth into layer 2.
    ///
    /// # Errors
    ///
    /// [`EconomyError::RebirthUsed`] or [`EconomyError::CollectionIncomplete`].
    pub fn rebirth<R: Rng>(&mut self, ctx: OpContext, rng: &mut R) -> Result<Response<RebirthResult>, EconomyError> {
        self.run(ctx, rng, true, |rules, state, _| {
            season::rebirth(&rules.config, &rules.catalog, state, ctx.now)
        })
    }

    /// Change the nickname or display name.
    ///
    /// # Errors
    ///
    /// [`EconomyError::InvalidNickname`].
    pub fn update_nickname<R: Rng>(
        &mut self,
        ctx: OpContext,
        update: &NicknameUpdate,
        rng: &mut R,
    ) -> Result<Response<()>, EconomyError> {
        self.run(ctx, rng, true, |_, state, _| apply_nickname(&mut state.profile, update, ctx.now))
    }

    /// Reset the run and draw a new generated profile. Layer, lifetime and
    /// season history survive.
    ///
    /// # Errors
    ///
    /// [`EconomyError::DebugNotAllowed`] without debug authorization.
    pub fn reset_account<R: Rng>(&mut self, ctx: OpContext, rng: &mut R) -> Result<Response<()>, EconomyError> {
        if !ctx.debug_allowed {
            return Err(EconomyError::DebugNotAllowed);
        }
        self.run(ctx, rng, true, |rules, state, rng| {
            state.reset_run(rules.config.initial_coins, ctx.now);
            state.profile = random_profile(rng, ctx.now);
            info!(player = %ctx.player, "account reset");
            Ok(())
        })
    }

    /// Apply a debug action. Returns the action's wire name.
    ///
    /// # Errors
    ///
    /// [`EconomyError::DebugNotAllowed`] without debug authorization, or
    /// whatever the action itself rejects.
    pub fn debug_apply<R: Rng>(
        &mut self,
        ctx: OpContext,
        action: &DebugAction,
        rng: &mut R,
    ) -> Result<Response<&'static str>, EconomyError> {
        if !ctx.debug_allowed {
            return Err(EconomyError::DebugNotAllowed);
        }
        self.run(ctx, rng, true, |rules, state, _| {
            apply_debug_action(&rules.config, &rules.catalog, state, action, ctx.now)?;
            Ok(action.name())
        })
    }

    /// Lifetime collection across layers.
    ///
    /// # Errors
    ///
    /// Storage and clock errors.
    pub fn lifetime_collection<R: Rng>(
        &mut self,
        ctx: OpContext,
        rng: &mut R,
    ) -> Result<Response<LifetimeSummary>, EconomyError> {
        self.run(ctx, rng, true, |rules, state, _| Ok(lifetime_summary(state, &rules.catalog)))
    }

    /// Up to `limit` archived seasons, newest first.
    ///
    /// # Errors
    ///
    /// Storage and clock errors.
    pub fn season_history<R: Rng>(
        &mut self,
        ctx: OpContext,
        limit: usize,
        rng: &mut R,
    ) -> Result<Response<Vec<SeasonHistoryEntry>>, EconomyError> {
        self.run(ctx, rng, true, |_, state, _| Ok(season::season_history(state, limit)))
    }

    /// Cost, affordability and effect labels of every upgrade.
    ///
    /// # Errors
    ///
    /// Storage and clock errors.
    pub fn upgrade_previews<R: Rng>(
        &mut self,
        ctx: OpContext,
        rng: &mut R,
    ) -> Result<Response<Vec<UpgradePreview>>, EconomyError> {
        self.run(ctx, rng, true, |rules, state, _| {
            Ok(UpgradeKey::ALL
                .iter()
                .map(|&key| upgrade_preview(&rules.config, state, key))
                .collect())
        })
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    fn run_with_report<R: Rng>(
        &mut self,
        ctx: OpContext,
        rng: &mut R,
        heartbeat: bool,
    ) -> Result<Response<SyncReport>, EconomyError> {
        let (state, report) = self.prepare(ctx, rng, heartbeat)?;
        self.commit(ctx, state, report)
    }

    fn run<R, T, F>(&mut self, ctx: OpContext, rng: &mut R, heartbeat: bool, op: F) -> Result<Response<T>, EconomyError>
    where
        R: Rng,
        F: FnOnce(&Rules, &mut PlayerEconomyState, &mut R) -> Result<T, EconomyError>,
    {
        let (mut state, _) = self.prepare(ctx, rng, heartbeat)?;
        let result = op(&self.rules, &mut state, rng)?;
        self.commit(ctx, state, result)
    }

    /// Load, roll the season, accrue and extend the heartbeat.
    fn prepare<R: Rng>(
        &mut self,
        ctx: OpContext,
        rng: &mut R,
        heartbeat: bool,
    ) -> Result<(PlayerEconomyState, SyncReport), EconomyError> {
        let record_ctx = RecordContext {
            config: &self.rules.config,
            catalog: &self.rules.catalog,
            clock: &self.rules.clock,
            now: ctx.now,
        };
        let mut state = load_record(&self.store, &record_ctx, ctx.player, rng)?.state;

        roll_season(&self.rules.config, &self.rules.clock, &self.rules.catalog, &mut state, ctx.now)?;
        let report = accrue(&draw_context(&self.rules, ctx), &mut state, rng)?;
        if heartbeat {
            extend_heartbeat(&mut state, self.rules.config.heartbeat_window_seconds(), ctx.now);
        }
        Ok((state, report))
    }

    fn commit<T>(&mut self, ctx: OpContext, mut state: PlayerEconomyState, result: T) -> Result<Response<T>, EconomyError> {
        state.highest_tier_unlocked = highest_unlocked_tier(&self.rules.config, state.tier_boost_level);
        state.updated_at = ctx.now;
        save_record(&mut self.store, ctx.player, &state)?;
        Ok(Response {
            snapshot: build_snapshot(
                &self.rules.config,
                &self.rules.catalog,
                &state,
                ctx.now,
                ctx.debug_allowed,
            ),
            result,
        })
    }
}

const fn draw_context(rules: &Rules, ctx: OpContext) -> DrawContext<'_> {
    DrawContext {
        config: &rules.config,
        catalog: &rules.catalog,
        debug_allowed: ctx.debug_allowed,
        now: ctx.now,
    }
}
