//! Pack draw resolver.
//!
//! A draw runs tier, rarity, mutation and card selection in that order,
//! then credits the reward and folds the card into the collection. Forced
//! values (a debug override, or the stored one-shot `next_reward`) replace
//! individual steps; everything the override names is validated before the
//! record is touched.

use chrono::{DateTime, Utc};
use lucky_core::distribution::{effective_tier_weights, highest_unlocked_tier, mutation_weights, rarity_weights};
use lucky_core::reward::card_reward;
use lucky_core::{BalanceConfig, Card, Catalog};
use lucky_types::{DrawOverride, DrawResult, DrawSource, ForcedDraw, Mutation, PlayerEconomyState, Rarity, Tier};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::collection::upsert_card;
use crate::error::EconomyError;

/// Everything a draw reads besides the record and the RNG.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    /// Balance tables.
    pub config: &'a BalanceConfig,
    /// Drawable cards.
    pub catalog: &'a Catalog,
    /// Whether debug overrides are authorized.
    pub debug_allowed: bool,
    /// Time of the draw.
    pub now: DateTime<Utc>,
}

/// Validate a caller-supplied override against the catalog and the closed
/// enums. Blank fields count as unset.
///
/// # Errors
///
/// [`EconomyError::InvalidTier`], [`EconomyError::UnknownTerm`] or
/// [`EconomyError::UnknownName`] for the first bad field.
pub fn validate_override(catalog: &Catalog, raw: &DrawOverride) -> Result<ForcedDraw, EconomyError> {
    let tier = raw
        .tier
        .map(|n| Tier::new(n).ok_or(EconomyError::InvalidTier { tier: n }))
        .transpose()?;

    let term_key = match non_blank(raw.term_key.as_deref()) {
        Some(key) if catalog.contains(key) => Some(key.to_owned()),
        Some(key) => return Err(EconomyError::UnknownTerm { key: key.to_owned() }),
        None => None,
    };

    let rarity = non_blank(raw.rarity.as_deref())
        .map(|value| {
            value.parse::<Rarity>().map_err(|_| EconomyError::UnknownName {
                field: "rarity",
                value: value.to_owned(),
            })
        })
        .transpose()?;

    let mutation = non_blank(raw.mutation.as_deref())
        .map(|value| {
            value.parse::<Mutation>().map_err(|_| EconomyError::UnknownName {
                field: "mutation",
                value: value.to_owned(),
            })
        })
        .transpose()?;

    Ok(ForcedDraw {
        tier,
        term_key,
        rarity,
        mutation,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve one pack draw from `source` and apply it to `state`.
///
/// A non-empty `request` needs debug authorization. Without one, an
/// authorized caller consumes the stored `next_reward` instead.
///
/// # Errors
///
/// Override validation errors, [`EconomyError::DebugNotAllowed`], or
/// [`EconomyError::UnresolvedDraw`] when the catalog has no card for the
/// drawn tier.
pub fn open_pack(
    ctx: &DrawContext<'_>,
    state: &mut PlayerEconomyState,
    source: DrawSource,
    request: Option<&DrawOverride>,
    rng: &mut impl Rng,
) -> Result<DrawResult, EconomyError> {
    let explicit = match request {
        Some(raw) if !raw.is_empty() => Some(validate_override(ctx.catalog, raw)?),
        _ => None,
    };
    if explicit.is_some() && !ctx.debug_allowed {
        return Err(EconomyError::DebugNotAllowed);
    }

    let forced = match explicit {
        Some(forced) => Some(forced),
        None if ctx.debug_allowed => state.next_reward.take(),
        None => None,
    };
    let debug_applied = forced.is_some();
    let forced = forced.unwrap_or_default();

    let forced_card = forced
        .term_key
        .as_deref()
        .map(|key| {
            ctx.catalog
                .get(key)
                .ok_or_else(|| EconomyError::UnknownTerm { key: key.to_owned() })
        })
        .transpose()?;

    let tier = match (forced.tier, forced_card) {
        (Some(tier), _) => tier,
        (None, Some(card)) => card.tier,
        (None, None) => effective_tier_weights(ctx.config, state.tier_boost_level)
            .pick(rng)
            .unwrap_or(Tier::FIRST),
    };

    let rarity = match (forced.rarity, forced_card) {
        (Some(rarity), _) => rarity,
        (None, Some(card)) => card.rarity,
        (None, None) => rarity_weights(ctx.config, tier, state.value_level)
            .pick(rng)
            .unwrap_or(Rarity::Common),
    };

    let mutation = forced.mutation.unwrap_or_else(|| {
        mutation_weights(ctx.config, state.mutation_level)
            .pick(rng)
            .unwrap_or(Mutation::None)
    });

    let card = match forced_card {
        Some(card) => card,
        None => pick_card(ctx.catalog, tier, rarity, rng)?,
    };

    Ok(apply_draw(ctx, state, card, DrawOutcome {
        tier,
        rarity,
        mutation,
        source,
        debug_applied,
    }))
}

fn pick_card<'a>(catalog: &'a Catalog, tier: Tier, rarity: Rarity, rng: &mut impl Rng) -> Result<&'a Card, EconomyError> {
    let pool = catalog.draw_pool(tier, rarity);
    pool.choose(rng)
        .copied()
        .ok_or(EconomyError::UnresolvedDraw { tier: tier.number() })
}

struct DrawOutcome {
    tier: Tier,
    rarity: Rarity,
    mutation: Mutation,
    source: DrawSource,
    debug_applied: bool,
}

fn apply_draw(ctx: &DrawContext<'_>, state: &mut PlayerEconomyState, card: &Card, outcome: DrawOutcome) -> DrawResult {
    let reward = card_reward(
        &ctx.config.reward,
        card.base_bp,
        outcome.rarity,
        outcome.mutation,
        state.value_level,
    );

    state.coins = state.coins.saturating_add(reward);
    state.packs_opened = state.packs_opened.saturating_add(1);
    if outcome.source == DrawSource::Auto {
        state.auto_opens = state.auto_opens.saturating_add(1);
    } else {
        state.manual_opens = state.manual_opens.saturating_add(1);
    }

    let entry = upsert_card(state, &card.key, 1, outcome.mutation, ctx.now);
    state.highest_tier_unlocked = highest_unlocked_tier(ctx.config, state.tier_boost_level);
    state.updated_at = ctx.now;

    let layer = state.active_layer;
    debug!(
        term = %card.key,
        tier = %outcome.tier,
        rarity = %outcome.rarity,
        mutation = %outcome.mutation,
        reward,
        source = outcome.source.as_str(),
        debug_applied = outcome.debug_applied,
        "pack opened"
    );

    DrawResult {
        term_key: card.key.clone(),
        term_name: card.name_in(layer).to_owned(),
        rarity: outcome.rarity,
        mutation: outcome.mutation,
        tier: outcome.tier,
        effective_tier: outcome.tier.effective(layer),
        layer,
        reward,
        copies: entry.copies,
        level: entry.level,
        best_mutation: entry.best_mutation,
        source: outcome.source,
        debug_applied: outcome.debug_applied,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use lucky_types::{Layer, Profile, SeasonWindow};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_default()
    }

    fn state() -> PlayerEconomyState {
        let profile = Profile {
            nick_part_a: "Gold".to_owned(),
            nick_part_b: "Bold".to_owned(),
            nick_part_c: "Wolf".to_owned(),
            display_name: "Gold Bold Wolf".to_owned(),
            name_customized: false,
            updated_at: at(0),
        };
        let season = SeasonWindow {
            id: "season-1969-12-29".to_owned(),
            starts_at: at(-259_200),
            ends_at: at(345_600),
        };
        PlayerEconomyState::new(profile, season, 0, at(0))
    }

    fn forced(term: &str, mutation: &str) -> DrawOverride {
        DrawOverride {
            tier: None,
            term_key: Some(term.to_owned()),
            rarity: None,
            mutation: Some(mutation.to_owned()),
        }
    }

    #[test]
    fn manual_open_of_first_card_pays_three() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let ctx = DrawContext { config: &config, catalog: &catalog, debug_allowed: true, now: at(1) };
        let mut s = state();
        let mut rng = SmallRng::seed_from_u64(1);

        let draw = open_pack(&ctx, &mut s, DrawSource::Manual, Some(&forced("hello_world", "none")), &mut rng).unwrap();
        assert_eq!(draw.reward, 3);
        assert_eq!(draw.tier, Tier::FIRST);
        assert_eq!(draw.rarity, Rarity::Common);
        assert!(draw.debug_applied);
        assert_eq!(s.coins, 3);
        assert_eq!(s.packs_opened, 1);
        assert_eq!(s.manual_opens, 1);
    }

    #[test]
    fn override_requires_debug_authorization() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let ctx = DrawContext { config: &config, catalog: &catalog, debug_allowed: false, now: at(1) };
        let mut s = state();
        let before = s.clone();
        let mut rng = SmallRng::seed_from_u64(1);

        let result = open_pack(&ctx, &mut s, DrawSource::Manual, Some(&forced("hello_world", "none")), &mut rng);
        assert!(matches!(result, Err(EconomyError::DebugNotAllowed)));
        assert_eq!(s, before);

        let empty = DrawOverride::default();
        assert!(open_pack(&ctx, &mut s, DrawSource::Manual, Some(&empty), &mut rng).is_ok());
    }

    #[test]
    fn invalid_override_fields_are_rejected() {
        let catalog = Catalog::standard().unwrap();
        let bad_tier = DrawOverride { tier: Some(7), ..DrawOverride::default() };
        assert!(matches!(validate_override(&catalog, &bad_tier), Err(EconomyError::InvalidTier { tier: 7 })));
        let bad_term = forced("not_a_card", "none");
        assert!(matches!(validate_override(&catalog, &bad_term), Err(EconomyError::UnknownTerm { .. })));
        let bad_mutation = forced("hello_world", "shiny");
        assert!(matches!(
            validate_override(&catalog, &bad_mutation),
            Err(EconomyError::UnknownName { field: "mutation", .. })
        ));
        let bad_rarity = DrawOverride { rarity: Some("mythic".to_owned()), ..DrawOverride::default() };
        assert!(matches!(
            validate_override(&catalog, &bad_rarity),
            Err(EconomyError::UnknownName { field: "rarity", .. })
        ));
    }

    #[test]
    fn forced_term_sets_tier_and_rarity() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let ctx = DrawContext { config: &config, catalog: &catalog, debug_allowed: true, now: at(1) };
        let card = catalog.tier_pool(Tier::LAST)[9].clone();
        let mut s = state();
        let mut rng = SmallRng::seed_from_u64(3);

        let draw = open_pack(&ctx, &mut s, DrawSource::Manual, Some(&forced(&card.key, "holo")), &mut rng).unwrap();
        assert_eq!(draw.tier, Tier::LAST);
        assert_eq!(draw.rarity, Rarity::Legendary);
        assert_eq!(draw.mutation, Mutation::Holo);
    }

    #[test]
    fn next_reward_is_consumed_once() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let ctx = DrawContext { config: &config, catalog: &catalog, debug_allowed: true, now: at(1) };
        let mut s = state();
        s.next_reward = Some(ForcedDraw {
            tier: None,
            term_key: Some("stack_overflow".to_owned()),
            rarity: None,
            mutation: Some(Mutation::Foil),
        });
        let mut rng = SmallRng::seed_from_u64(4);

        let first = open_pack(&ctx, &mut s, DrawSource::Manual, None, &mut rng).unwrap();
        assert_eq!(first.term_key, "stack_overflow");
        assert_eq!(first.mutation, Mutation::Foil);
        assert!(first.debug_applied);
        assert!(s.next_reward.is_none());

        let second = open_pack(&ctx, &mut s, DrawSource::Manual, None, &mut rng).unwrap();
        assert!(!second.debug_applied);
    }

    #[test]
    fn next_reward_waits_without_authorization() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let ctx = DrawContext { config: &config, catalog: &catalog, debug_allowed: false, now: at(1) };
        let mut s = state();
        s.next_reward = Some(ForcedDraw::default());
        let mut rng = SmallRng::seed_from_u64(4);

        let draw = open_pack(&ctx, &mut s, DrawSource::Auto, None, &mut rng).unwrap();
        assert!(!draw.debug_applied);
        assert!(s.next_reward.is_some());
        assert_eq!(s.auto_opens, 1);
        assert_eq!(s.manual_opens, 0);
    }

    #[test]
    fn unboosted_draws_stay_in_first_tier() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let ctx = DrawContext { config: &config, catalog: &catalog, debug_allowed: false, now: at(1) };
        let mut s = state();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let draw = open_pack(&ctx, &mut s, DrawSource::Manual, None, &mut rng).unwrap();
            assert_eq!(draw.tier, Tier::FIRST);
            assert_eq!(catalog.get(&draw.term_key).map(|c| c.tier), Some(Tier::FIRST));
        }
        assert_eq!(s.packs_opened, 200);
    }

    #[test]
    fn reborn_draws_report_offset_tier() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let ctx = DrawContext { config: &config, catalog: &catalog, debug_allowed: true, now: at(1) };
        let mut s = state();
        s.active_layer = Layer::REBORN;
        let mut rng = SmallRng::seed_from_u64(5);
        let draw = open_pack(&ctx, &mut s, DrawSource::Manual, Some(&forced("hello_world", "none")), &mut rng).unwrap();
        assert_eq!(draw.effective_tier, 7);
        assert_eq!(draw.layer, Layer::REBORN);
        assert_eq!(Some(draw.term_name.as_str()), catalog.presentation("hello_world", Layer::REBORN));
    }
}
