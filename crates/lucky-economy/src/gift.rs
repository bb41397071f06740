//! Missing-card gift: a flat-price purchase of one card the run lacks.

use chrono::{DateTime, Utc};
use lucky_core::{BalanceConfig, Catalog};
use lucky_types::{DrawSource, GiftResult, Mutation, PlayerEconomyState};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::collection::{missing_cards, upsert_card};
use crate::error::EconomyError;

/// Grant one uniformly chosen missing card for the gift price.
///
/// # Errors
///
/// [`EconomyError::CollectionComplete`] when nothing is missing, or
/// [`EconomyError::InsufficientCoins`] when the balance is short.
pub fn buy_missing_card_gift(
    config: &BalanceConfig,
    catalog: &Catalog,
    state: &mut PlayerEconomyState,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Result<GiftResult, EconomyError> {
    let missing = missing_cards(state, catalog);
    if missing.is_empty() {
        return Err(EconomyError::CollectionComplete);
    }
    let cost = config.gift.missing_card_cost;
    if state.coins < cost {
        return Err(EconomyError::InsufficientCoins {
            needed: cost,
            available: state.coins,
        });
    }
    let card = missing.choose(rng).copied().ok_or(EconomyError::CollectionComplete)?;

    state.coins = state.coins.saturating_sub(cost);
    upsert_card(state, &card.key, 1, Mutation::None, now);
    state.updated_at = now;

    debug!(term = %card.key, cost, "missing card gift granted");

    Ok(GiftResult {
        term_key: card.key.clone(),
        term_name: card.name_in(state.active_layer).to_owned(),
        tier: card.tier,
        rarity: card.rarity,
        cost,
        source: DrawSource::ShopGift,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lucky_types::{Layer, Profile, SeasonWindow, StolenMarker};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_default()
    }

    fn state(coins: u64) -> PlayerEconomyState {
        let profile = Profile {
            nick_part_a: "Plum".to_owned(),
            nick_part_b: "Keen".to_owned(),
            nick_part_c: "Lynx".to_owned(),
            display_name: "Plum Keen Lynx".to_owned(),
            name_customized: false,
            updated_at: at(0),
        };
        let season = SeasonWindow {
            id: "season-1969-12-29".to_owned(),
            starts_at: at(-259_200),
            ends_at: at(345_600),
        };
        PlayerEconomyState::new(profile, season, coins, at(0))
    }

    #[test]
    fn gift_grants_a_missing_card() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let mut s = state(35_000);
        s.stolen.push(StolenMarker {
            layer: Layer::BASE,
            term_key: "hello_world".to_owned(),
            stolen_at: at(0),
        });
        upsert_card(&mut s, "stack_overflow", 1, Mutation::None, at(0));
        let mut rng = SmallRng::seed_from_u64(21);

        let gift = buy_missing_card_gift(&config, &catalog, &mut s, &mut rng, at(1)).unwrap();
        assert_eq!(gift.cost, 25_000);
        assert_eq!(gift.source, DrawSource::ShopGift);
        assert_ne!(gift.term_key, "stack_overflow");
        assert_eq!(s.coins, 10_000);
        assert_eq!(s.collection.len(), 2);
        assert!(s.lifetime_entry(Layer::BASE, &gift.term_key).is_some());
        assert_eq!(s.packs_opened, 0);
    }

    #[test]
    fn gift_picks_the_last_missing_card() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let mut s = state(25_000);
        let last = catalog.cards().last().unwrap().key.clone();
        for card in catalog.cards().iter().filter(|c| c.key != last) {
            upsert_card(&mut s, &card.key, 1, Mutation::None, at(0));
        }

        for seed in 0..8 {
            let mut trial = s.clone();
            let mut rng = SmallRng::seed_from_u64(seed);
            let gift = buy_missing_card_gift(&config, &catalog, &mut trial, &mut rng, at(1)).unwrap();
            assert_eq!(gift.term_key, last);
            assert_eq!(trial.collection.len(), catalog.len());
        }
    }

    #[test]
    fn gift_needs_coins() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let mut s = state(24_999);
        let mut rng = SmallRng::seed_from_u64(1);
        let result = buy_missing_card_gift(&config, &catalog, &mut s, &mut rng, at(1));
        assert!(matches!(
            result,
            Err(EconomyError::InsufficientCoins { needed: 25_000, available: 24_999 })
        ));
        assert!(s.collection.is_empty());
    }

    #[test]
    fn gift_refuses_complete_collection() {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let mut s = state(200_000);
        for card in catalog.cards() {
            upsert_card(&mut s, &card.key, 1, Mutation::None, at(0));
        }
        let mut rng = SmallRng::seed_from_u64(1);
        let result = buy_missing_card_gift(&config, &catalog, &mut s, &mut rng, at(1));
        assert!(matches!(result, Err(EconomyError::CollectionComplete)));
        assert_eq!(s.coins, 200_000);
    }
}
