//! Collection tracker: current-run cards, the lifetime ledger and stolen
//! markers.
//!
//! Every card that enters the collection goes through [`upsert_card`], which
//! keeps the three views consistent: the run entry gains copies, the
//! lifetime entry for the active layer accumulates, and any stolen marker
//! for the card in the active layer is cleared.

use chrono::{DateTime, Utc};
use lucky_core::distribution::passive_rate;
use lucky_core::{BalanceConfig, Card, Catalog};
use lucky_types::{
    BestCard, CollectionEntry, Layer, LayerHighest, LayerProgress, LifetimeEntry, LifetimeSummary, Mutation,
    PlayerEconomyState, StolenMarker,
};

/// Add `copies` of `term_key` with `mutation` to the active run.
///
/// Returns the updated run entry. At least one copy is always added.
pub fn upsert_card(
    state: &mut PlayerEconomyState,
    term_key: &str,
    copies: u32,
    mutation: Mutation,
    now: DateTime<Utc>,
) -> CollectionEntry {
    let added = copies.max(1);
    let layer = state.active_layer;

    let entry = state
        .collection
        .entry(term_key.to_owned())
        .and_modify(|e| {
            e.copies = e.copies.saturating_add(added);
            e.level = CollectionEntry::level_for(e.copies);
            e.best_mutation = e.best_mutation.best(mutation);
            e.updated_at = now;
        })
        .or_insert_with(|| CollectionEntry {
            term_key: term_key.to_owned(),
            copies: added,
            level: CollectionEntry::level_for(added),
            best_mutation: mutation,
            updated_at: now,
        })
        .clone();

    record_lifetime(state, layer, term_key, added, mutation, now);
    state
        .stolen
        .retain(|m| !(m.layer == layer && m.term_key == term_key));

    entry
}

fn record_lifetime(
    state: &mut PlayerEconomyState,
    layer: Layer,
    term_key: &str,
    copies: u32,
    mutation: Mutation,
    now: DateTime<Utc>,
) {
    if let Some(entry) = state
        .lifetime
        .iter_mut()
        .find(|e| e.layer == layer && e.term_key == term_key)
    {
        entry.copies = entry.copies.saturating_add(u64::from(copies));
        entry.best_mutation = entry.best_mutation.best(mutation);
        entry.last_collected_at = now;
        return;
    }
    state.lifetime.push(LifetimeEntry {
        layer,
        term_key: term_key.to_owned(),
        copies: u64::from(copies),
        best_mutation: mutation,
        first_collected_at: now,
        last_collected_at: now,
    });
}

/// Remove `term_key` from the run and mark it stolen in the active layer.
///
/// Returns false, changing nothing, when the card is not owned.
pub fn remove_card(state: &mut PlayerEconomyState, term_key: &str, now: DateTime<Utc>) -> bool {
    if state.collection.remove(term_key).is_none() {
        return false;
    }
    if !state.is_stolen(term_key) {
        state.stolen.push(StolenMarker {
            layer: state.active_layer,
            term_key: term_key.to_owned(),
            stolen_at: now,
        });
    }
    true
}

/// Whether the run owns every catalog card.
pub fn is_complete(state: &PlayerEconomyState, catalog: &Catalog) -> bool {
    catalog
        .cards()
        .iter()
        .all(|c| state.collection.contains_key(&c.key))
}

/// Catalog cards the run does not own, in catalog order.
pub fn missing_cards<'a>(state: &PlayerEconomyState, catalog: &'a Catalog) -> Vec<&'a Card> {
    catalog
        .cards()
        .iter()
        .filter(|c| !state.collection.contains_key(&c.key))
        .collect()
}

/// Run entries by level desc, copies desc, key asc.
pub fn sorted_terms(state: &PlayerEconomyState) -> Vec<CollectionEntry> {
    let mut terms: Vec<CollectionEntry> = state.collection.values().cloned().collect();
    terms.sort_by(|a, b| {
        b.level
            .cmp(&a.level)
            .then_with(|| b.copies.cmp(&a.copies))
            .then_with(|| a.term_key.cmp(&b.term_key))
    });
    terms
}

/// Keys stolen in the active layer, oldest first.
pub fn stolen_terms(state: &PlayerEconomyState) -> Vec<String> {
    state
        .stolen
        .iter()
        .filter(|m| m.layer == state.active_layer)
        .map(|m| m.term_key.clone())
        .collect()
}

/// Passive coins per second earned by the run's mutated cards.
pub fn passive_rate_cps(config: &BalanceConfig, state: &PlayerEconomyState) -> u64 {
    passive_rate(config, state.collection.values().map(|e| e.best_mutation))
}

fn card_rank(card: &Card, entry: &CollectionEntry) -> (u8, u8, u8, u32) {
    (
        card.tier.number(),
        card.rarity.rank(),
        entry.best_mutation.rank(),
        entry.copies,
    )
}

/// The most valuable owned card: highest tier, then rarity, mutation,
/// copies. Ties keep the first key in order.
pub fn best_card(state: &PlayerEconomyState, catalog: &Catalog) -> Option<BestCard> {
    state
        .collection
        .values()
        .filter_map(|entry| catalog.get(&entry.term_key).map(|card| (card, entry)))
        .reduce(|best, candidate| {
            if card_rank(candidate.0, candidate.1) > card_rank(best.0, best.1) {
                candidate
            } else {
                best
            }
        })
        .map(|(card, entry)| BestCard {
            term_key: card.key.clone(),
            term_name: card.name_in(state.active_layer).to_owned(),
            tier: card.tier.effective(state.active_layer),
            rarity: card.rarity,
            mutation: entry.best_mutation,
            copies: entry.copies,
        })
}

/// Lifetime totals across every layer.
pub fn lifetime_summary(state: &PlayerEconomyState, catalog: &Catalog) -> LifetimeSummary {
    let mut cards = state.lifetime.clone();
    cards.sort_by(|a, b| a.layer.cmp(&b.layer).then_with(|| a.term_key.cmp(&b.term_key)));
    cards.dedup_by(|a, b| a.layer == b.layer && a.term_key == b.term_key);

    let per_layer = Layer::ALL
        .into_iter()
        .map(|layer| LayerProgress {
            layer,
            collected: cards.iter().filter(|e| e.layer == layer).count(),
            total: catalog.len(),
        })
        .collect();

    let highest_per_layer = Layer::ALL
        .into_iter()
        .map(|layer| LayerHighest {
            layer,
            tier: cards
                .iter()
                .filter(|e| e.layer == layer)
                .filter_map(|e| catalog.get(&e.term_key))
                .map(|c| c.tier.effective(layer))
                .max(),
        })
        .collect();

    LifetimeSummary {
        total_unique: cards.len(),
        per_layer,
        cards,
        highest_per_layer,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use lucky_types::{Profile, SeasonWindow, Tier};

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_default()
    }

    fn state() -> PlayerEconomyState {
        let profile = Profile {
            nick_part_a: "Teal".to_owned(),
            nick_part_b: "Swift".to_owned(),
            nick_part_c: "Cache".to_owned(),
            display_name: "Teal Swift Cache".to_owned(),
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

    fn catalog() -> Catalog {
        Catalog::standard().unwrap()
    }

    #[test]
    fn duplicates_raise_copies_and_level() {
        let mut s = state();
        for _ in 0..3 {
            upsert_card(&mut s, "hello_world", 1, Mutation::None, at(1));
        }
        let entry = upsert_card(&mut s, "hello_world", 1, Mutation::None, at(1));
        assert_eq!(entry.copies, 4);
        assert_eq!(entry.level, 2);
        assert_eq!(s.lifetime_entry(Layer::BASE, "hello_world").map(|e| e.copies), Some(4));
    }

    #[test]
    fn best_mutation_never_downgrades() {
        let mut s = state();
        upsert_card(&mut s, "hello_world", 1, Mutation::Foil, at(1));
        upsert_card(&mut s, "hello_world", 1, Mutation::None, at(2));
        let entry = upsert_card(&mut s, "hello_world", 1, Mutation::Holo, at(3));
        assert_eq!(entry.best_mutation, Mutation::Holo);
        let entry = upsert_card(&mut s, "hello_world", 1, Mutation::Foil, at(4));
        assert_eq!(entry.best_mutation, Mutation::Holo);
    }

    #[test]
    fn loss_marks_stolen_until_recollected() {
        let mut s = state();
        upsert_card(&mut s, "merge_conflict", 1, Mutation::None, at(1));
        assert!(remove_card(&mut s, "merge_conflict", at(2)));
        assert!(!s.collection.contains_key("merge_conflict"));
        assert_eq!(stolen_terms(&s), vec!["merge_conflict".to_owned()]);
        assert!(s.lifetime_entry(Layer::BASE, "merge_conflict").is_some());

        assert!(!remove_card(&mut s, "merge_conflict", at(3)));
        assert_eq!(s.stolen.len(), 1);

        upsert_card(&mut s, "merge_conflict", 1, Mutation::None, at(4));
        assert!(stolen_terms(&s).is_empty());
        assert_eq!(s.lifetime_entry(Layer::BASE, "merge_conflict").map(|e| e.copies), Some(2));
    }

    #[test]
    fn terms_sort_by_level_copies_key() {
        let mut s = state();
        upsert_card(&mut s, "b_card", 1, Mutation::None, at(1));
        upsert_card(&mut s, "a_card", 1, Mutation::None, at(1));
        upsert_card(&mut s, "c_card", 4, Mutation::None, at(1));
        upsert_card(&mut s, "d_card", 2, Mutation::None, at(1));
        let keys: Vec<String> = sorted_terms(&s).into_iter().map(|e| e.term_key).collect();
        assert_eq!(keys, vec!["c_card", "d_card", "a_card", "b_card"]);
    }

    #[test]
    fn passive_rate_counts_best_mutations() {
        let config = BalanceConfig::default();
        let mut s = state();
        upsert_card(&mut s, "hello_world", 1, Mutation::Foil, at(1));
        upsert_card(&mut s, "stack_overflow", 1, Mutation::Holo, at(1));
        upsert_card(&mut s, "merge_conflict", 1, Mutation::None, at(1));
        assert_eq!(passive_rate_cps(&config, &s), 4);
    }

    #[test]
    fn completeness_and_missing_cards() {
        let catalog = catalog();
        let mut s = state();
        assert_eq!(missing_cards(&s, &catalog).len(), catalog.len());
        for card in catalog.cards() {
            upsert_card(&mut s, &card.key, 1, Mutation::None, at(1));
        }
        assert!(is_complete(&s, &catalog));
        assert!(missing_cards(&s, &catalog).is_empty());
    }

    #[test]
    fn best_card_prefers_tier_then_rarity() {
        let catalog = catalog();
        let mut s = state();
        assert_eq!(best_card(&s, &catalog), None);
        let low = catalog.tier_pool(Tier::FIRST)[0].key.clone();
        let high = catalog.tier_pool(Tier::LAST)[0].key.clone();
        upsert_card(&mut s, &low, 9, Mutation::Holo, at(1));
        upsert_card(&mut s, &high, 1, Mutation::None, at(1));
        let best = best_card(&s, &catalog).unwrap();
        assert_eq!(best.term_key, high);
        assert_eq!(best.tier, 6);
    }

    #[test]
    fn lifetime_summary_counts_per_layer() {
        let catalog = catalog();
        let mut s = state();
        upsert_card(&mut s, "hello_world", 1, Mutation::None, at(1));
        s.active_layer = Layer::REBORN;
        upsert_card(&mut s, "hello_world", 1, Mutation::None, at(2));
        let summary = lifetime_summary(&s, &catalog);
        assert_eq!(summary.total_unique, 2);
        assert_eq!(summary.per_layer.len(), 2);
        assert!(summary.per_layer.iter().all(|p| p.collected == 1 && p.total == 60));
        assert_eq!(
            summary.highest_per_layer,
            vec![
                LayerHighest { layer: Layer::BASE, tier: Some(1) },
                LayerHighest { layer: Layer::REBORN, tier: Some(7) },
            ]
        );
    }
}
