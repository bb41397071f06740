//! The card catalog: every drawable card with its tier, rarity and value.
//!
//! The standard catalog has ten cards per tier. Within a tier, positions
//! 0-4 are common, 5-8 rare and 9 legendary; base value rises by 9 per
//! position from the tier's base. Layer 2 shows every card under a
//! "booster" name taken from the same position in a second name table.

use std::collections::BTreeMap;

use lucky_types::{Layer, Rarity, TIER_COUNT, Tier};

/// Errors raised when building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two cards share a key.
    #[error("duplicate card key: {key}")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// A card key is empty after slugging.
    #[error("card name {name:?} produces an empty key")]
    EmptyKey {
        /// The offending display name.
        name: String,
    },

    /// A tier has no cards, so draws there cannot resolve.
    #[error("tier {tier} has no cards")]
    EmptyTier {
        /// The empty tier.
        tier: Tier,
    },
}

/// One catalog card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Stable key, the slug of `name`.
    pub key: String,
    /// Display name in layer 1.
    pub name: String,
    /// Display name in layer 2.
    pub booster_name: String,
    /// Base tier.
    pub tier: Tier,
    /// Catalog rarity.
    pub rarity: Rarity,
    /// Base value before the reward factor.
    pub base_bp: u32,
}

impl Card {
    /// Display name in `layer`.
    pub fn name_in(&self, layer: Layer) -> &str {
        if layer == Layer::BASE {
            &self.name
        } else {
            &self.booster_name
        }
    }
}

/// Immutable set of drawable cards with lookup by key, tier and rarity.
#[derive(Debug, Clone)]
pub struct Catalog {
    cards: Vec<Card>,
    by_key: BTreeMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from explicit cards.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on duplicate or empty keys, or if any tier
    /// has no cards.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, CatalogError> {
        let mut by_key = BTreeMap::new();
        for (index, card) in cards.iter().enumerate() {
            if card.key.is_empty() {
                return Err(CatalogError::EmptyKey {
                    name: card.name.clone(),
                });
            }
            if by_key.insert(card.key.clone(), index).is_some() {
                return Err(CatalogError::DuplicateKey {
                    key: card.key.clone(),
                });
            }
        }
        for tier in Tier::ALL {
            if !cards.iter().any(|c| c.tier == tier) {
                return Err(CatalogError::EmptyTier { tier });
            }
        }
        Ok(Self { cards, by_key })
    }

    /// The shipped 60-card catalog.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in tables are inconsistent.
    pub fn standard() -> Result<Self, CatalogError> {
        let mut cards = Vec::with_capacity(TIER_COUNT.saturating_mul(10));
        for ((tier, names), (boosters, base)) in Tier::ALL
            .iter()
            .zip(TIER_NAMES.iter())
            .zip(BOOSTER_NAMES.iter().zip(TIER_BASE_BP.iter()))
        {
            let mut base_bp = *base;
            for (position, (name, booster)) in names.iter().zip(boosters.iter()).enumerate() {
                cards.push(Card {
                    key: slug(name),
                    name: (*name).to_owned(),
                    booster_name: (*booster).to_owned(),
                    tier: *tier,
                    rarity: rarity_for_position(position),
                    base_bp,
                });
                base_bp = base_bp.saturating_add(BASE_BP_STEP);
            }
        }
        Self::from_cards(cards)
    }

    /// Card by key.
    pub fn get(&self, key: &str) -> Option<&Card> {
        self.by_key.get(key).and_then(|i| self.cards.get(*i))
    }

    /// Whether `key` names a catalog card.
    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// All cards, tier then position order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the catalog is empty. Never true for a built catalog.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards of `tier`.
    pub fn tier_pool(&self, tier: Tier) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.tier == tier).collect()
    }

    /// Cards of `tier` with `rarity`, falling back to the whole tier when
    /// that bucket is empty.
    pub fn draw_pool(&self, tier: Tier, rarity: Rarity) -> Vec<&Card> {
        let exact: Vec<&Card> = self
            .cards
            .iter()
            .filter(|c| c.tier == tier && c.rarity == rarity)
            .collect();
        if exact.is_empty() {
            self.tier_pool(tier)
        } else {
            exact
        }
    }

    /// Display name of `key` in `layer`.
    pub fn presentation(&self, key: &str, layer: Layer) -> Option<&str> {
        self.get(key).map(|c| c.name_in(layer))
    }
}

/// Lowercase slug: runs of non-alphanumerics become `_`, trimmed at the ends.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

const fn rarity_for_position(position: usize) -> Rarity {
    match position {
        0..=4 => Rarity::Common,
        5..=8 => Rarity::Rare,
        _ => Rarity::Legendary,
    }
}

const BASE_BP_STEP: u32 = 9;

const TIER_BASE_BP: [u32; TIER_COUNT] = [60, 110, 170, 240, 320, 410];

const TIER_NAMES: [[&str; 10]; TIER_COUNT] = [
    [
        "Hello World",
        "Stack Overflow",
        "Console Log",
        "TODO Comment",
        "Off-by-One Error",
        "Infinite Loop",
        "Rubber Duck",
        "Missing Semicolon",
        "Copy-Paste Dev",
        "Git Commit",
    ],
    [
        "Merge Conflict",
        "npm Install",
        "404 Not Found",
        "Debugger Breakpoint",
        "JSON Parse Error",
        "API Timeout",
        "Version Mismatch",
        "Environment Variable",
        "Hotfix Friday",
        "Regex Attempt",
    ],
    [
        "Async Await",
        "REST API",
        "Unit Test",
        "Docker Container",
        "CI Pipeline",
        "Code Review",
        "Refactor",
        "Memory Leak",
        "SQL Injection",
        "Cache Miss",
    ],
    [
        "Microservices",
        "Distributed System",
        "Event Loop",
        "Race Condition",
        "Load Balancer",
        "Tech Debt",
        "Deadlock",
        "Observability",
        "Feature Flag",
        "Blue-Green Deploy",
    ],
    [
        "Compiler",
        "Kernel",
        "Zero-Day",
        "Concurrency Wizard",
        "Performance Tuning",
        "AI Model",
        "Bare Metal",
        "Scalability",
        "Production Hotfix",
        "Immutable Infrastructure",
    ],
    [
        "The Clean Code",
        "Infinite Uptime",
        "No Merge Conflicts",
        "Self-Healing System",
        "The Senior Who Knows Everything",
        "The One Who Uses Vim",
        "Linus Mode",
        "The Bug That Was Documentation",
        "100% Test Coverage",
        "It Works On First Try",
    ],
];

const BOOSTER_NAMES: [[&str; 10]; TIER_COUNT] = [
    [
        "Lint Warning",
        "Typo in Variable",
        "Whitespace Fix",
        "README Update",
        "Branch Rename",
        "Package Lock Drift",
        "Stale Cache",
        "Broken Link",
        "Quick Patch",
        "Config Toggle",
    ],
    [
        "Expired Token",
        "CORS Blocked",
        "Schema Mismatch",
        "Flaky Test",
        "Circular Dependency",
        "API Contract Drift",
        "Queue Backlog",
        "Retry Storm",
        "Permission Denied",
        "Rollback Plan",
    ],
    [
        "Feature Rollout",
        "Canary Analysis",
        "Read Replica Lag",
        "Idempotency Key",
        "Saga Orchestrator",
        "Event Sourcing",
        "CQRS Split",
        "Service Mesh",
        "Cost Optimization",
        "Latency Budget",
    ],
    [
        "Regional Failover",
        "Chaos Experiment",
        "Backpressure Valve",
        "Adaptive Throttling",
        "Shard Rebalancer",
        "Exactly Once Myth",
        "Consensus Quorum",
        "Snapshot Recovery",
        "Zero Downtime Migration",
        "Blast Radius Control",
    ],
    [
        "Kernel Bypass IO",
        "Lock Free Queue",
        "Vectorized Query",
        "Compiler Inlining",
        "Deterministic Build",
        "Memory Model",
        "Formal Verification",
        "Protocol Upgrade",
        "Post Quantum Readiness",
        "Global Consistency",
    ],
    [
        "Self Tuning Runtime",
        "Autonomous Incident Commander",
        "Planet Scale Ledger",
        "Provable Resilience",
        "Universal Schema Graph",
        "Causal Time Machine",
        "Runtime Synthesis",
        "Adaptive Consensus",
        "Generalized Optimizer",
        "Singularity Release",
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let built = Catalog::standard();
        assert!(built.is_ok(), "{:?}", built.err());
        built.ok().unwrap_or(Catalog {
            cards: Vec::new(),
            by_key: BTreeMap::new(),
        })
    }

    #[test]
    fn standard_catalog_has_sixty_cards() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 60);
        for tier in Tier::ALL {
            assert_eq!(catalog.tier_pool(tier).len(), 10);
        }
    }

    #[test]
    fn slug_matches_key_rules() {
        assert_eq!(slug("Hello World"), "hello_world");
        assert_eq!(slug("Off-by-One Error"), "off_by_one_error");
        assert_eq!(slug("100% Test Coverage"), "100_test_coverage");
        assert_eq!(slug("  --Trim Me--  "), "trim_me");
        assert_eq!(slug("!!!"), "");
    }

    #[test]
    fn positions_map_to_rarity_and_value() {
        let catalog = catalog();
        let hello = catalog.get("hello_world");
        assert_eq!(hello.map(|c| (c.base_bp, c.rarity)), Some((60, Rarity::Common)));
        let so = catalog.get("stack_overflow");
        assert_eq!(so.map(|c| c.base_bp), Some(69));
        let duck = catalog.get("rubber_duck");
        assert_eq!(duck.map(|c| c.rarity), Some(Rarity::Rare));
        let commit = catalog.get("git_commit");
        assert_eq!(commit.map(|c| (c.base_bp, c.rarity)), Some((141, Rarity::Legendary)));
        let merge = catalog.get("merge_conflict");
        assert_eq!(merge.map(|c| c.tier.number()), Some(2));
    }

    #[test]
    fn every_tier_has_one_legendary() {
        let catalog = catalog();
        for tier in Tier::ALL {
            assert_eq!(catalog.draw_pool(tier, Rarity::Legendary).len(), 1);
            assert_eq!(catalog.draw_pool(tier, Rarity::Common).len(), 5);
            assert_eq!(catalog.draw_pool(tier, Rarity::Rare).len(), 4);
        }
    }

    #[test]
    fn presentation_switches_in_second_layer() {
        let catalog = catalog();
        assert_eq!(
            catalog.presentation("hello_world", Layer::BASE),
            Some("Hello World")
        );
        assert_eq!(
            catalog.presentation("hello_world", Layer::REBORN),
            Some("Lint Warning")
        );
        assert_eq!(catalog.presentation("nope", Layer::BASE), None);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let card = Card {
            key: "dup".to_owned(),
            name: "Dup".to_owned(),
            booster_name: "Dup".to_owned(),
            tier: Tier::FIRST,
            rarity: Rarity::Common,
            base_bp: 1,
        };
        let result = Catalog::from_cards(vec![card.clone(), card]);
        assert!(matches!(result, Err(CatalogError::DuplicateKey { .. })));
    }

    #[test]
    fn draw_pool_falls_back_to_whole_tier() {
        let cards = Tier::ALL
            .iter()
            .map(|tier| Card {
                key: format!("only_{}", tier.number()),
                name: format!("Only {}", tier.number()),
                booster_name: String::new(),
                tier: *tier,
                rarity: Rarity::Common,
                base_bp: 10,
            })
            .collect();
        let catalog = Catalog::from_cards(cards).ok();
        let pool = catalog
            .as_ref()
            .map(|c| c.draw_pool(Tier::FIRST, Rarity::Legendary).len());
        assert_eq!(pool, Some(1));
    }
}
