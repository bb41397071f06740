//! Balance rules for the Lucky Agent pack economy.
//!
//! Everything in this crate is pure: functions take an immutable
//! [`BalanceConfig`] (and an injected RNG where a draw is involved) and never
//! touch player state directly.
//!
//! # Modules
//!
//! - [`config`] -- Balance configuration loaded from `lucky-balance.yaml`.
//! - [`catalog`] -- The drawable card catalog.
//! - [`distribution`] -- Tier, rarity and mutation weight tables and the
//!   weighted pick.
//! - [`reward`] -- Coin reward for one card.
//! - [`clock`] -- Season windows from wall-clock time.
//! - [`numeric`] -- Float/integer conversion helpers.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod distribution;
pub mod numeric;
pub mod reward;

pub use catalog::{Card, Catalog, CatalogError};
pub use clock::{ClockError, SeasonClock};
pub use config::{BalanceConfig, ConfigError};
pub use distribution::Weights;
