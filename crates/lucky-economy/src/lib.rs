//! Player economy engine for Lucky Agent.
//!
//! This crate owns everything that happens to one player's record: pack
//! draws, the collection and its lifetime ledger, idle income and the auto
//! opener, season rollover, rebirth, the missing-card gift, profiles and
//! debug actions. The [`Economy`] facade runs every operation as one
//! read-transform-write over the whole record.
//!
//! # Architecture
//!
//! - [`engine`] -- The [`Economy`] facade and its operation pipeline.
//! - [`resolver`] -- Tier, rarity, mutation and card selection for one draw.
//! - [`collection`] -- Collection upserts, losses, completeness and summaries.
//! - [`accrual`] -- Heartbeat window, passive income and auto opens.
//! - [`season`] -- Season rollover, history and rebirth.
//! - [`gift`] -- The flat-price missing-card purchase.
//! - [`profile`] -- Generated nicknames and display name rules.
//! - [`debug`] -- Debug actions for test accounts.
//! - [`record`] / [`migration`] / [`store`] -- Persistence: load, upgrade old
//!   records, save, and the storage port.
//! - [`snapshot`] -- The caller-facing view of a record.
//!
//! Time and randomness are always parameters. Nothing here reads the system
//! clock or a global RNG, so a fixed `now` and a seeded RNG replay exactly.

pub mod accrual;
pub mod collection;
pub mod debug;
pub mod engine;
pub mod error;
pub mod gift;
pub mod migration;
pub mod profile;
pub mod record;
pub mod resolver;
pub mod season;
pub mod snapshot;
pub mod store;

pub use debug::DebugAction;
pub use engine::{Economy, OpContext, Response, Rules};
pub use error::{EconomyError, ErrorKind};
pub use profile::NicknameUpdate;
pub use record::{LoadedRecord, RecordOrigin};
pub use store::{KeyValueStore, MemoryStore, StoreError};
