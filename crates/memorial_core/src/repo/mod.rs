//! Persistence boundary for memorial state.
//!
//! # Responsibility
//! - Define the string-keyed store contract the domain store writes through.
//! - Marshal the five state slots to and from JSON values under fixed keys.
//!
//! # Invariants
//! - SQL details stay inside `kv_store`.
//! - Stored values are whole-slot JSON documents; there are no partial
//!   updates and no value migrations.

pub mod kv_store;
pub mod snapshot_repo;
