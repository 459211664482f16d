//! Use-case services over the persistent store.
//!
//! # Responsibility
//! - Own session state and its explicit save-after-mutation cycle.
//! - Orchestrate bulk imports against that state.
//! - Keep FFI/CLI layers decoupled from storage details.

pub mod import_service;
pub mod memorial_store;
pub mod notice;
