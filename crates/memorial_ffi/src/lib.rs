//! Flutter-facing bindings for the memorial core.

pub mod api;
