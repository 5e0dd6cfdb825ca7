//! Persistent storage contracts and adapters.

pub mod persistent;
