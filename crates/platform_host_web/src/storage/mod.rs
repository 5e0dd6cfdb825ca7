//! Browser persistent storage adapters.

pub mod local_storage;
