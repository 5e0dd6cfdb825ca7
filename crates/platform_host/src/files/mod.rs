//! Text file transfer contracts and adapters.

pub mod service;
