//! CLI command implementations.

pub mod config;
pub mod distance;
pub mod locate;
pub mod serve;
pub mod simulate;
pub mod zones;
