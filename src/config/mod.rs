//! Configuration module for watch runs
//!
//! This module provides the `WatchConfig` struct, its type-safe builder and
//! the environment loader used by the binary.

// Sub-modules
pub mod builder;
pub mod env;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{WatchConfigBuilder, WithTelegram};
pub use types::{ListingSelectors, WatchConfig};
