//! RemixCuisine library crate
//!
//! Profile store, reward ledger and AI recipe generation for the
//! RemixCuisine front-end. Re-exports the core types for the binary and
//! integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod ledger;
pub mod marketplace;
pub mod models;
pub mod profile_store;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use generator::{AnthropicGenerator, RecipeGenerator, RecipeRequest};
pub use ledger::{Acquisition, RewardAction, RewardLedger};
pub use models::{Badge, CollectibleListing, Recipe, UserProfile};
pub use profile_store::ProfileStore;
pub use session::Session;
pub use storage::{KeyValueStore, MemoryStore, PgStore, Scope};
