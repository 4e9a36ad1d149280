//! Key-value persistence
//!
//! The profile store talks to storage only through [`KeyValueStore`]. Values
//! are opaque strings; the store never interprets them.
//!
//! ## Scopes
//!
//! - **User**: keys private to the store's owner (profile, recipes, owned collectibles)
//! - **Shared**: keys visible to every user (marketplace listings)

pub mod memory;
pub mod postgres;

use crate::error::Result;
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Namespace used for shared keys
pub const SHARED_NAMESPACE: &str = "shared";

/// Visibility of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    User,
    Shared,
}

impl Scope {
    /// Storage namespace for this scope when owned by `owner`
    pub fn namespace(self, owner: &str) -> String {
        match self {
            Scope::User => format!("user:{}", owner),
            Scope::Shared => SHARED_NAMESPACE.to_string(),
        }
    }
}

/// Persistent key-value facility
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<String>>;

    /// Overwrite a value
    async fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_namespaces() {
        assert_eq!(Scope::User.namespace("alice"), "user:alice");
        assert_eq!(Scope::Shared.namespace("alice"), "shared");
        // A user literally named "shared" must not collide with shared keys
        assert_ne!(Scope::User.namespace("shared"), Scope::Shared.namespace("shared"));
    }
}
