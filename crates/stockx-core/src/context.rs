//! # Tenant Context
//!
//! Every ledger operation runs on behalf of one actor inside one store.
//! The context is built once at the edge (HTTP handler, seed binary) and
//! handed to the store-scoped repositories, which filter every query by
//! `store_id`. There is no default store and no default actor.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::{validate_actor, validate_required, ValidationResult};

/// Who is acting, and in which store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    store_id: String,
    actor: String,
}

impl TenantContext {
    /// Builds a context, rejecting blank store ids and actors.
    ///
    /// ## Example
    /// ```rust
    /// use stockx_core::TenantContext;
    ///
    /// let ctx = TenantContext::new("store-1", "alice").unwrap();
    /// assert_eq!(ctx.store_id(), "store-1");
    ///
    /// assert!(TenantContext::new("", "alice").is_err());
    /// ```
    pub fn new(store_id: impl Into<String>, actor: impl Into<String>) -> ValidationResult<Self> {
        let store_id = store_id.into().trim().to_string();
        let actor = actor.into().trim().to_string();

        validate_required("store", &store_id)?;
        validate_actor(&actor)?;

        Ok(Self { store_id, actor })
    }

    /// Read-only context: the actor is not recorded anywhere, but the
    /// store still scopes every query.
    pub fn reader(store_id: impl Into<String>) -> ValidationResult<Self> {
        Self::new(store_id, "reader")
    }

    #[inline]
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    #[inline]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Same store, different actor.
    pub fn with_actor(&self, actor: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(self.store_id.clone(), actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_inputs() {
        let ctx = TenantContext::new("  store-1 ", " bob ").unwrap();
        assert_eq!(ctx.store_id(), "store-1");
        assert_eq!(ctx.actor(), "bob");
    }

    #[test]
    fn test_rejects_blank_store() {
        let err = TenantContext::new("   ", "bob").unwrap_err();
        assert!(matches!(err, ValidationError::Required { ref field } if field == "store"));
    }

    #[test]
    fn test_rejects_blank_actor() {
        assert!(TenantContext::new("store-1", "").is_err());
    }

    #[test]
    fn test_with_actor_keeps_store() {
        let ctx = TenantContext::reader("store-1").unwrap();
        let writer = ctx.with_actor("carol").unwrap();
        assert_eq!(writer.store_id(), "store-1");
        assert_eq!(writer.actor(), "carol");
    }
}
