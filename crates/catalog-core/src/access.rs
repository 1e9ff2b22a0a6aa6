//! # Access Rules
//!
//! Ownership check for mutating catalog records.
//!
//! A product may be edited or deleted only by the user who created it.
//! The rule lives here, as a pure function of (actor, resource), so it can be
//! tested on its own and every store applies the same check.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::types::{Product, SessionUser};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    #[inline]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// A record with a single owning user.
pub trait Owned {
    /// Id of the owning user.
    fn owner_id(&self) -> &str;

    /// Short description used in error messages (`product <id>`).
    fn describe(&self) -> String;
}

impl Owned for Product {
    fn owner_id(&self) -> &str {
        &self.created_by
    }

    fn describe(&self) -> String {
        format!("product {}", self.id)
    }
}

/// Decides whether `actor` may modify `resource`.
pub fn authorize<R: Owned + ?Sized>(actor: &SessionUser, resource: &R) -> Access {
    if resource.owner_id() == actor.id {
        Access::Allow
    } else {
        Access::Deny
    }
}

/// Like [`authorize`], but turns a denial into `CoreError::NotOwner`.
pub fn ensure_owner<R: Owned + ?Sized>(actor: &SessionUser, resource: &R) -> CoreResult<()> {
    if authorize(actor, resource).is_allowed() {
        return Ok(());
    }
    Err(CoreError::NotOwner {
        actor: actor.id.clone(),
        resource: resource.describe(),
    })
}
