//! # Session Context
//!
//! The acting identity for this console run.
//!
//! Authentication itself is out of scope: the console accepts an asserted
//! identity from the command line and threads it into recorded sales
//! (`created_by`) and screen gating. Swapping in a real auth collaborator
//! later only has to produce this same `Session` value.

use clap::ValueEnum;
use std::fmt;

/// Access role, used only for screen gating in the console.
///
/// Core and database layers never check roles; a cashier build of the
/// binary simply never reaches the catalog mutation prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    /// Full access, including catalog mutations.
    Admin,
    /// Register and log book only; read-only catalog.
    Cashier,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Cashier => write!(f, "cashier"),
        }
    }
}

/// Who is driving this console session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Recorded as `created_by` on every sale this session commits.
    pub user_id: String,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Session {
            user_id: user_id.into(),
            role,
        }
    }

    /// Whether this session may create, edit, or deactivate products.
    pub fn can_manage_catalog(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_gating() {
        assert!(Session::new("ada", Role::Admin).can_manage_catalog());
        assert!(!Session::new("sam", Role::Cashier).can_manage_catalog());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::Cashier.to_string(), "cashier");
    }
}
