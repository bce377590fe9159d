//! Permissions granted to code loaded from a module

use std::sync::{Arc, LazyLock};

/// A single granted permission
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Implies every other permission
    All,

    /// File access; a target ending in `/-` covers everything below that directory
    File { target: String, actions: Vec<String> },

    /// Read or write access to a named property; `*` covers all properties
    Property { name: String, actions: Vec<String> },

    /// A named runtime capability
    Runtime(String),
}

impl Permission {
    /// Check whether holding `self` grants `other`
    pub fn implies(&self, other: &Permission) -> bool {
        match (self, other) {
            (Permission::All, _) => true,
            (
                Permission::File { target, actions },
                Permission::File {
                    target: wanted,
                    actions: wanted_actions,
                },
            ) => file_target_covers(target, wanted) && covers_actions(actions, wanted_actions),
            (
                Permission::Property { name, actions },
                Permission::Property {
                    name: wanted,
                    actions: wanted_actions,
                },
            ) => (name == "*" || name == wanted) && covers_actions(actions, wanted_actions),
            (Permission::Runtime(a), Permission::Runtime(b)) => a == b,
            _ => false,
        }
    }
}

fn file_target_covers(target: &str, wanted: &str) -> bool {
    match target.strip_suffix("/-") {
        Some(dir) => wanted.starts_with(dir) && wanted[dir.len()..].starts_with('/'),
        None => target == wanted,
    }
}

fn covers_actions(granted: &[String], wanted: &[String]) -> bool {
    wanted.iter().all(|w| granted.iter().any(|g| g == w))
}

/// An immutable collection of permissions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionSet {
    permissions: Vec<Permission>,
}

impl PermissionSet {
    pub fn new(permissions: Vec<Permission>) -> Self {
        Self { permissions }
    }

    /// A set that grants nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Check whether any member permission grants `permission`
    pub fn implies(&self, permission: &Permission) -> bool {
        self.permissions.iter().any(|p| p.implies(permission))
    }
}

static DEFAULT_PERMISSIONS: LazyLock<Arc<PermissionSet>> =
    LazyLock::new(|| Arc::new(PermissionSet::new(vec![Permission::All])));

/// The process-wide default permission set
///
/// Every call returns the same shared instance.
pub fn default_permissions() -> Arc<PermissionSet> {
    Arc::clone(&DEFAULT_PERMISSIONS)
}
