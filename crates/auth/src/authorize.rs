use thiserror::Error;

use crate::{Permission, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{role}' lacks permission '{permission}'")]
    Forbidden { role: Role, permission: String },
}

/// Static role → permission mapping.
pub fn permissions_for(role: Role) -> Vec<Permission> {
    match role {
        Role::Editor => vec![Permission::WILDCARD],
        Role::Viewer => vec![Permission::PARTS_READ, Permission::REPORTS_READ],
    }
}

/// Check that `role` holds `required`.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(role: Role, required: &Permission) -> Result<(), AuthzError> {
    let granted = permissions_for(role)
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            role,
            permission: required.as_str().to_string(),
        })
    }
}
