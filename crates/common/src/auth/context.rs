use crate::domain::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Platform role attached to an authenticated principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Resident,
    Admin,
    SuperAdmin,
}

/// Authenticated principal context, supplied per request by the platform's
/// authentication layer. This core trusts it and performs no credential
/// verification of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
    pub role: Role,
    pub apartment_id: Option<String>,
}

impl UserContext {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::SuperAdmin)
    }

    /// Require an admin or super-admin caller
    pub fn require_admin(&self) -> DomainResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied(format!(
                "User {} is not an admin",
                self.user_id
            )))
        }
    }

    /// Require the caller to belong to an apartment
    pub fn require_apartment(&self) -> DomainResult<&str> {
        self.apartment_id.as_deref().ok_or_else(|| {
            DomainError::ValidationError(format!(
                "User {} has no apartment context",
                self.user_id
            ))
        })
    }
}
