use crate::auth::Role;
use crate::domain::result::DomainResult;
use async_trait::async_trait;

/// Profile view of a platform user, supplied by the external user
/// directory. Used for recipient expansion and email resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub apartment_id: Option<String>,
    pub role: Role,
}

/// Input for fetching a user profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetUserInput {
    pub user_id: String,
}

/// Input for expanding an apartment into its member profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListApartmentMembersInput {
    pub apartment_id: String,
}

/// Directory of platform users, owned by the wider platform
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Get a user profile by ID
    async fn get_user(&self, input: GetUserInput) -> DomainResult<Option<UserProfile>>;

    /// List all members of an apartment
    async fn list_apartment_members(
        &self,
        input: ListApartmentMembersInput,
    ) -> DomainResult<Vec<UserProfile>>;
}
