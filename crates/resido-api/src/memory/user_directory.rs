use async_trait::async_trait;
use common::domain::{
    DomainResult, GetUserInput, ListApartmentMembersInput, UserDirectory, UserProfile,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory implementation of `UserDirectory`
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert_user(&self, profile: UserProfile) {
        let mut users = self.users.write().await;
        users.insert(profile.id.clone(), profile);
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user(&self, input: GetUserInput) -> DomainResult<Option<UserProfile>> {
        let users = self.users.read().await;
        Ok(users.get(&input.user_id).cloned())
    }

    async fn list_apartment_members(
        &self,
        input: ListApartmentMembersInput,
    ) -> DomainResult<Vec<UserProfile>> {
        let users = self.users.read().await;
        let mut members: Vec<UserProfile> = users
            .values()
            .filter(|profile| profile.apartment_id.as_deref() == Some(input.apartment_id.as_str()))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(members)
    }
}
