use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    RwLock,
};

use async_trait::async_trait;

use super::{DirectoryError, OrgRole, RepositoryDirectory, Visibility};

/// Map-backed directory for tests and fixtures.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    images: RwLock<HashMap<(String, String), Visibility>>,
    roles: RwLock<HashMap<(String, String), OrgRole>>,
    unavailable: AtomicBool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, organization: &str, image: &str, visibility: Visibility) -> Self {
        self.images
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((organization.to_string(), image.to_string()), visibility);
        self
    }

    pub fn with_member(self, organization: &str, user: &str, role: OrgRole) -> Self {
        self.roles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((organization.to_string(), user.to_string()), role);
        self
    }

    /// Make every lookup fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DirectoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DirectoryError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryDirectory for InMemoryDirectory {
    async fn get_visibility(
        &self,
        image: &str,
        organization: &str,
    ) -> Result<Option<Visibility>, DirectoryError> {
        self.check_available()?;
        let images = self.images.read().unwrap_or_else(|e| e.into_inner());
        Ok(images
            .get(&(organization.to_string(), image.to_string()))
            .copied())
    }

    async fn get_user_role(
        &self,
        organization: &str,
        user: &str,
    ) -> Result<Option<OrgRole>, DirectoryError> {
        self.check_available()?;
        let roles = self.roles.read().unwrap_or_else(|e| e.into_inner());
        Ok(roles
            .get(&(organization.to_string(), user.to_string()))
            .copied())
    }

    async fn is_user_member(
        &self,
        organization: &str,
        user: &str,
    ) -> Result<bool, DirectoryError> {
        Ok(self.get_user_role(organization, user).await?.is_some())
    }
}
