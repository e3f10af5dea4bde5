use std::sync::Arc;

use hubgate_core::access::{AuthLabel, AuthorizationRequest, Intent, RepositoryPath};
use tracing::{debug, info};

use super::error::AuthorizationError;
use crate::directory::{RepositoryDirectory, Visibility};

/// Stateless policy evaluator. Cheap to share, all state lives in the
/// directory.
#[derive(Clone)]
pub struct PolicyEngine {
    directory: Arc<dyn RepositoryDirectory>,
}

impl std::fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEngine").finish_non_exhaustive()
    }
}

impl PolicyEngine {
    pub fn new(directory: Arc<dyn RepositoryDirectory>) -> Self {
        Self { directory }
    }

    /// Decide whether the request may proceed.
    ///
    /// Returns `Ok(false)` for a policy deny and `Err` when the request is
    /// malformed or the directory could not be consulted.
    pub async fn authorize(&self, request: &AuthorizationRequest) -> Result<bool, AuthorizationError> {
        let intent = request
            .intent()
            .ok_or_else(|| AuthorizationError::UnrecognizedTask(request.actions.clone()))?;

        let authenticated = match request.auth_label() {
            AuthLabel::Missing => {
                info!(
                    "Permission denied: {} has no authentication label for {} on {}",
                    request.account, intent, request.name
                );
                return Ok(false);
            }
            AuthLabel::Authenticated => true,
            AuthLabel::Unauthenticated => false,
        };

        if !authenticated && intent != Intent::Pull {
            info!(
                "Permission denied: unauthenticated {} cannot {} on {}",
                request.account, intent, request.name
            );
            return Ok(false);
        }

        let path = RepositoryPath::parse(&request.name)?;

        let allowed = match intent {
            Intent::Pull => self.can_pull(&path, &request.account).await?,
            Intent::Push => self
                .directory
                .get_user_role(&path.organization, &request.account)
                .await?
                .is_some_and(|role| role.can_push()),
            Intent::Delete => self
                .directory
                .get_user_role(&path.organization, &request.account)
                .await?
                .is_some_and(|role| role.can_delete()),
        };

        if allowed {
            info!(
                "Permission granted: {} can {} on {}",
                request.account, intent, path
            );
        } else {
            info!(
                "Permission denied: {} cannot {} on {}",
                request.account, intent, path
            );
        }

        Ok(allowed)
    }

    /// The granted action list, or `None` when the request is denied.
    pub async fn allowed_actions(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Option<Vec<String>>, AuthorizationError> {
        let allowed = self.authorize(request).await?;
        Ok(allowed.then(|| request.actions.clone()))
    }

    async fn can_pull(
        &self,
        path: &RepositoryPath,
        account: &str,
    ) -> Result<bool, AuthorizationError> {
        let visibility = self
            .directory
            .get_visibility(&path.image, &path.organization)
            .await?;

        match visibility {
            Some(Visibility::Public) => Ok(true),
            Some(Visibility::Private) => Ok(self
                .directory
                .is_user_member(&path.organization, account)
                .await?),
            None => {
                debug!(
                    "Image {} is not known yet, falling back to membership of {}",
                    path, account
                );
                Ok(self
                    .directory
                    .is_user_member(&path.organization, account)
                    .await?)
            }
        }
    }
}
