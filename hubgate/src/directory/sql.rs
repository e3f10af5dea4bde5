use async_trait::async_trait;
use sqlx::AnyPool;
use tracing::debug;

use super::{DirectoryError, OrgRole, RepositoryDirectory, Visibility};

const VISIBILITY_QUERY: &str = "SELECT REGISTRY_ARTIFACT_IMAGE.VISIBILITY \
     FROM REGISTRY_ARTIFACT_IMAGE \
     INNER JOIN REGISTRY_ORGANIZATION \
     ON REGISTRY_ORGANIZATION.ORG_NAME = REGISTRY_ARTIFACT_IMAGE.ORG_NAME \
     WHERE REGISTRY_ARTIFACT_IMAGE.IMAGE_NAME = ? AND REGISTRY_ORGANIZATION.ORG_NAME = ? \
     LIMIT 1";

const MEMBERSHIP_QUERY: &str =
    "SELECT 1 FROM REGISTRY_ORG_USER_MAPPING WHERE USER_UUID = ? AND ORG_NAME = ? LIMIT 1";

const ROLE_QUERY: &str =
    "SELECT USER_ROLE FROM REGISTRY_ORG_USER_MAPPING WHERE USER_UUID = ? AND ORG_NAME = ? LIMIT 1";

/// Directory backed by the hub's relational schema.
#[derive(Debug, Clone)]
pub struct SqlDirectory {
    pool: AnyPool,
}

impl SqlDirectory {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

#[async_trait]
impl RepositoryDirectory for SqlDirectory {
    async fn get_visibility(
        &self,
        image: &str,
        organization: &str,
    ) -> Result<Option<Visibility>, DirectoryError> {
        let value: Option<String> = sqlx::query_scalar(VISIBILITY_QUERY)
            .bind(image)
            .bind(organization)
            .fetch_optional(&self.pool)
            .await?;

        debug!(
            organization,
            image,
            visibility = ?value,
            "Visibility lookup"
        );

        Ok(value.as_deref().map(Visibility::from_stored))
    }

    async fn get_user_role(
        &self,
        organization: &str,
        user: &str,
    ) -> Result<Option<OrgRole>, DirectoryError> {
        let value: Option<String> = sqlx::query_scalar(ROLE_QUERY)
            .bind(user)
            .bind(organization)
            .fetch_optional(&self.pool)
            .await?;

        debug!(organization, user, role = ?value, "Role lookup");

        value.map(|role| role.parse()).transpose()
    }

    async fn is_user_member(
        &self,
        organization: &str,
        user: &str,
    ) -> Result<bool, DirectoryError> {
        let row = sqlx::query(MEMBERSHIP_QUERY)
            .bind(user)
            .bind(organization)
            .fetch_optional(&self.pool)
            .await?;

        debug!(organization, user, member = row.is_some(), "Membership lookup");

        Ok(row.is_some())
    }
}
