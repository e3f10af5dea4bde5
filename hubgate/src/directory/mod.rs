//! Read access to the hub directory: image visibility and per-organization
//! user roles.
//!
//! Every lookup distinguishes three outcomes: a value, `None` for "no such
//! row", and `Err` when the backing store could not answer.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

mod error;
mod memory;
mod pool;
mod sql;

pub use error::DirectoryError;
pub use memory::InMemoryDirectory;
pub use pool::connect_pool;
pub use sql::SqlDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// Only `PUBLIC` (any case) is public. Every other stored value
    /// restricts the image to organization members.
    pub fn from_stored(value: &str) -> Self {
        if value.eq_ignore_ascii_case("PUBLIC") {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgRole {
    Admin,
    Push,
    Pull,
}

impl OrgRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgRole::Admin => "admin",
            OrgRole::Push => "push",
            OrgRole::Pull => "pull",
        }
    }

    pub fn can_push(&self) -> bool {
        matches!(self, OrgRole::Admin | OrgRole::Push)
    }

    pub fn can_delete(&self) -> bool {
        matches!(self, OrgRole::Admin)
    }
}

impl FromStr for OrgRole {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(OrgRole::Admin),
            "push" => Ok(OrgRole::Push),
            "pull" => Ok(OrgRole::Pull),
            other => Err(DirectoryError::InvalidValue {
                column: "USER_ROLE",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait RepositoryDirectory: Send + Sync {
    /// Visibility of `organization/image`, `None` if the image is unknown.
    async fn get_visibility(
        &self,
        image: &str,
        organization: &str,
    ) -> Result<Option<Visibility>, DirectoryError>;

    /// Role of `user` in `organization`, `None` if the user is not a member.
    async fn get_user_role(
        &self,
        organization: &str,
        user: &str,
    ) -> Result<Option<OrgRole>, DirectoryError>;

    /// Whether `user` has any role in `organization`.
    async fn is_user_member(&self, organization: &str, user: &str)
        -> Result<bool, DirectoryError>;
}
