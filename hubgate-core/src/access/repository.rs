use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid repository name '{name}': expected <organization>/<image>")]
pub struct RepositoryPathError {
    pub name: String,
}

/// A registry repository name split into its organization and image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPath {
    pub organization: String,
    pub image: String,
}

impl RepositoryPath {
    pub fn parse(name: &str) -> Result<Self, RepositoryPathError> {
        let invalid = || RepositoryPathError {
            name: name.to_string(),
        };

        let mut segments = name.split('/');
        let (Some(organization), Some(image), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(invalid());
        };

        if organization.is_empty() || image.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            organization: organization.to_string(),
            image: image.to_string(),
        })
    }
}

impl FromStr for RepositoryPath {
    type Err = RepositoryPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepositoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.image)
    }
}
