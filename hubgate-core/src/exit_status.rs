use std::process::ExitCode;

/// Process outcomes understood by the registry auth server's external
/// authn/authz hooks. Code 2 means "no match" to the auth server and is
/// never used here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Allowed,
    Denied,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Allowed => 0,
            ExitStatus::Denied => 1,
            ExitStatus::Failure => 3,
        }
    }
}

impl From<bool> for ExitStatus {
    fn from(allowed: bool) -> Self {
        if allowed {
            ExitStatus::Allowed
        } else {
            ExitStatus::Denied
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
