use std::fmt;

/// Reasons a login is refused. `Display` is the text shown to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginError {
    AuthenticationFailed,
    AccountDisabled,
    GridUnavailable,
    MalformedRequest(String),
}

impl LoginError {
    /// Short machine-readable reason, as production grids send it
    pub fn reason(&self) -> &'static str {
        match self {
            LoginError::AuthenticationFailed => "key",
            LoginError::AccountDisabled => "disabled",
            LoginError::GridUnavailable => "presence",
            LoginError::MalformedRequest(_) => "malformed",
        }
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::AuthenticationFailed => write!(
                f,
                "Could not authenticate your avatar. Please check your username and password."
            ),
            LoginError::AccountDisabled => write!(f, "This account has been disabled."),
            LoginError::GridUnavailable => {
                write!(f, "The grid is not accepting logins right now. Please try again later.")
            }
            LoginError::MalformedRequest(detail) => {
                write!(f, "Malformed login request: {}", detail)
            }
        }
    }
}

impl std::error::Error for LoginError {}
