//! Authentication session state.
//!
//! Token issuance is the identity provider's business; this module only
//! tracks what the provider resolved to.

/// An authenticated user's credentials, as resolved by the identity
/// provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    /// Bearer token attached to every booking API call.
    pub id_token: String,
    /// Stable user id (`sub` claim), sent as `x-user-id` on bookings.
    pub subject: String,
    /// Display email, if the provider supplied one.
    pub email: Option<String>,
}

/// Where the sign-in flow currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// The provider is still resolving.
    Loading,
    /// No user signed in.
    Unauthenticated,
    /// Sign-in completed.
    Authenticated(UserSession),
    /// The provider reported an error; message surfaced as-is.
    Failed(String),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    /// The bearer token, when signed in.
    pub fn id_token(&self) -> Option<&str> {
        match self {
            Session::Authenticated(user) => Some(&user.id_token),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&UserSession> {
        match self {
            Session::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}
