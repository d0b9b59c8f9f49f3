//! URL building for the hosted identity provider.
//!
//! The provider owns the whole protocol; we only produce the redirect URLs
//! for its hosted sign-in and logout endpoints.

use reqwest::Url;

/// Identity provider endpoints and client registration.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Hosted UI base URL (e.g. `https://auth.example.com`).
    pub domain: Url,
    /// OAuth client id registered with the provider.
    pub client_id: String,
    /// Where the provider sends the user back after sign-in/out.
    pub redirect_uri: String,
}

impl IdentityConfig {
    /// Load from `IDP_DOMAIN`, `IDP_CLIENT_ID`, and `IDP_REDIRECT_URI`.
    ///
    /// Panics on a missing variable or an unparseable domain; identity
    /// misconfiguration should fail at startup, not at first sign-in.
    pub fn from_env() -> Self {
        let domain = std::env::var("IDP_DOMAIN").expect("IDP_DOMAIN must be set");
        let domain: Url = domain
            .parse()
            .unwrap_or_else(|e| panic!("Invalid IDP_DOMAIN '{domain}': {e}"));
        let client_id = std::env::var("IDP_CLIENT_ID").expect("IDP_CLIENT_ID must be set");
        let redirect_uri = std::env::var("IDP_REDIRECT_URI").expect("IDP_REDIRECT_URI must be set");

        Self {
            domain,
            client_id,
            redirect_uri,
        }
    }

    /// Authorization-code sign-in redirect URL on the hosted UI.
    pub fn signin_url(&self) -> Url {
        let mut url = self.domain.clone();
        url.set_path("/login");
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("scope", "email openid")
            .append_pair("redirect_uri", &self.redirect_uri);
        url
    }

    /// Logout URL, parameterized by client id and post-logout redirect.
    pub fn logout_url(&self) -> Url {
        let mut url = self.domain.clone();
        url.set_path("/logout");
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("logout_uri", &self.redirect_uri);
        url
    }
}
