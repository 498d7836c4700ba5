//! GitHub Identity Provider
//!
//! Authorization Code flow against GitHub:
//!
//! 1. [`authorize_url`](IdentityProvider::authorize_url) sends the
//!    browser to GitHub with the `user:email` scope and the caller's `state`.
//! 2. [`fetch_assertion`](IdentityProvider::fetch_assertion) exchanges
//!    the callback code for an access token, reads `/user` and, when the
//!    profile has no public email, picks the primary verified address from
//!    `/user/emails`.
//!
//! The GitHub numeric account id becomes the external uid.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use url::Url;

use crate::domain::entity::auth_assertion::AuthAssertion;
use crate::domain::identity_provider::IdentityProvider;
use crate::domain::value_object::provider::{ExternalUid, ProviderName};
use crate::error::{AuthError, AuthResult};

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_BASE: &str = "https://api.github.com";
const API_USER_AGENT: &str = "qa-backend";

/// OAuth app credentials registered on GitHub
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: i64,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// `oauth2::Client` with the authorize and token endpoints set
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

pub struct GithubProvider {
    name: ProviderName,
    client: ConfiguredClient,
    http: reqwest::Client,
    api_base: Url,
}

impl GithubProvider {
    pub fn new(config: GithubConfig) -> AuthResult<Self> {
        let auth_url = AuthUrl::new(AUTHORIZE_URL.to_string())
            .map_err(|e| AuthError::Internal(format!("Invalid GitHub authorize URL: {e}")))?;
        let token_url = TokenUrl::new(TOKEN_URL.to_string())
            .map_err(|e| AuthError::Internal(format!("Invalid GitHub token URL: {e}")))?;
        let redirect_url = RedirectUrl::new(config.redirect_url)
            .map_err(|e| AuthError::Internal(format!("Invalid GITHUB_REDIRECT_URL: {e}")))?;
        let api_base = Url::parse(API_BASE)
            .map_err(|e| AuthError::Internal(format!("Invalid GitHub API URL: {e}")))?;

        let client = BasicClient::new(ClientId::new(config.client_id))
            .set_client_secret(ClientSecret::new(config.client_secret))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url);

        // Token exchange must not follow redirects
        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: ProviderName::from_db("github"),
            client,
            http,
            api_base,
        })
    }

    async fn api_get<T>(&self, path: &str, access_token: &str) -> AuthResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self
            .api_base
            .join(path)
            .map_err(|e| AuthError::Internal(format!("GitHub API path {path}: {e}")))?;

        self.http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, API_USER_AGENT)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AuthError::Provider(format!("GitHub {path}: {e}")))?
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("GitHub {path} body: {e}")))
    }

    async fn primary_email(&self, access_token: &str) -> AuthResult<Option<String>> {
        let emails: Vec<GithubEmail> = self.api_get("/user/emails", access_token).await?;
        Ok(emails
            .into_iter()
            .find(|e| e.primary && e.verified)
            .map(|e| e.email))
    }
}

impl IdentityProvider for GithubProvider {
    fn name(&self) -> &ProviderName {
        &self.name
    }

    fn authorize_url(&self, state: &str) -> String {
        let (url, _) = self
            .client
            .authorize_url(|| CsrfToken::new(state.to_string()))
            .add_scope(Scope::new("user:email".to_string()))
            .url();
        url.to_string()
    }

    async fn fetch_assertion(&self, code: &str) -> AuthResult<AuthAssertion> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::Provider(format!("GitHub token exchange failed: {e}")))?;
        let access_token = token.access_token().secret();

        let user: GithubUser = self.api_get("/user", access_token).await?;

        let email = match user.email.filter(|email| !email.trim().is_empty()) {
            Some(email) => Some(email),
            None => self.primary_email(access_token).await?,
        };

        let uid = ExternalUid::new(user.id.to_string())
            .map_err(|e| AuthError::Provider(format!("GitHub user id: {e}")))?;

        tracing::debug!(uid = %uid, has_email = email.is_some(), "GitHub identity fetched");

        Ok(AuthAssertion::new(self.name.clone(), uid, email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GithubProvider {
        GithubProvider::new(GithubConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_url: "http://localhost:31113/api/auth/oauth/github/callback".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_name() {
        assert_eq!(provider().name().as_str(), "github");
    }

    #[test]
    fn test_authorize_url_carries_state_and_scope() {
        let raw = provider().authorize_url("state-abc");
        let url = Url::parse(&raw).unwrap();

        assert_eq!(url.host_str(), Some("github.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("state"), Some("state-abc"));
        assert_eq!(get("client_id"), Some("client-123"));
        assert_eq!(get("scope"), Some("user:email"));
        assert_eq!(get("response_type"), Some("code"));
    }

    #[test]
    fn test_invalid_redirect_url() {
        let result = GithubProvider::new(GithubConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_url: "not a url".to_string(),
        });
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
