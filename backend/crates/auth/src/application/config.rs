//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_cookie_name: String,
    /// HMAC key for session tokens
    pub session_secret: [u8; 32],
    /// Session TTL without "Remember Me" (12 hours)
    pub session_ttl_short: Duration,
    /// Session TTL with "Remember Me" (1 week)
    pub session_ttl_long: Duration,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Application-wide secret mixed into password hashes
    pub password_pepper: Option<Vec<u8>>,
    /// Cookie carrying the OAuth `state` between redirect and callback
    pub oauth_state_cookie_name: String,
    pub oauth_state_ttl: Duration,
    /// Where the browser lands after a successful OAuth sign-in
    pub oauth_success_redirect: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "qa_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl_short: Duration::from_secs(12 * 3600),
            session_ttl_long: Duration::from_secs(7 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            oauth_state_cookie_name: "qa_oauth_state".to_string(),
            oauth_state_ttl: Duration::from_secs(600),
            oauth_success_redirect: "/".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn session_ttl(&self, remember_me: bool) -> Duration {
        if remember_me {
            self.session_ttl_long
        } else {
            self.session_ttl_short
        }
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Session cookie whose Max-Age matches the session TTL
    pub fn session_cookie(&self, remember_me: bool) -> CookieConfig {
        CookieConfig::named(&self.session_cookie_name)
            .with_secure(self.cookie_secure)
            .with_same_site(self.cookie_same_site)
            .with_max_age(self.session_ttl(remember_me).as_secs() as i64)
    }

    /// OAuth state cookie
    ///
    /// Always `SameSite=Lax`: the callback is a top-level cross-site
    /// navigation from the provider, which `Strict` would strip.
    pub fn oauth_state_cookie(&self) -> CookieConfig {
        CookieConfig::named(&self.oauth_state_cookie_name)
            .with_secure(self.cookie_secure)
            .with_same_site(SameSite::Lax)
            .with_max_age(self.oauth_state_ttl.as_secs() as i64)
    }
}
