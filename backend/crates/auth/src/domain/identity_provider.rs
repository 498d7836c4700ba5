//! Identity Provider Port
//!
//! An external OAuth provider as seen by the application: it can build the
//! URL the browser is sent to, and it can turn the authorization code from
//! the callback into an `AuthAssertion`.

use crate::domain::entity::auth_assertion::AuthAssertion;
use crate::domain::value_object::provider::ProviderName;
use crate::error::AuthResult;

#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Name used in routes and stored on authorizations (e.g. `github`)
    fn name(&self) -> &ProviderName;

    /// Provider authorization URL carrying `state`
    fn authorize_url(&self, state: &str) -> String;

    /// Exchange the callback `code` and describe the external account
    async fn fetch_assertion(&self, code: &str) -> AuthResult<AuthAssertion>;
}
