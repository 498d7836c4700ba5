//! Crate-level tests for auth
//!
//! Use cases and HTTP routes run against an in-memory store, so no
//! database is needed.

#[cfg(test)]
mod support {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use kernel::error::app_error::AppError;
    use kernel::id::UserId;
    use uuid::Uuid;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::{
        auth_assertion::AuthAssertion,
        auth_session::AuthSession,
        authorization::Authorization,
        credentials::Credentials,
        user::{NewAccount, User},
    };
    use crate::domain::identity_provider::IdentityProvider;
    use crate::domain::repository::{
        AuthSessionRepository, AuthorizationRepository, CredentialsRepository, UserRepository,
    };
    use crate::domain::value_object::{
        email::Email,
        provider::{ExternalUid, ProviderName},
        user_password::{RawPassword, UserPassword},
    };
    use crate::error::{AuthError, AuthResult};

    pub const PASSWORD: &str = "MySecurePass123!";

    #[derive(Default)]
    struct Tables {
        users: Vec<User>,
        credentials: Vec<Credentials>,
        authorizations: Vec<Authorization>,
        sessions: Vec<AuthSession>,
    }

    #[derive(Default)]
    pub struct MemoryStore {
        tables: Mutex<Tables>,
        sessions_down: AtomicBool,
    }

    impl MemoryStore {
        pub fn shared() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn user_count(&self) -> usize {
            self.tables.lock().unwrap().users.len()
        }

        pub fn authorization_count(&self) -> usize {
            self.tables.lock().unwrap().authorizations.len()
        }

        pub fn authorizations_of(&self, user_id: &UserId) -> Vec<Authorization> {
            self.tables
                .lock()
                .unwrap()
                .authorizations
                .iter()
                .filter(|a| a.user_id == *user_id)
                .cloned()
                .collect()
        }

        pub fn has_credentials(&self, user_id: &UserId) -> bool {
            self.tables
                .lock()
                .unwrap()
                .credentials
                .iter()
                .any(|c| c.user_id == *user_id)
        }

        /// Make every session lookup fail as an unreachable database would
        pub fn take_sessions_down(&self) {
            self.sessions_down.store(true, Ordering::SeqCst);
        }

        pub fn session_count(&self) -> usize {
            self.tables.lock().unwrap().sessions.len()
        }

        /// Password account, optionally linked to an external identity
        pub async fn seed_user(&self, email: &str, identity: Option<(&str, &str)>) -> User {
            let user = User::new(Email::new(email).unwrap());
            let raw = RawPassword::new(PASSWORD.to_string()).unwrap();
            let account = NewAccount {
                credentials: Credentials::new(
                    user.user_id,
                    UserPassword::from_raw(&raw, None).unwrap(),
                ),
                authorization: identity.map(|(provider, uid)| {
                    Authorization::new(
                        user.user_id,
                        ProviderName::new(provider).unwrap(),
                        ExternalUid::new(uid).unwrap(),
                    )
                }),
                user: user.clone(),
            };
            UserRepository::create(self, &account).await.unwrap();
            user
        }
    }

    fn identity_taken() -> AuthError {
        AppError::conflict("Identity is already linked").into()
    }

    impl UserRepository for MemoryStore {
        async fn create(&self, account: &NewAccount) -> AuthResult<()> {
            let mut tables = self.tables.lock().unwrap();
            if tables.users.iter().any(|u| u.email == account.user.email) {
                return Err(AuthError::EmailTaken);
            }
            if let Some(authorization) = &account.authorization
                && tables
                    .authorizations
                    .iter()
                    .any(|a| a.matches(&authorization.provider, &authorization.uid))
            {
                return Err(identity_taken());
            }

            tables.users.push(account.user.clone());
            tables.credentials.push(account.credentials.clone());
            if let Some(authorization) = &account.authorization {
                tables.authorizations.push(authorization.clone());
            }
            Ok(())
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            let tables = self.tables.lock().unwrap();
            Ok(tables.users.iter().find(|u| u.user_id == *user_id).cloned())
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            let tables = self.tables.lock().unwrap();
            Ok(tables.users.iter().find(|u| u.email == *email).cloned())
        }

        async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
            let tables = self.tables.lock().unwrap();
            Ok(tables.users.iter().any(|u| u.email == *email))
        }
    }

    impl CredentialsRepository for MemoryStore {
        async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credentials>> {
            let tables = self.tables.lock().unwrap();
            Ok(tables
                .credentials
                .iter()
                .find(|c| c.user_id == *user_id)
                .cloned())
        }
    }

    impl AuthorizationRepository for MemoryStore {
        async fn find_by_identity(
            &self,
            provider: &ProviderName,
            uid: &ExternalUid,
        ) -> AuthResult<Option<Authorization>> {
            let tables = self.tables.lock().unwrap();
            Ok(tables
                .authorizations
                .iter()
                .find(|a| a.matches(provider, uid))
                .cloned())
        }

        async fn create(&self, authorization: &Authorization) -> AuthResult<()> {
            let mut tables = self.tables.lock().unwrap();
            if tables
                .authorizations
                .iter()
                .any(|a| a.matches(&authorization.provider, &authorization.uid))
            {
                return Err(identity_taken());
            }
            tables.authorizations.push(authorization.clone());
            Ok(())
        }

        async fn list_by_user(&self, user_id: &UserId) -> AuthResult<Vec<Authorization>> {
            Ok(self.authorizations_of(user_id))
        }
    }

    impl AuthSessionRepository for MemoryStore {
        async fn create(&self, session: &AuthSession) -> AuthResult<()> {
            self.tables.lock().unwrap().sessions.push(session.clone());
            Ok(())
        }

        async fn find_by_id(
            &self,
            session_id: Uuid,
            fingerprint_hash: &[u8],
        ) -> AuthResult<Option<AuthSession>> {
            if self.sessions_down.load(Ordering::SeqCst) {
                return Err(AuthError::Database(sqlx::Error::PoolTimedOut));
            }
            let tables = self.tables.lock().unwrap();
            match tables.sessions.iter().find(|s| s.session_id == session_id) {
                Some(s) if s.client_fingerprint_hash != fingerprint_hash => {
                    Err(AuthError::SessionFingerprintMismatch)
                }
                found => Ok(found.cloned()),
            }
        }

        async fn update(&self, session: &AuthSession) -> AuthResult<()> {
            let mut tables = self.tables.lock().unwrap();
            if let Some(stored) = tables
                .sessions
                .iter_mut()
                .find(|s| s.session_id == session.session_id)
            {
                *stored = session.clone();
            }
            Ok(())
        }

        async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
            self.tables
                .lock()
                .unwrap()
                .sessions
                .retain(|s| s.session_id != session_id);
            Ok(())
        }

        async fn cleanup_expired(&self) -> AuthResult<u64> {
            let mut tables = self.tables.lock().unwrap();
            let before = tables.sessions.len();
            tables.sessions.retain(|s| !s.is_expired());
            Ok((before - tables.sessions.len()) as u64)
        }
    }

    /// Identity provider that answers every code with a fixed assertion
    pub struct FakeProvider {
        name: ProviderName,
        uid: String,
        email: Option<String>,
    }

    impl FakeProvider {
        pub fn github(uid: &str, email: Option<&str>) -> Self {
            Self {
                name: ProviderName::new("github").unwrap(),
                uid: uid.to_string(),
                email: email.map(str::to_string),
            }
        }
    }

    impl IdentityProvider for FakeProvider {
        fn name(&self) -> &ProviderName {
            &self.name
        }

        fn authorize_url(&self, state: &str) -> String {
            format!("https://provider.test/authorize?state={state}")
        }

        async fn fetch_assertion(&self, code: &str) -> AuthResult<AuthAssertion> {
            if code == "rejected" {
                return Err(AuthError::Provider("code rejected".to_string()));
            }
            Ok(AuthAssertion::new(
                self.name.clone(),
                ExternalUid::new(self.uid.as_str()).unwrap(),
                self.email.clone(),
            ))
        }
    }

    pub fn assertion(uid: &str, email: Option<&str>) -> AuthAssertion {
        AuthAssertion::new(
            ProviderName::new("github").unwrap(),
            ExternalUid::new(uid).unwrap(),
            email.map(str::to_string),
        )
    }

    pub fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig::development())
    }
}

#[cfg(test)]
mod reconcile_tests {
    use super::support::*;
    use crate::application::{ReconcileIdentityUseCase, ReconcileOutcome};
    use crate::error::AuthError;

    fn use_case(
        store: &std::sync::Arc<MemoryStore>,
    ) -> ReconcileIdentityUseCase<MemoryStore, MemoryStore> {
        ReconcileIdentityUseCase::new(store.clone(), store.clone(), config())
    }

    #[tokio::test]
    async fn test_existing_identity_returns_linked_user() {
        let store = MemoryStore::shared();
        let user = store
            .seed_user("linked@example.com", Some(("github", "123456")))
            .await;

        let output = use_case(&store)
            .execute(&assertion("123456", Some("linked@example.com")))
            .await
            .unwrap();

        assert_eq!(output.user.user_id, user.user_id);
        assert_eq!(output.outcome, ReconcileOutcome::ExistingAuthorization);
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.authorization_count(), 1);
    }

    #[tokio::test]
    async fn test_existing_identity_wins_over_other_email() {
        let store = MemoryStore::shared();
        let linked = store
            .seed_user("linked@example.com", Some(("github", "123456")))
            .await;
        store.seed_user("other@example.com", None).await;

        let output = use_case(&store)
            .execute(&assertion("123456", Some("other@example.com")))
            .await
            .unwrap();

        assert_eq!(output.user.user_id, linked.user_id);
        assert_eq!(store.authorization_count(), 1);
    }

    #[tokio::test]
    async fn test_email_match_links_authorization() {
        let store = MemoryStore::shared();
        let existing = store.seed_user("existing@example.com", None).await;
        assert_eq!(store.authorizations_of(&existing.user_id).len(), 0);

        let output = use_case(&store)
            .execute(&assertion("123456", Some("existing@example.com")))
            .await
            .unwrap();

        assert_eq!(output.user.user_id, existing.user_id);
        assert_eq!(output.outcome, ReconcileOutcome::LinkedByEmail);
        assert_eq!(store.user_count(), 1);

        let authorizations = store.authorizations_of(&existing.user_id);
        assert_eq!(authorizations.len(), 1);
        assert_eq!(authorizations[0].provider.as_str(), "github");
        assert_eq!(authorizations[0].uid.as_str(), "123456");
    }

    #[tokio::test]
    async fn test_email_match_ignores_case() {
        let store = MemoryStore::shared();
        let existing = store.seed_user("existing@example.com", None).await;

        let output = use_case(&store)
            .execute(&assertion("123456", Some("  Existing@Example.COM ")))
            .await
            .unwrap();

        assert_eq!(output.user.user_id, existing.user_id);
        assert_eq!(output.outcome, ReconcileOutcome::LinkedByEmail);
    }

    #[tokio::test]
    async fn test_unknown_email_creates_user_and_authorization() {
        let store = MemoryStore::shared();

        let output = use_case(&store)
            .execute(&assertion("123456", Some("new@user.com")))
            .await
            .unwrap();

        assert_eq!(output.outcome, ReconcileOutcome::CreatedUser);
        assert_eq!(output.user.email.as_str(), "new@user.com");
        assert_eq!(store.user_count(), 1);
        assert!(store.has_credentials(&output.user.user_id));

        let authorizations = store.authorizations_of(&output.user.user_id);
        assert_eq!(authorizations.len(), 1);
        assert_eq!(authorizations[0].provider.as_str(), "github");
        assert_eq!(authorizations[0].uid.as_str(), "123456");
    }

    #[tokio::test]
    async fn test_second_login_reuses_created_user() {
        let store = MemoryStore::shared();
        let first = use_case(&store)
            .execute(&assertion("123456", Some("new@user.com")))
            .await
            .unwrap();
        let second = use_case(&store)
            .execute(&assertion("123456", Some("new@user.com")))
            .await
            .unwrap();

        assert_eq!(first.user.user_id, second.user.user_id);
        assert_eq!(second.outcome, ReconcileOutcome::ExistingAuthorization);
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.authorization_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_email_uses_placeholder() {
        let store = MemoryStore::shared();

        for email in [None, Some(""), Some("   ")] {
            let uid = format!("uid{}", store.user_count());
            let output = use_case(&store)
                .execute(&assertion(&uid, email))
                .await
                .unwrap();

            assert_eq!(output.outcome, ReconcileOutcome::CreatedUser);
            assert!(output.user.email.is_placeholder());
            assert_eq!(
                output.user.email.as_str(),
                format!("{uid}@github.oauth.invalid")
            );
        }
        assert_eq!(store.user_count(), 3);
    }

    #[tokio::test]
    async fn test_missing_email_never_links_existing_user() {
        let store = MemoryStore::shared();
        store.seed_user("existing@example.com", None).await;

        let output = use_case(&store)
            .execute(&assertion("999", None))
            .await
            .unwrap();

        assert_eq!(output.outcome, ReconcileOutcome::CreatedUser);
        assert_eq!(store.user_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_email_propagates_validation_error() {
        let store = MemoryStore::shared();

        let err = use_case(&store)
            .execute(&assertion("123456", Some("not-an-email")))
            .await
            .unwrap_err();

        match err {
            AuthError::App(app) => {
                assert_eq!(app.status_code(), 422);
                assert_eq!(app.field_errors()[0].field, "email");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.user_count(), 0);
        assert_eq!(store.authorization_count(), 0);
    }
}

#[cfg(test)]
mod password_flow_tests {
    use platform::client::ClientFingerprint;

    use super::support::*;
    use crate::application::{
        CheckSessionUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
        SignUpUseCase,
    };
    use crate::error::AuthError;

    fn fingerprint() -> ClientFingerprint {
        ClientFingerprint::new([3u8; 32], None, Some("test-agent".to_string()))
    }

    fn sign_up_input(email: &str, password: &str, confirmation: &str) -> SignUpInput {
        SignUpInput {
            email: email.to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
            remember_me: false,
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_account_and_session() {
        let store = MemoryStore::shared();
        let use_case = SignUpUseCase::new(store.clone(), store.clone(), config());

        let output = use_case
            .execute(sign_up_input("Fresh@Example.com", PASSWORD, PASSWORD), fingerprint())
            .await
            .unwrap();

        assert_eq!(output.user.email.as_str(), "fresh@example.com");
        assert!(store.has_credentials(&output.user.user_id));
        assert_eq!(store.session_count(), 1);
        assert_eq!(output.issued.session.user_id, output.user.user_id);
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let store = MemoryStore::shared();
        store.seed_user("taken@example.com", None).await;
        let use_case = SignUpUseCase::new(store.clone(), store.clone(), config());

        let err = use_case
            .execute(sign_up_input("taken@example.com", PASSWORD, PASSWORD), fingerprint())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_up_reports_every_field_error() {
        let store = MemoryStore::shared();
        let use_case = SignUpUseCase::new(store.clone(), store.clone(), config());

        let err = use_case
            .execute(sign_up_input("nope", "short", "different"), fingerprint())
            .await
            .unwrap_err();

        let AuthError::App(app) = err else {
            panic!("expected validation error");
        };
        assert_eq!(app.status_code(), 422);
        let fields: Vec<&str> = app.field_errors().iter().map(|e| e.field.as_ref()).collect();
        assert_eq!(fields, ["email", "passwordConfirmation", "password"]);
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_ok_and_generic_failures() {
        let store = MemoryStore::shared();
        store.seed_user("member@example.com", None).await;
        let use_case = SignInUseCase::new(store.clone(), store.clone(), store.clone(), config());

        let output = use_case
            .execute(
                SignInInput {
                    email: "MEMBER@example.com".to_string(),
                    password: PASSWORD.to_string(),
                    remember_me: true,
                },
                fingerprint(),
            )
            .await
            .unwrap();
        assert!(output.issued.session.remember_me);

        for (email, password) in [
            ("member@example.com", "WrongPassword99!"),
            ("ghost@example.com", PASSWORD),
            ("member@example.com", ""),
        ] {
            let err = use_case
                .execute(
                    SignInInput {
                        email: email.to_string(),
                        password: password.to_string(),
                        remember_me: false,
                    },
                    fingerprint(),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials), "{email}");
        }
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn test_check_session_and_sign_out() {
        let store = MemoryStore::shared();
        let config = config();
        let output = SignUpUseCase::new(store.clone(), store.clone(), config.clone())
            .execute(sign_up_input("cycle@example.com", PASSWORD, PASSWORD), fingerprint())
            .await
            .unwrap();
        let token = output.issued.token;

        let check = CheckSessionUseCase::new(store.clone(), config.clone());
        let session = check.execute(&token, &fingerprint().hash).await.unwrap();
        assert_eq!(session.user_id, output.user.user_id);

        let other_client = [4u8; 32];
        assert!(matches!(
            check.execute(&token, &other_client).await,
            Err(AuthError::SessionFingerprintMismatch)
        ));

        SignOutUseCase::new(store.clone(), config.clone())
            .execute(&token)
            .await
            .unwrap();
        assert_eq!(store.session_count(), 0);
        assert!(matches!(
            check.execute(&token, &fingerprint().hash).await,
            Err(AuthError::SessionInvalid)
        ));
    }
}

#[cfg(test)]
mod http_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::presentation::{AuthMiddlewareState, auth_router, authenticate};

    const UA: &str = "qa-http-test";

    fn app(store: Arc<MemoryStore>, provider: FakeProvider) -> Router {
        let config = config();
        auth_router(store.clone(), vec![provider], config.clone()).layer(from_fn_with_state(
            AuthMiddlewareState::new(store, config),
            authenticate::<MemoryStore>,
        ))
    }

    fn default_app(store: Arc<MemoryStore>) -> Router {
        app(store, FakeProvider::github("123456", Some("new@user.com")))
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, UA)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri).header(header::USER_AGENT, UA);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    /// `name=value` pairs of every Set-Cookie header
    fn set_cookies(response: &axum::response::Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_string())
            .collect()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_signup_then_status() {
        let store = MemoryStore::shared();
        let app = default_app(store.clone());

        let response = app
            .clone()
            .oneshot(json_post(
                "/signup",
                json!({
                    "email": "http@example.com",
                    "password": PASSWORD,
                    "passwordConfirmation": PASSWORD
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let cookie = set_cookies(&response).remove(0);
        assert!(cookie.starts_with("qa_session="));
        let body = body_json(response).await;
        assert_eq!(body["email"], "http@example.com");
        assert_eq!(body["publicId"].as_str().unwrap().len(), 21);

        let response = app
            .oneshot(get("/status", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["email"], "http@example.com");
    }

    #[tokio::test]
    async fn test_signup_validation_problem() {
        let response = default_app(MemoryStore::shared())
            .oneshot(json_post(
                "/signup",
                json!({
                    "email": "",
                    "password": PASSWORD,
                    "passwordConfirmation": PASSWORD
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["field"], "email");
        assert_eq!(body["errors"][0]["message"], "can't be blank");
    }

    #[tokio::test]
    async fn test_signin_wrong_password() {
        let store = MemoryStore::shared();
        store.seed_user("member@example.com", None).await;

        let response = default_app(store)
            .oneshot(json_post(
                "/signin",
                json!({ "email": "member@example.com", "password": "WrongPassword99!" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookies(&response).is_empty());
    }

    #[tokio::test]
    async fn test_session_store_outage_is_a_server_error() {
        let store = MemoryStore::shared();
        let app = default_app(store.clone());

        let response = app
            .clone()
            .oneshot(json_post(
                "/signup",
                json!({
                    "email": "outage@example.com",
                    "password": PASSWORD,
                    "passwordConfirmation": PASSWORD
                }),
            ))
            .await
            .unwrap();
        let cookie = set_cookies(&response).remove(0);

        store.take_sessions_down();
        let response = app
            .clone()
            .oneshot(get("/status", Some(&cookie)))
            .await
            .unwrap();
        assert!(response.status().is_server_error());

        // Without a cookie there is nothing to look up
        let response = app.oneshot(get("/status", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_status_anonymous() {
        let response = default_app(MemoryStore::shared())
            .oneshot(get("/status", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn test_signout_clears_cookie() {
        let response = default_app(MemoryStore::shared())
            .oneshot(json_post("/signout", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(set_cookies(&response), ["qa_session="]);
    }

    #[tokio::test]
    async fn test_authorizations_require_session() {
        let response = default_app(MemoryStore::shared())
            .oneshot(get("/authorizations", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_oauth_unknown_provider() {
        let response = default_app(MemoryStore::shared())
            .oneshot(get("/oauth/gitlab", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_oauth_start_sets_state_cookie() {
        let response = default_app(MemoryStore::shared())
            .oneshot(get("/oauth/github", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let state_cookie = set_cookies(&response).remove(0);
        let state = state_cookie.strip_prefix("qa_oauth_state=").unwrap();
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert_eq!(
            location,
            format!("https://provider.test/authorize?state={state}")
        );
    }

    #[tokio::test]
    async fn test_oauth_callback_state_mismatch() {
        let store = MemoryStore::shared();
        let response = default_app(store.clone())
            .oneshot(get(
                "/oauth/github/callback?code=abc&state=forged",
                Some("qa_oauth_state=expected"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_oauth_callback_without_state_cookie() {
        let response = default_app(MemoryStore::shared())
            .oneshot(get("/oauth/github/callback?code=abc&state=s", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_oauth_provider_failure_is_bad_gateway() {
        let response = default_app(MemoryStore::shared())
            .oneshot(get(
                "/oauth/github/callback?code=rejected&state=s1",
                Some("qa_oauth_state=s1"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_oauth_callback_links_existing_user() {
        let store = MemoryStore::shared();
        let existing = store.seed_user("existing@example.com", None).await;
        let app = app(
            store.clone(),
            FakeProvider::github("123456", Some("existing@example.com")),
        );

        let response = app
            .clone()
            .oneshot(get(
                "/oauth/github/callback?code=abc&state=s1",
                Some("qa_oauth_state=s1"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 2);
        assert!(cookies.contains(&"qa_oauth_state=".to_string()));
        let session = cookies
            .iter()
            .find(|c| c.starts_with("qa_session="))
            .unwrap()
            .clone();

        assert_eq!(store.user_count(), 1);
        assert_eq!(store.authorizations_of(&existing.user_id).len(), 1);

        let response = app
            .oneshot(get("/authorizations", Some(&session)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["provider"], "github");
        assert_eq!(body[0]["uid"], "123456");
    }
}
