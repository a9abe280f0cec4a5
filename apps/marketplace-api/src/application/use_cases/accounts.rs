//! Account Use Cases
//!
//! Registration, login and session lookup. Password hashing is CPU bound
//! and runs on the blocking pool.

use std::sync::Arc;

use crate::application::dto::{AuthResponseDto, LoginDto, RegisterDto, UserDto};
use crate::application::errors::ServiceError;
use crate::application::ports::{
    AuthError, IdentityPort, MarketplaceStore, PasswordHasherPort, StoreError,
};
use crate::domain::identity::{AccessError, NewUser, Principal, Role, User};

/// Registration rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPolicy {
    /// Shortest accepted password, in characters.
    pub min_password_length: usize,
    /// Whether `admin` accounts may self-register.
    pub allow_admin_registration: bool,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            allow_admin_registration: false,
        }
    }
}

/// Use case for account registration and sessions.
pub struct AccountUseCase<S: MarketplaceStore, I: IdentityPort> {
    store: Arc<S>,
    identity: Arc<I>,
    hasher: Arc<dyn PasswordHasherPort>,
    policy: AccountPolicy,
}

impl<S: MarketplaceStore, I: IdentityPort> AccountUseCase<S, I> {
    /// Create a new AccountUseCase.
    pub fn new(
        store: Arc<S>,
        identity: Arc<I>,
        hasher: Arc<dyn PasswordHasherPort>,
        policy: AccountPolicy,
    ) -> Self {
        Self {
            store,
            identity,
            hasher,
            policy,
        }
    }

    /// Create an account and open a session for it.
    #[tracing::instrument(name = "account.register", skip_all)]
    pub async fn register(&self, request: RegisterDto) -> Result<AuthResponseDto, ServiceError> {
        let email = normalize_email(&request.email)?;
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("name must not be empty".to_string()));
        }
        if request.password.chars().count() < self.policy.min_password_length {
            return Err(ServiceError::Validation(format!(
                "password must be at least {} characters",
                self.policy.min_password_length
            )));
        }

        let role = match request.role.as_deref().map(str::trim) {
            None | Some("") => Role::Customer,
            Some(text) => text
                .parse::<Role>()
                .map_err(|err| ServiceError::Validation(err.to_string()))?,
        };
        if role == Role::Admin && !self.policy.allow_admin_registration {
            return Err(AccessError::Forbidden {
                reason: "admin accounts cannot self-register".to_string(),
            }
            .into());
        }

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken.into());
        }

        let password_hash = self.hash(request.password).await?;
        let user = self
            .store
            .insert_user(NewUser {
                email,
                name: name.to_string(),
                phone: request.phone.trim().to_string(),
                role,
                password_hash,
            })
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => AuthError::EmailTaken.into(),
                other => ServiceError::from(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "Account registered");
        self.open_session(&user).await
    }

    /// Check credentials and open a session.
    ///
    /// Unknown email and wrong password fail the same way.
    #[tracing::instrument(name = "account.login", skip_all)]
    pub async fn login(&self, request: LoginDto) -> Result<AuthResponseDto, ServiceError> {
        let email = request.email.trim().to_lowercase();
        let Some(user) = self.store.find_user_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };

        if !self.verify(request.password, user.password_hash.clone()).await? {
            tracing::info!(user_id = %user.id, "Login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        tracing::info!(user_id = %user.id, "Login succeeded");
        self.open_session(&user).await
    }

    /// Profile of the authenticated account.
    pub async fn me(&self, principal: &Principal) -> Result<UserDto, ServiceError> {
        let user = self
            .store
            .find_user(principal.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;
        Ok(UserDto::from(&user))
    }

    /// End the session behind `token`.
    pub async fn logout(&self, token: &str) {
        self.identity.revoke(token).await;
        tracing::debug!("Session revoked");
    }

    async fn open_session(&self, user: &User) -> Result<AuthResponseDto, ServiceError> {
        let issued = self
            .identity
            .issue(Principal::new(user.id, user.role))
            .await?;
        Ok(AuthResponseDto {
            token: issued.token,
            expires_at: issued.expires_at,
            user: UserDto::from(user),
        })
    }

    async fn hash(&self, password: String) -> Result<String, ServiceError> {
        let hasher = Arc::clone(&self.hasher);
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| AuthError::Hashing(err.to_string()))??;
        Ok(hashed)
    }

    async fn verify(&self, password: String, hash: String) -> Result<bool, ServiceError> {
        let hasher = Arc::clone(&self.hasher);
        let ok = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| AuthError::Hashing(err.to_string()))?;
        Ok(ok)
    }
}

/// Trim and lowercase an email, rejecting anything without a local part
/// and a dotted domain.
fn normalize_email(raw: &str) -> Result<String, ServiceError> {
    let email = raw.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        });
    if valid {
        Ok(email)
    } else {
        Err(ServiceError::Validation(format!("invalid email address: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{IssuedToken, MockIdentityPort};
    use crate::application::use_cases::fixtures::Fixture;
    use chrono::Utc;
    use test_case::test_case;

    struct PlainHasher;

    impl PasswordHasherPort for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("plain${password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            hash == format!("plain${password}")
        }
    }

    fn identity() -> MockIdentityPort {
        let mut identity = MockIdentityPort::new();
        identity.expect_issue().returning(|principal| {
            Ok(IssuedToken {
                token: format!("token-{}", principal.user_id),
                expires_at: Utc::now(),
            })
        });
        identity
    }

    fn use_case(
        fx: &Fixture,
        identity: MockIdentityPort,
        policy: AccountPolicy,
    ) -> AccountUseCase<crate::infrastructure::persistence::InMemoryStore, MockIdentityPort> {
        AccountUseCase::new(
            Arc::clone(&fx.store),
            Arc::new(identity),
            Arc::new(PlainHasher),
            policy,
        )
    }

    fn register(email: &str, role: Option<&str>) -> RegisterDto {
        RegisterDto {
            email: email.to_string(),
            password: "secret-pw".to_string(),
            name: "Alice".to_string(),
            phone: "555-0199".to_string(),
            role: role.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let fx = Fixture::new();
        let uc = use_case(&fx, identity(), AccountPolicy::default());

        let registered = uc
            .register(register(" Alice@Example.com ", None))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "alice@example.com");
        assert_eq!(registered.user.role, Role::Customer);
        assert_eq!(registered.token, format!("token-{}", registered.user.id));

        let logged_in = uc
            .login(LoginDto {
                email: "alice@example.com".to_string(),
                password: "secret-pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_taken() {
        let fx = Fixture::new();
        let uc = use_case(&fx, identity(), AccountPolicy::default());

        uc.register(register("bob@example.com", Some("shop")))
            .await
            .unwrap();
        let err = uc
            .register(register("BOB@example.com", None))
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Auth(AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_alike() {
        let fx = Fixture::new();
        let uc = use_case(&fx, identity(), AccountPolicy::default());
        uc.register(register("carol@example.com", None))
            .await
            .unwrap();

        let wrong = uc
            .login(LoginDto {
                email: "carol@example.com".to_string(),
                password: "nope-nope".to_string(),
            })
            .await
            .unwrap_err();
        let unknown = uc
            .login(LoginDto {
                email: "nobody@example.com".to_string(),
                password: "secret-pw".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong, ServiceError::Auth(AuthError::InvalidCredentials));
        assert_eq!(unknown, wrong);
    }

    #[tokio::test]
    async fn admin_self_registration_follows_policy() {
        let fx = Fixture::new();
        let closed = use_case(&fx, identity(), AccountPolicy::default());
        let err = closed
            .register(register("root@example.com", Some("admin")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Access(_)));

        let open = use_case(
            &fx,
            identity(),
            AccountPolicy {
                allow_admin_registration: true,
                ..AccountPolicy::default()
            },
        );
        let admin = open
            .register(register("root@example.com", Some("admin")))
            .await
            .unwrap();
        assert_eq!(admin.user.role, Role::Admin);
    }

    #[test_case("not-an-email" ; "missing at sign")]
    #[test_case("@example.com" ; "missing local part")]
    #[test_case("alice@localhost" ; "undotted domain")]
    #[test_case("alice@example." ; "trailing dot")]
    #[tokio::test]
    async fn malformed_email_is_rejected(email: &str) {
        let fx = Fixture::new();
        let uc = use_case(&fx, MockIdentityPort::new(), AccountPolicy::default());

        let err = uc.register(register(email, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn short_password_and_unknown_role_are_rejected() {
        let fx = Fixture::new();
        let uc = use_case(&fx, MockIdentityPort::new(), AccountPolicy::default());

        let mut short = register("dave@example.com", None);
        short.password = "12345".to_string();
        assert!(matches!(
            uc.register(short).await.unwrap_err(),
            ServiceError::Validation(_)
        ));

        let err = uc
            .register(register("dave@example.com", Some("courier")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn me_returns_profile_and_logout_revokes() {
        let fx = Fixture::new();
        let principal = fx.user("erin", Role::Customer).await;

        let mut identity = MockIdentityPort::new();
        identity
            .expect_revoke()
            .withf(|token| token == "abc")
            .times(1)
            .return_const(());
        let uc = use_case(&fx, identity, AccountPolicy::default());

        let me = uc.me(&principal).await.unwrap();
        assert_eq!(me.id, principal.user_id);
        assert_eq!(me.email, "erin@example.com");

        uc.logout("abc").await;
    }

    #[tokio::test]
    async fn vanished_account_is_unauthenticated() {
        let fx = Fixture::new();
        let uc = use_case(&fx, MockIdentityPort::new(), AccountPolicy::default());
        let ghost = Principal::new(crate::domain::shared::UserId::new(999), Role::Customer);

        assert_eq!(
            uc.me(&ghost).await.unwrap_err(),
            ServiceError::Auth(AuthError::Unauthenticated)
        );
    }
}
