use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::Credential;
use crate::domain::user::models::IssuedToken;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for credential operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
/// Hashing and verification are CPU-bound and run on the blocking pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hasher and token issuer
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        let RegisterCommand {
            username,
            email,
            password,
        } = command;

        let authenticator = Arc::clone(&self.authenticator);
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
                .await
                .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
                .map_err(|e| {
                    tracing::error!(error = %e, "Password hashing failed");
                    UserError::from(e)
                })?;

        let user = User {
            id: UserId::new(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await.map_err(|e| {
            tracing::warn!(error = %e, "User registration rejected by store");
            UserError::from(e)
        })?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(&self, credential: Credential) -> Result<IssuedToken, UserError> {
        let Credential { email, password } = credential;

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                tracing::info!("Login attempt for unknown email");
                UserError::UserNotFound
            })?;

        let authenticator = Arc::clone(&self.authenticator);
        let user_id = user.id;
        let subject_id = user.id.to_string();
        let subject_email = user.email.as_str().to_string();
        let stored_hash = user.password_hash;

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, &subject_id, &subject_email)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?
        .map_err(|e| {
            match &e {
                AuthenticationError::InvalidCredentials => {
                    tracing::info!(user_id = %user_id, "Login rejected: invalid credentials")
                }
                _ => tracing::error!(user_id = %user_id, error = %e, "Login failed"),
            }
            UserError::from(e)
        })?;

        tracing::info!(user_id = %user_id, expires_at = %result.expires_at, "Token issued");

        Ok(IssuedToken {
            token: result.access_token,
            expires_at: result.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use auth::HashCost;
    use auth::PasswordHasher;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::Username;
    use crate::user::errors::RepositoryError;
    use crate::user::errors::UniqueField;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, RepositoryError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
        }
    }

    fn test_authenticator() -> Arc<Authenticator> {
        let hasher = PasswordHasher::with_cost(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();

        Arc::new(
            Authenticator::new(b"test-secret-key-for-jwt-signing-at-least-32-bytes")
                .with_password_hasher(hasher),
        )
    }

    fn register_command(username: &str, email: &str, password: &str) -> RegisterCommand {
        RegisterCommand::new(
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            Password::new(password.to_string()).unwrap(),
        )
    }

    fn stored_user(authenticator: &Authenticator, email: &str, password: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: authenticator.hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "alice"
                    && user.email.as_str() == "alice@x.com"
                    && user.password_hash.starts_with("$argon2id")
                    && user.password_hash != "secret1"
            })
            .times(1)
            .returning(|user| Ok(user));
        repository.expect_find_by_email().times(0);

        let service = UserService::new(Arc::new(repository), test_authenticator());

        let user = service
            .register(register_command("alice", "alice@x.com", "secret1"))
            .await
            .expect("registration failed");

        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(user.email.as_str(), "alice@x.com");
        assert!(user.password_hash.starts_with("$argon2id"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::Duplicate(UniqueField::Email)));

        let service = UserService::new(Arc::new(repository), test_authenticator());

        let result = service
            .register(register_command("alice", "alice@x.com", "secret1"))
            .await;

        assert!(matches!(
            result,
            Err(UserError::DuplicateUser(UniqueField::Email))
        ));
    }

    #[tokio::test]
    async fn test_register_store_failure() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::Database("connection reset".to_string())));

        let service = UserService::new(Arc::new(repository), test_authenticator());

        let result = service
            .register(register_command("alice", "alice@x.com", "secret1"))
            .await;

        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let authenticator = test_authenticator();
        let user = stored_user(&authenticator, "alice@x.com", "secret1");
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .withf(|email| email == "alice@x.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let issued = service
            .login(Credential::new("alice@x.com", "secret1"))
            .await
            .expect("login failed");

        let claims = authenticator.validate_token(&issued.token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), test_authenticator());

        let result = service
            .login(Credential::new("nobody@x.com", "secret1"))
            .await;

        assert!(matches!(result, Err(UserError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let authenticator = test_authenticator();
        let user = stored_user(&authenticator, "alice@x.com", "secret1");

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let result = service
            .login(Credential::new("alice@x.com", "secret2"))
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_corrupt_stored_hash() {
        let authenticator = test_authenticator();
        let mut user = stored_user(&authenticator, "alice@x.com", "secret1");
        user.password_hash = "plaintext-oops".to_string();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let result = service
            .login(Credential::new("alice@x.com", "plaintext-oops"))
            .await;

        assert!(matches!(result, Err(UserError::Hashing(_))));
    }

    #[tokio::test]
    async fn test_login_store_failure() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(RepositoryError::Database("timeout".to_string())));

        let service = UserService::new(Arc::new(repository), test_authenticator());

        let result = service
            .login(Credential::new("alice@x.com", "secret1"))
            .await;

        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }
}
