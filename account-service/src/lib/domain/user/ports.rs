use async_trait::async_trait;

use crate::domain::user::models::Credential;
use crate::domain::user::models::IssuedToken;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::user::errors::RepositoryError;
use crate::user::errors::UserError;

/// Port for credential operations (registration and login).
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// Hashes the password, then performs exactly one store write.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `DuplicateUser` - Username or email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Authenticate by email and password and issue an access token.
    ///
    /// Performs exactly one store read and no writes.
    ///
    /// # Arguments
    /// * `credential` - Email and plaintext password
    ///
    /// # Returns
    /// Signed access token and its expiry
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `InvalidCredentials` - Password does not match
    /// * `Hashing` - Stored hash could not be checked
    /// * `TokenIssuance` - Signing the token failed
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, credential: Credential) -> Result<IssuedToken, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Implementations enforce uniqueness of username and email atomically with
/// the insert.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `Duplicate` - Username or email is already taken
    /// * `Database` - Store operation failed
    async fn create(&self, user: User) -> Result<User, RepositoryError>;

    /// Retrieve user by email address.
    ///
    /// # Arguments
    /// * `email` - Email address string
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}
