use async_trait::async_trait;
use auth::TokenPair;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::user::errors::UserError;

/// Result of a successful signup or login: the account plus a freshly
/// issued access/refresh token pair.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokenPair,
}

/// Port for account policy operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account and issue its first token pair.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - email is already registered
    /// * `DatabaseError` - storage operation failed
    async fn signup(&self, command: SignupCommand) -> Result<AuthResponse, UserError>;

    /// Verify credentials and issue a token pair.
    ///
    /// An unknown email and a wrong password both produce
    /// `InvalidCredentials`; callers cannot distinguish the two.
    ///
    /// # Errors
    /// * `InvalidCredentials` - email unknown or password mismatch
    /// * `DatabaseError` - storage operation failed
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, UserError>;

    /// Retrieve an account by id.
    ///
    /// # Errors
    /// * `NotFound` - no such user
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Apply a partial profile update (name, email, role).
    ///
    /// # Errors
    /// * `NotFound` - no such user
    /// * `EmailAlreadyExists` - new email belongs to another account
    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError>;

    /// Rotate the password after re-verifying the current one.
    ///
    /// # Errors
    /// * `NotFound` - no such user
    /// * `WrongCurrentPassword` - current password did not verify
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError>;

    /// Permanently delete an account.
    ///
    /// # Errors
    /// * `NotFound` - no such user
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;

    /// List accounts, newest first, optionally filtered by role.
    async fn list_users(&self, query: ListUsersQuery) -> Result<UserPage, UserError>;

    /// Accept a password-reset request without revealing whether the
    /// email is registered. Currently log-only; no reset token is issued.
    async fn request_password_reset(&self, email: &str) -> Result<(), UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// The storage unique constraint on email is the authoritative
    /// duplicate check; violations surface as `EmailAlreadyExists`.
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve a user by id (None if absent).
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve a user by email (None if absent).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Persist updated profile fields (name, email, role, updated_at).
    ///
    /// Never touches the password hash; that goes through
    /// [`UserRepository::update_password`].
    ///
    /// # Errors
    /// * `NotFound` - no such user
    /// * `EmailAlreadyExists` - email constraint violated
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Replace the stored password hash.
    ///
    /// # Errors
    /// * `NotFound` - no such user
    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), UserError>;

    /// Remove a user.
    ///
    /// # Errors
    /// * `NotFound` - no such user
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;

    /// One page of users ordered by creation time descending, plus the
    /// total row count for the same filter.
    async fn list(&self, query: &ListUsersQuery) -> Result<UserPage, UserError>;
}
