use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIdentity;
use auth::TokenIssuer;
use chrono::Utc;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::Password;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::user::errors::UserError;
use crate::user::ports::AuthResponse;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Policy layer tying hashing, token issuance, and storage together.
pub struct AuthService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    tokens: Arc<TokenIssuer>,
}

/// Argon2 is CPU-bound; run it on the blocking pool so concurrent
/// signups and logins do not serialize behind each other's hash work.
async fn hash_password(password: Password) -> Result<String, UserError> {
    tokio::task::spawn_blocking(move || PasswordHasher::new().hash(password.as_str()))
        .await
        .map_err(|e| UserError::Unknown(format!("Hashing task failed: {e}")))?
        .map_err(UserError::from)
}

async fn verify_password(password: String, stored_hash: String) -> Result<bool, UserError> {
    tokio::task::spawn_blocking(move || PasswordHasher::new().verify(&password, &stored_hash))
        .await
        .map_err(|e| UserError::Unknown(format!("Verification task failed: {e}")))?
        .map_err(UserError::from)
}

impl<R> AuthService<R>
where
    R: UserRepository,
{
    pub fn new(repository: Arc<R>, tokens: Arc<TokenIssuer>) -> Self {
        Self { repository, tokens }
    }

    fn issue_tokens(&self, user: &User) -> Result<AuthResponse, UserError> {
        let identity = TokenIdentity {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            role: user.role.to_string(),
        };

        let tokens = self.tokens.issue_pair(&identity)?;

        Ok(AuthResponse {
            user: user.clone(),
            tokens,
        })
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: UserRepository,
{
    async fn signup(&self, command: SignupCommand) -> Result<AuthResponse, UserError> {
        // Fast-path duplicate check; the storage unique constraint still
        // closes the race window at insert time.
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let password_hash = hash_password(command.password).await?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            role: command.role,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(user).await?;

        tracing::info!(user_id = %created.id, "User registered");

        self.issue_tokens(&created)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, UserError> {
        // Unknown email and wrong password collapse into one error so the
        // endpoint is not a user-existence oracle.
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let password_matches =
            verify_password(password.to_string(), user.password_hash.clone()).await?;

        if !password_matches {
            return Err(UserError::InvalidCredentials);
        }

        tracing::debug!(user_id = %user.id, "Login succeeded");

        self.issue_tokens(&user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_email) = &command.email {
            if new_email.as_str() != user.email.as_str()
                && self
                    .repository
                    .find_by_email(new_email.as_str())
                    .await?
                    .is_some()
            {
                return Err(UserError::EmailAlreadyExists(new_email.as_str().to_string()));
            }
        }

        if let Some(new_name) = command.name {
            user.name = new_name;
        }
        if let Some(new_email) = command.email {
            user.email = new_email;
        }
        if let Some(new_role) = command.role {
            user.role = new_role;
        }
        user.updated_at = Utc::now();

        self.repository.update(user).await
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        let current_matches =
            verify_password(command.current_password, user.password_hash.clone()).await?;

        if !current_matches {
            return Err(UserError::WrongCurrentPassword);
        }

        let new_hash = hash_password(command.new_password).await?;

        self.repository.update_password(id, &new_hash).await?;

        tracing::info!(user_id = %id, "Password changed");

        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;

        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }

    async fn list_users(&self, query: ListUsersQuery) -> Result<UserPage, UserError> {
        self.repository.list(&query).await
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), UserError> {
        match self.repository.find_by_email(email).await? {
            // Reset-token issuance and delivery are not implemented; the
            // request is acknowledged and recorded only.
            Some(user) => tracing::info!(user_id = %user.id, "Password reset requested"),
            // Succeed silently: the response must not reveal whether the
            // email is registered.
            None => {}
        }

        Ok(())
    }
}
