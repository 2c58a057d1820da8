use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::ListUsersQuery;
use account_service::domain::user::models::PersonName;
use account_service::domain::user::models::Role;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::models::UserPage;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::user::errors::UserError;
use async_trait::async_trait;
use auth::TokenIdentity;
use auth::TokenIssuer;
use auth::TokenIssuerOptions;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// In-memory stand-in for the Postgres adapter, implementing the same
/// store contract so the full HTTP stack runs without a database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users.values().any(|u| u.email.as_str() == user.email.as_str()) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        if users
            .values()
            .any(|u| u.id != user.id && u.email.as_str() == user.email.as_str())
        {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        match users.get_mut(&user.id.0) {
            Some(stored) => {
                stored.name = user.name.clone();
                stored.email = user.email.clone();
                stored.role = user.role;
                stored.updated_at = user.updated_at;
                Ok(stored.clone())
            }
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), UserError> {
        match self.users.lock().unwrap().get_mut(&id.0) {
            Some(stored) => {
                stored.password_hash = password_hash.to_string();
                stored.updated_at = Utc::now();
                Ok(())
            }
            None => Err(UserError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        match self.users.lock().unwrap().remove(&id.0) {
            Some(_) => Ok(()),
            None => Err(UserError::NotFound(id.to_string())),
        }
    }

    async fn list(&self, query: &ListUsersQuery) -> Result<UserPage, UserError> {
        let users = self.users.lock().unwrap();

        let mut matching: Vec<User> = users
            .values()
            .filter(|u| query.role.map_or(true, |role| u.role == role))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .collect();

        Ok(UserPage { items, total })
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub repository: Arc<InMemoryUserRepository>,
    pub tokens: Arc<TokenIssuer>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let repository = Arc::new(InMemoryUserRepository::new());
        let tokens = Arc::new(TokenIssuer::new(TokenIssuerOptions {
            issuer: "account-service-tests",
            access_secret: b"test_access_secret_32_bytes_long!!",
            access_ttl_days: 1,
            refresh_secret: b"test_refresh_secret_32_bytes_long!",
            refresh_ttl_days: 1,
        }));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&tokens),
        ));

        let application = create_router(auth_service, Arc::clone(&tokens), true);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, application)
                .await
                .expect("Test server failed");
        });

        Self {
            address,
            client: reqwest::Client::new(),
            repository,
            tokens,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(format!("{}{}", self.address, path))
    }

    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.patch(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.delete(format!("{}{}", self.address, path))
    }

    /// Insert a user directly into the store, bypassing signup (and its
    /// hashing cost) for tests that only need rows to exist.
    pub async fn seed_user(
        &self,
        name: &str,
        email: &str,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> User {
        let user = User {
            id: UserId::new(),
            name: PersonName::new(name.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$seeded".to_string(),
            role,
            created_at,
            updated_at: created_at,
        };

        self.repository.create(user).await.expect("seed user")
    }

    /// A valid access token for an existing user.
    pub fn access_token_for(&self, user: &User) -> String {
        self.tokens
            .issue_pair(&TokenIdentity {
                id: user.id.to_string(),
                email: user.email.as_str().to_string(),
                role: user.role.to_string(),
            })
            .expect("issue tokens")
            .access_token
    }
}
