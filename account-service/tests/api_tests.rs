mod common;

use account_service::domain::user::models::Role;
use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

async fn signup(app: &TestApp, name: &str, email: &str, password: &str) -> serde_json::Value {
    let response = app
        .post("/auth/signup")
        .json(&json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
async fn test_signup_then_login_with_matching_claims() {
    let app = TestApp::spawn().await;

    let signup_body = signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;
    assert_eq!(signup_body["status"], "success");
    assert_eq!(signup_body["data"]["user"]["email"], "alice@example.com");
    assert_eq!(signup_body["data"]["user"]["role"], "user");

    let response = app
        .post("/auth/login")
        .json(&json!({
            "email": "alice@example.com",
            "password": "Passw0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let login_body: serde_json::Value = response.json().await.expect("Failed to parse response");

    // Verified claims in the issued access token match the created user.
    let token = login_body["data"]["access_token"].as_str().unwrap();
    let claims = app.tokens.verify_access(token).expect("token verifies");

    assert_eq!(claims.sub, signup_body["data"]["user"]["id"].as_str().unwrap());
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn test_signup_response_never_contains_password_hash() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;

    assert!(body["data"]["user"]["password_hash"].is_null());
    assert!(body["data"]["user"]["password"].is_null());
}

#[tokio::test]
async fn test_duplicate_signup_conflicts_without_duplicate_row() {
    let app = TestApp::spawn().await;

    signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;

    let response = app
        .post("/auth/signup")
        .json(&json!({
            "name": "Alice Clone",
            "email": "alice@example.com",
            "password": "Other1!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "error");

    assert_eq!(app.repository.len(), 1);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;

    signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;

    let unknown_email = app
        .post("/auth/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "Passw0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let wrong_password = app
        .post("/auth/login")
        .json(&json!({
            "email": "alice@example.com",
            "password": "WrongPass1!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_body: serde_json::Value = unknown_email.json().await.unwrap();
    let wrong_body: serde_json::Value = wrong_password.json().await.unwrap();

    // No user-existence oracle: the two failures are byte-identical.
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn test_change_password_flow() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    // Wrong current password is a distinct, non-401 failure.
    let response = app
        .patch("/auth/change-password")
        .bearer_auth(&token)
        .json(&json!({
            "current_password": "NotCurrent1!",
            "new_password": "N3wPass!word"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .patch("/auth/change-password")
        .bearer_auth(&token)
        .json(&json!({
            "current_password": "Passw0rd!",
            "new_password": "N3wPass!word"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    // The old password no longer authenticates.
    let old_login = app
        .post("/auth/login")
        .json(&json!({
            "email": "alice@example.com",
            "password": "Passw0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);

    // The new one does.
    let new_login = app
        .post("/auth/login")
        .json(&json!({
            "email": "alice@example.com",
            "password": "N3wPass!word"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(new_login.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;
    let refresh_token = body["data"]["refresh_token"].as_str().unwrap();

    let response = app
        .get("/auth/me")
        .bearer_auth(refresh_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::spawn().await;

    let user = app
        .seed_user("Alice Smith", "alice@example.com", Role::User, Utc::now())
        .await;

    // Sign a claim set whose expiry is already past the leeway window.
    let handler = app.tokens.access_handler();
    let mut claims = handler.claims_for(&auth::TokenIdentity {
        id: user.id.to_string(),
        email: user.email.as_str().to_string(),
        role: user.role.to_string(),
    });
    claims.exp = (Utc::now() - Duration::minutes(5)).timestamp();
    let expired = handler.encode(&claims).expect("encode expired token");

    let response = app
        .get("/auth/me")
        .bearer_auth(&expired)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bare_token_without_bearer_prefix_is_accepted() {
    let app = TestApp::spawn().await;

    let user = app
        .seed_user("Alice Smith", "alice@example.com", Role::User, Utc::now())
        .await;
    let token = app.access_token_for(&user);

    let response = app
        .get("/auth/me")
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/auth/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .delete("/auth/me")
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The token is still cryptographically valid but its account is gone.
    let response = app
        .get("/auth/me")
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_gate() {
    let app = TestApp::spawn().await;

    let admin = app
        .seed_user("Ada Admin", "ada@example.com", Role::Admin, Utc::now())
        .await;
    let regular = app
        .seed_user("Ron Regular", "ron@example.com", Role::User, Utc::now())
        .await;

    let response = app
        .get("/auth/users")
        .bearer_auth(app.access_token_for(&regular))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .get("/auth/users")
        .bearer_auth(app.access_token_for(&admin))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .get("/auth/users")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_pagination_over_25_users() {
    let app = TestApp::spawn().await;

    let base = Utc::now();
    for i in 0..25 {
        app.seed_user(
            "Seeded User",
            &format!("user{i}@example.com"),
            Role::User,
            base - Duration::seconds(i),
        )
        .await;
    }

    let admin = app
        .seed_user("Ada Admin", "ada@example.com", Role::Admin, base - Duration::hours(1))
        .await;
    let token = app.access_token_for(&admin);

    let mut seen = std::collections::HashSet::new();
    let mut page_sizes = Vec::new();

    for page in 1..=3 {
        let response = app
            .get(&format!("/auth/users?page={page}&limit=10&role=user"))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["data"]["pagination"]["total"], 25);
        assert_eq!(body["data"]["pagination"]["pages"], 3);
        assert_eq!(body["data"]["pagination"]["page"], page);

        let users = body["data"]["users"].as_array().unwrap().clone();
        page_sizes.push(users.len());

        for user in &users {
            // No overlap across pages.
            assert!(seen.insert(user["id"].as_str().unwrap().to_string()));
        }
    }

    assert_eq!(page_sizes, vec![10, 10, 5]);
    assert_eq!(seen.len(), 25);
}

#[tokio::test]
async fn test_update_me_rejects_password_field() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .patch("/auth/me")
        .bearer_auth(&token)
        .json(&json!({
            "name": "Alice Renamed",
            "password": "Sneaky1!pass"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "password"));

    // Nothing reached storage: the old password still authenticates and
    // the name is unchanged.
    let login = app
        .post("/auth/login")
        .json(&json!({
            "email": "alice@example.com",
            "password": "Passw0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(login.status(), StatusCode::OK);

    let login_body: serde_json::Value = login.json().await.unwrap();
    assert_eq!(login_body["data"]["user"]["name"], "Alice Smith");
}

#[tokio::test]
async fn test_update_me_profile_fields() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .patch("/auth/me")
        .bearer_auth(&token)
        .json(&json!({
            "name": "Alice Renamed",
            "email": "renamed@example.com"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["user"]["name"], "Alice Renamed");
    assert_eq!(body["data"]["user"]["email"], "renamed@example.com");
}

#[tokio::test]
async fn test_update_me_email_conflict() {
    let app = TestApp::spawn().await;

    signup(&app, "Bob Jones", "bob@example.com", "Passw0rd!").await;
    let body = signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .patch("/auth/me")
        .bearer_auth(&token)
        .json(&json!({ "email": "bob@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_delete_then_fetch_yields_not_found() {
    let app = TestApp::spawn().await;

    let admin = app
        .seed_user("Ada Admin", "ada@example.com", Role::Admin, Utc::now())
        .await;
    let victim = app
        .seed_user("Vic Tim", "vic@example.com", Role::User, Utc::now())
        .await;
    let token = app.access_token_for(&admin);

    let response = app
        .delete(&format!("/auth/users/{}", victim.id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get(&format!("/auth/users/{}", victim.id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_reject_malformed_id() {
    let app = TestApp::spawn().await;

    let admin = app
        .seed_user("Ada Admin", "ada@example.com", Role::Admin, Utc::now())
        .await;
    let token = app.access_token_for(&admin);

    let response = app
        .get("/auth/users/not-a-uuid")
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_validation_details() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/signup")
        .json(&json!({
            "name": "A",
            "email": "not-an-email",
            "password": "weak"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Validation failed");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "password"]);
}

#[tokio::test]
async fn test_password_reset_request_never_reveals_existence() {
    let app = TestApp::spawn().await;

    signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;

    let known = app
        .post("/auth/password-reset-request")
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    let unknown = app
        .post("/auth/password-reset-request")
        .json(&json!({ "email": "nobody@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(known.status(), StatusCode::OK);
    assert_eq!(unknown.status(), StatusCode::OK);

    let known_body: serde_json::Value = known.json().await.unwrap();
    let unknown_body: serde_json::Value = unknown.json().await.unwrap();
    assert_eq!(known_body, unknown_body);
}

#[tokio::test]
async fn test_logout_is_a_stateless_no_op() {
    let app = TestApp::spawn().await;

    let body = signup(&app, "Alice Smith", "alice@example.com", "Passw0rd!").await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .post("/auth/logout")
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    // Stateless tokens survive logout; only expiry ends them.
    let response = app
        .get("/auth/me")
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/health")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert!(body["data"]["timestamp"].is_string());
}
