use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use gymtrack::auth::{Identity, TokenVerifier, VerifyError};
use gymtrack::config::AuthConfig;
use gymtrack::db::{create_memory_pool, DbPool};
use gymtrack::handlers::{exercises, login, users, workouts};
use gymtrack::migrations::run_migrations_for_tests;
use gymtrack::routes;
use gymtrack::store::Datastore;

/// Canonical prefix for `self` URIs in tests.
pub const BASE_URL: &str = "https://gymtrack.example.com";

pub const ALICE_TOKEN: &str = "alice-token";
pub const ALICE_SUBJECT: &str = "auth0|alice";
pub const BOB_TOKEN: &str = "bob-token";
pub const BOB_SUBJECT: &str = "auth0|bob";

/// Verifier backed by a fixed token table; no provider round-trips.
pub struct StaticVerifier {
    identities: HashMap<String, Identity>,
}

impl StaticVerifier {
    pub fn with_default_users() -> Self {
        let mut identities = HashMap::new();
        identities.insert(
            ALICE_TOKEN.to_string(),
            Identity {
                subject: ALICE_SUBJECT.to_string(),
                display_name: "alice".to_string(),
            },
        );
        identities.insert(
            BOB_TOKEN.to_string(),
            Identity {
                subject: BOB_SUBJECT.to_string(),
                display_name: "bob".to_string(),
            },
        );
        Self { identities }
    }
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        self.identities
            .get(token)
            .cloned()
            .ok_or(VerifyError::UnknownKey)
    }
}

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        issuer: "https://issuer.example.com/".to_string(),
        jwks_uri: "https://issuer.example.com/.well-known/jwks.json".to_string(),
        // Nothing listens on port 1; login tests override this.
        token_url: "http://127.0.0.1:1/oauth/token".to_string(),
        audience: "https://issuer.example.com/api/v2/".to_string(),
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
    }
}

pub fn create_test_app(pool: DbPool) -> Router {
    create_test_app_with_auth(pool, test_auth_config())
}

pub fn create_test_app_with_auth(pool: DbPool, auth: AuthConfig) -> Router {
    let store = Datastore::new(pool);
    let verifier: Arc<dyn TokenVerifier> = Arc::new(StaticVerifier::with_default_users());

    let exercises_state = exercises::ExercisesState {
        store: store.clone(),
        base_url: BASE_URL.to_string(),
    };
    let workouts_state = workouts::WorkoutsState {
        store: store.clone(),
        base_url: BASE_URL.to_string(),
    };
    let users_state = users::UsersState {
        store: store.clone(),
    };
    let login_state = login::LoginState {
        http: reqwest::Client::new(),
        auth,
    };

    routes::create_router(
        exercises_state,
        workouts_state,
        users_state,
        login_state,
        verifier,
    )
}

/// Fire one request at the router. Sets `Accept: application/json` and, for
/// JSON bodies, the matching content type. Tests exercising content
/// negotiation build their requests by hand instead.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    json: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ACCEPT, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match json {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Create an exercise through the API and return its id.
pub async fn create_exercise(app: &Router, token: &str, name: &str) -> i64 {
    let response = request(
        app,
        "POST",
        "/exercises",
        Some(token),
        Some(serde_json::json!({
            "name": name,
            "category": "strength",
            "equipment": "barbell",
        })),
    )
    .await;
    assert_eq!(response.status(), http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a workout through the API and return its id.
pub async fn create_workout(app: &Router, token: &str, name: &str) -> i64 {
    let response = request(
        app,
        "POST",
        "/workouts",
        Some(token),
        Some(serde_json::json!({
            "name": name,
            "category": "strength",
            "date": "2024-05-01",
        })),
    )
    .await;
    assert_eq!(response.status(), http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Link an exercise into a workout through the API.
pub async fn assign(app: &Router, token: &str, wid: i64, eid: i64) -> Response {
    request(
        app,
        "PUT",
        &format!("/workouts/{wid}/exercises/{eid}"),
        Some(token),
        None,
    )
    .await
}
