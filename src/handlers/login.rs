use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::config::AuthConfig;

#[derive(Clone)]
pub struct LoginState {
    pub http: reqwest::Client,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /login` — forward a password grant to the identity provider's
/// token endpoint and relay its JSON body. Transport errors become 500;
/// provider-side rejections still relay as a 200 body, which is what the
/// service has always done.
pub async fn login(State(state): State<LoginState>, Json(creds): Json<LoginRequest>) -> Response {
    let grant = serde_json::json!({
        "scope": "openid profile",
        "grant_type": "password",
        "username": creds.username,
        "password": creds.password,
        "audience": state.auth.audience,
        "client_id": state.auth.client_id,
        "client_secret": state.auth.client_secret,
    });

    let sent = state
        .http
        .post(&state.auth.token_url)
        .json(&grant)
        .send()
        .await;

    match sent {
        Ok(response) => match response.bytes().await {
            Ok(body) => (
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Reading token endpoint response failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        },
        Err(e) => {
            tracing::error!("Token endpoint request failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
