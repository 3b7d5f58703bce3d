//! Token issue, exchange, and the bearer gate in front of `/admin/*`.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

fn unauthorized(detail: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": detail })))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<TokenPair>, (StatusCode, Json<Value>)> {
    let mut state = state.write().await;
    if input.username != state.username || input.password != state.password {
        return Err(unauthorized(
            "No active account found with the given credentials",
        ));
    }
    let access = Uuid::new_v4().to_string();
    let refresh = Uuid::new_v4().to_string();
    state.access_tokens.insert(access.clone());
    state.refresh_tokens.insert(refresh.clone());
    debug!(username = %input.username, "issued token pair");
    Ok(Json(TokenPair { access, refresh }))
}

pub async fn refresh(
    State(state): State<SharedState>,
    Json(input): Json<RefreshRequest>,
) -> Result<Json<AccessToken>, (StatusCode, Json<Value>)> {
    let mut state = state.write().await;
    if !state.refresh_tokens.contains(&input.refresh) {
        return Err(unauthorized("Token is invalid or expired"));
    }
    let access = Uuid::new_v4().to_string();
    state.access_tokens.insert(access.clone());
    Ok(Json(AccessToken { access }))
}

pub async fn verify(
    State(state): State<SharedState>,
    Json(input): Json<VerifyRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let state = state.read().await;
    if state.access_tokens.contains(&input.token) {
        Ok(Json(json!({})))
    } else {
        Err(unauthorized("Token is invalid or expired"))
    }
}

/// Rejects any request without a currently-valid bearer access token.
pub async fn require_bearer(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let Some(token) = token else {
        return Err(unauthorized(
            "Authentication credentials were not provided",
        ));
    };
    let known = state.read().await.access_tokens.contains(token);
    if !known {
        return Err(unauthorized("Given token not valid for any token type"));
    }
    Ok(next.run(request).await)
}
