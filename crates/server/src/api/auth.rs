//! Session account handlers: signup, login, logout, me.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use mangaverse_core::{
    cookie_value, hash_password, verify_password, Identity, NewUser, UserError,
};

use super::{api_error, ApiError, CurrentUser};
use crate::metrics::AUTH_FAILURES_TOTAL;
use crate::state::AppState;

/// Minimum password length for new accounts.
const MIN_PASSWORD_LEN: usize = 6;

type SessionResponse = (
    StatusCode,
    [(header::HeaderName, String); 1],
    Json<IdentityResponse>,
);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email, either works.
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

fn session_cookie(name: &str, token: &str, ttl_minutes: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name,
        token,
        ttl_minutes * 60
    )
}

fn cleared_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}

fn start_session(state: &AppState, identity: Identity, status: StatusCode) -> SessionResponse {
    let token = state.sessions().create(identity.clone());
    let cookie = session_cookie(
        state.session_cookie_name(),
        &token,
        state.session_ttl_minutes(),
    );
    (
        status,
        [(header::SET_COOKIE, cookie)],
        Json(IdentityResponse {
            user_id: identity.user_id,
            username: identity.username,
        }),
    )
}

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<SessionResponse, ApiError> {
    let username = request.username.trim();
    let email = request.email.trim();

    if username.is_empty() || email.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Username and email are required",
        ));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    if request.password != request.confirm_password {
        return Err(api_error(StatusCode::BAD_REQUEST, "Passwords do not match"));
    }

    let user = state
        .users()
        .create(
            NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: hash_password(&request.password),
            },
            Utc::now(),
        )
        .map_err(|e| match e {
            UserError::AlreadyExists => api_error(
                StatusCode::CONFLICT,
                "Email or username already exists",
            ),
            _ => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    let identity = Identity {
        user_id: user.id,
        username: user.username,
    };
    Ok(start_session(&state, identity, StatusCode::CREATED))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<SessionResponse, ApiError> {
    let invalid = || {
        AUTH_FAILURES_TOTAL
            .with_label_values(&["invalid_credentials"])
            .inc();
        api_error(
            StatusCode::UNAUTHORIZED,
            "Invalid username/email or password",
        )
    };

    let user = state
        .users()
        .find_by_login(request.login.trim())
        .map_err(|e| match e {
            UserError::NotFound(_) => invalid(),
            _ => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(invalid());
    }

    let identity = Identity {
        user_id: user.id,
        username: user.username,
    };
    Ok(start_session(&state, identity, StatusCode::OK))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (
    StatusCode,
    [(header::HeaderName, String); 1],
    Json<LogoutResponse>,
) {
    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        if let Some(token) = cookie_value(cookie_header, state.session_cookie_name()) {
            state.sessions().destroy(token);
        }
    }

    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            cleared_cookie(state.session_cookie_name()),
        )],
        Json(LogoutResponse { success: true }),
    )
}

/// GET /api/v1/auth/me
pub async fn me(CurrentUser(identity): CurrentUser) -> Result<Json<IdentityResponse>, ApiError> {
    match identity {
        Some(identity) => Ok(Json(IdentityResponse {
            user_id: identity.user_id,
            username: identity.username,
        })),
        None => Err(api_error(StatusCode::UNAUTHORIZED, "Not logged in")),
    }
}
