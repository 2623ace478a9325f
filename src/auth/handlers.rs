use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, SignupResponse},
        service::AuthOutcome,
    },
    error::{AppError, FieldError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "unreadable signup body");
        AppError::Validation(vec![FieldError {
            field: "body",
            message: "Request body must be a JSON object with string fields",
        }])
    })?;
    let AuthOutcome { token, user } = state.auth.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully",
            token,
            user: PublicUser {
                id: user.id,
                email: user.email,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    // Malformed signin input is indistinguishable from a wrong password.
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "unreadable signin body");
        AppError::InvalidCredentials
    })?;
    let AuthOutcome { token, user } = state
        .auth
        .authenticate(&payload.email, &payload.password)
        .await?;
    Ok(Json(AuthResponse {
        token,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    }))
}
