use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    auth::extractors::CurrentUser,
    error::AppError,
    profile::dto::{ProfileFailure, ProfileResponse},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

#[instrument(skip_all)]
pub async fn get_profile(
    State(state): State<AppState>,
    current: Result<CurrentUser, AppError>,
) -> Response {
    let user = match current {
        Ok(CurrentUser(user)) => user,
        Err(AppError::Server(detail)) => {
            error!(error = %detail, "could not load authenticated user");
            let body = ProfileFailure {
                success: false,
                message: "Error fetching profile data",
                error: detail,
            };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
        Err(e) => return e.into_response(),
    };

    let profile = state.enricher.enrich(&user).await;
    Json(ProfileResponse {
        success: true,
        user: profile,
    })
    .into_response()
}
