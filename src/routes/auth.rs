use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request;
use crate::types::response;
use crate::utils::auth::Claims;

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<request::LoginData>,
) -> Result<Json<response::Login>, Error> {
    let (user, token) = state
        .user_controller
        .login(&credentials.username, &credentials.password)
        .await?;

    Ok(Json(response::Login {
        token,
        user: response::UserSummary {
            id: user.id,
            username: user.username,
            role: user.role,
        },
    }))
}

#[instrument(skip_all, fields(username = %data.username))]
pub async fn register(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(data): Json<request::RegisterData>,
) -> Result<(StatusCode, Json<response::Registered>), Error> {
    claims.require_admin()?;

    let user_id = state
        .user_controller
        .register(&data.username, &data.password, data.role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(response::Registered {
            message: "User created successfully".to_string(),
            user_id,
        }),
    ))
}
