use axum::Json;
use axum::extract::{Extension, State};

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::response;
use crate::utils::auth::Claims;

pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<response::Profile>, Error> {
    let profile = state.user_controller.profile(claims.uid).await?;

    Ok(Json(profile))
}
