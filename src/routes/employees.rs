use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request;
use crate::types::response;
use crate::utils::auth::Claims;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<request::SearchParams>,
) -> Result<Json<Vec<response::Employee>>, Error> {
    let employees = state
        .employee_controller
        .list(params.search.as_deref())
        .await?;

    Ok(Json(employees))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<response::Employee>, Error> {
    let employee = state.employee_controller.get(id).await?;

    Ok(Json(employee))
}

#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<request::EmployeeData>,
) -> Result<(StatusCode, Json<response::Employee>), Error> {
    let employee = state.employee_controller.create(data.validate()?).await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<request::EmployeeData>,
) -> Result<Json<response::Employee>, Error> {
    let employee = state
        .employee_controller
        .update(id, data.validate()?)
        .await?;

    Ok(Json(employee))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<response::Message>, Error> {
    claims.require_admin()?;

    state.employee_controller.delete(id).await?;

    Ok(Json(response::Message::new("Employee deleted successfully")))
}
