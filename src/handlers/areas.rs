// src/handlers/areas.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{catalog::Area, customer::Customer},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AreaPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Centro")]
    pub name: String,

    #[schema(example = "Rota da manhã")]
    pub description: Option<String>,
}

// POST /api/areas
#[utoipa::path(
    post,
    path = "/api/areas",
    tag = "Areas",
    request_body = AreaPayload,
    responses(
        (status = 201, description = "Área criada", body = Area),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_area(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<AreaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let area = app_state
        .catalog_service
        .create_area(user.id, &payload.name, payload.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(area)))
}

// GET /api/areas
#[utoipa::path(
    get,
    path = "/api/areas",
    tag = "Areas",
    responses(
        (status = 200, description = "Lista de áreas", body = Vec<Area>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_areas(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let areas = app_state.catalog_service.list_areas(user.id).await?;
    Ok((StatusCode::OK, Json(areas)))
}

// PUT /api/areas/{id}
#[utoipa::path(
    put,
    path = "/api/areas/{id}",
    tag = "Areas",
    request_body = AreaPayload,
    params(("id" = Uuid, Path, description = "ID da área")),
    responses(
        (status = 200, description = "Área atualizada", body = Area),
        (status = 404, description = "Área não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_area(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AreaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let area = app_state
        .catalog_service
        .update_area(user.id, id, &payload.name, payload.description.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(area)))
}

// DELETE /api/areas/{id}
#[utoipa::path(
    delete,
    path = "/api/areas/{id}",
    tag = "Areas",
    params(("id" = Uuid, Path, description = "ID da área")),
    responses(
        (status = 204, description = "Área removida; clientes ficam sem área"),
        (status = 404, description = "Área não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_area(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_area(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/areas/{id}/customers
#[utoipa::path(
    get,
    path = "/api/areas/{id}/customers",
    tag = "Areas",
    params(("id" = Uuid, Path, description = "ID da área")),
    responses(
        (status = 200, description = "Clientes da área", body = Vec<Customer>),
        (status = 404, description = "Área não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn area_customers(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.catalog_service.area_customers(user.id, id).await?;
    Ok((StatusCode::OK, Json(customers)))
}
