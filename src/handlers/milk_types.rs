// src/handlers/milk_types.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{validation_error, AppError},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::catalog::MilkType,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilkTypePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Integral")]
    pub name: String,

    #[schema(example = "4.50")]
    pub rate_per_liter: Decimal,
}

impl MilkTypePayload {
    fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::ValidationError)?;
        if self.rate_per_liter <= Decimal::ZERO {
            return Err(validation_error(
                "ratePerLiter",
                "A tarifa deve ser maior que zero.",
            ));
        }
        Ok(())
    }
}

// POST /api/milk-types
#[utoipa::path(
    post,
    path = "/api/milk-types",
    tag = "MilkTypes",
    request_body = MilkTypePayload,
    responses(
        (status = 201, description = "Tipo de leite criado", body = MilkType),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_milk_type(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<MilkTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.check()?;

    let milk_type = app_state
        .catalog_service
        .create_milk_type(user.id, &payload.name, payload.rate_per_liter)
        .await?;

    Ok((StatusCode::CREATED, Json(milk_type)))
}

// GET /api/milk-types
#[utoipa::path(
    get,
    path = "/api/milk-types",
    tag = "MilkTypes",
    responses(
        (status = 200, description = "Lista de tipos de leite", body = Vec<MilkType>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_milk_types(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let milk_types = app_state.catalog_service.list_milk_types(user.id).await?;
    Ok((StatusCode::OK, Json(milk_types)))
}

// PUT /api/milk-types/{id}
#[utoipa::path(
    put,
    path = "/api/milk-types/{id}",
    tag = "MilkTypes",
    request_body = MilkTypePayload,
    params(("id" = Uuid, Path, description = "ID do tipo de leite")),
    responses(
        (status = 200, description = "Tipo de leite atualizado (só vendas futuras)", body = MilkType),
        (status = 404, description = "Tipo de leite não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_milk_type(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MilkTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.check()?;

    let milk_type = app_state
        .catalog_service
        .update_milk_type(user.id, id, &payload.name, payload.rate_per_liter)
        .await?;

    Ok((StatusCode::OK, Json(milk_type)))
}

// DELETE /api/milk-types/{id}
#[utoipa::path(
    delete,
    path = "/api/milk-types/{id}",
    tag = "MilkTypes",
    params(("id" = Uuid, Path, description = "ID do tipo de leite")),
    responses(
        (status = 204, description = "Tipo de leite removido (vendas em cascata)"),
        (status = 404, description = "Tipo de leite não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_milk_type(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_milk_type(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
