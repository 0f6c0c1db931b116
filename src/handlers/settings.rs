// src/handlers/settings.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::settings::{BillingSettings, UpdateSettingsRequest},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses(
        (status = 200, description = "Configurações de faturamento da conta", body = BillingSettings)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<BillingSettings>, AppError> {
    let settings = app_state.settings_repo.get_or_create(user.id).await?;
    Ok(Json(settings))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Configurações atualizadas", body = BillingSettings)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<BillingSettings>, AppError> {
    let settings = app_state
        .settings_repo
        .update(
            user.id,
            payload.company_name.as_deref(),
            payload.document_number.as_deref(),
            payload.pix_key.as_deref(),
            payload.address.as_deref(),
            payload.footer_note.as_deref(),
        )
        .await?;

    Ok(Json(settings))
}
