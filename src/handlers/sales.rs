// src/handlers/sales.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{validation_error, AppError},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::billing::Sale,
};

fn check_positive_quantity(quantity: Decimal) -> Result<(), AppError> {
    if quantity <= Decimal::ZERO {
        return Err(validation_error(
            "quantity",
            "A quantidade deve ser maior que zero.",
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    pub customer_id: Uuid,
    pub milk_type_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-03-15")]
    pub date: NaiveDate,

    #[schema(example = "2.50")]
    pub quantity: Decimal,

    // Sem tarifa, vale a tarifa vigente do tipo de leite
    #[schema(example = "4.50")]
    pub rate: Option<Decimal>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalePayload {
    pub customer_id: Uuid,
    pub milk_type_id: Uuid,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    pub quantity: Decimal,
    pub rate: Decimal,
    pub notes: Option<String>,
}

// Entrega do dia na notação curta: "1-2-CB" = 1 L do tipo C, 2 L do tipo B
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchSalePayload {
    pub customer_id: Uuid,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    #[validate(length(min = 1, message = "A entrada é obrigatória."))]
    #[schema(example = "1-2-CB")]
    pub sales_input: String,
}

#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    pub customer_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda registrada e saldo do mês recalculado", body = Sale),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    check_positive_quantity(payload.quantity)?;

    let sale = app_state
        .sale_service
        .create_sale(
            &app_state.db_pool,
            user.id,
            payload.customer_id,
            payload.milk_type_id,
            payload.date,
            payload.quantity,
            payload.rate,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

// POST /api/sales/batch
#[utoipa::path(
    post,
    path = "/api/sales/batch",
    tag = "Sales",
    request_body = BatchSalePayload,
    responses(
        (status = 201, description = "Vendas do dia registradas", body = Vec<Sale>),
        (status = 400, description = "Notação inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_batch(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<BatchSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let sales = app_state
        .sale_service
        .create_batch(
            &app_state.db_pool,
            user.id,
            payload.customer_id,
            payload.date,
            &payload.sales_input,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(sales)))
}

// GET /api/sales?customerId=&from=&to=
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    params(
        ("customer_id" = Option<Uuid>, Query, description = "Filtra por cliente"),
        ("from" = Option<String>, Query, description = "Data inicial (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Data final (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Vendas, mais recentes primeiro", body = Vec<Sale>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListSalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state
        .sale_service
        .list(user.id, query.customer_id, query.from, query.to)
        .await?;

    Ok((StatusCode::OK, Json(sales)))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda", body = Sale),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.find_by_id(user.id, id).await?;
    Ok((StatusCode::OK, Json(sale)))
}

// PUT /api/sales/{id}
#[utoipa::path(
    put,
    path = "/api/sales/{id}",
    tag = "Sales",
    request_body = UpdateSalePayload,
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda atualizada; mês antigo e novo recalculados", body = Sale),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sale(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    check_positive_quantity(payload.quantity)?;

    let sale = app_state
        .sale_service
        .update_sale(
            &app_state.db_pool,
            user.id,
            id,
            payload.customer_id,
            payload.milk_type_id,
            payload.date,
            payload.quantity,
            payload.rate,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(sale)))
}

// DELETE /api/sales/{id}
#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 204, description = "Venda removida e saldo do mês recalculado"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_sale(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sale_service.delete_sale(&app_state.db_pool, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
