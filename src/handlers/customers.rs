// src/handlers/customers.rs

use axum::{
    extract::{Path, Query, State},
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
    models::{
        billing::{MonthlyBalance, PeriodOutstanding},
        customer::{Customer, CustomerDetail, CustomerSummary},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    pub area_id: Option<Uuid>,

    #[schema(example = "Rua das Flores, 123")]
    pub address: Option<String>,

    #[schema(example = "(11) 98765-4321")]
    pub phone: Option<String>,

    // Assinaturas de tipos de leite
    #[serde(default)]
    pub milk_type_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthsQuery {
    pub limit: Option<i64>,
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state
        .customer_service
        .create_customer(
            &app_state.db_pool,
            user.id,
            payload.area_id,
            &payload.name,
            payload.address.as_deref(),
            payload.phone.as_deref(),
            &payload.milk_type_ids,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers?search=
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(("search" = Option<String>, Query, description = "Filtro por nome")),
    responses(
        (status = 200, description = "Clientes com saldo acumulado", body = Vec<CustomerSummary>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListCustomersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state
        .customer_service
        .list_customers(user.id, query.search.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(customers)))
}

// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Detalhe do cliente", body = CustomerDetail),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.customer_service.customer_detail(user.id, id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    request_body = CustomerPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state
        .customer_service
        .update_customer(
            &app_state.db_pool,
            user.id,
            id,
            payload.area_id,
            &payload.name,
            payload.address.as_deref(),
            payload.phone.as_deref(),
            &payload.milk_type_ids,
        )
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido (vendas e pagamentos em cascata)"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.customer_service.delete_customer(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/customers/{id}/months?limit=6
#[utoipa::path(
    get,
    path = "/api/customers/{id}/months",
    tag = "Customers",
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("limit" = Option<i64>, Query, description = "Quantos meses (padrão 6)")
    ),
    responses(
        (status = 200, description = "Situação dos últimos meses (cache)", body = Vec<MonthlyBalance>),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn customer_months(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<MonthsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let months = app_state
        .billing_service
        .month_statuses(user.id, id, query.limit.unwrap_or(6))
        .await?;

    Ok((StatusCode::OK, Json(months)))
}

// GET /api/customers/{id}/unpaid-months
#[utoipa::path(
    get,
    path = "/api/customers/{id}/unpaid-months",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Meses com valor em aberto, mais antigo primeiro", body = Vec<PeriodOutstanding>),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn customer_unpaid_months(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let months = app_state
        .billing_service
        .unpaid_months(&app_state.db_pool, user.id, id)
        .await?;

    Ok((StatusCode::OK, Json(months)))
}

// POST /api/customers/{id}/balances/rebuild
#[utoipa::path(
    post,
    path = "/api/customers/{id}/balances/rebuild",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cache reconstruído das linhas-fonte", body = Vec<MonthlyBalance>),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn rebuild_customer_balances(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let balances = app_state
        .billing_service
        .rebuild_balances(&app_state.db_pool, user.id, id)
        .await?;

    Ok((StatusCode::OK, Json(balances)))
}
