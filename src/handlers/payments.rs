// src/handlers/payments.rs

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
use crate::{
    common::error::{validation_error, AppError},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::billing::{Payment, PaymentDetail, Period},
    services::billing_service::PaymentTarget,
};

// Valor não-positivo nem chega no motor de alocação
fn check_positive_amount(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(validation_error(
            "amount",
            "O valor deve ser maior que zero.",
        ));
    }
    Ok(())
}

// Alvo do pagamento no payload: mês/ano soltos (alvo único) OU a lista
// targetMonths (distribuído). O service rejeita qualquer mistura.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub customer_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-04-02")]
    pub date: NaiveDate,

    #[schema(example = "1000.00")]
    pub amount: Decimal,

    #[schema(example = "Pagamento em dinheiro")]
    pub description: Option<String>,

    #[schema(example = 3)]
    pub month: Option<i32>,

    #[schema(example = 2025)]
    pub year: Option<i32>,

    pub target_months: Option<Vec<Period>>,
}

// Na edição o cliente não muda; o resto segue a mesma máquina de estados
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentPayload {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    pub amount: Decimal,
    pub description: Option<String>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub target_months: Option<Vec<Period>>,
}

#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    pub customer_id: Option<Uuid>,
}

// POST /api/payments
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Payments",
    request_body = PaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado, meses afetados recalculados", body = PaymentDetail),
        (status = 400, description = "Dados ou alvo inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_payment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<PaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    check_positive_amount(payload.amount)?;

    let target = PaymentTarget::resolve(payload.month, payload.year, payload.target_months)?;

    let detail = app_state
        .billing_service
        .create_payment(
            &app_state.db_pool,
            user.id,
            payload.customer_id,
            payload.date,
            payload.amount,
            payload.description.as_deref(),
            target,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/payments?customerId=
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    params(("customer_id" = Option<Uuid>, Query, description = "Filtra por cliente")),
    responses(
        (status = 200, description = "Pagamentos, mais recentes primeiro", body = Vec<Payment>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state
        .billing_service
        .list_payments(user.id, query.customer_id)
        .await?;

    Ok((StatusCode::OK, Json(payments)))
}

// GET /api/payments/{id}
#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 200, description = "Pagamento com alocações e sobra", body = PaymentDetail),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .billing_service
        .payment_detail(&app_state.db_pool, user.id, id)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// PUT /api/payments/{id}
#[utoipa::path(
    put,
    path = "/api/payments/{id}",
    tag = "Payments",
    request_body = UpdatePaymentPayload,
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 200, description = "Pagamento editado; alocações regravadas e meses antigos+novos recalculados", body = PaymentDetail),
        (status = 400, description = "Dados ou alvo inválidos"),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_payment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    check_positive_amount(payload.amount)?;

    let target = PaymentTarget::resolve(payload.month, payload.year, payload.target_months)?;

    let detail = app_state
        .billing_service
        .update_payment(
            &app_state.db_pool,
            user.id,
            id,
            payload.date,
            payload.amount,
            payload.description.as_deref(),
            target,
        )
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// DELETE /api/payments/{id}
#[utoipa::path(
    delete,
    path = "/api/payments/{id}",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 204, description = "Pagamento e alocações removidos; meses recalculados"),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_payment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .billing_service
        .delete_payment(&app_state.db_pool, user.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
