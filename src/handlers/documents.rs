// src/handlers/documents.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::billing::Period,
};

#[derive(Debug, Deserialize)]
pub struct BillQuery {
    pub year: i32,
    pub month: i32,
}

// GET /api/customers/{id}/bill?year=&month=
#[utoipa::path(
    get,
    path = "/api/customers/{id}/bill",
    tag = "Documents",
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("year" = i32, Query, description = "Ano da fatura"),
        ("month" = i32, Query, description = "Mês da fatura (1-12)")
    ),
    responses(
        (status = 200, description = "Fatura mensal em PDF", content_type = "application/pdf"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn customer_bill(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<BillQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = Period::new(query.year, query.month);

    let pdf_bytes = app_state
        .document_service
        .generate_bill_pdf(user.id, id, period)
        .await?;

    let filename = format!("fatura_{}_{:02}_{}.pdf", query.year, query.month, id);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        pdf_bytes,
    ))
}
