// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::reports::{CustomerBalanceEntry, DailyReportEntry, DashboardSummary, MonthlyReportEntry},
};

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRangeQuery {
    // Sem intervalo informado, últimos 30 dias
    fn resolve(&self) -> (NaiveDate, NaiveDate) {
        let today = Utc::now().date_naive();
        let from = self.from.unwrap_or(today - Duration::days(30));
        let to = self.to.unwrap_or(today);
        (from, to)
    }
}

// GET /api/reports/dashboard
#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    tag = "Reports",
    responses(
        (status = 200, description = "Resumo do dia e do mês corrente", body = DashboardSummary)
    ),
    security(("api_jwt" = []))
)]
pub async fn dashboard(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.report_service.dashboard(user.id).await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/reports/daily?from=&to=
#[utoipa::path(
    get,
    path = "/api/reports/daily",
    tag = "Reports",
    params(
        ("from" = Option<String>, Query, description = "Data inicial (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Data final (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Totais por dia × tipo de leite", body = Vec<DailyReportEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn daily_report(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (from, to) = query.resolve();
    let entries = app_state.report_service.daily_report(user.id, from, to).await?;
    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/reports/monthly?from=&to=
#[utoipa::path(
    get,
    path = "/api/reports/monthly",
    tag = "Reports",
    params(
        ("from" = Option<String>, Query, description = "Data inicial (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Data final (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Vendas × pagamentos × saldo por mês", body = Vec<MonthlyReportEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn monthly_report(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (from, to) = query.resolve();
    let entries = app_state
        .report_service
        .monthly_report(user.id, from, to)
        .await?;
    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/reports/customer-balances
#[utoipa::path(
    get,
    path = "/api/reports/customer-balances",
    tag = "Reports",
    responses(
        (status = 200, description = "Saldo acumulado por cliente, maior devedor primeiro", body = Vec<CustomerBalanceEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn customer_balances(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.customer_service.balance_report(user.id).await?;
    Ok((StatusCode::OK, Json(entries)))
}
