// src/models/reports.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Resumo do painel inicial
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub customers_count: i64,

    #[schema(example = "42.50")]
    pub today_quantity: Decimal,

    #[schema(example = "191.25")]
    pub today_amount: Decimal,

    #[schema(example = "3820.00")]
    pub month_sales_amount: Decimal,

    #[schema(example = "2900.00")]
    pub month_payments_amount: Decimal,
}

// Uma linha do relatório diário (dia × tipo de leite)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportEntry {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    pub milk_type_name: String,
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
}

// Uma linha do relatório mensal (vendas × pagamentos × saldo)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportEntry {
    pub year: i32,
    pub month: i32,
    pub total_quantity: Decimal,
    pub total_sales: Decimal,
    pub total_payments: Decimal,
    pub balance: Decimal,
}

// Saldo acumulado por cliente, maior devedor primeiro
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBalanceEntry {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub total_sales: Decimal,
    pub total_payments: Decimal,
    pub balance: Decimal,
}
