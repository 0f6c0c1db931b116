// src/db/report_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::reports::{DailyReportEntry, DashboardSummary},
};

// Linha crua dos agregados mensais (vendas OU pagamentos), combinadas
// pelo ReportService
#[derive(Debug, sqlx::FromRow)]
pub struct MonthlySalesRow {
    pub year: i32,
    pub month: i32,
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
pub struct MonthlyPaymentsRow {
    pub year: i32,
    pub month: i32,
    pub total_amount: Decimal,
}

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Painel inicial: contagem de clientes + totais do dia e do mês corrente
    pub async fn dashboard_summary(
        &self,
        user_id: Uuid,
        today: NaiveDate,
        start_of_month: NaiveDate,
    ) -> Result<DashboardSummary, AppError> {
        // Uma transação para um snapshot consistente dos números
        let mut tx = self.pool.begin().await?;

        let customers_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM customers WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        #[derive(sqlx::FromRow)]
        struct TodayRow {
            quantity: Decimal,
            amount: Decimal,
        }

        let today_row = sqlx::query_as::<_, TodayRow>(
            r#"
            SELECT
                COALESCE(SUM(quantity), 0) AS quantity,
                COALESCE(SUM(quantity * rate), 0) AS amount
            FROM sales
            WHERE user_id = $1 AND date = $2
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        let month_sales_amount = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(quantity * rate), 0)
            FROM sales
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            "#,
        )
        .bind(user_id)
        .bind(start_of_month)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        let month_payments_amount = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM payments
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            "#,
        )
        .bind(user_id)
        .bind(start_of_month)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            customers_count,
            today_quantity: today_row.quantity,
            today_amount: today_row.amount,
            month_sales_amount,
            month_payments_amount,
        })
    }

    // Relatório diário: total por dia × tipo de leite no intervalo
    pub async fn daily_report(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyReportEntry>, AppError> {
        let entries = sqlx::query_as::<_, DailyReportEntry>(
            r#"
            SELECT
                s.date,
                mt.name AS milk_type_name,
                SUM(s.quantity) AS total_quantity,
                SUM(s.quantity * s.rate) AS total_amount
            FROM sales s
            JOIN milk_types mt ON s.milk_type_id = mt.id
            WHERE s.user_id = $1 AND s.date >= $2 AND s.date <= $3
            GROUP BY s.date, mt.name
            ORDER BY s.date DESC, mt.name ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn monthly_sales(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MonthlySalesRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthlySalesRow>(
            r#"
            SELECT
                EXTRACT(YEAR FROM date)::int AS year,
                EXTRACT(MONTH FROM date)::int AS month,
                SUM(quantity) AS total_quantity,
                SUM(quantity * rate) AS total_amount
            FROM sales
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            GROUP BY 1, 2
            ORDER BY 1, 2
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Agrupado pela data do pagamento, não pelo mês alvo: o relatório
    // mensal mostra o fluxo de caixa do período.
    pub async fn monthly_payments(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MonthlyPaymentsRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyPaymentsRow>(
            r#"
            SELECT
                EXTRACT(YEAR FROM date)::int AS year,
                EXTRACT(MONTH FROM date)::int AS month,
                SUM(amount) AS total_amount
            FROM payments
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            GROUP BY 1, 2
            ORDER BY 1, 2
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
