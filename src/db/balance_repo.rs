// src/db/balance_repo.rs
//
// Leitura dos totais por período (sempre das linhas-fonte) e escrita do
// cache monthly_balances. O recálculo em si mora no BillingService.

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::billing::{BalanceStatus, MonthlyBalance, Period},
};

// Totais de um período, recomputados do zero
#[derive(Debug, sqlx::FromRow)]
pub struct PeriodTotals {
    pub sales_total: Decimal,
    pub direct_total: Decimal,
    pub allocated_total: Decimal,
}

impl PeriodTotals {
    pub fn payments_total(&self) -> Decimal {
        self.direct_total + self.allocated_total
    }
}

#[derive(Clone)]
pub struct BalanceRepository {
    pool: PgPool,
}

impl BalanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Soma vendas, pagamentos diretos e alocações do período em uma query só.
    // Nunca lê monthly_balances: é daqui que o cache é reconstruído.
    pub async fn period_totals<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        period: Period,
    ) -> Result<PeriodTotals, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let from = period
            .first_day()
            .ok_or(AppError::InvalidMonth(period.month))?;
        let to = period
            .next()
            .first_day()
            .ok_or(AppError::InvalidMonth(period.month))?;

        let totals = sqlx::query_as::<_, PeriodTotals>(
            r#"
            SELECT
                COALESCE((
                    SELECT SUM(quantity * rate) FROM sales
                    WHERE customer_id = $1 AND date >= $2 AND date < $3
                ), 0) AS sales_total,
                COALESCE((
                    SELECT SUM(amount) FROM payments
                    WHERE customer_id = $1 AND year = $4 AND month = $5
                ), 0) AS direct_total,
                COALESCE((
                    SELECT SUM(pa.amount)
                    FROM payment_allocations pa
                    JOIN payments p ON pa.payment_id = p.id
                    WHERE p.customer_id = $1 AND pa.year = $4 AND pa.month = $5
                ), 0) AS allocated_total
            "#,
        )
        .bind(customer_id)
        .bind(from)
        .bind(to)
        .bind(period.year)
        .bind(period.month)
        .fetch_one(executor)
        .await?;

        Ok(totals)
    }

    pub async fn upsert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        customer_id: Uuid,
        period: Period,
        sales_amount: Decimal,
        payment_amount: Decimal,
        balance: Decimal,
        status: BalanceStatus,
    ) -> Result<MonthlyBalance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, MonthlyBalance>(
            r#"
            INSERT INTO monthly_balances
                (user_id, customer_id, year, month, sales_amount, payment_amount, balance, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (customer_id, year, month) DO UPDATE
            SET sales_amount = EXCLUDED.sales_amount,
                payment_amount = EXCLUDED.payment_amount,
                balance = EXCLUDED.balance,
                status = EXCLUDED.status,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(customer_id)
        .bind(period.year)
        .bind(period.month)
        .bind(sales_amount)
        .bind(payment_amount)
        .bind(balance)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn find(
        &self,
        customer_id: Uuid,
        period: Period,
    ) -> Result<Option<MonthlyBalance>, AppError> {
        let row = sqlx::query_as::<_, MonthlyBalance>(
            r#"
            SELECT * FROM monthly_balances
            WHERE customer_id = $1 AND year = $2 AND month = $3
            "#,
        )
        .bind(customer_id)
        .bind(period.year)
        .bind(period.month)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // Meses mais recentes primeiro, para os badges da tela do cliente
    pub async fn list_for_customer(
        &self,
        customer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MonthlyBalance>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyBalance>(
            r#"
            SELECT * FROM monthly_balances
            WHERE customer_id = $1
            ORDER BY year DESC, month DESC
            LIMIT $2
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Todos os períodos em que o cliente tem movimento em alguma
    // linha-fonte — base do rebuild completo.
    pub async fn known_periods<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<Vec<Period>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let periods = sqlx::query_as::<_, Period>(
            r#"
            SELECT DISTINCT year, month FROM (
                SELECT EXTRACT(YEAR FROM date)::int AS year,
                       EXTRACT(MONTH FROM date)::int AS month
                FROM sales WHERE customer_id = $1
                UNION
                SELECT year, month FROM payments
                WHERE customer_id = $1 AND year IS NOT NULL
                UNION
                SELECT pa.year, pa.month
                FROM payment_allocations pa
                JOIN payments p ON pa.payment_id = p.id
                WHERE p.customer_id = $1
            ) t
            ORDER BY year ASC, month ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(executor)
        .await?;

        Ok(periods)
    }
}
