// src/db/payment_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::billing::{Payment, PaymentAllocation, Period},
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        customer_id: Uuid,
        date: NaiveDate,
        amount: Decimal,
        description: Option<&str>,
        target: Option<Period>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (user_id, customer_id, date, amount, description, month, year)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(customer_id)
        .bind(date)
        .bind(amount)
        .bind(description)
        .bind(target.map(|p| p.month))
        .bind(target.map(|p| p.year))
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    // Atualiza os dados E o alvo de uma vez — o alvo novo substitui o antigo
    // por inteiro (nulos incluídos), mantendo o CHECK do banco satisfeito.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        date: NaiveDate,
        amount: Decimal,
        description: Option<&str>,
        target: Option<Period>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET date = $3, amount = $4, description = $5,
                month = $6, year = $7, updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(date)
        .bind(amount)
        .bind(description)
        .bind(target.map(|p| p.month))
        .bind(target.map(|p| p.year))
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound)?;

        Ok(payment)
    }

    // As alocações caem junto pelo ON DELETE CASCADE
    pub async fn delete<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            "DELETE FROM payments WHERE user_id = $1 AND id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound)?;

        Ok(payment)
    }

    // FOR UPDATE: edições concorrentes do mesmo pagamento serializam na linha
    pub async fn lock_by_id<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE user_id = $1 AND id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        customer_id: Option<Uuid>,
    ) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR customer_id = $2)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    pub async fn recent_for_customer(
        &self,
        customer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE customer_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    // =========================================================================
    //  ALOCAÇÕES (filhas de pagamento distribuído)
    // =========================================================================

    pub async fn insert_allocation<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        payment_id: Uuid,
        period: Period,
        amount: Decimal,
    ) -> Result<PaymentAllocation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let allocation = sqlx::query_as::<_, PaymentAllocation>(
            r#"
            INSERT INTO payment_allocations (user_id, payment_id, year, month, amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(payment_id)
        .bind(period.year)
        .bind(period.month)
        .bind(amount)
        .fetch_one(executor)
        .await?;

        Ok(allocation)
    }

    // Apagar-e-recriar: na edição as alocações antigas saem TODAS antes de
    // o motor rodar de novo — nunca um diff incremental.
    pub async fn delete_allocations<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM payment_allocations WHERE payment_id = $1")
            .bind(payment_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_allocations<'e, E>(
        &self,
        executor: E,
        payment_id: Uuid,
    ) -> Result<Vec<PaymentAllocation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let allocations = sqlx::query_as::<_, PaymentAllocation>(
            r#"
            SELECT * FROM payment_allocations
            WHERE payment_id = $1
            ORDER BY year ASC, month ASC
            "#,
        )
        .bind(payment_id)
        .fetch_all(executor)
        .await?;

        Ok(allocations)
    }
}
