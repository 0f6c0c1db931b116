// src/db/sale_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::billing::Sale};

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        customer_id: Uuid,
        milk_type_id: Uuid,
        date: NaiveDate,
        quantity: Decimal,
        rate: Decimal,
        notes: Option<&str>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (user_id, customer_id, milk_type_id, date, quantity, rate, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(customer_id)
        .bind(milk_type_id)
        .bind(date)
        .bind(quantity)
        .bind(rate)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(sale)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        customer_id: Uuid,
        milk_type_id: Uuid,
        date: NaiveDate,
        quantity: Decimal,
        rate: Decimal,
        notes: Option<&str>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales
            SET customer_id = $3, milk_type_id = $4, date = $5,
                quantity = $6, rate = $7, notes = $8, updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(customer_id)
        .bind(milk_type_id)
        .bind(date)
        .bind(quantity)
        .bind(rate)
        .bind(notes)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound)?;

        Ok(sale)
    }

    // RETURNING * para o service saber qual período recalcular
    pub async fn delete<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            "DELETE FROM sales WHERE user_id = $1 AND id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound)?;

        Ok(sale)
    }

    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        customer_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT * FROM sales
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR customer_id = $2)
              AND ($3::date IS NULL OR date >= $3)
              AND ($4::date IS NULL OR date <= $4)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(customer_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    pub async fn recent_for_customer(
        &self,
        customer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT * FROM sales
            WHERE customer_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    // Vendas do mês, na ordem do dia — linhas de detalhe da fatura
    pub async fn list_for_period(
        &self,
        customer_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT * FROM sales
            WHERE customer_id = $1 AND date >= $2 AND date < $3
            ORDER BY date ASC, created_at ASC
            "#,
        )
        .bind(customer_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}
