// src/db/customer_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{customer::Customer, reports::CustomerBalanceEntry},
};

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        area_id: Option<Uuid>,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (user_id, area_id, name, address, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(area_id)
        .bind(name)
        .bind(address)
        .bind(phone)
        .fetch_one(executor)
        .await?;

        Ok(customer)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        area_id: Option<Uuid>,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET area_id = $3, name = $4, address = $5, phone = $6, updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(area_id)
        .bind(name)
        .bind(address)
        .bind(phone)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound)?;

        Ok(customer)
    }

    // Troca o conjunto de assinaturas de uma vez (delete + insert via UNNEST,
    // cada um em uma única query para caber no executor genérico)
    pub async fn clear_milk_types<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM customer_milk_types WHERE customer_id = $1")
            .bind(customer_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn add_milk_types<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        milk_type_ids: &[Uuid],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if milk_type_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO customer_milk_types (customer_id, milk_type_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(customer_id)
        .bind(milk_type_ids)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE user_id = $1
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    // Saldo acumulado (Σ vendas - Σ pagamentos) da vida inteira do cliente
    pub async fn lifetime_balance(&self, customer_id: Uuid) -> Result<Decimal, AppError> {
        let balance = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT
                COALESCE((SELECT SUM(quantity * rate) FROM sales WHERE customer_id = $1), 0)
              - COALESCE((SELECT SUM(amount) FROM payments WHERE customer_id = $1), 0)
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    // Totais por cliente em uma query só — alimenta a listagem de clientes
    // e o relatório de saldos
    pub async fn list_balances(&self, user_id: Uuid) -> Result<Vec<CustomerBalanceEntry>, AppError> {
        let entries = sqlx::query_as::<_, CustomerBalanceEntry>(
            r#"
            SELECT
                c.id AS customer_id,
                c.name AS customer_name,
                COALESCE(s.total, 0) AS total_sales,
                COALESCE(p.total, 0) AS total_payments,
                COALESCE(s.total, 0) - COALESCE(p.total, 0) AS balance
            FROM customers c
            LEFT JOIN (
                SELECT customer_id, SUM(quantity * rate) AS total
                FROM sales GROUP BY customer_id
            ) s ON s.customer_id = c.id
            LEFT JOIN (
                SELECT customer_id, SUM(amount) AS total
                FROM payments GROUP BY customer_id
            ) p ON p.customer_id = c.id
            WHERE c.user_id = $1
            ORDER BY balance DESC, c.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    // Vendas e pagamentos caem em cascata pelo FK
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
