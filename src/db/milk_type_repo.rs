// src/db/milk_type_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::catalog::MilkType};

#[derive(Clone)]
pub struct MilkTypeRepository {
    pool: PgPool,
}

impl MilkTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        rate_per_liter: Decimal,
    ) -> Result<MilkType, AppError> {
        let milk_type = sqlx::query_as::<_, MilkType>(
            r#"
            INSERT INTO milk_types (user_id, name, rate_per_liter)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(rate_per_liter)
        .fetch_one(&self.pool)
        .await?;

        Ok(milk_type)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<MilkType>, AppError> {
        let milk_types = sqlx::query_as::<_, MilkType>(
            "SELECT * FROM milk_types WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(milk_types)
    }

    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<MilkType>, AppError> {
        let milk_type = sqlx::query_as::<_, MilkType>(
            "SELECT * FROM milk_types WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(milk_type)
    }

    // Atualizar a tarifa só vale para vendas futuras: as vendas passadas
    // guardam a tarifa do dia em que foram feitas.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
        rate_per_liter: Decimal,
    ) -> Result<MilkType, AppError> {
        let milk_type = sqlx::query_as::<_, MilkType>(
            r#"
            UPDATE milk_types
            SET name = $3, rate_per_liter = $4
            WHERE user_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(name)
        .bind(rate_per_liter)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;

        Ok(milk_type)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM milk_types WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    // Assinaturas de um cliente (tabela de junção)
    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<MilkType>, AppError> {
        let milk_types = sqlx::query_as::<_, MilkType>(
            r#"
            SELECT mt.* FROM milk_types mt
            JOIN customer_milk_types cmt ON cmt.milk_type_id = mt.id
            WHERE cmt.customer_id = $1
            ORDER BY mt.name ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(milk_types)
    }
}
