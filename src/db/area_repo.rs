// src/db/area_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{catalog::Area, customer::Customer},
};

#[derive(Clone)]
pub struct AreaRepository {
    pool: PgPool,
}

impl AreaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Area, AppError> {
        let area = sqlx::query_as::<_, Area>(
            r#"
            INSERT INTO areas (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(area)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Area>, AppError> {
        let areas = sqlx::query_as::<_, Area>(
            "SELECT * FROM areas WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(areas)
    }

    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Option<Area>, AppError> {
        let area = sqlx::query_as::<_, Area>(
            "SELECT * FROM areas WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(area)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Area, AppError> {
        let area = sqlx::query_as::<_, Area>(
            r#"
            UPDATE areas
            SET name = $3, description = $4
            WHERE user_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;

        Ok(area)
    }

    // Os clientes da área NÃO são excluídos: o FK (ON DELETE SET NULL)
    // devolve todos para "sem área".
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM areas WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    pub async fn list_customers(
        &self,
        user_id: Uuid,
        area_id: Uuid,
    ) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE user_id = $1 AND area_id = $2
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .bind(area_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }
}
