// src/db/settings_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::settings::BillingSettings};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Sempre devolve uma linha: cria a linha vazia da conta no primeiro acesso
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<BillingSettings, AppError> {
        let settings = sqlx::query_as::<_, BillingSettings>(
            r#"
            INSERT INTO billing_settings (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        company_name: Option<&str>,
        document_number: Option<&str>,
        pix_key: Option<&str>,
        address: Option<&str>,
        footer_note: Option<&str>,
    ) -> Result<BillingSettings, AppError> {
        let settings = sqlx::query_as::<_, BillingSettings>(
            r#"
            INSERT INTO billing_settings
                (user_id, company_name, document_number, pix_key, address, footer_note)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET company_name = EXCLUDED.company_name,
                document_number = EXCLUDED.document_number,
                pix_key = EXCLUDED.pix_key,
                address = EXCLUDED.address,
                footer_note = EXCLUDED.footer_note,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(company_name)
        .bind(document_number)
        .bind(pix_key)
        .bind(address)
        .bind(footer_note)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }
}
