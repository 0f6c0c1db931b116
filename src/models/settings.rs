// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Cabeçalho e bloco de pagamento das faturas (uma linha por conta)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingSettings {
    #[schema(ignore)]
    pub user_id: Uuid,

    #[schema(example = "Leiteria São João")]
    pub company_name: Option<String>,

    #[schema(example = "12.345.678/0001-00")]
    pub document_number: Option<String>,

    #[schema(example = "pix@leiteria.com")]
    pub pix_key: Option<String>,

    #[schema(example = "Estrada do Campo, km 4")]
    pub address: Option<String>,

    #[schema(example = "Pagamento até o dia 10 de cada mês")]
    pub footer_note: Option<String>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub company_name: Option<String>,
    pub document_number: Option<String>,
    pub pix_key: Option<String>,
    pub address: Option<String>,
    pub footer_note: Option<String>,
}
