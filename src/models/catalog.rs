// src/models/catalog.rs
//
// Cadastros básicos da operação: áreas de entrega e tipos de leite.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Agrupamento de clientes para roteiro de entrega
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    #[schema(example = "Centro")]
    pub name: String,

    #[schema(example = "Rota da manhã, lado par das ruas")]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilkType {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    #[schema(example = "Integral")]
    pub name: String,

    // Tarifa vigente por litro; as vendas congelam a tarifa do dia
    #[schema(example = "4.50")]
    pub rate_per_liter: Decimal,

    pub created_at: DateTime<Utc>,
}
