// src/models/customer.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::billing::{Payment, Sale};
use crate::models::catalog::MilkType;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    // Cliente sem área fica como "sem área" (NULL)
    pub area_id: Option<Uuid>,

    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[schema(example = "Rua das Flores, 123")]
    pub address: Option<String>,

    #[schema(example = "(11) 98765-4321")]
    pub phone: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Cliente + saldo acumulado, para a listagem
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    #[serde(flatten)]
    pub customer: Customer,

    // Σ vendas - Σ pagamentos, a vida inteira do cliente
    #[schema(example = "152.50")]
    pub balance: Decimal,
}

// Visão completa para a tela de detalhe
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,

    pub milk_types: Vec<MilkType>,
    pub balance: Decimal,
    pub recent_sales: Vec<Sale>,
    pub recent_payments: Vec<Payment>,
}
