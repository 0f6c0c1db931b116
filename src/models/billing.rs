// src/models/billing.rs
//
// Vendas, pagamentos, alocações multi-mês e o saldo mensal materializado.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- PERÍODO (ano/mês) ---

// A ordem derivada (ano, depois mês) é a ordem cronológica — o motor de
// alocação depende disso para varrer do mês mais antigo ao mais novo.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, FromRow, ToSchema,
)]
pub struct Period {
    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = 3, minimum = 1, maximum = 12)]
    pub month: i32,
}

impl Period {
    pub fn new(year: i32, month: i32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month() as i32,
        }
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    // Primeiro dia do mês; None se o mês estiver fora de 1..=12
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month as u32, 1)
    }

    pub fn next(&self) -> Period {
        if self.month >= 12 {
            Period {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Period {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

// --- VENDA (uma entrega de leite) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    pub customer_id: Uuid,
    pub milk_type_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-03-15")]
    pub date: NaiveDate,

    // Quantidade em litros
    #[schema(example = "2.50")]
    pub quantity: Decimal,

    // Tarifa congelada no dia da venda
    #[schema(example = "4.50")]
    pub rate: Decimal,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    // O valor nunca é armazenado: sempre quantidade × tarifa
    pub fn total_amount(&self) -> Decimal {
        self.quantity * self.rate
    }

    pub fn period(&self) -> Period {
        Period::from_date(self.date)
    }
}

// --- PAGAMENTO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    pub customer_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-04-02")]
    pub date: NaiveDate,

    #[schema(example = "1000.00")]
    pub amount: Decimal,

    pub description: Option<String>,

    // Mês+ano preenchidos = alvo único; ambos nulos = distribuído.
    // O banco garante o "tudo ou nada" via CHECK.
    pub month: Option<i32>,
    pub year: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn is_distributed(&self) -> bool {
        self.month.is_none() && self.year.is_none()
    }

    // O período alvo quando o pagamento é de mês único
    pub fn single_period(&self) -> Option<Period> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => Some(Period { year, month }),
            _ => None,
        }
    }
}

// Filho de um pagamento distribuído: quanto coube em cada mês
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAllocation {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    pub payment_id: Uuid,
    pub year: i32,
    pub month: i32,

    #[schema(example = "700.00")]
    pub amount: Decimal,

    pub created_at: DateTime<Utc>,
}

impl PaymentAllocation {
    pub fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }
}

// Pagamento + alocações + sobra não aplicada, como o frontend consome
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetail {
    #[serde(flatten)]
    pub payment: Payment,

    pub allocations: Vec<PaymentAllocation>,

    // amount - Σ alocações: sobra absorvida como crédito do cliente
    #[schema(example = "0.00")]
    pub unallocated_amount: Decimal,
}

// --- SALDO MENSAL (cache materializado) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "balance_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceStatus {
    NoSales, // Nenhuma entrega no mês
    Paid,    // Quitado (saldo <= 0)
    Pending, // Em aberto
}

impl BalanceStatus {
    // Classificação fixa: sem vendas > quitado > pendente.
    pub fn classify(sales_total: Decimal, balance: Decimal) -> Self {
        if sales_total.is_zero() {
            BalanceStatus::NoSales
        } else if balance <= Decimal::ZERO {
            BalanceStatus::Paid
        } else {
            BalanceStatus::Pending
        }
    }
}

// Nunca é fonte de verdade: sempre reproduzível a partir de
// sales + payments + payment_allocations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBalance {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    pub customer_id: Uuid,
    pub year: i32,
    pub month: i32,

    #[schema(example = "700.00")]
    pub sales_amount: Decimal,

    #[schema(example = "700.00")]
    pub payment_amount: Decimal,

    #[schema(example = "0.00")]
    pub balance: Decimal,

    pub status: BalanceStatus,

    pub updated_at: DateTime<Utc>,
}

// Período com o valor em aberto — entrada do motor de alocação e
// resposta do endpoint de meses pendentes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodOutstanding {
    #[serde(flatten)]
    pub period: Period,

    #[schema(example = "450.00")]
    pub outstanding: Decimal,
}

// Saída do motor de alocação, persistida como PaymentAllocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAllocation {
    #[serde(flatten)]
    pub period: Period,

    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn period_order_is_chronological() {
        let dez_2024 = Period::new(2024, 12);
        let jan_2025 = Period::new(2025, 1);
        let fev_2025 = Period::new(2025, 2);

        assert!(dez_2024 < jan_2025);
        assert!(jan_2025 < fev_2025);

        let mut periods = vec![fev_2025, dez_2024, jan_2025];
        periods.sort();
        assert_eq!(periods, vec![dez_2024, jan_2025, fev_2025]);
    }

    #[test]
    fn period_from_date() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        assert_eq!(Period::from_date(date), Period::new(2025, 7));
    }

    #[test]
    fn status_no_sales_wins_even_with_payments() {
        // Pagamento adiantado num mês sem entregas continua "sem vendas"
        assert_eq!(
            BalanceStatus::classify(Decimal::ZERO, dec("-500.00")),
            BalanceStatus::NoSales
        );
    }

    #[test]
    fn status_paid_on_zero_or_negative_balance() {
        assert_eq!(
            BalanceStatus::classify(dec("700.00"), Decimal::ZERO),
            BalanceStatus::Paid
        );
        assert_eq!(
            BalanceStatus::classify(dec("700.00"), dec("-50.00")),
            BalanceStatus::Paid
        );
    }

    #[test]
    fn status_pending_on_positive_balance() {
        assert_eq!(
            BalanceStatus::classify(dec("700.00"), dec("0.01")),
            BalanceStatus::Pending
        );
    }

    #[test]
    fn sale_amount_is_quantity_times_rate() {
        let sale = Sale {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            milk_type_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            quantity: dec("2.50"),
            rate: dec("4.50"),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(sale.total_amount(), dec("11.25"));
    }
}
