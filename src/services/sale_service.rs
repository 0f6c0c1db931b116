// src/services/sale_service.rs
//
// Vendas (entregas de leite). Toda mutação dispara o recálculo do saldo
// do(s) mês(es) afetado(s), na mesma transação.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, MilkTypeRepository, SaleRepository},
    models::billing::Sale,
    services::billing_service::BillingService,
};

// Uma parcela da entrada em lote: código do tipo de leite + litros
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub code: char,
    pub quantity: Decimal,
}

/// Interpreta a notação curta de entrega do dia: `"1-2.5-CB"` = 1 litro do
/// tipo com código `C` e 2,5 litros do tipo com código `B`. O último bloco
/// traz um código por parcela; os blocos anteriores, as quantidades — os
/// totais têm que bater.
pub fn parse_batch_input(input: &str) -> Result<Vec<BatchEntry>, AppError> {
    let parts: Vec<&str> = input.trim().split('-').collect();
    if parts.len() < 2 {
        return Err(AppError::InvalidBatchInput(format!(
            "Formato inválido: '{}'. Use algo como '1-2-CB'.",
            input
        )));
    }

    let codes: Vec<char> = parts[parts.len() - 1]
        .trim()
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let quantities = &parts[..parts.len() - 1];

    if codes.is_empty() || codes.iter().any(|c| !c.is_ascii_alphabetic()) {
        return Err(AppError::InvalidBatchInput(format!(
            "O último bloco de '{}' deve conter só as letras dos tipos de leite.",
            input
        )));
    }

    if quantities.len() != codes.len() {
        return Err(AppError::InvalidBatchInput(format!(
            "'{}' tem {} quantidade(s) para {} código(s).",
            input,
            quantities.len(),
            codes.len()
        )));
    }

    let mut entries = Vec::with_capacity(codes.len());
    for (raw, code) in quantities.iter().zip(codes) {
        let quantity: Decimal = raw.trim().parse().map_err(|_| {
            AppError::InvalidBatchInput(format!("Quantidade inválida: '{}'.", raw))
        })?;

        if quantity <= Decimal::ZERO {
            return Err(AppError::InvalidBatchInput(format!(
                "Quantidade deve ser maior que zero: '{}'.",
                raw
            )));
        }

        entries.push(BatchEntry { code, quantity });
    }

    Ok(entries)
}

#[derive(Clone)]
pub struct SaleService {
    repo: SaleRepository,
    milk_type_repo: MilkTypeRepository,
    customer_repo: CustomerRepository,
    billing: BillingService,
}

impl SaleService {
    pub fn new(
        repo: SaleRepository,
        milk_type_repo: MilkTypeRepository,
        customer_repo: CustomerRepository,
        billing: BillingService,
    ) -> Self {
        Self {
            repo,
            milk_type_repo,
            customer_repo,
            billing,
        }
    }

    pub async fn create_sale<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        customer_id: Uuid,
        milk_type_id: Uuid,
        date: NaiveDate,
        quantity: Decimal,
        rate: Option<Decimal>,
        notes: Option<&str>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.customer_repo
            .find_by_id(user_id, customer_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let milk_type = self
            .milk_type_repo
            .find_by_id(user_id, milk_type_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Sem tarifa informada, vale a tarifa vigente do tipo de leite
        let rate = rate.unwrap_or(milk_type.rate_per_liter);

        let mut tx = executor.begin().await?;

        let sale = self
            .repo
            .create(
                &mut *tx, user_id, customer_id, milk_type_id, date, quantity, rate, notes,
            )
            .await?;

        self.billing
            .recalculate_periods(&mut tx, user_id, customer_id, &[sale.period()])
            .await?;

        tx.commit().await?;

        Ok(sale)
    }

    // Recalcula o mês antigo E o novo (e os dois clientes, se a venda
    // mudou de cliente)
    pub async fn update_sale<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        sale_id: Uuid,
        customer_id: Uuid,
        milk_type_id: Uuid,
        date: NaiveDate,
        quantity: Decimal,
        rate: Decimal,
        notes: Option<&str>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let existing = self
            .repo
            .find_by_id(user_id, sale_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.customer_repo
            .find_by_id(user_id, customer_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.milk_type_repo
            .find_by_id(user_id, milk_type_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut tx = executor.begin().await?;

        let sale = self
            .repo
            .update(
                &mut *tx, user_id, sale_id, customer_id, milk_type_id, date, quantity, rate,
                notes,
            )
            .await?;

        self.billing
            .recalculate_periods(&mut tx, user_id, existing.customer_id, &[existing.period()])
            .await?;

        if sale.customer_id != existing.customer_id || sale.period() != existing.period() {
            self.billing
                .recalculate_periods(&mut tx, user_id, sale.customer_id, &[sale.period()])
                .await?;
        }

        tx.commit().await?;

        Ok(sale)
    }

    pub async fn delete_sale<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        sale_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let sale = self.repo.delete(&mut *tx, user_id, sale_id).await?;

        self.billing
            .recalculate_periods(&mut tx, user_id, sale.customer_id, &[sale.period()])
            .await?;

        tx.commit().await?;

        Ok(())
    }

    // Entrega do dia na notação curta: N vendas de uma vez, um recálculo só
    pub async fn create_batch<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        customer_id: Uuid,
        date: NaiveDate,
        input: &str,
    ) -> Result<Vec<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let entries = parse_batch_input(input)?;

        self.customer_repo
            .find_by_id(user_id, customer_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Código = primeira letra do nome do tipo de leite
        let milk_types = self.milk_type_repo.list(user_id).await?;
        let resolve = |code: char| {
            milk_types.iter().find(|mt| {
                mt.name
                    .chars()
                    .next()
                    .map(|c| c.to_ascii_uppercase() == code)
                    .unwrap_or(false)
            })
        };

        let mut tx = executor.begin().await?;

        let mut sales = Vec::with_capacity(entries.len());
        for entry in &entries {
            let milk_type = resolve(entry.code).ok_or_else(|| {
                AppError::InvalidBatchInput(format!(
                    "Nenhum tipo de leite com o código '{}'.",
                    entry.code
                ))
            })?;

            let sale = self
                .repo
                .create(
                    &mut *tx,
                    user_id,
                    customer_id,
                    milk_type.id,
                    date,
                    entry.quantity,
                    milk_type.rate_per_liter,
                    None,
                )
                .await?;
            sales.push(sale);
        }

        if let Some(first) = sales.first() {
            self.billing
                .recalculate_periods(&mut tx, user_id, customer_id, &[first.period()])
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "🥛 Entrega em lote registrada: cliente {} | {} venda(s)",
            customer_id,
            sales.len()
        );

        Ok(sales)
    }

    pub async fn find_by_id(&self, user_id: Uuid, sale_id: Uuid) -> Result<Sale, AppError> {
        self.repo
            .find_by_id(user_id, sale_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        customer_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Sale>, AppError> {
        self.repo.list(user_id, customer_id, from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn parses_two_quantities_and_two_codes() {
        let entries = parse_batch_input("1-2-CB").unwrap();
        assert_eq!(
            entries,
            vec![
                BatchEntry { code: 'C', quantity: dec("1") },
                BatchEntry { code: 'B', quantity: dec("2") },
            ]
        );
    }

    #[test]
    fn parses_fractional_quantities_and_lowercase_codes() {
        let entries = parse_batch_input("0.5-1.25-ib").unwrap();
        assert_eq!(entries[0].code, 'I');
        assert_eq!(entries[0].quantity, dec("0.5"));
        assert_eq!(entries[1].code, 'B');
        assert_eq!(entries[1].quantity, dec("1.25"));
    }

    #[test]
    fn rejects_mismatched_counts() {
        // Duas quantidades para um código só
        assert!(matches!(
            parse_batch_input("1-2-B"),
            Err(AppError::InvalidBatchInput(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_quantity() {
        assert!(matches!(
            parse_batch_input("x-B"),
            Err(AppError::InvalidBatchInput(_))
        ));
    }

    #[test]
    fn rejects_zero_or_negative_quantity() {
        assert!(matches!(
            parse_batch_input("0-B"),
            Err(AppError::InvalidBatchInput(_))
        ));
    }

    #[test]
    fn rejects_input_without_code_block() {
        assert!(matches!(
            parse_batch_input("1"),
            Err(AppError::InvalidBatchInput(_))
        ));
        assert!(matches!(
            parse_batch_input("1-2"),
            Err(AppError::InvalidBatchInput(_))
        ));
    }
}
