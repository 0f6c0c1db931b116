// src/services/billing_service.rs
//
// Orquestra o ciclo de vida dos pagamentos (criar/editar/excluir) e o
// recálculo dos saldos mensais. Toda mutação roda em UMA transação:
// apagar alocações, regravar alocações e recalcular os meses afetados —
// ou tudo entra, ou nada entra.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BalanceRepository, CustomerRepository, PaymentRepository},
    models::billing::{
        BalanceStatus, MonthlyBalance, Payment, PaymentAllocation, PaymentDetail, Period,
        PeriodOutstanding,
    },
    services::allocation::{allocate, allocated_total},
};

// Alvo de um pagamento como variante explícita: ou mês único, ou
// distribuído. O "ambos nulos / ambos preenchidos" vira garantia de tipo
// aqui e CHECK no banco.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentTarget {
    SingleMonth { period: Period },
    Distributed { periods: Vec<Period> },
}

impl PaymentTarget {
    // Traduz os campos crus do payload (mês/ano soltos OU lista de meses)
    // para a variante. Qualquer mistura é rejeitada antes de tocar o banco.
    pub fn resolve(
        month: Option<i32>,
        year: Option<i32>,
        target_months: Option<Vec<Period>>,
    ) -> Result<Self, AppError> {
        let target = match (month, year, target_months) {
            (Some(month), Some(year), None) => PaymentTarget::SingleMonth {
                period: Period { year, month },
            },
            (None, None, Some(periods)) => PaymentTarget::Distributed { periods },
            // Sem alvo nenhum: pagamento registrado sem aplicação (fica
            // como crédito até ser editado)
            (None, None, None) => PaymentTarget::Distributed { periods: vec![] },
            _ => return Err(AppError::InvalidPaymentTarget),
        };

        // Valida os meses antes que o CHECK do banco reclame
        match &target {
            PaymentTarget::SingleMonth { period } => {
                if !period.is_valid() {
                    return Err(AppError::InvalidMonth(period.month));
                }
            }
            PaymentTarget::Distributed { periods } => {
                if let Some(p) = periods.iter().find(|p| !p.is_valid()) {
                    return Err(AppError::InvalidMonth(p.month));
                }
            }
        }

        Ok(target)
    }
}

// União ordenada e sem repetição dos meses afetados antes/depois de uma
// edição — todos precisam de recálculo.
fn union_periods(old: &[Period], new: &[Period]) -> Vec<Period> {
    let mut all: Vec<Period> = old.iter().chain(new.iter()).copied().collect();
    all.sort();
    all.dedup();
    all
}

#[derive(Clone)]
pub struct BillingService {
    payment_repo: PaymentRepository,
    balance_repo: BalanceRepository,
    customer_repo: CustomerRepository,
}

impl BillingService {
    pub fn new(
        payment_repo: PaymentRepository,
        balance_repo: BalanceRepository,
        customer_repo: CustomerRepository,
    ) -> Self {
        Self {
            payment_repo,
            balance_repo,
            customer_repo,
        }
    }

    // =========================================================================
    //  RECÁLCULO DOS SALDOS MENSAIS
    // =========================================================================

    /// Recalcula o cache de cada período SEMPRE a partir das linhas-fonte
    /// (vendas + pagamentos diretos + alocações) — nunca um delta. Roda
    /// dentro da transação de quem chamou.
    pub async fn recalculate_periods(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        customer_id: Uuid,
        periods: &[Period],
    ) -> Result<Vec<MonthlyBalance>, AppError> {
        let mut updated = Vec::with_capacity(periods.len());

        for period in periods {
            let totals = self
                .balance_repo
                .period_totals(&mut *conn, customer_id, *period)
                .await?;

            let payments_total = totals.payments_total();
            let balance = totals.sales_total - payments_total;
            let status = BalanceStatus::classify(totals.sales_total, balance);

            let row = self
                .balance_repo
                .upsert(
                    &mut *conn,
                    user_id,
                    customer_id,
                    *period,
                    totals.sales_total,
                    payments_total,
                    balance,
                    status,
                )
                .await?;

            updated.push(row);
        }

        Ok(updated)
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    pub async fn create_payment<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        customer_id: Uuid,
        date: NaiveDate,
        amount: Decimal,
        description: Option<&str>,
        target: PaymentTarget,
    ) -> Result<PaymentDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // O cliente precisa existir e ser desta conta
        self.ensure_customer(&mut tx, user_id, customer_id).await?;

        let (payment, allocations) = match target {
            PaymentTarget::SingleMonth { period } => {
                let payment = self
                    .payment_repo
                    .create(
                        &mut *tx,
                        user_id,
                        customer_id,
                        date,
                        amount,
                        description,
                        Some(period),
                    )
                    .await?;

                self.recalculate_periods(&mut tx, user_id, customer_id, &[period])
                    .await?;

                (payment, vec![])
            }
            PaymentTarget::Distributed { periods } => {
                let payment = self
                    .payment_repo
                    .create(&mut *tx, user_id, customer_id, date, amount, description, None)
                    .await?;

                let allocations = self
                    .distribute(&mut tx, user_id, &payment, &periods)
                    .await?;

                let affected: Vec<Period> = allocations.iter().map(|a| a.period()).collect();
                self.recalculate_periods(&mut tx, user_id, customer_id, &affected)
                    .await?;

                (payment, allocations)
            }
        };

        tx.commit().await?;

        tracing::info!(
            "💰 Pagamento criado: cliente {} | valor {} | {} parcela(s)",
            customer_id,
            amount,
            allocations.len()
        );

        Ok(Self::detail(payment, allocations))
    }

    // Edição = máquina de estados entre mês-único e distribuído. As
    // alocações antigas saem TODAS e o motor roda de novo (apagar-e-recriar),
    // e os meses afetados antes E depois são recalculados.
    pub async fn update_payment<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        payment_id: Uuid,
        date: NaiveDate,
        amount: Decimal,
        description: Option<&str>,
        target: PaymentTarget,
    ) -> Result<PaymentDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // Tranca a linha: edições concorrentes do mesmo pagamento serializam aqui
        let existing = self
            .payment_repo
            .lock_by_id(&mut *tx, user_id, payment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Meses cobertos ANTES da mudança
        let old_periods: Vec<Period> = if let Some(period) = existing.single_period() {
            vec![period]
        } else {
            self.payment_repo
                .list_allocations(&mut *tx, payment_id)
                .await?
                .iter()
                .map(|a| a.period())
                .collect()
        };

        // Estado antigo fora, qualquer que seja a transição
        self.payment_repo
            .delete_allocations(&mut *tx, payment_id)
            .await?;

        let (payment, allocations) = match target {
            PaymentTarget::SingleMonth { period } => {
                let payment = self
                    .payment_repo
                    .update(
                        &mut *tx,
                        user_id,
                        payment_id,
                        date,
                        amount,
                        description,
                        Some(period),
                    )
                    .await?;

                (payment, vec![])
            }
            PaymentTarget::Distributed { periods } => {
                // Alvo limpo ANTES de medir os valores em aberto, para que as
                // somas já não contem este pagamento
                let payment = self
                    .payment_repo
                    .update(&mut *tx, user_id, payment_id, date, amount, description, None)
                    .await?;

                let allocations = self
                    .distribute(&mut tx, user_id, &payment, &periods)
                    .await?;

                (payment, allocations)
            }
        };

        let new_periods: Vec<Period> = if let Some(period) = payment.single_period() {
            vec![period]
        } else {
            allocations.iter().map(|a| a.period()).collect()
        };

        let affected = union_periods(&old_periods, &new_periods);
        self.recalculate_periods(&mut tx, user_id, existing.customer_id, &affected)
            .await?;

        tx.commit().await?;

        Ok(Self::detail(payment, allocations))
    }

    pub async fn delete_payment<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        payment_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let existing = self
            .payment_repo
            .lock_by_id(&mut *tx, user_id, payment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let affected: Vec<Period> = if let Some(period) = existing.single_period() {
            vec![period]
        } else {
            self.payment_repo
                .list_allocations(&mut *tx, payment_id)
                .await?
                .iter()
                .map(|a| a.period())
                .collect()
        };

        // As alocações caem em cascata junto com o pagamento
        self.payment_repo.delete(&mut *tx, user_id, payment_id).await?;

        self.recalculate_periods(&mut tx, user_id, existing.customer_id, &affected)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn payment_detail<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        payment_id: Uuid,
    ) -> Result<PaymentDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let payment = self
            .payment_repo
            .find_by_id(user_id, payment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let allocations = self
            .payment_repo
            .list_allocations(&mut *tx, payment_id)
            .await?;

        tx.commit().await?;

        Ok(Self::detail(payment, allocations))
    }

    pub async fn list_payments(
        &self,
        user_id: Uuid,
        customer_id: Option<Uuid>,
    ) -> Result<Vec<Payment>, AppError> {
        self.payment_repo.list(user_id, customer_id).await
    }

    // =========================================================================
    //  CONSULTAS DE SALDO
    // =========================================================================

    // Meses com valor em aberto, do mais antigo para o mais novo — alimenta
    // o formulário de distribuição.
    pub async fn unpaid_months<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<PeriodOutstanding>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.ensure_customer(&mut tx, user_id, customer_id).await?;

        let periods = self
            .balance_repo
            .known_periods(&mut *tx, customer_id)
            .await?;

        let mut unpaid = Vec::new();
        for period in periods {
            let totals = self
                .balance_repo
                .period_totals(&mut *tx, customer_id, period)
                .await?;

            let outstanding = totals.sales_total - totals.payments_total();
            if outstanding > Decimal::ZERO {
                unpaid.push(PeriodOutstanding {
                    period,
                    outstanding,
                });
            }
        }

        tx.commit().await?;

        Ok(unpaid)
    }

    // Badges da tela do cliente: leitura direta do cache
    pub async fn month_statuses(
        &self,
        user_id: Uuid,
        customer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MonthlyBalance>, AppError> {
        self.customer_repo
            .find_by_id(user_id, customer_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.balance_repo.list_for_customer(customer_id, limit).await
    }

    // Reconstrói o cache inteiro do cliente a partir das linhas-fonte
    pub async fn rebuild_balances<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<MonthlyBalance>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.ensure_customer(&mut tx, user_id, customer_id).await?;

        let periods = self
            .balance_repo
            .known_periods(&mut *tx, customer_id)
            .await?;

        let updated = self
            .recalculate_periods(&mut tx, user_id, customer_id, &periods)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🔄 Saldos reconstruídos: cliente {} | {} mes(es)",
            customer_id,
            updated.len()
        );

        Ok(updated)
    }

    // =========================================================================
    //  INTERNOS
    // =========================================================================

    // Mede os valores em aberto dos meses escolhidos e roda o motor de
    // alocação; grava uma linha por parcela positiva.
    async fn distribute(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        payment: &Payment,
        periods: &[Period],
    ) -> Result<Vec<PaymentAllocation>, AppError> {
        // Meses repetidos no payload contam uma vez só
        let mut unique: Vec<Period> = periods.to_vec();
        unique.sort();
        unique.dedup();

        let mut targets = Vec::with_capacity(unique.len());
        for period in unique {
            let totals = self
                .balance_repo
                .period_totals(&mut *conn, payment.customer_id, period)
                .await?;

            targets.push(PeriodOutstanding {
                period,
                outstanding: totals.sales_total - totals.payments_total(),
            });
        }

        let plan = allocate(payment.amount, &targets);

        tracing::debug!(
            "Distribuição do pagamento {}: {} de {} aplicados em {} mes(es)",
            payment.id,
            allocated_total(&plan),
            payment.amount,
            plan.len()
        );

        let mut allocations = Vec::with_capacity(plan.len());
        for entry in &plan {
            let allocation = self
                .payment_repo
                .insert_allocation(&mut *conn, user_id, payment.id, entry.period, entry.amount)
                .await?;
            allocations.push(allocation);
        }

        Ok(allocations)
    }

    async fn ensure_customer(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        customer_id: Uuid,
    ) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE user_id = $1 AND id = $2)",
        )
        .bind(user_id)
        .bind(customer_id)
        .fetch_one(conn)
        .await?;

        if !exists {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn detail(
        payment: Payment,
        allocations: Vec<PaymentAllocation>,
    ) -> PaymentDetail {
        let applied: Decimal = allocations.iter().map(|a| a.amount).sum();
        // Em pagamento de mês único nada fica "sem aplicação": o mês alvo
        // absorve o valor inteiro (inclusive sobras).
        let unallocated = if payment.is_distributed() {
            payment.amount - applied
        } else {
            Decimal::ZERO
        };

        PaymentDetail {
            payment,
            allocations,
            unallocated_amount: unallocated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_single_month_target() {
        let target = PaymentTarget::resolve(Some(3), Some(2025), None).unwrap();
        assert_eq!(
            target,
            PaymentTarget::SingleMonth {
                period: Period::new(2025, 3)
            }
        );
    }

    #[test]
    fn resolve_distributed_target() {
        let months = vec![Period::new(2025, 1), Period::new(2025, 2)];
        let target = PaymentTarget::resolve(None, None, Some(months.clone())).unwrap();
        assert_eq!(target, PaymentTarget::Distributed { periods: months });
    }

    #[test]
    fn resolve_without_any_target_is_unapplied_distribution() {
        let target = PaymentTarget::resolve(None, None, None).unwrap();
        assert_eq!(target, PaymentTarget::Distributed { periods: vec![] });
    }

    #[test]
    fn resolve_rejects_half_filled_single_target() {
        assert!(matches!(
            PaymentTarget::resolve(Some(3), None, None),
            Err(AppError::InvalidPaymentTarget)
        ));
        assert!(matches!(
            PaymentTarget::resolve(None, Some(2025), None),
            Err(AppError::InvalidPaymentTarget)
        ));
    }

    #[test]
    fn resolve_rejects_mixed_single_and_distributed() {
        assert!(matches!(
            PaymentTarget::resolve(Some(3), Some(2025), Some(vec![Period::new(2025, 1)])),
            Err(AppError::InvalidPaymentTarget)
        ));
    }

    #[test]
    fn resolve_rejects_out_of_range_month() {
        assert!(matches!(
            PaymentTarget::resolve(Some(13), Some(2025), None),
            Err(AppError::InvalidMonth(13))
        ));
        assert!(matches!(
            PaymentTarget::resolve(None, None, Some(vec![Period::new(2025, 0)])),
            Err(AppError::InvalidMonth(0))
        ));
    }

    #[test]
    fn union_of_old_and_new_periods_dedups_and_sorts() {
        let old = [Period::new(2025, 3), Period::new(2025, 1)];
        let new = [Period::new(2025, 1), Period::new(2025, 2)];

        let union = union_periods(&old, &new);
        assert_eq!(
            union,
            vec![
                Period::new(2025, 1),
                Period::new(2025, 2),
                Period::new(2025, 3)
            ]
        );
    }
}
