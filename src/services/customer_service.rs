// src/services/customer_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, MilkTypeRepository, PaymentRepository, SaleRepository},
    models::{
        customer::{Customer, CustomerDetail, CustomerSummary},
        reports::CustomerBalanceEntry,
    },
};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
    milk_type_repo: MilkTypeRepository,
    sale_repo: SaleRepository,
    payment_repo: PaymentRepository,
}

impl CustomerService {
    pub fn new(
        repo: CustomerRepository,
        milk_type_repo: MilkTypeRepository,
        sale_repo: SaleRepository,
        payment_repo: PaymentRepository,
    ) -> Self {
        Self {
            repo,
            milk_type_repo,
            sale_repo,
            payment_repo,
        }
    }

    // Cliente + assinaturas na mesma transação
    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        area_id: Option<Uuid>,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
        milk_type_ids: &[Uuid],
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let customer = self
            .repo
            .create(&mut *tx, user_id, area_id, name, address, phone)
            .await?;

        self.repo
            .add_milk_types(&mut *tx, customer.id, milk_type_ids)
            .await?;

        tx.commit().await?;

        Ok(customer)
    }

    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        area_id: Option<Uuid>,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
        milk_type_ids: &[Uuid],
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let customer = self
            .repo
            .update(&mut *tx, user_id, id, area_id, name, address, phone)
            .await?;

        // Assinaturas trocadas por inteiro, sem diff
        self.repo.clear_milk_types(&mut *tx, customer.id).await?;
        self.repo
            .add_milk_types(&mut *tx, customer.id, milk_type_ids)
            .await?;

        tx.commit().await?;

        Ok(customer)
    }

    // Listagem com saldo acumulado por cliente
    pub async fn list_customers(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<CustomerSummary>, AppError> {
        let customers = self.repo.list(user_id, search).await?;
        let balances = self.repo.list_balances(user_id).await?;

        let summaries = customers
            .into_iter()
            .map(|customer| {
                let balance = balances
                    .iter()
                    .find(|b| b.customer_id == customer.id)
                    .map(|b| b.balance)
                    .unwrap_or_default();

                CustomerSummary { customer, balance }
            })
            .collect();

        Ok(summaries)
    }

    pub async fn customer_detail(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<CustomerDetail, AppError> {
        let customer = self
            .repo
            .find_by_id(user_id, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let milk_types = self.milk_type_repo.list_for_customer(id).await?;
        let balance = self.repo.lifetime_balance(id).await?;
        let recent_sales = self.sale_repo.recent_for_customer(id, 10).await?;
        let recent_payments = self.payment_repo.recent_for_customer(id, 10).await?;

        Ok(CustomerDetail {
            customer,
            milk_types,
            balance,
            recent_sales,
            recent_payments,
        })
    }

    pub async fn balance_report(&self, user_id: Uuid) -> Result<Vec<CustomerBalanceEntry>, AppError> {
        self.repo.list_balances(user_id).await
    }

    // Vendas, pagamentos e saldos do cliente caem em cascata
    pub async fn delete_customer(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(user_id, id).await
    }
}
