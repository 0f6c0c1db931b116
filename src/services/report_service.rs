// src/services/report_service.rs

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::report_repo::{MonthlyPaymentsRow, MonthlySalesRow},
    db::ReportRepository,
    models::{
        billing::Period,
        reports::{DailyReportEntry, DashboardSummary, MonthlyReportEntry},
    },
};

// Combina os agregados de vendas e de pagamentos num relatório por mês,
// do mais recente para o mais antigo. Meses que só têm pagamento também
// aparecem (com vendas zeradas).
fn merge_monthly(
    sales: Vec<MonthlySalesRow>,
    payments: Vec<MonthlyPaymentsRow>,
) -> Vec<MonthlyReportEntry> {
    let mut by_period: BTreeMap<Period, MonthlyReportEntry> = BTreeMap::new();

    for row in sales {
        let period = Period::new(row.year, row.month);
        by_period.insert(
            period,
            MonthlyReportEntry {
                year: row.year,
                month: row.month,
                total_quantity: row.total_quantity,
                total_sales: row.total_amount,
                total_payments: Decimal::ZERO,
                balance: Decimal::ZERO,
            },
        );
    }

    for row in payments {
        let period = Period::new(row.year, row.month);
        by_period
            .entry(period)
            .or_insert_with(|| MonthlyReportEntry {
                year: row.year,
                month: row.month,
                total_quantity: Decimal::ZERO,
                total_sales: Decimal::ZERO,
                total_payments: Decimal::ZERO,
                balance: Decimal::ZERO,
            })
            .total_payments += row.total_amount;
    }

    let mut entries: Vec<MonthlyReportEntry> = by_period
        .into_values()
        .map(|mut entry| {
            entry.balance = entry.total_sales - entry.total_payments;
            entry
        })
        .collect();

    entries.reverse(); // Mais recente primeiro
    entries
}

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository) -> Self {
        Self { repo }
    }

    pub async fn dashboard(&self, user_id: Uuid) -> Result<DashboardSummary, AppError> {
        let today = Utc::now().date_naive();
        let start_of_month = today.with_day(1).unwrap_or(today);

        self.repo
            .dashboard_summary(user_id, today, start_of_month)
            .await
    }

    pub async fn daily_report(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyReportEntry>, AppError> {
        self.repo.daily_report(user_id, from, to).await
    }

    pub async fn monthly_report(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MonthlyReportEntry>, AppError> {
        let sales = self.repo.monthly_sales(user_id, from, to).await?;
        let payments = self.repo.monthly_payments(user_id, from, to).await?;

        Ok(merge_monthly(sales, payments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sales_row(year: i32, month: i32, quantity: &str, amount: &str) -> MonthlySalesRow {
        MonthlySalesRow {
            year,
            month,
            total_quantity: dec(quantity),
            total_amount: dec(amount),
        }
    }

    fn payments_row(year: i32, month: i32, amount: &str) -> MonthlyPaymentsRow {
        MonthlyPaymentsRow {
            year,
            month,
            total_amount: dec(amount),
        }
    }

    #[test]
    fn merges_sales_and_payments_by_month() {
        let entries = merge_monthly(
            vec![sales_row(2025, 1, "100", "450.00"), sales_row(2025, 2, "90", "405.00")],
            vec![payments_row(2025, 1, "450.00")],
        );

        // Mais recente primeiro
        assert_eq!(entries.len(), 2);
        assert_eq!((entries[0].year, entries[0].month), (2025, 2));
        assert_eq!(entries[0].balance, dec("405.00"));
        assert_eq!((entries[1].year, entries[1].month), (2025, 1));
        assert_eq!(entries[1].total_payments, dec("450.00"));
        assert_eq!(entries[1].balance, dec("0.00"));
    }

    #[test]
    fn month_with_only_payments_still_appears() {
        let entries = merge_monthly(vec![], vec![payments_row(2024, 12, "200.00")]);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total_sales, Decimal::ZERO);
        assert_eq!(entries[0].total_payments, dec("200.00"));
        assert_eq!(entries[0].balance, dec("-200.00"));
    }

    #[test]
    fn empty_inputs_make_empty_report() {
        assert!(merge_monthly(vec![], vec![]).is_empty());
    }
}
