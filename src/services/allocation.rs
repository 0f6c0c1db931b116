// src/services/allocation.rs
//
// Motor de alocação multi-mês: distribui o valor de um pagamento entre os
// meses em aberto do cliente, sempre do mês mais antigo para o mais novo.
// É uma função pura — quem busca os valores em aberto e persiste o
// resultado é o BillingService, dentro da transação do pagamento.

use rust_decimal::Decimal;

use crate::models::billing::{PeriodAllocation, PeriodOutstanding};

/// Distribui `amount` entre os períodos informados, do mais antigo para o
/// mais novo, limitando cada parcela ao valor em aberto do período.
///
/// A sobra (pagamento maior que a dívida dos meses escolhidos) NÃO vira
/// troco nem alocação: fica absorvida como crédito — a soma das parcelas
/// pode ser menor que `amount`, nunca maior.
pub fn allocate(amount: Decimal, targets: &[PeriodOutstanding]) -> Vec<PeriodAllocation> {
    let mut sorted: Vec<PeriodOutstanding> = targets.to_vec();
    // Ordem cronológica é política fixa, não preferência do usuário
    sorted.sort_by_key(|t| t.period);

    let mut remaining = amount;
    let mut allocations = Vec::new();

    for target in sorted {
        if remaining <= Decimal::ZERO {
            break;
        }

        // Mês já quitado (ou com crédito) não recebe nada
        if target.outstanding <= Decimal::ZERO {
            continue;
        }

        let allocated = remaining.min(target.outstanding);
        if allocated > Decimal::ZERO {
            allocations.push(PeriodAllocation {
                period: target.period,
                amount: allocated,
            });
            remaining -= allocated;
        }
    }

    allocations
}

/// Soma das parcelas geradas — o que de fato foi aplicado nos meses.
pub fn allocated_total(allocations: &[PeriodAllocation]) -> Decimal {
    allocations.iter().map(|a| a.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::billing::Period;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn owing(year: i32, month: i32, outstanding: &str) -> PeriodOutstanding {
        PeriodOutstanding {
            period: Period::new(year, month),
            outstanding: dec(outstanding),
        }
    }

    #[test]
    fn covers_oldest_month_first() {
        // 1000 contra dois meses devendo 700 cada: o mais antigo é quitado,
        // o seguinte recebe o resto.
        let result = allocate(
            dec("1000.00"),
            &[owing(2025, 2, "700.00"), owing(2025, 1, "700.00")],
        );

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].period, Period::new(2025, 1));
        assert_eq!(result[0].amount, dec("700.00"));
        assert_eq!(result[1].period, Period::new(2025, 2));
        assert_eq!(result[1].amount, dec("300.00"));
        assert_eq!(allocated_total(&result), dec("1000.00"));
    }

    #[test]
    fn overpayment_is_absorbed_not_allocated() {
        // 1000 contra 300+300: aloca 600, os 400 restantes ficam como
        // crédito do cliente — nenhuma parcela extra é criada.
        let result = allocate(
            dec("1000.00"),
            &[owing(2025, 1, "300.00"), owing(2025, 2, "300.00")],
        );

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].amount, dec("300.00"));
        assert_eq!(result[1].amount, dec("300.00"));
        assert_eq!(allocated_total(&result), dec("600.00"));
    }

    #[test]
    fn total_is_min_of_amount_and_total_owed() {
        let targets = [
            owing(2024, 11, "120.00"),
            owing(2024, 12, "80.00"),
            owing(2025, 1, "200.00"),
        ];

        // Pagamento menor que a dívida total
        let partial = allocate(dec("150.00"), &targets);
        assert_eq!(allocated_total(&partial), dec("150.00"));

        // Pagamento maior que a dívida total
        let full = allocate(dec("999.00"), &targets);
        assert_eq!(allocated_total(&full), dec("400.00"));
    }

    #[test]
    fn never_allocates_to_newer_month_before_older_is_covered() {
        let result = allocate(
            dec("100.00"),
            &[owing(2025, 3, "500.00"), owing(2025, 1, "500.00")],
        );

        // Só o mês mais antigo recebe; março fica intocado
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].period, Period::new(2025, 1));
        assert_eq!(result[0].amount, dec("100.00"));
    }

    #[test]
    fn skips_months_already_settled() {
        let result = allocate(
            dec("100.00"),
            &[
                owing(2025, 1, "0.00"),
                owing(2025, 2, "-50.00"),
                owing(2025, 3, "80.00"),
            ],
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].period, Period::new(2025, 3));
        assert_eq!(result[0].amount, dec("80.00"));
    }

    #[test]
    fn empty_targets_yield_empty_allocation() {
        let result = allocate(dec("500.00"), &[]);
        assert!(result.is_empty());
        assert_eq!(allocated_total(&result), Decimal::ZERO);
    }

    #[test]
    fn is_deterministic_for_same_inputs() {
        // Reprocessar a mesma entrada (edição com os mesmos dados) tem que
        // gerar exatamente o mesmo conjunto de parcelas.
        let targets = [
            owing(2025, 2, "300.00"),
            owing(2025, 1, "250.00"),
            owing(2025, 4, "120.00"),
        ];

        let first = allocate(dec("500.00"), &targets);
        let second = allocate(dec("500.00"), &targets);
        assert_eq!(first, second);
    }

    #[test]
    fn stops_exactly_at_zero_remaining() {
        let result = allocate(
            dec("300.00"),
            &[
                owing(2025, 1, "100.00"),
                owing(2025, 2, "200.00"),
                owing(2025, 3, "400.00"),
            ],
        );

        // O terceiro mês não aparece: o valor acabou no segundo
        assert_eq!(result.len(), 2);
        assert_eq!(allocated_total(&result), dec("300.00"));
    }
}
