// src/services/payment_engine.rs

use rust_decimal::{prelude::ToPrimitive, Decimal};
use thiserror::Error;

use crate::{
    common::{i18n::I18nStore, money::format_amount},
    models::ledger::{CurrentObligation, Ledger},
};

/// Diferença máxima (exclusiva) para um pagamento contar como "exato".
/// Só vale para a fronteira do caso exato; menor/maior usam comparação exata.
pub const EXACT_PAYMENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("O valor do pagamento deve ser maior que zero")]
    InvalidPayment,

    #[error("O empréstimo já está quitado")]
    LoanAlreadySettled,
}

/// Qual ramo do algoritmo foi aplicado, com os números da mensagem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Pagamento menor que a obrigação: só abate o mês atual.
    Applied { amount: Decimal, remaining: Decimal },
    /// Pagamento exato: quita o mês atual.
    CurrentMonthSettled {
        amount: Decimal,
        remaining_tenure: u32,
        next_emi: Decimal,
    },
    /// Excedente quitou o empréstimo inteiro.
    PaidOff { amount: Decimal, months: u32 },
    /// Sobrou excedente com prazo ainda aberto.
    Credit {
        amount: Decimal,
        months: u32,
        excess: Decimal,
        remaining_tenure: u32,
        next_emi: Decimal,
    },
    /// Excedente virou pagamento parcial (ou exato) dos meses seguintes.
    RolledForward {
        amount: Decimal,
        months: u32,
        remaining_tenure: u32,
        remaining: Decimal,
    },
}

impl Outcome {
    pub fn message(&self, i18n_store: &I18nStore, lang: &str) -> String {
        match self {
            Outcome::Applied { amount, remaining } => i18n_store.translate(
                lang,
                "payment.applied",
                &[("amount", format_amount(*amount)), ("remaining", format_amount(*remaining))],
            ),
            Outcome::CurrentMonthSettled { amount, remaining_tenure: 0, .. } => i18n_store.translate(
                lang,
                "payment.final_month_completed",
                &[("amount", format_amount(*amount))],
            ),
            Outcome::CurrentMonthSettled { amount, remaining_tenure, next_emi } => i18n_store.translate(
                lang,
                "payment.month_completed",
                &[
                    ("amount", format_amount(*amount)),
                    ("tenure", remaining_tenure.to_string()),
                    ("next_emi", format_amount(*next_emi)),
                ],
            ),
            Outcome::PaidOff { amount, months } => i18n_store.translate(
                lang,
                "payment.paid_off",
                &[("amount", format_amount(*amount)), ("months", months.to_string())],
            ),
            Outcome::Credit { amount, months, excess, remaining_tenure, next_emi } => i18n_store.translate(
                lang,
                "payment.credit",
                &[
                    ("amount", format_amount(*amount)),
                    ("months", months.to_string()),
                    ("excess", format_amount(*excess)),
                    ("tenure", remaining_tenure.to_string()),
                    ("next_emi", format_amount(*next_emi)),
                ],
            ),
            Outcome::RolledForward { amount, months, remaining_tenure, remaining } => i18n_store.translate(
                lang,
                "payment.rolled_forward",
                &[
                    ("amount", format_amount(*amount)),
                    ("months", months.to_string()),
                    ("tenure", remaining_tenure.to_string()),
                    ("remaining", format_amount(*remaining)),
                ],
            ),
        }
    }
}

/// Resultado de aplicar um pagamento: o novo estado e quantos meses foram quitados.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentApplication {
    pub ledger: Ledger,
    pub months_settled: u32,
    pub outcome: Outcome,
}

impl PaymentApplication {
    pub fn remaining_emi(&self) -> Decimal {
        self.ledger.stored_remaining_emi()
    }

    pub fn tenure(&self) -> u32 {
        self.ledger.tenure
    }

    pub fn next_emi_due(&self) -> Decimal {
        self.ledger.next_emi_due()
    }
}

/// Aplica `payment_amount` ao estado atual do empréstimo. Função pura: quem
/// chama é responsável por gravar o novo `Ledger` junto com o pagamento.
pub fn apply_payment(
    ledger: &Ledger,
    payment_amount: Decimal,
) -> Result<PaymentApplication, PaymentError> {
    if payment_amount <= Decimal::ZERO {
        return Err(PaymentError::InvalidPayment);
    }
    if ledger.is_settled() {
        return Err(PaymentError::LoanAlreadySettled);
    }

    let emi_due = ledger.emi_due;
    let remaining = ledger.current_obligation();

    // 1. Pagamento menor: abate só o mês atual
    if payment_amount < remaining {
        let left = remaining - payment_amount;
        return Ok(PaymentApplication {
            ledger: Ledger {
                obligation: CurrentObligation::Partial(left),
                ..*ledger
            },
            months_settled: 0,
            outcome: Outcome::Applied {
                amount: payment_amount,
                remaining: left,
            },
        });
    }

    // Daqui pra baixo o mês atual está quitado
    let mut tenure = ledger.tenure.saturating_sub(1);
    let mut months_settled = 1;

    // 2. Pagamento exato (dentro da tolerância)
    if (payment_amount - remaining).abs() < EXACT_PAYMENT_TOLERANCE {
        let settled = Ledger {
            obligation: CurrentObligation::Full(emi_due),
            tenure,
            ..*ledger
        };
        return Ok(PaymentApplication {
            ledger: settled,
            months_settled,
            outcome: Outcome::CurrentMonthSettled {
                amount: payment_amount,
                remaining_tenure: tenure,
                next_emi: settled.next_emi_due(),
            },
        });
    }

    // 3. Pagamento maior: o excedente rola para os próximos meses
    let mut excess = payment_amount - remaining;
    let mut obligation = CurrentObligation::Full(emi_due);

    // Meses inteiros cobertos pelo excedente, limitados ao prazo restante
    let whole_months = excess
        .checked_div(emi_due)
        .and_then(|months| months.trunc().to_u32())
        .unwrap_or(u32::MAX)
        .min(tenure);
    excess -= emi_due * Decimal::from(whole_months);
    tenure -= whole_months;
    months_settled += whole_months;

    // O que sobrar (< emi_due) abate parte do próximo mês
    if excess > Decimal::ZERO && tenure > 0 {
        obligation = CurrentObligation::Partial(emi_due - excess);
        excess = Decimal::ZERO;
    }

    let new_ledger = Ledger {
        obligation,
        tenure,
        ..*ledger
    };

    let outcome = if tenure == 0 {
        Outcome::PaidOff {
            amount: payment_amount,
            months: months_settled,
        }
    } else if excess > Decimal::ZERO {
        // Inalcançável: com prazo aberto o resto vira Partial acima. Fica como crédito.
        Outcome::Credit {
            amount: payment_amount,
            months: months_settled,
            excess,
            remaining_tenure: tenure,
            next_emi: emi_due,
        }
    } else {
        Outcome::RolledForward {
            amount: payment_amount,
            months: months_settled,
            remaining_tenure: tenure,
            remaining: obligation.amount(),
        }
    };

    Ok(PaymentApplication {
        ledger: new_ledger,
        months_settled,
        outcome,
    })
}
