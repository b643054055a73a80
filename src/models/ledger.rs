// src/models/ledger.rs

use rust_decimal::Decimal;

/// O que ainda é devido no mês pendente.
///
/// No banco isso é um `remaining_emi` anulável onde NULL e 0 significam
/// "mês intocado". Aqui o sentinela vira um valor explícito.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentObligation {
    /// Mês intocado: a parcela cheia (emi_due) é devida.
    Full(Decimal),
    /// Mês parcialmente pago. Sempre 0 < valor < emi_due.
    Partial(Decimal),
}

impl CurrentObligation {
    pub fn amount(&self) -> Decimal {
        match self {
            CurrentObligation::Full(amount) | CurrentObligation::Partial(amount) => *amount,
        }
    }
}

/// Estado do empréstimo que o motor de pagamentos lê e reescreve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ledger {
    pub emi_due: Decimal,
    pub obligation: CurrentObligation,
    /// Meses restantes. 0 = empréstimo quitado.
    pub tenure: u32,
}

impl Ledger {
    /// Converte o formato armazenado (anulável, com sentinela) no estado do domínio.
    /// Valores fora de (0, emi_due) contam como mês intocado.
    pub fn from_stored(emi_due: Decimal, remaining_emi: Option<Decimal>, tenure: i32) -> Self {
        let obligation = match remaining_emi {
            Some(remaining) if remaining > Decimal::ZERO && remaining < emi_due => {
                CurrentObligation::Partial(remaining)
            }
            _ => CurrentObligation::Full(emi_due),
        };

        Self {
            emi_due,
            obligation,
            tenure: u32::try_from(tenure).unwrap_or(0),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.tenure == 0
    }

    /// A obrigação efetiva do mês pendente (nunca o sentinela).
    pub fn current_obligation(&self) -> Decimal {
        self.obligation.amount()
    }

    /// Valor gravado em `customers.remaining_emi`. Empréstimo quitado grava 0.
    pub fn stored_remaining_emi(&self) -> Decimal {
        if self.is_settled() {
            Decimal::ZERO
        } else {
            self.obligation.amount()
        }
    }

    pub fn stored_tenure(&self) -> i32 {
        i32::try_from(self.tenure).unwrap_or(i32::MAX)
    }

    pub fn next_emi_due(&self) -> Decimal {
        self.stored_remaining_emi()
    }
}
