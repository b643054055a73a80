// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "en";

// Catálogo de mensagens por idioma. Os placeholders usam o formato {nome}.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("en", EN.iter().copied().collect());
        catalogs.insert("pt", PT.iter().copied().collect());
        Self { catalogs }
    }

    /// Resolve a chave no idioma pedido, caindo para o inglês.
    /// Se a chave não existir em nenhum catálogo, devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = match self
            .lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
        {
            Some(template) => template,
            None => key,
        };

        args.iter().fold(template.to_string(), |message, (name, value)| {
            message.replace(&format!("{{{}}}", name), value)
        })
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&'static str> {
        self.catalogs.get(lang).and_then(|catalog| catalog.get(key)).copied()
    }
}

const EN: &[(&str, &str)] = &[
    // --- Pagamentos ---
    ("payment.applied", "Payment of ₹{amount} applied. Remaining EMI for current month: ₹{remaining}"),
    ("payment.month_completed", "Payment of ₹{amount} completed current month. Remaining tenure: {tenure} months. Next EMI due: ₹{next_emi}"),
    ("payment.final_month_completed", "Payment of ₹{amount} completed current month. Loan fully paid off!"),
    ("payment.paid_off", "Payment of ₹{amount} completed {months} month(s). Loan fully paid off!"),
    ("payment.credit", "Payment of ₹{amount} completed {months} month(s). Excess amount: ₹{excess}. Remaining tenure: {tenure} months. Next EMI due: ₹{next_emi}"),
    ("payment.rolled_forward", "Payment of ₹{amount} completed {months} month(s). Remaining tenure: {tenure} months. Remaining EMI for next month: ₹{remaining}"),
    // --- Erros ---
    ("error.validation", "One or more fields are invalid."),
    ("error.malformed_payload", "The request body is invalid: {reason}"),
    ("error.invalid_payment_amount", "Payment amount must be a positive number"),
    ("error.payment_amount_too_large", "Payment amount cannot exceed ₹{max}"),
    ("error.account_not_found", "Customer not found with the provided account number"),
    ("error.loan_already_settled", "Loan is already fully paid off"),
    ("error.concurrent_payment", "The account was updated by another payment. Please try again."),
    ("error.internal", "An unexpected error occurred while processing the request"),
    // --- Validação de campos ---
    ("validation.account_number_required", "Account number is required"),
    ("validation.payment_amount_required", "Payment amount is required"),
];

const PT: &[(&str, &str)] = &[
    ("payment.applied", "Pagamento de ₹{amount} aplicado. Parcela restante do mês atual: ₹{remaining}"),
    ("payment.month_completed", "Pagamento de ₹{amount} quitou o mês atual. Prazo restante: {tenure} meses. Próxima parcela: ₹{next_emi}"),
    ("payment.final_month_completed", "Pagamento de ₹{amount} quitou o mês atual. Empréstimo totalmente quitado!"),
    ("payment.paid_off", "Pagamento de ₹{amount} quitou {months} mês(es). Empréstimo totalmente quitado!"),
    ("payment.credit", "Pagamento de ₹{amount} quitou {months} mês(es). Valor excedente: ₹{excess}. Prazo restante: {tenure} meses. Próxima parcela: ₹{next_emi}"),
    ("payment.rolled_forward", "Pagamento de ₹{amount} quitou {months} mês(es). Prazo restante: {tenure} meses. Parcela restante do próximo mês: ₹{remaining}"),
    ("error.validation", "Um ou mais campos são inválidos."),
    ("error.malformed_payload", "O corpo da requisição é inválido: {reason}"),
    ("error.invalid_payment_amount", "O valor do pagamento deve ser um número positivo"),
    ("error.payment_amount_too_large", "O valor do pagamento não pode passar de ₹{max}"),
    ("error.account_not_found", "Cliente não encontrado para o número de conta informado"),
    ("error.loan_already_settled", "O empréstimo já está totalmente quitado"),
    ("error.concurrent_payment", "A conta foi alterada por outro pagamento. Tente novamente."),
    ("error.internal", "Ocorreu um erro inesperado ao processar a requisição"),
    ("validation.account_number_required", "O número da conta é obrigatório"),
    ("validation.payment_amount_required", "O valor do pagamento é obrigatório"),
];
