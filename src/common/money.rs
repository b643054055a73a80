// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};

/// Casas decimais de todos os valores monetários (NUMERIC(10, 2) no banco).
pub const CURRENCY_SCALE: u32 = 2;

/// Maior valor que cabe em NUMERIC(10, 2): 99.999.999,99.
// 9_999_999_999 = 0x2_540B_E3FF (Decimal::new não é const).
pub const MAX_CURRENCY_AMOUNT: Decimal = Decimal::from_parts(0x540B_E3FF, 0x2, 0, false, CURRENCY_SCALE);

pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formata um valor no padrão indiano (en-IN), sempre com duas casas.
/// Ex: 150000 -> "1,50,000.00"
pub fn format_amount(value: Decimal) -> String {
    let rounded = round_currency(value);
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, group_indian(integer), fraction)
}

// Últimos 3 dígitos juntos, o resto em grupos de 2 (lakh / crore).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
