use crate::domain::model::{LoanPeriod, LoanQuote, LoanQuoteInput};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const MONTHS_PER_YEAR: u32 = 12;

/// 單利還款試算：
///
/// ```text
/// interest         = P × (R / 100) × (months / 12)
/// total_amount     = P + interest
/// periodic_payment = round(total_amount / months)
/// ```
///
/// 月數以分數 (20 天 = 20/30) 參與運算，先乘後除，避免 1/12 之類的循環小數造成 .5 邊界誤差。
/// 中間乘積溢位時改為先除後乘；只有最終金額超出 `Decimal` 範圍才回傳 `None`。
pub fn quote(input: &LoanQuoteInput) -> Option<LoanQuote> {
    let (numerator, denominator) = input.period().month_fraction();
    let numerator = Decimal::from(numerator);
    let denominator = Decimal::from(denominator);
    let principal = input.principal();
    let rate = input.annual_rate_percent();
    let scale = Decimal::ONE_HUNDRED * Decimal::from(MONTHS_PER_YEAR) * denominator;

    let interest = principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(numerator))
        .and_then(|v| v.checked_div(scale))
        .or_else(|| principal.checked_mul(rate.checked_mul(numerator)?.checked_div(scale)?))?;
    let total_amount = principal.checked_add(interest)?;
    let payment = total_amount
        .checked_mul(denominator)
        .and_then(|v| v.checked_div(numerator))
        .or_else(|| total_amount.checked_div(numerator)?.checked_mul(denominator))?;

    Some(LoanQuote {
        months: input.period().months(),
        interest,
        total_amount,
        periodic_payment: round_to_units(payment),
    })
}

/// 直接吃表單的原始值。金額缺漏、非數字、<= 0 或沒選期間時回傳 `None`，畫面就不顯示還款金額
pub fn quote_from_form(
    amount: Option<&str>,
    period: Option<&str>,
    annual_rate_percent: Decimal,
) -> Option<LoanQuote> {
    let principal = parse_amount(amount?)?;
    let period = period?.parse::<LoanPeriod>().ok()?;
    let input = LoanQuoteInput::new(principal, period, annual_rate_percent)?;
    quote(&input)
}

/// 解析表單金額，接受一般小數與科學記號 (number input 允許 `1e3`)
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// 四捨五入到整數 (.5 遠離零)
pub fn round_to_units(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// 以千分位顯示整數金額，例如 12677 -> "12,677"
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_to_units(amount);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
