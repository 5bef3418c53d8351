use crate::utils::error::{LendError, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

pub const ETHER_DECIMALS: u32 = 18;

/// 將十進位金額字串轉成 18 位小數的最小單位 (同 ethers 的 parseEther)
pub fn to_wei(amount: &str) -> Result<u128> {
    let invalid = |reason: &str| LendError::InvalidAmount {
        value: amount.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(invalid("amount is empty"));
    }

    let value = Decimal::from_str(trimmed).map_err(|_| invalid("not a decimal number"))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid("amount cannot be negative"));
    }

    let value = value.normalize();
    if value.scale() > ETHER_DECIMALS {
        return Err(invalid("too many decimal places"));
    }

    let mantissa = u128::try_from(value.mantissa()).map_err(|_| invalid("amount cannot be negative"))?;
    mantissa
        .checked_mul(10u128.pow(ETHER_DECIMALS - value.scale()))
        .ok_or_else(|| invalid("amount is too large"))
}

/// `to_wei` 的反向，用於顯示
pub fn from_wei(wei: u128) -> String {
    let unit = 10u128.pow(ETHER_DECIMALS);
    let whole = wei / unit;
    let fraction = wei % unit;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:018}", fraction);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_whole_and_fractional_amounts() {
        assert_eq!(to_wei("1").unwrap(), ONE_ETHER);
        assert_eq!(to_wei("25000").unwrap(), 25_000 * ONE_ETHER);
        assert_eq!(to_wei("1.5").unwrap(), 1_500_000_000_000_000_000);
        assert_eq!(to_wei("0.000000000000000001").unwrap(), 1);
        assert_eq!(to_wei(" 2.50 ").unwrap(), 2_500_000_000_000_000_000);
        assert_eq!(to_wei("0").unwrap(), 0);
    }

    #[test]
    fn test_rejects_bad_amounts() {
        assert!(matches!(to_wei(""), Err(LendError::InvalidAmount { .. })));
        assert!(matches!(to_wei("abc"), Err(LendError::InvalidAmount { .. })));
        assert!(matches!(to_wei("-1"), Err(LendError::InvalidAmount { .. })));
        assert!(matches!(
            to_wei("0.0000000000000000001"),
            Err(LendError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = to_wei("79228162514264337593543950335").unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_from_wei() {
        assert_eq!(from_wei(15_000 * ONE_ETHER), "15000");
        assert_eq!(from_wei(1_500_000_000_000_000_000), "1.5");
        assert_eq!(from_wei(1), "0.000000000000000001");
    }
}
