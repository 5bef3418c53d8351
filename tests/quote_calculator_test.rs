use micro_lend::core::quote::{quote, quote_from_form};
use micro_lend::domain::model::{LoanPeriod, LoanQuoteInput};
use micro_lend::LendingService;
use micro_lend::{CatalogLoanBook, LendConfig, SimulatedContract};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 與原本表單 (浮點數 + Math.round) 的算法逐一比對
fn float_payment(principal: f64, period: LoanPeriod, rate: f64) -> f64 {
    let months = match period {
        LoanPeriod::TwentyDays => 20.0 / 30.0,
        LoanPeriod::OneMonth => 1.0,
        LoanPeriod::TwoMonths => 2.0,
        LoanPeriod::ThreeMonths => 3.0,
    };
    let interest = principal * (rate / 100.0) * (months / 12.0);
    (principal + interest) / months
}

#[test]
fn test_documented_examples() {
    let payment = |amount: &str, period: &str, rate: Decimal| {
        quote_from_form(Some(amount), Some(period), rate).map(|q| q.periodic_payment)
    };

    assert_eq!(payment("25000", "2months", dec!(8.5)), Some(dec!(12677)));
    assert_eq!(payment("15000", "1month", dec!(7.8)), Some(dec!(15098)));
    assert_eq!(payment("100", "20days", dec!(10)), Some(dec!(151)));
}

#[test]
fn test_matches_float_formula_across_inputs() {
    let principals = [100u32, 250, 999, 1000, 4321, 15000, 25000, 50000, 123456];
    let rates = [dec!(0), dec!(7.8), dec!(8.5), dec!(9.2), dec!(12), dec!(36)];

    for principal in principals {
        for rate in rates {
            for period in LoanPeriod::ALL {
                let input = LoanQuoteInput::new(Decimal::from(principal), period, rate).unwrap();
                let result = quote(&input).unwrap();

                let exact = float_payment(principal as f64, period, rate.to_f64().unwrap());
                // 浮點誤差剛好落在 .5 邊界時跳過
                if (exact.fract() - 0.5).abs() < 1e-6 {
                    continue;
                }
                assert_eq!(
                    result.periodic_payment.to_f64().unwrap(),
                    exact.round(),
                    "principal={} rate={} period={}",
                    principal,
                    rate,
                    period.key()
                );
            }
        }
    }
}

#[test]
fn test_payment_is_whole_units() {
    for period in LoanPeriod::ALL {
        let result = quote_from_form(Some("3333.33"), Some(period.key()), dec!(8.5)).unwrap();
        assert_eq!(result.periodic_payment, result.periodic_payment.trunc());
        assert_eq!(result.months, period.months());
    }
}

#[test]
fn test_absent_inputs_produce_no_quote() {
    for amount in [None, Some(""), Some("0"), Some("-5"), Some("ten"), Some("0.00")] {
        assert!(
            quote_from_form(amount, Some("1month"), dec!(8.5)).is_none(),
            "amount {:?} should not produce a quote",
            amount
        );
    }
    assert!(quote_from_form(Some("5000"), None, dec!(8.5)).is_none());
}

#[test]
fn test_service_uses_configured_rate() {
    let mut config = LendConfig::default();
    config.quote.annual_rate_percent = dec!(7.8);
    let contract = SimulatedContract::new(config.contract_address().unwrap(), config.contract.chain_id);
    let service = LendingService::new(CatalogLoanBook::seeded().unwrap(), contract, config);

    let result = service.quote(Some("15000"), Some("1month")).unwrap();
    assert_eq!(result.periodic_payment, dec!(15098));
    assert!(service.quote(Some("15000"), None).is_none());
}
