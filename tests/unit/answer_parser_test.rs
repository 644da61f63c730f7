// Property tests for free-text answer parsing

use atlas_ledger::modules::assistant::services::{
    parse_closing_trigger, parse_number, parse_yes_no, TriggerMatch,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// `1234567` reais written as `1.234.567`
fn with_group_separators(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[test]
fn test_currency_answers() {
    assert_eq!(parse_number("R$ 5.000,00"), Some(Decimal::from(5000)));
    assert_eq!(parse_number("R$5.000"), Some(Decimal::from(5000)));
    assert_eq!(parse_number("nada"), None);
}

#[test]
fn test_trigger_is_case_insensitive() {
    for text in ["FECHAMENTO CVT 2 2025", "Fechamento cvf 12 2030", "CLOSING Cvt 01 2000"] {
        assert!(
            matches!(parse_closing_trigger(text), TriggerMatch::Trigger(_)),
            "{} should start a closing",
            text
        );
    }
}

proptest! {
    /// Brazilian formatted amounts parse back to their value
    #[test]
    fn prop_brazilian_amounts_round_trip(whole in 0u64..10_000_000u64, centavos in 0u32..100u32) {
        let text = format!("R$ {},{:02}", with_group_separators(whole), centavos);
        let expected = Decimal::from(whole) + Decimal::from(centavos) / Decimal::from(100);
        prop_assert_eq!(parse_number(&text), Some(expected));
    }

    /// Text without digits is never a number
    #[test]
    fn prop_no_digits_no_number(text in "[a-zA-Z ,.!?]{0,30}") {
        prop_assert_eq!(parse_number(&text), None);
    }

    /// Only the documented yes/no words are recognised
    #[test]
    fn prop_yes_no_rejects_other_words(word in "[a-z]{2,10}") {
        prop_assume!(!["sim", "nao"].contains(&word.as_str()));
        prop_assert_eq!(parse_yes_no(&word), None);
    }

    /// Every month 1-12 of a supported year is a valid trigger
    #[test]
    fn prop_valid_triggers(month in 1u32..=12u32, year in 2000i32..=2100i32, cvt in any::<bool>()) {
        let franchise = if cvt { "CVT" } else { "CVF" };
        let text = format!("fechamento {} {:02} {}", franchise, month, year);
        match parse_closing_trigger(&text) {
            TriggerMatch::Trigger(context) => {
                prop_assert_eq!(context.month, month);
                prop_assert_eq!(context.year, year);
                prop_assert_eq!(context.franchise.as_str(), franchise);
            }
            other => prop_assert!(false, "expected trigger, got {:?}", other),
        }
    }

    /// Months outside 1-12 are rejected, not clamped
    #[test]
    fn prop_invalid_month_is_malformed(month in 13u32..100u32) {
        let text = format!("fechamento CVT {} 2025", month);
        prop_assert_eq!(parse_closing_trigger(&text), TriggerMatch::Malformed);
    }
}
