//! Parsing of free-text answers typed during a closing.
//!
//! Answers arrive in Brazilian notation (`R$ 5.000,00`, `25,77`), so dots
//! are group separators and the comma is the decimal mark.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::modules::closings::models::{ClosingContext, FranchiseId};

/// Words that start a closing command
pub const CLOSING_KEYWORDS: [&str; 2] = ["fechamento", "closing"];

/// Result of matching a message against the closing command syntax
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerMatch {
    /// Well-formed command with a valid month and year
    Trigger(ClosingContext),
    /// Uses the closing keyword as a word but is not a usable command
    Malformed,
    NotATrigger,
}

/// First number found in `text`, or `None`
///
/// Whitespace and dots are removed and the first comma becomes the decimal
/// point before scanning. A minus sign directly before the first digit is
/// kept so callers can reject negative answers.
pub fn parse_number(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();
    let cleaned = cleaned.replacen(',', ".", 1);

    let start = cleaned.find(|c: char| c.is_ascii_digit())?;
    let negative = cleaned[..start].ends_with('-');

    let rest = &cleaned[start..];
    let int_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let mut token = rest[..int_len].to_string();

    if let Some(fraction) = rest[int_len..].strip_prefix('.') {
        let frac_len = fraction
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(fraction.len());
        if frac_len > 0 {
            token.push('.');
            token.push_str(&fraction[..frac_len]);
        }
    }

    let value = Decimal::from_str(&token).ok()?;
    Some(if negative { -value } else { value })
}

/// `sim`/`s` is yes, `não`/`nao`/`n` is no, anything else is `None`
pub fn parse_yes_no(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "sim" | "s" => Some(true),
        "não" | "nao" | "n" => Some(false),
        _ => None,
    }
}

/// Match `fechamento|closing <cvt|cvf> <month> <year>`, case-insensitive
///
/// The keyword only counts as a whole word: "enclosing" is not a mention.
pub fn parse_closing_trigger(text: &str) -> TriggerMatch {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    let mentions_keyword = tokens.iter().any(|token| {
        let word = token.trim_matches(|c: char| !c.is_alphanumeric());
        CLOSING_KEYWORDS.contains(&word)
    });
    if !mentions_keyword {
        return TriggerMatch::NotATrigger;
    }

    let [keyword, franchise, month, year] = tokens.as_slice() else {
        return TriggerMatch::Malformed;
    };

    let well_formed = CLOSING_KEYWORDS.contains(keyword)
        && matches!(*franchise, "cvt" | "cvf")
        && is_digits(month, 1, 2)
        && is_digits(year, 4, 4);
    if !well_formed {
        return TriggerMatch::Malformed;
    }

    let (Ok(month), Ok(year)) = (month.parse::<u32>(), year.parse::<i32>()) else {
        return TriggerMatch::Malformed;
    };

    match ClosingContext::new(FranchiseId::new(franchise), month, year) {
        Ok(context) => TriggerMatch::Trigger(context),
        Err(_) => TriggerMatch::Malformed,
    }
}

fn is_digits(token: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&token.len()) && token.chars().all(|c| c.is_ascii_digit())
}
