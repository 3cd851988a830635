//! Currency formatting for the dashboard's money metrics.
//!
//! Covers the handful of locale/currency pairs the dashboard is deployed
//! with. Unknown locales fall back to `en_US` conventions and unknown
//! currencies are shown by their ISO code.

use std::fmt::Write as FmtWrite;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const NBSP: char = '\u{a0}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// `¤1,234.00`
    Prefix,
    /// `¤ 1.234,00`
    PrefixSpaced,
}

#[derive(Debug, Clone, Copy)]
struct Conventions {
    decimal: char,
    group: char,
    placement: Placement,
}

/// A locale + currency pair, resolved once and reused for every metric.
#[derive(Debug, Clone)]
pub struct CurrencyFormat {
    symbol: String,
    conventions: Conventions,
}

impl CurrencyFormat {
    pub fn new(code: &str, locale: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        let locale = locale.trim().replace('-', "_");
        let symbol = symbol(&locale, &code).unwrap_or(code.as_str()).to_string();
        Self {
            symbol,
            conventions: conventions(&locale),
        }
    }

    /// Format with two fraction digits, rounding half to even.
    pub fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return format!("{}{}", self.symbol, amount);
        }

        let cents = cents_half_even(amount.abs());
        let units = cents / 100;
        let fraction = cents % 100;
        let negative = amount < 0.0 && cents > 0;

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&self.symbol);
        if self.conventions.placement == Placement::PrefixSpaced {
            out.push(NBSP);
        }
        out.push_str(&group_digits(units, self.conventions.group));
        out.push(self.conventions.decimal);
        write!(out, "{fraction:02}").unwrap();
        out
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("BRL", "es_CO")
    }
}

/// Format `amount` in `currency` for `locale`.
pub fn format_currency(amount: f64, currency: &str, locale: &str) -> String {
    CurrencyFormat::new(currency, locale).format(amount)
}

/// Whole cents of a non-negative amount.
///
/// Rounds the shortest decimal form of `amount` (what `Display` prints), so
/// `1.015` is a tie and goes to `1.02` even though the nearest binary
/// double lies just below it.
fn cents_half_even(amount: f64) -> u64 {
    Decimal::from_str(&amount.to_string())
        .ok()
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| (d * Decimal::ONE_HUNDRED).to_u64())
        .unwrap_or_else(|| (amount * 100.0).round_ties_even() as u64)
}

fn conventions(locale: &str) -> Conventions {
    match locale {
        "es_CO" | "pt_BR" => Conventions {
            decimal: ',',
            group: '.',
            placement: Placement::PrefixSpaced,
        },
        _ => Conventions {
            decimal: '.',
            group: ',',
            placement: Placement::Prefix,
        },
    }
}

fn symbol(locale: &str, code: &str) -> Option<&'static str> {
    let symbol = match (locale, code) {
        ("es_CO", "COP") => "$",
        ("es_CO", "USD") => "US$",
        ("es_CO", "EUR") => "€",
        ("pt_BR", "BRL") => "R$",
        ("pt_BR", "USD") => "US$",
        ("pt_BR", "EUR") => "€",
        ("pt_BR", "AUD") => "AU$",
        ("es_CO" | "pt_BR", _) => return None,
        (_, "USD") => "$",
        (_, "BRL") => "R$",
        (_, "EUR") => "€",
        (_, "AUD") => "A$",
        _ => return None,
    };
    Some(symbol)
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brl_in_colombian_spanish_uses_iso_code() {
        assert_eq!(format_currency(65.0, "BRL", "es_CO"), "BRL\u{a0}65,00");
        assert_eq!(
            format_currency(1_234_567.891, "BRL", "es_CO"),
            "BRL\u{a0}1.234.567,89"
        );
        assert_eq!(format_currency(0.0, "BRL", "es_CO"), "BRL\u{a0}0,00");
    }

    #[test]
    fn local_currency_gets_local_symbol() {
        assert_eq!(format_currency(1234.5, "BRL", "pt_BR"), "R$\u{a0}1.234,50");
        assert_eq!(format_currency(1234.5, "COP", "es_CO"), "$\u{a0}1.234,50");
        assert_eq!(format_currency(1234.5, "USD", "en_US"), "$1,234.50");
        assert_eq!(format_currency(1234.5, "BRL", "en-US"), "R$1,234.50");
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(format_currency(0.125, "USD", "en_US"), "$0.12");
        assert_eq!(format_currency(0.375, "USD", "en_US"), "$0.38");
    }

    #[test]
    fn rounds_the_decimal_value_not_the_binary_one() {
        assert_eq!(format_currency(1.015, "BRL", "es_CO"), "BRL\u{a0}1,02");
        assert_eq!(format_currency(0.145, "BRL", "es_CO"), "BRL\u{a0}0,14");
        assert_eq!(format_currency(2.675, "USD", "en_US"), "$2.68");
        assert_eq!(format_currency(1.005, "USD", "en_US"), "$1.00");
    }

    #[test]
    fn negative_amounts_and_unknown_codes() {
        assert_eq!(format_currency(-5.0, "BRL", "es_CO"), "-BRL\u{a0}5,00");
        assert_eq!(format_currency(-0.001, "USD", "en_US"), "$0.00");
        assert_eq!(format_currency(10.0, "xyz", "fr_FR"), "XYZ10.00");
    }

    #[test]
    fn grouping_boundaries() {
        assert_eq!(group_digits(0, ','), "0");
        assert_eq!(group_digits(999, ','), "999");
        assert_eq!(group_digits(1000, ','), "1,000");
        assert_eq!(group_digits(100_000, '.'), "100.000");
    }
}
