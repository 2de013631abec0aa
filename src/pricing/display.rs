//! Human-readable rendering of a [`PricingQuote`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::PricingQuote;

/// Currency rendering rules: fixed symbol prefix plus digit grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "₹".into(),
            thousands_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    pub fn separators(mut self, thousands: char, decimal: char) -> Self {
        self.thousands_separator = thousands;
        self.decimal_separator = decimal;
        self
    }

    /// Symbol-prefixed amount, at most two fractional digits, trailing zeros dropped.
    pub fn amount(&self, value: Decimal) -> String {
        format!("{}{}", self.symbol, self.number(value))
    }

    /// Grouped number without a symbol.
    pub fn number(&self, value: Decimal) -> String {
        let rounded = value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let text = rounded.abs().to_string();

        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (text.as_str(), None),
        };

        let mut out = String::with_capacity(text.len() + text.len() / 3 + 2);
        if negative {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, self.thousands_separator));
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }

    pub fn render(&self, quote: &PricingQuote) -> QuoteDisplay {
        QuoteDisplay {
            credits: group_digits(&quote.credits.trunc().abs().to_string(), self.thousands_separator),
            base_price: self.amount(quote.base_price),
            discount_percent: format!("{:.1}%", quote.discount_percent),
            discount_amount: self.amount(quote.discount_amount),
            final_price: self.amount(quote.final_price),
            savings: self.amount(quote.savings),
        }
    }
}

/// Display strings for each quote field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteDisplay {
    pub credits: String,
    pub base_price: String,
    pub discount_percent: String,
    pub discount_amount: String,
    pub final_price: String,
    pub savings: String,
}

impl PricingQuote {
    pub fn display(&self) -> QuoteDisplay {
        CurrencyFormat::default().render(self)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1", ','), "1");
        assert_eq!(group_digits("999", ','), "999");
        assert_eq!(group_digits("1000", ','), "1,000");
        assert_eq!(group_digits("50000", ','), "50,000");
        assert_eq!(group_digits("1234567", ','), "1,234,567");
    }

    #[test]
    fn test_amount_formatting() {
        let fmt = CurrencyFormat::default();
        assert_eq!(fmt.amount(dec!(8760)), "₹8,760");
        assert_eq!(fmt.amount(dec!(1890.90)), "₹1,890.9");
        assert_eq!(fmt.amount(dec!(4455.891)), "₹4,455.89");
        assert_eq!(fmt.amount(dec!(0.005)), "₹0.01");
        assert_eq!(fmt.amount(Decimal::ZERO), "₹0");
        assert_eq!(fmt.number(dec!(-1234.5)), "-1,234.5");
    }

    #[test]
    fn test_render_quote() {
        let display = PricingQuote::for_credits(10_000u32).display();
        assert_eq!(display.credits, "10,000");
        assert_eq!(display.base_price, "₹10,000");
        assert_eq!(display.discount_percent, "12.4%");
        assert_eq!(display.discount_amount, "₹1,240");
        assert_eq!(display.final_price, "₹8,760");
        assert_eq!(display.savings, "₹1,240");
    }

    #[test]
    fn test_render_zero_discount() {
        let display = PricingQuote::for_credits(300u32).display();
        assert_eq!(display.discount_percent, "0.0%");
        assert_eq!(display.savings, "₹0");
    }

    #[test]
    fn test_custom_separators() {
        let fmt = CurrencyFormat::new("€").separators('.', ',');
        assert_eq!(fmt.amount(dec!(37500.25)), "€37.500,25");
    }
}
