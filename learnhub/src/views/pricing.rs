//! Cart totals and discounts.

use crate::types::Course;

/// Sales tax applied at checkout
pub const TAX_RATE: f64 = 0.10;

/// Rounds a currency amount to cents
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Subtotal, tax and total of a list of courses
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartTotals {
    /// Sum of prices
    pub subtotal: f64,
    /// `subtotal * TAX_RATE`
    pub tax: f64,
    /// `subtotal + tax`
    pub total: f64,
}

impl CartTotals {
    /// Computes totals for `items`
    #[must_use]
    pub fn of(items: &[Course]) -> Self {
        let subtotal: f64 = items.iter().map(|c| c.price).sum();
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// Every amount rounded to cents, for display and orders
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            subtotal: round_cents(self.subtotal),
            tax: round_cents(self.tax),
            total: round_cents(self.total),
        }
    }

    /// Sum of original prices minus the subtotal
    #[must_use]
    pub fn savings(items: &[Course]) -> f64 {
        items.iter().map(|c| c.original_price - c.price).sum()
    }
}

/// Percent off the original price, rounded; 0 when there is no original price
#[must_use]
#[allow(clippy::cast_possible_truncation)] // percent of a price fits easily
pub fn discount_percent(price: f64, original_price: f64) -> i64 {
    if original_price <= 0.0 {
        return 0;
    }
    ((1.0 - price / original_price) * 100.0).round() as i64
}
