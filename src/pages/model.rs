//! Test data models

use std::fmt;

use crate::{Error, Result};

/// Catalogue product with its expected price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    /// Price in cents
    pub price: u64,
}

impl Product {
    /// Create a product from a dollar price, e.g. `7.99`
    pub fn new(name: impl Into<String>, dollars: f64) -> Self {
        Self {
            name: name.into(),
            price: (dollars * 100.0).round() as u64,
        }
    }

    /// Sum of product prices in cents
    pub fn total(products: &[Product]) -> u64 {
        products.iter().map(|p| p.price).sum()
    }
}

/// Checkout customer details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub zip_code: String,
}

impl Customer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            zip_code: zip_code.into(),
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {}", self.first_name, self.last_name, self.zip_code)
    }
}

/// Format cents as `$7.99`
pub fn format_price(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Parse a displayed price (`$7.99`, `Item total: $37.98`) into cents
pub fn parse_price(text: &str) -> Result<u64> {
    let invalid = || Error::assertion(format!("Unparseable price '{}'", text));

    let amount = text
        .rsplit('$')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)?;

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: u64 = whole.replace(',', "").parse().map_err(|_| invalid())?;
    let cents = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse::<u64>().map_err(|_| invalid())?,
    };

    Ok(whole * 100 + cents)
}
