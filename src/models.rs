use serde::{Serialize, Deserialize};
use std::fmt;

/// Currencies offered by the listing form.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Inr,
    Jpy,
    Cny,
    Aud,
    Cad,
}

impl Currency {
    pub const ALL: [Currency; 8] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Inr,
        Currency::Jpy,
        Currency::Cny,
        Currency::Aud,
        Currency::Cad,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Inr => "INR",
            Currency::Jpy => "JPY",
            Currency::Cny => "CNY",
            Currency::Aud => "AUD",
            Currency::Cad => "CAD",
        }
    }

    /// Digits after the decimal point when printing an amount.
    pub fn minor_units(self) -> usize {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Price as typed into the form. Browsers send a string, scripts often send a number.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawPrice {
    Text(String),
    Number(serde_json::Number),
}

impl RawPrice {
    pub fn as_text(&self) -> String {
        match self {
            RawPrice::Text(s) => s.trim().to_string(),
            RawPrice::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductInput {
    pub title: String,
    pub description: String,
    pub price: RawPrice,
    pub currency: Currency,
    pub company_name: String,
    pub manufacturing_country: String,
    #[serde(default)]
    pub keywords: Option<Vec<String>>, // null and missing both mean "no keywords"
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Pricing {
    pub amount: f64,
    pub currency: Currency,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductInfo {
    pub title: String,
    pub description: String,
    pub pricing: Pricing,
    pub category: String,
    pub company_name: String,
    pub manufacturing_country: String,
}

/// Where a keyword was spoken or shown in a source video. Never produced for text input.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KeywordTimestamp {
    pub keyword: String,
    pub timestamp_seconds: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductResult {
    pub product_info: ProductInfo,
    #[serde(default)]
    pub keyword_timestamps: Vec<KeywordTimestamp>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub error: String,
}
