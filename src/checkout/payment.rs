//! Payment Methods

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payment method text did not name a known method.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit card
    Credit,

    /// Debit card
    Debit,

    /// Instant transfer through a PIX code
    Pix,
}

impl PaymentMethod {
    /// Whether card fields must be filled in.
    pub fn requires_card(self) -> bool {
        matches!(self, Self::Credit | Self::Debit)
    }

    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Credit => "Cartão de Crédito",
            Self::Debit => "Cartão de Débito",
            Self::Pix => "PIX",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" | "credito" | "crédito" => Ok(Self::Credit),
            "debit" | "debito" | "débito" => Ok(Self::Debit),
            "pix" => Ok(Self::Pix),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}
