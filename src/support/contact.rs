//! Contact Form

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{checkout::ValidationErrors, support::SupportError};

/// What a contact message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactSubject {
    /// Questions about an order
    #[serde(rename = "pedido", alias = "order")]
    Order,

    /// Product information
    #[serde(rename = "produto", alias = "product")]
    Product,

    /// Delivery problems
    #[serde(rename = "entrega", alias = "delivery")]
    Delivery,

    /// Warranty
    #[serde(rename = "garantia", alias = "warranty")]
    Warranty,

    /// Exchanges and returns
    #[serde(rename = "troca", alias = "exchange")]
    Exchange,

    /// Anything else
    #[serde(rename = "outros", alias = "other")]
    Other,
}

impl ContactSubject {
    /// Every subject, in display order.
    pub const ALL: [Self; 6] = [
        Self::Order,
        Self::Product,
        Self::Delivery,
        Self::Warranty,
        Self::Exchange,
        Self::Other,
    ];

    /// Form value.
    pub fn key(self) -> &'static str {
        match self {
            Self::Order => "pedido",
            Self::Product => "produto",
            Self::Delivery => "entrega",
            Self::Warranty => "garantia",
            Self::Exchange => "troca",
            Self::Other => "outros",
        }
    }

    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Order => "Dúvidas sobre Pedido",
            Self::Product => "Informações de Produto",
            Self::Delivery => "Problemas de Entrega",
            Self::Warranty => "Garantia",
            Self::Exchange => "Trocas e Devoluções",
            Self::Other => "Outros",
        }
    }
}

impl fmt::Display for ContactSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContactSubject {
    type Err = SupportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pedido" | "order" => Ok(Self::Order),
            "produto" | "product" => Ok(Self::Product),
            "entrega" | "delivery" => Ok(Self::Delivery),
            "garantia" | "warranty" => Ok(Self::Warranty),
            "troca" | "exchange" => Ok(Self::Exchange),
            "outros" | "other" => Ok(Self::Other),
            _ => Err(SupportError::UnknownSubject(s.to_string())),
        }
    }
}

/// A message for the support team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    /// Sender name
    pub name: String,

    /// Reply address
    pub email: String,

    /// Optional phone
    pub phone: String,

    /// Topic
    pub subject: Option<ContactSubject>,

    /// Message body
    pub message: String,
}

impl ContactForm {
    /// Check required fields: name, email, subject and message.
    ///
    /// # Errors
    ///
    /// Returns every missing field at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require("name", &self.name);
        errors.require_email("email", &self.email);

        if self.subject.is_none() {
            errors.push("subject", "obrigatório");
        }

        errors.require("message", &self.message);

        errors.into_result()
    }
}
