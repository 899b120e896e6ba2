//! Return Requests

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    checkout::ValidationErrors,
    support::{
        SupportError,
        policies::{DEFECT_RETURN_DAYS, RETURN_WINDOW_DAYS},
    },
};

/// Why a product is being sent back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnReason {
    /// The product is defective
    #[serde(rename = "defeito", alias = "defect")]
    Defect,

    /// The customer changed their mind
    #[serde(rename = "arrependimento", alias = "regret")]
    Regret,

    /// The product differs from its listing
    #[serde(rename = "diferente", alias = "different")]
    Different,

    /// The product arrived damaged
    #[serde(rename = "danificado", alias = "damaged")]
    Damaged,

    /// Anything else
    #[serde(rename = "outro", alias = "other")]
    Other,
}

impl ReturnReason {
    /// Every reason, in display order.
    pub const ALL: [Self; 5] = [
        Self::Defect,
        Self::Regret,
        Self::Different,
        Self::Damaged,
        Self::Other,
    ];

    /// Form value.
    pub fn key(self) -> &'static str {
        match self {
            Self::Defect => "defeito",
            Self::Regret => "arrependimento",
            Self::Different => "diferente",
            Self::Damaged => "danificado",
            Self::Other => "outro",
        }
    }

    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Defect => "Produto com defeito",
            Self::Regret => "Arrependimento da compra",
            Self::Different => "Produto diferente do anunciado",
            Self::Damaged => "Produto danificado na entrega",
            Self::Other => "Outro motivo",
        }
    }

    /// Days after receipt this reason can be claimed.
    pub fn window_days(self) -> i64 {
        match self {
            Self::Defect => DEFECT_RETURN_DAYS,
            _ => RETURN_WINDOW_DAYS,
        }
    }
}

impl fmt::Display for ReturnReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReturnReason {
    type Err = SupportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "defeito" | "defect" => Ok(Self::Defect),
            "arrependimento" | "regret" => Ok(Self::Regret),
            "diferente" | "different" => Ok(Self::Different),
            "danificado" | "damaged" => Ok(Self::Damaged),
            "outro" | "other" => Ok(Self::Other),
            _ => Err(SupportError::UnknownReason(s.to_string())),
        }
    }
}

/// A request to exchange or return a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnRequest {
    /// Order the product came in
    pub order_number: String,

    /// Product being returned
    pub product_name: String,

    /// Why
    pub reason: Option<ReturnReason>,

    /// Optional details
    pub description: String,

    /// Contact email
    pub email: String,

    /// Optional phone
    pub phone: String,
}

impl ReturnRequest {
    /// Check required fields: order number, product name, reason and email.
    ///
    /// # Errors
    ///
    /// Returns every missing field at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require("order_number", &self.order_number);
        errors.require("product_name", &self.product_name);

        if self.reason.is_none() {
            errors.push("reason", "obrigatório");
        }

        errors.require_email("email", &self.email);

        errors.into_result()
    }
}
