//! Checkout Form

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkout::PaymentMethod;

/// Digits in a Brazilian postal code.
pub const CEP_DIGITS: usize = 8;

/// Address fields filled in by a postal-code lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street name
    pub street: String,

    /// Neighborhood
    pub neighborhood: String,

    /// City
    pub city: String,

    /// Two-letter state code
    pub state: String,
}

/// Everything the customer types on the checkout page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    /// Customer first name
    pub first_name: String,

    /// Customer last name
    pub last_name: String,

    /// Contact email
    pub email: String,

    /// Contact phone
    pub phone: String,

    /// Taxpayer number
    pub cpf: String,

    /// Postal code, with or without punctuation
    pub cep: String,

    /// Street name
    pub street: String,

    /// House number
    pub number: String,

    /// Optional address complement
    pub complement: String,

    /// Neighborhood
    pub neighborhood: String,

    /// City
    pub city: String,

    /// Two-letter state code
    pub state: String,

    /// Chosen payment method
    pub payment_method: Option<PaymentMethod>,

    /// Card number, for card payments
    pub card_number: String,

    /// Name printed on the card
    pub card_name: String,

    /// Card expiry as `MM/AA`
    pub card_expiry: String,

    /// Card security code
    pub card_cvv: String,

    /// Free-form delivery notes
    pub notes: String,
}

impl CheckoutForm {
    /// The postal code's digits, when it has exactly eight of them.
    pub fn cep_digits(&self) -> Option<String> {
        let digits: String = self.cep.chars().filter(char::is_ascii_digit).collect();

        (digits.len() == CEP_DIGITS).then_some(digits)
    }

    /// Overwrite the street, neighborhood, city and state with a looked-up address.
    pub fn apply_address(&mut self, address: Address) {
        self.street = address.street;
        self.neighborhood = address.neighborhood;
        self.city = address.city;
        self.state = address.state;
    }

    /// Customer's full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Check every required field.
    ///
    /// # Errors
    ///
    /// Returns every missing or malformed field at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require("first_name", &self.first_name);
        errors.require("last_name", &self.last_name);
        errors.require_email("email", &self.email);
        errors.require("phone", &self.phone);
        errors.require("cpf", &self.cpf);

        if self.cep.trim().is_empty() {
            errors.push("cep", "obrigatório");
        } else if self.cep_digits().is_none() {
            errors.push("cep", "deve ter 8 dígitos");
        }

        errors.require("street", &self.street);
        errors.require("number", &self.number);
        errors.require("neighborhood", &self.neighborhood);
        errors.require("city", &self.city);
        errors.require("state", &self.state);

        match self.payment_method {
            None => errors.push("payment_method", "obrigatório"),
            Some(method) if method.requires_card() => {
                errors.require("card_number", &self.card_number);
                errors.require("card_name", &self.card_name);
                errors.require("card_expiry", &self.card_expiry);
                errors.require("card_cvv", &self.card_cvv);
            }
            Some(_) => {}
        }

        errors.into_result()
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name
    pub field: &'static str,

    /// What is wrong with it
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found in one form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid fields: {}", list(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn list(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    /// Record a field error.
    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    /// Record an error if the value is blank.
    pub fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "obrigatório");
        }
    }

    /// Record an error if the value is blank or not shaped like an email address.
    pub fn require_email(&mut self, field: &'static str, value: &str) {
        let value = value.trim();

        if value.is_empty() {
            self.push(field, "obrigatório");
        } else if !looks_like_email(value) {
            self.push(field, "e-mail inválido");
        }
    }

    /// Field errors, in form order.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether a field failed.
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// Whether nothing failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
