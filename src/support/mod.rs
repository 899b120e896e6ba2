//! Customer Support
//!
//! Scripted chatbot, help center questions, warranty and return policies,
//! and the contact and return forms.

use thiserror::Error;

use crate::checkout::ValidationErrors;

pub mod chatbot;
pub mod contact;
pub mod faq;
pub mod policies;
pub mod returns;

pub use chatbot::ChatSession;
pub use contact::{ContactForm, ContactSubject};
pub use faq::FaqEntry;
pub use returns::{ReturnReason, ReturnRequest};

/// Errors raised by the support forms.
#[derive(Debug, Error, PartialEq)]
pub enum SupportError {
    /// Required fields are missing or malformed.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// Subject text did not name a known subject.
    #[error("unknown contact subject: {0}")]
    UnknownSubject(String),

    /// Reason text did not name a known reason.
    #[error("unknown return reason: {0}")]
    UnknownReason(String),
}
