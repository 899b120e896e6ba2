//! Support desk.
//!
//! Accepts contact messages and return requests after a simulated send.

use std::time::Duration;

use jiff::Timestamp;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use vitrine::support::{ContactForm, ReturnRequest, SupportError, policies::REPLY_WITHIN_HOURS};

/// Default wait while a message is "sent".
pub const DEFAULT_SEND_DELAY: Duration = Duration::from_secs(2);

/// Acknowledgement for a submitted support request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    /// Ticket id
    pub id: Uuid,

    /// Submission time
    pub submitted_at: Timestamp,

    /// Promised reply window, in hours
    pub reply_within_hours: u8,
}

/// Support request submission with a simulated send delay.
#[derive(Debug, Clone, Copy)]
pub struct SupportDesk {
    send_delay: Duration,
}

impl Default for SupportDesk {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_DELAY)
    }
}

impl SupportDesk {
    /// Create a desk that waits `send_delay` per submission.
    pub fn new(send_delay: Duration) -> Self {
        Self { send_delay }
    }

    /// Validate and send a contact message.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Invalid`] listing every missing field; nothing is sent.
    pub async fn send_contact(&self, form: &ContactForm) -> Result<Ticket, SupportError> {
        form.validate()?;

        let ticket = self.send().await;

        info!(
            ticket_id = %ticket.id,
            subject = ?form.subject,
            "contact message sent"
        );

        Ok(ticket)
    }

    /// Validate and send a return request.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Invalid`] listing every missing field; nothing is sent.
    pub async fn send_return(&self, request: &ReturnRequest) -> Result<Ticket, SupportError> {
        request.validate()?;

        let ticket = self.send().await;

        info!(
            ticket_id = %ticket.id,
            order_number = %request.order_number,
            reason = ?request.reason,
            "return request sent"
        );

        Ok(ticket)
    }

    async fn send(&self) -> Ticket {
        tokio::time::sleep(self.send_delay).await;

        Ticket {
            id: Uuid::now_v7(),
            submitted_at: Timestamp::now(),
            reply_within_hours: REPLY_WITHIN_HOURS,
        }
    }
}
