//! Merchant support ticket endpoints.

use paya_core::{SupportTicket, TicketStatus};
use reqwest::Method;

use crate::error::ApiError;
use crate::types::{Page, TicketEnvelope, TicketsEnvelope};

use super::MerchantClient;

impl MerchantClient {
    /// Lists tickets raised against the merchant, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on 401 and the usual
    /// transport/decoding errors otherwise.
    pub async fn list_tickets(
        &self,
        status: Option<TicketStatus>,
    ) -> Result<Page<SupportTicket>, ApiError> {
        let query: Vec<(&str, String)> = status
            .map(|s| ("status", s.as_str().to_string()))
            .into_iter()
            .collect();
        let envelope: TicketsEnvelope = self
            .get_json(&["support", "merchant", "tickets"], &query)
            .await?;
        Ok(Page {
            items: envelope.tickets,
            pagination: envelope.pagination,
        })
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown tickets, [`ApiError::Api`]
    /// (403) for tickets of another merchant, and the usual
    /// transport/decoding errors otherwise.
    pub async fn get_ticket(&self, id: &str) -> Result<SupportTicket, ApiError> {
        self.get_json(&["support", id], &[]).await
    }

    /// # Errors
    ///
    /// Same as [`MerchantClient::get_ticket`].
    pub async fn update_ticket_status(
        &self,
        id: &str,
        status: TicketStatus,
    ) -> Result<SupportTicket, ApiError> {
        let body = serde_json::json!({ "status": status });
        let envelope: TicketEnvelope = self
            .send_body(Method::PATCH, &["support", id, "status"], &body)
            .await?;
        tracing::info!(ticket_id = %id, %status, "ticket status changed");
        Ok(envelope.ticket)
    }

    /// Appends a response to the ticket. The server moves open tickets to
    /// `in_progress` when the merchant replies.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] (400) for an empty message, and otherwise
    /// the same errors as [`MerchantClient::get_ticket`].
    pub async fn respond_to_ticket(
        &self,
        id: &str,
        message: &str,
    ) -> Result<SupportTicket, ApiError> {
        let body = serde_json::json!({ "message": message });
        let envelope: TicketEnvelope = self
            .send_body(Method::POST, &["support", id, "response"], &body)
            .await?;
        tracing::info!(ticket_id = %id, "ticket response added");
        Ok(envelope.ticket)
    }
}
