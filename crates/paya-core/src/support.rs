use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::Identified;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(format!(
                "unknown ticket status '{other}'; expected open, in_progress, resolved or closed"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    #[serde(default)]
    pub responded_by_name: Option<String>,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub ticket_number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub responses: Vec<TicketResponse>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SupportTicket {
    /// Ticket number when assigned, otherwise the database id.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.ticket_number.as_deref().unwrap_or(&self.id)
    }
}

impl Identified for SupportTicket {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ticket_with_responses() {
        let ticket: SupportTicket = serde_json::from_value(serde_json::json!({
            "_id": "t1",
            "ticketNumber": "TKT-42",
            "subject": "Refund",
            "message": "Customer wants a refund",
            "status": "in_progress",
            "priority": "urgent",
            "responses": [{ "respondedByName": "Support Team", "message": "On it", "timestamp": "2025-02-01T00:00:00Z" }]
        }))
        .expect("ticket should parse");
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.priority, Priority::Urgent);
        assert_eq!(ticket.reference(), "TKT-42");
        assert_eq!(ticket.responses.len(), 1);
    }

    #[test]
    fn status_parses_hyphenated_input() {
        assert_eq!("in-progress".parse::<TicketStatus>(), Ok(TicketStatus::InProgress));
        assert!("pending".parse::<TicketStatus>().is_err());
    }
}
