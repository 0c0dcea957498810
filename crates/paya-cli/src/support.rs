//! Support ticket command handlers.

use clap::Subcommand;
use paya_client::MerchantClient;
use paya_core::{LocalList, SupportTicket, TicketStatus};

use crate::context::{clip, or_dash, AppContext};

/// Sub-commands available under `support`.
#[derive(Debug, Subcommand)]
pub enum SupportCommands {
    /// List tickets raised against the merchant
    List {
        /// open, in_progress, resolved or closed
        #[arg(long)]
        status: Option<TicketStatus>,
    },
    /// Show one ticket and its conversation
    Show { id: String },
    /// Change a ticket's status
    Status {
        id: String,
        status: TicketStatus,
        /// Print the ticket list afterwards
        #[arg(long)]
        list: bool,
    },
    /// Reply to a ticket
    Respond {
        id: String,
        message: String,
        /// Print the ticket list afterwards
        #[arg(long)]
        list: bool,
    },
}

pub(crate) async fn run(ctx: &AppContext, command: SupportCommands) -> anyhow::Result<()> {
    let session = ctx.require_session().await?;
    let client = session.client();

    match command {
        SupportCommands::List { status } => {
            let page = ctx.guard(client.list_tickets(status).await)?;
            print_tickets(&page.items);
        }
        SupportCommands::Show { id } => {
            let ticket = ctx.guard(client.get_ticket(&id).await)?;
            print_ticket(&ticket);
        }
        SupportCommands::Status { id, status, list } => {
            let mut tickets = fetch_list_if(ctx, client, list).await?;
            let ticket = ctx.guard(client.update_ticket_status(&id, status).await)?;
            println!("ticket {} is now {}", ticket.reference(), ticket.status);
            if let Some(tickets) = tickets.as_mut() {
                tickets.upsert(ticket);
                print_tickets(tickets.items());
            }
        }
        SupportCommands::Respond { id, message, list } => {
            if message.trim().is_empty() {
                anyhow::bail!("response message cannot be empty");
            }
            let mut tickets = fetch_list_if(ctx, client, list).await?;
            let ticket = ctx.guard(client.respond_to_ticket(&id, message.trim()).await)?;
            println!(
                "reply added to ticket {} ({} response(s), {})",
                ticket.reference(),
                ticket.responses.len(),
                ticket.status
            );
            if let Some(tickets) = tickets.as_mut() {
                tickets.upsert(ticket);
                print_tickets(tickets.items());
            }
        }
    }
    Ok(())
}

async fn fetch_list_if(
    ctx: &AppContext,
    client: &MerchantClient,
    wanted: bool,
) -> anyhow::Result<Option<LocalList<SupportTicket>>> {
    if !wanted {
        return Ok(None);
    }
    let page = ctx.guard(client.list_tickets(None).await)?;
    Ok(Some(LocalList::new(page.items)))
}

fn print_tickets(tickets: &[SupportTicket]) {
    if tickets.is_empty() {
        println!("no support tickets");
        return;
    }

    println!(
        "{:<26}{:<14}{:<13}{:<10}SUBJECT",
        "ID", "TICKET", "STATUS", "PRIORITY"
    );
    for ticket in tickets {
        println!(
            "{:<26}{:<14}{:<13}{:<10}{}",
            ticket.id,
            ticket.ticket_number.as_deref().unwrap_or("\u{2014}"),
            ticket.status.as_str(),
            ticket.priority.to_string(),
            clip(&ticket.subject, 50)
        );
    }
}

fn print_ticket(ticket: &SupportTicket) {
    println!("{:<10}{}", "TICKET", ticket.reference());
    println!("{:<10}{}", "SUBJECT", ticket.subject);
    println!("{:<10}{}", "STATUS", ticket.status);
    println!("{:<10}{}", "PRIORITY", ticket.priority);
    println!("{:<10}{}", "FROM", or_dash(ticket.name.as_deref()));
    println!("{:<10}{}", "EMAIL", or_dash(ticket.email.as_deref()));
    println!("{:<10}{}", "ORDER", or_dash(ticket.order_number.as_deref()));
    println!();
    println!("{}", ticket.message);

    for response in &ticket.responses {
        println!();
        println!(
            "-- {} {}",
            response.responded_by_name.as_deref().unwrap_or("merchant"),
            or_dash(response.timestamp.map(|at| at.format("%Y-%m-%d %H:%M")))
        );
        println!("{}", response.message);
    }
}
