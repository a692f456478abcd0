use clap::Args;

use crate::context::AppContext;
use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct TicketArgs {
    /// Issue key to fetch, e.g. PROJ-123.
    pub ticket_id: String,
    /// Print the canonical ticket as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn run(ctx: &AppContext, args: TicketArgs) -> AppResult<()> {
    let ticket = ctx.issue_tracker.fetch_ticket(&args.ticket_id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ticket)?);
    } else {
        print!("{}", render(&ticket));
    }
    Ok(())
}

fn render(ticket: &Ticket) -> String {
    let mut out = format!("{}: {}\n", ticket.key, ticket.summary);
    out.push_str(&format!(
        "Status: {} | Priority: {} | Assignee: {}\n",
        ticket.status, ticket.priority, ticket.assignee
    ));
    if !ticket.labels.is_empty() {
        out.push_str(&format!("Labels: {}\n", ticket.labels.join(", ")));
    }
    if !ticket.attachments.is_empty() {
        out.push_str("Attachments:\n");
        for attachment in &ticket.attachments {
            out.push_str(&format!(
                "  - {} ({}) {}\n",
                attachment.filename, attachment.mime_type, attachment.url
            ));
        }
    }
    out.push('\n');
    out.push_str(ticket.description.trim_end());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::Attachment;

    #[test]
    fn renders_ticket_summary() {
        let ticket = Ticket {
            key: "PROJ-1".to_string(),
            summary: "Login bug".to_string(),
            description: "Users cannot log in.\n".to_string(),
            priority: "High".to_string(),
            status: "To Do".to_string(),
            assignee: "Unassigned".to_string(),
            labels: vec!["auth".to_string(), "web".to_string()],
            acceptance_criteria: Vec::new(),
            attachments: vec![Attachment {
                filename: "trace.log".to_string(),
                url: "https://files.test/trace.log".to_string(),
                mime_type: "text/plain".to_string(),
            }],
        };

        assert_eq!(
            render(&ticket),
            "PROJ-1: Login bug\n\
             Status: To Do | Priority: High | Assignee: Unassigned\n\
             Labels: auth, web\n\
             Attachments:\n  - trace.log (text/plain) https://files.test/trace.log\n\
             \n\
             Users cannot log in.\n"
        );
    }
}
