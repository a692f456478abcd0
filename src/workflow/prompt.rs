use crate::domain::plan::Prompt;
use crate::domain::ticket::Ticket;

pub const DEFAULT_TEMPLATE: &str = "# Test Plan Template\n\n\
## 1. Introduction\n[Brief description of features]\n\n\
## 2. Scope\n- In Scope:\n- Out of Scope:\n\n\
## 3. Test Strategy\n[Approach, Tools, Environment]\n\n\
## 4. Test Scenarios\n| ID | Scenario | Expected Result |\n|----|----------|-----------------|\n";

const SYSTEM_PROMPT: &str = "You are a Senior QA Engineer. Your task is to generate a comprehensive test plan \
based on the provided JIRA ticket details and the structure of the template below.\n\n\
INSTRUCTIONS:\n\
1. Map ticket details (Summary, Description, Acceptance Criteria) to the appropriate template sections.\n\
2. Maintain the template's formatting and sections EXACTLY.\n\
3. Add specific test scenarios, including positive, negative, and edge cases.\n\
4. Use professional technical language.\n";

/// Builds the system/user prompt pair for a ticket. `template_text` is used verbatim.
pub fn build_prompt(ticket: &Ticket, template_text: &str) -> Prompt {
    let user = format!(
        "### JIRA TICKET DATA\n\
         Key: {key}\n\
         Summary: {summary}\n\
         Description: {description}\n\
         Priority: {priority}\n\
         Status: {status}\n\
         Acceptance Criteria: {criteria}\n\n\
         ### TEMPLATE STRUCTURE\n\
         {template_text}\n\n\
         Please generate the full test plan in Markdown format.",
        key = ticket.key,
        summary = ticket.summary,
        description = ticket.description,
        priority = ticket.priority,
        status = ticket.status,
        criteria = format_criteria(&ticket.acceptance_criteria),
    );

    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// Picks the caller's template, or the built-in one when none was given.
pub fn resolve_template(template_text: Option<String>) -> String {
    template_text
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string())
}

fn format_criteria(criteria: &[String]) -> String {
    if criteria.is_empty() {
        return "None provided".to_string();
    }
    criteria
        .iter()
        .map(|item| format!("\n- {item}"))
        .collect()
}
