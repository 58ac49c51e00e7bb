//! Prompt text for follow-up messages

use crate::request::MessageRequest;
use std::fmt::Write as _;

/// Instruction sent to the model for one lead.
///
/// The model is asked for the body only; the greeting is added by
/// [`crate::compose_with_greeting`].
#[must_use]
pub fn build_prompt(request: &MessageRequest) -> String {
    let mut prompt = String::from(
        "You are a sales representative. Write a friendly and professional WhatsApp message \
         to a potential client.\n\
         The message should be concise and aim to re-engage them. Do not include a greeting \
         (e.g. \"Hi John,\"); it will be added separately.\n\n\
         Client details:\n",
    );
    let _ = writeln!(prompt, "- Name: {}", request.name.trim());
    let _ = writeln!(prompt, "- Company: {}", request.company.trim());
    let notes = request.notes.trim();
    let _ = writeln!(
        prompt,
        "- Last interaction notes: {}",
        if notes.is_empty() { "none" } else { notes }
    );
    if let Some(status) = request.status {
        let _ = writeln!(prompt, "- Status: {status}");
    }
    prompt.push_str("\nGenerate just the message body.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadbook_core::LeadStatus;

    #[test]
    fn includes_lead_details() {
        let request = MessageRequest::new("Ada Lovelace", "Analytical Engines")
            .with_notes("Asked about pricing")
            .with_status(LeadStatus::Contacted);
        let prompt = build_prompt(&request);

        assert!(prompt.contains("- Name: Ada Lovelace"));
        assert!(prompt.contains("- Company: Analytical Engines"));
        assert!(prompt.contains("Asked about pricing"));
        assert!(prompt.contains("- Status: Contacted"));
        assert!(prompt.contains("Do not include a greeting"));
    }

    #[test]
    fn status_line_omitted_when_unknown() {
        let prompt = build_prompt(&MessageRequest::new("Ada", "Acme"));
        assert!(!prompt.contains("Status:"));
        assert!(prompt.contains("notes: none"));
    }
}
