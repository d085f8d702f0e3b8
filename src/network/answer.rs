//! Prompt assembly and the answers that need no model.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use super::{HistoryMessage, NetworkContact};
use crate::providers::ChatMessage;

pub const SYSTEM_PROMPT: &str = "You are Agary, an expert CRM copilot. Maintain conversational \
coherence using the entire message history. Resolve pronouns and follow-ups naturally. Ground \
answers ONLY in the provided contacts context provided below. If the answer is explicitly present \
in the provided fields (e.g., location, company), answer directly and concisely; do not claim lack \
of info when the field exists. Be direct, and include a short list of suggested people with \
reasoning.";

pub const NO_MATCHES: &str =
    "No matching contacts found. Try refining your query or enrich contacts first.";

const MAX_SUGGESTIONS: usize = 5;

static ASKS_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(where|based|located|live|living)\b").expect("valid regex"));

/// `#i Name, company, location, LinkedIn: url` per contact, with the
/// enrichment summary on its own line.
pub fn context_block(contacts: &[NetworkContact]) -> String {
    contacts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mut line = format!("#{} {}", i + 1, c.name);
            if let Some(company) = &c.company {
                line.push_str(&format!(", {company}"));
            }
            if let Some(location) = &c.location {
                line.push_str(&format!(", {location}"));
            }
            if let Some(url) = &c.linkedin_url {
                line.push_str(&format!(", LinkedIn: {url}"));
            }
            if let Some(summary) = c.summary() {
                line.push_str(&format!("\nSummary: {summary}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The most recent assistant turn that suggested contacts.
pub fn recent_suggestions(messages: &[HistoryMessage]) -> Option<&HistoryMessage> {
    messages
        .iter()
        .rev()
        .find(|m| m.is_assistant() && m.contacts.iter().any(|c| c.name.is_some()))
}

/// The first previously suggested person, if they were retrieved again.
pub fn primary_candidate<'a>(
    recent: Option<&HistoryMessage>,
    contacts: &'a [NetworkContact],
) -> Option<&'a NetworkContact> {
    let name = recent?.contacts.first()?.name.as_deref()?;
    contacts.iter().find(|c| c.name == name)
}

pub fn user_prompt(question: &str, contacts: &[NetworkContact], recent: Option<&HistoryMessage>) -> String {
    let primary = primary_candidate(recent, contacts).map(|p| {
        let block = json!({
            "name": p.name,
            "company": p.company,
            "location": p.best_location(),
            "linkedin_url": p.linkedin_url,
            "summary": p.summary(),
        });
        format!("Primary candidate (from prior turn):\n{block}")
    });

    let context = context_block(contacts);
    let previously = recent.map(|m| {
        let names: Vec<&str> = m.contacts.iter().filter_map(|c| c.name.as_deref()).collect();
        format!("Previously suggested people: {}", names.join(", "))
    });

    [
        primary,
        Some("Candidate contacts:".to_string()),
        Some(if context.is_empty() { "No contacts matched.".to_string() } else { context }),
        previously,
        Some(format!("Question: {question}")),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// Answer "where is she based?" style follow-ups straight from the stored
/// location of the first person suggested last turn.
pub fn location_answer(
    question: &str,
    recent: Option<&HistoryMessage>,
    contacts: &[NetworkContact],
) -> Option<String> {
    if !ASKS_LOCATION.is_match(question) {
        return None;
    }
    let target = primary_candidate(recent, contacts)?;
    Some(match target.best_location() {
        Some(location) => format!("{} is based in {location}.", target.name),
        None => format!("I don't have a location saved for {}.", target.name),
    })
}

/// The last `limit` turns as chat messages. Anything that is not the
/// assistant speaks as the user.
pub fn history(messages: &[HistoryMessage], limit: usize) -> Vec<ChatMessage> {
    let start = messages.len().saturating_sub(limit);
    messages[start..]
        .iter()
        .map(|m| {
            let content = m.content.clone().unwrap_or_default();
            if m.is_assistant() {
                ChatMessage::assistant(content)
            } else {
                ChatMessage::user(content)
            }
        })
        .collect()
}

/// Model-free answer listing up to five retrieved people.
pub fn heuristic_answer(contacts: &[NetworkContact]) -> String {
    if contacts.is_empty() {
        return NO_MATCHES.to_string();
    }

    let mut lines = vec!["Top suggested people:".to_string()];
    for (i, c) in contacts.iter().take(MAX_SUGGESTIONS).enumerate() {
        let parts: Vec<&str> = [Some(c.name.as_str()), c.company.as_deref(), c.location.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        let mut line = format!("{}. {}", i + 1, parts.join(" - "));
        if let Some(url) = &c.linkedin_url {
            line.push_str(&format!(" (LinkedIn: {url})"));
        }
        lines.push(line);
        if let Some(summary) = c.summary() {
            lines.push(format!("   · {summary}"));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::EnrichmentData;
    use crate::network::SuggestedContact;

    fn contact(name: &str, location: Option<&str>) -> NetworkContact {
        NetworkContact {
            id: name.to_lowercase(),
            name: name.to_string(),
            company: Some("Acme".into()),
            location: location.map(Into::into),
            linkedin_url: None,
            enrichment_data: None,
            similarity: None,
        }
    }

    fn suggested(names: &[&str]) -> HistoryMessage {
        HistoryMessage {
            role: Some("assistant".into()),
            content: Some("Try these".into()),
            contacts: names
                .iter()
                .map(|n| SuggestedContact { name: Some(n.to_string()) })
                .collect(),
        }
    }

    #[test]
    fn context_lines_number_and_summarize() {
        let mut enriched = contact("Ada Lovelace", None);
        let mut data = EnrichmentData::default();
        data.person_summary.summary = Some("Mathematician.".into());
        enriched.enrichment_data = Some(data);
        enriched.linkedin_url = Some("https://linkedin.com/in/ada".into());

        let block = context_block(&[contact("Jane Doe", Some("Berlin")), enriched]);
        assert_eq!(
            block,
            "#1 Jane Doe, Acme, Berlin\n\n#2 Ada Lovelace, Acme, LinkedIn: https://linkedin.com/in/ada\nSummary: Mathematician."
        );
    }

    #[test]
    fn location_follow_up_uses_prior_suggestion() {
        let history = [suggested(&["Jane Doe"])];
        let contacts = [contact("Jane Doe", Some("Berlin"))];
        assert_eq!(
            location_answer("Where is she based?", recent_suggestions(&history), &contacts).as_deref(),
            Some("Jane Doe is based in Berlin.")
        );
    }

    #[test]
    fn location_follow_up_falls_back_to_enrichment_then_admits_absence() {
        let history = [suggested(&["Jane Doe"])];
        let mut enriched = contact("Jane Doe", None);
        let mut data = EnrichmentData::default();
        data.person_summary.location = Some("Lisbon".into());
        enriched.enrichment_data = Some(data);
        assert_eq!(
            location_answer("where does she live", recent_suggestions(&history), &[enriched]).as_deref(),
            Some("Jane Doe is based in Lisbon.")
        );
        assert_eq!(
            location_answer("where?", recent_suggestions(&history), &[contact("Jane Doe", None)]).as_deref(),
            Some("I don't have a location saved for Jane Doe.")
        );
    }

    #[test]
    fn location_heuristic_needs_a_retrieved_prior_suggestion() {
        let contacts = [contact("Jane Doe", Some("Berlin"))];
        assert_eq!(location_answer("Where is she based?", None, &contacts), None);
        let history = [suggested(&["Someone Else"])];
        assert_eq!(location_answer("Where is she based?", recent_suggestions(&history), &contacts), None);
        let history = [suggested(&["Jane Doe"])];
        assert_eq!(location_answer("What does she do?", recent_suggestions(&history), &contacts), None);
    }

    #[test]
    fn prompt_includes_primary_and_previous_names() {
        let history = [suggested(&["Jane Doe", "Ada Lovelace"])];
        let contacts = [contact("Jane Doe", Some("Berlin"))];
        let prompt = user_prompt("What does she do?", &contacts, recent_suggestions(&history));
        assert!(prompt.starts_with("Primary candidate (from prior turn):\n{"));
        assert!(prompt.contains("\"location\":\"Berlin\""));
        assert!(prompt.contains("Previously suggested people: Jane Doe, Ada Lovelace"));
        assert!(prompt.ends_with("Question: What does she do?"));
    }

    #[test]
    fn prompt_without_matches() {
        let prompt = user_prompt("anyone?", &[], None);
        assert_eq!(prompt, "Candidate contacts:\n\nNo contacts matched.\n\nQuestion: anyone?");
    }

    #[test]
    fn history_keeps_last_turns_and_maps_roles() {
        let mut messages: Vec<HistoryMessage> = (0..15)
            .map(|i| HistoryMessage {
                role: Some(if i % 2 == 0 { "user" } else { "tool" }.into()),
                content: Some(i.to_string()),
                contacts: vec![],
            })
            .collect();
        messages.push(suggested(&["Jane Doe"]));
        let turns = history(&messages, 12);
        assert_eq!(turns.len(), 12);
        assert_eq!(turns[0].content, "4");
        assert_eq!(turns[0].role, crate::providers::ChatRole::User);
        assert_eq!(turns[11].role, crate::providers::ChatRole::Assistant);
    }

    #[test]
    fn heuristic_lists_at_most_five() {
        assert_eq!(heuristic_answer(&[]), NO_MATCHES);
        let contacts: Vec<_> = (0..7).map(|i| contact(&format!("Person {i}"), None)).collect();
        let answer = heuristic_answer(&contacts);
        assert!(answer.starts_with("Top suggested people:\n1. Person 0 - Acme"));
        assert_eq!(answer.lines().count(), 6);
    }
}
