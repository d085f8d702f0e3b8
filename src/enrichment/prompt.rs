//! Research prompts and the search strings folded into them.

use crate::contacts::Contact;
use crate::enrichment::types::Candidate;
use crate::matching::linkedin::canonicalize;

pub const DEFINITIVE_SYSTEM: &str = "You are enriching one confirmed person whose LinkedIn URL is \
known. Only describe the owner of that profile and ignore anyone else with the same name. \
Return only valid JSON.";

pub const EXPLORATORY_SYSTEM: &str = "You are a professional research assistant who identifies \
people carefully. Search LinkedIn, company sites, news, directories, conference listings, \
publications and social media. When several people share the name, say so and lower your \
confidence. Never guess: leave unknown fields empty. Return only a valid JSON object.";

pub const PRESEARCH_SYSTEM: &str = "You return strictly valid JSON. No prose.";

pub const DEFINITIVE_CANDIDATE_SYSTEM: &str =
    "You return strictly valid JSON describing the owner of a LinkedIn profile.";

pub const DISCOVERY_SYSTEM: &str = "You are a professional researcher listing every person who \
could match a name. Return only valid JSON with enough detail to tell candidates apart.";

const RECORD_SHAPE: &str = r#"{
  "identity": {"linkedin_profile": "<url or null>", "canonical_name": "<full name>", "verified": <true|false>},
  "confidence_score": {
    "overall_confidence": <0-100>,
    "confidence_level": "<high|medium|low>",
    "matching_factors": ["<signal that matched>"],
    "disambiguation_notes": "<why this person and not another>",
    "verification_suggestions": "<what would confirm the identity>"
  },
  "person_summary": {
    "full_name": "", "current_position": "", "industry": "", "location": "",
    "experience_years": "", "summary": "<3-4 sentence professional overview>"
  },
  "professional_background": {
    "current_company": "", "previous_companies": [], "education": "",
    "skills_expertise": [], "notable_achievements": []
  },
  "social_profiles": [{"platform": "", "url": "", "username": "", "follower_count": "", "profile_image_url": "", "verified": false, "activity_summary": ""}],
  "websites_and_profiles": [{"type": "<personal_website|portfolio|blog|company_profile|directory_listing>", "url": "", "title": "", "description": ""}],
  "recent_activities": [{"type": "", "description": "", "date": "", "source": ""}],
  "additional_info": {"publications": [], "certifications": [], "awards": [], "speaking_events": []},
  "identity_candidates": [{"name": "", "linkedin_profile": null, "company": "", "location": "", "confidence": "", "notes": "", "image_url": null}]
}"#;

const CANDIDATE_SHAPE: &str = r#"{
  "candidates": [
    {
      "name": "<full name>",
      "current_position": "<title and company>",
      "company": "<current company>",
      "location": "<location>",
      "linkedin_profile": "<url or null>",
      "profile_image_url": "<url or null>",
      "experience_summary": "<1-2 sentences>",
      "education": "<if known>",
      "additional_info": "<anything that tells this person apart>",
      "source": "<where they were found>"
    }
  ],
  "total_found": <number>
}"#;

fn quoted(value: Option<&str>) -> String {
    value.map(|v| format!("\"{v}\" ")).unwrap_or_default()
}

/// Enrichment anchored on a stored LinkedIn URL.
pub fn definitive_enrichment(contact: &Contact, linkedin_url: &str) -> String {
    let name = contact.full_name();
    format!(
        "CONFIRMED IDENTITY\n\
         - Person: {name}\n\
         - LinkedIn: {linkedin_url} (path: {path})\n\n\
         Use this profile as the only identity anchor. Ignore other people named {name}. \
         Prefer sources that reference this exact profile: the profile itself, then articles \
         and company pages that mention it.\n\n\
         Set identity.verified to true and omit identity_candidates.\n\n\
         Return ONLY valid JSON shaped like:\n{RECORD_SHAPE}",
        path = canonicalize(linkedin_url),
    )
}

/// A narrow LinkedIn lookup for contacts without a stored profile.
pub fn linkedin_presearch(contact: &Contact, hint_domains: &[String]) -> String {
    let name = contact.full_name();
    let mut signals = vec![format!("Name: {name}")];
    if let Some(location) = &contact.location {
        signals.push(format!("Location: {location}"));
    }
    if let Some(company) = &contact.company {
        signals.push(format!("Company: {company}"));
    }
    if !hint_domains.is_empty() {
        signals.push(format!("Known related domains: {}", hint_domains.join(", ")));
    }

    format!(
        "Find the LinkedIn profile URL of {name}. Search with exact quotes and site:linkedin.com/in, \
         e.g. \"{name}\" {company}{location}site:linkedin.com/in. If several profiles match, pick the \
         one that best fits these signals:\n- {signals}\n\nIf unsure, return null.\n\n\
         Return ONLY: {{\"linkedin_url\": \"<url or null>\"}}",
        company = quoted(contact.company.as_deref()),
        location = quoted(contact.location.as_deref()),
        signals = signals.join("\n- "),
    )
}

/// Explicit web searches for exploratory enrichment.
pub fn targeted_searches(contact: &Contact, hint_domains: &[String], has_linkedin: bool) -> Vec<String> {
    let name = format!("\"{}\"", contact.full_name());
    let qualifiers = format!(
        "{}{}",
        quoted(contact.company.as_deref()),
        quoted(contact.location.as_deref())
    );

    let mut searches = vec![
        format!("{name} {qualifiers}site:linkedin.com/in"),
        format!("{name} {qualifiers}profile"),
        format!("{name} {qualifiers}resume"),
    ];
    if !has_linkedin {
        searches.push(format!("{} {qualifiers}linkedin", contact.full_name()));
    }
    for domain in hint_domains {
        searches.push(format!("{name} site:{domain}"));
    }
    searches.into_iter().map(|s| s.trim().to_string()).collect()
}

/// Inputs for the exploratory prompt beyond the contact itself.
#[derive(Debug, Default)]
pub struct ExploratoryContext<'a> {
    pub aliases: Vec<String>,
    pub hint_domains: Vec<String>,
    pub searches: Vec<String>,
    /// Unverified LinkedIn guess from the pre-search.
    pub linkedin_hint: Option<&'a str>,
    pub selected: Option<&'a Candidate>,
}

pub fn exploratory_enrichment(contact: &Contact, ctx: &ExploratoryContext<'_>) -> String {
    let name = contact.full_name();
    let mut prompt = String::new();

    match (contact.linkedin_url.as_deref(), ctx.selected) {
        (stored, Some(selected)) => {
            prompt.push_str(&format!("Target person: {name}, confirmed by the user.\n"));
            if let Some(url) = stored.or(selected.linkedin_profile.as_deref()) {
                prompt.push_str(&format!("LinkedIn: {url} (path: {}).\n", canonicalize(url)));
            }
            prompt.push_str(&format!(
                "Selected candidate: {} from {}.\n\
                 Focus on thorough enrichment of this person.\n",
                selected.name.as_deref().unwrap_or(&name),
                selected.company.as_deref().unwrap_or("an unknown company"),
            ));
        }
        (Some(url), None) => {
            prompt.push_str(&format!(
                "Target person: {name}. LinkedIn: {url} (path: {}). Cross-check everything against this profile.\n",
                canonicalize(url)
            ));
        }
        (None, None) => {
            prompt.push_str(&format!(
                "Target person: {name}.\nThis may be a common name. Confirm identity through several independent signals.\n"
            ));
            if let Some(hint) = ctx.linkedin_hint {
                prompt.push_str(&format!(
                    "A quick search suggested {hint} as their LinkedIn profile. Treat it as a lead only and verify it.\n"
                ));
            }
        }
    }

    prompt.push_str(&format!(
        "\nAlso search these aliases: {}. Prefer exact matches. Useful operators: site:linkedin.com/in, \
         site:crunchbase.com, site:github.com, site:twitter.com.",
        ctx.aliases.join(", ")
    ));
    if !ctx.hint_domains.is_empty() {
        let sites: Vec<String> = ctx.hint_domains.iter().map(|d| format!("site:{d}")).collect();
        prompt.push_str(&format!("\nIf relevant, prefer sources on: {}", sites.join(" OR ")));
    }
    let signals: Vec<&str> = [contact.location.as_deref(), contact.company.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !signals.is_empty() {
        prompt.push_str(&format!("\nDisambiguation signals: {}.", signals.join(", ")));
    }
    if !ctx.searches.is_empty() {
        prompt.push_str("\n\nRun these searches (adjust when better terms are obvious) and settle on the single strongest match:\n");
        for search in &ctx.searches {
            prompt.push_str(&format!("- {search}\n"));
        }
    }

    prompt.push_str(&format!(
        "\nReturn ONLY a JSON object shaped like:\n{RECORD_SHAPE}\n\n\
         Rules:\n\
         - Describe a single person. Social profiles must clearly belong to them.\n\
         - If several strong candidates remain, set identity.verified to false, list each in \
         identity_candidates and explain in disambiguation_notes.\n\
         - If company or location contradicts the signals above, set identity.verified to false and say why.\n\
         - Only fill linkedin_profile when you are highly confident it is theirs.\n\
         - Confidence: 90-100 for a unique, corroborated profile; 70-89 for strong but ambiguous; \
         50-69 for a common name with several matches.\n"
    ));
    prompt
}

pub fn definitive_candidate(linkedin_url: &str) -> String {
    format!(
        "Return ONLY valid JSON. Describe the person who owns this exact LinkedIn profile: {linkedin_url}\n\
         Treat the profile as the definitive identity and report their current professional details.\n\n\
         Shape:\n{CANDIDATE_SHAPE}"
    )
}

/// Search strings suggested to the discovery model.
pub fn discovery_searches(
    first: &str,
    last: &str,
    company: Option<&str>,
    location: Option<&str>,
    variations: &[String],
) -> Vec<String> {
    let full = format!("{first} {last}");
    let bare = |v: Option<&str>| v.map(|s| format!("{s} ")).unwrap_or_default();

    let mut searches = vec![
        format!("\"{full}\" {}{}site:linkedin.com/in", quoted(company), quoted(location)),
        format!("\"{full}\" {}professional profile resume", bare(company)),
        format!("\"{last}, {first}\" {}{}", bare(company), bare(location)),
    ];
    for variation in variations.iter().take(3).filter(|v| **v != full) {
        searches.push(format!("\"{variation}\" {}linkedin profile", bare(company)));
    }
    if let Some(company) = company {
        let domain: String = company
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        searches.push(format!("\"{full}\" site:{domain}.com"));
        searches.push(format!("\"{first}\" \"{last}\" \"{company}\" directory team"));
    }
    searches.into_iter().map(|s| s.trim().to_string()).collect()
}

pub fn discovery(
    first: &str,
    last: &str,
    company: Option<&str>,
    location: Option<&str>,
    searches: &[String],
) -> String {
    let mut prompt = format!("List everyone who could be {first} {last}.\n");
    if let Some(company) = company {
        prompt.push_str(&format!("Company context: {company}\n"));
    }
    if let Some(location) = location {
        prompt.push_str(&format!("Location context: {location}\n"));
    }
    prompt.push_str(
        "\nLook for exact names, nicknames, middle and maiden names, current and former employers, \
         and profiles on LinkedIn, company sites and directories.\n",
    );
    if !searches.is_empty() {
        prompt.push_str("\nSuggested searches:\n");
        for search in searches {
            prompt.push_str(&format!("- {search}\n"));
        }
    }
    prompt.push_str(&format!(
        "\nReturn ONLY valid JSON shaped like:\n{CANDIDATE_SHAPE}\n\n\
         Include uncertain candidates, give each enough distinguishing detail, and return an empty \
         candidates array when nobody is found."
    ));
    prompt
}
