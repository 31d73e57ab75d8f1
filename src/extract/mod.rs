//! Field extraction and classification
//!
//! Turns fetched markup into a normalized `JobCandidate` via the oracle, then
//! decides acceptance with a purely local heuristic. Oracle failures and
//! malformed replies degrade to an all-null candidate; they never abort the
//! page. The oracle is never consulted for the accept/reject decision itself.

mod classify;
pub mod prompts;

pub use classify::is_likely_posting;

use rig::completion::{CompletionModel, Prompt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::ratelimited_completion::RateLimitedCompletionModel;

/// Upper bound on markup characters handed to the extraction prompt
pub const HTML_PROMPT_BUDGET: usize = 18_000;

/// Upper bound on description characters handed to the summary prompt
pub const SUMMARY_INPUT_BUDGET: usize = 6_000;

/// Upper bound on any single normalized field
pub const FIELD_BUDGET: usize = 50_000;

/// Structured fields pulled from one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobCandidate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

/// Collapse whitespace runs (including NBSP) to single spaces and cap length.
/// Returns None when nothing printable remains.
fn clean_text(raw: &str) -> Option<String> {
    let collapsed = raw
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(FIELD_BUDGET).collect())
}

/// Find the first balanced `{...}` object in free-form oracle text.
///
/// Tracks string/escape state so braces inside JSON strings do not
/// unbalance the scan.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_candidate(reply: &str) -> Option<JobCandidate> {
    let object = first_json_object(reply)?;
    let raw: RawCandidate = serde_json::from_str(object).ok()?;
    Some(JobCandidate {
        title: raw.title.as_deref().and_then(clean_text),
        company: raw.company.as_deref().and_then(clean_text),
        location: raw.location.as_deref().and_then(clean_text),
        description: raw.description.as_deref().and_then(clean_text),
        metadata: raw.metadata.filter(|m| !m.is_null()),
    })
}

/// Extract structured fields from one page's markup.
///
/// Any oracle failure or unparseable reply yields the all-null candidate,
/// which classification will reject.
pub async fn extract_job<C>(model: &RateLimitedCompletionModel<C>, url: &str, html: &str) -> JobCandidate
where
    C: CompletionModel,
{
    let truncated: String = html.chars().take(HTML_PROMPT_BUDGET).collect();
    let agent = model
        .clone()
        .agent()
        .preamble(prompts::JOB_EXTRACTION_SYSTEM)
        .build();

    let reply = match agent.prompt(prompts::job_extraction_prompt(&truncated)).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(url, error = %e, "extraction prompt failed");
            return JobCandidate::default();
        }
    };

    match parse_candidate(&reply) {
        Some(candidate) => candidate,
        None => {
            debug!(url, "extraction reply had no parseable JSON object");
            JobCandidate::default()
        }
    }
}

/// Summarize an accepted description into a few bullet points.
///
/// Returns None when summarization is disabled, there is no description, or
/// the oracle fails; the posting is stored either way.
pub async fn summarize_description<C>(
    model: &RateLimitedCompletionModel<C>,
    description: Option<&str>,
    enabled: bool,
) -> Option<String>
where
    C: CompletionModel,
{
    if !enabled {
        return None;
    }
    let description = description?;
    let truncated: String = description.chars().take(SUMMARY_INPUT_BUDGET).collect();
    let agent = model.clone().agent().build();

    match agent.prompt(prompts::summary_prompt(&truncated)).await {
        Ok(reply) => {
            let trimmed = reply.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(e) => {
            debug!(error = %e, "summary prompt failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mock_model::MockCompletionModel;
    use governor::{Quota, RateLimiter};
    use std::num::NonZeroU32;

    fn wrapped(mock: MockCompletionModel) -> RateLimitedCompletionModel<MockCompletionModel> {
        let limiter = RateLimiter::direct(Quota::per_minute(NonZeroU32::new(10_000).unwrap()));
        RateLimitedCompletionModel::new(mock, limiter)
    }

    #[test]
    fn test_first_json_object_ignores_surrounding_prose() {
        let text = "Sure, here you go:\n```json\n{\"title\": \"SRE\"}\n```";
        assert_eq!(first_json_object(text), Some("{\"title\": \"SRE\"}"));
    }

    #[test]
    fn test_first_json_object_handles_braces_in_strings() {
        let text = r#"{"title": "C++ {embedded} dev", "metadata": {"team": "core"}}"#;
        assert_eq!(first_json_object(text), Some(text));
    }

    #[test]
    fn test_first_json_object_rejects_unbalanced_text() {
        assert_eq!(first_json_object("no object here"), None);
        assert_eq!(first_json_object("{\"title\": \"open"), None);
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(
            clean_text("  Senior\n\tEngineer\u{a0}\u{a0}(Remote) "),
            Some("Senior Engineer (Remote)".to_string())
        );
        assert_eq!(clean_text(" \u{a0} \n "), None);
    }

    #[tokio::test]
    async fn test_extract_job_parses_fields_from_reply() {
        let mock = MockCompletionModel::new();
        mock.set_text_response(
            r#"Here is the data: {"title": " Staff  Engineer ", "company": "Acme", "location": null, "description": "Build things.", "metadata": {"salary": "$200k"}}"#,
        )
        .await;

        let model = wrapped(mock);
        let candidate = extract_job(&model, "https://acme.com/jobs/1", "<html></html>").await;

        assert_eq!(candidate.title.as_deref(), Some("Staff Engineer"));
        assert_eq!(candidate.company.as_deref(), Some("Acme"));
        assert_eq!(candidate.location, None);
        assert_eq!(candidate.description.as_deref(), Some("Build things."));
        assert_eq!(candidate.metadata.unwrap()["salary"], "$200k");
    }

    #[tokio::test]
    async fn test_extract_job_defaults_on_oracle_failure() {
        let mock = MockCompletionModel::new();
        mock.fail_completions().await;

        let model = wrapped(mock);
        let candidate = extract_job(&model, "https://acme.com/jobs/1", "<html></html>").await;

        assert_eq!(candidate, JobCandidate::default());
    }

    #[tokio::test]
    async fn test_extract_job_defaults_on_malformed_reply() {
        let mock = MockCompletionModel::new();
        mock.set_text_response("I could not find a job posting on this page.")
            .await;

        let model = wrapped(mock);
        let candidate = extract_job(&model, "https://acme.com/about", "<html></html>").await;

        assert_eq!(candidate, JobCandidate::default());
    }

    #[tokio::test]
    async fn test_summarize_skipped_when_disabled() {
        let mock = MockCompletionModel::new();
        mock.set_text_response("- bullet").await;
        let model = wrapped(mock);

        assert_eq!(
            summarize_description(&model, Some("long description"), false).await,
            None
        );
    }

    #[tokio::test]
    async fn test_summarize_returns_none_on_failure() {
        let mock = MockCompletionModel::new();
        mock.fail_completions().await;
        let model = wrapped(mock);

        assert_eq!(
            summarize_description(&model, Some("long description"), true).await,
            None
        );
    }

    #[tokio::test]
    async fn test_summarize_trims_reply() {
        let mock = MockCompletionModel::new();
        mock.set_text_response("\n- fast-paced team\n- remote first\n- equity\n")
            .await;
        let model = wrapped(mock);

        assert_eq!(
            summarize_description(&model, Some("long description"), true)
                .await
                .as_deref(),
            Some("- fast-paced team\n- remote first\n- equity")
        );
    }
}
