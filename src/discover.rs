//! Same-host link discovery and oracle-assisted ranking
//!
//! Discovery is pure HTML work: resolve every anchor against the page URL,
//! keep same-host targets, dedupe in document order. Ranking asks the oracle
//! to pick the most promising subset and falls back to a keyword filter when
//! the oracle fails or replies with garbage.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use rig::completion::{CompletionModel, Prompt};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::extract::{first_json_object, prompts};
use crate::model::ratelimited_completion::RateLimitedCompletionModel;

/// Most candidates handed to the ranking prompt
pub const RAW_LINK_CAP: usize = 25;

/// Most URLs kept from an oracle ranking
pub const RANKED_LINK_CAP: usize = 20;

/// Most URLs kept by the keyword fallback
pub const FALLBACK_LINK_CAP: usize = 15;

const ANCHOR_TEXT_CAP: usize = 120;

/// One same-host link found on a page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinkCandidate {
    pub url: String,
    pub anchor: String,
}

#[derive(Debug, Deserialize)]
struct RankedUrls {
    urls: Vec<String>,
}

fn job_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)job|career|position|greenhouse|lever|opportun")
            .expect("job keyword pattern must compile")
    })
}

/// Collect same-host links from a page, in document order.
///
/// Fragment-only hrefs and unresolvable hrefs are skipped; each URL appears
/// once, keyed on its serialized absolute form.
pub fn discover_links(html: &str, base: &Url, cap: usize) -> Vec<LinkCandidate> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("anchor selector must parse");

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for element in document.select(&selector) {
        if candidates.len() >= cap {
            break;
        }
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        if resolved.host_str() != base.host_str() {
            continue;
        }
        let mut resolved = resolved;
        resolved.set_fragment(None);
        let url = resolved.to_string();
        if !seen.insert(url.clone()) {
            continue;
        }
        let anchor: String = element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(ANCHOR_TEXT_CAP)
            .collect();
        candidates.push(LinkCandidate { url, anchor });
    }
    candidates
}

/// Pick the candidate URLs worth enqueueing, best-effort via the oracle.
///
/// A well-formed oracle reply is authoritative even when empty; unknown URLs
/// in it are dropped. A failed or malformed reply falls back to the keyword
/// filter.
pub async fn rank_links<C>(
    model: &RateLimitedCompletionModel<C>,
    base: &Url,
    candidates: &[LinkCandidate],
) -> Vec<String>
where
    C: CompletionModel,
{
    if candidates.is_empty() {
        return Vec::new();
    }

    let candidates_json =
        serde_json::to_string(candidates).unwrap_or_else(|_| "[]".to_string());
    let agent = model
        .clone()
        .agent()
        .preamble(prompts::LINK_RANKING_SYSTEM)
        .build();

    let reply = match agent
        .prompt(prompts::link_ranking_prompt(base.as_str(), &candidates_json))
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!(base = %base, error = %e, "link ranking prompt failed");
            return keyword_fallback(candidates);
        }
    };

    match parse_ranked(&reply, candidates) {
        Some(urls) => urls,
        None => {
            debug!(base = %base, "link ranking reply had no parseable JSON object");
            keyword_fallback(candidates)
        }
    }
}

fn parse_ranked(reply: &str, candidates: &[LinkCandidate]) -> Option<Vec<String>> {
    let object = first_json_object(reply)?;
    let ranked: RankedUrls = serde_json::from_str(object).ok()?;

    let known: HashSet<&str> = candidates.iter().map(|c| c.url.as_str()).collect();
    let mut seen = HashSet::new();
    Some(
        ranked
            .urls
            .into_iter()
            .filter(|url| known.contains(url.as_str()))
            .filter(|url| seen.insert(url.clone()))
            .take(RANKED_LINK_CAP)
            .collect(),
    )
}

fn keyword_fallback(candidates: &[LinkCandidate]) -> Vec<String> {
    candidates
        .iter()
        .filter(|c| job_keyword_re().is_match(&c.url) || job_keyword_re().is_match(&c.anchor))
        .map(|c| c.url.clone())
        .take(FALLBACK_LINK_CAP)
        .collect()
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

    fn base() -> Url {
        Url::parse("https://acme.com/careers").unwrap()
    }

    const CAREERS_PAGE: &str = r##"
        <html><body>
            <a href="/jobs/1">Backend Engineer</a>
            <a href="/jobs/1">Backend Engineer (duplicate)</a>
            <a href="https://acme.com/jobs/2">Designer</a>
            <a href="https://other.com/jobs/3">External</a>
            <a href="#apply">Skip to apply</a>
            <a href="/about#team">About   our
                team</a>
            <a href="mailto:hiring@acme.com">Email us</a>
        </body></html>
    "##;

    #[test]
    fn test_discover_links_same_host_deduped_in_order() {
        let links = discover_links(CAREERS_PAGE, &base(), RAW_LINK_CAP);
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://acme.com/jobs/1",
                "https://acme.com/jobs/2",
                "https://acme.com/about",
            ]
        );
    }

    #[test]
    fn test_discover_links_collapses_anchor_whitespace() {
        let links = discover_links(CAREERS_PAGE, &base(), RAW_LINK_CAP);
        let about = links.iter().find(|l| l.url.ends_with("/about")).unwrap();
        assert_eq!(about.anchor, "About our team");
    }

    #[test]
    fn test_discover_links_respects_cap() {
        let links = discover_links(CAREERS_PAGE, &base(), 1);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://acme.com/jobs/1");
    }

    #[tokio::test]
    async fn test_rank_links_keeps_only_known_urls() {
        let mock = MockCompletionModel::new();
        mock.set_text_response(
            r#"{"urls": ["https://acme.com/jobs/2", "https://evil.com/injected", "https://acme.com/jobs/2"]}"#,
        )
        .await;
        let model = wrapped(mock);

        let candidates = discover_links(CAREERS_PAGE, &base(), RAW_LINK_CAP);
        let ranked = rank_links(&model, &base(), &candidates).await;
        assert_eq!(ranked, vec!["https://acme.com/jobs/2"]);
    }

    #[tokio::test]
    async fn test_rank_links_honors_empty_oracle_selection() {
        let mock = MockCompletionModel::new();
        mock.set_text_response(r#"{"urls": []}"#).await;
        let model = wrapped(mock);

        let candidates = discover_links(CAREERS_PAGE, &base(), RAW_LINK_CAP);
        let ranked = rank_links(&model, &base(), &candidates).await;
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_rank_links_falls_back_on_oracle_failure() {
        let mock = MockCompletionModel::new();
        mock.fail_completions().await;
        let model = wrapped(mock);

        let candidates = discover_links(CAREERS_PAGE, &base(), RAW_LINK_CAP);
        let ranked = rank_links(&model, &base(), &candidates).await;
        assert_eq!(ranked, keyword_fallback(&candidates));
        assert_eq!(
            ranked,
            vec!["https://acme.com/jobs/1", "https://acme.com/jobs/2"]
        );
    }

    #[tokio::test]
    async fn test_rank_links_falls_back_on_malformed_reply() {
        let mock = MockCompletionModel::new();
        mock.set_text_response("these links look interesting").await;
        let model = wrapped(mock);

        let candidates = discover_links(CAREERS_PAGE, &base(), RAW_LINK_CAP);
        let ranked = rank_links(&model, &base(), &candidates).await;
        assert_eq!(ranked, keyword_fallback(&candidates));
    }

    #[tokio::test]
    async fn test_rank_links_empty_candidates_skip_oracle() {
        let mock = MockCompletionModel::new();
        mock.fail_completions().await;
        let model = wrapped(mock);

        let ranked = rank_links(&model, &base(), &[]).await;
        assert!(ranked.is_empty());
    }

    fn posting_candidates(n: usize) -> Vec<LinkCandidate> {
        (0..n)
            .map(|i| LinkCandidate {
                url: format!("https://acme.com/jobs/{}", i),
                anchor: format!("Engineer {}", i),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_ranked_selection_truncates_to_cap() {
        let candidates = posting_candidates(RANKED_LINK_CAP + 5);
        let urls: Vec<&str> = candidates.iter().map(|c| c.url.as_str()).collect();

        let mock = MockCompletionModel::new();
        mock.set_text_response(&serde_json::json!({ "urls": urls }).to_string())
            .await;
        let model = wrapped(mock);

        let ranked = rank_links(&model, &base(), &candidates).await;
        assert_eq!(ranked.len(), RANKED_LINK_CAP);
        assert_eq!(ranked[0], "https://acme.com/jobs/0");
        assert_eq!(ranked[RANKED_LINK_CAP - 1], candidates[RANKED_LINK_CAP - 1].url);
    }

    #[tokio::test]
    async fn test_keyword_fallback_truncates_to_cap() {
        let candidates = posting_candidates(FALLBACK_LINK_CAP + 5);

        let mock = MockCompletionModel::new();
        mock.fail_completions().await;
        let model = wrapped(mock);

        let ranked = rank_links(&model, &base(), &candidates).await;
        assert_eq!(ranked.len(), FALLBACK_LINK_CAP);
        assert_eq!(ranked[0], "https://acme.com/jobs/0");
        assert_eq!(ranked[FALLBACK_LINK_CAP - 1], candidates[FALLBACK_LINK_CAP - 1].url);
    }

    #[test]
    fn test_keyword_fallback_matches_anchor_text() {
        let candidates = vec![
            LinkCandidate {
                url: "https://acme.com/openings/12".to_string(),
                anchor: "Open positions".to_string(),
            },
            LinkCandidate {
                url: "https://acme.com/blog".to_string(),
                anchor: "Engineering blog".to_string(),
            },
        ];
        assert_eq!(
            keyword_fallback(&candidates),
            vec!["https://acme.com/openings/12"]
        );
    }
}
