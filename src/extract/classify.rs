//! Local accept/reject heuristic for extracted candidates
//!
//! A short-circuiting chain of rejection rules; a candidate is accepted only
//! when every rule passes. Deterministic and offline: the oracle output is
//! input here, never a judge.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use super::JobCandidate;

/// Keyword families counted (distinct, case-insensitive) in the description
const KEYWORD_FAMILIES: [&str; 7] = [
    "apply",
    "responsibilit",
    "requirement",
    "qualification",
    "benefit",
    "salary",
    "compensation",
];

fn generic_title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(careers?|jobs?|open positions?|join our team)\b")
            .expect("generic title pattern must compile")
    })
}

/// Decide whether an extracted candidate is a real, individual job posting.
///
/// Rules run in order and the first failure rejects:
/// 1. title must exist and be at least 4 characters
/// 2. a listing-style generic title needs a long (>= 800 char) description
/// 3. description must be at least 120 characters
/// 4. description must mention at least two distinct keyword families
/// 5. a shallow URL (fewer than 2 path segments, no digit) needs a
///    long (>= 1500 char) description
pub fn is_likely_posting(url: &str, candidate: &JobCandidate) -> bool {
    let Some(title) = candidate.title.as_deref() else {
        return false;
    };
    if title.chars().count() < 4 {
        return false;
    }

    let description = candidate.description.as_deref().unwrap_or("");
    let description_len = description.chars().count();

    if generic_title_re().is_match(title) && description_len < 800 {
        return false;
    }

    if description_len < 120 {
        return false;
    }

    let lowered = description.to_lowercase();
    let families = KEYWORD_FAMILIES
        .iter()
        .filter(|family| lowered.contains(*family))
        .count();
    if families < 2 {
        return false;
    }

    if let Ok(parsed) = Url::parse(url) {
        let segments = parsed
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).count())
            .unwrap_or(0);
        let has_digit = parsed.path().chars().any(|c| c.is_ascii_digit());
        if segments < 2 && !has_digit && description_len < 1500 {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTING_URL: &str = "https://acme.com/jobs/1234-senior-backend-engineer";

    fn plausible_description() -> String {
        "We are hiring a senior backend engineer. Responsibilities include owning \
services end to end. Requirements: five years of Rust. Apply today through \
our portal and tell us why you want the role."
            .to_string()
    }

    fn plausible_candidate() -> JobCandidate {
        JobCandidate {
            title: Some("Senior Backend Engineer".to_string()),
            description: Some(plausible_description()),
            ..Default::default()
        }
    }

    #[test]
    fn test_accepts_plausible_posting() {
        assert!(is_likely_posting(POSTING_URL, &plausible_candidate()));
    }

    #[test]
    fn test_rejects_missing_or_short_title() {
        let mut candidate = plausible_candidate();
        candidate.title = None;
        assert!(!is_likely_posting(POSTING_URL, &candidate));

        candidate.title = Some("SRE".to_string());
        assert!(!is_likely_posting(POSTING_URL, &candidate));
    }

    #[test]
    fn test_rejects_generic_listing_title_with_short_description() {
        let mut candidate = plausible_candidate();
        candidate.title = Some("Careers at Acme".to_string());
        assert!(!is_likely_posting("https://acme.com/careers", &candidate));
    }

    #[test]
    fn test_accepts_generic_title_with_long_description() {
        let mut candidate = plausible_candidate();
        candidate.title = Some("Jobs: Senior Backend Engineer".to_string());
        candidate.description = Some(format!(
            "{} {}",
            plausible_description(),
            "More detail about the role. ".repeat(40)
        ));
        assert!(is_likely_posting(POSTING_URL, &candidate));
    }

    #[test]
    fn test_rejects_short_description() {
        let mut candidate = plausible_candidate();
        candidate.description = Some("Apply now, great benefits.".to_string());
        assert!(!is_likely_posting(POSTING_URL, &candidate));
    }

    #[test]
    fn test_rejects_description_missing_keyword_families() {
        let mut candidate = plausible_candidate();
        candidate.description = Some(
            "This page describes our engineering culture at length, our values, \
our offices around the world, and the many ways our teams collaborate \
across time zones on interesting infrastructure problems."
                .to_string(),
        );
        assert!(!is_likely_posting(POSTING_URL, &candidate));
    }

    #[test]
    fn test_counts_distinct_families_not_repeats() {
        let mut candidate = plausible_candidate();
        candidate.description = Some(
            "Apply here. Apply now. Apply again. Apply today. Apply quickly. \
You should definitely apply because applying is easy and we love people \
who apply. Our application process is short, so apply without delay."
                .to_string(),
        );
        assert!(!is_likely_posting(POSTING_URL, &candidate));
    }

    #[test]
    fn test_rejects_shallow_url_without_long_description() {
        let candidate = plausible_candidate();
        assert!(!is_likely_posting("https://acme.com/careers", &candidate));
    }

    #[test]
    fn test_accepts_shallow_url_with_digit() {
        let candidate = plausible_candidate();
        assert!(is_likely_posting("https://acme.com/j1234", &candidate));
    }

    #[test]
    fn test_accepts_shallow_url_with_long_description() {
        let mut candidate = plausible_candidate();
        candidate.description = Some(format!(
            "{} {}",
            plausible_description(),
            "Further responsibilities and context about the position. ".repeat(40)
        ));
        assert!(is_likely_posting("https://acme.com/careers", &candidate));
    }

    #[test]
    fn test_unparseable_url_skips_shallowness_rule() {
        let candidate = plausible_candidate();
        assert!(is_likely_posting("not a url", &candidate));
    }
}
