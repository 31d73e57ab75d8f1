//! Prompt text sent to the oracle
//!
//! Each prompt demands a single JSON object (or nothing else useful), so the
//! reply can be parsed with the balanced-brace scanner in the parent module.

/// System preamble for job field extraction
pub const JOB_EXTRACTION_SYSTEM: &str = "You are a specialized parser that extracts structured \
job posting data from raw HTML. Return strict JSON.";

const JOB_EXTRACTION_GUIDANCE: &str = r#"Extract the following fields if present. Focus on structured extraction for a job application assistant.

Top-level keys:
- title (string)
- company (string)
- location (string) (primary location or main if multiple)
- description (long normalized text, join major sections)
- metadata (object)

metadata may include (ONLY include keys that are present or strongly implied):
# Core listing basics
- employment_type (e.g. full-time, part-time, contract, internship, freelance)
- seniority (e.g. junior, mid, senior, staff, principal, lead, director)
- posted_date (ISO 8601 if possible)
- application_deadline (ISO 8601 if present)
- internal_job_id
- application_link (direct URL if distinct from page)
- application_instructions (string)
- contact_email
- contact_phone
- referral_bonus (boolean or description)
- ats_system (e.g. Greenhouse, Lever)

# Compensation & benefits
- salary (string raw)
- salary_min (number)
- salary_max (number)
- salary_interval (e.g. yearly, hourly, monthly)
- compensation_currency (e.g. USD, EUR)
- equity (string or range)
- bonus (string)
- benefits (array of short strings)
- benefits_detailed (array long strings)
- relocation (boolean or description)
- visa_sponsorship (boolean)
- remote (boolean)
- remote_policy (string)
- timezone_overlap (string)
- travel_requirements (string)

# Role & responsibilities
- responsibilities (array of bullet strings)
- qualifications (array of bullet strings)
- mandatory_skills (array)
- nice_to_have_skills (array)
- tech_stack (array of technologies)
- tools (array)
- methodologies (array)
- kpis (array)
- team_size (number or string)
- reporting_line (e.g. 'Reports to VP Engineering')
- interview_process (array steps)
- start_date (string or ISO if given)
- contract_length (string)
- schedule (string e.g. 'Mon-Fri', shift pattern)
- language_requirements (array)
- security_clearance (string)
- work_authorization_required (string)
- experience_required (string)
- years_experience_min (number)
- years_experience_max (number)
- education (string)
- education_required (string)

# Company & context
- company_size (string or range)
- industry (string)
- funding_stage (string)
- mission (string)
- diversity_statement (string)
- glassdoor_rating (number if explicit)
- departments (array)
- locations (array of strings)
- tags (array)

# Auto-apply support
- required_documents (array: resume, cover_letter, portfolio, references, transcripts, code_samples, github, linkedin)
- screening_questions (array)
- auto_reject_criteria (array)
- application_portal_type (e.g. 'LinkedIn', 'Greenhouse', 'Proprietary')

Return ONLY strict JSON: {"title":..., "company":..., "location":..., "description":..., "metadata":{...}}.
If a field unknown, omit it or set null (avoid placeholders). Use arrays for lists. Do not include commentary."#;

/// Build the user prompt for job extraction from already-truncated markup
pub fn job_extraction_prompt(truncated_html: &str) -> String {
    format!(
        "{}\n\nHTML:\n----------------\n{}\n----------------",
        JOB_EXTRACTION_GUIDANCE, truncated_html
    )
}

/// System preamble for candidate link ranking
pub const LINK_RANKING_SYSTEM: &str = "You are an assistant that filters and prioritizes \
hyperlinks likely to lead directly to individual job postings or to focused job listing pages \
containing openings. Output only JSON with an array 'urls'.";

const LINK_RANKING_GUIDANCE: &str = r#"CRITERIA:
INCLUDE if likely a job posting OR a listing page leading to postings soon (e.g. /careers/, /jobs/, /positions/, greenhouse.io, lever.co, /job/, /opportunity/, /opportunities/, /join-?, /work-with-us/ etc.).
Favor links whose slugs contain role-like tokens (engineer, developer, designer, product, marketing, sales, data, backend, frontend, fullstack) OR unique IDs / numeric tokens / hyphenated role phrases.
EXCLUDE generic top-level pages (about, blog, press, news, team unless /careers), social links, signup/login, contact, faq, privacy, terms, sitemap.
Return at most 20 high quality unique absolute URLs from the provided set. Do NOT invent URLs.
If a direct posting (single role) appears, include it even if the anchor text is short.
Return STRICT JSON: {"urls":["..."]}"#;

/// Build the user prompt for ranking discovered links
pub fn link_ranking_prompt(base: &str, candidates_json: &str) -> String {
    format!(
        "{}\n\nBASE: {}\nCANDIDATES_JSON = {}",
        LINK_RANKING_GUIDANCE, base, candidates_json
    )
}

/// Build the user prompt for summarizing an accepted description
pub fn summary_prompt(description: &str) -> String {
    format!(
        "Summarize this job description in 3 concise bullet points:\n{}",
        description
    )
}
