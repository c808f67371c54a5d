//! JD analysis — extracts structured role info from a raw job description.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::interview::prompts::JD_ANALYSIS_SYSTEM;
use crate::providers::{generate_typed, AiProvider, CompletionOptions, ProviderError};

/// Max JD characters sent to the provider. Bounds prompt cost — long JDs
/// carry their signal up front.
const JD_INPUT_LIMIT: usize = 1500;

/// Structured extraction of a job description. Consumed by question
/// generation and report synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdInfo {
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u8>,
    #[serde(default)]
    pub core_topics: Vec<String>,
    #[serde(default)]
    pub is_developer: bool,
}

/// Analyzes a job description via the provider. Failure propagates:
/// downstream question generation cannot proceed without this.
pub async fn analyze_job_description(
    provider: &dyn AiProvider,
    job_description: &str,
) -> Result<JdInfo, ProviderError> {
    let truncated: String = job_description.chars().take(JD_INPUT_LIMIT).collect();
    let user_prompt = format!("Job Description:\n{truncated}");

    let mut jd_info: JdInfo = generate_typed(
        provider,
        JD_ANALYSIS_SYSTEM,
        &user_prompt,
        &CompletionOptions::with_temperature(0.3),
    )
    .await?;

    // The numeric estimate is the model's judgment; when it omits one,
    // fall back to a deterministic parse of the raw text.
    if jd_info.experience_years.is_none() {
        jd_info.experience_years = parse_experience_years(job_description);
    }

    info!(
        "JD analyzed: role={}, experience_years={:?}, developer={}",
        jd_info.role, jd_info.experience_years, jd_info.is_developer
    );
    Ok(jd_info)
}

fn years_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,2})(?:\s*-\s*(\d{1,2}))?\s*\+?\s*(?:years?|yrs?)")
            .expect("experience-years pattern is valid")
    })
}

/// Deterministic experience-years extraction from free text.
/// "5+ years" -> 5, "3-5 years" -> 4 (rounded average), no match -> None.
pub(crate) fn parse_experience_years(text: &str) -> Option<u8> {
    let caps = years_regex().captures(text)?;
    let low: u8 = caps.get(1)?.as_str().parse().ok()?;
    match caps.get(2).and_then(|m| m.as_str().parse::<u8>().ok()) {
        Some(high) => Some((u16::from(low) + u16::from(high)).div_ceil(2) as u8),
        None => Some(low),
    }
}
