//! Interview question generation — full question sets up front, plus live
//! follow-up questions driven by the conversation so far.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::interview::jd::JdInfo;
use crate::interview::prompts::FOLLOWUP_SYSTEM;
use crate::providers::{generate_typed, AiProvider, CompletionOptions, Message, ProviderError};

/// Questions requested per set when the caller doesn't say otherwise.
pub const DEFAULT_QUESTION_COUNT: usize = 20;

/// Experience years at or above which the senior prompt framing applies.
const SENIOR_EXPERIENCE_YEARS: u8 = 4;
/// Assumed when the JD analysis produced no estimate.
const FALLBACK_EXPERIENCE_YEARS: u8 = 3;

/// How many recent conversation turns a follow-up prompt carries.
const HISTORY_WINDOW: usize = 6;
/// Per-turn content cap inside the follow-up prompt.
const HISTORY_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Intro,
    Technical,
    Coding,
    Behavioral,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Intro => "intro",
            QuestionType::Technical => "technical",
            QuestionType::Coding => "coding",
            QuestionType::Behavioral => "behavioral",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default)]
    pub expected_points: Vec<String>,
}

/// The fixed opening question every interview starts with. No provider call.
pub fn introduction_question() -> Question {
    Question {
        text: "Tell me something about yourself, your background, and what makes you a good fit for this role.".to_string(),
        question_type: QuestionType::Intro,
        context: Some("Introduction - Getting to know the candidate".to_string()),
        expected_points: vec![
            "Professional background and experience".to_string(),
            "Relevant skills and achievements".to_string(),
            "Career goals and motivation for the role".to_string(),
        ],
    }
}

fn experience_years(jd_info: &JdInfo) -> u8 {
    jd_info.experience_years.unwrap_or(FALLBACK_EXPERIENCE_YEARS)
}

fn role_or_default(jd_info: &JdInfo) -> &str {
    if jd_info.role.is_empty() {
        "Software Developer"
    } else {
        &jd_info.role
    }
}

fn stack_slice(jd_info: &JdInfo, limit: usize) -> String {
    jd_info
        .tech_stack
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the question-set system prompt. Pure function of the JD info so
/// the senior/junior branching and the count distribution are testable
/// without a network call.
pub(crate) fn question_system_prompt(jd_info: &JdInfo, count: usize) -> String {
    let years = experience_years(jd_info);
    let is_experienced = years >= SENIOR_EXPERIENCE_YEARS;
    let technical_count = if is_experienced { 12 } else { 10 };
    let coding_count = if jd_info.is_developer { 4 } else { 0 };
    let tech_focus = stack_slice(jd_info, 6);

    let framing = if is_experienced {
        format!(
            r#"FOR SENIOR CANDIDATES ({years}+ years):
GOOD: "How would you optimize React performance in a large app with frequent state updates?"
GOOD: "Describe debugging a production memory leak in Node.js"
GOOD: "Design a distributed caching system for millions of requests"

BAD: "What is React?"
BAD: "Explain REST API"
BAD: "What are React hooks?""#
        )
    } else {
        r#"FOR JUNIOR/MID CANDIDATES:
- Mix fundamentals with practical applications
- Focus on understanding concepts with examples"#
            .to_string()
    };

    let behavioral_note = if is_experienced {
        " (focus on leadership, mentoring)"
    } else {
        ""
    };

    format!(
        r#"You are an expert technical interviewer generating deep, scenario-based questions.

CRITICAL REQUIREMENTS:
1. Generate questions appropriate for {years}+ years of experience
2. Focus on REAL-WORLD scenarios, not basic definitions
3. Ask HOW and WHY, not WHAT
4. Include: architecture, debugging, performance, trade-offs

{framing}

Return a JSON array of {count} questions in this format:
[
  {{
    "question": "The question text",
    "type": "intro|technical|coding|behavioral",
    "expectedPoints": ["point1", "point2", "point3"]
  }}
]

QUESTION DISTRIBUTION:
- 3 intro questions (background, experience, motivation)
- {technical_count} technical questions about: {tech_focus}
- {coding_count} coding/system design questions
- 4 behavioral questions{behavioral_note}"#
    )
}

/// Builds the question-set user prompt: role, up to 8 stack entries,
/// experience level, developer flag.
pub(crate) fn question_user_prompt(jd_info: &JdInfo, count: usize) -> String {
    format!(
        "Generate {count} interview questions for a {role} position.\n\
         Required tech stack: {stack}\n\
         Experience level: {years}+ years\n\
         Role type: {role_type}",
        role = role_or_default(jd_info),
        stack = stack_slice(jd_info, 8),
        years = experience_years(jd_info),
        role_type = if jd_info.is_developer {
            "Developer"
        } else {
            "Non-developer"
        },
    )
}

/// Generates the full question set for an interview. Failure propagates —
/// a missing question set blocks interview start, which is correct because
/// there is nothing to interview about.
pub async fn generate_interview_questions(
    provider: &dyn AiProvider,
    jd_info: &JdInfo,
    count: usize,
) -> Result<Vec<Question>, ProviderError> {
    let system_prompt = question_system_prompt(jd_info, count);
    let user_prompt = question_user_prompt(jd_info, count);

    let questions: Vec<Question> = generate_typed(
        provider,
        &system_prompt,
        &user_prompt,
        &CompletionOptions {
            temperature: Some(0.8),
            max_tokens: Some(3000),
        },
    )
    .await?;

    info!(
        "Generated {} questions with {}",
        questions.len(),
        provider.name()
    );
    Ok(questions)
}

/// Wire shape of a follow-up reply. The phase is stamped on afterwards —
/// the model is not trusted to classify its own question.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FollowupReply {
    question: String,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    expected_points: Vec<String>,
}

fn phase_guidance(phase: QuestionType, jd_info: &JdInfo) -> String {
    match phase {
        QuestionType::Intro => {
            "Ask an introductory question about their background, experience, or motivation."
                .to_string()
        }
        QuestionType::Technical => format!(
            "Ask a technical question related to: {}. Focus on concepts, best practices, or problem-solving approaches.",
            stack_slice(jd_info, 3)
        ),
        QuestionType::Coding => {
            "Ask a coding/algorithmic problem or ask them to explain how they would implement a specific feature. Focus on problem-solving and code design."
                .to_string()
        }
        QuestionType::Behavioral => {
            "Ask a behavioral question about teamwork, challenges, conflict resolution, or past experiences."
                .to_string()
        }
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Builds the follow-up user prompt from the JD, the phase, and a window of
/// the most recent conversation turns.
pub(crate) fn followup_user_prompt(
    jd_info: &JdInfo,
    history: &[Message],
    phase: QuestionType,
) -> String {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let recent = history[start..]
        .iter()
        .map(|m| {
            format!(
                "{}: {}",
                m.role.as_str(),
                truncate_chars(&m.content, HISTORY_SNIPPET_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are conducting an interview for the role: {role}
Current Phase: {phase}
Required Skills: {stack}

{guidance}

Recent conversation:
{recent}

Generate a {phase} question that hasn't been asked before. Return JSON:
{{
  "question": "string",
  "context": "brief explanation",
  "expectedPoints": ["max 3 key points to evaluate"]
}}"#,
        role = role_or_default(jd_info),
        stack = stack_slice(jd_info, 5),
        guidance = phase_guidance(phase, jd_info),
    )
}

/// Generates the next question for a live interview from the conversation
/// so far. Failure propagates — the caller decides how to keep the session
/// moving.
pub async fn generate_followup_question(
    provider: &dyn AiProvider,
    jd_info: &JdInfo,
    history: &[Message],
    phase: QuestionType,
) -> Result<Question, ProviderError> {
    let user_prompt = followup_user_prompt(jd_info, history, phase);

    let reply: FollowupReply = generate_typed(
        provider,
        FOLLOWUP_SYSTEM,
        &user_prompt,
        &CompletionOptions::default(),
    )
    .await?;

    Ok(Question {
        text: reply.question,
        question_type: phase,
        context: reply.context,
        expected_points: reply.expected_points,
    })
}
