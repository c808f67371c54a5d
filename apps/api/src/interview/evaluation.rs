//! Answer evaluation — scores one answer against its expected points.
//!
//! This operation never fails: a single evaluation failure must not stall
//! or abort a live interview session, so provider errors are swallowed into
//! a fixed neutral-positive default. Availability over accuracy.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::prompts::EVALUATION_SYSTEM;
use crate::providers::{generate_typed, AiProvider, CompletionOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Confident,
    Nervous,
    Expert,
    Unsure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Correctness {
    Correct,
    #[serde(rename = "Partially Correct")]
    PartiallyCorrect,
    Incorrect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub score: f32,
    pub communication_score: f32,
    pub sentiment: Sentiment,
    pub feedback: String,
    pub correctness: Correctness,
}

impl Evaluation {
    /// The documented default substituted when the provider call fails.
    pub fn fallback() -> Self {
        Self {
            score: 7.0,
            communication_score: 7.0,
            sentiment: Sentiment::Confident,
            feedback: "Answer demonstrates understanding of the topic.".to_string(),
            correctness: Correctness::Correct,
        }
    }

    /// Clamps model-reported scores into the 0-10 range.
    fn sanitized(mut self) -> Self {
        self.score = self.score.clamp(0.0, 10.0);
        self.communication_score = self.communication_score.clamp(0.0, 10.0);
        self
    }
}

pub(crate) fn evaluation_user_prompt(
    question: &str,
    answer: &str,
    expected_points: &[String],
) -> String {
    format!(
        "Question: {question}\nAnswer: {answer}\nExpected Points: {points}\n\nEvaluate this answer.",
        points = expected_points.join(", "),
    )
}

/// Evaluates a single answer. Never propagates — see the module docs.
pub async fn evaluate_answer(
    provider: &dyn AiProvider,
    question: &str,
    answer: &str,
    expected_points: &[String],
) -> Evaluation {
    let user_prompt = evaluation_user_prompt(question, answer, expected_points);

    match generate_typed::<Evaluation>(
        provider,
        EVALUATION_SYSTEM,
        &user_prompt,
        &CompletionOptions::with_temperature(0.5),
    )
    .await
    {
        Ok(evaluation) => evaluation.sanitized(),
        Err(e) => {
            warn!("Answer evaluation failed, substituting default: {e}");
            Evaluation::fallback()
        }
    }
}
