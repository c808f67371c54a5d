//! Final report synthesis from the full evaluation list.
//!
//! The average score is computed locally, not by the provider — the model
//! only adds the qualitative synthesis on top. Like answer evaluation, this
//! never fails: a completed interview always yields some report, even with
//! the provider down.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interview::evaluation::{Correctness, Evaluation};
use crate::interview::jd::JdInfo;
use crate::interview::prompts::REPORT_SYSTEM;
use crate::providers::{generate_typed, AiProvider, CompletionOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Hire")]
    StrongHire,
    Hire,
    #[serde(rename = "Leaning No")]
    LeaningNo,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunicationRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub recommendation: Recommendation,
    pub match_percentage: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub communication_rating: CommunicationRating,
    pub overall_score: u8,
    pub summary: String,
}

impl FinalReport {
    /// Deterministic fallback derived purely from the local average score.
    pub fn fallback(avg_score: f64) -> Self {
        let scaled = (avg_score * 10.0).round().clamp(0.0, 100.0) as u8;
        Self {
            recommendation: if avg_score >= 7.0 {
                Recommendation::Hire
            } else {
                Recommendation::LeaningNo
            },
            match_percentage: scaled,
            strengths: vec![
                "Good technical understanding".to_string(),
                "Clear communication".to_string(),
            ],
            weaknesses: vec!["Could provide more detailed examples".to_string()],
            communication_rating: CommunicationRating::Good,
            overall_score: scaled,
            summary: "Candidate shows solid understanding of required technologies.".to_string(),
        }
    }

    /// Clamps model-reported percentages into the 0-100 range.
    fn sanitized(mut self) -> Self {
        self.match_percentage = self.match_percentage.min(100);
        self.overall_score = self.overall_score.min(100);
        self
    }
}

/// Mean of all evaluation scores. Empty input counts as zero rather than NaN.
pub(crate) fn average_score(evaluations: &[Evaluation]) -> f64 {
    if evaluations.is_empty() {
        return 0.0;
    }
    evaluations.iter().map(|e| f64::from(e.score)).sum::<f64>() / evaluations.len() as f64
}

pub(crate) fn report_user_prompt(
    jd_info: &JdInfo,
    evaluations: &[Evaluation],
    avg_score: f64,
) -> String {
    let correct_count = evaluations
        .iter()
        .filter(|e| e.correctness == Correctness::Correct)
        .count();

    format!(
        "Role: {role}\nAverage Score: {avg_score:.1}/10\nTotal Questions: {total}\nCorrect Answers: {correct_count}\n\nGenerate final report.",
        role = jd_info.role,
        total = evaluations.len(),
    )
}

/// Synthesizes the final report. Never propagates — see the module docs.
pub async fn generate_final_report(
    provider: &dyn AiProvider,
    jd_info: &JdInfo,
    evaluations: &[Evaluation],
) -> FinalReport {
    let avg_score = average_score(evaluations);
    let user_prompt = report_user_prompt(jd_info, evaluations, avg_score);

    match generate_typed::<FinalReport>(
        provider,
        REPORT_SYSTEM,
        &user_prompt,
        &CompletionOptions::default(),
    )
    .await
    {
        Ok(report) => report.sanitized(),
        Err(e) => {
            warn!("Report generation failed, substituting fallback: {e}");
            FinalReport::fallback(avg_score)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::evaluation::Sentiment;
    use crate::providers::test_support::MockProvider;

    fn evaluation_scoring(score: f32, correctness: Correctness) -> Evaluation {
        Evaluation {
            score,
            communication_score: score,
            sentiment: Sentiment::Confident,
            feedback: String::new(),
            correctness,
        }
    }

    fn backend_jd() -> JdInfo {
        JdInfo {
            role: "Senior Backend Engineer".to_string(),
            skills: vec![],
            tech_stack: vec!["Node.js".to_string()],
            experience_level: None,
            experience_years: Some(5),
            core_topics: vec![],
            is_developer: true,
        }
    }

    #[test]
    fn test_average_score_is_mean_of_scores() {
        let evaluations = vec![
            evaluation_scoring(6.0, Correctness::Correct),
            evaluation_scoring(8.0, Correctness::Incorrect),
        ];
        assert_eq!(average_score(&evaluations), 7.0);
        assert_eq!(average_score(&[]), 0.0);
    }

    #[test]
    fn test_report_prompt_carries_local_grounding_context() {
        let evaluations = vec![
            evaluation_scoring(8.0, Correctness::Correct),
            evaluation_scoring(7.0, Correctness::PartiallyCorrect),
            evaluation_scoring(9.0, Correctness::Correct),
        ];
        let prompt = report_user_prompt(&backend_jd(), &evaluations, average_score(&evaluations));

        assert!(prompt.contains("Average Score: 8.0/10"));
        assert!(prompt.contains("Total Questions: 3"));
        assert!(prompt.contains("Correct Answers: 2"));
    }

    #[tokio::test]
    async fn test_fallback_recommends_hire_at_seven_or_above() {
        let provider = MockProvider::failing();
        let evaluations = vec![
            evaluation_scoring(7.0, Correctness::Correct),
            evaluation_scoring(8.0, Correctness::Correct),
        ];

        let report = generate_final_report(&provider, &backend_jd(), &evaluations).await;
        assert_eq!(report.recommendation, Recommendation::Hire);
        // round(7.5 * 10) = 75
        assert_eq!(report.match_percentage, 75);
        assert_eq!(report.overall_score, 75);
        assert_eq!(report.communication_rating, CommunicationRating::Good);
    }

    #[tokio::test]
    async fn test_fallback_leans_no_below_seven() {
        let provider = MockProvider::failing();
        let evaluations = vec![
            evaluation_scoring(5.0, Correctness::Incorrect),
            evaluation_scoring(6.0, Correctness::PartiallyCorrect),
        ];

        let report = generate_final_report(&provider, &backend_jd(), &evaluations).await;
        assert_eq!(report.recommendation, Recommendation::LeaningNo);
        assert_eq!(report.overall_score, 55);
        assert!(!report.strengths.is_empty());
        assert!(!report.summary.is_empty());
    }

    #[tokio::test]
    async fn test_valid_reply_is_parsed_and_percentages_clamped() {
        let provider = MockProvider::replying(
            r#"{
                "recommendation": "Strong Hire",
                "matchPercentage": 112,
                "strengths": ["Depth in distributed systems"],
                "weaknesses": ["Sparse on testing practices"],
                "communicationRating": "Excellent",
                "overallScore": 91,
                "summary": "Consistently strong technical answers."
            }"#,
        );

        let report = generate_final_report(
            &provider,
            &backend_jd(),
            &[evaluation_scoring(9.0, Correctness::Correct)],
        )
        .await;

        assert_eq!(report.recommendation, Recommendation::StrongHire);
        assert_eq!(report.match_percentage, 100);
        assert_eq!(report.overall_score, 91);
    }

    #[test]
    fn test_recommendation_wire_forms() {
        assert_eq!(
            serde_json::to_string(&Recommendation::StrongHire).unwrap(),
            r#""Strong Hire""#
        );
        assert_eq!(
            serde_json::to_string(&Recommendation::LeaningNo).unwrap(),
            r#""Leaning No""#
        );
        let parsed: Recommendation = serde_json::from_str(r#""No""#).unwrap();
        assert_eq!(parsed, Recommendation::No);
    }
}
