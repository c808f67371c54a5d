//! Interview orchestration — the sole surface other subsystems call.
//!
//! Every operation resolves the active provider through the injected
//! factory, builds its prompts, and runs one use case. No in-memory session
//! state: each call receives everything it needs as arguments, so callers
//! may run evaluations for different questions concurrently.
//!
//! Error policy (must hold exactly):
//! - JD analysis, question generation, follow-ups: propagate.
//! - Answer evaluation, final report: substitute documented fallbacks.
//! - Health probe: collapses every failure to `false`.

use std::sync::Arc;

use tracing::warn;

use crate::interview::evaluation::{self, Evaluation};
use crate::interview::jd::{self, JdInfo};
use crate::interview::questions::{self, Question, QuestionType};
use crate::interview::report::{self, FinalReport};
use crate::providers::factory::ProviderFactory;
use crate::providers::{Message, ProviderError};

#[derive(Clone)]
pub struct InterviewService {
    factory: Arc<ProviderFactory>,
}

impl InterviewService {
    pub fn new(factory: Arc<ProviderFactory>) -> Self {
        Self { factory }
    }

    /// Extracts structured role info from a raw job description.
    pub async fn analyze_job_description(
        &self,
        job_description: &str,
    ) -> Result<JdInfo, ProviderError> {
        let provider = self.factory.current()?;
        jd::analyze_job_description(provider.as_ref(), job_description).await
    }

    /// Generates the full question set for an interview.
    pub async fn generate_questions(
        &self,
        jd_info: &JdInfo,
        count: usize,
    ) -> Result<Vec<Question>, ProviderError> {
        let provider = self.factory.current()?;
        questions::generate_interview_questions(provider.as_ref(), jd_info, count).await
    }

    /// Returns the next question for a live session: the fixed introduction
    /// when the conversation is empty, otherwise a provider-generated
    /// follow-up for the requested phase.
    pub async fn next_question(
        &self,
        jd_info: &JdInfo,
        history: &[Message],
        phase: QuestionType,
    ) -> Result<Question, ProviderError> {
        if history.is_empty() {
            return Ok(questions::introduction_question());
        }
        let provider = self.factory.current()?;
        questions::generate_followup_question(provider.as_ref(), jd_info, history, phase).await
    }

    /// Scores one answer. Infallible by design — provider resolution
    /// failures get the same fallback as call failures.
    pub async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        expected_points: &[String],
    ) -> Evaluation {
        match self.factory.current() {
            Ok(provider) => {
                evaluation::evaluate_answer(provider.as_ref(), question, answer, expected_points)
                    .await
            }
            Err(e) => {
                warn!("Provider resolution failed for evaluation: {e}");
                Evaluation::fallback()
            }
        }
    }

    /// Synthesizes the final report. Infallible by design.
    pub async fn generate_final_report(
        &self,
        jd_info: &JdInfo,
        evaluations: &[Evaluation],
    ) -> FinalReport {
        match self.factory.current() {
            Ok(provider) => {
                report::generate_final_report(provider.as_ref(), jd_info, evaluations).await
            }
            Err(e) => {
                warn!("Provider resolution failed for report: {e}");
                FinalReport::fallback(report::average_score(evaluations))
            }
        }
    }

    /// Liveness of the currently configured provider. Never errors: a
    /// factory failure (bad config) reads the same as an unreachable
    /// backend.
    pub async fn provider_health(&self) -> bool {
        match self.factory.current() {
            Ok(provider) => provider.health_check().await,
            Err(e) => {
                warn!("Provider resolution failed during health check: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::report::Recommendation;
    use crate::providers::factory::ProviderSettings;

    /// A factory with no credentials: resolving the default (deepseek)
    /// provider fails with a configuration error.
    fn unconfigured_service() -> InterviewService {
        InterviewService::new(Arc::new(ProviderFactory::new(ProviderSettings::default())))
    }

    fn any_jd() -> JdInfo {
        JdInfo {
            role: "Backend Engineer".to_string(),
            skills: vec![],
            tech_stack: vec![],
            experience_level: None,
            experience_years: Some(5),
            core_topics: vec![],
            is_developer: true,
        }
    }

    #[tokio::test]
    async fn test_analysis_propagates_configuration_error() {
        let service = unconfigured_service();
        let result = service.analyze_job_description("Senior Rust Engineer").await;
        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_evaluation_swallows_configuration_error_into_fallback() {
        let service = unconfigured_service();
        let evaluation = service.evaluate_answer("q", "a", &[]).await;
        assert_eq!(evaluation.score, 7.0);
    }

    #[tokio::test]
    async fn test_report_swallows_configuration_error_into_fallback() {
        let service = unconfigured_service();
        let report = service.generate_final_report(&any_jd(), &[]).await;
        assert_eq!(report.recommendation, Recommendation::LeaningNo);
        assert_eq!(report.overall_score, 0);
    }

    #[tokio::test]
    async fn test_provider_health_is_false_on_bad_config_and_never_panics() {
        let service = unconfigured_service();
        assert!(!service.provider_health().await);
    }

    #[tokio::test]
    async fn test_next_question_with_empty_history_needs_no_provider() {
        // Works even with an unconfigured factory: the introduction is fixed.
        let service = unconfigured_service();
        let question = service.next_question(&any_jd(), &[], QuestionType::Intro).await.unwrap();
        assert_eq!(question.question_type, QuestionType::Intro);
    }
}
