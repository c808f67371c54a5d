use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::evaluation::Evaluation;
use crate::interview::jd::JdInfo;
use crate::interview::questions::{Question, QuestionType, DEFAULT_QUESTION_COUNT};
use crate::interview::report::FinalReport;
use crate::providers::Message;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeJdRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionSetRequest {
    pub jd_info: JdInfo,
    #[serde(default = "default_question_count")]
    pub count: usize,
}

fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

#[derive(Debug, Deserialize)]
pub struct NextQuestionRequest {
    pub jd_info: JdInfo,
    #[serde(default)]
    pub history: Vec<Message>,
    pub phase: QuestionType,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub expected_points: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub jd_info: JdInfo,
    pub evaluations: Vec<Evaluation>,
}

#[derive(Debug, Serialize)]
pub struct ProviderHealthResponse {
    pub healthy: bool,
    pub provider: String,
}

/// POST /api/v1/interview/analyze-jd
pub async fn handle_analyze_jd(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeJdRequest>,
) -> Result<Json<JdInfo>, AppError> {
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description must not be empty".to_string(),
        ));
    }
    let jd_info = state
        .interview
        .analyze_job_description(&req.job_description)
        .await?;
    Ok(Json(jd_info))
}

/// POST /api/v1/interview/questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(req): Json<QuestionSetRequest>,
) -> Result<Json<Vec<Question>>, AppError> {
    let questions = state
        .interview
        .generate_questions(&req.jd_info, req.count)
        .await?;
    Ok(Json(questions))
}

/// POST /api/v1/interview/question/next
pub async fn handle_next_question(
    State(state): State<AppState>,
    Json(req): Json<NextQuestionRequest>,
) -> Result<Json<Question>, AppError> {
    let question = state
        .interview
        .next_question(&req.jd_info, &req.history, req.phase)
        .await?;
    Ok(Json(question))
}

/// POST /api/v1/interview/evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Json<Evaluation> {
    let evaluation = state
        .interview
        .evaluate_answer(&req.question, &req.answer, &req.expected_points)
        .await;
    Json(evaluation)
}

/// POST /api/v1/interview/report
pub async fn handle_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Json<FinalReport> {
    let report = state
        .interview
        .generate_final_report(&req.jd_info, &req.evaluations)
        .await;
    Json(report)
}

/// GET /api/v1/interview/health
pub async fn handle_provider_health(State(state): State<AppState>) -> Json<ProviderHealthResponse> {
    let healthy = state.interview.provider_health().await;
    Json(ProviderHealthResponse {
        healthy,
        provider: state.factory.default_type().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_set_request_defaults_count() {
        let json = serde_json::json!({
            "jd_info": {"role": "Backend Engineer", "isDeveloper": true}
        });
        let req: QuestionSetRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.count, 20);
    }

    #[test]
    fn test_next_question_request_accepts_chat_history() {
        let json = serde_json::json!({
            "jd_info": {"role": "Backend Engineer"},
            "history": [
                {"role": "assistant", "content": "Tell me about yourself."},
                {"role": "user", "content": "I build APIs."}
            ],
            "phase": "technical"
        });
        let req: NextQuestionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.history.len(), 2);
        assert_eq!(req.phase, QuestionType::Technical);
    }

    #[test]
    fn test_evaluate_request_expected_points_default_empty() {
        let json = serde_json::json!({"question": "q", "answer": "a"});
        let req: EvaluateRequest = serde_json::from_value(json).unwrap();
        assert!(req.expected_points.is_empty());
    }
}
