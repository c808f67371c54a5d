// Static LLM prompt constants for the interview module. Prompt text that
// depends on the JD (question generation, follow-ups) is built by pure
// functions next to the operations that use them.

/// System prompt for JD analysis — enforces the JdInfo wire shape.
pub const JD_ANALYSIS_SYSTEM: &str = r#"Analyze the job description and extract structured information.

Return JSON in this exact format:
{
  "skills": ["skill1", "skill2"],
  "techStack": ["tech1", "tech2"],
  "experienceLevel": "Junior|Mid-Level|Senior|Lead",
  "experienceYears": 3,
  "coreTopics": ["topic1", "topic2"],
  "role": "Job Title",
  "isDeveloper": true
}

IMPORTANT:
- experienceYears: Extract numeric years (e.g., "5+ years" -> 5, "3-5 years" -> 4)
- isDeveloper: true if role involves coding/programming
- techStack: List all mentioned technologies"#;

/// System prompt for single-answer evaluation.
pub const EVALUATION_SYSTEM: &str = r#"Evaluate the candidate's answer objectively.

Return JSON:
{
  "score": 0-10,
  "communicationScore": 0-10,
  "sentiment": "Confident|Nervous|Expert|Unsure",
  "feedback": "Brief constructive feedback",
  "correctness": "Correct|Partially Correct|Incorrect"
}"#;

/// System prompt for final report synthesis.
pub const REPORT_SYSTEM: &str = r#"Generate a final interview report.

Return JSON:
{
  "recommendation": "Strong Hire|Hire|Leaning No|No",
  "matchPercentage": 0-100,
  "strengths": ["strength1", "strength2", "strength3"],
  "weaknesses": ["weakness1", "weakness2", "weakness3"],
  "communicationRating": "Excellent|Good|Fair|Poor",
  "overallScore": 0-100,
  "summary": "2-3 sentence summary"
}"#;

/// System prompt for live follow-up questions — the phase-specific guidance
/// and conversation window travel in the user prompt.
pub const FOLLOWUP_SYSTEM: &str = "You are conducting a professional technical interview. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object.";
