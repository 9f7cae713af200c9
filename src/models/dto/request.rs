use serde::{Deserialize, Serialize};
use validator::Validate;

/// A submitted answer: choice ids for checkbox questions, a number for sliders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choices(Vec<String>),
    Value(i64),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerInput {
    pub question_id: String,
    pub answer: AnswerValue,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SubmitResponseRequest {
    pub quiz_id: String,

    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    pub name: String,

    pub questions: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginParams {
    /// Path to return to after logging in.
    pub next: Option<String>,
}

/// Query string Spotify sends back to the redirect URI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub state: Option<String>,
}

/// Only same-site absolute paths are accepted as post-login destinations.
/// Browsers drop tabs and newlines from a `Location`, so any whitespace or
/// control character rejects the path.
pub fn safe_redirect_path(path: Option<&str>) -> String {
    match path {
        Some(p)
            if p.starts_with('/')
                && !p.starts_with("//")
                && !p.contains('\\')
                && !p.chars().any(|c| c.is_whitespace() || c.is_control()) =>
        {
            p.to_string()
        }
        _ => "/dashboard".to_string(),
    }
}
