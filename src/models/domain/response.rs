use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One graded answer within a response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Answer {
    Checkbox {
        question_id: String,
        choice_ids: Vec<String>,
        correct: bool,
    },
    Slider {
        question_id: String,
        value: i64,
        correct: bool,
    },
}

impl Answer {
    pub fn question_id(&self) -> &str {
        match self {
            Answer::Checkbox { question_id, .. } | Answer::Slider { question_id, .. } => question_id,
        }
    }

    pub fn is_correct(&self) -> bool {
        match self {
            Answer::Checkbox { correct, .. } | Answer::Slider { correct, .. } => *correct,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Response {
    pub id: String,
    pub quiz_id: String,
    pub name: String,
    pub answers: Vec<Answer>,
    pub score: u32,
    pub total: u32,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub submitted_at: DateTime<Utc>,
}

impl Response {
    pub fn new(quiz_id: &str, name: &str, answers: Vec<Answer>, total: usize) -> Self {
        let score = answers.iter().filter(|a| a.is_correct()).count() as u32;

        Response {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            name: name.to_string(),
            answers,
            score,
            total: total as u32,
            submitted_at: Utc::now(),
        }
    }
}
