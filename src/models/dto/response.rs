use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Quiz, Response};

#[derive(Debug, Serialize)]
pub struct QuizCreatedResponse {
    pub id: String,
    pub share_url: String,
    pub question_count: usize,
}

impl QuizCreatedResponse {
    pub fn new(quiz: &Quiz, share_url: String) -> Self {
        Self {
            id: quiz.id.clone(),
            share_url,
            question_count: quiz.questions.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerResultDto {
    pub question_id: String,
    pub correct: bool,
}

#[derive(Debug, Serialize)]
pub struct ResponseResultDto {
    pub id: String,
    pub quiz_id: String,
    pub name: String,
    pub score: u32,
    pub total: u32,
    pub submitted_at: DateTime<Utc>,
    pub answers: Vec<AnswerResultDto>,
}

impl From<&Response> for ResponseResultDto {
    fn from(response: &Response) -> Self {
        ResponseResultDto {
            id: response.id.clone(),
            quiz_id: response.quiz_id.clone(),
            name: response.name.clone(),
            score: response.score,
            total: response.total,
            submitted_at: response.submitted_at,
            answers: response
                .answers
                .iter()
                .map(|a| AnswerResultDto {
                    question_id: a.question_id().to_string(),
                    correct: a.is_correct(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseListDto {
    pub quiz_id: Option<String>,
    pub responses: Vec<ResponseResultDto>,
}
