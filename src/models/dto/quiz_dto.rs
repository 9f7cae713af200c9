use serde::Serialize;

use crate::models::domain::{Choice, Question, QuestionKind, Quiz};

/// Quiz as shown to quiz takers. Correct answers are never included.
#[derive(Debug, Clone, Serialize)]
pub struct QuizDto {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionDto {
    Mc {
        id: String,
        text: String,
        choices: Vec<ChoiceDto>,
    },
    Check {
        id: String,
        text: String,
        choices: Vec<ChoiceDto>,
    },
    Slider {
        id: String,
        text: String,
        min: i64,
        max: i64,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoiceDto {
    pub id: String,
    pub primary_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&Choice> for ChoiceDto {
    fn from(choice: &Choice) -> Self {
        ChoiceDto {
            id: choice.id.clone(),
            primary_text: choice.primary_text.clone(),
            secondary_text: choice.secondary_text.clone(),
            image_url: choice.image_url.clone(),
        }
    }
}

impl From<&Question> for QuestionDto {
    fn from(question: &Question) -> Self {
        let id = question.id.clone();
        let text = question.text.clone();

        match &question.kind {
            QuestionKind::Checkbox {
                multiselect,
                choices,
            } => {
                let choices = choices.iter().map(ChoiceDto::from).collect();
                if *multiselect {
                    QuestionDto::Check { id, text, choices }
                } else {
                    QuestionDto::Mc { id, text, choices }
                }
            }
            QuestionKind::Slider { min, max, .. } => QuestionDto::Slider {
                id,
                text,
                min: *min,
                max: *max,
            },
        }
    }
}

impl From<&Quiz> for QuizDto {
    fn from(quiz: &Quiz) -> Self {
        QuizDto {
            id: quiz.id.clone(),
            user_id: quiz.user_id.clone(),
            display_name: quiz.display_name.clone(),
            questions: quiz.questions.iter().map(QuestionDto::from).collect(),
        }
    }
}
