use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Choice {
    pub id: String,
    pub primary_text: String,
    pub secondary_text: Option<String>,
    pub image_url: Option<String>,
    pub answer: bool,
}

impl Choice {
    pub fn new(
        primary_text: impl Into<String>,
        secondary_text: Option<String>,
        image_url: Option<String>,
        answer: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            primary_text: primary_text.into(),
            secondary_text,
            image_url,
            answer,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Checkbox {
        multiselect: bool,
        choices: Vec<Choice>,
    },
    Slider {
        min: i64,
        max: i64,
        answer: i64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub kind: QuestionKind,
}

impl Question {
    /// A checkbox question needs at least one correct choice.
    pub fn checkbox(text: impl Into<String>, multiselect: bool, choices: Vec<Choice>) -> Option<Self> {
        if !choices.iter().any(|c| c.answer) {
            return None;
        }

        Some(Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            kind: QuestionKind::Checkbox {
                multiselect,
                choices,
            },
        })
    }

    /// A slider question needs `min < max` and the answer inside the range.
    pub fn slider(text: impl Into<String>, min: i64, max: i64, answer: i64) -> Option<Self> {
        if min >= max || answer < min || answer > max {
            return None;
        }

        Some(Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            kind: QuestionKind::Slider { min, max, answer },
        })
    }

    pub fn is_slider(&self) -> bool {
        matches!(self.kind, QuestionKind::Slider { .. })
    }

    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            QuestionKind::Checkbox { choices, .. } => choices,
            QuestionKind::Slider { .. } => &[],
        }
    }
}
