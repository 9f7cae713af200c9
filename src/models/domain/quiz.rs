use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::Question;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub user_id: String, // Spotify user id of the owner
    pub display_name: String,
    pub questions: Vec<Question>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(user_id: &str, display_name: &str, questions: Vec<Question>) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            questions,
            created_at: Utc::now(),
        }
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_lookup() {
        let question = Question::slider("How many?", 0, 10, 5).unwrap();
        let id = question.id.clone();
        let quiz = Quiz::new("owner", "Owner", vec![question]);

        assert!(quiz.question(&id).is_some());
        assert!(quiz.question("missing").is_none());
        assert_ne!(quiz.id, id);
    }
}
