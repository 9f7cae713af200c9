use std::sync::Arc;

use rand::Rng;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Quiz,
    quiz::{build_questions, UserData},
    repositories::{QuizRepository, ResponseRepository},
    spotify::SpotifyApi,
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    responses: Arc<dyn ResponseRepository>,
}

impl QuizService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, responses: Arc<dyn ResponseRepository>) -> Self {
        Self { quizzes, responses }
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        let quiz = self
            .quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

        Ok(quiz)
    }

    /// The user's current quiz, if they have one.
    pub async fn find_for_user(&self, user_id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.find_by_user(user_id).await?.into_iter().next())
    }

    /// Builds a fresh quiz from the user's Spotify data and makes it their
    /// only quiz. Earlier quizzes and their responses are deleted, but only
    /// once the new quiz has been stored.
    pub async fn create_quiz<R: Rng + ?Sized>(
        &self,
        api: &dyn SpotifyApi,
        user_id: &str,
        rng: &mut R,
    ) -> AppResult<Quiz> {
        let mut data = UserData::new(api);
        let display_name = data.personal_data().await?.name().to_string();

        let questions = build_questions(&mut data, rng).await?.ok_or_else(|| {
            log::warn!("Not enough listening data to build a quiz for {}", user_id);
            AppError::InsufficientData(
                "Listen to more music on Spotify and try again".to_string(),
            )
        })?;

        let old_ids: Vec<String> = self
            .quizzes
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();

        let quiz = self
            .quizzes
            .create(Quiz::new(user_id, &display_name, questions))
            .await?;

        log::info!(
            "Created quiz {} with {} questions for {}",
            quiz.id,
            quiz.questions.len(),
            user_id
        );

        self.delete_quizzes(&old_ids, user_id).await?;
        Ok(quiz)
    }

    async fn delete_quizzes(&self, ids: &[String], user_id: &str) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let responses = self.responses.delete_by_quiz_ids(ids).await?;
        let quizzes = self.quizzes.delete_by_ids(ids).await?;
        log::info!(
            "Deleted {} old quizzes and {} responses for {}",
            quizzes,
            responses,
            user_id
        );
        Ok(())
    }
}
