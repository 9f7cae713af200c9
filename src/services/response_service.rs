use std::{collections::HashSet, sync::Arc};

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Answer, Question, QuestionKind, Quiz, Response},
        dto::{AnswerInput, AnswerValue, SubmitResponseRequest},
    },
    repositories::{QuizRepository, ResponseRepository},
};

pub struct ResponseService {
    quizzes: Arc<dyn QuizRepository>,
    responses: Arc<dyn ResponseRepository>,
}

impl ResponseService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, responses: Arc<dyn ResponseRepository>) -> Self {
        Self { quizzes, responses }
    }

    /// Validates, grades and stores a quiz taker's answers.
    pub async fn submit(&self, request: SubmitResponseRequest) -> AppResult<Response> {
        request.validate()?;
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name must not be blank".to_string()));
        }

        let quiz = self
            .quizzes
            .find_by_id(&request.quiz_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz with id '{}' not found", request.quiz_id))
            })?;

        let answers = Self::grade(&quiz, &request.questions).inspect_err(|e| {
            log::info!("Rejected response to quiz {}: {}", quiz.id, e);
        })?;

        let response = Response::new(&quiz.id, name, answers, quiz.questions.len());
        let response = self.responses.create(response).await?;

        log::info!(
            "Stored response {} to quiz {} ({}/{})",
            response.id,
            quiz.id,
            response.score,
            response.total
        );
        Ok(response)
    }

    /// Responses to the user's current quiz, newest first, along with that
    /// quiz's id. A user without a quiz has no responses.
    pub async fn responses_for_owner(
        &self,
        user_id: &str,
    ) -> AppResult<(Option<String>, Vec<Response>)> {
        let Some(quiz) = self.quizzes.find_by_user(user_id).await?.into_iter().next() else {
            return Ok((None, Vec::new()));
        };

        let responses = self.responses.find_by_quiz(&quiz.id).await?;
        Ok((Some(quiz.id), responses))
    }

    /// Grades every submitted answer against `quiz`. Any malformed answer
    /// rejects the whole submission.
    pub fn grade(quiz: &Quiz, inputs: &[AnswerInput]) -> AppResult<Vec<Answer>> {
        let mut answered = HashSet::with_capacity(inputs.len());

        inputs
            .iter()
            .map(|input| {
                let question = quiz.question(&input.question_id).ok_or_else(|| {
                    AppError::ValidationError(format!(
                        "Question '{}' is not part of this quiz",
                        input.question_id
                    ))
                })?;

                if !answered.insert(question.id.as_str()) {
                    return Err(AppError::ValidationError(format!(
                        "Question '{}' was answered more than once",
                        question.id
                    )));
                }

                Self::grade_answer(question, &input.answer)
            })
            .collect()
    }

    fn grade_answer(question: &Question, answer: &AnswerValue) -> AppResult<Answer> {
        match (&question.kind, answer) {
            (QuestionKind::Checkbox { multiselect, choices }, AnswerValue::Choices(selected)) => {
                if selected.is_empty() {
                    return Err(AppError::ValidationError(format!(
                        "No choice selected for question '{}'",
                        question.id
                    )));
                }
                if !multiselect && selected.len() > 1 {
                    return Err(AppError::ValidationError(format!(
                        "Question '{}' takes a single choice",
                        question.id
                    )));
                }

                let selected_set: HashSet<&str> = selected.iter().map(String::as_str).collect();
                if selected_set.len() != selected.len() {
                    return Err(AppError::ValidationError(format!(
                        "Duplicate choice for question '{}'",
                        question.id
                    )));
                }
                if let Some(unknown) = selected_set
                    .iter()
                    .find(|id| !choices.iter().any(|c| c.id == **id))
                {
                    return Err(AppError::ValidationError(format!(
                        "Choice '{}' is not part of question '{}'",
                        unknown, question.id
                    )));
                }

                let correct_set: HashSet<&str> = choices
                    .iter()
                    .filter(|c| c.answer)
                    .map(|c| c.id.as_str())
                    .collect();

                Ok(Answer::Checkbox {
                    question_id: question.id.clone(),
                    choice_ids: selected.clone(),
                    correct: selected_set == correct_set,
                })
            }
            (QuestionKind::Slider { min, max, answer }, AnswerValue::Value(value)) => {
                if value < min || value > max {
                    return Err(AppError::ValidationError(format!(
                        "Answer to question '{}' must be between {} and {}",
                        question.id, min, max
                    )));
                }

                let tolerance = ((max - min) / 10).max(1);
                Ok(Answer::Slider {
                    question_id: question.id.clone(),
                    value: *value,
                    correct: (value - answer).abs() <= tolerance,
                })
            }
            (QuestionKind::Checkbox { .. }, AnswerValue::Value(_)) => {
                Err(AppError::ValidationError(format!(
                    "Question '{}' expects a list of choice ids",
                    question.id
                )))
            }
            (QuestionKind::Slider { .. }, AnswerValue::Choices(_)) => {
                Err(AppError::ValidationError(format!(
                    "Question '{}' expects a number",
                    question.id
                )))
            }
        }
    }
}
