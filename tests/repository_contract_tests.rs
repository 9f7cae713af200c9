use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use spoton_server::{
    errors::{AppError, AppResult},
    models::domain::{Answer, Question, Quiz, Response, Session},
    repositories::{QuizRepository, ResponseRepository, SessionRepository},
};

struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::AlreadyExists(format!("Quiz '{}' already exists", quiz.id)));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Quiz>> {
        let mut found: Vec<Quiz> = self
            .quizzes
            .read()
            .await
            .values()
            .filter(|q| q.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> AppResult<u64> {
        let mut quizzes = self.quizzes.write().await;
        let before = quizzes.len();
        quizzes.retain(|id, _| !ids.contains(id));
        Ok((before - quizzes.len()) as u64)
    }
}

struct InMemoryResponseRepository {
    responses: Arc<RwLock<Vec<Response>>>,
}

impl InMemoryResponseRepository {
    fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ResponseRepository for InMemoryResponseRepository {
    async fn create(&self, response: Response) -> AppResult<Response> {
        let mut responses = self.responses.write().await;
        if responses.iter().any(|r| r.id == response.id) {
            return Err(AppError::AlreadyExists(format!(
                "Response '{}' already exists",
                response.id
            )));
        }
        responses.push(response.clone());
        Ok(response)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Response>> {
        let mut found: Vec<Response> = self
            .responses
            .read()
            .await
            .iter()
            .filter(|r| r.quiz_id == quiz_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(found)
    }

    async fn delete_by_quiz_ids(&self, quiz_ids: &[String]) -> AppResult<u64> {
        let mut responses = self.responses.write().await;
        let before = responses.len();
        responses.retain(|r| !quiz_ids.contains(&r.quiz_id));
        Ok((before - responses.len()) as u64)
    }
}

struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionRepository {
    fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: Session) -> AppResult<Session> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(AppError::AlreadyExists("Session already exists".to_string()));
        }
        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn replace(&self, session: &Session) -> AppResult<()> {
        match self.sessions.write().await.get_mut(&session.id) {
            Some(existing) => {
                *existing = session.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Session not found".to_string())),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }

    async fn delete_expired(&self, now: chrono::DateTime<Utc>) -> AppResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at >= now);
        Ok((before - sessions.len()) as u64)
    }
}

fn make_quiz(user_id: &str, age_secs: i64) -> Quiz {
    let question = Question::slider("How many followers does the user have?", 0, 10, 5)
        .expect("valid slider");
    let mut quiz = Quiz::new(user_id, "Owner", vec![question]);
    quiz.created_at = Utc::now() - Duration::seconds(age_secs);
    quiz
}

fn make_response(quiz_id: &str, name: &str, age_secs: i64) -> Response {
    let answer = Answer::Slider {
        question_id: "q1".to_string(),
        value: 5,
        correct: true,
    };
    let mut response = Response::new(quiz_id, name, vec![answer], 1);
    response.submitted_at = Utc::now() - Duration::seconds(age_secs);
    response
}

#[tokio::test]
async fn quiz_repository_create_find_and_delete() {
    let repo = InMemoryQuizRepository::new();

    let older = make_quiz("user-a", 60);
    let newer = make_quiz("user-a", 0);
    let other = make_quiz("user-b", 0);

    repo.create(older.clone()).await.expect("create older");
    repo.create(newer.clone()).await.expect("create newer");
    repo.create(other.clone()).await.expect("create other");

    let duplicate = repo.create(older.clone()).await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let found = repo.find_by_id(&newer.id).await.expect("find should work");
    assert_eq!(found.map(|q| q.id), Some(newer.id.clone()));
    assert!(repo.find_by_id("missing").await.expect("find should work").is_none());

    let by_user = repo.find_by_user("user-a").await.expect("query should work");
    let ids: Vec<&str> = by_user.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);

    assert_eq!(repo.delete_by_ids(&[]).await.expect("delete should work"), 0);

    let deleted = repo
        .delete_by_ids(&[older.id.clone(), newer.id.clone(), "missing".to_string()])
        .await
        .expect("delete should work");
    assert_eq!(deleted, 2);
    assert!(repo.find_by_user("user-a").await.expect("query should work").is_empty());
    assert!(repo.find_by_id(&other.id).await.expect("find should work").is_some());
}

#[tokio::test]
async fn response_repository_orders_newest_first_and_deletes_by_quiz() {
    let repo = InMemoryResponseRepository::new();

    let first = make_response("quiz-1", "Alice", 120);
    let second = make_response("quiz-1", "Bob", 0);
    let elsewhere = make_response("quiz-2", "Carol", 0);

    repo.create(first.clone()).await.expect("create first");
    repo.create(second.clone()).await.expect("create second");
    repo.create(elsewhere.clone()).await.expect("create elsewhere");

    let duplicate = repo.create(first.clone()).await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let names: Vec<String> = repo
        .find_by_quiz("quiz-1")
        .await
        .expect("query should work")
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Bob", "Alice"]);

    let none = repo.delete_by_quiz_ids(&[]).await.expect("delete should work");
    assert_eq!(none, 0);

    let deleted = repo
        .delete_by_quiz_ids(&["quiz-1".to_string(), "quiz-3".to_string()])
        .await
        .expect("delete should work");
    assert_eq!(deleted, 2);
    assert_eq!(repo.find_by_quiz("quiz-2").await.expect("query should work").len(), 1);
}

#[tokio::test]
async fn session_repository_replace_delete_and_expiry() {
    let repo = InMemorySessionRepository::new();

    let live = Session::new("user-a", "access", "refresh", 3600, 24);
    let mut stale = Session::new("user-b", "access", "refresh", 3600, 24);
    stale.expires_at = Utc::now() - Duration::hours(1);

    repo.create(live.clone()).await.expect("create live");
    repo.create(stale.clone()).await.expect("create stale");

    let mut refreshed = live.clone();
    refreshed.apply_refresh("new-access", 3600, Some("new-refresh"));
    repo.replace(&refreshed).await.expect("replace should work");

    let found = repo
        .find_by_id(&live.id)
        .await
        .expect("find should work")
        .expect("session exists");
    assert_eq!(found.access_token, "new-access");
    assert_eq!(found.refresh_token, "new-refresh");

    let missing = repo
        .replace(&Session::new("user-z", "a", "r", 3600, 24))
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let purged = repo.delete_expired(Utc::now()).await.expect("purge should work");
    assert_eq!(purged, 1);
    assert!(repo.find_by_id(&stale.id).await.expect("find should work").is_none());

    assert!(repo.delete(&live.id).await.expect("delete should work"));
    assert!(!repo.delete(&live.id).await.expect("delete should work"));
}
