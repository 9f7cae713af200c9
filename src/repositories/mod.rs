pub mod quiz_repository;
pub mod response_repository;
pub mod session_repository;

pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use response_repository::{MongoResponseRepository, ResponseRepository};
pub use session_repository::{MongoSessionRepository, SessionRepository};

#[cfg(test)]
pub use quiz_repository::MockQuizRepository;
#[cfg(test)]
pub use response_repository::MockResponseRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
