pub mod question;
pub mod quiz;
pub mod response;
pub mod session;

pub use question::{Choice, Question, QuestionKind};
pub use quiz::Quiz;
pub use response::{Answer, Response};
pub use session::Session;
