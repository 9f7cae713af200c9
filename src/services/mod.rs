pub mod quiz_service;
pub mod response_service;
pub mod session_service;

pub use quiz_service::QuizService;
pub use response_service::ResponseService;
pub use session_service::SessionService;
