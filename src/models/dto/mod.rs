pub mod quiz_dto;
pub mod request;
pub mod response;

pub use quiz_dto::{ChoiceDto, QuestionDto, QuizDto};
pub use request::{AnswerInput, AnswerValue, CallbackParams, LoginParams, SubmitResponseRequest};
pub use response::{QuizCreatedResponse, ResponseListDto, ResponseResultDto};
