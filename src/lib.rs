pub mod clients;
pub mod config;
pub mod core;
pub mod error;
pub mod grader;
pub mod interceptors;
pub mod parser;
pub mod prompt;
pub mod session;
pub mod timer;

// Convenient re-exports
pub use crate::core::{CompletionService, QuizGenerator, RetryConfig};
pub use error::{QuizError, SessionError};
pub use grader::{score, AnswerChoice, GradeReport, GradeWarning, UserAnswers};
pub use parser::{parse, ParsedQuiz};
pub use prompt::{Level, PromptTemplate, QuizRequest, QuizType};
pub use session::QuizSession;
