//! Per-user quiz state: the parsed quiz, the latest answers and the timer.
//!
//! A `QuizSession` is an ordinary owned value. Each quiz-taker gets their own;
//! nothing here is shared or locked.

use crate::error::SessionError;
use crate::grader::{self, GradeReport, UserAnswers};
use crate::parser::ParsedQuiz;
use crate::timer::QuizTimer;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct QuizSession {
    time_limit: Duration,
    quiz: Option<ParsedQuiz>,
    user_answers: Option<UserAnswers>,
    timer: Option<QuizTimer>,
}

impl QuizSession {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit,
            quiz: None,
            user_answers: None,
            timer: None,
        }
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Install a freshly generated quiz and restart the clock.
    pub fn start(&mut self, quiz: ParsedQuiz) {
        self.start_at(quiz, Instant::now());
    }

    /// Answers recorded for a previous quiz are dropped.
    pub fn start_at(&mut self, quiz: ParsedQuiz, now: Instant) {
        info!(target = "quizsmith::session", limit_secs = self.time_limit.as_secs(), "quiz started");
        self.quiz = Some(quiz);
        self.user_answers = None;
        self.timer = Some(QuizTimer::started_at(now, self.time_limit));
    }

    pub fn has_quiz(&self) -> bool {
        self.quiz.is_some()
    }

    pub fn quiz(&self) -> Option<&ParsedQuiz> {
        self.quiz.as_ref()
    }

    pub fn questions_text(&self) -> Option<&str> {
        self.quiz.as_ref().map(ParsedQuiz::questions_text)
    }

    pub fn user_answers(&self) -> Option<&UserAnswers> {
        self.user_answers.as_ref()
    }

    pub fn timer(&self) -> Option<&QuizTimer> {
        self.timer.as_ref()
    }

    /// Replace the stored answers with the latest full render. Returns false
    /// and stores nothing while no quiz exists.
    pub fn record_answers(&mut self, answers: UserAnswers) -> bool {
        if self.quiz.is_none() {
            debug!(target = "quizsmith::session", "ignoring answers, no quiz yet");
            return false;
        }
        self.user_answers = Some(answers);
        true
    }

    pub fn submit(&self, num_questions: u32) -> Result<GradeReport, SessionError> {
        let (quiz, answers) = match (&self.quiz, &self.user_answers) {
            (Some(quiz), Some(answers)) => (quiz, answers),
            _ => {
                warn!(target = "quizsmith::session", "submit before any answers were recorded");
                return Err(SessionError::PrematureSubmission);
            }
        };
        Ok(grader::score(answers, quiz.answers_text(), num_questions))
    }

    /// Questions and answer key, for the Show-Answers action.
    pub fn answer_reveal(&self) -> Result<(&str, &str), SessionError> {
        self.quiz
            .as_ref()
            .map(|quiz| (quiz.questions_text(), quiz.answers_text()))
            .ok_or(SessionError::NoQuiz)
    }

    pub fn time_exceeded(&self) -> bool {
        self.time_exceeded_at(Instant::now())
    }

    pub fn time_exceeded_at(&self, now: Instant) -> bool {
        self.timer.is_some_and(|timer| timer.is_expired_at(now))
    }
}
