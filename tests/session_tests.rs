
use quizsmith::grader::{AnswerChoice, UserAnswers};
use quizsmith::parser::parse;
use quizsmith::{QuizSession, SessionError};
use std::time::{Duration, Instant};
use test_utils::SAMPLE_QUIZ;

fn started_session(limit_secs: u64, now: Instant) -> QuizSession {
    let mut session = QuizSession::new(Duration::from_secs(limit_secs));
    session.start_at(parse(SAMPLE_QUIZ).unwrap(), now);
    session
}

#[test]
fn empty_session_has_nothing_to_show() {
    let session = QuizSession::new(Duration::from_secs(60));

    assert!(!session.has_quiz());
    assert_eq!(session.questions_text(), None);
    assert!(!session.time_exceeded());
    assert_eq!(session.answer_reveal(), Err(SessionError::NoQuiz));
}

#[test]
fn submit_before_generation_is_premature() {
    let session = QuizSession::new(Duration::from_secs(60));
    assert_eq!(session.submit(3), Err(SessionError::PrematureSubmission));
    assert_eq!(
        SessionError::PrematureSubmission.to_string(),
        "Please generate a quiz and answer the questions first."
    );
}

#[test]
fn answers_before_generation_are_ignored() {
    let mut session = QuizSession::new(Duration::from_secs(60));
    assert!(!session.record_answers(UserAnswers::new().with(1, AnswerChoice::B)));
    assert!(session.user_answers().is_none());
    assert_eq!(session.submit(1), Err(SessionError::PrematureSubmission));
}

#[test]
fn submit_after_generation_without_answers_is_premature() {
    let session = started_session(60, Instant::now());
    assert_eq!(session.submit(3), Err(SessionError::PrematureSubmission));
}

#[test]
fn full_round_trip_scores_latest_answers() {
    let mut session = started_session(60, Instant::now());
    assert!(session.has_quiz());
    assert!(session.questions_text().unwrap().contains("Hash map"));

    let first = UserAnswers::new()
        .with(1, AnswerChoice::A)
        .with(2, AnswerChoice::A)
        .with(3, AnswerChoice::A);
    assert!(session.record_answers(first));
    assert_eq!(session.submit(3).unwrap().score, 1);

    // the next render replaces the whole set, question 3 is no longer answered
    let second = UserAnswers::new().with(1, AnswerChoice::B).with(2, AnswerChoice::A);
    assert!(session.record_answers(second));
    let report = session.submit(3).unwrap();
    assert_eq!(report.score, 2);
    assert_eq!(session.user_answers().unwrap().get(3), None);
}

#[test]
fn reveal_returns_both_halves() {
    let session = started_session(60, Instant::now());
    let (questions, answers) = session.answer_reveal().unwrap();
    assert!(questions.starts_with("- Questions:"));
    assert_eq!(answers, "1: b\n2: a\n3: c");
}

#[test]
fn timer_is_polled_not_enforced() {
    let start = Instant::now();
    let mut session = started_session(10, start);

    assert!(!session.time_exceeded_at(start + Duration::from_secs(10)));
    assert!(session.time_exceeded_at(start + Duration::from_secs(11)));

    // answers stay editable and gradable after the limit
    assert!(session.record_answers(UserAnswers::new().with(1, AnswerChoice::B)));
    assert_eq!(session.submit(3).unwrap().score, 1);
}

#[test]
fn regenerating_restarts_the_clock() {
    let start = Instant::now();
    let mut session = started_session(5, start);
    let later = start + Duration::from_secs(20);
    assert!(session.time_exceeded_at(later));

    session.start_at(parse("1. Q\nAnswers:\n1: d").unwrap(), later);
    assert!(!session.time_exceeded_at(later + Duration::from_secs(5)));
    assert_eq!(session.answer_reveal().unwrap().1, "1: d");
}

#[test]
fn regenerating_discards_previous_answers() {
    let mut session = started_session(60, Instant::now());
    let stale = UserAnswers::new().with(1, AnswerChoice::A).with(2, AnswerChoice::A);
    assert!(session.record_answers(stale));
    assert!(session.submit(2).is_ok());

    session.start(parse("1. Q\nAnswers:\n1: a\n2: a").unwrap());

    assert!(session.user_answers().is_none());
    assert_eq!(session.submit(2), Err(SessionError::PrematureSubmission));
}

#[test]
fn sessions_are_independent() {
    let mut alice = started_session(60, Instant::now());
    let bob = QuizSession::new(Duration::from_secs(60));

    alice.record_answers(UserAnswers::new().with(1, AnswerChoice::B));
    assert!(alice.submit(1).is_ok());
    assert_eq!(bob.submit(1), Err(SessionError::PrematureSubmission));
}
