//! Recovers quiz structure from raw completion text.
//!
//! The only hard requirement on the text is a single `Answers:` marker
//! separating the question block from the answer key. [`ParsedQuiz::questions`]
//! does a best-effort line scan of the question block for display; grading
//! only ever looks at the answer key.

use crate::error::{ParseError, ParseErrorKind};
use crate::grader::{AnswerChoice, AnswerKey};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, instrument};

pub const ANSWERS_MARKER: &str = "Answers:";

const CONTEXT_CHARS: usize = 60;

/// Quiz text split at the answers marker, both halves trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuiz {
    questions_text: String,
    answers_text: String,
}

/// A numbered question and whatever lettered options followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub number: u32,
    pub text: String,
    pub options: Vec<(AnswerChoice, String)>,
}

/// Split `raw` at the `Answers:` marker, which must appear exactly once.
#[instrument(target = "quizsmith::parser", skip(raw), fields(raw_len = raw.len()))]
pub fn parse(raw: &str) -> Result<ParsedQuiz, ParseError> {
    let positions: Vec<usize> = raw.match_indices(ANSWERS_MARKER).map(|(i, _)| i).collect();

    match positions.as_slice() {
        [] => Err(ParseError {
            kind: ParseErrorKind::MissingMarker,
            context: excerpt(raw, 0),
        }),
        [pos] => {
            let questions = &raw[..*pos];
            let answers = &raw[pos + ANSWERS_MARKER.len()..];
            debug!(
                target = "quizsmith::parser",
                questions_len = questions.len(),
                answers_len = answers.len(),
                "split quiz at answers marker"
            );
            Ok(ParsedQuiz::new(questions, answers))
        }
        [_, second, ..] => Err(ParseError {
            kind: ParseErrorKind::DuplicateMarker { count: positions.len() },
            context: excerpt(raw, *second),
        }),
    }
}

fn excerpt(text: &str, start: usize) -> String {
    text[start..].chars().take(CONTEXT_CHARS).collect()
}

fn question_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*-?\s*(?:Q(?:uestion)?\s*)?(\d+)\s*[.):]\s*(.+?)\s*$").expect("valid question regex")
    })
}

fn option_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*-?\s*([a-dA-D])\s*[.)]\s+(.+?)\s*$").expect("valid option regex"))
}

impl ParsedQuiz {
    pub fn new(questions_text: &str, answers_text: &str) -> Self {
        Self {
            questions_text: questions_text.trim().to_string(),
            answers_text: answers_text.trim().to_string(),
        }
    }

    pub fn questions_text(&self) -> &str {
        &self.questions_text
    }

    pub fn answers_text(&self) -> &str {
        &self.answers_text
    }

    pub fn answer_key(&self) -> AnswerKey {
        AnswerKey::from_text(&self.answers_text)
    }

    /// Line scan for `N. text` questions and `a. text` options.
    ///
    /// Lines that fit neither shape are skipped, as are options seen before
    /// the first question. Nothing is checked against the requested count.
    pub fn questions(&self) -> Vec<Question> {
        let mut questions: Vec<Question> = Vec::new();

        for line in self.questions_text.lines() {
            if let Some(caps) = option_re().captures(line) {
                if let Some(current) = questions.last_mut() {
                    let choice = caps[1].parse::<AnswerChoice>();
                    if let Ok(choice) = choice {
                        current.options.push((choice, caps[2].to_string()));
                    }
                }
                continue;
            }

            if let Some(caps) = question_re().captures(line) {
                if let Ok(number) = caps[1].parse::<u32>() {
                    questions.push(Question {
                        number,
                        text: caps[2].to_string(),
                        options: Vec::new(),
                    });
                }
            }
        }

        debug!(target = "quizsmith::parser", count = questions.len(), "scanned question block");
        questions
    }
}
