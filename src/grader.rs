//! Scores a submission against the generated answer key.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// One of the four multiple-choice letters, rendered lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AnswerChoice {
    #[default]
    A,
    B,
    C,
    D,
}

impl AnswerChoice {
    pub const ALL: [AnswerChoice; 4] = [AnswerChoice::A, AnswerChoice::B, AnswerChoice::C, AnswerChoice::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerChoice::A => "a",
            AnswerChoice::B => "b",
            AnswerChoice::C => "c",
            AnswerChoice::D => "d",
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(Self::A),
            'b' => Some(Self::B),
            'c' => Some(Self::C),
            'd' => Some(Self::D),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| format!("Not an answer letter: '{}'", s)),
            _ => Err(format!("Not an answer letter: '{}'", s)),
        }
    }
}

/// Question ordinal (1-based) to chosen letter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAnswers {
    answers: BTreeMap<u32, AnswerChoice>,
}

impl UserAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, question: u32, choice: AnswerChoice) {
        self.answers.insert(question, choice);
    }

    pub fn with(mut self, question: u32, choice: AnswerChoice) -> Self {
        self.set(question, choice);
        self
    }

    pub fn get(&self, question: u32) -> Option<AnswerChoice> {
        self.answers.get(&question).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, AnswerChoice)> + '_ {
        self.answers.iter().map(|(q, c)| (*q, *c))
    }
}

impl FromIterator<(u32, AnswerChoice)> for UserAnswers {
    fn from_iter<I: IntoIterator<Item = (u32, AnswerChoice)>>(iter: I) -> Self {
        Self { answers: iter.into_iter().collect() }
    }
}

/// Per-question problem with the answer key. Never aborts grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeWarning {
    MissingAnswer { question: u32 },
    InvalidFormat { question: u32 },
}

impl fmt::Display for GradeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeWarning::MissingAnswer { question } => write!(f, "Answer not found for question {}", question),
            GradeWarning::InvalidFormat { question } => {
                write!(f, "Correct answer format is invalid for question {}", question)
            }
        }
    }
}

/// Answer key lines in question order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    lines: Vec<String>,
}

impl AnswerKey {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.trim().split('\n').map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Expected letter for a 1-based question: the text between the first
    /// `:` and the next one (or the line end), trimmed.
    pub fn expected(&self, question: u32) -> Result<&str, GradeWarning> {
        let line = question
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx as usize))
            .ok_or(GradeWarning::MissingAnswer { question })?;

        let mut parts = line.split(':');
        parts.next();
        parts
            .next()
            .map(str::trim)
            .ok_or(GradeWarning::InvalidFormat { question })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeReport {
    pub score: u32,
    pub total: u32,
    pub warnings: Vec<GradeWarning>,
}

impl fmt::Display for GradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Your score: {} out of {}", self.score, self.total)
    }
}

/// Grade questions `1..=num_questions`. Exact, case-sensitive letter match.
pub fn score(user_answers: &UserAnswers, answer_key_text: &str, num_questions: u32) -> GradeReport {
    score_key(user_answers, &AnswerKey::from_text(answer_key_text), num_questions)
}

pub fn score_key(user_answers: &UserAnswers, key: &AnswerKey, num_questions: u32) -> GradeReport {
    let mut score = 0;
    let mut warnings = Vec::new();

    for question in 1..=num_questions {
        let expected = match key.expected(question) {
            Ok(expected) => expected,
            Err(warning) => {
                warn!(target = "quizsmith::grader", question, "{}", warning);
                warnings.push(warning);
                continue;
            }
        };

        if user_answers.get(question).is_some_and(|given| given.as_str() == expected) {
            score += 1;
        }
    }

    info!(target = "quizsmith::grader", score, total = num_questions, warnings = warnings.len(), "graded submission");
    GradeReport { score, total: num_questions, warnings }
}
