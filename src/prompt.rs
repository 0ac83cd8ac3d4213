//! Quiz request types and the prompt template sent to the completion service.

use crate::error::QuizError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const MAX_QUESTIONS: u32 = 50;

const DEFAULT_TEMPLATE: &str = "\
You are an expert quiz maker for {level} level. Let's think step by step and
create a {quiz_type} quiz with {num_questions} questions about the following concept/content: {quiz_context}.

Use exactly this format. Write the line \"Answers:\" once and nowhere else.

- Questions:
    1. <question text>
        a. <option>
        b. <option>
        c. <option>
        d. <option>
    2. <question text>
        ...
Answers:
1: <a|b|c|d>
2: <a|b|c|d>
...

Example:
- Questions:
    1. What is the time complexity of searching a balanced binary search tree?
        a. O(n)
        b. O(log n)
        c. O(n^2)
        d. O(1)
Answers:
1: b
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Basic, Level::Intermediate, Level::Advanced];
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Basic => write!(f, "Basic"),
            Level::Intermediate => write!(f, "Intermediate"),
            Level::Advanced => write!(f, "Advanced"),
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown level: '{}'. Supported: basic, intermediate, advanced", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizType {
    #[default]
    MultipleChoice,
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizType::MultipleChoice => write!(f, "Multiple-Choice"),
        }
    }
}

impl FromStr for QuizType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "multiple-choice" | "multiplechoice" | "mc" => Ok(Self::MultipleChoice),
            _ => Err(format!("Unknown quiz type: '{}'. Supported: multiple-choice", s)),
        }
    }
}

/// What the user asked for. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    level: Level,
    num_questions: u32,
    quiz_type: QuizType,
    context: String,
}

impl QuizRequest {
    pub fn new(
        level: Level,
        num_questions: u32,
        quiz_type: QuizType,
        context: impl Into<String>,
    ) -> Result<Self, QuizError> {
        if num_questions == 0 || num_questions > MAX_QUESTIONS {
            return Err(QuizError::InvalidRequest(format!(
                "number of questions must be between 1 and {}, got {}",
                MAX_QUESTIONS, num_questions
            )));
        }
        Ok(Self {
            level,
            num_questions,
            quiz_type,
            context: context.into(),
        })
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn num_questions(&self) -> u32 {
        self.num_questions
    }

    pub fn quiz_type(&self) -> QuizType {
        self.quiz_type
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}

/// Fixed-text template with `{level}`, `{num_questions}`, `{quiz_type}` and
/// `{quiz_context}` placeholders. Other braces pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        let template = std::fs::read_to_string(path)?;
        Ok(Self::new(template))
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Substitute the four placeholders. No validation of the values.
    pub fn format(
        &self,
        level: impl fmt::Display,
        num_questions: impl fmt::Display,
        quiz_type: impl fmt::Display,
        quiz_context: impl fmt::Display,
    ) -> String {
        let values = [
            ("{level}", level.to_string()),
            ("{num_questions}", num_questions.to_string()),
            ("{quiz_type}", quiz_type.to_string()),
            ("{quiz_context}", quiz_context.to_string()),
        ];

        // Single pass so substituted text is never re-scanned for placeholders
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            match values.iter().find(|(key, _)| tail.starts_with(key)) {
                Some((key, value)) => {
                    out.push_str(value);
                    rest = &tail[key.len()..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    pub fn render(&self, request: &QuizRequest) -> String {
        self.format(
            request.level(),
            request.num_questions(),
            request.quiz_type(),
            request.context(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing() {
        assert_eq!("basic".parse::<Level>(), Ok(Level::Basic));
        assert_eq!("ADVANCED".parse::<Level>(), Ok(Level::Advanced));
        assert!("expert".parse::<Level>().is_err());
        assert_eq!(Level::Intermediate.to_string(), "Intermediate");
    }

    #[test]
    fn quiz_type_display_and_parse() {
        assert_eq!(QuizType::MultipleChoice.to_string(), "Multiple-Choice");
        assert_eq!("multiple_choice".parse::<QuizType>(), Ok(QuizType::MultipleChoice));
        assert!("essay".parse::<QuizType>().is_err());
    }

    #[test]
    fn request_rejects_out_of_range_counts() {
        assert!(QuizRequest::new(Level::Basic, 0, QuizType::MultipleChoice, "x").is_err());
        assert!(QuizRequest::new(Level::Basic, 51, QuizType::MultipleChoice, "x").is_err());
        assert!(QuizRequest::new(Level::Basic, 50, QuizType::MultipleChoice, "x").is_ok());
    }

    #[test]
    fn format_passes_values_through_unchecked() {
        let t = PromptTemplate::new("{level}|{num_questions}|{quiz_type}|{quiz_context}|{other}");
        assert_eq!(t.format("Expert", 0, "Essay", "rust"), "Expert|0|Essay|rust|{other}");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let t = PromptTemplate::new("{quiz_context} at {level}");
        assert_eq!(t.format("Basic", 1, "MC", "{level}"), "{level} at Basic");
    }

    #[test]
    fn default_template_mentions_every_field() {
        let request = QuizRequest::new(Level::Advanced, 7, QuizType::MultipleChoice, "ownership in Rust").unwrap();
        let prompt = PromptTemplate::default().render(&request);
        assert!(prompt.contains("Advanced level"));
        assert!(prompt.contains("with 7 questions"));
        assert!(prompt.contains("Multiple-Choice quiz"));
        assert!(prompt.contains("ownership in Rust"));
        assert!(!prompt.contains("{level}"));
    }
}
