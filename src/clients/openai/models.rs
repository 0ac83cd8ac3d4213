#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OpenAIModel {
    Gpt4o,
    Gpt4oMini,
    #[default]
    Gpt35Turbo,
    Override(String),
}

impl OpenAIModel {
    pub fn id(&self) -> &str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt35Turbo => "gpt-3.5-turbo",
            Self::Override(s) => s.as_str(),
        }
    }

    /// Known ids map to their variant, anything else becomes an override.
    pub fn from_id(id: &str) -> Self {
        match id {
            "gpt-4o" => Self::Gpt4o,
            "gpt-4o-mini" => Self::Gpt4oMini,
            "gpt-3.5-turbo" => Self::Gpt35Turbo,
            other => Self::Override(other.to_string()),
        }
    }
}
