use crate::clients::ClientType;
use crate::core::RetryConfig;
use crate::error::ConfigError;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    terminal,
};
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

const KEY_PROMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for clients whose API key lives in an environment variable
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;

    /// Environment first, then `.env`
    fn find_key() -> Option<String> {
        let _ = dotenvy::dotenv();
        env::var(Self::KEY_NAME).ok().filter(|key| !key.trim().is_empty())
    }

    fn require_key() -> Result<String, ConfigError> {
        Self::find_key().ok_or(ConfigError::MissingKey(Self::KEY_NAME))
    }

    /// Like `find_key`, but asks on the terminal when nothing is configured.
    fn find_key_with_user() -> Result<String, ConfigError> {
        if let Some(key) = Self::find_key() {
            return Ok(key);
        }

        print!(
            "Environment variable {} not found. Please enter the API key ({} second timeout): ",
            Self::KEY_NAME,
            KEY_PROMPT_TIMEOUT.as_secs()
        );
        let _ = io::stdout().flush();

        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_ok() {
                let _ = sender.send(input.trim().to_string());
            }
        });

        let api_key = match receiver.recv_timeout(KEY_PROMPT_TIMEOUT) {
            Ok(input) if !input.is_empty() => input,
            _ => return Err(ConfigError::MissingKey(Self::KEY_NAME)),
        };

        if Self::prompt_save_to_env() {
            match Self::save_to_env_file(&api_key) {
                Ok(()) => println!("API key saved to .env file"),
                Err(e) => warn!(error = %e, key = Self::KEY_NAME, "Failed to save key to .env"),
            }
        }

        Ok(api_key)
    }

    /// Single keystroke y/N, falling back to a line read
    fn prompt_save_to_env() -> bool {
        print!("Add {} to .env file? (y/N): ", Self::KEY_NAME);
        let _ = io::stdout().flush();

        if let Ok(answer) = read_single_key(KEY_PROMPT_TIMEOUT) {
            let yes = matches!(answer, Some('y' | 'Y'));
            println!("{}", if yes { "y" } else { "n" });
            return yes;
        }

        let mut input = String::new();
        io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
    }

    fn save_to_env_file(api_key: &str) -> Result<(), ConfigError> {
        let env_line = format!("{}={}\n", Self::KEY_NAME, api_key);

        if let Ok(content) = std::fs::read_to_string(".env") {
            if content.contains(&format!("{}=", Self::KEY_NAME)) {
                return Ok(());
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(".env")?;
        file.write_all(env_line.as_bytes())?;
        Ok(())
    }
}

/// Read one character key in raw mode. `Ok(None)` on timeout or a non-character key.
/// Ctrl-C comes back as an `Interrupted` error since raw mode swallows the signal.
pub fn read_single_key(timeout: Duration) -> io::Result<Option<char>> {
    terminal::enable_raw_mode()?;

    let result = (|| -> io::Result<Option<char>> {
        if event::poll(timeout)? {
            if let Event::Key(KeyEvent { code: KeyCode::Char(c), modifiers, .. }) = event::read()? {
                if modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
                }
                return Ok(Some(c));
            }
        }
        Ok(None)
    })();

    terminal::disable_raw_mode()?;
    result
}

/// Process-level settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct QuizConfig {
    pub client: ClientType,
    /// Provider model id, `None` for the provider default
    pub model: Option<String>,
    pub timeout: Duration,
    pub max_retries: usize,
    pub initial_backoff: Duration,
    pub transcript_dir: Option<PathBuf>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            client: ClientType::default(),
            model: None,
            timeout: Duration::from_secs(60),
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            transcript_dir: None,
        }
    }
}

impl QuizConfig {
    /// `QUIZ_CLIENT`, `QUIZ_MODEL`, `QUIZ_TIMEOUT_SECS`, `QUIZ_MAX_RETRIES`,
    /// `QUIZ_BACKOFF_MS`, `QUIZ_TRANSCRIPT_DIR`. Unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Some(client) = env_value::<ClientType>("QUIZ_CLIENT")? {
            config.client = client;
        }
        if let Some(model) = env_value::<String>("QUIZ_MODEL")? {
            config.model = Some(model);
        }
        if let Some(secs) = env_value::<u64>("QUIZ_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = env_value::<usize>("QUIZ_MAX_RETRIES")? {
            config.max_retries = retries;
        }
        if let Some(ms) = env_value::<u64>("QUIZ_BACKOFF_MS")? {
            config.initial_backoff = Duration::from_millis(ms);
        }
        if let Ok(dir) = env::var("QUIZ_TRANSCRIPT_DIR") {
            if !dir.trim().is_empty() {
                config.transcript_dir = Some(PathBuf::from(dir));
            }
        }

        info!(client = %config.client, timeout_secs = config.timeout.as_secs(), max_retries = config.max_retries, "Loaded quiz configuration");
        Ok(config)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::default()
            .with_uniform_retries(self.max_retries)
            .with_timeout(self.timeout)
            .with_backoff(self.initial_backoff)
    }
}

fn env_value<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        _ => Ok(None),
    }
}
