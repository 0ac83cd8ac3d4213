use anyhow::{Context, Result};
use clap::Parser;
use quizsmith::clients::{ClientType, FlexibleClient};
use quizsmith::config::{read_single_key, QuizConfig};
use quizsmith::interceptors::FileInterceptor;
use quizsmith::prompt::MAX_QUESTIONS;
use quizsmith::{
    AnswerChoice, Level, PromptTemplate, QuizGenerator, QuizRequest, QuizSession, QuizType, UserAnswers,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const KEY_WAIT: Duration = Duration::from_secs(3600);

#[derive(Parser)]
#[command(author, version, about = "Interactive quiz generator", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    OPENAI_API_KEY       API key for the OpenAI client
    DEEPSEEK_API_KEY     API key for the DeepSeek client
    QUIZ_CLIENT          Default client (openai|deepseek|mock)
    QUIZ_MODEL           Provider model id (e.g. gpt-4o, deepseek-reasoner)
    QUIZ_TIMEOUT_SECS    Per-attempt completion timeout
    QUIZ_MAX_RETRIES     Retries per failure kind
    QUIZ_BACKOFF_MS      Initial retry backoff
    QUIZ_TRANSCRIPT_DIR  Save prompt/quiz transcripts here
    RUST_LOG             Log filter (default quizsmith=info)

EXAMPLES:
    quiz --context \"The Rust borrow checker\" --num-questions 5
    quiz --level advanced --context \"TCP congestion control\" --time-limit 120
    quiz --client mock --num-questions 3")]
struct Args {
    /// Knowledge level: basic, intermediate, advanced
    #[arg(short, long, default_value = "basic")]
    level: Level,

    /// Concept or content the quiz is about [prompted if omitted]
    #[arg(short, long)]
    context: Option<String>,

    /// Number of questions
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=MAX_QUESTIONS as i64))]
    num_questions: u32,

    /// Quiz type
    #[arg(long, default_value = "multiple-choice")]
    quiz_type: QuizType,

    /// Time limit in seconds
    #[arg(short, long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    time_limit: u64,

    /// Completion backend: openai, deepseek, mock [default: auto-detect]
    #[arg(long)]
    client: Option<ClientType>,

    /// Provider model id, e.g. gpt-4o or deepseek-reasoner [default: provider default]
    #[arg(long)]
    model: Option<String>,

    /// Custom prompt template file
    #[arg(long)]
    template: Option<PathBuf>,

    /// Directory for prompt/quiz transcripts
    #[arg(long)]
    transcript_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizsmith=info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = QuizConfig::from_env().context("reading configuration")?;
    if let Some(client) = args.client.clone() {
        config.client = client;
    }
    if let Some(model) = args.model.clone() {
        config.model = Some(model);
    }
    if let Some(dir) = args.transcript_dir.clone() {
        config.transcript_dir = Some(dir);
    }

    let context = match args.context.clone() {
        Some(context) => context,
        None => read_line("Enter context for the quiz: ")?,
    };
    let request = QuizRequest::new(args.level, args.num_questions, args.quiz_type, context)?;

    let client = FlexibleClient::from_type(config.client.clone(), config.model.as_deref())?;
    let mut generator = QuizGenerator::new(client, config.retry_config());
    if let Some(path) = &args.template {
        generator = generator.with_template(PromptTemplate::from_file(path)?);
    }
    if let Some(dir) = &config.transcript_dir {
        generator = generator.with_interceptor(Arc::new(FileInterceptor::new(dir.clone())));
    }

    let mut session = QuizSession::new(Duration::from_secs(args.time_limit));

    println!("Generating a {} quiz with {} questions...", request.level(), request.num_questions());
    let quiz = generator.generate_quiz(&request).await?;
    println!("Quiz Generated!\n");
    session.start(quiz);

    render(&session);
    collect_answers(&mut session, request.num_questions())?;

    loop {
        print!("\n[s] Submit answers  [a] Show answers  [r] Re-answer  [q] Quit: ");
        io::stdout().flush()?;
        let choice = read_key()?;
        println!();

        match choice {
            Some('s') => match session.submit(request.num_questions()) {
                Ok(report) => {
                    for warning in &report.warnings {
                        println!("Warning: {}", warning);
                    }
                    println!("{}", report);
                }
                Err(e) => println!("Warning: {}", e),
            },
            Some('a') => match session.answer_reveal() {
                Ok((questions, answers)) => {
                    println!("{}\n----\n{}", questions, answers);
                }
                Err(e) => println!("Warning: {}", e),
            },
            Some('r') => {
                render(&session);
                collect_answers(&mut session, request.num_questions())?;
            }
            Some('q') => break,
            _ => {}
        }
        time_notice(&session);
    }

    Ok(())
}

fn render(session: &QuizSession) {
    if let Some(questions) = session.questions_text() {
        println!("{}\n", questions);
    }
    time_notice(session);
}

fn time_notice(session: &QuizSession) {
    if session.time_exceeded() {
        println!("Time limit exceeded!");
    }
}

fn collect_answers(session: &mut QuizSession, num_questions: u32) -> Result<()> {
    let mut answers = session.user_answers().cloned().unwrap_or_default();

    for question in 1..=num_questions {
        let current = answers.get(question).map(|c| format!(" (current: {})", c)).unwrap_or_default();
        print!("Question {}{} [a/b/c/d]: ", question, current);
        io::stdout().flush()?;

        let choice = read_choice()?;
        println!("{}", choice);
        answers.set(question, choice);

        // Every answer is a re-render: the whole answer set is stored again
        session.record_answers(answers.clone());
        time_notice(session);
    }

    println!("Your answers: {}", answers_summary(&answers));
    Ok(())
}

fn read_choice() -> Result<AnswerChoice> {
    loop {
        match read_single_key(KEY_WAIT) {
            Ok(Some(c)) => {
                if let Some(choice) = AnswerChoice::from_char(c) {
                    return Ok(choice);
                }
            }
            Ok(None) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => anyhow::bail!("interrupted"),
            Err(_) => {
                let line = read_line("")?;
                if let Ok(choice) = line.parse::<AnswerChoice>() {
                    return Ok(choice);
                }
                print!("Please enter a, b, c or d: ");
                io::stdout().flush()?;
            }
        }
    }
}

fn read_key() -> Result<Option<char>> {
    match read_single_key(KEY_WAIT) {
        Ok(key) => Ok(key.map(|c| c.to_ascii_lowercase())),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => anyhow::bail!("interrupted"),
        Err(_) => Ok(read_line("")?.trim().chars().next().map(|c| c.to_ascii_lowercase())),
    }
}

fn read_line(prompt: &str) -> Result<String> {
    if !prompt.is_empty() {
        print!("{}", prompt);
        io::stdout().flush()?;
    }
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        anyhow::bail!("stdin closed");
    }
    Ok(input.trim().to_string())
}

fn answers_summary(answers: &UserAnswers) -> String {
    answers.iter().map(|(q, c)| format!("{}: {}", q, c)).collect::<Vec<_>>().join(", ")
}
