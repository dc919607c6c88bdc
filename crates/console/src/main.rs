//! Interview Agent console entry point
//!
//! Runs one interview over stdin/stdout: every input line is a candidate
//! utterance, every interviewer line is printed to stdout. Logs go to
//! stderr.

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use interview_agent::{
    initial_state, CachedQuestionSource, HttpQuestionSource, InterviewSession,
    InterviewStateMachine, StaticQuestionSource, TemplateCache,
};
use interview_config::{load_settings_from, InterviewMode, Settings};
use interview_core::{QuestionSet, QuestionSource, SpeechOutput};
use interview_text_processing::KeywordClassifier;

/// Interview Agent - structured technical interviews in the terminal
///
/// Examples:
///   interview-agent --candidate "Asha Rao" --questions questions.txt
///   interview-agent --candidate "Asha Rao" --template-id rec123 --room room-7
///   interview-agent --practice
#[derive(Parser)]
#[command(
    name = "interview-agent",
    about = "Run a structured interview over stdin/stdout",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Directory holding default.yaml and per-environment overrides
    #[arg(long, value_name = "DIR", default_value = "config", env = "INTERVIEW_AGENT_CONFIG_DIR")]
    config_dir: PathBuf,

    /// Environment overlay to load (config/{env}.yaml)
    #[arg(long, env = "INTERVIEW_AGENT_ENV")]
    env: Option<String>,

    /// Candidate's full name
    #[arg(long, default_value = "Candidate")]
    candidate: String,

    /// Role being interviewed for; defaults to the template's job title
    #[arg(long)]
    role: Option<String>,

    /// Template id to fetch from the template store
    #[arg(long, default_value = "default")]
    template_id: String,

    /// Room name forwarded to the template store
    #[arg(long)]
    room: Option<String>,

    /// Local question file (template JSON or one question per line)
    #[arg(long, value_name = "PATH")]
    questions: Option<PathBuf>,

    /// Run the practice round instead of the real interview
    #[arg(long)]
    practice: bool,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

/// Prints interviewer lines to stdout
struct ConsoleSpeech;

#[async_trait]
impl SpeechOutput for ConsoleSpeech {
    async fn say(&self, text: &str, _allow_interruptions: bool) -> interview_core::Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("Interviewer: {}\n", text).as_bytes())
            .await
            .map_err(|e| interview_core::Error::Speech(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| interview_core::Error::Speech(e.to_string()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match load_settings_from(&cli.config_dir, cli.env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        },
    };
    if cli.practice {
        settings.interview.mode = InterviewMode::Practice;
    }
    if cli.json_logs {
        settings.observability.json_logs = true;
    }

    init_tracing(&settings);
    tracing::info!("Starting Interview Agent v{}", env!("CARGO_PKG_VERSION"));

    let source = question_source(&cli, &settings)?;
    let state = initial_state(
        &settings,
        &cli.candidate,
        cli.role.as_deref(),
        source.as_ref(),
        &cli.template_id,
    )
    .await;

    let session = InterviewSession::new(
        InterviewStateMachine::new(state, &settings),
        Arc::new(KeywordClassifier::default()),
        Arc::new(ConsoleSpeech),
    );
    session.start().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    tracing::info!("Input closed");
                    break;
                };
                // Rejected utterances are already logged by the session
                let _ = session.handle_utterance(&line).await;
                if session.is_completed().await {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    let summary = session.end().await;
    tracing::info!(
        interview_id = %summary.interview_id,
        final_stage = %summary.final_stage,
        "Session closed"
    );
    Ok(())
}

/// Pick the question source: a local file, the template store, or nothing
fn question_source(cli: &Cli, settings: &Settings) -> anyhow::Result<Arc<dyn QuestionSource>> {
    if let Some(path) = &cli.questions {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read questions from {}", path.display()))?;
        tracing::info!(path = %path.display(), "Using local question file");
        return Ok(Arc::new(StaticQuestionSource::from_text(&text)?));
    }

    let options = &settings.question_source;
    match HttpQuestionSource::from_config(options)? {
        Some(http) => {
            let http = match &cli.room {
                Some(room) => http.with_room_name(room.as_str()),
                None => http,
            };
            let cache = Arc::new(TemplateCache::new(
                Duration::from_secs(options.cache_ttl_secs),
                options.cache_capacity,
            ));
            Ok(Arc::new(CachedQuestionSource::new(http, cache)))
        },
        None => {
            if settings.interview.mode == InterviewMode::Standard {
                tracing::warn!("No template store configured, running without questions");
            }
            Ok(Arc::new(StaticQuestionSource::new(QuestionSet::empty())))
        },
    }
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.observability.log_level.as_str().into());

    let fmt_layer = if settings.observability.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
