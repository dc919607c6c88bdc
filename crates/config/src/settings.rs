//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ConfigError, DependencyLexicon, InterviewConfig, InterviewMode, ScriptConfig};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Pacing and follow-up budgets
    #[serde(default)]
    pub interview: InterviewConfig,

    /// Spoken script templates
    #[serde(default)]
    pub scripts: ScriptConfig,

    /// Task-dependency lexicon
    #[serde(default)]
    pub lexicon: DependencyLexicon,

    /// Template store access
    #[serde(default)]
    pub question_source: QuestionSourceConfig,

    /// Practice-mode questions
    #[serde(default)]
    pub practice: PracticeConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Template store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSourceConfig {
    /// Base URL of the template API; `None` disables remote fetching
    #[serde(default = "default_api_url")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How long a fetched template stays cached; 0 disables caching
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached templates
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_api_url() -> Option<String> {
    std::env::var("INTERVIEW_TEMPLATE_API_URL").ok()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    600
}

fn default_cache_capacity() -> usize {
    64
}

impl Default for QuestionSourceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Fixed questions used in practice mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeConfig {
    #[serde(default = "default_practice_questions")]
    pub questions: Vec<String>,
}

fn default_practice_questions() -> Vec<String> {
    vec![
        "What is the difference between hardware and software?".to_string(),
        "What is the main purpose of an internet browser?".to_string(),
        "What is the purpose of an input and an output in programming?".to_string(),
    ]
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            questions: default_practice_questions(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a single YAML, TOML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let settings: Settings = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.interview.validate()?;
        self.validate_question_source()?;

        if self.interview.mode == InterviewMode::Practice && self.practice.questions.is_empty() {
            return Err(ConfigError::invalid(
                "practice.questions",
                "practice mode needs at least one question",
            ));
        }

        if self.lexicon.decision_keywords.is_empty() && self.lexicon.dependency_phrases.is_empty()
        {
            tracing::warn!("Dependency lexicon is empty; multi-part questions will never be treated as dependent");
        }

        Ok(())
    }

    fn validate_question_source(&self) -> Result<(), ConfigError> {
        let source = &self.question_source;

        if source.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "question_source.timeout_secs",
                "must be greater than 0",
            ));
        }

        if source.cache_ttl_secs > 0 && source.cache_capacity == 0 {
            return Err(ConfigError::invalid(
                "question_source.cache_capacity",
                "must be greater than 0 when caching is enabled",
            ));
        }

        if let Some(url) = &source.api_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::invalid(
                    "question_source.api_url",
                    format!("'{}' is not an http(s) URL", url),
                ));
            }
        }

        Ok(())
    }
}

/// Load settings from `dir` and the environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (INTERVIEW_AGENT_ prefix)
/// 2. {dir}/{env}.yaml (if env specified)
/// 3. {dir}/default.yaml
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("INTERVIEW_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let mut settings: Settings = config.try_deserialize()?;
    settings.lexicon = settings.lexicon.normalized();

    settings.validate()?;

    Ok(settings)
}
