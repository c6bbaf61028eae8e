use std::{env, net::SocketAddr, num::NonZeroUsize, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::language::LanguageCode;

#[cfg(test)]
use once_cell::sync::Lazy;
#[cfg(test)]
pub(crate) static ENV_MUTEX: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

/// Which [`EmotionModel`](crate::classification::EmotionModel) backs the classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    /// Built-in keyword lexicon.
    Lexicon,
    /// Text-classification inference endpoint.
    Remote {
        url: String,
        token: Option<String>,
        timeout: Duration,
    },
    /// Local `rust-bert` model directory. Needs the `bert` feature.
    Bert { model_dir: PathBuf },
}

impl ClassifierBackend {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lexicon => "lexicon",
            Self::Remote { .. } => "remote",
            Self::Bert { .. } => "bert",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub source_languages: Vec<LanguageCode>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    catalog_path: PathBuf,
    http_bind: SocketAddr,
    native_language: LanguageCode,
    recommend_limit: NonZeroUsize,
    text_top_k: NonZeroUsize,
    classifier: ClassifierBackend,
    translation: Option<TranslationConfig>,
    lang_detect_min_confidence: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// Loads the configuration from `MOOD_*` environment variables.
    ///
    /// # Errors
    /// Returns an error when a required variable is missing or a value does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let catalog_path = PathBuf::from(
            env::var("MOOD_CATALOG_PATH").unwrap_or_else(|_| "tmdb_movies_emotions.csv".into()),
        );
        let http_bind = parse_socket_addr("MOOD_HTTP_BIND", "127.0.0.1:9310")?;
        let native_language = parse_language("MOOD_NATIVE_LANGUAGE", "en")?;
        let recommend_limit = parse_non_zero_usize("MOOD_RECOMMEND_LIMIT", 10)?;
        let text_top_k = parse_non_zero_usize("MOOD_TEXT_TOP_K", 2)?;

        let classifier = match env::var("MOOD_CLASSIFIER_BACKEND")
            .unwrap_or_else(|_| "lexicon".into())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "lexicon" => ClassifierBackend::Lexicon,
            "remote" => ClassifierBackend::Remote {
                url: env_var("MOOD_CLASSIFIER_URL")?,
                token: optional_env("MOOD_CLASSIFIER_TOKEN"),
                timeout: parse_duration_ms("MOOD_CLASSIFIER_TIMEOUT_MS", 15_000)?,
            },
            "bert" => ClassifierBackend::Bert {
                model_dir: PathBuf::from(env_var("MOOD_BERT_MODEL_DIR")?),
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "MOOD_CLASSIFIER_BACKEND",
                    source: anyhow::anyhow!("unknown backend `{other}` (expected lexicon, remote or bert)"),
                });
            }
        };

        let translation = match optional_env("MOOD_TRANSLATE_URL") {
            Some(base_url) => Some(TranslationConfig {
                base_url,
                api_key: optional_env("MOOD_TRANSLATE_API_KEY"),
                source_languages: parse_languages("MOOD_TRANSLATE_LANGUAGES", "fr")?,
                timeout: parse_duration_ms("MOOD_TRANSLATE_TIMEOUT_MS", 10_000)?,
            }),
            None => None,
        };

        let lang_detect_min_confidence = parse_f64("MOOD_LANG_DETECT_MIN_CONFIDENCE", 0.5)?;
        if !(0.0..=1.0).contains(&lang_detect_min_confidence) {
            return Err(ConfigError::Invalid {
                name: "MOOD_LANG_DETECT_MIN_CONFIDENCE",
                source: anyhow::anyhow!("value must be between 0 and 1"),
            });
        }

        Ok(Self {
            catalog_path,
            http_bind,
            native_language,
            recommend_limit,
            text_top_k,
            classifier,
            translation,
            lang_detect_min_confidence,
        })
    }

    #[must_use]
    pub fn with_catalog_path(mut self, path: PathBuf) -> Self {
        self.catalog_path = path;
        self
    }

    #[must_use]
    pub fn with_http_bind(mut self, bind: SocketAddr) -> Self {
        self.http_bind = bind;
        self
    }

    #[must_use]
    pub fn catalog_path(&self) -> &PathBuf {
        &self.catalog_path
    }

    #[must_use]
    pub fn http_bind(&self) -> SocketAddr {
        self.http_bind
    }

    #[must_use]
    pub fn native_language(&self) -> &LanguageCode {
        &self.native_language
    }

    #[must_use]
    pub fn recommend_limit(&self) -> NonZeroUsize {
        self.recommend_limit
    }

    #[must_use]
    pub fn text_top_k(&self) -> NonZeroUsize {
        self.text_top_k
    }

    #[must_use]
    pub fn classifier(&self) -> &ClassifierBackend {
        &self.classifier
    }

    #[must_use]
    pub fn translation(&self) -> Option<&TranslationConfig> {
        self.translation.as_ref()
    }

    #[must_use]
    pub fn lang_detect_min_confidence(&self) -> f64 {
        self.lang_detect_min_confidence
    }
}

fn env_var(name: &'static str) -> Result<String, ConfigError> {
    optional_env(name).ok_or(ConfigError::Missing(name))
}

/// Unset and blank values are both `None`.
fn optional_env(name: &'static str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());

    raw.parse().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_non_zero_usize(name: &'static str, default: usize) -> Result<NonZeroUsize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let parsed = raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    NonZeroUsize::new(parsed).ok_or_else(|| ConfigError::Invalid {
        name,
        source: anyhow::anyhow!("must be greater than zero"),
    })
}

fn parse_duration_ms(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default_ms.to_string());
    let ms = raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    Ok(Duration::from_millis(ms))
}

fn parse_f64(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<f64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_language(name: &'static str, default: &str) -> Result<LanguageCode, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    LanguageCode::parse(&raw).ok_or_else(|| ConfigError::Invalid {
        name,
        source: anyhow::anyhow!("not a two-letter language code: {raw}"),
    })
}

fn parse_languages(name: &'static str, default: &str) -> Result<Vec<LanguageCode>, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            LanguageCode::parse(code).ok_or_else(|| ConfigError::Invalid {
                name,
                source: anyhow::anyhow!("not a two-letter language code: {code}"),
            })
        })
        .collect()
}
