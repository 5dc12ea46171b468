//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use billbook_extractor::ExtractorConfig;
use billbook_llm::{ConfiguredProvider, OllamaProvider, OpenAiProvider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// LLM backend settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Extraction limits
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Which LLM server speaks for the extraction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible chat completions API
    OpenAi,
}

/// LLM backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Backend kind
    #[serde(default = "default_backend")]
    pub backend: LlmBackend,

    /// Endpoint URL; the backend default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key (OpenAI backend)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl LlmBackend {
    /// Whether the backend can read PDF documents; Ollama takes images only.
    pub fn accepts_pdf(&self) -> bool {
        !matches!(self, LlmBackend::Ollama)
    }
}

/// Warning shown when PDFs are headed for a backend that cannot read them.
pub fn pdf_warning(backend: LlmBackend, pdfs: usize) -> Option<String> {
    if pdfs == 0 || backend.accepts_pdf() {
        return None;
    }
    Some(format!(
        "{} PDF file(s) will fail: the Ollama backend reads images only. \
         Convert them to PNG/JPEG or set llm.backend = \"openai\".",
        pdfs
    ))
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(billbook_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.extractor.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Build the configured LLM provider.
    ///
    /// The per-request timeout follows `extractor.extraction_timeout_secs`.
    pub fn build_provider(&self) -> Result<ConfiguredProvider> {
        let timeout = self.extractor.extraction_timeout();
        let provider = match self.llm.backend {
            LlmBackend::Ollama => {
                let endpoint = self
                    .llm
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| billbook_llm::ollama::DEFAULT_ENDPOINT.to_string());
                ConfiguredProvider::Ollama(
                    OllamaProvider::new(endpoint, &self.llm.model).with_timeout(timeout),
                )
            }
            LlmBackend::OpenAi => {
                let endpoint = self
                    .llm
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| billbook_llm::openai::DEFAULT_BASE_URL.to_string());
                ConfiguredProvider::OpenAi(
                    OpenAiProvider::from_env(endpoint, &self.llm.model, &self.llm.api_key_env)?
                        .with_timeout(timeout),
                )
            }
        };
        Ok(provider)
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            endpoint: None,
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

/// Directory holding config and REPL history.
pub fn billbook_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".billbook"))
}

fn default_backend() -> LlmBackend {
    LlmBackend::Ollama
}

fn default_model() -> String {
    "llava".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.backend, LlmBackend::Ollama);
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.extractor, ExtractorConfig::default());
        assert!(config.settings.color);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [llm]
            backend = "openai"
            model = "gpt-4o-mini"

            [settings]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.backend, LlmBackend::OpenAi);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert_eq!(config.settings.history_size, 1000);
        assert_eq!(config.extractor.extraction_timeout_secs, 120);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.llm.endpoint = Some("http://gpu-box:11434".to_string());
        config.extractor.extraction_timeout_secs = 45;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.llm.endpoint.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(loaded.extractor.extraction_timeout_secs, 45);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.llm.model, "llava");
    }

    #[test]
    fn test_invalid_extractor_section_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[extractor]\nextraction_timeout_secs = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_openai_backend_needs_key() {
        let mut config = Config::default();
        config.llm.backend = LlmBackend::OpenAi;
        config.llm.api_key_env = "BILLBOOK_TEST_KEY_THAT_IS_NOT_SET".to_string();
        assert!(matches!(config.build_provider(), Err(CliError::Llm(_))));
    }

    #[test]
    fn test_pdf_warning_only_for_ollama() {
        assert!(LlmBackend::OpenAi.accepts_pdf());
        assert!(!LlmBackend::Ollama.accepts_pdf());
        assert!(pdf_warning(LlmBackend::Ollama, 0).is_none());
        assert!(pdf_warning(LlmBackend::OpenAi, 3).is_none());
        let warning = pdf_warning(LlmBackend::Ollama, 2).unwrap();
        assert!(warning.starts_with("2 PDF file(s)"));
    }

    #[test]
    fn test_ollama_backend_builds() {
        let config = Config::default();
        assert!(matches!(
            config.build_provider(),
            Ok(ConfiguredProvider::Ollama(_))
        ));
    }
}
