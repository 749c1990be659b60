//! TOML configuration file loading
//!
//! Supports `~/.config/trip-concierge/config.toml` as a persistent config
//! source. All fields are optional; the file is a partial overlay on top of
//! defaults and environment variables win over it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConciergeConfigFile {
    /// Language model configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Destination photo configuration
    #[serde(default)]
    pub images: ImagesFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Trip presentation
    #[serde(default)]
    pub trip: TripFileConfig,
}

/// LLM-related configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LlmFileConfig {
    /// Chat completions endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model identifier (e.g. "deepseek/deepseek-r1-0528")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Output token cap per completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Destination photo configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImagesFileConfig {
    /// Photos fetched per itinerary (0 disables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Unsplash orientation filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Voice processing configuration
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct VoiceFileConfig {
    /// STT model (e.g. "whisper-1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_speed: Option<f64>,

    /// Longest utterance recorded before giving up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_listen_secs: Option<u64>,
}

/// API keys configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiKeysFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openrouter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsplash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
}

/// Trip presentation configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TripFileConfig {
    /// Symbol printed before the budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
}

/// Load the TOML config file from `path`, or the standard path when `None`
///
/// Returns `ConciergeConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file(path: Option<&Path>) -> ConciergeConfigFile {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_file_path) else {
        return ConciergeConfigFile::default();
    };

    if !path.exists() {
        return ConciergeConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConciergeConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConciergeConfigFile::default()
        }
    }
}

/// Write `config` to `path`, creating parent directories
///
/// # Errors
///
/// Returns error if the file cannot be serialized or written
pub fn write_config_file(path: &Path, config: &ConciergeConfigFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    tracing::info!(path = %path.display(), "wrote config file");
    Ok(())
}

/// Return the config file path: `~/.config/trip-concierge/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("trip-concierge").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_parses() {
        let config: ConciergeConfigFile = toml::from_str(
            r#"
            [llm]
            model = "openai/gpt-4o-mini"

            [images]
            count = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.model.as_deref(), Some("openai/gpt-4o-mini"));
        assert_eq!(config.images.count, Some(3));
        assert!(config.api_keys.openrouter.is_none());
        assert!(config.voice.tts_speed.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_file(Some(&dir.path().join("absent.toml")));
        assert_eq!(config, ConciergeConfigFile::default());
    }

    #[test]
    fn invalid_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm\nmodel = ").unwrap();

        assert_eq!(load_config_file(Some(&path)), ConciergeConfigFile::default());
    }

    #[test]
    fn written_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ConciergeConfigFile {
            api_keys: ApiKeysFileConfig {
                openrouter: Some("or-key".to_string()),
                ..ApiKeysFileConfig::default()
            },
            voice: VoiceFileConfig {
                tts_speed: Some(1.25),
                ..VoiceFileConfig::default()
            },
            ..ConciergeConfigFile::default()
        };

        write_config_file(&path, &config).unwrap();
        assert_eq!(load_config_file(Some(&path)), config);
    }
}
