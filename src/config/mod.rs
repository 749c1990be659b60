//! Configuration management for the trip concierge
//!
//! Every field resolves as environment variable > TOML file > default.

pub mod file;

use std::path::Path;

use secrecy::SecretString;

use file::ConciergeConfigFile;

/// Default chat completions endpoint
pub const DEFAULT_LLM_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default completion model
pub const DEFAULT_LLM_MODEL: &str = "deepseek/deepseek-r1-0528";

/// Default photos fetched per itinerary
pub const DEFAULT_IMAGE_COUNT: usize = 6;

/// Trip concierge configuration
#[derive(Debug, Default)]
pub struct Config {
    /// API keys
    pub api_keys: ApiKeys,

    /// Language model configuration
    pub llm: LlmConfig,

    /// Destination photo configuration
    pub images: ImageConfig,

    /// Voice processing configuration
    pub voice: VoiceConfig,

    /// Symbol printed before the budget in the trip summary
    pub currency_symbol: String,
}

/// API keys for external services
///
/// Keys are opaque; only emptiness is checked, when a client is built.
#[derive(Debug, Default)]
pub struct ApiKeys {
    /// `OpenRouter` API key (extraction and itinerary completions)
    pub openrouter: Option<SecretString>,

    /// Unsplash access key (destination photos)
    pub unsplash: Option<SecretString>,

    /// `OpenAI` API key (Whisper transcription and TTS)
    pub openai: Option<SecretString>,
}

/// Language model configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    /// Chat completions endpoint
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Output token cap per completion
    pub max_tokens: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            max_tokens: 700,
            timeout_secs: 30,
        }
    }
}

/// Destination photo configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    /// Photos fetched per itinerary (0 disables)
    pub count: usize,

    /// Orientation filter
    pub orientation: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_IMAGE_COUNT,
            orientation: "landscape".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Voice processing configuration
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,

    /// Longest utterance recorded before giving up
    pub max_listen_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
            max_listen_secs: 15,
        }
    }
}

impl Config {
    /// Load configuration from the environment and the standard config file
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(None)
    }

    /// Load configuration from the environment and an explicit config file
    #[must_use]
    pub fn load_from(path: Option<&Path>) -> Self {
        let fc = file::load_config_file(path);
        Self::resolve(fc, |key| std::env::var(key).ok())
    }

    /// Merge a config file with variables from `env`
    pub fn resolve(fc: ConciergeConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let secret = |var: &str, fallback: Option<String>| {
            env(var)
                .or(fallback)
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from)
        };

        // API keys (env > toml > None)
        let api_keys = ApiKeys {
            openrouter: secret("OPENROUTER_API_KEY", fc.api_keys.openrouter),
            unsplash: secret("UNSPLASH_ACCESS_KEY", fc.api_keys.unsplash),
            openai: secret("OPENAI_API_KEY", fc.api_keys.openai),
        };

        let llm_defaults = LlmConfig::default();
        let llm = LlmConfig {
            base_url: env("CONCIERGE_LLM_URL")
                .or(fc.llm.base_url)
                .unwrap_or(llm_defaults.base_url),
            model: env("CONCIERGE_LLM_MODEL")
                .or(fc.llm.model)
                .unwrap_or(llm_defaults.model),
            max_tokens: env("CONCIERGE_LLM_MAX_TOKENS")
                .and_then(|s| s.parse().ok())
                .or(fc.llm.max_tokens)
                .filter(|&n| n > 0)
                .unwrap_or(llm_defaults.max_tokens),
            timeout_secs: fc
                .llm
                .timeout_secs
                .filter(|&s| s > 0)
                .unwrap_or(llm_defaults.timeout_secs),
        };

        let image_defaults = ImageConfig::default();
        let images = ImageConfig {
            count: env("CONCIERGE_IMAGE_COUNT")
                .and_then(|s| s.parse().ok())
                .or(fc.images.count)
                .unwrap_or(image_defaults.count),
            orientation: fc.images.orientation.unwrap_or(image_defaults.orientation),
            timeout_secs: fc
                .images
                .timeout_secs
                .filter(|&s| s > 0)
                .unwrap_or(image_defaults.timeout_secs),
        };

        let voice_defaults = VoiceConfig::default();
        let voice = VoiceConfig {
            stt_model: env("CONCIERGE_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or(voice_defaults.stt_model),
            tts_model: env("CONCIERGE_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or(voice_defaults.tts_model),
            tts_voice: fc.voice.tts_voice.unwrap_or(voice_defaults.tts_voice),
            tts_speed: fc
                .voice
                .tts_speed
                .unwrap_or(voice_defaults.tts_speed)
                .clamp(0.25, 4.0),
            max_listen_secs: fc
                .voice
                .max_listen_secs
                .filter(|&s| s > 0)
                .unwrap_or(voice_defaults.max_listen_secs),
        };

        let currency_symbol = fc.trip.currency_symbol.unwrap_or_else(|| "₹".to_string());

        tracing::debug!(
            model = %llm.model,
            image_count = images.count,
            has_openrouter_key = api_keys.openrouter.is_some(),
            has_unsplash_key = api_keys.unsplash.is_some(),
            has_openai_key = api_keys.openai.is_some(),
            "configuration resolved"
        );

        Self {
            api_keys,
            llm,
            images,
            voice,
            currency_symbol,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;
    use file::{ApiKeysFileConfig, LlmFileConfig, VoiceFileConfig};

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = Config::resolve(ConciergeConfigFile::default(), env_from(&[]));

        assert_eq!(config.llm, LlmConfig::default());
        assert_eq!(config.images, ImageConfig::default());
        assert_eq!(config.voice, VoiceConfig::default());
        assert_eq!(config.currency_symbol, "₹");
        assert!(config.api_keys.openrouter.is_none());
    }

    #[test]
    fn env_overrides_file() {
        let fc = ConciergeConfigFile {
            llm: LlmFileConfig {
                model: Some("file/model".to_string()),
                max_tokens: Some(300),
                ..LlmFileConfig::default()
            },
            api_keys: ApiKeysFileConfig {
                openrouter: Some("file-key".to_string()),
                unsplash: Some("file-unsplash".to_string()),
                ..ApiKeysFileConfig::default()
            },
            ..ConciergeConfigFile::default()
        };

        let config = Config::resolve(
            fc,
            env_from(&[
                ("CONCIERGE_LLM_MODEL", "env/model"),
                ("OPENROUTER_API_KEY", "env-key"),
            ]),
        );

        assert_eq!(config.llm.model, "env/model");
        assert_eq!(config.llm.max_tokens, 300);
        assert_eq!(
            config.api_keys.openrouter.as_ref().map(|k| k.expose_secret()),
            Some("env-key")
        );
        assert_eq!(
            config.api_keys.unsplash.as_ref().map(|k| k.expose_secret()),
            Some("file-unsplash")
        );
    }

    #[test]
    fn blank_keys_are_treated_as_missing() {
        let config = Config::resolve(
            ConciergeConfigFile::default(),
            env_from(&[("OPENAI_API_KEY", "  ")]),
        );
        assert!(config.api_keys.openai.is_none());
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let fc = ConciergeConfigFile {
            voice: VoiceFileConfig {
                tts_speed: Some(9.0),
                max_listen_secs: Some(0),
                ..VoiceFileConfig::default()
            },
            ..ConciergeConfigFile::default()
        };

        let config = Config::resolve(fc, env_from(&[("CONCIERGE_LLM_MAX_TOKENS", "zero")]));

        assert!((config.voice.tts_speed - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.voice.max_listen_secs, 15);
        assert_eq!(config.llm.max_tokens, 700);
    }
}
