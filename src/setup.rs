//! Interactive first-run setup wizard (`concierge setup`)

use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input};

use crate::config::file::{
    self, ApiKeysFileConfig, ConciergeConfigFile, ImagesFileConfig, LlmFileConfig,
    VoiceFileConfig,
};
use crate::config::{DEFAULT_IMAGE_COUNT, DEFAULT_LLM_MODEL};

/// Run the interactive setup wizard
///
/// Writes to `path`, or the standard config location when `None`.
///
/// # Errors
///
/// Returns error if user input fails or config cannot be written
pub fn run_setup(path: Option<&Path>) -> anyhow::Result<()> {
    println!("Trip Concierge Setup\n");

    let config_path = path
        .map(Path::to_path_buf)
        .or_else(file::config_file_path)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    // Load existing config if present
    let existing = file::load_config_file(Some(&config_path));
    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    // 1. Completion key + model
    let openrouter = ask_key(
        "OpenRouter API key",
        "OPENROUTER_API_KEY",
        existing.api_keys.openrouter.as_deref(),
    )?;

    let model: String = Input::new()
        .with_prompt("Model")
        .default(
            existing
                .llm
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
        )
        .interact_text()?;

    // 2. Destination photos (optional)
    let photos_default = existing.api_keys.unsplash.is_some();
    let enable_photos = Confirm::new()
        .with_prompt("Show destination photos (Unsplash)?")
        .default(photos_default)
        .interact()?;

    let (unsplash, images) = if enable_photos {
        let key = ask_key(
            "Unsplash access key",
            "UNSPLASH_ACCESS_KEY",
            existing.api_keys.unsplash.as_deref(),
        )?;
        let count: usize = Input::new()
            .with_prompt("Photos per itinerary")
            .default(existing.images.count.unwrap_or(DEFAULT_IMAGE_COUNT))
            .interact_text()?;
        let images = ImagesFileConfig {
            count: Some(count),
            ..existing.images
        };
        (key, images)
    } else {
        let images = ImagesFileConfig {
            count: Some(0),
            ..existing.images
        };
        (None, images)
    };

    // 3. Voice
    let openai = ask_key(
        "OpenAI API key for Whisper/TTS",
        "OPENAI_API_KEY",
        existing.api_keys.openai.as_deref(),
    )?;

    let tts_voice: String = Input::new()
        .with_prompt("TTS voice")
        .default(
            existing
                .voice
                .tts_voice
                .clone()
                .unwrap_or_else(|| "alloy".to_string()),
        )
        .interact_text()?;

    // 4. Build and write config
    let config_file = ConciergeConfigFile {
        llm: LlmFileConfig {
            model: Some(model),
            ..existing.llm
        },
        images,
        voice: VoiceFileConfig {
            tts_voice: Some(tts_voice),
            ..existing.voice
        },
        api_keys: ApiKeysFileConfig {
            openrouter,
            unsplash,
            openai,
        },
        trip: existing.trip,
    };

    file::write_config_file(&config_path, &config_file)?;
    println!("\nConfig written to {}", config_path.display());
    println!("\nSetup complete! Run `concierge` to start planning.");

    Ok(())
}

/// Prompt for an API key, keeping `existing` when left blank
fn ask_key(label: &str, env_hint: &str, existing: Option<&str>) -> anyhow::Result<Option<String>> {
    let prompt = existing.map_or_else(
        || format!("{label} ({env_hint})"),
        |k| format!("{label} (current: {}, leave blank to keep)", mask(k)),
    );

    let input: String = Input::new()
        .with_prompt(&prompt)
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim();
    Ok(if input.is_empty() {
        existing.map(str::to_string)
    } else {
        Some(input.to_string())
    })
}

/// Show only the ends of a key
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}
