use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dialoguer::Select;
use secrecy::{ExposeSecret, SecretString};
use tracing_subscriber::EnvFilter;

use trip_concierge::providers::{DisabledImageSearch, OpenRouterClient, UnsplashClient};
use trip_concierge::voice::{
    AudioPlayback, Microphone, MicrophoneTranscriber, SpeechToText, TextToSpeech, TypedUtterance,
    rms,
};
use trip_concierge::{
    Collaborators, Completion, Config, FlowSettings, ImageSearch, Notice, SessionFlow,
    SessionPhase, SpeechSynthesizer, Transcriber,
};

/// Concierge - voice-driven trip planning assistant
#[derive(Parser)]
#[command(name = "concierge", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file to use instead of the standard location
    #[arg(long, env = "CONCIERGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Plan trips interactively by voice (default)
    Run,
    /// Plan a trip from a typed request and print the itinerary
    Plan {
        /// The travel request, as it would have been spoken
        #[arg(short, long)]
        text: String,
        /// Skip the destination photo search
        #[arg(long)]
        no_images: bool,
        /// Read the itinerary aloud when done
        #[arg(long)]
        speak: bool,
    },
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! Your trip concierge is ready.")]
        text: String,
    },
    /// Interactive first-run setup
    Setup,
}

/// Menu entries of the interactive session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Speak,
    Generate,
    Listen,
    Reset,
    Quit,
}

impl MenuItem {
    const fn label(self) -> &'static str {
        match self {
            Self::Speak => "Speak a travel request",
            Self::Generate => "Generate itinerary",
            Self::Listen => "Listen to itinerary",
            Self::Reset => "Reset",
            Self::Quit => "Quit",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,trip_concierge=info",
        1 => "info,trip_concierge=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    let command = cli.command.unwrap_or(Command::Run);

    if let Command::Setup = command {
        return trip_concierge::setup::run_setup(config_path);
    }

    let config = Config::load_from(config_path);
    tracing::debug!(?config, "loaded configuration");

    match command {
        Command::Plan {
            text,
            no_images,
            speak,
        } => plan(config, text, no_images, speak).await,
        Command::TestMic { duration } => test_mic(duration).await,
        Command::TestTts { text } => test_tts(&config, &text).await,
        Command::Run | Command::Setup => run_interactive(config).await,
    }
}

/// Interactive voice session
async fn run_interactive(mut config: Config) -> anyhow::Result<()> {
    let openai = config
        .api_keys
        .openai
        .take()
        .ok_or_else(|| anyhow::anyhow!("an OpenAI API key is required for voice input"))?;

    let stt = SpeechToText::new(copy_secret(&openai), config.voice.stt_model.clone())?;
    let transcriber: Arc<dyn Transcriber> = Arc::new(MicrophoneTranscriber::new(
        stt,
        Duration::from_secs(config.voice.max_listen_secs),
    ));
    let speech: Arc<dyn SpeechSynthesizer> = Arc::new(TextToSpeech::new(openai, &config.voice)?);

    let settings = FlowSettings::from_config(&config);
    let collaborators = Collaborators {
        transcriber,
        completion: completion_client(&mut config)?,
        images: image_search(&mut config)?,
        speech,
    };
    let mut flow = SessionFlow::new(collaborators, settings);

    println!("Trip Concierge\n");

    loop {
        let items = menu_items(flow.phase());
        let labels: Vec<&str> = items.iter().map(|item| item.label()).collect();
        let choice = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match items[choice] {
            MenuItem::Speak => {
                println!("Listening... describe your trip.");
                if let Err(notice) = flow.capture().await {
                    print_notice(&notice);
                    continue;
                }
                if let Some(utterance) = flow.state().raw_utterance() {
                    println!("\nYou said: {utterance}");
                }
                match flow.extract().await {
                    Ok(()) => {
                        if let Some(summary) = flow.state().trip_summary(&config.currency_symbol) {
                            println!("\n{summary}\n");
                        }
                    }
                    Err(notice) => print_notice(&notice),
                }
            }
            MenuItem::Generate => {
                println!("Planning your trip...");
                match flow.generate().await {
                    Ok(image_notice) => {
                        print_itinerary(&flow);
                        if let Some(notice) = image_notice {
                            tracing::debug!(%notice, "photos skipped");
                        }
                    }
                    Err(notice) => print_notice(&notice),
                }
            }
            MenuItem::Listen => match flow.speak().await {
                Ok(audio) => play(audio.to_vec()).await,
                Err(notice) => print_notice(&notice),
            },
            MenuItem::Reset => {
                flow.reset();
                println!("Session cleared.\n");
            }
            MenuItem::Quit => break,
        }
    }

    Ok(())
}

/// Actions offered in each phase
fn menu_items(phase: SessionPhase) -> Vec<MenuItem> {
    let mut items = vec![MenuItem::Speak];
    match phase {
        SessionPhase::DetailsReady => items.push(MenuItem::Generate),
        SessionPhase::ItineraryReady => items.push(MenuItem::Listen),
        _ => {}
    }
    items.extend([MenuItem::Reset, MenuItem::Quit]);
    items
}

/// Plan one trip from typed text
async fn plan(mut config: Config, text: String, no_images: bool, speak: bool) -> anyhow::Result<()> {
    let speech: Arc<dyn SpeechSynthesizer> = match config.api_keys.openai.take() {
        Some(key) => Arc::new(TextToSpeech::new(key, &config.voice)?),
        None if speak => anyhow::bail!("an OpenAI API key is required for --speak"),
        None => Arc::new(NoSpeech),
    };

    let mut settings = FlowSettings::from_config(&config);
    if no_images {
        settings.image_count = 0;
    }

    let collaborators = Collaborators {
        transcriber: Arc::new(TypedUtterance::new(text)),
        completion: completion_client(&mut config)?,
        images: image_search(&mut config)?,
        speech,
    };
    let mut flow = SessionFlow::new(collaborators, settings);

    flow.capture().await?;
    flow.extract().await?;
    if let Some(summary) = flow.state().trip_summary(&config.currency_symbol) {
        println!("{summary}\n");
    }

    if let Some(notice) = flow.generate().await? {
        tracing::warn!(%notice, "continuing without photos");
    }
    print_itinerary(&flow);

    if speak {
        let audio = flow.speak().await?.to_vec();
        play(audio).await;
    }

    Ok(())
}

/// Completion client; a key is required
fn completion_client(config: &mut Config) -> anyhow::Result<Arc<dyn Completion>> {
    let key = config
        .api_keys
        .openrouter
        .take()
        .ok_or_else(|| anyhow::anyhow!("an OpenRouter API key is required"))?;
    Ok(Arc::new(OpenRouterClient::new(key, &config.llm)?))
}

/// Image search; photos are silently disabled without a key
fn image_search(config: &mut Config) -> anyhow::Result<Arc<dyn ImageSearch>> {
    match config.api_keys.unsplash.take() {
        Some(key) => Ok(Arc::new(UnsplashClient::new(key, &config.images)?)),
        None => {
            tracing::info!("no Unsplash key configured, destination photos disabled");
            Ok(Arc::new(DisabledImageSearch))
        }
    }
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_owned())
}

/// Synthesizer used when no speech key is configured and speech was not requested
struct NoSpeech;

#[async_trait::async_trait]
impl SpeechSynthesizer for NoSpeech {
    async fn synthesize(&self, _text: &str) -> trip_concierge::Result<Vec<u8>> {
        Err(trip_concierge::Error::Config(
            "speech synthesis is not configured".to_string(),
        ))
    }
}

fn print_notice(notice: &Notice) {
    println!("\n{notice}\n");
}

fn print_itinerary(flow: &SessionFlow) {
    let state = flow.state();
    if let Some(text) = state.itinerary_text() {
        println!("\n{text}\n");
    }

    let images = state.destination_images();
    if !images.is_empty() {
        println!("Destination photos:");
        for url in images {
            println!("  {url}");
        }
        println!();
    }
}

/// Play MP3 audio on a blocking thread
async fn play(audio: Vec<u8>) {
    let played = tokio::task::spawn_blocking(move || {
        let playback = AudioPlayback::new()?;
        playback.play_mp3(&audio)
    })
    .await;

    match played {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "audio playback failed");
            println!("\nCould not play audio: {e}\n");
        }
        Err(e) => tracing::warn!(error = %e, "playback task failed"),
    }
}

/// Test microphone input
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    tokio::task::spawn_blocking(move || meter_microphone(duration)).await??;

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: arecord -l (to list devices)");
    println!("  3. Try: pavucontrol (to check levels)");

    Ok(())
}

fn meter_microphone(duration: u64) -> anyhow::Result<()> {
    let mut mic = Microphone::open()?;
    mic.start()?;
    println!("---");

    for i in 0..duration {
        std::thread::sleep(Duration::from_secs(1));

        let samples = mic.take_buffer();
        let energy = rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );
    }

    mic.stop();
    Ok(())
}

/// Test TTS output
async fn test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let key = config
        .api_keys
        .openai
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("an OpenAI API key is required for TTS"))?;
    let tts = TextToSpeech::new(copy_secret(key), &config.voice)?;

    println!("Synthesizing speech...");
    let mp3_data = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    println!("Playing audio...");
    play(mp3_data).await;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}
