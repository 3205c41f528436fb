use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use vocart_browser::{BrowserConfig, DEFAULT_DEBUGGING_PORT, ProfileChoice};
use vocart_core::Marketplace;
use vocart_voice::ListenSettings;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum VoiceMode {
    /// Microphone and speakers through the OpenAI speech APIs
    Speech,
    /// Type answers on the terminal; prompts are only printed
    Console,
}

#[derive(Args, Debug, Clone)]
pub struct MarketplaceArgs {
    /// Storefront home page
    #[arg(long, env = "VOCART_BASE_URL", default_value = "https://www.amazon.in")]
    pub base_url: String,

    /// Currency symbol for prices assembled from whole and fraction parts
    #[arg(long, env = "VOCART_CURRENCY", default_value = "₹")]
    pub currency: String,
}

impl MarketplaceArgs {
    pub fn marketplace(&self) -> Result<Marketplace> {
        Marketplace::new(&self.base_url, self.currency.clone())
            .with_context(|| format!("Invalid base URL: {}", self.base_url))
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to Chrome binary (auto-detected if not specified)
    #[arg(long, env = "VOCART_CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Named profile kept in ~/.vocart/profiles (keeps you signed in between runs)
    #[arg(long, env = "VOCART_PROFILE", conflicts_with = "temp")]
    pub profile: Option<String>,

    /// Use a temporary profile deleted at exit (the default)
    #[arg(long)]
    pub temp: bool,

    /// Chrome remote debugging port
    #[arg(long, env = "VOCART_PORT", default_value_t = DEFAULT_DEBUGGING_PORT)]
    pub port: u16,

    /// Directory the session CSV is written to
    #[arg(short, long, env = "VOCART_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub marketplace: MarketplaceArgs,

    /// How prompts are delivered and answers captured
    #[arg(long, value_enum, env = "VOCART_VOICE", default_value = "speech")]
    pub voice: VoiceMode,

    /// API key for speech recognition and synthesis
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Speech-to-text model
    #[arg(long, env = "VOCART_STT_MODEL", default_value = "whisper-1")]
    pub stt_model: String,

    /// Transcription endpoint of a self-hosted OpenAI-compatible server
    #[arg(long, env = "VOCART_STT_ENDPOINT")]
    pub stt_endpoint: Option<String>,

    /// Text-to-speech voice
    #[arg(long, env = "VOCART_TTS_VOICE", default_value = "alloy")]
    pub tts_voice: String,

    /// Speaking rate, from 0.25 to 4.0
    #[arg(long, value_name = "RATE", default_value_t = 1.0)]
    pub tts_speed: f32,

    /// Give up on a question after this many unanswered prompts (retries forever if unset)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Seconds to wait for speech to start
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub listen_timeout: u64,

    /// Longest phrase captured, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub phrase_limit: u64,
}

impl RunArgs {
    pub fn profile_choice(&self) -> ProfileChoice {
        match &self.profile {
            Some(name) if !self.temp => ProfileChoice::Named(name.clone()),
            _ => ProfileChoice::Temporary,
        }
    }

    pub fn browser_config(&self) -> BrowserConfig {
        BrowserConfig {
            chrome_path: self.chrome_path.clone(),
            profile: self.profile_choice(),
            port: self.port,
        }
    }

    pub fn listen_settings(&self) -> ListenSettings {
        ListenSettings {
            timeout: Duration::from_secs(self.listen_timeout),
            phrase_limit: Duration::from_secs(self.phrase_limit),
            ..ListenSettings::default()
        }
    }
}
