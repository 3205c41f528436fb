use crate::config::{RunArgs, VoiceMode};
use crate::operator::TerminalOperator;
use crate::workflow::{ShoppingSession, capture_credentials};
use anyhow::{Context, Result};
use vocart_browser::{BrowserSession, CartExecutor};
use vocart_voice::{
    AudioCapture, AudioPlayback, ConsoleRecognizer, MicrophoneRecognizer, Recognizer,
    SilentSynthesizer, SpeakerSynthesizer, SpeechToText, Synthesizer, TextToSpeech, VoiceIo,
};

type DynVoice = VoiceIo<Box<dyn Recognizer>, Box<dyn Synthesizer>>;

pub fn execute(args: &RunArgs) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(args))
}

async fn run(args: &RunArgs) -> Result<()> {
    let marketplace = args.marketplace.marketplace()?;
    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Could not create output directory {}", args.output_dir.display())
    })?;
    let mut voice = build_voice(args)?;
    let mut operator = TerminalOperator::new();

    let credentials = capture_credentials(&mut voice, &mut operator)
        .await
        .context("Could not capture sign-in details")?;

    println!("Starting Chrome...");
    let store = BrowserSession::launch(&args.browser_config(), marketplace)
        .await
        .context("Failed to start the browser session")?;

    let mut session = ShoppingSession::new(voice, store, operator, CartExecutor::default());
    let report = session.run(credentials, &args.output_dir).await;
    session.into_store().shutdown().await;

    let report = report?;
    tracing::info!(
        "Session ended ({}) after {} product(s); saved to {}",
        report.end,
        report.products,
        report.csv.display()
    );
    Ok(())
}

fn build_voice(args: &RunArgs) -> Result<DynVoice> {
    let (recognizer, synthesizer): (Box<dyn Recognizer>, Box<dyn Synthesizer>) = match args.voice {
        VoiceMode::Console => (Box::new(ConsoleRecognizer::stdin()), Box::new(SilentSynthesizer)),
        VoiceMode::Speech => {
            let api_key = args.openai_api_key.clone().context(
                "Speech mode needs an OpenAI API key (--openai-api-key or OPENAI_API_KEY); \
                 use --voice console to type instead",
            )?;

            let mut stt = SpeechToText::new(api_key.clone(), args.stt_model.clone())?;
            if let Some(endpoint) = &args.stt_endpoint {
                stt = stt.with_endpoint(endpoint.clone());
            }
            let capture = AudioCapture::new().context("Could not open the microphone")?;
            let recognizer = MicrophoneRecognizer::new(capture, stt, args.listen_settings());

            let tts = TextToSpeech::new(api_key, args.tts_voice.clone())?
                .with_speed(args.tts_speed);
            let playback = AudioPlayback::new().context("Could not open the audio output")?;
            let synthesizer = SpeakerSynthesizer::new(tts, playback);

            (Box::new(recognizer), Box::new(synthesizer))
        }
    };

    let voice = VoiceIo::new(recognizer, synthesizer);
    Ok(match args.max_attempts {
        Some(attempts) => voice.with_max_attempts(attempts),
        None => voice,
    })
}
