use crate::{Error, RecognitionError, Result};
use async_trait::async_trait;

const UNRECOGNIZED_REPLY: &str = "Sorry, I didn't catch that. Please repeat.";
const TIMEOUT_REPLY: &str = "No voice input detected. Please try again.";
const SERVICE_FAILURE_REPLY: &str = "There was a problem with the speech service.";

/// Captures one utterance and turns it into text
#[async_trait(?Send)]
pub trait Recognizer {
    async fn recognize(&mut self) -> std::result::Result<String, RecognitionError>;
}

/// Says text out loud
#[async_trait(?Send)]
pub trait Synthesizer {
    async fn say(&mut self, text: &str) -> Result<()>;
}

#[async_trait(?Send)]
impl<T: Recognizer + ?Sized> Recognizer for Box<T> {
    async fn recognize(&mut self) -> std::result::Result<String, RecognitionError> {
        (**self).recognize().await
    }
}

#[async_trait(?Send)]
impl<T: Synthesizer + ?Sized> Synthesizer for Box<T> {
    async fn say(&mut self, text: &str) -> Result<()> {
        (**self).say(text).await
    }
}

/// Spoken prompts in, transcribed answers out
pub struct VoiceIo<R, S> {
    recognizer: R,
    synthesizer: S,
    max_attempts: Option<u32>,
}

impl<R: Recognizer, S: Synthesizer> VoiceIo<R, S> {
    pub fn new(recognizer: R, synthesizer: S) -> Self {
        Self {
            recognizer,
            synthesizer,
            max_attempts: None,
        }
    }

    /// Give up after `attempts` prompts instead of re-prompting forever
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    /// Echo to the console and say it; synthesis failures never reach the caller
    pub async fn speak(&mut self, text: &str) {
        println!(">> {}", text);
        if let Err(e) = self.synthesizer.say(text).await {
            tracing::warn!(error = %e, "speech synthesis failed");
        }
    }

    /// Prompt until an utterance is recognized; returns it trimmed and lowercased
    ///
    /// Misses and timeouts re-prompt. A service failure is returned as
    /// [`Error::ServiceUnavailable`] rather than as empty text.
    pub async fn listen(&mut self, prompt: &str) -> Result<String> {
        let mut attempts = 0;

        loop {
            self.speak(prompt).await;
            attempts += 1;
            println!("Listening...");

            let failure = match self.recognizer.recognize().await {
                Ok(text) if !text.trim().is_empty() => {
                    let text = text.trim().to_lowercase();
                    tracing::debug!(
                        chars = text.chars().count(),
                        attempts,
                        "utterance recognized"
                    );
                    return Ok(text);
                }
                Ok(_) => RecognitionError::Unrecognized,
                Err(e) => e,
            };

            tracing::debug!(error = %failure, attempts, "recognition attempt failed");
            match failure {
                RecognitionError::Unrecognized => self.speak(UNRECOGNIZED_REPLY).await,
                RecognitionError::Timeout => self.speak(TIMEOUT_REPLY).await,
                RecognitionError::Service(reason) => {
                    self.speak(SERVICE_FAILURE_REPLY).await;
                    tracing::error!(reason = %reason, "speech service failed");
                    return Err(Error::ServiceUnavailable(reason));
                }
            }

            if self.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(Error::RetriesExhausted(attempts));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::LogCapture;
    use std::collections::VecDeque;

    /// Plays back a fixed list of recognition results
    pub struct ScriptedRecognizer {
        pub replies: VecDeque<std::result::Result<String, RecognitionError>>,
    }

    #[async_trait(?Send)]
    impl Recognizer for ScriptedRecognizer {
        async fn recognize(&mut self) -> std::result::Result<String, RecognitionError> {
            self.replies
                .pop_front()
                .unwrap_or_else(|| Err(RecognitionError::Service("script exhausted".into())))
        }
    }

    #[derive(Default)]
    pub struct RecordingSynthesizer {
        pub spoken: Vec<String>,
        pub fail: bool,
    }

    #[async_trait(?Send)]
    impl Synthesizer for RecordingSynthesizer {
        async fn say(&mut self, text: &str) -> Result<()> {
            self.spoken.push(text.to_string());
            if self.fail {
                return Err(Error::Tts("speaker unplugged".to_string()));
            }
            Ok(())
        }
    }

    fn voice(
        replies: Vec<std::result::Result<String, RecognitionError>>,
    ) -> VoiceIo<ScriptedRecognizer, RecordingSynthesizer> {
        VoiceIo::new(
            ScriptedRecognizer {
                replies: replies.into(),
            },
            RecordingSynthesizer::default(),
        )
    }

    #[tokio::test]
    async fn test_listen_returns_normalized_text() {
        let mut voice = voice(vec![Ok("  Wireless Mouse ".to_string())]);
        let text = voice.listen("What product?").await.unwrap();

        assert_eq!(text, "wireless mouse");
        assert_eq!(voice.synthesizer().spoken, vec!["What product?"]);
    }

    #[tokio::test]
    async fn test_listen_reprompts_on_misses() {
        let mut voice = voice(vec![
            Err(RecognitionError::Unrecognized),
            Err(RecognitionError::Timeout),
            Ok("   ".to_string()),
            Ok("yes".to_string()),
        ]);
        let text = voice.listen("Add to cart?").await.unwrap();

        assert_eq!(text, "yes");
        assert_eq!(
            voice.synthesizer().spoken,
            vec![
                "Add to cart?",
                UNRECOGNIZED_REPLY,
                "Add to cart?",
                TIMEOUT_REPLY,
                "Add to cart?",
                UNRECOGNIZED_REPLY,
                "Add to cart?",
            ]
        );
    }

    #[tokio::test]
    async fn test_service_failure_is_terminal() {
        let mut voice = voice(vec![
            Err(RecognitionError::Service("quota exceeded".to_string())),
            Ok("never reached".to_string()),
        ]);
        let result = voice.listen("Email?").await;

        assert!(
            matches!(result, Err(Error::ServiceUnavailable(reason)) if reason == "quota exceeded")
        );
        assert_eq!(
            voice.synthesizer().spoken.last().map(String::as_str),
            Some(SERVICE_FAILURE_REPLY)
        );
    }

    #[tokio::test]
    async fn test_max_attempts_bounds_retries() {
        let mut voice = voice(vec![
            Err(RecognitionError::Timeout),
            Err(RecognitionError::Timeout),
            Ok("late".to_string()),
        ])
        .with_max_attempts(2);

        let result = voice.listen("Search?").await;
        assert!(matches!(result, Err(Error::RetriesExhausted(2))));
    }

    #[tokio::test]
    async fn test_speak_swallows_synthesis_errors() {
        let mut voice = VoiceIo::new(
            ScriptedRecognizer {
                replies: VecDeque::new(),
            },
            RecordingSynthesizer {
                spoken: Vec::new(),
                fail: true,
            },
        );
        voice.speak("hello").await;
        assert_eq!(voice.synthesizer().spoken, vec!["hello"]);
    }

    #[test]
    fn test_retryable_categories() {
        assert!(RecognitionError::Unrecognized.is_retryable());
        assert!(RecognitionError::Timeout.is_retryable());
        assert!(!RecognitionError::Service("down".into()).is_retryable());
    }

    #[tokio::test]
    async fn test_recognized_text_is_not_logged() {
        let logs = LogCapture::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber(tracing::Level::DEBUG));

        let mut voice = voice(vec![Ok("Hunter2 Secret".to_string())]);
        voice.listen("Please say your password.").await.unwrap();

        let output = logs.contents();
        assert!(output.contains("utterance recognized"));
        assert!(!output.to_lowercase().contains("hunter2"));
    }
}
