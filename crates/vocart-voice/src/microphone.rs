use std::time::Duration;

use async_trait::async_trait;

use crate::endpoint::{EndpointState, Endpointer, ListenSettings};
use crate::io::Recognizer;
use crate::{AudioCapture, RecognitionError, SAMPLE_RATE, SpeechToText, samples_to_wav};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Headroom over the start timeout plus phrase limit before a stalled stream is abandoned
const DEADLINE_SLACK: Duration = Duration::from_secs(1);

/// Listens on the microphone and transcribes each phrase with Whisper
pub struct MicrophoneRecognizer {
    capture: AudioCapture,
    stt: SpeechToText,
    settings: ListenSettings,
}

impl MicrophoneRecognizer {
    pub fn new(capture: AudioCapture, stt: SpeechToText, settings: ListenSettings) -> Self {
        Self {
            capture,
            stt,
            settings,
        }
    }

    async fn capture_phrase(&mut self) -> Result<Vec<f32>, RecognitionError> {
        self.capture
            .start()
            .map_err(|e| RecognitionError::Service(e.to_string()))?;
        self.capture.clear_buffer();

        tokio::time::sleep(self.settings.ambient_duration).await;
        let ambient = self.capture.take_buffer();
        let endpointer = Endpointer::calibrated(&ambient, SAMPLE_RATE, &self.settings);

        let capture = &self.capture;
        endpoint_phrase(|| capture.take_buffer(), endpointer, &self.settings).await
    }
}

/// Feeds polled samples to `endpointer` until the phrase ends.
///
/// The endpointer measures time in samples, so a stream that stops delivering
/// audio would never time out on its own. A wall-clock deadline covers that.
async fn endpoint_phrase<F>(
    mut next: F,
    mut endpointer: Endpointer,
    settings: &ListenSettings,
) -> Result<Vec<f32>, RecognitionError>
where
    F: FnMut() -> Vec<f32>,
{
    let deadline = settings.timeout + settings.phrase_limit + DEADLINE_SLACK;
    let polling = async {
        loop {
            tokio::time::sleep(POLL_INTERVAL).await;
            match endpointer.push(&next()) {
                EndpointState::Waiting | EndpointState::Speaking => continue,
                EndpointState::Complete => return Ok(()),
                EndpointState::TimedOut => return Err(RecognitionError::Timeout),
            }
        }
    };

    match tokio::time::timeout(deadline, polling).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(
                deadline_ms = deadline.as_millis() as u64,
                "no audio from the microphone before the deadline"
            );
            return Err(RecognitionError::Timeout);
        }
    }

    Ok(endpointer.into_speech())
}

#[async_trait(?Send)]
impl Recognizer for MicrophoneRecognizer {
    async fn recognize(&mut self) -> Result<String, RecognitionError> {
        let phrase = self.capture_phrase().await;
        self.capture.stop();
        let samples = phrase?;

        let wav = samples_to_wav(&samples, SAMPLE_RATE)
            .map_err(|e| RecognitionError::Service(e.to_string()))?;
        let transcript = self
            .stt
            .transcribe(&wav)
            .await
            .map_err(|e| RecognitionError::Service(e.to_string()))?;

        if transcript.trim().is_empty() {
            return Err(RecognitionError::Unrecognized);
        }
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn short_settings() -> ListenSettings {
        ListenSettings {
            ambient_duration: Duration::from_millis(10),
            timeout: Duration::from_millis(200),
            phrase_limit: Duration::from_millis(200),
            pause: Duration::from_millis(100),
        }
    }

    #[tokio::test]
    async fn test_stalled_stream_times_out() {
        let settings = short_settings();
        let endpointer = Endpointer::with_threshold(0.05, SAMPLE_RATE, &settings);

        let started = Instant::now();
        let result = endpoint_phrase(Vec::new, endpointer, &settings).await;

        assert!(matches!(result, Err(RecognitionError::Timeout)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_loud_chunk_then_silence_completes() {
        let settings = short_settings();
        let endpointer = Endpointer::with_threshold(0.05, SAMPLE_RATE, &settings);
        let chunk = (SAMPLE_RATE / 10) as usize;

        let mut polls = 0;
        let source = || {
            polls += 1;
            if polls == 1 {
                vec![0.5; chunk]
            } else {
                vec![0.0; chunk]
            }
        };
        let speech = endpoint_phrase(source, endpointer, &settings).await.unwrap();

        assert!(speech.len() >= chunk);
    }
}
