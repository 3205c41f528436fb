//! Energy-based utterance endpointing.
//!
//! Samples arrive in arbitrary chunks from the capture callback. They are cut
//! into fixed frames; each frame's RMS energy is compared against a threshold
//! derived from a short ambient-noise sample taken before listening starts.

use std::time::Duration;

/// Frame length used for energy measurement
const FRAME_MS: u64 = 30;

/// Energy floor so a perfectly silent room still needs real speech to trigger
const MIN_THRESHOLD: f32 = 0.01;

/// Speech must exceed ambient energy by this factor
const THRESHOLD_RATIO: f32 = 1.5;

/// Timing parameters for capturing one utterance
#[derive(Debug, Clone)]
pub struct ListenSettings {
    /// Ambient sample taken before listening to calibrate the threshold
    pub ambient_duration: Duration,
    /// How long to wait for speech to start
    pub timeout: Duration,
    /// Upper bound on the length of one phrase
    pub phrase_limit: Duration,
    /// Trailing silence that ends a phrase
    pub pause: Duration,
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            ambient_duration: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
            phrase_limit: Duration::from_secs(10),
            pause: Duration::from_millis(800),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// No speech yet
    Waiting,
    /// Speech started, phrase still open
    Speaking,
    /// Phrase finished by a pause or the phrase limit
    Complete,
    /// Nothing was said before the timeout
    TimedOut,
}

pub struct Endpointer {
    frame_len: usize,
    frame_ms: u64,
    threshold: f32,
    timeout_ms: u64,
    phrase_limit_ms: u64,
    pause_ms: u64,
    pending: Vec<f32>,
    speech: Vec<f32>,
    waited_ms: u64,
    spoken_ms: u64,
    silence_ms: u64,
    state: EndpointState,
}

/// Root-mean-square energy of a block of samples
pub(crate) fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

impl Endpointer {
    /// Calibrate the speech threshold from an ambient-noise sample
    pub fn calibrated(ambient: &[f32], sample_rate: u32, settings: &ListenSettings) -> Self {
        let threshold = (rms(ambient) * THRESHOLD_RATIO).max(MIN_THRESHOLD);
        tracing::debug!(threshold, "calibrated speech threshold");
        Self::with_threshold(threshold, sample_rate, settings)
    }

    pub fn with_threshold(threshold: f32, sample_rate: u32, settings: &ListenSettings) -> Self {
        let frame_len = ((u64::from(sample_rate) * FRAME_MS) / 1000).max(1) as usize;
        Self {
            frame_len,
            frame_ms: FRAME_MS,
            threshold,
            timeout_ms: settings.timeout.as_millis() as u64,
            phrase_limit_ms: settings.phrase_limit.as_millis() as u64,
            pause_ms: settings.pause.as_millis() as u64,
            pending: Vec::new(),
            speech: Vec::new(),
            waited_ms: 0,
            spoken_ms: 0,
            silence_ms: 0,
            state: EndpointState::Waiting,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn state(&self) -> EndpointState {
        self.state
    }

    /// Feed newly captured samples; returns the state after consuming every full frame
    pub fn push(&mut self, samples: &[f32]) -> EndpointState {
        self.pending.extend_from_slice(samples);

        let mut offset = 0;
        while self.pending.len() - offset >= self.frame_len && !self.is_finished() {
            let frame = self.pending[offset..offset + self.frame_len].to_vec();
            offset += self.frame_len;
            self.consume_frame(&frame);
        }
        self.pending.drain(..offset);

        self.state
    }

    fn is_finished(&self) -> bool {
        matches!(self.state, EndpointState::Complete | EndpointState::TimedOut)
    }

    fn consume_frame(&mut self, frame: &[f32]) {
        let voiced = rms(frame) > self.threshold;

        match self.state {
            EndpointState::Waiting => {
                if voiced {
                    self.state = EndpointState::Speaking;
                    self.speech.extend_from_slice(frame);
                    self.spoken_ms = self.frame_ms;
                } else {
                    self.waited_ms += self.frame_ms;
                    if self.waited_ms >= self.timeout_ms {
                        self.state = EndpointState::TimedOut;
                    }
                }
            }
            EndpointState::Speaking => {
                self.speech.extend_from_slice(frame);
                self.spoken_ms += self.frame_ms;
                self.silence_ms = if voiced { 0 } else { self.silence_ms + self.frame_ms };

                if self.silence_ms >= self.pause_ms || self.spoken_ms >= self.phrase_limit_ms {
                    self.state = EndpointState::Complete;
                }
            }
            EndpointState::Complete | EndpointState::TimedOut => {}
        }
    }

    /// Samples from the start of speech to the end of the phrase
    pub fn into_speech(self) -> Vec<f32> {
        self.speech
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SAMPLE_RATE;

    fn tone(duration_ms: u64, amplitude: f32) -> Vec<f32> {
        let count = (u64::from(SAMPLE_RATE) * duration_ms / 1000) as usize;
        (0..count)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                amplitude * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
            })
            .collect()
    }

    fn silence(duration_ms: u64) -> Vec<f32> {
        vec![0.0; (u64::from(SAMPLE_RATE) * duration_ms / 1000) as usize]
    }

    fn settings() -> ListenSettings {
        ListenSettings {
            ambient_duration: Duration::from_millis(0),
            timeout: Duration::from_millis(300),
            phrase_limit: Duration::from_millis(900),
            pause: Duration::from_millis(150),
        }
    }

    #[test]
    fn test_calibration_respects_floor() {
        let quiet = Endpointer::calibrated(&silence(500), SAMPLE_RATE, &settings());
        assert_eq!(quiet.threshold(), MIN_THRESHOLD);

        let noisy = Endpointer::calibrated(&tone(500, 0.2), SAMPLE_RATE, &settings());
        assert!(noisy.threshold() > 0.2);
    }

    #[test]
    fn test_silence_times_out() {
        let mut endpointer = Endpointer::with_threshold(0.05, SAMPLE_RATE, &settings());
        assert_eq!(endpointer.push(&silence(200)), EndpointState::Waiting);
        assert_eq!(endpointer.push(&silence(200)), EndpointState::TimedOut);
        assert!(endpointer.into_speech().is_empty());
    }

    #[test]
    fn test_pause_completes_phrase() {
        let mut endpointer = Endpointer::with_threshold(0.05, SAMPLE_RATE, &settings());
        endpointer.push(&silence(90));
        assert_eq!(endpointer.push(&tone(300, 0.5)), EndpointState::Speaking);
        assert_eq!(endpointer.push(&silence(300)), EndpointState::Complete);

        // Speech plus the trailing pause, leading silence excluded
        let speech = endpointer.into_speech();
        let frame = (SAMPLE_RATE as usize * 30) / 1000;
        assert_eq!(speech.len(), frame * (10 + 5));
    }

    #[test]
    fn test_phrase_limit_cuts_long_speech() {
        let mut endpointer = Endpointer::with_threshold(0.05, SAMPLE_RATE, &settings());
        assert_eq!(endpointer.push(&tone(2000, 0.5)), EndpointState::Complete);

        let frame = (SAMPLE_RATE as usize * 30) / 1000;
        assert_eq!(endpointer.into_speech().len(), frame * 30);
    }

    #[test]
    fn test_chunks_smaller_than_a_frame_accumulate() {
        let mut endpointer = Endpointer::with_threshold(0.05, SAMPLE_RATE, &settings());
        let loud = tone(30, 0.5);
        for chunk in loud.chunks(100) {
            endpointer.push(chunk);
        }
        assert_eq!(endpointer.state(), EndpointState::Speaking);
    }
}
