//! Voice I/O for shopping sessions.
//!
//! [`VoiceIo`] wraps a [`Recognizer`] and a [`Synthesizer`] and exposes the two
//! operations the workflow needs: `speak` and `listen`. Recognition failures are
//! split into retryable misses and terminal service failures.

mod capture;
mod console;
mod endpoint;
mod error;
mod io;
mod microphone;
mod playback;
mod stt;
#[cfg(test)]
mod testing;
mod tts;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use console::{ConsoleRecognizer, SilentSynthesizer};
pub use endpoint::{EndpointState, Endpointer, ListenSettings};
pub use error::{Error, RecognitionError, Result};
pub use io::{Recognizer, Synthesizer, VoiceIo};
pub use microphone::MicrophoneRecognizer;
pub use playback::AudioPlayback;
pub use stt::SpeechToText;
pub use tts::{SpeakerSynthesizer, TextToSpeech};
