//! Typed stand-ins for the microphone and speakers

use std::io::BufRead;

use async_trait::async_trait;

use crate::io::{Recognizer, Synthesizer};
use crate::{RecognitionError, Result};

/// Reads each "utterance" as a line of text
pub struct ConsoleRecognizer<R> {
    input: Input<R>,
}

enum Input<R> {
    Reader(R),
    // Locked per line so other terminal prompts can read between utterances
    Stdin,
}

impl ConsoleRecognizer<std::io::Empty> {
    pub fn stdin() -> Self {
        Self {
            input: Input::Stdin,
        }
    }
}

impl<R: BufRead> ConsoleRecognizer<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Input::Reader(input),
        }
    }
}

#[async_trait(?Send)]
impl<R: BufRead> Recognizer for ConsoleRecognizer<R> {
    async fn recognize(&mut self) -> std::result::Result<String, RecognitionError> {
        let mut line = String::new();
        let read = match &mut self.input {
            Input::Reader(reader) => reader.read_line(&mut line),
            Input::Stdin => std::io::stdin().read_line(&mut line),
        };

        match read {
            Ok(0) => Err(RecognitionError::Service("input closed".to_string())),
            Ok(_) if line.trim().is_empty() => Err(RecognitionError::Unrecognized),
            Ok(_) => Ok(line.trim().to_string()),
            Err(e) => Err(RecognitionError::Service(e.to_string())),
        }
    }
}

/// Prompts are already echoed to the console, so nothing else is played
#[derive(Debug, Default)]
pub struct SilentSynthesizer;

#[async_trait(?Send)]
impl Synthesizer for SilentSynthesizer {
    async fn say(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_lines_become_utterances() {
        let mut recognizer = ConsoleRecognizer::new(Cursor::new("wireless mouse\n\nyes\n"));

        assert_eq!(recognizer.recognize().await, Ok("wireless mouse".to_string()));
        assert_eq!(recognizer.recognize().await, Err(RecognitionError::Unrecognized));
        assert_eq!(recognizer.recognize().await, Ok("yes".to_string()));
        assert!(matches!(
            recognizer.recognize().await,
            Err(RecognitionError::Service(_))
        ));
    }
}
