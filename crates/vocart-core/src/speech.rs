//! Turns loosely formatted utterances into structured values.
//!
//! Speech backends return lowercase text such as `"john dot doe at gmail dot com"`;
//! these helpers map the spoken tokens to the characters they stand for.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").unwrap();
}

/// Accepted spellings of "yes" when asked about adding to the cart
pub const CART_AFFIRMATIVES: &[&str] = &["yes", "y", "s", "yyes", "ys", "yees"];

/// Accepted spellings of "yes" when asked about searching again
pub const CONTINUE_AFFIRMATIVES: &[&str] = &["yes", "y", "yeah", "sure", "yea", "yep"];

const NEGATIVES: &[&str] = &["no", "n", "nope", "nah", "nay"];

const EXIT_WORDS: &[&str] = &["exit", "quit", "close"];

const SEARCH_COMMAND: &str = "search";

/// Outcome of interpreting a spoken yes/no reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
    /// Neither an accepted "yes" nor a recognizable "no"; treated as "no"
    Unclear,
}

impl Decision {
    pub fn is_yes(self) -> bool {
        matches!(self, Decision::Yes)
    }
}

fn replace_spoken_symbols(spoken: &str) -> String {
    spoken
        .replace(" at ", "@")
        .replace(" dot ", ".")
        .replace("underscore", "_")
        .replace("dash", "-")
}

/// Map spoken tokens to an email candidate.
///
/// `"n a m e at gmail dot com"` becomes `"name@gmail.com"`.
pub fn normalize_email(spoken: &str) -> String {
    replace_spoken_symbols(&spoken.trim().to_lowercase()).replace(' ', "")
}

pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate)
}

/// Normalize and validate in one step
pub fn parse_email(spoken: &str) -> Option<String> {
    let candidate = normalize_email(spoken);
    is_valid_email(&candidate).then_some(candidate)
}

/// Map spoken tokens to a password; nothing is validated
pub fn normalize_password(spoken: &str) -> String {
    replace_spoken_symbols(spoken.trim())
        .replace(" space ", "")
        .replace(' ', "")
}

/// Interpret a reply against a fixed set of accepted spellings
pub fn decide(reply: &str, accepted: &[&str]) -> Decision {
    let compact: String = reply
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_lowercase();

    if accepted.contains(&compact.as_str()) {
        Decision::Yes
    } else if NEGATIVES.contains(&compact.as_str()) {
        Decision::No
    } else {
        Decision::Unclear
    }
}

pub fn is_exit_phrase(utterance: &str) -> bool {
    let utterance = utterance.to_lowercase();
    EXIT_WORDS.iter().any(|word| utterance.contains(word))
}

/// Strip a leading command word from a search request; `None` if nothing remains
pub fn search_term(utterance: &str) -> Option<String> {
    let lowered = utterance.to_lowercase();
    let all_words: Vec<&str> = lowered.split_whitespace().collect();
    let mut words = all_words.as_slice();

    if let [first, rest @ ..] = words {
        if *first == SEARCH_COMMAND {
            words = match rest {
                [filler, tail @ ..] if *filler == "for" => tail,
                _ => rest,
            };
        }
    }

    (!words.is_empty()).then(|| words.join(" "))
}
