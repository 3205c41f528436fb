//! The spoken shopping session.
//!
//! Credentials are captured first, before any browser exists. After sign-in
//! the session loops over search → pick → inspect → cart decision until the
//! shopper says an exit word, declines another search, or the speech service
//! goes away. Every inspected product is recorded, and the session file is
//! written however the loop ends.

use crate::operator::Operator;
use anyhow::{Context, Result};
use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use vocart_browser::{
    CartExecutor, CartOutcome, LoginOutcome, ProductExtractor, Storefront, TabSwitch,
};
use vocart_core::speech::{
    CART_AFFIRMATIVES, CONTINUE_AFFIRMATIVES, Decision, decide, is_exit_phrase, normalize_password,
    parse_email, search_term,
};
use vocart_core::{Credentials, ProductRecord, SessionRecorder};
use vocart_voice::{Recognizer, Synthesizer, VoiceIo};

const EMAIL_PROMPT: &str =
    "Please spell your email address. For example, say: n a m e at gmail dot com";
const PASSWORD_PROMPT: &str = "Please say your Amazon password.";
const SEARCH_PROMPT: &str =
    "What product would you like to search for on Amazon? Or say 'exit' to stop.";
const CART_PROMPT: &str = "Would you like to add this product to your cart? Please say yes or no.";
const CONTINUE_PROMPT: &str = "Would you like to search for another product?";

/// Why the shopping loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    ExitPhrase,
    Declined,
    SpeechUnavailable(String),
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEnd::ExitPhrase => write!(f, "exit requested"),
            SessionEnd::Declined => write!(f, "no further searches"),
            SessionEnd::SpeechUnavailable(reason) => write!(f, "speech service failed: {}", reason),
        }
    }
}

#[derive(Debug)]
pub struct SessionReport {
    pub end: SessionEnd,
    pub products: usize,
    pub csv: PathBuf,
}

/// Ask for the email until it is valid, then for the password
///
/// A speech service failure here aborts the run; nothing useful can happen
/// without credentials.
pub async fn capture_credentials<R, S, O>(
    voice: &mut VoiceIo<R, S>,
    operator: &mut O,
) -> Result<Credentials>
where
    R: Recognizer,
    S: Synthesizer,
    O: Operator,
{
    let email = loop {
        let spoken = voice.listen(EMAIL_PROMPT).await?;
        match parse_email(&spoken) {
            Some(email) => {
                voice.speak(&format!("You entered email as: {}", email)).await;
                break email;
            }
            None => {
                tracing::debug!(chars = spoken.chars().count(), "rejected email");
                voice
                    .speak("That doesn't look like a valid email address. Let's try again.")
                    .await;
            }
        }
    };

    let password = normalize_password(&voice.listen(PASSWORD_PROMPT).await?);
    voice
        .speak("This is your password. Please verify it on the screen.")
        .await;
    operator.reveal_password(&password).await?;
    voice.speak("Password verification complete.").await;

    Ok(Credentials::new(email, password))
}

pub struct ShoppingSession<R, S, F, O> {
    voice: VoiceIo<R, S>,
    store: F,
    operator: O,
    extractor: ProductExtractor,
    cart: CartExecutor,
    recorder: SessionRecorder,
}

impl<R, S, F, O> ShoppingSession<R, S, F, O>
where
    R: Recognizer,
    S: Synthesizer,
    F: Storefront,
    O: Operator,
{
    pub fn new(voice: VoiceIo<R, S>, store: F, operator: O, cart: CartExecutor) -> Self {
        let extractor = ProductExtractor::new(store.marketplace());
        Self {
            voice,
            store,
            operator,
            extractor,
            cart,
            recorder: SessionRecorder::new(),
        }
    }

    pub fn voice(&self) -> &VoiceIo<R, S> {
        &self.voice
    }

    pub fn store(&self) -> &F {
        &self.store
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn into_store(self) -> F {
        self.store
    }

    /// Sign in, shop, and write the session file even if shopping failed
    pub async fn run(
        &mut self,
        credentials: Credentials,
        output_dir: &Path,
    ) -> Result<SessionReport> {
        self.sign_in(credentials).await?;
        let end = self.shop().await;
        let csv = self.save(output_dir).await?;

        Ok(SessionReport {
            end: end?,
            products: self.recorder.len(),
            csv,
        })
    }

    /// Submit the sign-in form and hand over to the human for CAPTCHA or OTP
    ///
    /// A failed login is reported but does not stop the session.
    pub async fn sign_in(&mut self, credentials: Credentials) -> Result<LoginOutcome> {
        let outcome = self.store.sign_in(&credentials).await;
        drop(credentials);

        match &outcome {
            LoginOutcome::Submitted => {
                self.voice
                    .speak("Please complete CAPTCHA or OTP if prompted.")
                    .await;
                self.operator
                    .wait_for_enter("Press ENTER after completing CAPTCHA or OTP to continue...")
                    .await?;
            }
            LoginOutcome::Failed(reason) => {
                self.voice.speak("An error occurred during login.").await;
                println!("Error: {}", reason);
            }
        }

        self.voice.speak("Automation will now resume.").await;
        Ok(outcome)
    }

    /// Run the search loop until the shopper is done
    pub async fn shop(&mut self) -> Result<SessionEnd> {
        loop {
            let request = match self.voice.listen(SEARCH_PROMPT).await {
                Ok(request) => request,
                Err(e) => return Ok(speech_lost(e)),
            };

            if is_exit_phrase(&request) {
                self.voice
                    .speak("Okay, ending the Amazon automation. Thank you!")
                    .await;
                return Ok(SessionEnd::ExitPhrase);
            }

            let Some(term) = search_term(&request) else {
                self.voice
                    .speak("No valid product name heard. Let's try again.")
                    .await;
                continue;
            };

            if let Some(end) = self.inspect(&term).await? {
                return Ok(end);
            }

            let again = match self.voice.listen(CONTINUE_PROMPT).await {
                Ok(again) => again,
                Err(e) => return Ok(speech_lost(e)),
            };
            if !answer(&again, CONTINUE_AFFIRMATIVES).is_yes() {
                self.voice.speak("Okay, ending the session.").await;
                return Ok(SessionEnd::Declined);
            }
        }
    }

    /// One search through to the recorded product; `Some` if speech failed midway
    async fn inspect(&mut self, term: &str) -> Result<Option<SessionEnd>> {
        self.voice
            .speak(&format!("Searching Amazon for {}", term))
            .await;
        self.store
            .search(term)
            .await
            .with_context(|| format!("Search for '{}' failed", term))?;

        self.voice
            .speak("Search complete. Please use your mouse to select a product to view.")
            .await;
        self.operator
            .wait_for_enter("Press ENTER after you've selected a product to continue...")
            .await?;

        match self.store.switch_to_product().await? {
            TabSwitch::NewTab => self.voice.speak("Switched to the selected product tab.").await,
            TabSwitch::SameTab => {
                self.voice
                    .speak("Product did not open in a new tab. Staying on current page.")
                    .await
            }
        }

        let mut record = self.extractor.extract(self.store.page()).await;
        self.report(&record).await;

        // A lost speech service counts as "no" for this product
        let (wants_cart, interrupted) = match self.voice.listen(CART_PROMPT).await {
            Ok(reply) => (answer(&reply, CART_AFFIRMATIVES).is_yes(), None),
            Err(e) => (false, Some(speech_lost(e))),
        };

        if wants_cart {
            self.add_to_cart().await;
            record.added_to_cart = true;
        } else if interrupted.is_none() {
            self.voice.speak("Product not added to cart.").await;
        }

        self.recorder.append(record);

        if let Err(e) = self.store.finish_product().await {
            tracing::warn!("Could not return to the home page: {}", e);
        }

        Ok(interrupted)
    }

    async fn report(&mut self, record: &ProductRecord) {
        self.voice
            .speak("Here is the product information I found.")
            .await;

        if record.has_title() {
            self.voice
                .speak(&format!("The title is: {}", record.title))
                .await;
        } else {
            self.voice.speak("I couldn't find the product title.").await;
        }

        if record.has_price() {
            self.voice
                .speak(&format!("The price is: {}", record.price))
                .await;
        } else {
            self.voice.speak("I couldn't find the price.").await;
        }
    }

    async fn add_to_cart(&mut self) {
        self.voice
            .speak("Trying to add the product to your cart...")
            .await;

        let outcome = self.cart.add_to_cart(self.store.page()).await;
        if let CartOutcome::Confirmed { locator } | CartOutcome::Unconfirmed { locator } = &outcome
        {
            self.voice
                .speak(&format!("Clicked Add to Cart using selector: {}", locator))
                .await;
        }

        match outcome {
            CartOutcome::Confirmed { .. } => {
                self.voice
                    .speak("Product added to your cart successfully!")
                    .await
            }
            CartOutcome::Unconfirmed { .. } => {
                self.voice
                    .speak(
                        "Tried adding to cart. Confirmation not found but it might still be added.",
                    )
                    .await
            }
            CartOutcome::NotFound => {
                tracing::warn!("Recording the product as added although no button was clicked");
                self.voice
                    .speak("Could not find or click any known Add to Cart button.")
                    .await
            }
        }
    }

    /// Write every recorded product and announce the file
    pub async fn save(&mut self, output_dir: &Path) -> Result<PathBuf> {
        let path = self
            .recorder
            .write_to_dir(output_dir, &Local::now())
            .with_context(|| format!("Failed to write session file in {}", output_dir.display()))?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.voice
            .speak(&format!(
                "All product details have been saved to the file named {}",
                name
            ))
            .await;
        println!(">> Saved to {}", path.display());

        Ok(path)
    }
}

fn answer(reply: &str, accepted: &[&str]) -> Decision {
    let decision = decide(reply, accepted);
    if decision == Decision::Unclear {
        tracing::warn!(reply = %reply, "Reply not understood, treating it as no");
    }
    decision
}

fn speech_lost(error: vocart_voice::Error) -> SessionEnd {
    tracing::error!("Ending session: {}", error);
    SessionEnd::SpeechUnavailable(error.to_string())
}
