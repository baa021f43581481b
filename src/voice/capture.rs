//! Speech capture session
//!
//! Turns a recognizer's event stream into one committed transcript per
//! utterance, with start/stop toggling.
//!
//! ```text
//! Idle --toggle--> Listening --End/Error/toggle--> Idle
//! ```

use tokio::sync::mpsc;

use super::recognition::{RecognitionConfig, RecognitionEvent, SpeechRecognizer};

/// Shown when no recognizer is available
pub const UNSUPPORTED_MESSAGE: &str = "Seu navegador não suporta reconhecimento de voz.";

/// Shown when the recognizer refuses to start
pub const START_FAILED_MESSAGE: &str =
    "Não foi possível acessar o microfone. Verifique as permissões.";

/// Shown when a session ends without any transcript
pub const NO_AUDIO_MESSAGE: &str = "Não conseguimos ouvir nada. Por favor, tente novamente.";

/// State of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Not listening
    Idle,
    /// Recognizer running
    Listening,
}

type TranscriptCallback = Box<dyn FnMut(&str) + Send>;
type ProcessingCallback = Box<dyn FnMut(bool) + Send>;

/// Drives a [`SpeechRecognizer`] one utterance at a time
pub struct SpeechCapture {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    config: RecognitionConfig,
    state: CaptureState,
    transcript: String,
    events: Option<mpsc::UnboundedReceiver<RecognitionEvent>>,
    last_error: Option<&'static str>,
    on_transcript: Option<TranscriptCallback>,
    on_processing: Option<ProcessingCallback>,
}

impl std::fmt::Debug for SpeechCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechCapture")
            .field("supported", &self.recognizer.is_some())
            .field("config", &self.config)
            .field("state", &self.state)
            .field("transcript", &self.transcript)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl SpeechCapture {
    /// Create a capture session over a recognizer
    #[must_use]
    pub fn new(recognizer: Box<dyn SpeechRecognizer>, config: RecognitionConfig) -> Self {
        Self::with_recognizer(Some(recognizer), config)
    }

    /// Create a capture session on a platform without speech recognition
    #[must_use]
    pub fn unsupported(config: RecognitionConfig) -> Self {
        Self::with_recognizer(None, config)
    }

    fn with_recognizer(
        recognizer: Option<Box<dyn SpeechRecognizer>>,
        config: RecognitionConfig,
    ) -> Self {
        Self {
            recognizer,
            config,
            state: CaptureState::Idle,
            transcript: String::new(),
            events: None,
            last_error: None,
            on_transcript: None,
            on_processing: None,
        }
    }

    /// Called once per committed utterance
    #[must_use]
    pub fn on_transcript(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_transcript = Some(Box::new(callback));
        self
    }

    /// Called on every Idle/Listening transition with the new listening flag
    #[must_use]
    pub fn on_processing_change(mut self, callback: impl FnMut(bool) + Send + 'static) -> Self {
        self.on_processing = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn state(&self) -> CaptureState {
        self.state
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.state == CaptureState::Listening
    }

    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Latest (possibly partial) transcript of the current or last utterance
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Last user-visible error, cleared when a new session starts
    #[must_use]
    pub const fn last_error(&self) -> Option<&'static str> {
        self.last_error
    }

    pub fn reset_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Start listening when idle, stop when listening
    pub fn toggle(&mut self) -> CaptureState {
        match self.state {
            CaptureState::Idle => self.start(),
            CaptureState::Listening => self.stop(),
        }
        self.state
    }

    /// Start a session; no-op while already listening
    pub fn start(&mut self) {
        if self.is_listening() {
            return;
        }

        let Some(recognizer) = self.recognizer.as_mut() else {
            tracing::warn!("speech recognition not supported");
            self.last_error = Some(UNSUPPORTED_MESSAGE);
            return;
        };

        self.transcript.clear();
        self.last_error = None;

        let (tx, rx) = mpsc::unbounded_channel();
        if let Err(e) = recognizer.start(&self.config, tx) {
            tracing::warn!(error = %e, "failed to start speech recognition");
            self.last_error = Some(START_FAILED_MESSAGE);
            return;
        }

        tracing::debug!(lang = %self.config.lang, "listening");
        self.events = Some(rx);
        self.set_state(CaptureState::Listening);
    }

    /// Abort the current session without committing anything
    pub fn stop(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
        // Events still in flight belong to the aborted session
        self.events = None;
        self.set_state(CaptureState::Idle);
    }

    /// Apply one recognizer event
    ///
    /// Returns the committed transcript when the event ends an utterance
    /// that produced text. Events arriving while idle are ignored.
    pub fn handle_event(&mut self, event: RecognitionEvent) -> Option<String> {
        if !self.is_listening() {
            tracing::trace!(?event, "ignoring event while idle");
            return None;
        }

        match event {
            RecognitionEvent::Result { transcript, is_final } => {
                tracing::trace!(transcript = %transcript, is_final, "recognition result");
                self.transcript = transcript;
                None
            }
            RecognitionEvent::Error(kind) => {
                tracing::warn!(?kind, "speech recognition error");
                self.last_error = Some(kind.message());
                self.finish();
                None
            }
            RecognitionEvent::End => {
                self.finish();
                let committed = self.transcript.trim();
                if committed.is_empty() {
                    self.last_error = Some(NO_AUDIO_MESSAGE);
                    return None;
                }

                let committed = committed.to_string();
                tracing::info!(transcript = %committed, "utterance committed");
                if let Some(callback) = self.on_transcript.as_mut() {
                    callback(&committed);
                }
                Some(committed)
            }
        }
    }

    /// Process events until the session returns to idle
    ///
    /// Returns the committed transcript, if any. A recognizer that drops its
    /// channel without ending is treated as having ended.
    pub async fn run_until_idle(&mut self) -> Option<String> {
        let mut committed = None;

        while self.is_listening() {
            let event = match self.events.as_mut() {
                Some(rx) => rx.recv().await.unwrap_or(RecognitionEvent::End),
                None => break,
            };
            if let Some(transcript) = self.handle_event(event) {
                committed = Some(transcript);
            }
        }

        committed
    }

    fn finish(&mut self) {
        self.events = None;
        self.set_state(CaptureState::Idle);
    }

    fn set_state(&mut self, state: CaptureState) {
        if self.state == state {
            return;
        }
        self.state = state;
        if let Some(callback) = self.on_processing.as_mut() {
            callback(state == CaptureState::Listening);
        }
    }
}
