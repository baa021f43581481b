//! One-shot speech synthesis
//!
//! A [`Narrator`] speaks one utterance at a time. Starting a new utterance
//! cancels the one in progress; nothing is queued.

use crate::Result;
use crate::config::DEFAULT_LANG;

/// Text to speak and its language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
}

/// What a synthesizer did with an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Playback already completed
    Finished,
    /// Playback continues; the owner reports completion via [`Narrator::playback_finished`]
    Pending,
}

/// Why an utterance stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Completed,
    Cancelled,
}

/// A speech synthesis engine
pub trait SpeechSynthesizer: Send {
    /// Begin speaking
    ///
    /// # Errors
    ///
    /// Returns error if the engine rejects the utterance
    fn speak(&mut self, utterance: &Utterance) -> Result<Playback>;

    /// Silence any playback in progress
    fn cancel(&mut self);
}

/// Synthesizer that writes utterances to the log and finishes immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSynthesizer;

impl SpeechSynthesizer for LogSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> Result<Playback> {
        tracing::info!(lang = %utterance.lang, text = %utterance.text, "speaking");
        Ok(Playback::Finished)
    }

    fn cancel(&mut self) {}
}

type StartCallback = Box<dyn FnMut(&Utterance) + Send>;
type EndCallback = Box<dyn FnMut(&Utterance, EndReason) + Send>;

/// Speaks prompts through an optional synthesizer
pub struct Narrator {
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    lang: String,
    current: Option<Utterance>,
    on_start: Option<StartCallback>,
    on_end: Option<EndCallback>,
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("available", &self.synthesizer.is_some())
            .field("lang", &self.lang)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl Narrator {
    #[must_use]
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>, lang: impl Into<String>) -> Self {
        Self {
            synthesizer: Some(synthesizer),
            lang: lang.into(),
            current: None,
            on_start: None,
            on_end: None,
        }
    }

    /// Narrator on a platform without speech synthesis; `say` does nothing
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            synthesizer: None,
            lang: DEFAULT_LANG.to_string(),
            current: None,
            on_start: None,
            on_end: None,
        }
    }

    #[must_use]
    pub fn on_start(mut self, callback: impl FnMut(&Utterance) + Send + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_end(mut self, callback: impl FnMut(&Utterance, EndReason) + Send + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn is_speaking(&self) -> bool {
        self.current.is_some()
    }

    /// Speak `text`, cancelling whatever is playing
    ///
    /// # Errors
    ///
    /// Returns error if the synthesizer rejects the utterance
    pub fn say(&mut self, text: &str) -> Result<()> {
        if self.synthesizer.is_none() {
            tracing::debug!("speech synthesis unavailable, skipping prompt");
            return Ok(());
        }

        self.cancel();

        let utterance = Utterance {
            text: text.to_string(),
            lang: self.lang.clone(),
        };

        let playback = match self.synthesizer.as_mut() {
            Some(synthesizer) => synthesizer.speak(&utterance)?,
            None => return Ok(()),
        };

        if let Some(callback) = self.on_start.as_mut() {
            callback(&utterance);
        }
        self.current = Some(utterance);

        if playback == Playback::Finished {
            self.end(EndReason::Completed);
        }
        Ok(())
    }

    /// Stop the current utterance, if any
    pub fn cancel(&mut self) {
        if self.current.is_none() {
            return;
        }
        if let Some(synthesizer) = self.synthesizer.as_mut() {
            synthesizer.cancel();
        }
        self.end(EndReason::Cancelled);
    }

    /// Report that pending playback completed
    pub fn playback_finished(&mut self) {
        self.end(EndReason::Completed);
    }

    fn end(&mut self, reason: EndReason) {
        let Some(utterance) = self.current.take() else {
            return;
        };
        if let Some(callback) = self.on_end.as_mut() {
            callback(&utterance, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::Error;

    #[derive(Default)]
    struct Log {
        events: Vec<String>,
    }

    /// Synthesizer whose playback only ends when told to
    struct HeldSynthesizer {
        log: Arc<Mutex<Log>>,
    }

    impl SpeechSynthesizer for HeldSynthesizer {
        fn speak(&mut self, utterance: &Utterance) -> Result<Playback> {
            self.log.lock().unwrap().events.push(format!("speak:{}", utterance.text));
            Ok(Playback::Pending)
        }

        fn cancel(&mut self) {
            self.log.lock().unwrap().events.push("cancel".to_string());
        }
    }

    struct BrokenSynthesizer;

    impl SpeechSynthesizer for BrokenSynthesizer {
        fn speak(&mut self, _: &Utterance) -> Result<Playback> {
            Err(Error::Speech("no voices installed".to_string()))
        }

        fn cancel(&mut self) {}
    }

    fn narrator_with_log(synth: Box<dyn SpeechSynthesizer>) -> (Narrator, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        let start_log = log.clone();
        let end_log = log.clone();
        let narrator = Narrator::new(synth, "pt-BR")
            .on_start(move |u| start_log.lock().unwrap().events.push(format!("start:{}", u.text)))
            .on_end(move |u, reason| {
                end_log.lock().unwrap().events.push(format!("end:{}:{reason:?}", u.text));
            });
        (narrator, log)
    }

    #[test]
    fn new_utterance_cancels_previous() {
        let log = Arc::new(Mutex::new(Log::default()));
        let synth = HeldSynthesizer { log: log.clone() };
        let (mut narrator, events) = narrator_with_log(Box::new(synth));

        narrator.say("Olá! Como você se chama?").unwrap();
        assert!(narrator.is_speaking());
        narrator.say("Quase lá!").unwrap();
        narrator.playback_finished();

        assert_eq!(
            log.lock().unwrap().events,
            vec!["speak:Olá! Como você se chama?", "cancel", "speak:Quase lá!"]
        );
        assert_eq!(
            events.lock().unwrap().events,
            vec![
                "start:Olá! Como você se chama?",
                "end:Olá! Como você se chama?:Cancelled",
                "start:Quase lá!",
                "end:Quase lá!:Completed",
            ]
        );
        assert!(!narrator.is_speaking());
    }

    #[test]
    fn immediate_playback_ends_right_away() {
        let (mut narrator, events) = narrator_with_log(Box::new(LogSynthesizer));
        narrator.say("Perfeito!").unwrap();

        assert!(!narrator.is_speaking());
        assert_eq!(
            events.lock().unwrap().events,
            vec!["start:Perfeito!", "end:Perfeito!:Completed"]
        );
    }

    #[test]
    fn rejected_utterance_fires_nothing() {
        let (mut narrator, events) = narrator_with_log(Box::new(BrokenSynthesizer));
        assert!(narrator.say("oi").is_err());
        assert!(events.lock().unwrap().events.is_empty());
    }

    #[test]
    fn unavailable_is_silent() {
        let mut narrator = Narrator::unavailable();
        narrator.say("oi").unwrap();
        narrator.cancel();
        assert!(!narrator.is_speaking());
    }
}
