//! Speech recognition capability
//!
//! A recognizer is started with a config and an event channel. It reports
//! interim and final results, errors, and the end of the session as
//! [`RecognitionEvent`]s on that channel.

use std::collections::VecDeque;

use tokio::sync::mpsc;

use crate::Result;
use crate::config::DEFAULT_LANG;

/// Channel a recognizer reports on
pub type EventSender = mpsc::UnboundedSender<RecognitionEvent>;

/// Recognition session settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    /// BCP 47 language tag
    pub lang: String,
    /// Keep listening across utterances
    pub continuous: bool,
    /// Report partial results while the user is still speaking
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            continuous: false,
            interim_results: true,
        }
    }
}

impl RecognitionConfig {
    /// Default settings with a different language
    #[must_use]
    pub fn with_lang(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            ..Self::default()
        }
    }
}

/// Runtime failure reported by a recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    Aborted,
    AudioCapture,
    Network,
    NotAllowed,
    NoSpeech,
    ServiceNotAvailable,
    /// Any code not listed above
    Other(String),
}

impl RecognitionErrorKind {
    /// Map a Web Speech API error code
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "aborted" => Self::Aborted,
            "audio-capture" => Self::AudioCapture,
            "network" => Self::Network,
            "not-allowed" => Self::NotAllowed,
            "no-speech" => Self::NoSpeech,
            "service-not-available" => Self::ServiceNotAvailable,
            other => Self::Other(other.to_string()),
        }
    }

    /// User-facing message
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::NotAllowed => "Não foi possível acessar o microfone. Verifique as permissões.",
            Self::AudioCapture => "Não foi possível capturar áudio. Verifique seu microfone.",
            Self::Network => "Erro de conexão. Verifique sua internet.",
            Self::NoSpeech => "Nenhum áudio detectado. Tente falar mais alto.",
            Self::ServiceNotAvailable => "Serviço de reconhecimento não disponível.",
            Self::Aborted => "Reconhecimento de voz interrompido.",
            Self::Other(_) => "Erro desconhecido. Tente novamente.",
        }
    }
}

/// Event emitted by a recognizer during a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Latest hypothesis for the current utterance
    Result { transcript: String, is_final: bool },
    /// Session failed
    Error(RecognitionErrorKind),
    /// Session ended
    End,
}

/// A speech recognition engine
pub trait SpeechRecognizer: Send {
    /// Begin a session, reporting on `events`
    ///
    /// # Errors
    ///
    /// Returns error if the engine cannot start (e.g. no microphone access)
    fn start(&mut self, config: &RecognitionConfig, events: EventSender) -> Result<()>;

    /// Abort the current session
    fn stop(&mut self);
}

/// Recognizer that replays queued utterances
///
/// Each session takes the next utterance and reports it word by word as
/// interim results, then as a final result, then ends. An empty queue
/// reports `no-speech`.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    utterances: VecDeque<String>,
    sessions: usize,
}

impl ScriptedRecognizer {
    #[must_use]
    pub fn new<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            utterances: utterances.into_iter().map(Into::into).collect(),
            sessions: 0,
        }
    }

    /// Queue another utterance
    pub fn push(&mut self, utterance: impl Into<String>) {
        self.utterances.push_back(utterance.into());
    }

    /// Utterances not yet replayed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.utterances.len()
    }

    /// Number of sessions started so far
    #[must_use]
    pub const fn sessions(&self) -> usize {
        self.sessions
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&mut self, config: &RecognitionConfig, events: EventSender) -> Result<()> {
        self.sessions += 1;

        let Some(utterance) = self.utterances.pop_front() else {
            tracing::debug!("scripted recognizer has nothing queued");
            let _ = events.send(RecognitionEvent::Error(RecognitionErrorKind::NoSpeech));
            let _ = events.send(RecognitionEvent::End);
            return Ok(());
        };

        tracing::debug!(lang = %config.lang, utterance = %utterance, "replaying utterance");

        if config.interim_results {
            let words: Vec<&str> = utterance.split_whitespace().collect();
            for n in 1..words.len() {
                let _ = events.send(RecognitionEvent::Result {
                    transcript: words[..n].join(" "),
                    is_final: false,
                });
            }
        }

        let _ = events.send(RecognitionEvent::Result {
            transcript: utterance,
            is_final: true,
        });
        let _ = events.send(RecognitionEvent::End);
        Ok(())
    }

    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut mpsc::UnboundedReceiver<RecognitionEvent>) -> Vec<RecognitionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn default_config() {
        let config = RecognitionConfig::default();
        assert_eq!(config.lang, "pt-BR");
        assert!(!config.continuous);
        assert!(config.interim_results);
    }

    #[test]
    fn maps_error_codes() {
        assert_eq!(RecognitionErrorKind::from_code("not-allowed"), RecognitionErrorKind::NotAllowed);
        assert_eq!(
            RecognitionErrorKind::from_code("bad-grammar"),
            RecognitionErrorKind::Other("bad-grammar".to_string())
        );
        assert_eq!(
            RecognitionErrorKind::from_code("weird").message(),
            "Erro desconhecido. Tente novamente."
        );
    }

    #[test]
    fn replays_interim_then_final_then_end() {
        let mut recognizer = ScriptedRecognizer::new(["me chamo ana"]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        recognizer.start(&RecognitionConfig::default(), tx).unwrap();

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                RecognitionEvent::Result { transcript: "me".into(), is_final: false },
                RecognitionEvent::Result { transcript: "me chamo".into(), is_final: false },
                RecognitionEvent::Result { transcript: "me chamo ana".into(), is_final: true },
                RecognitionEvent::End,
            ]
        );
        assert_eq!(recognizer.remaining(), 0);
    }

    #[test]
    fn skips_interim_when_disabled() {
        let mut recognizer = ScriptedRecognizer::new(["oi tudo bem"]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let config = RecognitionConfig {
            interim_results: false,
            ..RecognitionConfig::default()
        };
        recognizer.start(&config, tx).unwrap();

        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[test]
    fn empty_queue_reports_no_speech() {
        let mut recognizer = ScriptedRecognizer::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        recognizer.start(&RecognitionConfig::default(), tx).unwrap();

        assert_eq!(
            drain(&mut rx),
            vec![
                RecognitionEvent::Error(RecognitionErrorKind::NoSpeech),
                RecognitionEvent::End,
            ]
        );
        assert_eq!(recognizer.sessions(), 1);
    }
}
