//! Voice processing module
//!
//! Speech recognition and synthesis sit behind capability traits so that
//! browser engines, scripted replays and test doubles are interchangeable.

mod capture;
mod recognition;
mod synthesis;

pub use capture::{
    CaptureState, NO_AUDIO_MESSAGE, START_FAILED_MESSAGE, SpeechCapture, UNSUPPORTED_MESSAGE,
};
pub use recognition::{
    EventSender, RecognitionConfig, RecognitionErrorKind, RecognitionEvent, ScriptedRecognizer,
    SpeechRecognizer,
};
pub use synthesis::{
    EndReason, LogSynthesizer, Narrator, Playback, SpeechSynthesizer, Utterance,
};
