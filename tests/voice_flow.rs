//! End-to-end voice onboarding flow without a network

use std::sync::{Arc, Mutex};

use papo_social::onboarding::{
    DEFAULT_STEPS, StepNavigator, UserProfile, extract_name, format_phone, render_prompt,
    validate_phone,
};
use papo_social::voice::{
    CaptureState, EndReason, LogSynthesizer, NO_AUDIO_MESSAGE, Narrator, RecognitionConfig,
    RecognitionErrorKind, ScriptedRecognizer, SpeechCapture, UNSUPPORTED_MESSAGE,
};

#[tokio::test]
async fn spoken_introduction_becomes_profile() {
    let heard = Arc::new(Mutex::new(Vec::new()));
    let heard_cb = heard.clone();

    let mut capture = SpeechCapture::new(
        Box::new(ScriptedRecognizer::new(["Olá, EU SOU Carlos"])),
        RecognitionConfig::default(),
    )
    .on_transcript(move |t| heard_cb.lock().unwrap().push(t.to_string()));

    assert_eq!(capture.toggle(), CaptureState::Listening);
    let transcript = capture.run_until_idle().await.unwrap();

    assert_eq!(transcript, "Olá, EU SOU Carlos");
    assert_eq!(*heard.lock().unwrap(), vec!["Olá, EU SOU Carlos".to_string()]);
    assert_eq!(capture.state(), CaptureState::Idle);

    let name = extract_name(&transcript).unwrap();
    assert_eq!(name, "Carlos");
    let profile = UserProfile::from_voice(&name);
    assert_eq!(profile.id, hex::encode("carlos"));
}

#[tokio::test]
async fn second_session_without_speech_reports_no_audio() {
    let mut capture = SpeechCapture::new(
        Box::new(ScriptedRecognizer::new(["me chamo ana"])),
        RecognitionConfig::default(),
    );

    capture.start();
    assert!(capture.run_until_idle().await.is_some());

    capture.start();
    assert_eq!(capture.run_until_idle().await, None);
    assert_eq!(capture.last_error(), Some(RecognitionErrorKind::NoSpeech.message()));
    assert_ne!(capture.last_error(), Some(NO_AUDIO_MESSAGE));
}

#[tokio::test]
async fn unsupported_platform_never_listens() {
    let mut capture = SpeechCapture::unsupported(RecognitionConfig::default());

    assert!(!capture.is_supported());
    assert_eq!(capture.toggle(), CaptureState::Idle);
    assert_eq!(capture.last_error(), Some(UNSUPPORTED_MESSAGE));
    assert_eq!(capture.run_until_idle().await, None);
}

#[test]
fn narrator_walks_every_step() {
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let spoken_cb = spoken.clone();
    let mut narrator = Narrator::new(Box::new(LogSynthesizer), "pt-BR").on_end(move |u, reason| {
        assert_eq!(reason, EndReason::Completed);
        spoken_cb.lock().unwrap().push(u.text.clone());
    });

    let phone = format_phone("11987654321");
    assert!(validate_phone(&phone).is_ok());

    let mut steps = StepNavigator::new(&DEFAULT_STEPS);
    loop {
        let step = steps.current().unwrap();
        narrator
            .say(&render_prompt(step.voice_prompt, "Maria", &phone))
            .unwrap();
        if steps.is_last() {
            break;
        }
        steps.advance();
    }

    let spoken = spoken.lock().unwrap();
    assert_eq!(spoken.len(), DEFAULT_STEPS.len());
    assert_eq!(
        spoken[2],
        "Entendi que seu nome é Maria e seu telefone é (11) 98765-4321. Está correto?"
    );
}
