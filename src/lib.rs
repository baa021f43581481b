//! Papo Social - voice-first onboarding for a Portuguese-language social app
//!
//! This library provides:
//! - Name extraction from spoken introductions
//! - Level, XP and achievement rules
//! - Speech capture and synthesis behind capability traits
//! - Theme preference handling
//! - The onboarding HTTP API and a retrying client for it
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Client side                   │
//! │   SpeechCapture  │  Narrator  │  ThemeContext │
//! └──────────────────────┬───────────────────────┘
//!                        │ OnboardingClient
//! ┌──────────────────────▼───────────────────────┐
//! │                  HTTP API                     │
//! │   POST /api/onboarding/voice                  │
//! │   PUT  /api/users/{id}/xp                     │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │                 Onboarding                    │
//! │   extractor  │  level  │  achievement │ phone │
//! └──────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod theme;
pub mod voice;

pub use api::{ApiServer, ApiState};
pub use client::{AbortHandle, AbortSignal, OnboardingClient, RetryPolicy, XpRequest, abort_pair};
pub use config::Config;
pub use error::{Error, Result};
pub use onboarding::{Achievement, LevelInfo, UserProfile, extract_name};
pub use theme::{Theme, ThemeContext};
