//! Onboarding domain: name extraction, levels, achievements and profiles

pub mod achievement;
pub mod extractor;
pub mod level;
pub mod phone;
pub mod profile;
pub mod steps;

pub use achievement::{Achievement, dedup_achievements, find_level_up};
pub use extractor::{Extraction, Strategy, extract, extract_name};
pub use level::{BASE_XP, LevelInfo, XP_PER_LEVEL, compute_level, level_achievements};
pub use phone::{PhoneError, format_phone, is_valid_phone, validate_phone};
pub use profile::{UserProfile, XpUpdate, placeholder_name, profile_id};
pub use steps::{DEFAULT_STEPS, Step, StepNavigator, render_prompt};
