//! Synthetic user profiles
//!
//! Profiles are rebuilt per request; nothing here is stored.

use serde::{Deserialize, Serialize};

use super::achievement::Achievement;
use super::level::{LevelInfo, compute_level, level_achievements};

/// User profile as returned by the onboarding endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub level: LevelInfo,
    pub achievements: Vec<Achievement>,
}

/// Validated input for an XP update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XpUpdate {
    /// XP added on top of the base
    pub delta: i64,
    /// Formatted phone number, already validated
    pub phone: Option<String>,
    /// Display name override
    pub name: Option<String>,
}

/// Derive a stable profile id from a display name
///
/// Hex of the lowercased name's UTF-8 bytes.
#[must_use]
pub fn profile_id(name: &str) -> String {
    hex::encode(name.to_lowercase())
}

/// Placeholder name for profiles without one: `User <first 6 chars of id>`
#[must_use]
pub fn placeholder_name(id: &str) -> String {
    let prefix: String = id.chars().take(6).collect();
    format!("User {prefix}")
}

impl UserProfile {
    /// Fresh profile for a name heard during voice onboarding
    #[must_use]
    pub fn from_voice(name: &str) -> Self {
        Self {
            id: profile_id(name),
            name: name.to_string(),
            phone: None,
            level: LevelInfo::initial(),
            achievements: vec![Achievement::first_voice()],
        }
    }

    /// Profile after applying an XP update
    ///
    /// Returns `None` when the delta takes total XP below zero.
    #[must_use]
    pub fn from_xp_update(id: &str, update: XpUpdate) -> Option<Self> {
        let level = compute_level(update.delta)?;

        let mut achievements = Vec::new();
        if update.phone.is_some() {
            achievements.push(Achievement::phone_verified());
        }
        achievements.extend(level_achievements(level.level));

        Some(Self {
            id: id.to_string(),
            name: update.name.unwrap_or_else(|| placeholder_name(id)),
            phone: update.phone,
            level,
            achievements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_profile_shape() {
        let profile = UserProfile::from_voice("Maria Silva");
        assert_eq!(profile.id, hex::encode("maria silva"));
        assert_eq!(profile.level, LevelInfo { level: 1, xp: 50, next_level_xp: 100 });
        assert_eq!(profile.achievements, vec![Achievement::first_voice()]);
    }

    #[test]
    fn id_is_case_insensitive() {
        assert_eq!(profile_id("JOÃO"), profile_id("joão"));
        assert_eq!(profile_id("ana"), "616e61");
    }

    #[test]
    fn placeholder_uses_id_prefix() {
        assert_eq!(placeholder_name("616e61206c75"), "User 616e61");
        assert_eq!(placeholder_name("abc"), "User abc");
    }

    #[test]
    fn xp_update_with_phone_and_level() {
        let profile = UserProfile::from_xp_update(
            "616e61",
            XpUpdate {
                delta: 60,
                phone: Some("(11) 98765-4321".to_string()),
                name: Some("Ana".to_string()),
            },
        )
        .unwrap();

        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.level.level, 2);
        let ids: Vec<&str> = profile.achievements.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["phone_verified", "level_2"]);
    }

    #[test]
    fn xp_update_without_extras() {
        let profile = UserProfile::from_xp_update(
            "abcdef123",
            XpUpdate { delta: 30, ..XpUpdate::default() },
        )
        .unwrap();

        assert_eq!(profile.name, "User abcdef");
        assert!(profile.phone.is_none());
        assert!(profile.achievements.is_empty());
    }

    #[test]
    fn json_uses_underscore_id_and_omits_missing_phone() {
        let json = serde_json::to_value(UserProfile::from_voice("Ana")).unwrap();
        assert_eq!(json["_id"], "616e61");
        assert!(json.get("phone").is_none());
        assert_eq!(json["level"]["next_level_xp"], 100);
    }
}
