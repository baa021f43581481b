//! Achievement records attached to user profiles

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Id of the badge awarded on the first voice interaction
pub const FIRST_VOICE_ID: &str = "first_voice_1";

/// Id of the badge awarded for a verified phone number
pub const PHONE_VERIFIED_ID: &str = "phone_verified";

/// Prefix shared by all level badges (`level_2`, `level_3`, ...)
pub const LEVEL_PREFIX: &str = "level_";

/// A named badge on a user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl Achievement {
    /// Badge for completing the first voice interaction
    #[must_use]
    pub fn first_voice() -> Self {
        Self {
            id: FIRST_VOICE_ID.to_string(),
            name: "Primeira Interação por Voz".to_string(),
            description: "Completou sua primeira interação usando reconhecimento de voz"
                .to_string(),
            icon: "🎤".to_string(),
        }
    }

    /// Badge for verifying a phone number
    #[must_use]
    pub fn phone_verified() -> Self {
        Self {
            id: PHONE_VERIFIED_ID.to_string(),
            name: "Número Verificado".to_string(),
            description: "Verificou seu número de telefone com sucesso".to_string(),
            icon: "📱".to_string(),
        }
    }

    /// Badge for reaching `level`
    #[must_use]
    pub fn level_reached(level: u64) -> Self {
        Self {
            id: format!("{LEVEL_PREFIX}{level}"),
            name: format!("Nível {level} Alcançado!"),
            description: format!("Você alcançou o nível {level}"),
            icon: "⭐".to_string(),
        }
    }

    /// Whether this is a level badge
    #[must_use]
    pub fn is_level_up(&self) -> bool {
        self.id.starts_with(LEVEL_PREFIX)
    }
}

/// Find the first level badge in a list
#[must_use]
pub fn find_level_up(achievements: &[Achievement]) -> Option<&Achievement> {
    achievements.iter().find(|a| a.is_level_up())
}

/// Drop repeated ids, keeping the first occurrence of each
///
/// Responses are rebuilt from scratch on every call, so the same level badge
/// comes back on each request at that level. Anything that persists badges
/// should pass them through here first.
#[must_use]
pub fn dedup_achievements(achievements: Vec<Achievement>) -> Vec<Achievement> {
    let mut seen = HashSet::new();
    achievements
        .into_iter()
        .filter(|a| seen.insert(a.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_badge_is_tagged_with_level() {
        let badge = Achievement::level_reached(3);
        assert_eq!(badge.id, "level_3");
        assert_eq!(badge.name, "Nível 3 Alcançado!");
        assert!(badge.is_level_up());
        assert!(!Achievement::phone_verified().is_level_up());
    }

    #[test]
    fn dedup_keeps_first_occurrence_in_order() {
        let list = vec![
            Achievement::level_reached(2),
            Achievement::phone_verified(),
            Achievement::level_reached(2),
            Achievement::first_voice(),
            Achievement::phone_verified(),
        ];

        let ids: Vec<String> = dedup_achievements(list).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, ["level_2", "phone_verified", "first_voice_1"]);
    }

    #[test]
    fn finds_level_badge() {
        let list = vec![Achievement::phone_verified(), Achievement::level_reached(4)];
        assert_eq!(find_level_up(&list).map(|a| a.id.as_str()), Some("level_4"));
        assert!(find_level_up(&[Achievement::first_voice()]).is_none());
    }
}
