use serde::{Deserialize, Serialize};

/// AI opponent strength assigned to a level within a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl AiDifficulty {
    /// Label used for display and serialization
    pub fn as_str(self) -> &'static str {
        match self {
            AiDifficulty::Easy => "easy",
            AiDifficulty::Medium => "medium",
            AiDifficulty::Hard => "hard",
            AiDifficulty::Expert => "expert",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(AiDifficulty::Easy.as_str(), "easy");
        assert_eq!(AiDifficulty::Expert.as_str(), "expert");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AiDifficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let parsed: AiDifficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(parsed, AiDifficulty::Hard);
    }
}
