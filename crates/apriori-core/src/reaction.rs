use serde::{Deserialize, Serialize};

use crate::AdId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Click,
    Ignore,
    Report,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Click => write!(f, "CLICK"),
            Action::Ignore => write!(f, "IGNORE"),
            Action::Report => write!(f, "REPORT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentLevel {
    High,
    Medium,
    Low,
    None,
}

impl std::fmt::Display for IntentLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntentLevel::High => write!(f, "High"),
            IntentLevel::Medium => write!(f, "Medium"),
            IntentLevel::Low => write!(f, "Low"),
            IntentLevel::None => write!(f, "None"),
        }
    }
}

/// One persona's simulated response to one ad creative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub persona_uuid: String,
    pub ad_id: AdId,
    /// `0..=10`.
    pub trust_score: u8,
    /// `0..=10`.
    pub relevance_score: u8,
    pub action: Action,
    pub intent_level: IntentLevel,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub emotional_response: Option<String>,
    #[serde(default)]
    pub barriers: Vec<String>,
}

impl Reaction {
    /// Whether this persona belongs to the ad's engaged audience: it clicked,
    /// or it expressed medium or high purchase intent.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.action == Action::Click
            || matches!(self.intent_level, IntentLevel::High | IntentLevel::Medium)
    }

    #[must_use]
    pub fn is_high_intent(&self) -> bool {
        self.intent_level == IntentLevel::High
    }
}

/// Creative context for one ad, used by consistency checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdContext {
    /// Ad copy text as shown to personas.
    #[serde(default)]
    pub copy: String,
    /// Visual-analysis summary of scam red flags. `"None detected"` when clean.
    #[serde(default)]
    pub scam_indicators: Option<String>,
}

impl AdContext {
    /// Returns `true` when the visual analysis reported any scam red flag.
    #[must_use]
    pub fn has_scam_indicators(&self) -> bool {
        self.scam_indicators
            .as_deref()
            .is_some_and(|s| s.trim() != "None detected")
    }
}
