//! Consistency checks that catch implausible simulated reactions before they
//! reach the optimizer.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

use apriori_core::{
    Action, AdContext, AdId, Device, IntentLevel, Persona, PurchasingPowerTier, Reaction,
    ScamVulnerability,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::math::{ratio, round_to};

/// Default trust floor below which a click is suspicious.
pub const TRUST_SCORE_THRESHOLD: u8 = 3;
/// Default literacy floor for ads that require filling a form.
pub const MIN_LITERACY_FOR_COMPLEX_FORM: u8 = 5;

// Keyword patterns match anywhere in the copy, so inflections such as
// "forms" or "iPhones" count.

static IOS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ios|app store|iphone").expect("valid ios keyword regex")
});
static APP_INSTALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)download app|install now").expect("valid app install regex")
});
static FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)fill|form|register|sign up|apply now|details")
        .expect("valid form keyword regex")
});
static LUXURY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)premium|luxury|exclusive|₹50|₹[12] lakh")
        .expect("valid luxury keyword regex")
});

/// One failed consistency check, with the values that tripped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFlag {
    SuspiciousClickDespiteLowTrust { trust: u8 },
    ImpossibleConversionDeviceMismatch { device: Device },
    ImpossibleActionFeaturePhone,
    UnrealisticConversionLowLiteracy { literacy: u8 },
    UnlikelyHighIntentLowIncome,
    UnrealisticTrustHighVulnerability { trust: u8 },
    InconsistentIntent { relevance: u8 },
    ContradictoryReport { trust: u8, relevance: u8 },
}

impl ValidationFlag {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SuspiciousClickDespiteLowTrust { .. } => "SUSPICIOUS_CLICK_DESPITE_LOW_TRUST",
            Self::ImpossibleConversionDeviceMismatch { .. } => {
                "IMPOSSIBLE_CONVERSION_DEVICE_MISMATCH"
            }
            Self::ImpossibleActionFeaturePhone => "IMPOSSIBLE_ACTION_FEATURE_PHONE",
            Self::UnrealisticConversionLowLiteracy { .. } => "UNREALISTIC_CONVERSION_LOW_LITERACY",
            Self::UnlikelyHighIntentLowIncome => "UNLIKELY_HIGH_INTENT_LOW_INCOME",
            Self::UnrealisticTrustHighVulnerability { .. } => {
                "UNREALISTIC_TRUST_HIGH_VULNERABILITY"
            }
            Self::InconsistentIntent { .. } => "INCONSISTENT_INTENT",
            Self::ContradictoryReport { .. } => "CONTRADICTORY_REPORT",
        }
    }
}

impl fmt::Display for ValidationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code();
        match self {
            Self::SuspiciousClickDespiteLowTrust { trust } => {
                write!(f, "{code}: trust={trust}, action=CLICK")
            }
            Self::ImpossibleConversionDeviceMismatch { device } => {
                write!(f, "{code}: ad_requires=iOS, user_device={device}")
            }
            Self::ImpossibleActionFeaturePhone => {
                write!(f, "{code}: ad_requires=smartphone, user_device=Feature Phone")
            }
            Self::UnrealisticConversionLowLiteracy { literacy } => {
                write!(f, "{code}: literacy={literacy}, requires_form=true")
            }
            Self::UnlikelyHighIntentLowIncome => {
                write!(f, "{code}: income_tier=Low, product=luxury, intent=High")
            }
            Self::UnrealisticTrustHighVulnerability { trust } => {
                write!(f, "{code}: vulnerability=High, scam_indicators=yes, trust={trust}")
            }
            Self::InconsistentIntent { relevance } => {
                write!(f, "{code}: relevance={relevance}, intent=High")
            }
            Self::ContradictoryReport { trust, relevance } => {
                write!(f, "{code}: action=REPORT, trust={trust}, relevance={relevance}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Valid,
    Flagged,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("VALID"),
            Self::Flagged => f.write_str("FLAGGED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub flags: Vec<ValidationFlag>,
}

impl ValidationResult {
    #[must_use]
    pub fn status(&self) -> ValidationStatus {
        if self.flags.is_empty() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Flagged
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.flags.is_empty()
    }

    /// Human-readable reasons, one per flag.
    #[must_use]
    pub fn reasons(&self) -> Vec<String> {
        self.flags.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedReaction {
    pub persona_uuid: String,
    pub ad_id: AdId,
    pub flags: Vec<String>,
    pub reaction: Reaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Every reaction submitted, including those from unknown personas.
    pub total: usize,
    pub valid: usize,
    pub flagged: usize,
    /// `flagged / total` in percent, rounded to one decimal.
    pub flagged_percentage: f64,
    pub flagged_reactions: Vec<FlaggedReaction>,
}

/// Cross-checks a reaction against its persona and the ad it responded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionValidator {
    pub trust_score_threshold: u8,
    pub min_literacy_for_complex_form: u8,
}

impl Default for ReactionValidator {
    fn default() -> Self {
        Self {
            trust_score_threshold: TRUST_SCORE_THRESHOLD,
            min_literacy_for_complex_form: MIN_LITERACY_FOR_COMPLEX_FORM,
        }
    }
}

fn barriers_mention(reaction: &Reaction, keywords: &[&str]) -> bool {
    reaction.barriers.iter().any(|barrier| {
        let lower = barrier.to_lowercase();
        keywords.iter().any(|k| lower.contains(k))
    })
}

impl ReactionValidator {
    #[must_use]
    pub fn new(trust_score_threshold: u8, min_literacy_for_complex_form: u8) -> Self {
        Self {
            trust_score_threshold,
            min_literacy_for_complex_form,
        }
    }

    /// Run every check against one reaction. Copy-based checks are skipped
    /// when `ad_context` is `None`.
    #[must_use]
    pub fn validate_reaction(
        &self,
        persona: &Persona,
        reaction: &Reaction,
        ad_context: Option<&AdContext>,
    ) -> ValidationResult {
        let mut flags = Vec::new();
        let clicked = reaction.action == Action::Click;
        let high_intent = reaction.intent_level == IntentLevel::High;

        if reaction.trust_score < self.trust_score_threshold && clicked {
            flags.push(ValidationFlag::SuspiciousClickDespiteLowTrust {
                trust: reaction.trust_score,
            });
        }

        if let Some(ctx) = ad_context {
            flags.extend(self.check_ad_copy(persona, reaction, ctx));
        }

        if persona.scam_vulnerability == Some(ScamVulnerability::High)
            && ad_context.is_some_and(AdContext::has_scam_indicators)
            && reaction.trust_score >= 7
        {
            flags.push(ValidationFlag::UnrealisticTrustHighVulnerability {
                trust: reaction.trust_score,
            });
        }

        if reaction.relevance_score <= 2 && high_intent {
            flags.push(ValidationFlag::InconsistentIntent {
                relevance: reaction.relevance_score,
            });
        }

        if reaction.action == Action::Report
            && (reaction.trust_score >= 6 || reaction.relevance_score >= 7)
        {
            flags.push(ValidationFlag::ContradictoryReport {
                trust: reaction.trust_score,
                relevance: reaction.relevance_score,
            });
        }

        ValidationResult { flags }
    }

    fn check_ad_copy(
        &self,
        persona: &Persona,
        reaction: &Reaction,
        ctx: &AdContext,
    ) -> Vec<ValidationFlag> {
        let mut flags = Vec::new();
        let copy = ctx.copy.as_str();
        let clicked = reaction.action == Action::Click;

        if IOS_RE.is_match(copy)
            && matches!(persona.primary_device, Device::Android | Device::FeaturePhone)
            && clicked
            && matches!(reaction.intent_level, IntentLevel::High | IntentLevel::Medium)
        {
            flags.push(ValidationFlag::ImpossibleConversionDeviceMismatch {
                device: persona.primary_device,
            });
        }

        if APP_INSTALL_RE.is_match(copy) && persona.primary_device == Device::FeaturePhone && clicked {
            flags.push(ValidationFlag::ImpossibleActionFeaturePhone);
        }

        if FORM_RE.is_match(copy)
            && persona.digital_literacy < self.min_literacy_for_complex_form
            && clicked
            && reaction.intent_level == IntentLevel::High
            && !barriers_mention(reaction, &["literacy", "form"])
        {
            flags.push(ValidationFlag::UnrealisticConversionLowLiteracy {
                literacy: persona.digital_literacy,
            });
        }

        if LUXURY_RE.is_match(copy)
            && persona.purchasing_power_tier == PurchasingPowerTier::Low
            && reaction.intent_level == IntentLevel::High
            && !barriers_mention(reaction, &["afford", "expensive"])
        {
            flags.push(ValidationFlag::UnlikelyHighIntentLowIncome);
        }

        flags
    }

    /// Validate every reaction whose persona is known.
    ///
    /// Reactions from unknown personas count toward `total` but are neither
    /// valid nor flagged.
    #[must_use]
    pub fn validate_batch(
        &self,
        personas: &[Persona],
        reactions: &[Reaction],
        ad_contexts: &BTreeMap<AdId, AdContext>,
    ) -> ValidationSummary {
        let persona_map: HashMap<&str, &Persona> =
            personas.iter().map(|p| (p.uuid.as_str(), p)).collect();

        let mut valid = 0;
        let mut flagged_reactions = Vec::new();

        for reaction in reactions {
            let Some(persona) = persona_map.get(reaction.persona_uuid.as_str()) else {
                continue;
            };
            let result = self.validate_reaction(persona, reaction, ad_contexts.get(&reaction.ad_id));
            if result.is_valid() {
                valid += 1;
            } else {
                tracing::debug!(
                    persona = %reaction.persona_uuid,
                    ad_id = %reaction.ad_id,
                    flags = result.flags.len(),
                    "reaction flagged"
                );
                flagged_reactions.push(FlaggedReaction {
                    persona_uuid: reaction.persona_uuid.clone(),
                    ad_id: reaction.ad_id.clone(),
                    flags: result.reasons(),
                    reaction: reaction.clone(),
                });
            }
        }

        let flagged = flagged_reactions.len();
        let summary = ValidationSummary {
            total: reactions.len(),
            valid,
            flagged,
            flagged_percentage: round_to(ratio(flagged, reactions.len()) * 100.0, 1),
            flagged_reactions,
        };
        tracing::info!(
            total = summary.total,
            valid = summary.valid,
            flagged = summary.flagged,
            "validated reactions"
        );
        summary
    }

    /// Keep only reactions that pass every check. Reactions from unknown
    /// personas are dropped.
    #[must_use]
    pub fn filter_valid_reactions(
        &self,
        personas: &[Persona],
        reactions: &[Reaction],
        ad_contexts: &BTreeMap<AdId, AdContext>,
    ) -> Vec<Reaction> {
        let persona_map: HashMap<&str, &Persona> =
            personas.iter().map(|p| (p.uuid.as_str(), p)).collect();

        reactions
            .iter()
            .filter(|reaction| {
                persona_map
                    .get(reaction.persona_uuid.as_str())
                    .is_some_and(|persona| {
                        self.validate_reaction(persona, reaction, ad_contexts.get(&reaction.ad_id))
                            .is_valid()
                    })
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
