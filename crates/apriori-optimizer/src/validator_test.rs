use std::collections::BTreeMap;

use apriori_core::{
    Action, AdContext, Device, IntentLevel, Persona, PurchasingPowerTier, Reaction,
    ScamVulnerability, Zone,
};

use super::*;

fn persona(uuid: &str) -> Persona {
    Persona {
        uuid: uuid.to_string(),
        occupation: "Shop Owner".to_string(),
        state: "Uttar Pradesh".to_string(),
        zone: Zone::Urban,
        age: 36,
        digital_literacy: 6,
        purchasing_power_tier: PurchasingPowerTier::Mid,
        primary_device: Device::Android,
        sex: None,
        district: None,
        scam_vulnerability: None,
        monthly_income_inr: None,
    }
}

fn reaction(uuid: &str, ad: &str, trust: u8, relevance: u8, action: Action, intent: IntentLevel) -> Reaction {
    Reaction {
        persona_uuid: uuid.to_string(),
        ad_id: ad.to_string(),
        trust_score: trust,
        relevance_score: relevance,
        action,
        intent_level: intent,
        reasoning: None,
        emotional_response: None,
        barriers: vec![],
    }
}

fn context(copy: &str) -> AdContext {
    AdContext {
        copy: copy.to_string(),
        scam_indicators: None,
    }
}

fn codes(result: &ValidationResult) -> Vec<&'static str> {
    result.flags.iter().map(ValidationFlag::code).collect()
}

#[test]
fn plausible_reaction_is_valid() {
    let v = ReactionValidator::default();
    let r = reaction("p1", "ad_1", 7, 7, Action::Click, IntentLevel::High);
    let result = v.validate_reaction(&persona("p1"), &r, Some(&context("Flat 20% off this week")));
    assert_eq!(result.status(), ValidationStatus::Valid);
    assert!(result.reasons().is_empty());
}

#[test]
fn low_trust_click_is_suspicious() {
    let v = ReactionValidator::default();
    let r = reaction("p1", "ad_1", 2, 6, Action::Click, IntentLevel::Low);
    let result = v.validate_reaction(&persona("p1"), &r, None);
    assert_eq!(codes(&result), vec!["SUSPICIOUS_CLICK_DESPITE_LOW_TRUST"]);
    assert_eq!(
        result.reasons()[0],
        "SUSPICIOUS_CLICK_DESPITE_LOW_TRUST: trust=2, action=CLICK"
    );

    // at the threshold the click is allowed
    let r = reaction("p1", "ad_1", 3, 6, Action::Click, IntentLevel::Low);
    assert!(v.validate_reaction(&persona("p1"), &r, None).is_valid());
}

#[test]
fn ios_ad_clicked_on_android_is_flagged() {
    let v = ReactionValidator::default();
    let r = reaction("p1", "ad_1", 7, 7, Action::Click, IntentLevel::Medium);
    let result = v.validate_reaction(&persona("p1"), &r, Some(&context("Get it on the App Store")));
    assert_eq!(codes(&result), vec!["IMPOSSIBLE_CONVERSION_DEVICE_MISMATCH"]);
    assert!(result.reasons()[0].ends_with("user_device=Android"));
}

#[test]
fn keywords_match_inflected_forms() {
    let v = ReactionValidator::default();
    let r = reaction("p1", "ad_1", 7, 7, Action::Click, IntentLevel::High);

    let mut low_literacy = persona("p1");
    low_literacy.digital_literacy = 2;
    let result = v.validate_reaction(
        &low_literacy,
        &r,
        Some(&context("Complete the registration forms to get your loan")),
    );
    assert_eq!(codes(&result), vec!["UNREALISTIC_CONVERSION_LOW_LITERACY"]);

    let result = v.validate_reaction(&persona("p1"), &r, Some(&context("Built for iPhones - get it today")));
    assert_eq!(codes(&result), vec!["IMPOSSIBLE_CONVERSION_DEVICE_MISMATCH"]);
}

#[test]
fn app_install_on_feature_phone_is_flagged() {
    let v = ReactionValidator::default();
    let mut p = persona("p1");
    p.primary_device = Device::FeaturePhone;
    let r = reaction("p1", "ad_1", 6, 6, Action::Click, IntentLevel::Low);
    let result = v.validate_reaction(&p, &r, Some(&context("Install now and save")));
    assert_eq!(codes(&result), vec!["IMPOSSIBLE_ACTION_FEATURE_PHONE"]);
}

#[test]
fn form_conversion_needs_literacy_or_a_stated_barrier() {
    let v = ReactionValidator::default();
    let mut p = persona("p1");
    p.digital_literacy = 3;
    let ctx = context("Register today for a free account");

    let r = reaction("p1", "ad_1", 7, 7, Action::Click, IntentLevel::High);
    let result = v.validate_reaction(&p, &r, Some(&ctx));
    assert_eq!(codes(&result), vec!["UNREALISTIC_CONVERSION_LOW_LITERACY"]);

    let mut with_barrier = r.clone();
    with_barrier.barriers = vec!["Form looks long".to_string()];
    assert!(v.validate_reaction(&p, &with_barrier, Some(&ctx)).is_valid());

    let lenient = ReactionValidator::new(3, 3);
    assert!(lenient.validate_reaction(&p, &r, Some(&ctx)).is_valid());
}

#[test]
fn luxury_intent_from_low_income_is_flagged() {
    let v = ReactionValidator::default();
    let mut p = persona("p1");
    p.purchasing_power_tier = PurchasingPowerTier::Low;
    let r = reaction("p1", "ad_1", 7, 7, Action::Ignore, IntentLevel::High);

    for copy in ["Premium leather bags", "Starting at ₹1 lakh", "Only ₹50,000"] {
        let result = v.validate_reaction(&p, &r, Some(&context(copy)));
        assert_eq!(codes(&result), vec!["UNLIKELY_HIGH_INTENT_LOW_INCOME"], "copy: {copy}");
    }

    let mut with_barrier = r.clone();
    with_barrier.barriers = vec!["Too expensive for me".to_string()];
    assert!(v
        .validate_reaction(&p, &with_barrier, Some(&context("Premium leather bags")))
        .is_valid());
}

#[test]
fn trusting_vulnerable_persona_on_scammy_ad_is_flagged() {
    let v = ReactionValidator::default();
    let mut p = persona("p1");
    p.scam_vulnerability = Some(ScamVulnerability::High);
    let r = reaction("p1", "ad_1", 8, 5, Action::Ignore, IntentLevel::Low);

    let scammy = AdContext {
        copy: "Win big".to_string(),
        scam_indicators: Some("Fake urgency timer".to_string()),
    };
    let result = v.validate_reaction(&p, &r, Some(&scammy));
    assert_eq!(codes(&result), vec!["UNREALISTIC_TRUST_HIGH_VULNERABILITY"]);

    let clean = AdContext {
        copy: "Win big".to_string(),
        scam_indicators: Some("None detected".to_string()),
    };
    assert!(v.validate_reaction(&p, &r, Some(&clean)).is_valid());
}

#[test]
fn irrelevant_high_intent_and_friendly_report_are_flagged() {
    let v = ReactionValidator::default();
    let r = reaction("p1", "ad_1", 5, 2, Action::Ignore, IntentLevel::High);
    assert_eq!(codes(&v.validate_reaction(&persona("p1"), &r, None)), vec!["INCONSISTENT_INTENT"]);

    let r = reaction("p1", "ad_1", 6, 1, Action::Report, IntentLevel::None);
    assert_eq!(codes(&v.validate_reaction(&persona("p1"), &r, None)), vec!["CONTRADICTORY_REPORT"]);

    let r = reaction("p1", "ad_1", 1, 1, Action::Report, IntentLevel::None);
    assert!(v.validate_reaction(&persona("p1"), &r, None).is_valid());
}

#[test]
fn batch_summary_counts_and_skips_unknown_personas() {
    let v = ReactionValidator::default();
    let personas = vec![persona("p1"), persona("p2")];
    let reactions = vec![
        reaction("p1", "ad_1", 7, 7, Action::Click, IntentLevel::High),
        reaction("p2", "ad_1", 1, 7, Action::Click, IntentLevel::Low),
        reaction("p2", "ad_2", 6, 6, Action::Ignore, IntentLevel::Low),
        reaction("ghost", "ad_2", 1, 1, Action::Click, IntentLevel::High),
    ];

    let summary = v.validate_batch(&personas, &reactions, &BTreeMap::new());
    assert_eq!(summary.total, 4);
    assert_eq!(summary.valid, 2);
    assert_eq!(summary.flagged, 1);
    assert_eq!(summary.flagged_percentage, 25.0);
    assert_eq!(summary.flagged_reactions[0].persona_uuid, "p2");
    assert_eq!(summary.flagged_reactions[0].ad_id, "ad_1");

    let kept = v.filter_valid_reactions(&personas, &reactions, &BTreeMap::new());
    assert_eq!(kept.len(), 2);
    assert!(kept.iter().all(|r| r.persona_uuid != "ghost"));
}

#[test]
fn batch_uses_per_ad_context() {
    let v = ReactionValidator::default();
    let personas = vec![persona("p1")];
    let reactions = vec![
        reaction("p1", "ios_ad", 7, 7, Action::Click, IntentLevel::High),
        reaction("p1", "plain_ad", 7, 7, Action::Click, IntentLevel::High),
    ];
    let mut contexts = BTreeMap::new();
    contexts.insert("ios_ad".to_string(), context("Exclusively on iPhone"));

    let summary = v.validate_batch(&personas, &reactions, &contexts);
    assert_eq!(summary.flagged, 1);
    assert_eq!(summary.flagged_reactions[0].ad_id, "ios_ad");
}

#[test]
fn empty_batch_has_zero_percentage() {
    let summary = ReactionValidator::default().validate_batch(&[], &[], &BTreeMap::new());
    assert_eq!(summary.total, 0);
    assert_eq!(summary.flagged_percentage, 0.0);
}
