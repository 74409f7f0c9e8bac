use std::sync::LazyLock;

use testology_core::models::result::Severity;
use testology_interpret::InterpretationConfig;
use testology_scoring::config::{Comparator, Condition, RecommendationRule, ScoringConfig, Target};

use crate::TestDefinition;
use crate::cross_test::rules_for;
use crate::narrative::{band, chunk, items, total, urgent};

const ID: &str = "phq9";

/// Item 9 asks about thoughts of self-harm.
pub const SELF_HARM_ITEM: u32 = 9;

/// PHQ-9: Patient Health Questionnaire depression module.
/// 9 items rated 0–3. Total 0–27.
pub struct Phq9;

impl TestDefinition for Phq9 {
    fn id(&self) -> &str {
        ID
    }

    fn name(&self) -> &str {
        "PHQ-9"
    }

    fn scoring_config(&self) -> &ScoringConfig {
        static CONFIG: LazyLock<ScoringConfig> = LazyLock::new(|| ScoringConfig {
            test_id: ID.to_string(),
            title: Some("Patient Health Questionnaire 9".to_string()),
            max_option_value: Some(3.0),
            option_step: None,
            dimensions: vec![total(
                "Depression",
                (1..=9).collect(),
                vec![
                    band("minimal", "Minimal", 0.0, 4.0, None),
                    band("mild", "Mild", 5.0, 9.0, Some(Severity::Mild)),
                    band("moderate", "Moderate", 10.0, 14.0, Some(Severity::Moderate)),
                    band(
                        "moderately_severe",
                        "Moderately severe",
                        15.0,
                        19.0,
                        Some(Severity::Moderate),
                    ),
                    band("severe", "Severe", 20.0, 27.0, Some(Severity::Severe)),
                ],
            )],
            items: items(9, &[]),
            recommendations: vec![RecommendationRule {
                id: "elevated_depression".to_string(),
                conditions: vec![Condition {
                    target: Target::Total,
                    comparator: Comparator::Gte,
                    value: 10.0,
                }],
                recommend_tests: vec!["gad7".to_string(), "pss10".to_string()],
                message: None,
            }],
        });
        &CONFIG
    }

    fn interpretation(&self) -> &InterpretationConfig {
        static CONFIG: LazyLock<InterpretationConfig> = LazyLock::new(|| {
            InterpretationConfig::new(ID)
                .level("minimal", |_| {
                    Ok(chunk(
                        ID,
                        "phq9_minimal",
                        "No signs of depression",
                        "Your mood pattern looks healthy; no signs of depression were found.",
                    ))
                })
                .level("mild", |_| {
                    Ok(chunk(
                        ID,
                        "phq9_mild",
                        "Mild depression",
                        "Some lower energy or emotional flatness, while daily functioning is \
                         preserved.",
                    ))
                })
                .level("moderate", |_| {
                    Ok(chunk(
                        ID,
                        "phq9_moderate",
                        "Moderate depression",
                        "Noticeable changes in sleep, motivation and concentration.",
                    ))
                })
                .level("moderately_severe", |_| {
                    Ok(chunk(
                        ID,
                        "phq9_moderately_severe",
                        "Moderately severe depression",
                        "Symptoms are directly affecting daily functioning. Talking with a \
                         therapist is recommended.",
                    ))
                })
                .level("severe", |_| {
                    Ok(urgent(
                        ID,
                        "phq9_severe",
                        "Severe depression",
                        "Severe symptoms of depression. A prompt clinical assessment is \
                         needed.",
                    ))
                })
                .subscales(|result| {
                    let alert = match result.answer(SELF_HARM_ITEM) {
                        Some(value) if value >= 3.0 => Some(urgent(
                            ID,
                            "phq9_self_harm_critical",
                            "Immediate support needed",
                            "You reported thoughts of self-harm nearly every day. Please \
                             contact a mental health professional or a crisis line right now.",
                        )),
                        Some(value) if value > 0.0 => Some(urgent(
                            ID,
                            "phq9_self_harm",
                            "Please reach out",
                            "You reported some thoughts of self-harm. This deserves attention; \
                             please talk to a mental health professional.",
                        )),
                        _ => None,
                    };
                    Ok(alert.into_iter().collect())
                })
                .cross_tests(rules_for(ID))
        });
        &CONFIG
    }
}
