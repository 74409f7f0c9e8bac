use std::sync::LazyLock;

use testology_core::models::result::Severity;
use testology_interpret::InterpretationConfig;
use testology_scoring::config::{Comparator, Condition, RecommendationRule, ScoringConfig, Target};

use crate::TestDefinition;
use crate::cross_test::rules_for;
use crate::narrative::{band, chunk, items, total, urgent};

const ID: &str = "gad7";

/// Totals at or above this suggest clinically significant anxiety.
pub const CLINICAL_THRESHOLD: f64 = 10.0;

/// GAD-7: Generalized Anxiety Disorder scale.
/// 7 items rated 0–3 ("not at all" to "nearly every day"). Total 0–21.
pub struct Gad7;

impl TestDefinition for Gad7 {
    fn id(&self) -> &str {
        ID
    }

    fn name(&self) -> &str {
        "GAD-7"
    }

    fn scoring_config(&self) -> &ScoringConfig {
        static CONFIG: LazyLock<ScoringConfig> = LazyLock::new(|| ScoringConfig {
            test_id: ID.to_string(),
            title: Some("Generalized Anxiety Disorder 7".to_string()),
            max_option_value: Some(3.0),
            option_step: None,
            dimensions: vec![total(
                "Anxiety",
                (1..=7).collect(),
                vec![
                    band("minimal", "Minimal", 0.0, 4.0, None),
                    band("mild", "Mild", 5.0, 9.0, Some(Severity::Mild)),
                    band("moderate", "Moderate", 10.0, 14.0, Some(Severity::Moderate)),
                    band("severe", "Severe", 15.0, 21.0, Some(Severity::Severe)),
                ],
            )],
            items: items(7, &[]),
            recommendations: vec![RecommendationRule {
                id: "elevated_anxiety".to_string(),
                conditions: vec![Condition {
                    target: Target::Total,
                    comparator: Comparator::Gte,
                    value: CLINICAL_THRESHOLD,
                }],
                recommend_tests: vec!["phq9".to_string(), "pss10".to_string()],
                message: Some(
                    "Anxiety at this level often travels with low mood and stress.".to_string(),
                ),
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
                        "gad7_minimal",
                        "Minimal anxiety",
                        "Your everyday anxiety is within the typical range and shows no sign \
                         of a clinical anxiety problem.",
                    ))
                })
                .level("mild", |_| {
                    Ok(chunk(
                        ID,
                        "gad7_mild",
                        "Mild anxiety",
                        "There are signs of worry and tension in your daily life, still at a \
                         mild level. Stress-management techniques and self-care often help.",
                    ))
                })
                .level("moderate", |_| {
                    Ok(chunk(
                        ID,
                        "gad7_moderate",
                        "Moderate anxiety",
                        "Anxiety has reached a level where it can affect your concentration, \
                         sleep or quality of life. Consider talking to a mental health \
                         professional.",
                    ))
                })
                .level("severe", |_| {
                    Ok(chunk(
                        ID,
                        "gad7_severe",
                        "Severe anxiety",
                        "Your anxiety symptoms are intense and are probably affecting daily \
                         life considerably. A professional assessment and treatment can help.",
                    ))
                })
                .subscales(|result| {
                    let mut chunks = Vec::new();
                    if result.total_score >= CLINICAL_THRESHOLD {
                        chunks.push(urgent(
                            ID,
                            "gad7_clinical_threshold",
                            "Clinical threshold reached",
                            "Your score suggests a possible clinically significant anxiety \
                             disorder. This questionnaire is not a diagnosis; please consult a \
                             mental health professional.",
                        ));
                    }
                    Ok(chunks)
                })
                .cross_tests(rules_for(ID))
        });
        &CONFIG
    }
}
