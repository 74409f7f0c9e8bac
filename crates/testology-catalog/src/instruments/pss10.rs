use std::sync::LazyLock;

use testology_core::models::result::Severity;
use testology_interpret::InterpretationConfig;
use testology_interpret::config::require_subscale;
use testology_scoring::config::{Band, Comparator, Condition, RecommendationRule, ScoringConfig, Target};

use crate::TestDefinition;
use crate::cross_test::rules_for;
use crate::narrative::{band, chunk, dimension, items, total};

const ID: &str = "pss10";

/// Positively worded items, scored in reverse.
pub const REVERSE_ITEMS: [u32; 4] = [4, 5, 7, 8];

fn three_bands(low_max: f64, moderate_max: f64, max: f64) -> Vec<Band> {
    vec![
        band("low", "Low", 0.0, low_max, None),
        band("moderate", "Moderate", low_max + 1.0, moderate_max, Some(Severity::Mild)),
        band("high", "High", moderate_max + 1.0, max, Some(Severity::Moderate)),
    ]
}

/// PSS-10: Perceived Stress Scale.
/// 10 items rated 0–4 ("never" to "very often"). Total 0–40.
pub struct Pss10;

impl TestDefinition for Pss10 {
    fn id(&self) -> &str {
        ID
    }

    fn name(&self) -> &str {
        "PSS-10"
    }

    fn scoring_config(&self) -> &ScoringConfig {
        static CONFIG: LazyLock<ScoringConfig> = LazyLock::new(|| ScoringConfig {
            test_id: ID.to_string(),
            title: Some("Perceived Stress Scale".to_string()),
            max_option_value: Some(4.0),
            option_step: None,
            dimensions: vec![
                total("Perceived stress", (1..=10).collect(), three_bands(13.0, 26.0, 40.0)),
                dimension(
                    "helplessness",
                    "Helplessness",
                    vec![1, 2, 3, 6, 9, 10],
                    three_bands(8.0, 16.0, 24.0),
                ),
                dimension(
                    "self_efficacy",
                    "Low self-efficacy",
                    REVERSE_ITEMS.to_vec(),
                    three_bands(8.0, 12.0, 16.0),
                ),
            ],
            items: items(10, &REVERSE_ITEMS),
            recommendations: vec![RecommendationRule {
                id: "chronic_stress".to_string(),
                conditions: vec![Condition {
                    target: Target::Total,
                    comparator: Comparator::Gte,
                    value: 27.0,
                }],
                recommend_tests: vec!["gad7".to_string(), "phq9".to_string()],
                message: Some(
                    "Chronic stress is worth checking against anxiety and mood.".to_string(),
                ),
            }],
        });
        &CONFIG
    }

    fn interpretation(&self) -> &InterpretationConfig {
        static CONFIG: LazyLock<InterpretationConfig> = LazyLock::new(|| {
            InterpretationConfig::new(ID)
                .level("low", |_| {
                    Ok(chunk(
                        ID,
                        "pss10_low",
                        "Everyday stress",
                        "Life pressures are at a usual level and your body generally gets a \
                         chance to recover. Stress comes and goes but is not chronic.",
                    ))
                })
                .level("moderate", |_| {
                    Ok(chunk(
                        ID,
                        "pss10_moderate",
                        "Noticeable stress",
                        "Considerable stress across several areas of life, which may be \
                         affecting sleep, mood or focus. A good point to start stress \
                         management practice.",
                    ))
                })
                .level("high", |_| {
                    Ok(chunk(
                        ID,
                        "pss10_high",
                        "Chronic stress",
                        "Sustained mental strain, often accompanied by poor sleep, fatigue and \
                         irritability. Checking sleep, anxiety and mood, and practising \
                         relaxation or seeking counselling, is strongly suggested.",
                    ))
                })
                .subscales(|result| {
                    let mut chunks = Vec::new();
                    let helplessness = require_subscale(result, "helplessness")?;
                    if helplessness.level_id == "high" {
                        chunks.push(chunk(
                            ID,
                            "pss10_helplessness_high",
                            "Feeling out of control",
                            "You often feel that things are piling up beyond your control. \
                             Breaking problems into small, concrete steps can restore a sense \
                             of agency.",
                        ));
                    }
                    let self_efficacy = require_subscale(result, "self_efficacy")?;
                    if self_efficacy.level_id == "high" {
                        chunks.push(chunk(
                            ID,
                            "pss10_self_efficacy_low",
                            "Doubting your coping",
                            "You rarely feel confident about handling personal problems. \
                             Recalling past situations you did manage can rebuild that \
                             confidence.",
                        ));
                    }
                    Ok(chunks)
                })
                .cross_tests(rules_for(ID))
        });
        &CONFIG
    }
}
