use std::sync::LazyLock;

use testology_core::models::result::SubscaleScore;
use testology_interpret::InterpretationConfig;
use testology_interpret::config::require_subscale;
use testology_scoring::config::{Aggregation, Band, Dimension, ScoringConfig};

use crate::TestDefinition;
use crate::cross_test::rules_for;
use crate::narrative::{band, chunk, dimension, items, total};

const ID: &str = "neo_ffi";

pub const REVERSE_ITEMS: [u32; 16] = [7, 13, 14, 17, 22, 23, 24, 28, 31, 33, 35, 38, 41, 51, 57, 59];

struct Factor {
    id: &'static str,
    label: &'static str,
    items: [u32; 12],
    /// Commentary for the low, medium and high bands.
    notes: [&'static str; 3],
}

const FACTORS: [Factor; 5] = [
    Factor {
        id: "neuroticism",
        label: "Neuroticism",
        items: [2, 6, 8, 11, 13, 16, 18, 23, 26, 33, 38, 41],
        notes: [
            "You are emotionally steady and recover quickly from setbacks.",
            "Your emotional reactions are typical: stress gets to you at times without \
             taking over.",
            "You feel worry, sadness and tension intensely. Emotion-regulation practice \
             pays off for people with this profile.",
        ],
    },
    Factor {
        id: "extraversion",
        label: "Extraversion",
        items: [1, 3, 10, 14, 19, 21, 24, 27, 31, 34, 37, 39],
        notes: [
            "You recharge in quiet settings and prefer depth over breadth in company.",
            "You balance social time and solitude comfortably.",
            "You draw energy from people and activity and tend to seek stimulation.",
        ],
    },
    Factor {
        id: "openness",
        label: "Openness",
        items: [5, 7, 9, 12, 15, 17, 20, 22, 25, 28, 30, 32],
        notes: [
            "You favour the familiar and practical over the abstract.",
            "You are curious about new ideas while valuing what already works.",
            "You are imaginative and drawn to novel ideas, art and experiences.",
        ],
    },
    Factor {
        id: "agreeableness",
        label: "Agreeableness",
        items: [4, 29, 35, 40, 42, 43, 45, 47, 48, 51, 53, 55],
        notes: [
            "You are direct and competitive and do not shy away from conflict.",
            "You are cooperative while still standing up for your own interests.",
            "You are warm, trusting and quick to put others' needs first.",
        ],
    },
    Factor {
        id: "conscientiousness",
        label: "Conscientiousness",
        items: [36, 44, 46, 49, 50, 52, 54, 56, 57, 58, 59, 60],
        notes: [
            "You are flexible and spontaneous, sometimes at the cost of follow-through.",
            "You are reasonably organized and reliable without being rigid.",
            "You are disciplined, organized and persistent in pursuing goals.",
        ],
    },
];

const LEVELS: [&str; 3] = ["low", "medium", "high"];

fn factor_bands() -> Vec<Band> {
    vec![
        band("low", "Low", 0.0, 1.5, None),
        band("medium", "Medium", 1.5, 2.5, None),
        band("high", "High", 2.5, 4.0, None),
    ]
}

fn averaged(dimension: Dimension) -> Dimension {
    Dimension {
        aggregation: Aggregation::Average,
        ..dimension
    }
}

fn factor_note(factor: &Factor, score: &SubscaleScore) -> Option<&'static str> {
    LEVELS
        .iter()
        .position(|level| *level == score.level_id)
        .map(|i| factor.notes[i])
}

/// NEO-FFI: NEO Five-Factor Inventory.
/// 60 items rated 0–4; each factor is the mean of its 12 items.
pub struct NeoFfi;

impl TestDefinition for NeoFfi {
    fn id(&self) -> &str {
        ID
    }

    fn name(&self) -> &str {
        "NEO-FFI"
    }

    fn scoring_config(&self) -> &ScoringConfig {
        static CONFIG: LazyLock<ScoringConfig> = LazyLock::new(|| {
            let mut dimensions = vec![averaged(total(
                "Overall profile",
                (1..=60).collect(),
                factor_bands(),
            ))];
            dimensions.extend(FACTORS.iter().map(|factor| {
                averaged(dimension(
                    factor.id,
                    factor.label,
                    factor.items.to_vec(),
                    factor_bands(),
                ))
            }));

            ScoringConfig {
                test_id: ID.to_string(),
                title: Some("NEO Five-Factor Inventory".to_string()),
                max_option_value: Some(4.0),
                option_step: None,
                dimensions,
                items: items(60, &REVERSE_ITEMS),
                recommendations: Vec::new(),
            }
        });
        &CONFIG
    }

    fn interpretation(&self) -> &InterpretationConfig {
        static CONFIG: LazyLock<InterpretationConfig> = LazyLock::new(|| {
            let mut config = InterpretationConfig::new(ID);
            for level in LEVELS {
                config = config.level(level, move |_| {
                    Ok(chunk(
                        ID,
                        &format!("neo_ffi_{level}"),
                        "Personality profile",
                        "Your five-factor profile is described factor by factor below. \
                         Traits are neither good nor bad; each has strengths in the right \
                         setting.",
                    ))
                });
            }
            config
                .subscales(|result| {
                    let mut chunks = Vec::new();
                    for factor in &FACTORS {
                        let score = require_subscale(result, factor.id)?;
                        if let Some(note) = factor_note(factor, score) {
                            chunks.push(chunk(
                                ID,
                                &format!("neo_ffi_{}_{}", factor.id, score.level_id),
                                &format!("{}: {}", factor.label, score.level_label),
                                note,
                            ));
                        }
                    }
                    Ok(chunks)
                })
                .cross_tests(rules_for(ID))
        });
        &CONFIG
    }
}
