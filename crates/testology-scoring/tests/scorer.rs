use testology_core::models::answer::{RawAnswer, sequential};
use testology_core::models::result::Severity;
use testology_scoring::config::{
    Aggregation, Band, Comparator, Condition, Dimension, Item, RecommendationRule, ScoringConfig,
    Target,
};
use testology_scoring::{Scorer, ScoringError, score};

fn seven_item_config() -> ScoringConfig {
    ScoringConfig {
        test_id: "wellbeing7".to_string(),
        title: Some("Wellbeing 7".to_string()),
        max_option_value: Some(4.0),
        option_step: None,
        dimensions: vec![Dimension {
            id: "total".to_string(),
            label: "Total".to_string(),
            item_indices: (1..=7).collect(),
            is_total: true,
            aggregation: Aggregation::Sum,
            bands: vec![
                Band::new("low", 0.0, 7.0),
                Band::new("medium", 8.0, 14.0).severity(Severity::Mild),
                Band::new("high", 15.0, 21.0).severity(Severity::Moderate),
                Band::new("very_high", 22.0, 28.0).severity(Severity::Severe),
            ],
        }],
        items: (1..=7)
            .map(|order| if order == 3 { Item::reversed(order) } else { Item::new(order) })
            .collect(),
        recommendations: vec![],
    }
}

fn two_factor_config() -> ScoringConfig {
    let bands = |max: f64| {
        vec![
            Band::new("low", 0.0, max / 2.0),
            Band::new("high", max / 2.0, max),
        ]
    };
    ScoringConfig {
        test_id: "mood".to_string(),
        title: None,
        max_option_value: Some(3.0),
        option_step: None,
        dimensions: vec![
            Dimension {
                id: "anxiety".to_string(),
                label: "Anxiety".to_string(),
                item_indices: vec![1, 2],
                is_total: false,
                aggregation: Aggregation::Sum,
                bands: bands(6.0),
            },
            Dimension {
                id: "depression".to_string(),
                label: "Depression".to_string(),
                item_indices: vec![3, 4],
                is_total: false,
                aggregation: Aggregation::Sum,
                bands: bands(6.0),
            },
            Dimension {
                id: "total".to_string(),
                label: "Total".to_string(),
                item_indices: vec![1, 2, 3, 4],
                is_total: true,
                aggregation: Aggregation::Sum,
                bands: bands(12.0),
            },
        ],
        items: (1..=4).map(Item::new).collect(),
        recommendations: vec![],
    }
}

#[test]
fn seven_item_scenario_scores_very_high() {
    let scorer = Scorer::new(seven_item_config()).unwrap();
    let answers = sequential(&[4.0, 4.0, 0.0, 4.0, 4.0, 4.0, 4.0]);

    let result = scorer.score(&answers).unwrap();
    assert_eq!(result.total_score, 28.0);
    assert_eq!(result.total_level_id, "very_high");
    assert_eq!(result.total_level_label, "very_high");
    assert_eq!(result.severity, Some(Severity::Severe));
    assert_eq!(result.raw_answers, answers);
}

#[test]
fn reverse_item_inverts_value() {
    let scorer = Scorer::new(seven_item_config()).unwrap();

    let zero = scorer.score(&[RawAnswer::new(3, 0.0)]).unwrap();
    assert_eq!(zero.total_score, 4.0);

    let four = scorer.score(&[RawAnswer::new(3, 4.0)]).unwrap();
    assert_eq!(four.total_score, 0.0);
}

#[test]
fn unanswered_dimension_scores_zero() {
    let scorer = Scorer::new(two_factor_config()).unwrap();
    let result = scorer
        .score(&[RawAnswer::new(1, 3.0), RawAnswer::new(2, 2.0)])
        .unwrap();

    let depression = result.subscale("depression").unwrap();
    assert_eq!(depression.score, 0.0);
    assert_eq!(depression.level_id, "low");
    assert_eq!(result.subscale("anxiety").unwrap().score, 5.0);
    assert_eq!(result.total_score, 5.0);
}

#[test]
fn missing_reverse_item_contributes_zero_not_max() {
    let scorer = Scorer::new(seven_item_config()).unwrap();
    let result = scorer.score(&[]).unwrap();
    assert_eq!(result.total_score, 0.0);
    assert_eq!(result.total_level_id, "low");
}

#[test]
fn every_dimension_is_reported_in_config_order() {
    let scorer = Scorer::new(two_factor_config()).unwrap();
    let result = scorer.score(&[]).unwrap();
    let ids: Vec<&str> = result.subscales.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["anxiety", "depression", "total"]);
}

#[test]
fn out_of_range_value_is_rejected_with_question_order() {
    let scorer = Scorer::new(seven_item_config()).unwrap();
    let err = scorer.score(&[RawAnswer::new(5, 5.0)]).unwrap_err();
    match err {
        ScoringError::InvalidAnswerValue {
            question_order,
            value,
            max,
            ..
        } => {
            assert_eq!(question_order, 5);
            assert_eq!(value, 5.0);
            assert_eq!(max, 4.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn negative_and_fractional_values_are_rejected() {
    let scorer = Scorer::new(seven_item_config()).unwrap();
    assert!(matches!(
        scorer.score(&[RawAnswer::new(1, -1.0)]),
        Err(ScoringError::InvalidAnswerValue { question_order: 1, .. })
    ));
    assert!(matches!(
        scorer.score(&[RawAnswer::new(2, 2.5)]),
        Err(ScoringError::InvalidAnswerValue { question_order: 2, .. })
    ));
    assert!(matches!(
        scorer.score(&[RawAnswer::new(2, f64::NAN)]),
        Err(ScoringError::InvalidAnswerValue { question_order: 2, .. })
    ));
}

#[test]
fn unknown_questions_are_ignored() {
    let scorer = Scorer::new(seven_item_config()).unwrap();
    let result = scorer
        .score(&[RawAnswer::new(1, 2.0), RawAnswer::new(42, 99.0)])
        .unwrap();
    assert_eq!(result.total_score, 2.0);
}

#[test]
fn duplicate_answers_are_rejected() {
    let scorer = Scorer::new(seven_item_config()).unwrap();
    let err = scorer
        .score(&[RawAnswer::new(1, 2.0), RawAnswer::new(1, 3.0)])
        .unwrap_err();
    assert!(matches!(err, ScoringError::DuplicateAnswer(1)));
}

#[test]
fn weights_scale_contributions() {
    let mut config = seven_item_config();
    config.items[0].weight = Some(2.0);
    config.dimensions[0].bands = vec![Band::new("all", 0.0, 32.0)];
    let scorer = Scorer::new(config).unwrap();

    let result = scorer.score(&[RawAnswer::new(1, 3.0)]).unwrap();
    assert_eq!(result.total_score, 6.0);
}

#[test]
fn average_aggregation_divides_by_listed_items() {
    let mut config = two_factor_config();
    config.dimensions[0].aggregation = Aggregation::Average;
    config.dimensions[0].bands = vec![Band::new("low", 0.0, 1.5), Band::new("high", 1.5, 3.0)];
    let scorer = Scorer::new(config).unwrap();

    let result = scorer
        .score(&[RawAnswer::new(1, 3.0), RawAnswer::new(2, 0.0)])
        .unwrap();
    let anxiety = result.subscale("anxiety").unwrap();
    assert_eq!(anxiety.score, 1.5);
    // Shared boundary resolves to the first declared band.
    assert_eq!(anxiety.level_id, "low");
}

#[test]
fn first_matching_band_wins_on_overlap() {
    let mut config = seven_item_config();
    config.dimensions[0].bands = vec![
        Band::new("first", 0.0, 20.0),
        Band::new("second", 10.0, 28.0),
    ];
    let scorer = Scorer::new(config).unwrap();
    let result = scorer.score(&sequential(&[4.0, 4.0, 4.0])).unwrap();
    assert_eq!(result.total_score, 8.0);
    assert_eq!(result.total_level_id, "first");
    assert_eq!(scorer.classify("total", 15.0).unwrap().id, "first");
    assert_eq!(scorer.classify("total", 21.0).unwrap().id, "second");
}

#[test]
fn band_labels_default_to_ids() {
    let mut config = seven_item_config();
    config.dimensions[0].bands[0] = Band::new("low", 0.0, 7.0).labelled("Low");
    let scorer = Scorer::new(config).unwrap();
    let result = scorer.score(&[]).unwrap();
    assert_eq!(result.total_level_id, "low");
    assert_eq!(result.total_level_label, "Low");
}

#[test]
fn scoring_is_deterministic() {
    let scorer = Scorer::new(two_factor_config()).unwrap();
    let answers = sequential(&[1.0, 2.0, 3.0, 0.0]);
    let first = serde_json::to_string(&scorer.score(&answers).unwrap()).unwrap();
    for _ in 0..10 {
        let again = serde_json::to_string(&scorer.score(&answers).unwrap()).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn free_function_checks_test_id() {
    let config = seven_item_config();
    let err = score("other", &config, &[]).unwrap_err();
    assert!(matches!(err, ScoringError::TestMismatch { .. }));

    let result = score("wellbeing7", &config, &sequential(&[1.0])).unwrap();
    assert_eq!(result.total_score, 1.0);
}

#[test]
fn recommendations_fire_in_declared_order_without_duplicates() {
    let mut config = two_factor_config();
    config.recommendations = vec![
        RecommendationRule {
            id: "anxious".to_string(),
            conditions: vec![Condition {
                target: Target::Subscale("anxiety".to_string()),
                comparator: Comparator::Gte,
                value: 4.0,
            }],
            recommend_tests: vec!["gad7".to_string(), "pss10".to_string()],
            message: Some("Anxiety looks elevated.".to_string()),
        },
        RecommendationRule {
            id: "overall".to_string(),
            conditions: vec![Condition {
                target: Target::Total,
                comparator: Comparator::Gt,
                value: 3.0,
            }],
            recommend_tests: vec!["pss10".to_string(), "phq9".to_string()],
            message: None,
        },
        RecommendationRule {
            id: "low_mood".to_string(),
            conditions: vec![Condition {
                target: Target::Subscale("depression".to_string()),
                comparator: Comparator::Gt,
                value: 2.0,
            }],
            recommend_tests: vec!["phq9".to_string()],
            message: Some("never".to_string()),
        },
    ];
    let scorer = Scorer::new(config).unwrap();
    let result = scorer
        .score(&[RawAnswer::new(1, 3.0), RawAnswer::new(2, 2.0)])
        .unwrap();

    assert_eq!(result.recommended_tests, ["gad7", "pss10", "phq9"]);
    assert_eq!(result.recommendation_messages, ["Anxiety looks elevated."]);
}

#[test]
fn trace_explains_each_item() {
    let scorer = Scorer::new(seven_item_config()).unwrap();
    let (result, trace) = scorer
        .score_with_trace(&[RawAnswer::new(3, 1.0), RawAnswer::new(1, 2.0)])
        .unwrap();

    assert_eq!(result.total_score, 5.0);
    assert_eq!(trace.items.len(), 7);

    let third = &trace.items[2];
    assert_eq!(third.question_order, 3);
    assert_eq!(third.raw, Some(1.0));
    assert!(third.reversed);
    assert_eq!(third.adjusted, 3.0);
    assert_eq!(third.contribution, 3.0);
    assert_eq!(third.dimensions, ["total"]);

    let second = &trace.items[1];
    assert_eq!(second.raw, None);
    assert_eq!(second.contribution, 0.0);

    assert_eq!(trace.dimensions[0].min_possible, 0.0);
    assert_eq!(trace.dimensions[0].max_possible, 28.0);
}
