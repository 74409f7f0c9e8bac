use testology_core::models::result::{ScoredResult, SubscaleScore};
use testology_interpret::table::InterpretationTable;
use testology_interpret::{InterpretationConfig, RuleError, TableError};

const TABLE: &str = r#"{
    "test_id": "pss10",
    "levels": {
        "high": {
            "id": "pss10_high",
            "title": "Stress: {{ level }}",
            "body": "Your total of {{ total_score }} is in the {{ level }} range.",
            "priority": "high"
        },
        "low": { "id": "pss10_low", "body": "Stress is within the usual range." }
    },
    "thresholds": [
        {
            "subscale_id": "helplessness",
            "comparator": "gte",
            "value": 17,
            "chunk": { "id": "pss10_helplessness", "body": "{{ subscale }} is elevated ({{ score }})." }
        },
        {
            "subscale_id": "self_efficacy",
            "comparator": "lte",
            "value": 8,
            "chunk": { "id": "pss10_self_efficacy", "body": "{{ subscale }} could use support." }
        }
    ],
    "cross_test": [
        {
            "id": "stress_anxiety",
            "conditions": [
                { "test_id": "pss10", "check": { "level_in": ["high"] } },
                {
                    "test_id": "gad7",
                    "check": { "compare": { "comparator": "gte", "value": 10 } }
                }
            ],
            "chunk": { "id": "stress_anxiety", "body": "Stress and anxiety are feeding each other." }
        }
    ]
}"#;

fn subscale(id: &str, label: &str, score: f64) -> SubscaleScore {
    SubscaleScore {
        id: id.to_string(),
        label: label.to_string(),
        score,
        level_id: String::new(),
        level_label: String::new(),
        severity: None,
    }
}

fn result(test_id: &str, total: f64, level: &str, label: &str, subscales: Vec<SubscaleScore>) -> ScoredResult {
    ScoredResult {
        test_id: test_id.to_string(),
        total_score: total,
        total_level_id: level.to_string(),
        total_level_label: label.to_string(),
        severity: None,
        subscales,
        raw_answers: vec![],
        recommended_tests: vec![],
        recommendation_messages: vec![],
    }
}

fn config() -> InterpretationConfig {
    InterpretationConfig::from_table(InterpretationTable::from_json(TABLE).unwrap()).unwrap()
}

#[test]
fn table_compiles_to_ordered_chunks() {
    let pss = result(
        "pss10",
        31.0,
        "high",
        "High",
        vec![
            subscale("helplessness", "Helplessness", 20.0),
            subscale("self_efficacy", "Self-efficacy", 11.0),
        ],
    );
    let gad = result("gad7", 12.0, "moderate", "Moderate", vec![]);

    let chunks = config().interpret(&pss, Some(std::slice::from_ref(&gad))).unwrap();
    let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["pss10_high", "pss10_helplessness", "combo_stress_anxiety"]);

    assert_eq!(chunks[0].title.as_deref(), Some("Stress: High"));
    assert_eq!(chunks[0].body, "Your total of 31 is in the High range.");
    assert!(chunks[0].is_high_priority());
    assert_eq!(chunks[1].body, "Helplessness is elevated (20).");
    assert_eq!(chunks[2].test_id.as_deref(), Some("pss10"));
}

#[test]
fn thresholds_on_missing_subscales_fail() {
    let pss = result("pss10", 5.0, "low", "Low", vec![subscale("helplessness", "Helplessness", 2.0)]);
    let err = config().interpret(&pss, None).unwrap_err();
    assert!(matches!(err, RuleError::MissingSubscale(ref id) if id == "self_efficacy"));
}

#[test]
fn empty_chunk_ids_are_rejected() {
    let json = r#"{ "test_id": "x", "levels": { "low": { "id": " ", "body": "b" } } }"#;
    let table = InterpretationTable::from_json(json).unwrap();
    assert!(matches!(
        InterpretationConfig::from_table(table),
        Err(TableError::EmptyChunkId(_))
    ));
}

#[test]
fn inserted_values_are_not_expanded_again() {
    let json = r#"{
        "test_id": "pss10",
        "thresholds": [{
            "subscale_id": "worry",
            "comparator": "gte",
            "value": 1,
            "chunk": { "id": "pss10_worry", "body": "Subscale {{ subscale }} scored {{ score }}" }
        }]
    }"#;
    let config = InterpretationConfig::from_table(InterpretationTable::from_json(json).unwrap()).unwrap();

    for label in ["Worry {score}", "Worry {{ score }}"] {
        let pss = result("pss10", 3.0, "low", "Low", vec![subscale("worry", label, 3.0)]);
        let chunks = config.interpret(&pss, None).unwrap();
        assert_eq!(chunks[0].body, format!("Subscale {label} scored 3"));
    }
}

#[test]
fn template_syntax_errors_fail_compilation() {
    let json = r#"{
        "test_id": "x",
        "levels": { "low": { "id": "x_low", "title": "Fine", "body": "Total {{ total_score" } }
    }"#;
    let table = InterpretationTable::from_json(json).unwrap();
    let err = InterpretationConfig::from_table(table).unwrap_err();
    assert!(matches!(err, TableError::TemplateParse { ref template, .. } if template == "level/low/body"));
}

#[test]
fn unknown_template_variables_fail_at_render() {
    let json = r#"{
        "test_id": "x",
        "levels": { "low": { "id": "x_low", "body": "Hello {{ respondent }}" } }
    }"#;
    let config = InterpretationConfig::from_table(InterpretationTable::from_json(json).unwrap()).unwrap();
    let err = config
        .interpret(&result("x", 1.0, "low", "Low", vec![]), None)
        .unwrap_err();
    assert!(matches!(err, RuleError::Template { ref template, .. } if template == "level/low/body"));
}
