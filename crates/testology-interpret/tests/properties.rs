use proptest::prelude::*;
use testology_core::models::chunk::InterpretationChunk;
use testology_core::models::result::ScoredResult;
use testology_interpret::InterpretationConfig;
use testology_interpret::chunks::dedup_by_id;
use testology_interpret::cross_test::{CrossTestRule, TestCondition};
use testology_scoring::config::{Comparator, Target};

fn result(test_id: &str, total: f64, level: &str) -> ScoredResult {
    ScoredResult {
        test_id: test_id.to_string(),
        total_score: total,
        total_level_id: level.to_string(),
        total_level_label: level.to_string(),
        severity: None,
        subscales: vec![],
        raw_answers: vec![],
        recommended_tests: vec![],
        recommendation_messages: vec![],
    }
}

fn config() -> InterpretationConfig {
    InterpretationConfig::new("stress")
        .level("high", |_| Ok(InterpretationChunk::new("stress_high", "High")))
        .subscales(|r| {
            let count = (r.total_score / 10.0) as usize;
            Ok((0..count)
                .map(|i| InterpretationChunk::new(format!("stress_note_{i}"), "Note"))
                .collect())
        })
        .cross_test(CrossTestRule::new(
            "with_mood",
            vec![
                TestCondition::compare("stress", Target::Total, Comparator::Gte, 20.0),
                TestCondition::compare("mood", Target::Total, Comparator::Gte, 10.0),
            ],
            |_| Ok(InterpretationChunk::new("stress_mood", "Both")),
        ))
}

proptest! {
    #[test]
    fn chunks_come_in_level_subscale_cross_order(
        total in 0.0f64..40.0,
        high in any::<bool>(),
        mood in 0.0f64..20.0,
    ) {
        let config = config();
        let current = result("stress", total, if high { "high" } else { "low" });
        let others = vec![result("mood", mood, "any")];
        let chunks = config.interpret(&current, Some(others.as_slice())).unwrap();

        let mut rest = chunks.as_slice();
        if high {
            prop_assert_eq!(rest[0].id.as_str(), "stress_high");
            rest = &rest[1..];
        }
        let notes = rest.iter().take_while(|c| c.id.starts_with("stress_note_")).count();
        prop_assert_eq!(notes, (total / 10.0) as usize);
        let combos = &rest[notes..];
        prop_assert!(combos.iter().all(|c| c.is_cross_test()));
        prop_assert_eq!(combos.len(), usize::from(total >= 20.0 && mood >= 10.0));

        let again = config.interpret(&current, Some(others.as_slice())).unwrap();
        prop_assert_eq!(chunks, again);
    }

    #[test]
    fn dedup_is_idempotent(ids in proptest::collection::vec("[a-c]", 0..12)) {
        let chunks: Vec<_> = ids.iter().map(|id| InterpretationChunk::new(id.clone(), "x")).collect();
        let once = dedup_by_id(chunks);
        let twice = dedup_by_id(once.clone());
        prop_assert_eq!(&once, &twice);

        let mut seen = std::collections::BTreeSet::new();
        prop_assert!(once.iter().all(|c| seen.insert(c.id.clone())));
    }
}
