//! End-to-end tests for the extraction engine.
//!
//! These tests drive complete rule collections through the engine, covering
//! exact matching, priority resolution and the fallback path.

use logfield_engine::{
    ExtractionEngine, ExtractionResult, Field, MatchKind, NoMatchReason, Rule,
};

fn engine(rules: Vec<Rule>) -> ExtractionEngine {
    ExtractionEngine::from_rules(rules).unwrap()
}

#[test]
fn test_level_and_message_scenario() {
    let engine = engine(vec![
        Rule::new(r"(?P<level>ERROR|INFO): (?P<msg>.+)").with_priority(1),
    ]);

    let result = engine.extract("INFO: disk full");
    assert_eq!(
        result,
        ExtractionResult::Matched {
            rule_index: 0,
            kind: MatchKind::Exact,
            fields: vec![Field::new("level", "INFO"), Field::new("msg", "disk full")],
        }
    );
    assert_eq!(result.no_match_reason(), None);
}

#[test]
fn test_higher_priority_duplicate_pattern_wins() {
    let engine = engine(vec![
        Rule::new("foo").with_priority(1),
        Rule::new("foo").with_priority(5),
    ]);

    let result = engine.extract("foo bar");
    assert_eq!(result.rule_index(), Some(1));
    assert!(result.fields().is_empty());
    assert_eq!(result.match_kind(), Some(MatchKind::Exact));
}

#[test]
fn test_priority_correctness() {
    let engine = engine(vec![
        Rule::new(r"(?P<r2>GET) (?P<path>\S+)").with_priority(1),
        Rule::new(r"(?P<r1>GET) (?P<path>/api/\S+)").with_priority(2),
    ]);

    let result = engine.extract("GET /api/users 200");
    assert_eq!(
        result.fields(),
        [Field::new("r1", "GET"), Field::new("path", "/api/users")]
    );
}

#[test]
fn test_order_breaks_priority_ties() {
    let engine = engine(vec![Rule::new(r"(?P<ra>\d+)"), Rule::new(r"(?P<rb>\d+)")]);

    let result = engine.extract("pid 42");
    assert_eq!(result.fields(), [Field::new("ra", "42")]);
}

#[test]
fn test_trim_and_empty_invariant() {
    let engine = engine(vec![Rule::new(
        r"user=(?P<user>[^,]*),(?: ip=(?P<ip>[^,]*),)?(?P<note>.*)",
    )]);

    let result = engine.extract("user=  alice  , trailing note   ");
    assert_eq!(
        result.fields(),
        [
            Field::new("user", "alice"),
            Field::empty("ip"),
            Field::new("note", "trailing note"),
        ]
    );
    for field in result.fields() {
        assert_eq!(field.value, field.value.trim());
    }
}

#[test]
fn test_unparseable_line_falls_back_to_similar_rule() {
    let engine = engine(vec![
        Rule::new(r"(?P<level>ERROR|INFO): (?P<msg>.+)").with_examples(["INFO: service started"]),
        Rule::new(r"^(?P<word>\w+)$").with_examples(["unparseable"]),
    ]);

    let result = engine.extract("###unparseable###");
    assert_eq!(result.rule_index(), Some(1));
    assert_eq!(result.fields(), [Field::new("word", "unparseable")]);
    match result.match_kind() {
        Some(MatchKind::Fallback { similarity }) => assert_eq!(similarity, 1.0),
        other => panic!("expected fallback match, got {other:?}"),
    }
}

#[test]
fn test_unparseable_line_with_non_matching_similar_rule() {
    let engine = engine(vec![
        Rule::new(r"(?P<level>ERROR|INFO): (?P<msg>.+)").with_examples(["INFO: service started"]),
        Rule::new(r"^(?P<code>\d{3}) (?P<reason>.+)$").with_examples(["unparseable"]),
    ]);

    let result = engine.extract("###unparseable###");
    assert_eq!(result.rule_index(), Some(1));
    assert_eq!(
        result.fields(),
        [Field::empty("code"), Field::empty("reason")]
    );
    assert!(result.match_kind().unwrap().is_low_confidence());
    assert_eq!(result.no_match_reason(), None);
}

#[test]
fn test_all_invalid_collection() {
    let engine = engine(vec![
        Rule::new(r"(?P<a>unclosed"),
        Rule::new(r"(?P<a>x)(?P<a>y)"),
        Rule::new(r"(?<=lookbehind)x"),
    ]);

    for line in ["", "anything", "INFO: disk full", "###"] {
        let result = engine.extract(line);
        assert_eq!(
            result,
            ExtractionResult::unmatched(NoMatchReason::AllRulesInvalid)
        );
        assert!(result.fields().is_empty());
    }
    assert_eq!(engine.invalid_rules().len(), 3);
}

#[test]
fn test_invalid_rule_does_not_block_valid_ones() {
    let engine = engine(vec![
        Rule::new(r"(?P<broken>").with_priority(10),
        Rule::new(r"(?P<ok>ok)"),
    ]);

    let result = engine.extract("all ok");
    assert_eq!(result.fields(), [Field::new("ok", "ok")]);
    assert_eq!(engine.invalid_rules()[0].rule_index, 0);
}

#[test]
fn test_exact_search_sees_strict_not_aggressive_text() {
    // The hyphen survives strict normalization, so the exact rule matches.
    let engine = engine(vec![Rule::new(r"(?P<id>conn-\d+)").with_examples(["conn7"])]);

    let result = engine.extract("  closing conn-17  ");
    assert_eq!(result.match_kind(), Some(MatchKind::Exact));
    assert_eq!(result.fields(), [Field::new("id", "conn-17")]);
}

#[test]
fn test_escaped_hyphen_rule_matches_underscored_id_through_fallback() {
    let engine = engine(vec![
        Rule::new(r"(?P<id>session\-\d+) (?P<state>open|closed)")
            .with_examples(["session_1 open"]),
    ]);

    let result = engine.extract("[session_99] closed.");
    assert_eq!(
        result.fields(),
        [Field::new("id", "session_99"), Field::new("state", "closed")]
    );
    assert!(matches!(
        result.match_kind(),
        Some(MatchKind::Fallback { .. })
    ));
}

#[test]
fn test_rules_without_examples_still_resolve() {
    let engine = engine(vec![Rule::new(r"(?P<a>alpha)"), Rule::new(r"(?P<b>beta)")]);

    let result = engine.extract("gamma");
    assert_eq!(result.rule_index(), Some(0));
    assert_eq!(result.fields(), [Field::empty("a")]);
}

#[test]
fn test_extraction_is_deterministic() {
    let engine = engine(vec![
        Rule::new(r"(?P<x>\w+) (?P<y>\w+)").with_examples(["a b"]),
        Rule::new(r"(?P<z>\d+)").with_examples(["1"]),
    ]);

    for line in ["one two", "!!!", "12 apples", ""] {
        assert_eq!(engine.extract(line), engine.extract(line));
    }
}
