//! Integration tests for rule compilation and the two compiled views.

use logfield_engine::compiler::rewrite::rewrite_escaped_hyphens;
use logfield_engine::compiler::{CompileOptions, DEFAULT_REGEX_SIZE_LIMIT};
use logfield_engine::{EngineConfig, ExtractionEngine, Rule, RuleCompiler};

#[test]
fn test_compile_mixed_collection() {
    let rules = vec![
        Rule::new(r"(?P<level>ERROR|INFO): (?P<msg>.+)").with_priority(1),
        Rule::new(r"(?P<a>x)(?P<a>y)"),
        Rule::new(r"static text"),
        Rule::new(r"(?P<broken>"),
    ];

    let ruleset = RuleCompiler::new().compile(&rules);

    assert_eq!(ruleset.len(), 2);
    assert_eq!(ruleset.source_len(), 4);
    let invalid: Vec<_> = ruleset.invalid_rules().iter().map(|e| e.rule_index).collect();
    assert_eq!(invalid, vec![1, 3]);

    let first = ruleset.get(0).unwrap();
    assert_eq!(first.field_names(), ["level", "msg"]);
    assert_eq!(first.priority(), 1);
    assert!(ruleset.get(1).is_none());
    assert!(ruleset.get(2).unwrap().field_names().is_empty());
}

#[test]
fn test_compile_error_carries_pattern() {
    let ruleset = RuleCompiler::new().compile(&[Rule::new("[unterminated")]);
    let error = &ruleset.invalid_rules()[0];
    assert_eq!(error.rule_index, 0);
    assert_eq!(error.pattern, "[unterminated");
    assert!(!error.message.is_empty());
    assert!(error.to_string().contains("[unterminated"));
}

#[test]
fn test_field_names_follow_group_order() {
    let ruleset =
        RuleCompiler::new().compile(&[Rule::new(r"(?P<b>\d+)-(\w+)-(?P<a>\w+)(?:-(?P<c>.+))?")]);
    assert_eq!(ruleset.rules()[0].field_names(), ["b", "a", "c"]);
}

#[test]
fn test_loosened_view_rewrites_only_escaped_hyphens() {
    assert_eq!(rewrite_escaped_hyphens(r"req\-\d+"), r"req_\d+");
    assert_eq!(rewrite_escaped_hyphens(r"a\\-b"), r"a\\-b");
    assert_eq!(rewrite_escaped_hyphens(r"a\\\-b"), r"a\\_b");
    assert_eq!(rewrite_escaped_hyphens("[a-z]-x"), "[a-z]-x");

    let ruleset = RuleCompiler::loosened().compile(&[Rule::new(r"(?P<id>req\-\d+)")]);
    assert_eq!(ruleset.rules()[0].pattern(), r"(?P<id>req_\d+)");
    assert!(ruleset.rules()[0].regex().is_match("req_12"));
    assert!(!ruleset.rules()[0].regex().is_match("req-12"));
}

#[test]
fn test_exact_view_keeps_source_pattern() {
    let ruleset = RuleCompiler::new().compile(&[Rule::new(r"(?P<id>req\-\d+)")]);
    assert_eq!(ruleset.rules()[0].pattern(), r"(?P<id>req\-\d+)");
    assert!(ruleset.rules()[0].regex().is_match("req-12"));
}

#[test]
fn test_views_can_disagree_on_validity() {
    let rules = vec![Rule::new(r"[0-\-]")];

    let exact = RuleCompiler::new().compile(&rules);
    let loosened = RuleCompiler::loosened().compile(&rules);

    assert!(exact.is_empty());
    assert_eq!(loosened.len(), 1);
}

#[test]
fn test_size_limit_rejects_oversized_patterns() {
    let options = CompileOptions {
        regex_size_limit: 4096,
        ..CompileOptions::default()
    };
    let ruleset = RuleCompiler::with_options(options).compile(&[
        Rule::new(r"\w{100}"),
        Rule::new("ok"),
    ]);
    assert_eq!(ruleset.len(), 1);
    assert_eq!(ruleset.invalid_rules()[0].rule_index, 0);
    assert_eq!(
        CompileOptions::default().regex_size_limit,
        DEFAULT_REGEX_SIZE_LIMIT
    );
}

#[test]
fn test_engine_views_follow_config() {
    let rules = vec![Rule::new(r"(?P<id>a\-b)")];

    let engine = ExtractionEngine::from_rules_with_config(
        rules.clone(),
        EngineConfig::default().with_hyphen_rewrite(false),
    )
    .unwrap();
    assert_eq!(engine.loosened_view().rules()[0].pattern(), r"(?P<id>a\-b)");

    let engine = ExtractionEngine::from_rules(rules).unwrap();
    assert_eq!(engine.loosened_view().rules()[0].pattern(), r"(?P<id>a_b)");
}
