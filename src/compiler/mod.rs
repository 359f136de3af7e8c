//! Rule compiler.
//!
//! Turns raw [`Rule`] records into [`CompiledRule`]s. Compilation is isolated
//! per rule: a pattern that fails to compile is reported in
//! [`CompiledRuleset::invalid_rules`] and left out of the ruleset, and the
//! remaining rules are compiled as usual.
//!
//! The compiler can also produce the *loosened* view used by fallback
//! matching, where escaped hyphens are rewritten before compilation (see
//! [`rewrite::rewrite_escaped_hyphens`]). The loosened view is a separate
//! ruleset; the source rules are never modified.
//!
//! # Examples
//!
//! ```rust
//! use logfield_engine::{Rule, RuleCompiler};
//!
//! let rules = vec![
//!     Rule::new(r"(?P<level>ERROR|INFO): (?P<msg>.+)").with_priority(1),
//!     Rule::new(r"(?P<broken>"),
//! ];
//!
//! let ruleset = RuleCompiler::new().compile(&rules);
//! assert_eq!(ruleset.len(), 1);
//! assert_eq!(ruleset.invalid_rules().len(), 1);
//! assert_eq!(ruleset.rules()[0].field_names(), ["level", "msg"]);
//! ```

pub mod rewrite;

use crate::ir::{Rule, RuleIndex};
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{debug, warn};

/// Default cap on the compiled size of a single rule's regex (10 MiB).
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Options controlling how patterns are compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Rewrite `\-` to `_` before compiling.
    pub rewrite_escaped_hyphens: bool,
    /// Maximum compiled program size per regex, in bytes.
    pub regex_size_limit: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            rewrite_escaped_hyphens: false,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

/// A pattern that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule {rule_index} pattern `{pattern}` failed to compile: {message}")]
pub struct RuleCompileError {
    /// Index of the rule in the source collection.
    pub rule_index: RuleIndex,
    /// The pattern as it was handed to the regex compiler.
    pub pattern: String,
    /// The regex compiler's message.
    pub message: String,
}

/// A rule ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    index: RuleIndex,
    pattern: String,
    regex: Regex,
    field_names: Vec<String>,
    priority: i64,
    examples: Vec<String>,
    example_chars: Vec<Vec<char>>,
}

impl CompiledRule {
    /// Position of the source rule in the original collection.
    pub fn index(&self) -> RuleIndex {
        self.index
    }

    /// The effective pattern source, after any rewrite.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Named capture groups in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Examples split into Unicode scalar values once, at compile time.
    pub fn example_chars(&self) -> &[Vec<char>] {
        &self.example_chars
    }
}

/// The compiled form of a rule collection.
///
/// Rules are kept in source order, which is what tie-breaking relies on.
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleset {
    rules: Vec<CompiledRule>,
    invalid: Vec<RuleCompileError>,
    source_len: usize,
}

impl CompiledRuleset {
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn invalid_rules(&self) -> &[RuleCompileError] {
        &self.invalid
    }

    /// Number of successfully compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules in the collection this ruleset was compiled from.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Find the compiled rule for a source index, if it compiled.
    pub fn get(&self, index: RuleIndex) -> Option<&CompiledRule> {
        self.rules
            .binary_search_by_key(&index, CompiledRule::index)
            .ok()
            .map(|pos| &self.rules[pos])
    }
}

/// Compiles rule collections into [`CompiledRuleset`]s.
#[derive(Debug, Clone, Default)]
pub struct RuleCompiler {
    options: CompileOptions,
}

impl RuleCompiler {
    /// Compiler for the exact-match view.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Compiler for the loosened view used by fallback matching.
    pub fn loosened() -> Self {
        Self::with_options(CompileOptions {
            rewrite_escaped_hyphens: true,
            ..CompileOptions::default()
        })
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile a single rule.
    pub fn compile_rule(
        &self,
        index: RuleIndex,
        rule: &Rule,
    ) -> Result<CompiledRule, RuleCompileError> {
        let pattern = if self.options.rewrite_escaped_hyphens {
            rewrite::rewrite_escaped_hyphens(&rule.pattern).into_owned()
        } else {
            rule.pattern.clone()
        };

        let regex = RegexBuilder::new(&pattern)
            .size_limit(self.options.regex_size_limit)
            .build()
            .map_err(|err| RuleCompileError {
                rule_index: index,
                pattern: pattern.clone(),
                message: err.to_string(),
            })?;

        let field_names = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();

        Ok(CompiledRule {
            index,
            pattern,
            regex,
            field_names,
            priority: rule.priority,
            examples: rule.examples.clone(),
            example_chars: rule
                .examples
                .iter()
                .map(|example| example.chars().collect())
                .collect(),
        })
    }

    /// Compile every rule, collecting failures instead of aborting.
    pub fn compile(&self, rules: &[Rule]) -> CompiledRuleset {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut invalid = Vec::new();

        for (index, rule) in rules.iter().enumerate() {
            match self.compile_rule(index, rule) {
                Ok(rule) => compiled.push(rule),
                Err(err) => {
                    warn!(
                        rule_index = err.rule_index,
                        pattern = %err.pattern,
                        error = %err.message,
                        loosened = self.options.rewrite_escaped_hyphens,
                        "rule pattern failed to compile"
                    );
                    invalid.push(err);
                }
            }
        }

        debug!(
            compiled = compiled.len(),
            invalid = invalid.len(),
            loosened = self.options.rewrite_escaped_hyphens,
            "compiled rule view"
        );

        CompiledRuleset {
            rules: compiled,
            invalid,
            source_len: rules.len(),
        }
    }
}
