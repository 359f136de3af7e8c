//! Primary extraction engine interface.
//!
//! [`ExtractionEngine`] owns a rule collection and the two compiled views built
//! from it at construction time:
//!
//! - the **exact** view, compiled from the patterns as written;
//! - the **loosened** view, compiled with escaped hyphens rewritten, used only
//!   by fallback.
//!
//! Both views are immutable after construction, so one engine can be shared by
//! reference across any number of worker threads.
//!
//! # Usage Patterns
//!
//! ## Single Line
//! ```rust
//! use logfield_engine::{ExtractionEngine, Field, Rule};
//!
//! let engine = ExtractionEngine::from_rules(vec![
//!     Rule::new(r"(?P<level>ERROR|INFO): (?P<msg>.+)").with_priority(1),
//! ])?;
//!
//! let result = engine.extract("INFO: disk full");
//! assert_eq!(
//!     result.fields(),
//!     [Field::new("level", "INFO"), Field::new("msg", "disk full")]
//! );
//! # Ok::<(), logfield_engine::ExtractError>(())
//! ```
//!
//! ## Batch Processing
//! ```rust
//! use logfield_engine::{ExtractionEngine, Rule};
//!
//! let engine = ExtractionEngine::from_rules(vec![Rule::new(r"user=(?P<user>\w+)")])?;
//! let lines = ["user=alice action=login", "user=bob action=logout"];
//!
//! let results = engine.extract_batch(&lines);
//! assert_eq!(results[1].field("user"), Some("bob"));
//! # Ok::<(), logfield_engine::ExtractError>(())
//! ```

use crate::compiler::{CompiledRuleset, RuleCompileError, RuleCompiler};
use crate::config::EngineConfig;
use crate::error::{ExtractError, Result};
use crate::fallback::FallbackResolver;
use crate::ir::{ExtractionResult, MatchKind, NoMatchReason, Rule};
use crate::loader;
use crate::matcher::ExactMatcher;
use crate::normalizer::normalize_strict;
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

/// Rule-based field extractor.
#[derive(Debug)]
pub struct ExtractionEngine {
    rules: Vec<Rule>,
    exact: CompiledRuleset,
    loosened: CompiledRuleset,
    config: EngineConfig,
    pool: Option<rayon::ThreadPool>,
}

impl ExtractionEngine {
    /// Create an engine with default configuration.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self> {
        Self::from_rules_with_config(rules, EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    ///
    /// Rules whose patterns do not compile are reported through
    /// [`invalid_rules`](Self::invalid_rules) and never cause an error here.
    /// Errors come only from an invalid configuration.
    pub fn from_rules_with_config(rules: Vec<Rule>, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let exact = RuleCompiler::with_options(config.exact_compile_options()).compile(&rules);
        let loosened = if config.fallback.enabled {
            RuleCompiler::with_options(config.loosened_compile_options()).compile(&rules)
        } else {
            CompiledRuleset::default()
        };

        let pool = match config.parallel.num_threads {
            Some(num_threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .thread_name(|i| format!("logfield-worker-{i}"))
                    .build()
                    .map_err(|err| ExtractError::InvalidConfig(err.to_string()))?,
            ),
            None => None,
        };

        info!(
            rules = rules.len(),
            exact = exact.len(),
            loosened = loosened.len(),
            invalid = exact.invalid_rules().len(),
            fallback = config.fallback.enabled,
            "extraction engine ready"
        );

        Ok(Self {
            rules,
            exact,
            loosened,
            config,
            pool,
        })
    }

    /// Create an engine from a JSON rule collection.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_rules(loader::parse_rules(json)?)
    }

    /// Create an engine from a JSON rule collection on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_rules(loader::load_rules(path)?)
    }

    /// Extract fields from one log line.
    ///
    /// Never fails: lines that cannot be matched come back as
    /// [`ExtractionResult::Unmatched`].
    pub fn extract(&self, log_text: &str) -> ExtractionResult {
        let normalized = normalize_strict(log_text);

        if let Some(hit) = ExactMatcher::new(&self.exact).find_best(&normalized) {
            return ExtractionResult::Matched {
                rule_index: hit.rule.index(),
                kind: MatchKind::Exact,
                fields: hit.fields(),
            };
        }

        if !self.config.fallback.enabled {
            let reason = if self.exact.is_empty() {
                NoMatchReason::AllRulesInvalid
            } else {
                NoMatchReason::NoRulesMatched
            };
            return ExtractionResult::unmatched(reason);
        }

        FallbackResolver::new(&self.loosened)
            .with_min_similarity(self.config.fallback.min_similarity)
            .resolve(log_text)
    }

    /// Extract every line, preserving input order.
    ///
    /// Large batches run on the rayon pool (or the engine's dedicated pool when
    /// `num_threads` is configured).
    pub fn extract_batch<S>(&self, lines: &[S]) -> Vec<ExtractionResult>
    where
        S: AsRef<str> + Sync,
    {
        let parallel = &self.config.parallel;
        if !parallel.enable_batch_parallelism
            || lines.len() < parallel.min_batch_size_for_parallelism
        {
            return lines.iter().map(|line| self.extract(line.as_ref())).collect();
        }

        let run = || -> Vec<ExtractionResult> {
            lines
                .par_iter()
                .map(|line| self.extract(line.as_ref()))
                .collect()
        };

        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    /// The rule collection as loaded.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn exact_view(&self) -> &CompiledRuleset {
        &self.exact
    }

    /// The loosened view. Empty when fallback is disabled.
    pub fn loosened_view(&self) -> &CompiledRuleset {
        &self.loosened
    }

    /// Rules excluded from exact matching because their pattern did not compile.
    pub fn invalid_rules(&self) -> &[RuleCompileError] {
        self.exact.invalid_rules()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Builder for [`ExtractionEngine`].
#[derive(Debug, Clone, Default)]
pub struct ExtractionEngineBuilder {
    config: EngineConfig,
}

impl ExtractionEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable similarity fallback.
    pub fn with_fallback(mut self, enable: bool) -> Self {
        self.config.fallback.enabled = enable;
        self
    }

    pub fn with_min_similarity(mut self, threshold: Option<f64>) -> Self {
        self.config.fallback.min_similarity = threshold;
        self
    }

    /// Enable or disable batch parallelism.
    pub fn with_parallel_processing(mut self, enable: bool) -> Self {
        self.config.parallel.enable_batch_parallelism = enable;
        self
    }

    pub fn with_parallel_threads(mut self, num_threads: usize) -> Self {
        self.config.parallel.num_threads = Some(num_threads);
        self
    }

    pub fn with_regex_size_limit(mut self, bytes: usize) -> Self {
        self.config.regex_size_limit = bytes;
        self
    }

    pub fn build(self, rules: Vec<Rule>) -> Result<ExtractionEngine> {
        ExtractionEngine::from_rules_with_config(rules, self.config)
    }

    pub fn build_from_path(self, path: impl AsRef<Path>) -> Result<ExtractionEngine> {
        self.build(loader::load_rules(path)?)
    }
}
