//! # Log Field Extraction Engine
//!
//! Extracts structured fields from unstructured log lines using user-supplied
//! rules: a regex with named capture groups, a priority, and example lines.
//!
//! For each line the engine:
//! 1. trims whitespace and zero-width marks and searches every rule; the
//!    highest-priority match wins, earlier rules win ties;
//! 2. when nothing matches, strips punctuation from the line, picks the rule
//!    whose examples are closest by edit distance, and tries that rule's
//!    loosened pattern.
//!
//! Extraction never fails per line. Unmatched lines come back with a reason
//! code, and a fallback rule that does not match structurally yields its field
//! names with empty values, flagged [`MatchKind::LowConfidence`].
//!
//! ## Quick Start
//!
//! ```rust
//! use logfield_engine::{ExtractionEngine, Field, MatchKind};
//!
//! let engine = ExtractionEngine::from_json_str(r#"[
//!     {"pattern": "(?P<level>ERROR|INFO): (?P<msg>.+)", "priority": 1,
//!      "examples": ["INFO: service started"]}
//! ]"#)?;
//!
//! let result = engine.extract("INFO: disk full");
//! assert_eq!(result.match_kind(), Some(MatchKind::Exact));
//! assert_eq!(
//!     result.fields(),
//!     [Field::new("level", "INFO"), Field::new("msg", "disk full")]
//! );
//! # Ok::<(), logfield_engine::ExtractError>(())
//! ```
//!
//! ### Batch Processing
//!
//! ```rust,no_run
//! use logfield_engine::{batch, ExtractionEngine};
//! use std::path::Path;
//!
//! let engine = ExtractionEngine::from_path("classified_rules.json")?;
//! let stats = batch::process_files(
//!     &engine,
//!     "logs.json",
//!     "parsed.json",
//!     Some(Path::new("unmatched.json")),
//! )?;
//! println!("{} of {} records unmatched", stats.unmatched, stats.total);
//! # Ok::<(), logfield_engine::ExtractError>(())
//! ```

pub mod batch;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod ir;
pub mod loader;
pub mod matcher;
pub mod normalizer;

// Primary engine interface
pub use engine::{ExtractionEngine, ExtractionEngineBuilder};

// Compiler and configuration
pub use compiler::{CompileOptions, CompiledRule, CompiledRuleset, RuleCompileError, RuleCompiler};
pub use config::{EngineConfig, FallbackConfig, ParallelConfig};

// Core types and errors
pub use error::{ExtractError, Result};
pub use ir::{ExtractionResult, Field, MatchKind, NoMatchReason, Rule, RuleIndex};

// Matching
pub use fallback::{FallbackResolver, RuleScore};
pub use matcher::{ExactMatcher, RuleMatch};
pub use normalizer::{normalize, NormalizeLevel};

// Batch driver
pub use batch::{BatchReport, BatchStats, LogRecord, UnmatchedRecord};
