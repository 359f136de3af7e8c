//! Configuration for the extraction engine.
//!
//! By default fallback is enabled with the escaped-hyphen rewrite and no
//! similarity threshold. Batch parallelism kicks in for batches of 64 lines or
//! more.

use crate::compiler::{CompileOptions, DEFAULT_REGEX_SIZE_LIMIT};
use crate::error::{ExtractError, Result};

/// Fallback resolution settings.
///
/// # Examples
///
/// ```rust
/// use logfield_engine::FallbackConfig;
///
/// // Only accept fallback candidates that look at least half alike.
/// let config = FallbackConfig {
///     min_similarity: Some(0.5),
///     ..FallbackConfig::default()
/// };
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackConfig {
    /// Run similarity fallback when no rule matches exactly.
    ///
    /// When disabled, lines without an exact match come back as
    /// `"no rules matched"`, or `"all rules invalid"` when no rule compiled.
    ///
    /// **Default**: true
    pub enabled: bool,

    /// Build the loosened view with `\-` rewritten to `_`.
    ///
    /// **Default**: true
    pub rewrite_escaped_hyphens: bool,

    /// Reject the best candidate unless its similarity is strictly greater
    /// than this value. `Some(0.0)` rejects rules with no examples and
    /// candidates with nothing in common with the line.
    ///
    /// **Default**: None (always accept the best candidate)
    pub min_similarity: Option<f64>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rewrite_escaped_hyphens: true,
            min_similarity: None,
        }
    }
}

/// Batch parallelism settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelConfig {
    /// Spread batch extraction across the rayon pool.
    pub enable_batch_parallelism: bool,
    /// Batches smaller than this run on the calling thread.
    pub min_batch_size_for_parallelism: usize,
    /// Dedicated pool size. `None` uses the global rayon pool.
    pub num_threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enable_batch_parallelism: true,
            min_batch_size_for_parallelism: 64,
            num_threads: None,
        }
    }
}

/// Engine configuration.
///
/// # Example
/// ```rust
/// use logfield_engine::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_min_similarity(0.3)
///     .with_parallel_threads(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Maximum compiled size of a single rule's regex, in bytes.
    pub regex_size_limit: usize,
    pub fallback: FallbackConfig,
    pub parallel: ParallelConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            fallback: FallbackConfig::default(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact matching only.
    pub fn strict() -> Self {
        Self {
            fallback: FallbackConfig {
                enabled: false,
                ..FallbackConfig::default()
            },
            ..Self::default()
        }
    }

    /// Parallelize even small batches.
    pub fn high_throughput() -> Self {
        Self {
            parallel: ParallelConfig {
                enable_batch_parallelism: true,
                min_batch_size_for_parallelism: 8,
                num_threads: None,
            },
            ..Self::default()
        }
    }

    /// Single-threaded, deterministic scheduling; handy when reading debug logs.
    pub fn development() -> Self {
        Self {
            parallel: ParallelConfig {
                enable_batch_parallelism: false,
                ..ParallelConfig::default()
            },
            ..Self::default()
        }
    }

    /// Compile options for the exact-match view.
    pub fn exact_compile_options(&self) -> CompileOptions {
        CompileOptions {
            rewrite_escaped_hyphens: false,
            regex_size_limit: self.regex_size_limit,
        }
    }

    /// Compile options for the loosened view.
    pub fn loosened_compile_options(&self) -> CompileOptions {
        CompileOptions {
            rewrite_escaped_hyphens: self.fallback.rewrite_escaped_hyphens,
            regex_size_limit: self.regex_size_limit,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.regex_size_limit == 0 {
            return Err(ExtractError::InvalidConfig(
                "regex_size_limit must be greater than zero".to_string(),
            ));
        }
        if let Some(threshold) = self.fallback.min_similarity {
            if !threshold.is_finite() || threshold > 1.0 {
                return Err(ExtractError::InvalidConfig(format!(
                    "min_similarity must be a finite value no greater than 1.0, got {threshold}"
                )));
            }
        }
        if self.parallel.min_batch_size_for_parallelism == 0 {
            return Err(ExtractError::InvalidConfig(
                "min_batch_size_for_parallelism must be at least 1".to_string(),
            ));
        }
        if self.parallel.num_threads == Some(0) {
            return Err(ExtractError::InvalidConfig(
                "num_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    // Builder methods for compilation

    pub fn with_regex_size_limit(mut self, bytes: usize) -> Self {
        self.regex_size_limit = bytes;
        self
    }

    // Builder methods for fallback configuration

    /// Enable or disable similarity fallback.
    pub fn with_fallback(mut self, enable: bool) -> Self {
        self.fallback.enabled = enable;
        self
    }

    /// Enable or disable the escaped-hyphen rewrite in the loosened view.
    pub fn with_hyphen_rewrite(mut self, enable: bool) -> Self {
        self.fallback.rewrite_escaped_hyphens = enable;
        self
    }

    pub fn with_min_similarity(mut self, threshold: f64) -> Self {
        self.fallback.min_similarity = Some(threshold);
        self
    }

    pub fn without_min_similarity(mut self) -> Self {
        self.fallback.min_similarity = None;
        self
    }

    // Builder methods for parallel processing configuration

    /// Enable or disable batch parallelism.
    pub fn with_parallel_processing(mut self, enable: bool) -> Self {
        self.parallel.enable_batch_parallelism = enable;
        self
    }

    /// Use a dedicated pool with `num_threads` workers.
    pub fn with_parallel_threads(mut self, num_threads: usize) -> Self {
        self.parallel.num_threads = Some(num_threads);
        self
    }

    /// Set minimum batch size for parallel processing.
    pub fn with_min_batch_size_for_parallelism(mut self, min_size: usize) -> Self {
        self.parallel.min_batch_size_for_parallelism = min_size;
        self
    }
}
