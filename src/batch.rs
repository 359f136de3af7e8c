//! Batch extraction over JSON log-record collections.
//!
//! Each record is a JSON object with at least a `logText` string. Extraction
//! adds a `logField` array to every record and leaves all other keys, and
//! their order, untouched. Records that could not be matched are also listed
//! in an [`UnmatchedRecord`] side report instead of aborting the batch.

use crate::engine::ExtractionEngine;
use crate::error::{ExtractError, Result};
use crate::ir::{ExtractionResult, Field, MatchKind, NoMatchReason};
use crate::loader::write_json;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub const LOG_TEXT_KEY: &str = "logText";
pub const LOG_FIELD_KEY: &str = "logField";

/// One input record. Keys other than `logText` pass through unchanged.
///
/// Every constructor, including deserialization, rejects objects without a
/// string `logText`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct LogRecord {
    log_text: String,
    entries: Map<String, Value>,
}

fn log_text_of(entries: &Map<String, Value>) -> std::result::Result<String, String> {
    match entries.get(LOG_TEXT_KEY) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(format!("`{LOG_TEXT_KEY}` is not a string")),
        None => Err(format!("missing `{LOG_TEXT_KEY}`")),
    }
}

impl TryFrom<Map<String, Value>> for LogRecord {
    type Error = String;

    fn try_from(entries: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let log_text = log_text_of(&entries)?;
        Ok(Self { log_text, entries })
    }
}

impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl LogRecord {
    /// Build a record from a JSON object, checking it carries a `logText` string.
    pub fn from_object(index: usize, entries: Map<String, Value>) -> Result<Self> {
        Self::try_from(entries).map_err(|message| ExtractError::InvalidRecord { index, message })
    }

    pub fn new(log_text: impl Into<String>) -> Self {
        let log_text = log_text.into();
        let mut entries = Map::new();
        entries.insert(LOG_TEXT_KEY.to_string(), Value::String(log_text.clone()));
        Self { log_text, entries }
    }

    pub fn log_text(&self) -> &str {
        &self.log_text
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Set `logField`, replacing any previous value.
    pub fn set_log_fields(&mut self, fields: &[Field]) {
        let value = fields
            .iter()
            .map(|field| {
                let mut entry = Map::new();
                entry.insert("name".to_string(), Value::String(field.name.clone()));
                entry.insert("value".to_string(), Value::String(field.value.clone()));
                Value::Object(entry)
            })
            .collect();
        self.entries
            .insert(LOG_FIELD_KEY.to_string(), Value::Array(value));
    }

    pub fn log_fields(&self) -> Option<Vec<Field>> {
        self.entries
            .get(LOG_FIELD_KEY)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// Entry of the side report for records no rule could handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedRecord {
    #[serde(rename = "logText")]
    pub log_text: String,
    pub reason: NoMatchReason,
}

/// Outcome counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub exact: usize,
    pub fallback: usize,
    pub low_confidence: usize,
    pub unmatched: usize,
}

impl BatchStats {
    fn record(&mut self, result: &ExtractionResult) {
        self.total += 1;
        match result.match_kind() {
            Some(MatchKind::Exact) => self.exact += 1,
            Some(MatchKind::Fallback { .. }) => self.fallback += 1,
            Some(MatchKind::LowConfidence { .. }) => self.low_confidence += 1,
            None => self.unmatched += 1,
        }
    }
}

/// Augmented records plus the unmatched side report.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub records: Vec<LogRecord>,
    pub unmatched: Vec<UnmatchedRecord>,
    pub stats: BatchStats,
}

/// Parse a JSON array of log records.
pub fn parse_records(json: &str) -> Result<Vec<LogRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(ExtractError::InvalidRecord {
            index: 0,
            message: "expected a JSON array of records".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(entries) => LogRecord::from_object(index, entries),
            _ => Err(ExtractError::InvalidRecord {
                index,
                message: "record is not a JSON object".to_string(),
            }),
        })
        .collect()
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<LogRecord>> {
    parse_records(&fs::read_to_string(path)?)
}

/// Run the engine over every record.
pub fn process_records(engine: &ExtractionEngine, mut records: Vec<LogRecord>) -> BatchReport {
    let texts: Vec<&str> = records.iter().map(LogRecord::log_text).collect();
    let results = engine.extract_batch(&texts);

    let mut stats = BatchStats::default();
    let mut unmatched = Vec::new();
    for (record, result) in records.iter_mut().zip(results) {
        stats.record(&result);
        if let Some(reason) = result.no_match_reason() {
            unmatched.push(UnmatchedRecord {
                log_text: record.log_text().to_string(),
                reason,
            });
        }
        record.set_log_fields(result.fields());
    }

    BatchReport {
        records,
        unmatched,
        stats,
    }
}

/// Read records from `input`, extract, and write augmented records to
/// `output`. The unmatched side report goes to `unmatched_report` when given.
pub fn process_files(
    engine: &ExtractionEngine,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    unmatched_report: Option<&Path>,
) -> Result<BatchStats> {
    let input = input.as_ref();
    let output = output.as_ref();

    let records = load_records(input)?;
    info!(path = %input.display(), records = records.len(), "loaded log records");

    let report = process_records(engine, records);
    write_json(output, &report.records)?;

    if let Some(path) = unmatched_report {
        write_json(path, &report.unmatched)?;
    }

    let stats = report.stats;
    info!(
        total = stats.total,
        exact = stats.exact,
        fallback = stats.fallback,
        low_confidence = stats.low_confidence,
        unmatched = stats.unmatched,
        "extraction finished"
    );
    if stats.unmatched > 0 {
        match unmatched_report {
            Some(path) => warn!(
                unmatched = stats.unmatched,
                report = %path.display(),
                "records not matched"
            ),
            None => warn!(unmatched = stats.unmatched, "records not matched"),
        }
    }
    for entry in &report.unmatched {
        debug!(log_text = %entry.log_text, reason = %entry.reason, "record not matched");
    }

    Ok(stats)
}
