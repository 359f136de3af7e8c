//! JSON loading and writing for rule and record collections.

use crate::error::{ExtractError, Result};
use crate::ir::Rule;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Parse a JSON array of rules.
///
/// A document that is not an array, or an element that is not a rule object,
/// rejects the whole collection.
pub fn parse_rules(json: &str) -> Result<Vec<Rule>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(ExtractError::InvalidRuleSet(
            "expected a JSON array of rules".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|err| ExtractError::InvalidRuleSet(format!("rule {index}: {err}")))
        })
        .collect()
}

/// Read and parse a rule collection from disk.
pub fn load_rules(path: impl AsRef<Path>) -> Result<Vec<Rule>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let rules = parse_rules(&json)?;
    debug!(path = %path.display(), rules = rules.len(), "loaded rule collection");
    Ok(rules)
}

/// Write `value` as pretty-printed JSON. Non-ASCII text is written verbatim.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
