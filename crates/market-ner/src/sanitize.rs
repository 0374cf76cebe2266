//! Completion sanitization
//!
//! Models wrap JSON in prose or code fences despite instructions. The
//! completion is cut down to its outermost `{ ... }` before parsing, and the
//! parsed fields are coerced into [`ExtractionResult`].

use crate::entities::ExtractionResult;
use crate::error::{NerError, Result};
use crate::universe::TickerUniverse;
use serde_json::{Map, Value};
use tracing::debug;

/// Slice `text` from the first `{` to the last `}`, inclusive
///
/// Returns `None` when either brace is missing or the last `}` comes before
/// the first `{`.
pub fn slice_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parse a raw completion into an [`ExtractionResult`]
///
/// Missing keys, non-string values, blank strings and the literals
/// `"null"`/`"none"` all read as `None`. A ticker outside `universe` is
/// dropped; a bare listed symbol gets the universe suffix.
pub fn parse_completion(raw: &str, universe: &TickerUniverse) -> Result<ExtractionResult> {
    let sliced = slice_json_object(raw.trim()).ok_or(NerError::NoJsonObject)?;
    let value: Value = serde_json::from_str(sliced)?;
    let Value::Object(fields) = value else {
        return Err(NerError::NoJsonObject);
    };

    let ticker = text_field(&fields, "ticker").and_then(|raw_ticker| {
        let normalized = universe.normalize(&raw_ticker);
        if normalized.is_none() {
            debug!("Dropping ticker outside allow-list: {}", raw_ticker);
        }
        normalized
    });

    Ok(ExtractionResult {
        company_name: text_field(&fields, "company_name"),
        ticker,
        date_range: text_field(&fields, "date_range"),
    })
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let text = fields.get(key)?.as_str()?.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("null") || text.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(text.to_string())
    }
}
