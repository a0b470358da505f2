//! Unwraps the provider's JSONP-style body into the raw row table.
//!
//! The embed endpoint answers with `( {...} )`: a JSON document wrapped in bare
//! parentheses with no callback name. Two further quirks have been seen in the wild:
//! literal tab characters inside strings, and `\'` escapes, neither of which is valid
//! JSON.

use crate::provider::error::PayloadError;
use serde_json::Value;

/// Key holding the schedule rows in the decoded document.
const TABLE_KEY: &str = "aaData";

/// One positional row as returned by the provider, before validation.
pub type RawScheduleRow = Value;

/// Decodes a provider body into its `aaData` rows.
///
/// An empty table is a success with zero rows. Everything that prevents reaching a
/// table is a [`PayloadError`], which callers treat as "no data" rather than a failure.
///
/// ```
/// use gxp_spots::unwrap_jsonp;
/// use serde_json::json;
///
/// let rows = unwrap_jsonp(b"(  {\"aaData\":[[1,2]]}  )").unwrap();
/// assert_eq!(rows, vec![json!([1, 2])]);
/// ```
pub fn unwrap_jsonp(body: &[u8]) -> Result<Vec<RawScheduleRow>, PayloadError> {
    let text = std::str::from_utf8(body)?;
    let json_text = strip_framing(text);
    if json_text.trim().is_empty() {
        return Err(PayloadError::Empty);
    }

    let cleaned = json_text.replace('\t', "  ").replace("\\'", "'");
    let document: Value = serde_json::from_str(&cleaned)?;
    if is_empty_document(&document) {
        return Err(PayloadError::EmptyDocument);
    }

    match document.get(TABLE_KEY) {
        Some(Value::Array(rows)) => Ok(rows.clone()),
        Some(Value::Null) | None => Err(PayloadError::MissingTable),
        Some(_) => Err(PayloadError::TableNotArray),
    }
}

fn strip_framing(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
    let trimmed = trimmed.strip_prefix('(').unwrap_or(trimmed);
    trimmed.strip_suffix(')').unwrap_or(trimmed)
}

fn is_empty_document(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let body = b"({\"aaData\":[[\"caf\xe9\"]]})";
        assert!(matches!(unwrap_jsonp(body), Err(PayloadError::NotUtf8(_))));
    }

    #[test]
    fn test_unwraps_parenthesized_table() -> Result<(), PayloadError> {
        let rows = unwrap_jsonp(b"(  {\"aaData\":[[1,2]]}  )")?;
        assert_eq!(rows, vec![json!([1, 2])]);
        Ok(())
    }

    #[test]
    fn test_accepts_unframed_json_and_trailing_semicolon() -> Result<(), PayloadError> {
        assert_eq!(unwrap_jsonp(b"{\"aaData\":[]}")?, Vec::<Value>::new());
        assert_eq!(unwrap_jsonp(b"\n({\"aaData\":[[\"a\"]]});\n")?, vec![json!(["a"])]);
        Ok(())
    }

    #[test]
    fn test_empty_and_null_bodies_are_no_data() {
        assert!(matches!(unwrap_jsonp(b""), Err(PayloadError::Empty)));
        assert!(matches!(unwrap_jsonp(b"   \n "), Err(PayloadError::Empty)));
        assert!(matches!(unwrap_jsonp(b"()"), Err(PayloadError::Empty)));
        assert!(matches!(unwrap_jsonp(b"null"), Err(PayloadError::EmptyDocument)));
        assert!(matches!(unwrap_jsonp(b"({})"), Err(PayloadError::EmptyDocument)));
    }

    #[test]
    fn test_broken_json_is_a_decode_error() {
        assert!(matches!(
            unwrap_jsonp(b"({\"aaData\": [[1, 2)"),
            Err(PayloadError::Decode(_))
        ));
    }

    #[test]
    fn test_missing_or_mistyped_table() {
        assert!(matches!(
            unwrap_jsonp(b"({\"iTotalRecords\": 0})"),
            Err(PayloadError::MissingTable)
        ));
        assert!(matches!(
            unwrap_jsonp(b"({\"aaData\": \"nope\"})"),
            Err(PayloadError::TableNotArray)
        ));
    }

    #[test]
    fn test_repairs_tabs_and_single_quote_escapes() -> Result<(), PayloadError> {
        let body = "({\"aaData\":[[\"Monday,\tNovember 23, 2020\", \"Rock \\'n Ride\"]]})";
        let rows = unwrap_jsonp(body.as_bytes())?;
        assert_eq!(
            rows,
            vec![json!(["Monday,  November 23, 2020", "Rock 'n Ride"])]
        );
        Ok(())
    }
}
