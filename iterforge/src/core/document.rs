//! Text form of persisted run documents.

use serde::Serialize;

/// Pretty-printed JSON with a trailing newline.
///
/// Struct fields keep declaration order and maps are sorted, so the same
/// record always renders to the same bytes.
pub fn to_document<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buf = serde_json::to_string_pretty(value)?;
    buf.push('\n');
    Ok(buf)
}
