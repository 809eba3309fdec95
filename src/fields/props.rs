//! Single-level property access on BSON documents

use mongodb::bson::{Bson, Document};

/// Get the value stored under `key`, or `None` if absent.
///
/// Only one path segment is looked up: `"a.b"` is a literal key.
pub fn get_one_level<'a>(container: &'a Document, key: &str) -> Option<&'a Bson> {
    container.get(key)
}

/// Store `value` under `key`, replacing any previous value.
///
/// Mutates `container` in place and returns it for chaining.
pub fn set_one_level<'a>(
    container: &'a mut Document,
    key: &str,
    value: impl Into<Bson>,
) -> &'a mut Document {
    container.insert(key, value);
    container
}
