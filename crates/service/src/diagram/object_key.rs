//! Object key derivation.
//!
//! Keys are derived from the diagram id alone, so updates overwrite the same
//! object instead of orphaning historical blobs. The trade-off is that no
//! previous payload version survives an update.

use uuid::Uuid;

/// Content-type suffix for diagram payload objects.
pub const OBJECT_SUFFIX: &str = ".json";

/// `<id>.json`, deterministic for a given id.
pub fn object_key(id: Uuid) -> String {
    format!("{id}{OBJECT_SUFFIX}")
}
