//! Shared key generation for storage backends.
//!
//! Key format: `{sha256}/{filename}`. Two media with the same checksum but different names
//! get distinct objects; the same pair always maps to the same key.

use medias_core::models::ObjectRef;

pub fn object_key(object: ObjectRef<'_>) -> String {
    format!("{}/{}", object.sha256, object.filename)
}
