//! Core object traits
//!
//! The two object kinds (blob, commit) implement:
//! - `Packable`: serialization to the canonical text format
//! - `Unpackable`: deserialization from that format
//! - `Object`: common operations (digest computation)
//!
//! The object ID is the SHA-1 digest of the full serialized bytes, so two
//! commits that differ only in parents or snapshot still get distinct IDs.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

/// Trait for serializing objects to their canonical byte form
pub trait Packable {
    /// Serialize the object to bytes
    fn serialize(&self) -> Result<Bytes>;
}

/// Trait for deserializing objects from their canonical byte form
pub trait Unpackable {
    /// Deserialize the object from a reader
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// Core object trait
///
/// Implemented by both object kinds (Blob, Commit). The store never tags
/// objects with their kind; each caller knows which one it expects.
pub trait Object: Packable {
    /// Compute the object ID by hashing the serialized content
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        let oid = hasher.finalize();
        ObjectId::try_parse(format!("{oid:x}"))
    }
}
