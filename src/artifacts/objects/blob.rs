//! Blob object
//!
//! Blobs store one file's contents and nothing else: no filename, no mode.
//! On disk a blob is exactly its raw content bytes, so the blob's ID is the
//! digest of the file contents themselves.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// File contents, addressed by their own digest
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: String,
}

impl Blob {
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(Bytes::from(self.content.clone().into_bytes()))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        Ok(Self::new(content))
    }
}

impl Object for Blob {}
