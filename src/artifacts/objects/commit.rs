//! Commit object
//!
//! A commit records a full snapshot of the tracked tree (path -> blob ID,
//! never a delta) together with its metadata and parent commit IDs. Zero
//! parents for the root commit, one for a normal commit, two for a merge.
//!
//! ## Format
//!
//! On disk (canonical text, also the compatibility boundary between
//! implementations):
//!
//! ```text
//! <message>
//! <author>
//! <timestamp>
//! <parent1> <parent2> ... <parentN>     (empty line if no parents)
//! <path1> <blob1>
//! <path2> <blob2>
//! ```
//!
//! Parsing is strict on the first four lines; every remaining non-empty line
//! splits on the first space into (path, blob ID). Snapshot lines are sorted
//! by path so the same tree always serializes to the same bytes.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Timestamp format carried in commits, local time
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A commit's full tracked tree: relative path -> blob ID
pub type Snapshot = BTreeMap<PathBuf, ObjectId>;

/// Slim representation of a commit
///
/// Carries only what graph traversals need: identity, parents, and the
/// timestamp used to order candidates deterministically.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: String,
}

/// Snapshot record with metadata and parent links
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Commit message (single line)
    message: String,
    /// Author name
    author: String,
    /// Local timestamp, `YYYY-MM-DD HH:MM:SS`
    timestamp: String,
    /// Parent commit IDs (empty for the root commit, two for merges)
    parents: Vec<ObjectId>,
    /// Full tracked tree at this commit
    snapshot: Snapshot,
}

impl Commit {
    pub fn new(
        message: String,
        author: String,
        timestamp: String,
        parents: Vec<ObjectId>,
        snapshot: Snapshot,
    ) -> Self {
        Commit {
            message,
            author,
            timestamp,
            parents,
            snapshot,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// First parent, the one `log` follows
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut commit_bytes = Vec::new();

        writeln!(commit_bytes, "{}", self.message)?;
        writeln!(commit_bytes, "{}", self.author)?;
        writeln!(commit_bytes, "{}", self.timestamp)?;

        let parents = self
            .parents
            .iter()
            .map(|parent| parent.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(commit_bytes, "{}", parents)?;

        for (path, blob_oid) in &self.snapshot {
            writeln!(commit_bytes, "{} {}", path.display(), blob_oid)?;
        }

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut lines = content.lines();

        let message = lines
            .next()
            .context("Invalid commit object: missing message line")?
            .to_string();
        let author = lines
            .next()
            .context("Invalid commit object: missing author line")?
            .to_string();
        let timestamp = lines
            .next()
            .context("Invalid commit object: missing timestamp line")?
            .to_string();

        let parents_line = lines
            .next()
            .context("Invalid commit object: missing parents line")?;
        let parents = parents_line
            .split_whitespace()
            .map(|parent| ObjectId::try_parse(parent.to_string()))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut snapshot = Snapshot::new();
        for line in lines {
            // unknown or empty trailing lines are ignored
            if let Some((path, blob_oid)) = line.split_once(' ') {
                snapshot.insert(
                    PathBuf::from(path),
                    ObjectId::try_parse(blob_oid.to_string())?,
                );
            }
        }

        Ok(Self::new(message, author, timestamp, parents, snapshot))
    }
}

impl Object for Commit {}
