//! Object identifier (content digest)
//!
//! Object IDs are 40-character hexadecimal strings produced by hashing an
//! object's serialized bytes. They identify both blobs and commits, which
//! share one namespace in the object store.
//!
//! ## Format
//!
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Short: First 7 characters (e.g., "abc123")

use crate::artifacts::objects::OBJECT_ID_LENGTH;

/// Object identifier (content digest)
///
/// A 40-character hexadecimal string that uniquely identifies an object.
/// Equality is byte equality; all references between objects use these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id))
    }

    /// Get abbreviated form of the object ID
    ///
    /// # Returns
    ///
    /// First 7 characters of the digest, used for display
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_valid_40_char_hex_string() {
        let id = "a".repeat(40);
        let oid = ObjectId::try_parse(id.clone()).unwrap();
        assert_eq!(oid.as_ref(), id);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(ObjectId::try_parse("abc".to_string()).is_err());
        assert!(ObjectId::try_parse("a".repeat(41)).is_err());
    }

    #[test]
    fn rejects_non_hex_characters() {
        assert!(ObjectId::try_parse("z".repeat(40)).is_err());
    }

    #[test]
    fn short_oid_is_first_seven_characters() {
        let oid = ObjectId::try_parse(format!("{}{}", "1234567", "0".repeat(33))).unwrap();
        assert_eq!(oid.to_short_oid(), "1234567");
    }
}
