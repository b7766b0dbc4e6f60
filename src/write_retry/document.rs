//! Write Document Identity Model
//!
//! A write is identified by its unique key field. The key is assumed to
//! be a reliable, collision-free disambiguator across retries and
//! concurrent unrelated writers; reconciliation is only as sound as
//! this assumption, and it is carried here explicitly rather than
//! strengthened or weakened elsewhere.

use serde::{Deserialize, Serialize};

/// One document submitted for insertion.
///
/// `key` is the unique-identity field; `body` is the remaining content.
/// Content equality is canonical-bytes equality of the serialized form
/// (serde_json sorts object keys), not structural value equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteDocument {
    key: serde_json::Value,
    body: serde_json::Value,
}

impl WriteDocument {
    /// Create a document from its identity key and content.
    pub fn new(key: serde_json::Value, body: serde_json::Value) -> Self {
        Self { key, body }
    }

    /// The unique-identity key.
    pub fn key(&self) -> &serde_json::Value {
        &self.key
    }

    /// The document content.
    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// Canonical serialized form used for content comparison.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Byte-level content equality of the canonical forms.
    ///
    /// A serialization failure on either side counts as a mismatch:
    /// unresolvable ambiguity must surface as failure, never as success.
    pub fn content_matches(&self, other: &WriteDocument) -> bool {
        match (self.canonical_bytes(), other.canonical_bytes()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// One logical write against a collection on the authoritative store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteRequest {
    /// Target collection name
    pub collection: String,
    /// Document to insert
    pub document: WriteDocument,
}

impl WriteRequest {
    /// Create a write request.
    pub fn new(collection: impl Into<String>, document: WriteDocument) -> Self {
        Self {
            collection: collection.into(),
            document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identical_documents_match() {
        let a = WriteDocument::new(json!(1), json!({"value": "TestValue"}));
        let b = WriteDocument::new(json!(1), json!({"value": "TestValue"}));
        assert!(a.content_matches(&b));
    }

    #[test]
    fn test_differing_body_does_not_match() {
        let a = WriteDocument::new(json!(1), json!({"value": "TestValue"}));
        let b = WriteDocument::new(json!(1), json!({"value": "TestValue has changed"}));
        assert!(!a.content_matches(&b));
    }

    #[test]
    fn test_differing_key_does_not_match() {
        let a = WriteDocument::new(json!(1), json!({"value": "v"}));
        let b = WriteDocument::new(json!(2), json!({"value": "v"}));
        assert!(!a.content_matches(&b));
    }

    #[test]
    fn test_key_order_is_canonicalized() {
        // serde_json objects sort keys, so field order in the source
        // does not affect the canonical form.
        let a = WriteDocument::new(json!(1), json!({"x": 1, "y": 2}));
        let b = WriteDocument::new(json!(1), json!({"y": 2, "x": 1}));
        assert!(a.content_matches(&b));
    }
}
