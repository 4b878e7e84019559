//! Value digests: deterministic content hashes of JSON values
//!
//! Digests collapse sub-documents and arrays into 128-bit values cheap to
//! compare and index, backing the sub-document-equality, array-equality,
//! and array-containment facts. The hash is order-sensitive: object
//! properties are hashed in document order (no canonicalization), matching
//! the traversal order, and numbers hash their textual form (equivalent but
//! differently-written numbers may hash differently). Collisions are
//! accepted as a probabilistic trade-off at 128 bits.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use xxhash_rust::xxh3::Xxh3;

// Type tags keep values of different kinds from colliding ("1" vs 1),
// length framing keeps adjacent fields from bleeding into each other.
const TAG_NULL: &[u8] = b"Z";
const TAG_BOOL: &[u8] = b"B";
const TAG_NUMBER: &[u8] = b"N";
const TAG_STRING: &[u8] = b"S";
const TAG_ARRAY: &[u8] = b"A";
const TAG_OBJECT: &[u8] = b"O";

/// 128-bit content hash of a JSON value
///
/// Two values with the same digest are treated as equal for
/// sub-document/array-equality queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueDigest(u128);

impl ValueDigest {
    /// Raw 128-bit value
    pub fn as_u128(&self) -> u128 {
        self.0
    }

    /// Fixed-width 32-character lowercase hex form
    pub fn to_hex(&self) -> String {
        format!("{:032x}", self.0)
    }
}

impl fmt::Display for ValueDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Helper for computing value digests during one shred call
///
/// Caches digests of container nodes by node identity, so hashing a parent
/// object does not recompute the digests of children the traversal also
/// visits. The cache keys are raw pointers used only for identity
/// comparison; entries are valid only while the document being shredded is
/// alive and unmoved, which holds for the single shred call one hasher
/// serves.
#[derive(Debug, Default)]
pub struct DocValueHasher {
    cache: HashMap<*const Value, ValueDigest>,
}

impl DocValueHasher {
    /// Fresh hasher for one shred call
    pub fn new() -> Self {
        DocValueHasher::default()
    }

    /// Digest of any JSON value
    pub fn hash(&mut self, value: &Value) -> ValueDigest {
        match value {
            Value::Array(_) | Value::Object(_) => {
                let key = value as *const Value;
                if let Some(digest) = self.cache.get(&key) {
                    return *digest;
                }
                let digest = self.compute(value);
                self.cache.insert(key, digest);
                digest
            }
            _ => self.compute(value),
        }
    }

    fn compute(&mut self, value: &Value) -> ValueDigest {
        let mut hasher = Xxh3::new();
        match value {
            Value::Null => hasher.update(TAG_NULL),
            Value::Bool(b) => {
                hasher.update(TAG_BOOL);
                hasher.update(&[*b as u8]);
            }
            Value::Number(n) => {
                hasher.update(TAG_NUMBER);
                hasher.update(n.to_string().as_bytes());
            }
            Value::String(s) => {
                hasher.update(TAG_STRING);
                hasher.update(&(s.len() as u64).to_be_bytes());
                hasher.update(s.as_bytes());
            }
            Value::Array(items) => {
                hasher.update(TAG_ARRAY);
                hasher.update(&(items.len() as u64).to_be_bytes());
                for item in items {
                    hasher.update(&self.hash(item).as_u128().to_be_bytes());
                }
            }
            Value::Object(map) => {
                hasher.update(TAG_OBJECT);
                hasher.update(&(map.len() as u64).to_be_bytes());
                for (key, item) in map {
                    hasher.update(&(key.len() as u64).to_be_bytes());
                    hasher.update(key.as_bytes());
                    hasher.update(&self.hash(item).as_u128().to_be_bytes());
                }
            }
        }
        ValueDigest(hasher.digest128())
    }
}
