//! ObjectId: 12-byte time-ordered document identifier
//!
//! Layout follows the BSON ObjectId convention: a 4-byte big-endian Unix
//! timestamp in seconds, a 5-byte per-process random value, and a 3-byte
//! big-endian counter initialized to a random value. The external form is a
//! 24-character lowercase hex string.

use chrono::Utc;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

// Fixed for the lifetime of the process, like the BSON "machine id".
static PROCESS_RANDOM: Lazy<[u8; 5]> = Lazy::new(rand::random);

static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(rand::random::<u32>() & 0x00FF_FFFF));

/// Error type for ObjectId parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectIdParseError {
    /// Input is not exactly 24 characters
    #[error("ObjectId must be a 24-character hex string, got {0} characters")]
    InvalidLength(usize),
    /// Input contains a non-hex character
    #[error("ObjectId contains non-hex character '{0}'")]
    InvalidChar(char),
}

/// A 12-byte time-ordered identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a new ObjectId from the current time
    pub fn new() -> Self {
        let mut bytes = [0u8; 12];
        let seconds = Utc::now().timestamp().max(0) as u32;
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_RANDOM);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);
        ObjectId(bytes)
    }

    /// Construct from raw bytes
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        ObjectId(bytes)
    }

    /// Raw bytes
    pub fn bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Embedded creation timestamp, seconds since the Unix epoch
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 24 {
            return Err(ObjectIdParseError::InvalidLength(s.chars().count()));
        }
        let mut bytes = [0u8; 12];
        for (ix, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
            let hi = hex_digit(chunk[0])?;
            let lo = hex_digit(chunk[1])?;
            bytes[ix] = (hi << 4) | lo;
        }
        Ok(ObjectId(bytes))
    }
}

fn hex_digit(b: u8) -> Result<u8, ObjectIdParseError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(ObjectIdParseError::InvalidChar(b as char)),
    }
}
