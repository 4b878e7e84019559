//! Document shredding pipeline for the Shale engine
//!
//! Converts arbitrary nested JSON documents into flat, path-keyed facts a
//! column store can index:
//! - Shredder: the pipeline (identity normalization, validation, traversal)
//! - ShreddedDocument / ShreddedDocumentBuilder: the immutable record and
//!   its accumulator
//! - DocValueHasher / ValueDigest: order-sensitive 128-bit content hashes
//! - IndexingProjector: prunes non-indexed branches before the value pass

#![warn(clippy::all)]

pub mod hasher;
pub mod projection;
pub mod record;
pub mod shredder;
mod validate;

pub use hasher::{DocValueHasher, ValueDigest};
pub use projection::IndexingProjector;
pub use record::{ArrayContainsKey, ShreddedDocument, ShreddedDocumentBuilder};
pub use shredder::Shredder;
