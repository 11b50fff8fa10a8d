//! Domain model for stored records.
//!
//! # Responsibility
//! - Define the canonical record shape shared by all store operations.
//! - Own title validation so every write path enforces the same rule.
//!
//! # Invariants
//! - Every persisted record is identified by a stable `RecordId`.
//! - A record never exists with an empty title.

pub mod record;
