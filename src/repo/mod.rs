//! Persistence layer for records.
//!
//! # Responsibility
//! - Keep all SQL inside the repository boundary.
//! - Expose a trait seam so front ends and services can inject fakes.
//!
//! # Invariants
//! - Not-found conditions surface as `Option` / `false`, never as errors.
//! - Storage-engine failures propagate unretried.

pub mod record_repo;
