//! Use-case layer over the record repository.
//!
//! # Responsibility
//! - Own the connection handle and expose the full store API to front ends.
//! - Orchestrate file-level export/import on top of repository CRUD.

pub mod store;
