//! Run records and the rules that govern them.
//!
//! Core modules perform no filesystem or network I/O. They operate on
//! in-memory records; the only ambient inputs are the wall clock (timestamps)
//! and entropy (run id suffixes).

pub mod config;
pub mod document;
pub mod error;
pub mod id;
pub mod iteration;
pub mod manifest;
pub mod result;
