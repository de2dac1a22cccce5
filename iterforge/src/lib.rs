//! Run lifecycle tracking for an iterative code-generation pipeline.
//!
//! A run produces, tests, and scores candidate artifacts over a bounded number
//! of iterations. This crate records that work and persists it:
//!
//! - **[`core`]**: Run records ([`core::config::RunConfig`],
//!   [`core::iteration::IterationResult`], [`core::result::RunResult`],
//!   [`core::manifest::RunManifest`]) and the rules for updating them. No
//!   filesystem access.
//! - **[`io`]**: Directory layout, atomic JSON persistence, and settings.
//! - **[`state`]**: [`state::RunState`], the owner of one run's records and
//!   storage.
//!
//! Generation, testing, and evaluation are done elsewhere; their outputs are
//! handed in as [`core::iteration::IterationResult`] values.

pub mod core;
pub mod io;
pub mod logging;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
