//! Filesystem and process-boundary helpers.

pub mod paths;
pub mod settings;
pub mod store;
