//! CLI command implementations.

pub mod convert;
