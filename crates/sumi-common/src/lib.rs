//! Common utilities shared by the sumi crates.
//!
//! This crate provides infrastructure used by both parsing stages:
//! - **Warning System** - per-parse deduplicated diagnostics, optionally echoed to stderr in color

pub mod warning;
