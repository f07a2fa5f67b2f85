// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Phase-based import resolution tests.
//!
//! Each test lays out a small module tree in a temporary directory, loads a
//! root file through a [`strand_resolve::Session`] and checks the result.
//!
//! # Organization
//!
//! - `load` - phase 1: path resolution, caching, cycles, load errors
//! - `integrate` - phase 2: scope binding, conflicts, aliases
//! - `lookup` - name lookup through static, selective and re-exported imports
//! - `export` - dependency records and JSON produced from a loaded tree
//! - `common` - shared fixtures

#[path = "phases/common/mod.rs"]
mod common;

#[path = "phases/load.rs"]
mod load;

#[path = "phases/integrate.rs"]
mod integrate;

#[path = "phases/lookup.rs"]
mod lookup;

#[path = "phases/export.rs"]
mod export;
