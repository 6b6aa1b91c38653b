//! # Core Module
//!
//! Stateless building blocks of the data pipeline.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Atom records, feature matrices, system identifiers and example pairs
//! - **Feature Encoding** ([`encoding`]) - Conversion of parsed atoms into the canonical feature matrix
//! - **File I/O** ([`io`]) - Fixed-column structure parsing and the persisted matrix/example formats
//! - **Voxelization** ([`voxel`]) - Per-example min-max scaling and scatter into a dense grid
//!
//! Everything in this module is pure with respect to shared state: functions take their inputs
//! by reference, return new values, and touch the filesystem only through explicit paths.

pub mod encoding;
pub mod io;
pub mod models;
pub mod voxel;
