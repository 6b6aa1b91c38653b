//! Data models shared across the pipeline.
//!
//! - [`atom`] holds the immutable per-line record produced by the structure parser.
//! - [`matrix`] holds the row-major feature matrix and the canonical column layout.
//! - [`system`] holds system identifiers, file-name conventions and example pairs.

pub mod atom;
pub mod matrix;
pub mod system;
