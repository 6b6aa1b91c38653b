//! Input/output for the pipeline's file formats.
//!
//! - [`structure`] parses raw fixed-column structure files into atom records.
//! - [`matrix`] is the whitespace-delimited, `#`-commented text codec shared by
//!   extracted molecule files and persisted examples.
//! - [`store`] persists and reloads labeled examples.
//!
//! [`traits`] provides the reader interface implemented by structure formats.

pub mod matrix;
pub mod store;
pub mod structure;
pub mod traits;
