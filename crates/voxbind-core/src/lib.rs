//! # VoxBind Core Library
//!
//! Data preparation for protein-ligand binding classifiers: fixed-column structure
//! parsing, feature encoding, reproducible positive/negative example generation and
//! per-example voxelization into dense occupancy grids.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomRecord`, `MoleculeMatrix`,
//!   `ExamplePair`), the feature encoder, the text codecs for structure files and persisted
//!   examples, and the voxelizer.
//!
//! - **[`engine`]: The Logic Core.** Configuration, the error taxonomy, progress reporting,
//!   the seeded example pairer and the per-file / per-identifier tasks dispatched by the
//!   workflows.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures: extraction of raw structure
//!   files, generation of example folders across a worker pool, and streaming persisted
//!   examples through the voxelizer for model consumption.

pub mod core;
pub mod engine;
pub mod workflows;
