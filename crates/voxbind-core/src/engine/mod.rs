//! # Engine Module
//!
//! Configuration, error taxonomy, progress reporting, pairing and the units of work
//! that the [`workflows`](crate::workflows) dispatch.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Builders for extraction and generation runs,
//!   the negative-count and split-rule policies
//! - **Error Handling** ([`error`]) - Run-level [`error::PipelineError`] and the
//!   per-item [`error::TaskFailure`] / [`error::FileFailure`]
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Pairing** ([`pairing`]) - Seeded, deterministic positive/negative sampling
//! - **Tasks** ([`tasks`]) - Per-file extraction and per-system generation, plus the
//!   worker-pool dispatcher
//!
//! Pairing is computed up front from an explicit seed, so the set of generated
//! examples never depends on how the worker pool schedules tasks.

pub mod config;
pub mod error;
pub mod pairing;
pub mod progress;
pub mod tasks;
