#![forbid(unsafe_code)]
//! iotree-core library.
//!
//! Input side of the iotree pipeline: the label/index bijection, the
//! validated coefficient matrix, e-stat table ingestion, and pipeline
//! configuration.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums per module; `anyhow::Result` only at
//!   config-loading seams.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod index;
pub mod matrix;
pub mod table;

pub use config::PipelineConfig;
pub use index::LabelIndex;
pub use matrix::CoefficientMatrix;
pub use table::InputTable;
