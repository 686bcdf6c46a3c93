#![forbid(unsafe_code)]
//! iotree-graph library.
//!
//! # Overview
//!
//! Transforms a validated input coefficient matrix into a directed acyclic
//! "tech-tree" graph with one discrete depth level per sector, for tiered
//! visualization.
//!
//! ## Pipeline
//!
//! ```text
//! (labels, CoefficientMatrix)
//!        ↓  extract::extract()            threshold ≥ 0.05, self-loops skipped
//! SectorGraph (weighted DiGraph, may contain cycles)
//!        ↓  resolve::resolve()            policy-driven edge removal + re-verify
//! SectorGraph (DAG)
//!        ↓  layering::select_trunk()      longest source→sink hop chain
//!        ↓  layering::assign_depths()     single topological sweep
//! Layering (nodes, edges, trunk, depth_map, tiers, diagnostics)
//! ```
//!
//! Every step is a pure function of its inputs; running the pipeline twice
//! on the same matrix and configuration yields identical output, down to
//! the BLAKE3 content hash of the edge set.
//!
//! # Conventions
//!
//! - **Errors**: typed [`GraphError`] at the library seam; all errors abort
//!   the run — there is no partial-result mode.
//! - **Logging**: `tracing` macros; skipped self-loops and removed edges
//!   are also reported as typed [`Diagnostic`] values in the result.

pub mod cycles;
pub mod diag;
pub mod error;
pub mod extract;
pub mod layering;
pub mod pipeline;
pub mod resolve;
pub mod stats;

pub use cycles::{CycleReport, find_all_cycles, report_cycles};
pub use diag::Diagnostic;
pub use error::GraphError;
pub use extract::{SectorGraph, extract};
pub use pipeline::{Layering, Pipeline};
pub use resolve::{ResolvePolicy, resolve};
pub use stats::GraphStats;
