//! evaltex - Schema-driven LaTeX reports from survey responses
//!
//! Reads a CSV export of survey or evaluation answers and renders it into
//! one or more LaTeX documents, following a schema of directives that says
//! how each column should be presented.
//!
//! ## Core Features
//!
//! - **Directives**: bullet lists, combined answer pairs, pie charts of
//!   ratings, bar charts of scores and free text
//! - **Sections**: recursive grouping by any column, multi-select aware
//! - **Fan-out**: one document per category of a grouping column
//! - **Anonymization**: answers are listed in a random (or seeded) order
//!
//! ## Quick Start
//!
//! ```ignore
//! use evaltex::{AssemblerOptions, Config, DocumentAssembler, RowShuffler, SvgChartService, Table};
//!
//! let config = Config::default();
//! let table = Table::from_csv_path(Path::new("responses.csv"))?;
//! let mut charts = SvgChartService::new("figures")?;
//! let mut assembler = DocumentAssembler::new(
//!     &config.schema,
//!     AssemblerOptions::from_config(&config),
//!     &mut charts,
//!     RowShuffler::from_config(&config.render),
//! );
//! let body = assembler.assemble(&table)?;
//! ```
//!
//! ## Modules
//!
//! - [`types`]: table, schema directives and errors
//! - [`report`]: aggregation, rendering, sections and assembly
//! - [`config`]: layered configuration
//! - [`cli`]: command implementations

pub mod cli;
pub mod config;
pub mod constants;
pub mod report;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, FigureConfig, OutputConfig, RenderConfig};

// Error Types
pub use types::{ReportError, Result, ResultExt, ValidationError, ValidationErrorKind};

// Data
pub use types::{ArtifactRef, Directive, Schema, Table};

// =============================================================================
// Report Re-exports
// =============================================================================

pub use report::{
    AssemblerOptions, ChartService, DocumentAssembler, Fragment, RenderedDocument, RowShuffler,
    SvgChartService, Template,
};
