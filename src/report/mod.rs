//! Report Generation
//!
//! Turns a [`Table`](crate::types::Table) and a [`Schema`](crate::types::Schema)
//! into LaTeX bodies.
//!
//! ## Pipeline
//!
//! ```text
//! Table ─▶ DocumentAssembler ─┬─▶ Renderer ──▶ ChartService (SVG files)
//!                             └─▶ split_and_render (sections, recursive)
//!                                        │
//!                                        ▼
//!                              Fragment ─▶ escape once ─▶ Template
//! ```

pub mod aggregate;
pub mod assembler;
pub mod chart;
pub mod fragment;
pub mod latex;
pub mod render;
mod section;
pub mod shuffle;
pub mod template;

pub use aggregate::{Distribution, ScoreBuckets, aggregate, normalize_label, score_buckets};
pub use assembler::{AssemblerOptions, DocumentAssembler, RenderedDocument};
pub use chart::{ChartService, SvgChartService};
pub use fragment::{Fragment, escape_latex};
pub use render::{Renderer, render_combined, render_list};
pub use shuffle::RowShuffler;
pub use template::Template;
