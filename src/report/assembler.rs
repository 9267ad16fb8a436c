//! Document Assembly
//!
//! Walks the schema once and dispatches every directive to the renderers or
//! the section splitter. Each directive that names a column is preceded by a
//! header carrying that column's label (a `title` uses the first record's
//! answer instead). Depth selects the header tier.
//!
//! ## Output Modes
//!
//! - **Single document**: the whole table renders into one body.
//! - **Fan-out**: the table is partitioned by a grouping column and every
//!   category renders into its own body.
//!
//! In both modes the escaping pass runs once per body, after assembly.

use std::borrow::Cow;

use tracing::{debug, info};

use super::chart::ChartService;
use super::fragment::{Fragment, escape_latex};
use super::latex;
use super::render::{Renderer, render_combined, render_list};
use super::shuffle::RowShuffler;
use crate::config::Config;
use crate::constants::defaults;
use crate::types::{Directive, Result, Schema, Table};

/// Assembly settings taken from the configuration
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    /// Deepest header tier a directive list may render at
    pub max_depth: usize,
    /// Run `text` directives through the escaping pass
    pub escape_text_literals: bool,
    /// Width argument of embedded charts
    pub figure_width: String,
    /// Bucket ceiling for score charts
    pub max_score_buckets: usize,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            max_depth: defaults::MAX_DEPTH,
            escape_text_literals: true,
            figure_width: defaults::FIGURE_WIDTH.to_string(),
            max_score_buckets: defaults::MAX_SCORE_BUCKETS,
        }
    }
}

impl AssemblerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_depth: config.render.max_depth,
            escape_text_literals: config.render.escape_text_literals,
            figure_width: config.figures.width.clone(),
            max_score_buckets: config.render.max_score_buckets,
        }
    }
}

/// One finished document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Fan-out category, `None` in single-document mode
    pub category: Option<String>,
    /// Escaped LaTeX body
    pub body: String,
}

impl RenderedDocument {
    /// Output file name: the category without whitespace, or the default
    pub fn file_name(&self, default: &str) -> String {
        match &self.category {
            Some(category) => {
                let stem: String = category
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
                    .collect();
                format!("{}.tex", stem)
            }
            None => default.to_string(),
        }
    }

    /// Category name as it should appear inside the document
    pub fn display_name(&self) -> Option<String> {
        self.category.as_deref().map(escape_latex)
    }
}

/// Schema-driven document assembler
pub struct DocumentAssembler<'a> {
    schema: &'a Schema,
    options: AssemblerOptions,
    charts: &'a mut dyn ChartService,
    shuffler: RowShuffler,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(
        schema: &'a Schema,
        options: AssemblerOptions,
        charts: &'a mut dyn ChartService,
        shuffler: RowShuffler,
    ) -> Self {
        Self {
            schema,
            options,
            charts,
            shuffler,
        }
    }

    /// Render the whole table into one escaped body
    pub fn assemble(&mut self, table: &Table) -> Result<String> {
        let schema = self.schema;
        let fragment = self.render_directives(table, schema.directives(), 0)?;
        Ok(fragment.finish())
    }

    /// Render one body per category of `column`, in category order
    pub fn assemble_per_category(
        &mut self,
        table: &Table,
        column: usize,
    ) -> Result<Vec<RenderedDocument>> {
        let mut documents = Vec::new();
        for (category, rows) in table.partition(column) {
            info!("Rendering document for '{}' ({} records)", category, rows.len());
            let body = self.assemble(&rows)?;
            documents.push(RenderedDocument {
                category: Some(category),
                body,
            });
        }
        Ok(documents)
    }

    /// Single document, or fan-out when a split column is given
    pub fn assemble_documents(
        &mut self,
        table: &Table,
        split_column: Option<usize>,
    ) -> Result<Vec<RenderedDocument>> {
        match split_column {
            Some(column) => self.assemble_per_category(table, column),
            None => Ok(vec![RenderedDocument {
                category: None,
                body: self.assemble(table)?,
            }]),
        }
    }

    /// Render a directive list at a header depth
    ///
    /// Past the configured maximum depth nothing is rendered.
    pub fn render_directives(
        &mut self,
        table: &Table,
        directives: &[Directive],
        depth: usize,
    ) -> Result<Fragment> {
        if depth > self.options.max_depth {
            debug!(
                "Depth {} exceeds maximum {}, dropping {} directives",
                depth,
                self.options.max_depth,
                directives.len()
            );
            return Ok(Fragment::new());
        }

        let mut fragment = Fragment::new();
        for directive in directives {
            fragment.append(self.render_directive(table, directive, depth)?);
            fragment.push_text("\n");
        }
        Ok(fragment)
    }

    fn render_directive(
        &mut self,
        table: &Table,
        directive: &Directive,
        depth: usize,
    ) -> Result<Fragment> {
        let mut fragment = Fragment::new();

        if let Directive::Title { column } = directive
            && let Some(title) = table.first_value(*column)
        {
            fragment.push_text(latex::header(title, depth));
        } else if let Some(column) = directive.heading_column() {
            fragment.push_text(latex::header(table.column_name(column), depth));
        }

        let rows = if directive.is_leaf_renderer() {
            self.shuffler.shuffle(table)
        } else {
            Cow::Borrowed(table)
        };
        let rows: &Table = &rows;

        match directive {
            Directive::Normal { column } => {
                let list = render_list(rows, *column);
                if list.has_items() {
                    fragment.append(list);
                }
            }
            Directive::Rating { column } => {
                fragment.append(self.renderer().render_pie(rows, *column)?);
            }
            Directive::RatingWithReasoning {
                rating_column,
                reason_column,
                combine,
                delimiter,
            } => {
                let delimiter = delimiter
                    .as_deref()
                    .unwrap_or(defaults::REASONING_DELIMITER);
                fragment.append(self.renderer().render_rating_with_reasoning(
                    rows,
                    *rating_column,
                    *reason_column,
                    *combine,
                    delimiter,
                )?);
            }
            Directive::RatingWithResponseNoRating {
                rating_column,
                reason_column,
            } => {
                fragment.append(self.renderer().render_rating_with_reasoning(
                    rows,
                    *rating_column,
                    *reason_column,
                    false,
                    defaults::REASONING_DELIMITER,
                )?);
            }
            Directive::Score { column, max_score } => {
                fragment.append(self.renderer().render_bar(rows, *column, *max_score)?);
            }
            Directive::ScoreWithReasoning {
                rating_column,
                reason_column,
                combine,
                delimiter,
                max_score,
            } => {
                let delimiter = delimiter
                    .as_deref()
                    .unwrap_or(defaults::REASONING_DELIMITER);
                fragment.append(self.renderer().render_score_with_reasoning(
                    rows,
                    *rating_column,
                    *reason_column,
                    *combine,
                    delimiter,
                    *max_score,
                )?);
            }
            Directive::ScoreWithResponseNoRating {
                rating_column,
                reason_column,
                max_score,
            } => {
                fragment.append(self.renderer().render_score_with_reasoning(
                    rows,
                    *rating_column,
                    *reason_column,
                    false,
                    defaults::REASONING_DELIMITER,
                    *max_score,
                )?);
            }
            Directive::Combo {
                first_column,
                second_column,
                delimiter,
            } => {
                let delimiter = delimiter.as_deref().unwrap_or(defaults::COMBO_DELIMITER);
                let list = render_combined(rows, *first_column, *second_column, delimiter);
                if list.has_items() {
                    fragment.append(list);
                }
            }
            Directive::Section { children } => {
                fragment.append(self.split_and_render(rows, children, depth)?);
            }
            Directive::Text { text } => {
                if self.options.escape_text_literals {
                    fragment.push_text(text.as_str());
                } else {
                    fragment.push_raw(text.as_str());
                }
            }
            Directive::Name { .. } | Directive::Title { .. } => {}
        }

        Ok(fragment)
    }

    fn renderer(&mut self) -> Renderer<'_> {
        Renderer::new(&mut *self.charts, &self.options.figure_width)
            .with_max_buckets(self.options.max_score_buckets)
    }
}

// =============================================================================
// Tests
// =============================================================================
