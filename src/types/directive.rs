//! Report Schema
//!
//! The schema is an ordered list of directives, each describing how one
//! slice of the table is rendered. The set of directive kinds is closed.
//!
//! In TOML each directive is a table tagged by `kind`:
//!
//! ```toml
//! [[schema]]
//! kind = "rating_with_reasoning"
//! rating_column = 3
//! reason_column = 4
//!
//! [[schema]]
//! kind = "section"
//! children = [
//!     { kind = "name", column = 1, new_page = true },
//!     { kind = "normal", column = 5 },
//! ]
//! ```

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::table::Table;

fn default_combine() -> bool {
    true
}

/// One schema entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    /// Every non-empty answer as a bullet
    Normal { column: usize },

    /// Pie chart of the answer distribution
    Rating { column: usize },

    /// Pie chart of ratings followed by the reasons
    RatingWithReasoning {
        rating_column: usize,
        reason_column: usize,
        #[serde(default = "default_combine")]
        combine: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delimiter: Option<String>,
    },

    /// Pie chart of ratings followed by the bare reasons
    RatingWithResponseNoRating {
        rating_column: usize,
        reason_column: usize,
    },

    /// Bar chart of numeric scores
    Score {
        column: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_score: Option<u32>,
    },

    /// Bar chart of scores followed by the reasons
    ScoreWithReasoning {
        rating_column: usize,
        reason_column: usize,
        #[serde(default = "default_combine")]
        combine: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delimiter: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_score: Option<u32>,
    },

    /// Bar chart of scores followed by the bare reasons
    ScoreWithResponseNoRating {
        rating_column: usize,
        reason_column: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_score: Option<u32>,
    },

    /// Two columns joined into one bullet per row
    Combo {
        first_column: usize,
        second_column: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delimiter: Option<String>,
    },

    /// Nested schema split by the leading `name` directive
    Section { children: Vec<Directive> },

    /// Grouping key of a section
    Name {
        column: usize,
        #[serde(default)]
        new_page: bool,
    },

    /// Heading taken from the first record's answer
    Title { column: usize },

    /// Literal text inserted as-is
    Text { text: String },
}

impl Directive {
    /// Column whose header label becomes this directive's heading
    pub fn heading_column(&self) -> Option<usize> {
        match self {
            Self::Normal { column }
            | Self::Rating { column }
            | Self::Score { column, .. }
            | Self::Name { column, .. } => Some(*column),
            Self::RatingWithReasoning { rating_column, .. }
            | Self::RatingWithResponseNoRating { rating_column, .. }
            | Self::ScoreWithReasoning { rating_column, .. }
            | Self::ScoreWithResponseNoRating { rating_column, .. } => Some(*rating_column),
            Self::Combo { first_column, .. } => Some(*first_column),
            Self::Section { .. } | Self::Title { .. } | Self::Text { .. } => None,
        }
    }

    /// Every column this directive reads, children excluded
    pub fn columns(&self) -> Vec<usize> {
        match self {
            Self::Normal { column }
            | Self::Rating { column }
            | Self::Score { column, .. }
            | Self::Name { column, .. }
            | Self::Title { column } => vec![*column],
            Self::RatingWithReasoning {
                rating_column,
                reason_column,
                ..
            }
            | Self::RatingWithResponseNoRating {
                rating_column,
                reason_column,
            }
            | Self::ScoreWithReasoning {
                rating_column,
                reason_column,
                ..
            }
            | Self::ScoreWithResponseNoRating {
                rating_column,
                reason_column,
                ..
            } => vec![*rating_column, *reason_column],
            Self::Combo {
                first_column,
                second_column,
                ..
            } => vec![*first_column, *second_column],
            Self::Section { .. } | Self::Text { .. } => Vec::new(),
        }
    }

    /// Whether the rows handed to this directive are shuffled first
    pub fn is_leaf_renderer(&self) -> bool {
        !matches!(
            self,
            Self::Section { .. } | Self::Name { .. } | Self::Title { .. } | Self::Text { .. }
        )
    }

    /// Snake-case kind name, as written in the config
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Normal { .. } => "normal",
            Self::Rating { .. } => "rating",
            Self::RatingWithReasoning { .. } => "rating_with_reasoning",
            Self::RatingWithResponseNoRating { .. } => "rating_with_response_no_rating",
            Self::Score { .. } => "score",
            Self::ScoreWithReasoning { .. } => "score_with_reasoning",
            Self::ScoreWithResponseNoRating { .. } => "score_with_response_no_rating",
            Self::Combo { .. } => "combo",
            Self::Section { .. } => "section",
            Self::Name { .. } => "name",
            Self::Title { .. } => "title",
            Self::Text { .. } => "text",
        }
    }
}

/// Grouping key at the head of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionKey {
    pub column: usize,
    pub new_page: bool,
}

/// Split a section's children into its grouping key and the nested schema
///
/// Returns `None` when the first child is not a `name` directive.
pub fn section_key(children: &[Directive]) -> Option<(SectionKey, &[Directive])> {
    match children.split_first() {
        Some((Directive::Name { column, new_page }, rest)) => Some((
            SectionKey {
                column: *column,
                new_page: *new_page,
            },
            rest,
        )),
        _ => None,
    }
}

/// Ordered directive list, constant for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(Vec<Directive>);

impl Schema {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self(directives)
    }

    pub fn directives(&self) -> &[Directive] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check every referenced column against the table header
    ///
    /// Sections with a missing `name` are not rejected here; they render
    /// as an inline error marker instead.
    pub fn check_columns(&self, table: &Table) -> Result<()> {
        check_directives(&self.0, table, "schema")
    }
}

fn check_directives(directives: &[Directive], table: &Table, path: &str) -> Result<()> {
    for (index, directive) in directives.iter().enumerate() {
        let field = format!("{}[{}]", path, index);
        for column in directive.columns() {
            table.check_column(column, &format!("{} ({})", field, directive.kind()))?;
        }
        if let Directive::Section { children } = directive {
            check_directives(children, table, &format!("{}.children", field))?;
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
