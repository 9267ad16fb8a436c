//! Global Constants
//!
//! Centralized constants for markup, placeholders and defaults.
//! All magic strings and numbers should be defined here with documentation.

/// LaTeX markup emitted by the renderers
pub mod latex {
    pub const BEGIN_ITEMIZE: &str = "\\begin{itemize}\n";
    pub const END_ITEMIZE: &str = "\\end{itemize}\n";
    pub const ITEM: &str = "\\item ";
    pub const PAGE_BREAK: &str = "\\pagebreak\n";

    /// Header commands by tier, outermost first
    pub const HEADER_TIERS: [&str; 4] = ["section", "subsection", "subsubsection", "paragraph"];

    /// Inline marker for a section whose first child is not a `name`
    pub const SECTION_ERROR: &str =
        "\\LARGE{error in section formatting: a section must start with a name}\n";

    /// Characters rewritten by the final escaping pass
    pub const ESCAPES: [(char, &str); 5] = [
        ('#', "\\#"),
        ('&', "\\&"),
        ('$', "\\$"),
        ('_', "\\_"),
        ('^', "\\string^"),
    ];
}

/// Template placeholders
pub mod placeholder {
    /// Replaced by the rendered document body
    pub const BODY: &str = "DATA_LATEX_OUTPUT";
    /// Replaced by the category name in fan-out mode
    pub const NAME: &str = "NAMEPLACEHOLDER";

    /// Date placeholders and their chrono format strings
    pub const DATES: [(&str, &str); 5] = [
        ("REPLACEMENTFULLDATE", "%B %d, %Y"),
        ("REPLACEMENTISODATE", "%Y-%m-%d"),
        ("REPLACEMENTDATE", "%B %Y"),
        ("REPLACEMENTYEAR", "%Y"),
        ("REPLACEMENTMONTH", "%B"),
    ];
}

/// Chart constants
pub mod chart {
    pub const SCORE_AXIS_LABEL: &str = "Score";
    pub const COUNT_AXIS_LABEL: &str = "Number of Ratings";

    /// Length of the random part of figure names
    pub const NAME_LENGTH: usize = 6;

    pub const FILE_EXTENSION: &str = "svg";

    /// Canvas size in SVG user units
    pub const WIDTH: f64 = 640.0;
    pub const HEIGHT: f64 = 480.0;

    /// Slice and bar fill colors, cycled
    pub const PALETTE: [&str; 10] = [
        "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
        "#7f7f7f", "#bcbd22", "#17becf",
    ];
    pub const BAR_COLOR: &str = "blue";
}

/// Built-in defaults
pub mod defaults {
    /// Separator for `combo` entries
    pub const COMBO_DELIMITER: &str = "-";
    /// Separator between a rating and its reason
    pub const REASONING_DELIMITER: &str = " - ";

    /// Deepest header tier a directive list may render at
    pub const MAX_DEPTH: usize = 4;

    /// Largest score histogram a bar chart may draw (`0..=max` buckets)
    pub const MAX_SCORE_BUCKETS: usize = 1000;

    pub const CONFIG_FILE: &str = "evaltex.toml";
    pub const ENV_PREFIX: &str = "EVALTEX_";
    pub const TEMPLATE_FILE: &str = "template.tex";
    pub const OUTPUT_FILE: &str = "output.tex";
    pub const FIGURE_DIR: &str = "figures";
    pub const FIGURE_WIDTH: &str = "0.65\\textwidth";

    /// Fan-out disabled
    pub const SPLIT_COLUMN: i64 = -1;
}
