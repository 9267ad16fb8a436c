//! Column Renderers
//!
//! Turn one column (or a pair) into a [`Fragment`]: itemized lists,
//! combined rating/reason lists, and chart figures.

use tracing::debug;

use super::aggregate::{aggregate, score_buckets};
use super::chart::ChartService;
use super::fragment::Fragment;
use super::latex;
use crate::constants::{chart, defaults, latex as markup};
use crate::types::{Result, Table};

/// Every non-empty answer of a column as a bullet
///
/// A table without records renders nothing. Otherwise the list wrapper is
/// always emitted, so callers check [`Fragment::has_items`] to drop empty
/// lists.
pub fn render_list(table: &Table, column: usize) -> Fragment {
    itemize(table, |record| {
        let cell = cell(record, column);
        (!cell.is_empty()).then(|| cell.to_string())
    })
}

/// One bullet per record joining two columns with `delimiter`
///
/// A side that is blank is left out along with the delimiter; a record with
/// both sides blank is skipped.
pub fn render_combined(table: &Table, first: usize, second: usize, delimiter: &str) -> Fragment {
    itemize(table, |record| {
        match (cell(record, first), cell(record, second)) {
            ("", "") => None,
            (a, "") => Some(a.to_string()),
            ("", b) => Some(b.to_string()),
            (a, b) => Some(format!("{}{}{}", a, delimiter, b)),
        }
    })
}

fn cell(record: &[String], column: usize) -> &str {
    record.get(column).map(|c| c.trim()).unwrap_or("")
}

fn itemize<F>(table: &Table, mut item: F) -> Fragment
where
    F: FnMut(&[String]) -> Option<String>,
{
    if table.is_empty() {
        return Fragment::new();
    }
    let mut fragment = Fragment::text(markup::BEGIN_ITEMIZE);
    for record in table.records() {
        if let Some(text) = item(record.as_slice()) {
            fragment.push_item(&text);
        }
    }
    fragment.push_text(markup::END_ITEMIZE);
    fragment
}

/// Chart-backed renderers
pub struct Renderer<'a> {
    charts: &'a mut dyn ChartService,
    figure_width: &'a str,
    max_buckets: usize,
}

impl<'a> Renderer<'a> {
    pub fn new(charts: &'a mut dyn ChartService, figure_width: &'a str) -> Self {
        Self {
            charts,
            figure_width,
            max_buckets: defaults::MAX_SCORE_BUCKETS,
        }
    }

    /// Ceiling on the number of score buckets a bar chart may draw
    pub fn with_max_buckets(mut self, max_buckets: usize) -> Self {
        self.max_buckets = max_buckets;
        self
    }

    /// Pie chart of the answer distribution; empty when there are no answers
    pub fn render_pie(&mut self, table: &Table, column: usize) -> Result<Fragment> {
        let distribution = aggregate(table, column);
        if distribution.is_empty() {
            debug!("No answers in column {}, skipping pie chart", column);
            return Ok(Fragment::new());
        }
        let reference = self.charts.render_pie(&distribution)?;
        Ok(Fragment::raw(latex::figure(&reference, self.figure_width)))
    }

    /// Bar chart of scores over `0..=max`; empty when there are no scores
    pub fn render_bar(
        &mut self,
        table: &Table,
        column: usize,
        max_score: Option<u32>,
    ) -> Result<Fragment> {
        let distribution = aggregate(table, column);
        if distribution.is_empty() {
            debug!("No answers in column {}, skipping bar chart", column);
            return Ok(Fragment::new());
        }
        let Some(histogram) = score_buckets(&distribution, max_score, self.max_buckets) else {
            debug!("No usable scores in column {}, skipping bar chart", column);
            return Ok(Fragment::new());
        };
        let reference = self.charts.render_bar(
            &histogram.buckets,
            &histogram.counts,
            chart::SCORE_AXIS_LABEL,
            chart::COUNT_AXIS_LABEL,
        )?;
        Ok(Fragment::raw(latex::figure(&reference, self.figure_width)))
    }

    /// Pie chart of ratings followed by the reasons
    ///
    /// With `combine`, each reason is prefixed by its rating.
    pub fn render_rating_with_reasoning(
        &mut self,
        table: &Table,
        rating_column: usize,
        reason_column: usize,
        combine: bool,
        delimiter: &str,
    ) -> Result<Fragment> {
        let chart = self.render_pie(table, rating_column)?;
        Ok(with_reasons(
            chart,
            table,
            rating_column,
            reason_column,
            combine,
            delimiter,
        ))
    }

    /// Bar chart of scores followed by the reasons
    pub fn render_score_with_reasoning(
        &mut self,
        table: &Table,
        rating_column: usize,
        reason_column: usize,
        combine: bool,
        delimiter: &str,
        max_score: Option<u32>,
    ) -> Result<Fragment> {
        let chart = self.render_bar(table, rating_column, max_score)?;
        Ok(with_reasons(
            chart,
            table,
            rating_column,
            reason_column,
            combine,
            delimiter,
        ))
    }
}

fn with_reasons(
    mut chart: Fragment,
    table: &Table,
    rating_column: usize,
    reason_column: usize,
    combine: bool,
    delimiter: &str,
) -> Fragment {
    let body = if combine {
        render_combined(table, rating_column, reason_column, delimiter)
    } else {
        render_list(table, reason_column)
    };
    chart.push_text("\n");
    chart.append(body);
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::chart::RecordingCharts;
    use crate::types::table::tests::table;

    fn ratings() -> Table {
        table(&[
            &["id", "rating", "why"],
            &["1", "Good", "fast"],
            &["2", "bad", ""],
            &["3", "", "no rating"],
            &["4", "", ""],
        ])
    }

    #[test]
    fn test_render_list() {
        let fragment = render_list(&ratings(), 2);
        assert_eq!(fragment.items(), 2);
        assert_eq!(
            fragment.as_plain(),
            "\\begin{itemize}\n\\item fast\n\\item no rating\n\\end{itemize}\n"
        );
    }

    #[test]
    fn test_render_list_all_empty_keeps_wrapper() {
        let table = table(&[&["c"], &[" "], &[""]]);
        let fragment = render_list(&table, 0);
        assert!(!fragment.has_items());
        assert_eq!(fragment.as_plain(), "\\begin{itemize}\n\\end{itemize}\n");
    }

    #[test]
    fn test_render_list_without_records() {
        assert!(render_list(&table(&[&["c"]]), 0).is_empty());
    }

    #[test]
    fn test_render_combined() {
        let fragment = render_combined(&ratings(), 1, 2, " - ");
        assert_eq!(fragment.items(), 3);
        assert_eq!(
            fragment.as_plain(),
            "\\begin{itemize}\n\\item Good - fast\n\\item bad\n\\item no rating\n\\end{itemize}\n"
        );
    }

    #[test]
    fn test_render_combined_blank_second_column() {
        let table = table(&[&["a", "b"], &["ok", ""]]);
        let fragment = render_combined(&table, 0, 1, "-");
        assert_eq!(fragment.items(), 1);
        assert!(fragment.as_plain().contains("\\item ok\n"));
        assert!(!fragment.as_plain().contains("ok-"));
    }

    #[test]
    fn test_render_pie_delegates_distribution() {
        let mut charts = RecordingCharts::default();
        let fragment = Renderer::new(&mut charts, "0.65\\textwidth")
            .render_pie(&ratings(), 1)
            .unwrap();

        assert_eq!(charts.pies.len(), 1);
        assert_eq!(charts.pies[0]["good"], 1);
        assert_eq!(charts.pies[0]["bad"], 1);
        assert!(fragment.as_plain().contains("{figures/pie1.svg}"));
        assert!(!fragment.has_items());
    }

    #[test]
    fn test_render_pie_empty_column() {
        let mut charts = RecordingCharts::default();
        let table = table(&[&["rating"], &[""]]);
        let fragment = Renderer::new(&mut charts, "w").render_pie(&table, 0).unwrap();
        assert!(fragment.is_empty());
        assert!(charts.pies.is_empty());
    }

    #[test]
    fn test_render_bar_buckets() {
        let mut charts = RecordingCharts::default();
        let table = table(&[&["score"], &["3"], &["5"], &["3"]]);
        Renderer::new(&mut charts, "w")
            .render_bar(&table, 0, Some(5))
            .unwrap();

        let (buckets, counts, x_label, y_label) = &charts.bars[0];
        assert_eq!(buckets, &vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(counts, &vec![0, 0, 0, 2, 0, 1]);
        assert_eq!(x_label, "Score");
        assert_eq!(y_label, "Number of Ratings");
    }

    #[test]
    fn test_render_bar_skips_oversized_range() {
        let mut charts = RecordingCharts::default();
        let table = table(&[&["score"], &["3"], &["2000000"]]);
        let fragment = Renderer::new(&mut charts, "w")
            .with_max_buckets(100)
            .render_bar(&table, 0, None)
            .unwrap();

        assert!(fragment.is_empty());
        assert!(charts.bars.is_empty());
    }

    #[test]
    fn test_rating_with_reasoning_combined() {
        let mut charts = RecordingCharts::default();
        let fragment = Renderer::new(&mut charts, "w")
            .render_rating_with_reasoning(&ratings(), 1, 2, true, " - ")
            .unwrap();

        let plain = fragment.as_plain();
        let figure_end = plain.find("\\end{figure}\n").unwrap();
        let list_start = plain.find("\\begin{itemize}").unwrap();
        assert!(figure_end < list_start);
        assert!(plain.contains("\\item Good - fast"));
        assert_eq!(fragment.items(), 3);
    }

    #[test]
    fn test_rating_with_response_only() {
        let mut charts = RecordingCharts::default();
        let fragment = Renderer::new(&mut charts, "w")
            .render_rating_with_reasoning(&ratings(), 1, 2, false, " - ")
            .unwrap();

        assert_eq!(fragment.items(), 2);
        assert!(fragment.as_plain().contains("\\item fast"));
        assert!(!fragment.as_plain().contains("Good"));
    }

    #[test]
    fn test_score_with_reasoning_threads_max_score() {
        let mut charts = RecordingCharts::default();
        let table = table(&[&["score", "why"], &["2", "meh"]]);
        let fragment = Renderer::new(&mut charts, "w")
            .render_score_with_reasoning(&table, 0, 1, true, ": ", Some(4))
            .unwrap();

        assert_eq!(charts.bars[0].0, vec![0, 1, 2, 3, 4]);
        assert!(fragment.as_plain().contains("\\item 2: meh"));
    }
}
