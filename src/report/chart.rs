//! Chart Rendering
//!
//! [`ChartService`] turns a distribution (pie) or score histogram (bar) into
//! an image file and returns a reference for embedding.
//!
//! ## Artifact Names
//!
//! Every chart claims a fresh random six-character name in the figure
//! directory through [`tempfile::Builder`]. The builder creates the file
//! exclusively and retries on collision, so two requests never share a file
//! even when several processes write to the same directory.

use std::f64::consts::PI;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::aggregate::Distribution;
use crate::constants::chart;
use crate::types::{ArtifactRef, ReportError, Result, ResultExt};

/// Chart collaborator used by the renderer
pub trait ChartService {
    /// Pie chart of a label distribution
    fn render_pie(&mut self, distribution: &Distribution) -> Result<ArtifactRef>;

    /// Bar chart of counts per bucket
    fn render_bar(
        &mut self,
        buckets: &[u32],
        counts: &[usize],
        x_label: &str,
        y_label: &str,
    ) -> Result<ArtifactRef>;
}

// =============================================================================
// SVG Chart Service
// =============================================================================

/// Writes charts as standalone SVG files
///
/// Files land in `root/directory`; returned references are relative to
/// `root` so the document that embeds them can live there.
pub struct SvgChartService {
    root: PathBuf,
    directory: PathBuf,
    written: Vec<PathBuf>,
}

impl SvgChartService {
    /// Create the service, creating the figure directory if needed
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        Self::rooted(PathBuf::new(), directory)
    }

    /// Figures under `root/directory`, referenced as `directory/<name>`
    pub fn rooted(root: impl Into<PathBuf>, directory: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let directory = directory.into();
        fs::create_dir_all(root.join(&directory)).with_context("creating figure directory")?;
        Ok(Self {
            root,
            directory,
            written: Vec::new(),
        })
    }

    /// Files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_chart(&mut self, svg: &str) -> Result<ArtifactRef> {
        let (path, mut file) = claim_file(&self.root.join(&self.directory))?;
        file.write_all(svg.as_bytes())
            .with_context_fn(|| format!("writing {}", path.display()))?;
        debug!("Wrote chart {}", path.display());
        let name = path
            .file_name()
            .ok_or_else(|| ReportError::Chart(format!("bad figure path {}", path.display())))?;
        let reference = ArtifactRef::from_path(&self.directory.join(name));
        self.written.push(path);
        Ok(reference)
    }
}

impl ChartService for SvgChartService {
    fn render_pie(&mut self, distribution: &Distribution) -> Result<ArtifactRef> {
        let svg = pie_svg(distribution);
        self.write_chart(&svg)
    }

    fn render_bar(
        &mut self,
        buckets: &[u32],
        counts: &[usize],
        x_label: &str,
        y_label: &str,
    ) -> Result<ArtifactRef> {
        if buckets.len() != counts.len() {
            return Err(ReportError::Chart(format!(
                "bar chart has {} buckets but {} counts",
                buckets.len(),
                counts.len()
            )));
        }
        let svg = bar_svg(buckets, counts, x_label, y_label);
        self.write_chart(&svg)
    }
}

// =============================================================================
// Artifact Names
// =============================================================================

/// Create a file under a fresh random name and keep it
fn claim_file(directory: &Path) -> Result<(PathBuf, File)> {
    let suffix = format!(".{}", chart::FILE_EXTENSION);
    let claimed = tempfile::Builder::new()
        .prefix("")
        .rand_bytes(chart::NAME_LENGTH)
        .suffix(&suffix)
        .tempfile_in(directory)
        .with_context_fn(|| format!("claiming a figure name in {}", directory.display()))?;
    let (file, path) = claimed
        .keep()
        .map_err(|e| ReportError::Chart(format!("cannot keep figure file: {}", e)))?;
    Ok((path, file))
}

// =============================================================================
// SVG Drawing
// =============================================================================

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn svg_open() -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"14\">\n",
        w = chart::WIDTH,
        h = chart::HEIGHT
    )
}

/// Point on a circle; angles counter-clockwise from the positive x axis
fn polar(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.cos(), cy - radius * angle.sin())
}

/// Pie starting at twelve o'clock, slices running counter-clockwise
fn pie_svg(distribution: &Distribution) -> String {
    let (cx, cy) = (chart::WIDTH / 2.0, chart::HEIGHT / 2.0);
    let radius = chart::WIDTH.min(chart::HEIGHT) * 0.36;
    let total: usize = distribution.values().sum();

    let mut svg = svg_open();
    let mut start = PI / 2.0;

    for (index, (label, count)) in distribution.iter().enumerate() {
        let fraction = *count as f64 / total.max(1) as f64;
        let sweep = fraction * 2.0 * PI;
        let end = start + sweep;
        let color = chart::PALETTE[index % chart::PALETTE.len()];

        if fraction >= 1.0 {
            let _ = writeln!(
                svg,
                "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/>",
                cx, cy, radius, color
            );
        } else if fraction > 0.0 {
            let (x0, y0) = polar(cx, cy, radius, start);
            let (x1, y1) = polar(cx, cy, radius, end);
            let large_arc = u8::from(fraction > 0.5);
            let _ = writeln!(
                svg,
                "  <path d=\"M {:.2} {:.2} L {:.2} {:.2} A {:.2} {:.2} 0 {} 0 {:.2} {:.2} Z\" fill=\"{}\" stroke=\"white\"/>",
                cx, cy, x0, y0, radius, radius, large_arc, x1, y1, color
            );
        }

        let middle = start + sweep / 2.0;
        let (lx, ly) = polar(cx, cy, radius * 1.15, middle);
        let (px, py) = polar(cx, cy, radius * 0.6, middle);
        let _ = writeln!(
            svg,
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>",
            lx,
            ly,
            xml_escape(label)
        );
        let _ = writeln!(
            svg,
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{:.1}%</text>",
            px,
            py,
            fraction * 100.0
        );

        start = end;
    }

    svg.push_str("</svg>\n");
    svg
}

fn bar_svg(buckets: &[u32], counts: &[usize], x_label: &str, y_label: &str) -> String {
    let (left, right, top, bottom) = (70.0, 20.0, 20.0, 60.0);
    let plot_width = chart::WIDTH - left - right;
    let plot_height = chart::HEIGHT - top - bottom;
    let baseline = top + plot_height;

    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);
    let step = max_count.div_ceil(5).max(1);
    let y_max = max_count.div_ceil(step) * step;
    let scale = plot_height / y_max as f64;

    let slot = plot_width / buckets.len().max(1) as f64;
    let bar_width = slot * 0.8;

    let mut svg = svg_open();

    // Axes
    let _ = writeln!(
        svg,
        "  <line x1=\"{l:.2}\" y1=\"{t:.2}\" x2=\"{l:.2}\" y2=\"{b:.2}\" stroke=\"black\"/>",
        l = left,
        t = top,
        b = baseline
    );
    let _ = writeln!(
        svg,
        "  <line x1=\"{:.2}\" y1=\"{b:.2}\" x2=\"{:.2}\" y2=\"{b:.2}\" stroke=\"black\"/>",
        left,
        left + plot_width,
        b = baseline
    );

    // Y ticks
    for tick in (0..=y_max).step_by(step) {
        let y = baseline - tick as f64 * scale;
        let _ = writeln!(
            svg,
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\">{}</text>",
            left - 8.0,
            y + 5.0,
            tick
        );
    }

    // Bars
    for (index, (bucket, count)) in buckets.iter().zip(counts).enumerate() {
        let center = left + slot * (index as f64 + 0.5);
        let height = *count as f64 * scale;
        let _ = writeln!(
            svg,
            "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
            center - bar_width / 2.0,
            baseline - height,
            bar_width,
            height,
            chart::BAR_COLOR
        );
        let _ = writeln!(
            svg,
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>",
            center,
            baseline + 20.0,
            bucket
        );
    }

    // Axis labels
    let _ = writeln!(
        svg,
        "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>",
        left + plot_width / 2.0,
        chart::HEIGHT - 12.0,
        xml_escape(x_label)
    );
    let _ = writeln!(
        svg,
        "  <text x=\"18\" y=\"{y:.2}\" text-anchor=\"middle\" transform=\"rotate(-90 18 {y:.2})\">{}</text>",
        xml_escape(y_label),
        y = top + plot_height / 2.0
    );

    svg.push_str("</svg>\n");
    svg
}

// =============================================================================
// Test Double
// =============================================================================

/// Records chart requests instead of drawing them
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingCharts {
    pub pies: Vec<Distribution>,
    pub bars: Vec<(Vec<u32>, Vec<usize>, String, String)>,
}

#[cfg(test)]
impl ChartService for RecordingCharts {
    fn render_pie(&mut self, distribution: &Distribution) -> Result<ArtifactRef> {
        self.pies.push(distribution.clone());
        Ok(ArtifactRef::new(format!("figures/pie{}.svg", self.pies.len())))
    }

    fn render_bar(
        &mut self,
        buckets: &[u32],
        counts: &[usize],
        x_label: &str,
        y_label: &str,
    ) -> Result<ArtifactRef> {
        self.bars.push((
            buckets.to_vec(),
            counts.to_vec(),
            x_label.to_string(),
            y_label.to_string(),
        ));
        Ok(ArtifactRef::new(format!("figures/bar{}.svg", self.bars.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn distribution(entries: &[(&str, usize)]) -> Distribution {
        entries
            .iter()
            .map(|(label, count)| (label.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_claim_file_names() {
        let dir = TempDir::new().unwrap();
        let (path, _file) = claim_file(dir.path()).unwrap();

        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("svg"));
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap();
        assert_eq!(stem.len(), chart::NAME_LENGTH);
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_claimed_files_are_kept_and_distinct() {
        let dir = TempDir::new().unwrap();
        let mut paths: Vec<PathBuf> = (0..50)
            .map(|_| claim_file(dir.path()).unwrap().0)
            .collect();

        assert!(paths.iter().all(|p| p.exists()));
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 50);
    }

    #[test]
    fn test_claim_file_in_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = claim_file(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, ReportError::Context(_)));
    }

    #[test]
    fn test_svg_service_writes_unique_files() {
        let dir = TempDir::new().unwrap();
        let figures = dir.path().join("figures");
        let mut service = SvgChartService::new(&figures).unwrap();

        let pie = service
            .render_pie(&distribution(&[("yes", 3), ("no", 1)]))
            .unwrap();
        let bar = service
            .render_bar(&[0, 1, 2], &[1, 0, 4], "Score", "Number of Ratings")
            .unwrap();

        assert_ne!(pie, bar);
        assert_eq!(service.written().len(), 2);
        for path in service.written() {
            let content = fs::read_to_string(path).unwrap();
            assert!(content.starts_with("<svg"));
            assert!(content.trim_end().ends_with("</svg>"));
        }
        assert_eq!(pie.extension().as_deref(), Some("svg"));
    }

    #[test]
    fn test_rooted_service_references_relative_paths() {
        let dir = TempDir::new().unwrap();
        let mut service = SvgChartService::rooted(dir.path(), "figures").unwrap();

        let pie = service.render_pie(&distribution(&[("yes", 1)])).unwrap();

        assert!(pie.as_str().starts_with("figures/"));
        assert!(dir.path().join(pie.as_str()).exists());
        assert!(service.written()[0].starts_with(dir.path()));
    }

    #[test]
    fn test_bar_rejects_mismatched_lengths() {
        let dir = TempDir::new().unwrap();
        let mut service = SvgChartService::new(dir.path()).unwrap();
        assert!(service.render_bar(&[0, 1], &[1], "x", "y").is_err());
        assert!(service.written().is_empty());
    }

    #[test]
    fn test_pie_svg_labels_and_percentages() {
        let svg = pie_svg(&distribution(&[("a&b", 1), ("c", 3)]));
        assert!(svg.contains(">a&amp;b</text>"));
        assert!(svg.contains(">25.0%</text>"));
        assert!(svg.contains(">75.0%</text>"));
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn test_pie_svg_single_slice_is_circle() {
        let svg = pie_svg(&distribution(&[("only", 4)]));
        assert!(svg.contains("<circle"));
        assert!(svg.contains(">100.0%</text>"));
    }

    #[test]
    fn test_bar_svg_draws_every_bucket() {
        let svg = bar_svg(&[0, 1, 2, 3], &[0, 2, 0, 1], "Score", "Number of Ratings");
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains(">Score</text>"));
        assert!(svg.contains(">Number of Ratings</text>"));
    }
}
