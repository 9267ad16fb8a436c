//! LaTeX markup helpers

use crate::constants::latex;
use crate::types::ArtifactRef;

/// Section header for a depth
///
/// Depths 0..=3 map to `\section` through `\paragraph`. Any other depth
/// yields the bare title on its own line.
pub fn header(title: &str, depth: usize) -> String {
    match latex::HEADER_TIERS.get(depth) {
        Some(command) => format!("\\{}{{{}}}\n", command, title),
        None => format!("{}\n", title),
    }
}

/// Figure block embedding a chart image
///
/// SVG artifacts use `\includesvg` (svg package); everything else uses
/// `\includegraphics`.
pub fn figure(reference: &ArtifactRef, width: &str) -> String {
    let command = match reference.extension().as_deref() {
        Some("svg") => "includesvg",
        _ => "includegraphics",
    };
    format!(
        "\\begin{{figure}}[H]\n\\centering\n\\{}[width={}]{{{}}}\n\\centering\n\\end{{figure}}\n",
        command, width, reference
    )
}
