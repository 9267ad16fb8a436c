//! Generate Command
//!
//! Render a CSV file into one or more LaTeX documents.
//!
//! Usage:
//!   evaltex responses.csv [--split-column N] [--seed N] [--no-shuffle]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use super::config::{ConfigOverrides, resolve};
use crate::cli::ui::Output;
use crate::config::Config;
use crate::report::{
    AssemblerOptions, DocumentAssembler, RowShuffler, SvgChartService, Template,
};
use crate::types::{ReportError, Result, ResultExt, Table};

/// Options of a generate run
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub quiet: bool,
}

pub fn run(options: GenerateOptions) -> Result<()> {
    let output = Output::quiet(options.quiet);
    let config = resolve(options.config.as_deref(), &options.overrides)?;

    let written = generate(&options.input, &config, Local::now().date_naive(), &output)?;

    output.success(&format!("Wrote {} document(s)", written.len()));
    for path in &written {
        output.info(&format!("  {}", path.display()));
    }
    Ok(())
}

/// Render `input` with `config`; returns the written document paths
pub fn generate(
    input: &Path,
    config: &Config,
    today: NaiveDate,
    output: &Output,
) -> Result<Vec<PathBuf>> {
    if config.schema.is_empty() {
        return Err(ReportError::Config(
            "schema is empty: add [[schema]] directives to the config file".to_string(),
        ));
    }

    let table = Table::from_csv_path(input)?;
    info!(
        "Loaded {} records with {} columns from {}",
        table.len(),
        table.width(),
        input.display()
    );

    config.schema.check_columns(&table)?;
    let split_column = config.split_column();
    if let Some(column) = split_column {
        table.check_column(column, "output.split_column")?;
    }

    let template = Template::load(&config.output.template)?;
    if !template.has_body_placeholder() {
        output.warning(&format!(
            "Template {} has no DATA_LATEX_OUTPUT placeholder",
            template.path().display()
        ));
    }

    let directory = &config.output.directory;
    fs::create_dir_all(directory)?;
    let mut charts = SvgChartService::rooted(directory, &config.figures.directory)?;

    let documents = DocumentAssembler::new(
        &config.schema,
        AssemblerOptions::from_config(config),
        &mut charts,
        RowShuffler::from_config(&config.render),
    )
    .assemble_documents(&table, split_column)?;

    let mut used = HashSet::new();
    let mut written = Vec::with_capacity(documents.len());
    for document in &documents {
        let name = document.file_name(&config.output.file_name);
        let unique = unique_file_name(&mut used, &name);
        if unique != name {
            warn!("File name {} already used, writing {} instead", name, unique);
            output.warning(&format!(
                "Categories collide on {}; wrote {} instead",
                name, unique
            ));
        }
        let path = directory.join(unique);
        let text = template.render(&document.body, document.display_name().as_deref(), today);
        fs::write(&path, text).with_context_fn(|| format!("writing {}", path.display()))?;
        info!("Wrote {}", path.display());
        written.push(path);
    }

    info!(
        "Generated {} documents and {} figures",
        written.len(),
        charts.written().len()
    );
    Ok(written)
}

/// `name`, or `stem-2.ext`, `stem-3.ext`, ... when it was handed out before
fn unique_file_name(used: &mut HashSet<String>, name: &str) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) => (stem, format!(".{}", extension)),
        None => (name, String::new()),
    };
    let mut counter = 2;
    loop {
        let candidate = format!("{}-{}{}", stem, counter, extension);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Directive, Schema, ValidationErrorKind};
    use tempfile::TempDir;

    const CSV: &str = "team,comment,rating\nred,fast & fun,Good\nblue,slow,bad\nred,,good!\n";
    const TEMPLATE: &str =
        "\\title{NAMEPLACEHOLDER REPLACEMENTYEAR}\n\\begin{document}\nDATA_LATEX_OUTPUT\n\\end{document}\n";

    struct Fixture {
        dir: TempDir,
        input: PathBuf,
        config: Config,
    }

    fn fixture(schema: Vec<Directive>) -> Fixture {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("responses.csv");
        fs::write(&input, CSV).unwrap();
        let template = dir.path().join("template.tex");
        fs::write(&template, TEMPLATE).unwrap();

        let mut config = Config::default();
        config.schema = Schema::new(schema);
        config.output.template = template;
        config.output.directory = dir.path().join("out");
        config.render.shuffle = false;
        Fixture { dir, input, config }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn quiet() -> Output {
        Output::quiet(true)
    }

    #[test]
    fn test_single_document() {
        let f = fixture(vec![Directive::Normal { column: 1 }]);

        let written = generate(&f.input, &f.config, today(), &quiet()).unwrap();

        assert_eq!(written, vec![f.dir.path().join("out").join("output.tex")]);
        let text = fs::read_to_string(&written[0]).unwrap();
        assert!(text.starts_with("\\title{NAMEPLACEHOLDER 2025}"));
        assert!(text.contains("\\section{comment}\n\\begin{itemize}\n\\item fast \\& fun\n\\item slow\n"));
        assert!(text.ends_with("\\end{document}"));
    }

    #[test]
    fn test_fan_out_writes_one_file_per_category() {
        let mut f = fixture(vec![Directive::Normal { column: 1 }]);
        f.config.output.split_column = 0;

        let written = generate(&f.input, &f.config, today(), &quiet()).unwrap();

        let out = f.dir.path().join("out");
        assert_eq!(written, vec![out.join("blue.tex"), out.join("red.tex")]);
        let red = fs::read_to_string(out.join("red.tex")).unwrap();
        assert!(red.starts_with("\\title{red 2025}"));
        assert!(red.contains("\\item fast \\& fun"));
        assert!(!red.contains("slow"));
    }

    #[test]
    fn test_colliding_categories_get_distinct_files() {
        let mut f = fixture(vec![Directive::Normal { column: 1 }]);
        fs::write(
            &f.input,
            "team,comment\nTeam A,spaced\nTeamA,joined\n",
        )
        .unwrap();
        f.config.output.split_column = 0;

        let written = generate(&f.input, &f.config, today(), &quiet()).unwrap();

        let out = f.dir.path().join("out");
        assert_eq!(written, vec![out.join("TeamA.tex"), out.join("TeamA-2.tex")]);
        assert!(fs::read_to_string(out.join("TeamA.tex")).unwrap().contains("spaced"));
        assert!(fs::read_to_string(out.join("TeamA-2.tex")).unwrap().contains("joined"));
    }

    #[test]
    fn test_unique_file_name_counts_up() {
        let mut used = HashSet::new();
        assert_eq!(unique_file_name(&mut used, "red.tex"), "red.tex");
        assert_eq!(unique_file_name(&mut used, "red.tex"), "red-2.tex");
        assert_eq!(unique_file_name(&mut used, "red.tex"), "red-3.tex");
        assert_eq!(unique_file_name(&mut used, "notes"), "notes");
        assert_eq!(unique_file_name(&mut used, "notes"), "notes-2");
    }

    #[test]
    fn test_charts_land_in_figure_directory() {
        let f = fixture(vec![Directive::Rating { column: 2 }]);

        let written = generate(&f.input, &f.config, today(), &quiet()).unwrap();

        let text = fs::read_to_string(&written[0]).unwrap();
        assert!(text.contains("\\includesvg[width=0.65\\textwidth]{figures/"));
        let figures: Vec<_> = fs::read_dir(f.dir.path().join("out").join("figures"))
            .unwrap()
            .collect();
        assert_eq!(figures.len(), 1);
    }

    #[test]
    fn test_empty_schema_is_rejected() {
        let f = fixture(Vec::new());
        let err = generate(&f.input, &f.config, today(), &quiet()).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_out_of_range_column_is_fatal() {
        let f = fixture(vec![Directive::Normal { column: 7 }]);
        let err = generate(&f.input, &f.config, today(), &quiet()).unwrap_err();
        match err {
            ReportError::Validation(v) => assert_eq!(v.kind, ValidationErrorKind::ColumnRange),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!f.dir.path().join("out").exists());
    }

    #[test]
    fn test_out_of_range_split_column_is_fatal() {
        let mut f = fixture(vec![Directive::Normal { column: 1 }]);
        f.config.output.split_column = 9;
        let err = generate(&f.input, &f.config, today(), &quiet()).unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)));
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let mut f = fixture(vec![Directive::Normal { column: 1 }]);
        f.config.output.template = f.dir.path().join("missing.tex");
        let err = generate(&f.input, &f.config, today(), &quiet()).unwrap_err();
        assert!(matches!(err, ReportError::Template { .. }));
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let f = fixture(vec![Directive::Normal { column: 1 }]);
        let err = generate(&f.dir.path().join("nope.csv"), &f.config, today(), &quiet())
            .unwrap_err();
        assert!(matches!(err, ReportError::Input { .. }));
    }
}
