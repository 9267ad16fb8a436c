use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evaltex::cli::commands::{config, generate};
use evaltex::cli::{ConfigOverrides, GenerateOptions};

#[derive(Parser)]
#[command(name = "evaltex")]
#[command(
    version,
    about = "Render survey responses from a CSV file into LaTeX reports"
)]
struct Cli {
    /// CSV file with a header row and one response per row
    #[arg(required_unless_present = "show_config")]
    input: Option<PathBuf>,

    #[arg(long, short, help = "Config file (default: evaltex.toml if present)")]
    config: Option<PathBuf>,

    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Write one document per category of this column (negative disables)"
    )]
    split_column: Option<i64>,

    #[arg(long, help = "Seed for reproducible answer order")]
    seed: Option<u64>,

    #[arg(long, help = "Keep answers in input order")]
    no_shuffle: bool,

    #[arg(long, short, help = "Directory for documents and figures")]
    output_dir: Option<PathBuf>,

    #[arg(long, short, help = "LaTeX template with DATA_LATEX_OUTPUT placeholder")]
    template: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,

    #[arg(long, help = "Print the effective configuration as TOML and exit")]
    show_config: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            split_column: self.split_column,
            seed: self.seed,
            no_shuffle: self.no_shuffle,
            output_dir: self.output_dir.clone(),
            template: self.template.clone(),
        }
    }
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mevaltex encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return parse_exit_code(e.kind());
        }
    };

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Usage errors exit with 1, help and version with 0
fn parse_exit_code(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = cli.overrides();

    if cli.show_config {
        config::show(cli.config.as_deref(), &overrides)?;
        return Ok(());
    }

    let Some(input) = cli.input else {
        anyhow::bail!("missing input file");
    };

    generate::run(GenerateOptions {
        input,
        config: cli.config,
        overrides,
        quiet: cli.quiet,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error(args: &[&str]) -> ErrorKind {
        match Cli::try_parse_from(args.iter().copied()) {
            Ok(_) => panic!("expected {:?} to fail parsing", args),
            Err(e) => e.kind(),
        }
    }

    #[test]
    fn test_missing_input_is_usage_error() {
        let kind = parse_error(&["evaltex"]);
        assert_eq!(kind, ErrorKind::MissingRequiredArgument);
        assert_eq!(parse_exit_code(kind), ExitCode::FAILURE);
    }

    #[test]
    fn test_help_exits_successfully() {
        for flag in ["-h", "--help"] {
            let kind = parse_error(&["evaltex", flag]);
            assert_eq!(kind, ErrorKind::DisplayHelp);
            assert_eq!(parse_exit_code(kind), ExitCode::SUCCESS);
        }
        assert_eq!(parse_exit_code(ErrorKind::DisplayVersion), ExitCode::SUCCESS);
    }

    #[test]
    fn test_unknown_flag_fails() {
        let kind = parse_error(&["evaltex", "in.csv", "--bogus"]);
        assert_eq!(parse_exit_code(kind), ExitCode::FAILURE);
    }

    #[test]
    fn test_show_config_needs_no_input() {
        let cli = Cli::try_parse_from(["evaltex", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_negative_split_column_and_overrides() {
        let cli = Cli::try_parse_from([
            "evaltex",
            "in.csv",
            "--split-column",
            "-1",
            "--seed",
            "5",
            "--no-shuffle",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.split_column, Some(-1));
        assert_eq!(overrides.seed, Some(5));
        assert!(overrides.no_shuffle);
        assert_eq!(cli.input, Some(PathBuf::from("in.csv")));
    }
}
